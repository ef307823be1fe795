//! Display labels and colors for category codes.
//!
//! The lookup tables are fixed at compile time. Lookups never fail: a code
//! outside a table falls back to `"<Kind> <code>"` with no color, leaving the
//! renderer to pick its own default.

use std::fmt;

use clap::ValueEnum;
use serde::Serialize;

use crate::{cli::LabelsArgs, table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryKind {
    Weather,
    WorkingDay,
    Season,
}

struct LabelEntry {
    code: i64,
    label: &'static str,
    color: &'static str,
}

const WEATHER: &[LabelEntry] = &[
    LabelEntry { code: 1, label: "Clear", color: "#72BCD4" },
    LabelEntry { code: 2, label: "Mist/Cloudy", color: "#FFC107" },
    LabelEntry { code: 3, label: "Light Rain/Snow", color: "#FF5733" },
    LabelEntry { code: 4, label: "Heavy Rain/Snow", color: "#4CAF50" },
];

const WORKING_DAY: &[LabelEntry] = &[
    LabelEntry { code: 0, label: "Weekend/Holiday", color: "#FF5733" },
    LabelEntry { code: 1, label: "Working Day", color: "#72BCD4" },
];

const SEASON: &[LabelEntry] = &[
    LabelEntry { code: 1, label: "Spring", color: "#8BC34A" },
    LabelEntry { code: 2, label: "Summer", color: "#FFC107" },
    LabelEntry { code: 3, label: "Fall", color: "#FF5733" },
    LabelEntry { code: 4, label: "Winter", color: "#72BCD4" },
];

impl CategoryKind {
    pub const ALL: [CategoryKind; 3] = [
        CategoryKind::Weather,
        CategoryKind::WorkingDay,
        CategoryKind::Season,
    ];

    /// Name used in fallback labels.
    pub fn display_name(self) -> &'static str {
        match self {
            CategoryKind::Weather => "Weather",
            CategoryKind::WorkingDay => "Workingday",
            CategoryKind::Season => "Season",
        }
    }

    /// Title shown above a chart legend of this kind.
    pub fn legend_title(self) -> &'static str {
        match self {
            CategoryKind::Weather => "Weather Type",
            CategoryKind::WorkingDay => "Working Day Status",
            CategoryKind::Season => "Season",
        }
    }

    /// Recognises `weathersit`, `workingday` and `season` columns, with or
    /// without a granularity suffix such as `_hour`.
    pub fn for_column(name: &str) -> Option<Self> {
        let lowered = name.to_ascii_lowercase();
        if lowered.starts_with("weather") {
            Some(CategoryKind::Weather)
        } else if lowered.starts_with("workingday") {
            Some(CategoryKind::WorkingDay)
        } else if lowered.starts_with("season") {
            Some(CategoryKind::Season)
        } else {
            None
        }
    }

    /// Codes with a static label, ascending.
    pub fn known_codes(self) -> Vec<i64> {
        self.table().iter().map(|entry| entry.code).collect()
    }

    fn table(self) -> &'static [LabelEntry] {
        match self {
            CategoryKind::Weather => WEATHER,
            CategoryKind::WorkingDay => WORKING_DAY,
            CategoryKind::Season => SEASON,
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryLabel {
    pub label: String,
    pub color: Option<&'static str>,
}

/// Label and color for `code` of `kind`. Total over every `i64`.
pub fn label_of(kind: CategoryKind, code: i64) -> CategoryLabel {
    match kind.table().iter().find(|entry| entry.code == code) {
        Some(entry) => CategoryLabel {
            label: entry.label.to_string(),
            color: Some(entry.color),
        },
        None => CategoryLabel {
            label: format!("{} {code}", kind.display_name()),
            color: None,
        },
    }
}

/// Rows of `(kind, code, label, color)` for every static entry.
pub fn label_table_rows() -> Vec<Vec<String>> {
    CategoryKind::ALL
        .iter()
        .flat_map(|kind| {
            kind.table().iter().map(move |entry| {
                vec![
                    kind.display_name().to_string(),
                    entry.code.to_string(),
                    entry.label.to_string(),
                    entry.color.to_string(),
                ]
            })
        })
        .collect()
}

pub fn execute(args: &LabelsArgs) -> anyhow::Result<()> {
    let headers = ["kind", "code", "label", "color"].map(String::from);
    let rows = match (args.kind, args.code) {
        (Some(kind), Some(code)) => {
            let mapped = label_of(kind, code);
            vec![vec![
                kind.display_name().to_string(),
                code.to_string(),
                mapped.label,
                mapped.color.unwrap_or_default().to_string(),
            ]]
        }
        (Some(kind), None) => label_table_rows()
            .into_iter()
            .filter(|row| row[0] == kind.display_name())
            .collect(),
        _ => label_table_rows(),
    };
    table::print_table(&headers, &rows);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_to_labels_and_colors() {
        assert_eq!(
            label_of(CategoryKind::Weather, 1),
            CategoryLabel {
                label: "Clear".to_string(),
                color: Some("#72BCD4")
            }
        );
        assert_eq!(label_of(CategoryKind::WorkingDay, 0).color, Some("#FF5733"));
        assert_eq!(label_of(CategoryKind::Season, 4).label, "Winter");
    }

    #[test]
    fn unmapped_codes_fall_back_to_kind_and_code() {
        let fallback = label_of(CategoryKind::Weather, 5);
        assert_eq!(fallback.label, "Weather 5");
        assert_eq!(fallback.color, None);
        assert_eq!(label_of(CategoryKind::WorkingDay, -1).label, "Workingday -1");
        assert_eq!(
            label_of(CategoryKind::Season, i64::MAX).label,
            format!("Season {}", i64::MAX)
        );
    }

    #[test]
    fn columns_are_recognised_with_suffixes() {
        assert_eq!(CategoryKind::for_column("weathersit_hour"), Some(CategoryKind::Weather));
        assert_eq!(CategoryKind::for_column("workingday_day"), Some(CategoryKind::WorkingDay));
        assert_eq!(CategoryKind::for_column("season"), Some(CategoryKind::Season));
        assert_eq!(CategoryKind::for_column("cnt"), None);
    }

    #[test]
    fn label_table_lists_every_entry() {
        assert_eq!(label_table_rows().len(), 10);
    }
}
