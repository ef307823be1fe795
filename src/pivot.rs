//! Month × category pivot of summed values.
//!
//! The builder works in two passes: long-form sums keyed by
//! `(MonthBucket, category)`, then a reshape into one row per month with one
//! cell per category column. Absent combinations are filled with zero.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use anyhow::{Context, anyhow};
use chrono::{Datelike, NaiveDate};
use log::{debug, info};
use serde::Serialize;

use crate::{
    cli::{PivotArgs, UniverseMode},
    data::{Value, format_number},
    error::Result,
    labels::CategoryKind,
    records::RecordTable,
    series::{self, AxisLimit},
    table,
};

/// Calendar month with no day component. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
}

impl MonthBucket {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Display label such as `January 2024`.
    pub fn label(&self) -> String {
        self.first_day()
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_else(|| self.key())
    }

    /// Sortable key such as `2024-01`.
    pub fn key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

impl fmt::Display for MonthBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Which categories become pivot columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CategoryUniverse {
    /// Only categories present in the rows handed to the builder, so a
    /// narrower date range can drop columns.
    #[default]
    Observed,
    /// A declared column set, kept even when a category has no rows in
    /// range. Observed categories outside it are appended after it.
    Fixed(Vec<Value>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotRow {
    pub month: MonthBucket,
    /// One cell per category column, aligned with [`MonthlyPivot::categories`].
    pub cells: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPivot {
    category_column: String,
    value_column: String,
    categories: Vec<Value>,
    rows: Vec<PivotRow>,
}

impl MonthlyPivot {
    pub fn category_column(&self) -> &str {
        &self.category_column
    }

    pub fn value_column(&self) -> &str {
        &self.value_column
    }

    pub fn categories(&self) -> &[Value] {
        &self.categories
    }

    pub fn rows(&self) -> &[PivotRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn months(&self) -> Vec<MonthBucket> {
        self.rows.iter().map(|row| row.month).collect()
    }

    /// Month labels in row order, one per row.
    pub fn tick_labels(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.month.label()).collect()
    }

    /// Every month's cell for `category`, or `None` if it is not a column.
    pub fn column(&self, category: &Value) -> Option<Vec<f64>> {
        let idx = self.categories.iter().position(|c| c == category)?;
        Some(self.rows.iter().map(|row| row.cells[idx]).collect())
    }

    pub fn month_total(&self, row: usize) -> Option<f64> {
        self.rows.get(row).map(|r| r.cells.iter().sum())
    }

    /// Largest cell in the pivot, 0 for an empty pivot.
    pub fn max_cell(&self) -> f64 {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter().copied())
            .fold(0.0, f64::max)
    }

    pub fn headers(&self) -> Vec<String> {
        std::iter::once("month".to_string())
            .chain(self.categories.iter().map(Value::as_display))
            .collect()
    }

    pub fn to_string_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                std::iter::once(row.month.key())
                    .chain(row.cells.iter().map(|cell| format_number(*cell)))
                    .collect()
            })
            .collect()
    }
}

/// Sums `value_column` per calendar month and `category_column` value.
///
/// Months without rows are absent from the result. Rows missing either the
/// category or the value contribute nothing.
pub fn monthly_pivot(
    table: &RecordTable,
    date_column: &str,
    category_column: &str,
    value_column: &str,
    universe: &CategoryUniverse,
) -> Result<MonthlyPivot> {
    let date_idx = table.require_column(date_column)?;
    let category_idx = table.require_column(category_column)?;
    let value_idx = table.require_numeric(value_column)?;

    let mut sums: BTreeMap<(MonthBucket, Value), f64> = BTreeMap::new();
    let mut months = BTreeSet::new();
    let mut observed = BTreeSet::new();
    for row in table.rows() {
        let Some(date) = row[date_idx].as_ref().and_then(Value::as_date) else {
            continue;
        };
        let (Some(category), Some(value)) = (
            row[category_idx].as_ref(),
            row[value_idx].as_ref().and_then(Value::as_f64),
        ) else {
            continue;
        };
        let month = MonthBucket::of(date);
        months.insert(month);
        observed.insert(category.clone());
        *sums.entry((month, category.clone())).or_insert(0.0) += value;
    }

    let categories = match universe {
        CategoryUniverse::Observed => observed.into_iter().collect::<Vec<_>>(),
        CategoryUniverse::Fixed(declared) => {
            let mut columns = Vec::with_capacity(declared.len());
            for category in declared {
                if !columns.contains(category) {
                    columns.push(category.clone());
                }
            }
            for category in observed {
                if !columns.contains(&category) {
                    columns.push(category);
                }
            }
            columns
        }
    };

    let rows = months
        .into_iter()
        .map(|month| PivotRow {
            month,
            cells: categories
                .iter()
                .map(|category| {
                    sums.get(&(month, category.clone()))
                        .copied()
                        .unwrap_or(0.0)
                })
                .collect(),
        })
        .collect::<Vec<_>>();
    debug!(
        "Pivoted {} by {} into {} month(s) and {} category column(s)",
        value_column,
        category_column,
        rows.len(),
        categories.len()
    );

    Ok(MonthlyPivot {
        category_column: category_column.to_string(),
        value_column: value_column.to_string(),
        categories,
        rows,
    })
}

pub fn execute(args: &PivotArgs) -> anyhow::Result<()> {
    let loaded = crate::load_dataset(&args.dataset)?;
    let selected = crate::select_range(&loaded, &args.range)?;
    let kind = args
        .kind
        .or_else(|| CategoryKind::for_column(&args.category));
    let universe = match args.universe {
        UniverseMode::Observed => CategoryUniverse::Observed,
        UniverseMode::Fixed => {
            let kind = kind.ok_or_else(|| {
                anyhow!(
                    "Column '{}' has no known category kind; pass --kind to use a fixed universe",
                    args.category
                )
            })?;
            CategoryUniverse::Fixed(kind.known_codes().into_iter().map(Value::Integer).collect())
        }
    };
    let pivot = monthly_pivot(
        &selected,
        selected.date_column(),
        &args.category,
        &args.value,
        &universe,
    )
    .with_context(|| format!("Pivoting '{}' by '{}'", args.value, args.category))?;

    if args.json {
        let title = format!("Rentals by {}", args.category);
        let chart = series::build_chart(&title, &pivot, kind, AxisLimit::DEFAULT_HEADROOM);
        println!(
            "{}",
            serde_json::to_string_pretty(&chart).context("Serializing chart series")?
        );
    } else {
        let headers = series::labelled_headers(&pivot, kind);
        table::print_table(&headers, &pivot.to_string_rows());
    }
    info!(
        "Pivoted {} month(s) across {} category column(s)",
        pivot.rows().len(),
        pivot.categories().len()
    );
    Ok(())
}
