//! Chart-ready series derived from a [`MonthlyPivot`].

use serde::Serialize;

use crate::{
    data::Value,
    labels::{CategoryKind, label_of},
    pivot::MonthlyPivot,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub x: String,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub category: String,
    pub label: String,
    pub color: Option<&'static str>,
    pub points: Vec<ChartPoint>,
}

/// How a chart's value axis is bounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisLimit {
    /// Left to the renderer.
    Auto,
    /// The largest cell scaled by `factor`.
    Headroom(f64),
    /// A fixed maximum with a major tick every `step`.
    Fixed { max: f64, step: f64 },
}

impl AxisLimit {
    pub const DEFAULT_HEADROOM: AxisLimit = AxisLimit::Headroom(1.1);

    /// Resolved `(y_max, y_tick_step)` for `pivot`.
    fn resolve(self, pivot: &MonthlyPivot) -> (Option<f64>, Option<f64>) {
        match self {
            AxisLimit::Auto => (None, None),
            AxisLimit::Headroom(factor) => (Some(pivot.max_cell() * factor), None),
            AxisLimit::Fixed { max, step } => (Some(max), Some(step)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub legend_title: String,
    pub y_max: Option<f64>,
    pub y_tick_step: Option<f64>,
    pub series: Vec<ChartSeries>,
}

/// One series per pivot column, x values being the month tick labels.
///
/// With a `kind`, integral category codes are labelled through
/// [`label_of`]; otherwise the raw category text is the label.
pub fn build_series(pivot: &MonthlyPivot, kind: Option<CategoryKind>) -> Vec<ChartSeries> {
    let ticks = pivot.tick_labels();
    pivot
        .categories()
        .iter()
        .enumerate()
        .map(|(idx, category)| {
            let (label, color) = category_label(category, kind);
            ChartSeries {
                category: category.as_display(),
                label,
                color,
                points: ticks
                    .iter()
                    .zip(pivot.rows())
                    .map(|(tick, row)| ChartPoint {
                        x: tick.clone(),
                        y: row.cells[idx],
                    })
                    .collect(),
            }
        })
        .collect()
}

/// Wraps the series of `pivot` with axis titles, a legend title and the
/// value-axis bound given by `limit`.
pub fn build_chart(
    title: &str,
    pivot: &MonthlyPivot,
    kind: Option<CategoryKind>,
    limit: AxisLimit,
) -> Chart {
    let (y_max, y_tick_step) = limit.resolve(pivot);
    Chart {
        title: title.to_string(),
        x_label: "Month".to_string(),
        y_label: format!("Number of Rentals ({})", pivot.value_column()),
        legend_title: kind
            .map(|kind| kind.legend_title().to_string())
            .unwrap_or_else(|| pivot.category_column().to_string()),
        y_max,
        y_tick_step,
        series: build_series(pivot, kind),
    }
}

/// Pivot headers with each category code followed by its display label.
pub fn labelled_headers(pivot: &MonthlyPivot, kind: Option<CategoryKind>) -> Vec<String> {
    std::iter::once("month".to_string())
        .chain(pivot.categories().iter().map(|category| {
            let (label, _) = category_label(category, kind);
            format!("{category} ({label})")
        }))
        .collect()
}

/// Display label and color of a pivot category.
pub fn category_label(
    category: &Value,
    kind: Option<CategoryKind>,
) -> (String, Option<&'static str>) {
    match (kind, category.as_code()) {
        (Some(kind), Some(code)) => {
            let mapped = label_of(kind, code);
            (mapped.label, mapped.color)
        }
        _ => (category.as_display(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::ColumnKind,
        pivot::{CategoryUniverse, monthly_pivot},
        records::RecordTable,
    };
    use chrono::NaiveDate;

    fn pivot() -> MonthlyPivot {
        let rows = [((2024, 1, 5), 1, 10), ((2024, 1, 20), 5, 5), ((2024, 2, 1), 1, 7)]
            .into_iter()
            .map(|((y, m, d), w, c)| {
                vec![
                    Some(Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())),
                    Some(Value::Integer(w)),
                    Some(Value::Integer(c)),
                ]
            })
            .collect();
        let table = RecordTable::new(
            vec!["dteday".into(), "weathersit".into(), "cnt".into()],
            vec![ColumnKind::Date, ColumnKind::Integer, ColumnKind::Integer],
            rows,
            "dteday",
        )
        .unwrap();
        monthly_pivot(&table, "dteday", "weathersit", "cnt", &CategoryUniverse::Observed).unwrap()
    }

    #[test]
    fn series_follow_pivot_columns_and_ticks() {
        let series = build_series(&pivot(), Some(CategoryKind::Weather));
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label, "Clear");
        assert_eq!(series[0].color, Some("#72BCD4"));
        assert_eq!(
            series[0].points,
            vec![
                ChartPoint { x: "January 2024".into(), y: 10.0 },
                ChartPoint { x: "February 2024".into(), y: 7.0 },
            ]
        );
        assert_eq!(series[1].label, "Weather 5");
        assert_eq!(series[1].color, None);
    }

    #[test]
    fn unlabelled_series_use_raw_category_text() {
        let series = build_series(&pivot(), None);
        assert_eq!(series[0].label, "1");
    }

    #[test]
    fn headers_pair_codes_with_labels() {
        let headers = labelled_headers(&pivot(), Some(CategoryKind::Weather));
        assert_eq!(headers, vec!["month", "1 (Clear)", "5 (Weather 5)"]);
    }

    #[test]
    fn chart_headroom_is_ten_percent() {
        let chart = build_chart(
            "Rentals by weather",
            &pivot(),
            Some(CategoryKind::Weather),
            AxisLimit::DEFAULT_HEADROOM,
        );
        assert!((chart.y_max.unwrap() - 11.0).abs() < 1e-9);
        assert_eq!(chart.y_tick_step, None);
        assert_eq!(chart.y_label, "Number of Rentals (cnt)");
        assert_eq!(chart.legend_title, "Weather Type");
    }

    #[test]
    fn fixed_and_auto_limits_ignore_the_data() {
        let fixed = build_chart(
            "Rentals by working day",
            &pivot(),
            Some(CategoryKind::WorkingDay),
            AxisLimit::Fixed { max: 4_000_000.0, step: 1_000_000.0 },
        );
        assert_eq!(fixed.y_max, Some(4_000_000.0));
        assert_eq!(fixed.y_tick_step, Some(1_000_000.0));
        assert_eq!(fixed.legend_title, "Working Day Status");

        let auto = build_chart("Rentals", &pivot(), None, AxisLimit::Auto);
        assert_eq!(auto.y_max, None);
        assert_eq!(auto.legend_title, "weathersit");
    }
}
