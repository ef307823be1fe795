//! Descriptive statistics over every column of a table.

use std::collections::HashMap;

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;

use crate::{
    cli::DescribeArgs,
    data::{ColumnKind, Value, format_number},
    records::RecordTable,
    table,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub kind: ColumnKind,
    pub count: usize,
    pub unique: usize,
    /// Most frequent value of a text column and its count.
    pub top: Option<(String, usize)>,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<Value>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<Value>,
}

const SUMMARY_HEADERS: [&str; 13] = [
    "column", "type", "count", "unique", "top", "freq", "mean", "std", "min", "25%", "50%", "75%",
    "max",
];

impl ColumnSummary {
    pub fn render_row(&self) -> Vec<String> {
        let metric = |v: Option<f64>| v.map(format_number).unwrap_or_default();
        let value = |v: &Option<Value>| v.as_ref().map(Value::as_display).unwrap_or_default();
        vec![
            self.name.clone(),
            self.kind.to_string(),
            self.count.to_string(),
            self.unique.to_string(),
            self.top.as_ref().map(|(v, _)| v.clone()).unwrap_or_default(),
            self.top.as_ref().map(|(_, n)| n.to_string()).unwrap_or_default(),
            metric(self.mean),
            metric(self.std_dev),
            value(&self.min),
            metric(self.q25),
            metric(self.median),
            metric(self.q75),
            value(&self.max),
        ]
    }
}

pub fn summary_headers() -> Vec<String> {
    SUMMARY_HEADERS.iter().map(|h| h.to_string()).collect()
}

pub fn describe(table: &RecordTable) -> Vec<ColumnSummary> {
    table
        .headers()
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let kind = table.column_kind(idx).unwrap_or(ColumnKind::Text);
            let mut stats = ColumnStats::default();
            for row in table.rows() {
                if let Some(value) = &row[idx] {
                    stats.add_value(value);
                }
            }
            stats.summarize(name, kind)
        })
        .collect()
}

#[derive(Default)]
struct ColumnStats {
    count: usize,
    frequencies: HashMap<String, usize>,
    numbers: Vec<f64>,
    min: Option<Value>,
    max: Option<Value>,
}

impl ColumnStats {
    fn add_value(&mut self, value: &Value) {
        self.count += 1;
        *self.frequencies.entry(value.as_display()).or_insert(0) += 1;
        if let Some(number) = value.as_f64() {
            self.numbers.push(number);
        }
        if self.min.as_ref().is_none_or(|current| value < current) {
            self.min = Some(value.clone());
        }
        if self.max.as_ref().is_none_or(|current| value > current) {
            self.max = Some(value.clone());
        }
    }

    fn summarize(mut self, name: &str, kind: ColumnKind) -> ColumnSummary {
        self.numbers.sort_by(f64::total_cmp);
        let numeric = kind.is_numeric();
        let top = (kind == ColumnKind::Text)
            .then(|| {
                self.frequencies
                    .iter()
                    .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
                    .map(|(value, count)| (value.clone(), *count))
            })
            .flatten();
        let (min, max) = if kind == ColumnKind::Text {
            (None, None)
        } else {
            (self.min, self.max)
        };
        ColumnSummary {
            name: name.to_string(),
            kind,
            count: self.count,
            unique: self.frequencies.len(),
            top,
            mean: numeric.then(|| mean(&self.numbers)).flatten(),
            std_dev: numeric.then(|| sample_std(&self.numbers)).flatten(),
            min,
            q25: numeric.then(|| quantile(&self.numbers, 0.25)).flatten(),
            median: numeric.then(|| quantile(&self.numbers, 0.5)).flatten(),
            q75: numeric.then(|| quantile(&self.numbers, 0.75)).flatten(),
            max,
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() as f64 - 1.0);
    Some(variance.sqrt())
}

/// Linear-interpolated quantile of already sorted `values`.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

pub fn execute(args: &DescribeArgs) -> Result<()> {
    let table = crate::load_dataset(&args.dataset)?;
    let summaries = describe(&table);
    let rows = summaries
        .iter()
        .map(ColumnSummary::render_row)
        .collect::<Vec<_>>();
    let uniqueness = match &args.unique {
        Some(column) => Some(
            table
                .is_unique(column)
                .with_context(|| format!("Checking uniqueness of '{column}'"))?,
        ),
        None => None,
    };

    let sample = table.head(args.sample);
    if !sample.is_empty() {
        table::print_table(sample.headers(), &sample.to_string_rows());
        println!();
    }
    table::print_table(&summary_headers(), &rows);
    if let (Some(column), Some(unique)) = (&args.unique, uniqueness) {
        println!("\n{column} is unique: {unique}");
    }
    info!(
        "Described {} column(s) over {} row(s)",
        summaries.len(),
        table.len()
    );
    Ok(())
}
