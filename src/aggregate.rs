//! Grouped aggregation of a numeric column.
//!
//! Rows are bucketed by the values of one or more key columns and each group
//! accumulates running totals in a [`GroupAccumulator`]. Groups come back in
//! ascending key order.

use std::{collections::BTreeMap, fmt};

use anyhow::Context;
use clap::ValueEnum;
use itertools::Itertools;
use log::{debug, info};
use serde::Serialize;

use crate::{
    cli::AggregateArgs,
    data::{Value, format_number},
    error::{ExplorerError, Result},
    records::RecordTable,
    table,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    Sum,
    Mean,
    Max,
    Min,
    Std,
}

impl Statistic {
    pub const ALL: [Statistic; 5] = [
        Statistic::Sum,
        Statistic::Mean,
        Statistic::Max,
        Statistic::Min,
        Statistic::Std,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Statistic::Sum => "sum",
            Statistic::Mean => "mean",
            Statistic::Max => "max",
            Statistic::Min => "min",
            Statistic::Std => "std",
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Output column name pairing a statistic with its source column.
pub fn stat_column_name(value_column: &str, stat: Statistic) -> String {
    format!("{value_column}_{stat}")
}

#[derive(Debug, Clone, Default)]
struct GroupAccumulator {
    count: usize,
    sum: f64,
    sum_squares: f64,
    min: Option<f64>,
    max: Option<f64>,
}

impl GroupAccumulator {
    fn add(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.sum_squares += value * value;
        self.min = Some(self.min.map_or(value, |current| current.min(value)));
        self.max = Some(self.max.map_or(value, |current| current.max(value)));
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    /// Sample standard deviation; a single observation has no spread.
    fn std_dev(&self) -> Option<f64> {
        match self.count {
            0 => None,
            1 => Some(0.0),
            n => {
                let mean = self.sum / n as f64;
                let variance = (self.sum_squares - n as f64 * mean * mean) / (n as f64 - 1.0);
                Some(variance.max(0.0).sqrt())
            }
        }
    }

    fn statistic(&self, stat: Statistic) -> Option<f64> {
        match stat {
            Statistic::Sum => Some(self.sum),
            Statistic::Mean => self.mean(),
            Statistic::Max => self.max,
            Statistic::Min => self.min,
            Statistic::Std => self.std_dev(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRow {
    pub key: Vec<Value>,
    /// One entry per requested statistic, in request order.
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedAggregate {
    key_columns: Vec<String>,
    value_column: String,
    stats: Vec<Statistic>,
    groups: Vec<GroupRow>,
}

impl GroupedAggregate {
    pub fn key_columns(&self) -> &[String] {
        &self.key_columns
    }

    pub fn value_column(&self) -> &str {
        &self.value_column
    }

    pub fn stats(&self) -> &[Statistic] {
        &self.stats
    }

    pub fn groups(&self) -> &[GroupRow] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn headers(&self) -> Vec<String> {
        self.key_columns
            .iter()
            .cloned()
            .chain(
                self.stats
                    .iter()
                    .map(|stat| stat_column_name(&self.value_column, *stat)),
            )
            .collect()
    }

    /// Statistic `stat` for the group keyed by `key`.
    pub fn get(&self, key: &[Value], stat: Statistic) -> Option<f64> {
        let position = self.stats.iter().position(|s| *s == stat)?;
        self.groups
            .iter()
            .find(|group| group.key == key)
            .and_then(|group| group.values[position])
    }

    pub fn to_string_rows(&self) -> Vec<Vec<String>> {
        self.groups
            .iter()
            .map(|group| {
                group
                    .key
                    .iter()
                    .map(Value::as_display)
                    .chain(
                        group
                            .values
                            .iter()
                            .map(|v| v.map(format_number).unwrap_or_default()),
                    )
                    .collect()
            })
            .collect()
    }
}

/// Computes `stats` of `value_column` for every distinct `group_keys`
/// combination in `table`.
///
/// Rows with a missing key cell form no group; missing values are skipped.
pub fn aggregate(
    table: &RecordTable,
    group_keys: &[String],
    value_column: &str,
    stats: &[Statistic],
) -> Result<GroupedAggregate> {
    if group_keys.is_empty() {
        return Err(ExplorerError::NoGroupKeys);
    }
    let stats: Vec<Statistic> = stats.iter().copied().unique().collect();
    if stats.is_empty() {
        return Err(ExplorerError::NoStatistics);
    }
    let key_indices = group_keys
        .iter()
        .map(|name| table.require_column(name))
        .collect::<Result<Vec<_>>>()?;
    let value_idx = table.require_numeric(value_column)?;

    let mut accumulators: BTreeMap<Vec<Value>, GroupAccumulator> = BTreeMap::new();
    for row in table.rows() {
        let Some(key) = key_indices
            .iter()
            .map(|idx| row[*idx].clone())
            .collect::<Option<Vec<_>>>()
        else {
            continue;
        };
        let accumulator = accumulators.entry(key).or_default();
        if let Some(value) = row[value_idx].as_ref().and_then(Value::as_f64) {
            accumulator.add(value);
        }
    }
    debug!(
        "Aggregated {} row(s) into {} group(s) by {:?}",
        table.len(),
        accumulators.len(),
        group_keys
    );

    let groups = accumulators
        .into_iter()
        .map(|(key, acc)| GroupRow {
            key,
            values: stats.iter().map(|stat| acc.statistic(*stat)).collect(),
        })
        .collect();
    Ok(GroupedAggregate {
        key_columns: group_keys.to_vec(),
        value_column: value_column.to_string(),
        stats,
        groups,
    })
}

pub fn execute(args: &AggregateArgs) -> anyhow::Result<()> {
    let loaded = crate::load_dataset(&args.dataset)?;
    let selected = crate::select_range(&loaded, &args.range)?;
    let result = aggregate(&selected, &args.group, &args.value, &args.stats)
        .with_context(|| format!("Aggregating '{}' by {:?}", args.value, args.group))?;
    table::print_table(&result.headers(), &result.to_string_rows());
    info!(
        "Computed {} statistic(s) for {} group(s)",
        result.stats().len(),
        result.len()
    );
    Ok(())
}
