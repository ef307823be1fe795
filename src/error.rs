//! Error type shared by the data-shaping core.
//!
//! Only loading can fail hard. An empty date range and an unmapped category
//! code are ordinary outcomes and have no variant here.

use std::{io, path::PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

pub type Result<T, E = ExplorerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("source {path:?} not found or unreadable")]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed CSV in {path:?}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("failed to decode {path:?} as {encoding}")]
    Decode { path: PathBuf, encoding: &'static str },
    #[error("column '{0}' not found")]
    MissingColumn(String),
    #[error("column '{column}' row {row}: cannot parse '{value}' as a date")]
    InvalidDate {
        column: String,
        row: usize,
        value: String,
    },
    #[error("'{0}' is not a recognised date")]
    InvalidDateArgument(String),
    #[error("column '{0}' does not hold numeric values")]
    NonNumericColumn(String),
    #[error("start date {start} is after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("at least one group key is required")]
    NoGroupKeys,
    #[error("at least one statistic is required")]
    NoStatistics,
    #[error("invalid dashboard config {path:?}: {message}")]
    Config { path: PathBuf, message: String },
}
