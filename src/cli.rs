use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{aggregate::Statistic, config::DatasetKind, data, labels::CategoryKind};

#[derive(Debug, Parser)]
#[command(author, version, about = "Explore bike-sharing usage datasets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the first few rows of a dataset
    Preview(PreviewArgs),
    /// Descriptive statistics for every column of a dataset
    Describe(DescribeArgs),
    /// Rows whose date falls in an inclusive range
    Filter(FilterArgs),
    /// Grouped sum/mean/max/min/std of a numeric column
    Aggregate(AggregateArgs),
    /// Monthly totals of a value column split by a category column
    Pivot(PivotArgs),
    /// Show category labels and colors
    Labels(LabelsArgs),
    /// Compute every dashboard view over the configured datasets
    Report(ReportArgs),
}

#[derive(Debug, Clone, Args)]
pub struct DatasetArgs {
    /// CSV file to load directly
    #[arg(short = 'i', long = "input", conflicts_with = "dataset")]
    pub input: Option<PathBuf>,
    /// Configured dataset to load (defaults to day)
    #[arg(long, value_enum)]
    pub dataset: Option<DatasetKind>,
    /// Dashboard configuration file (YAML)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Name of the date column (defaults to the config value or `dteday`)
    #[arg(long = "date-column")]
    pub date_column: Option<String>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct RangeArgs {
    /// First date to include (defaults to the earliest date in the data)
    #[arg(long, value_parser = parse_date)]
    pub start: Option<NaiveDate>,
    /// Last date to include (defaults to the latest date in the data)
    #[arg(long, value_parser = parse_date)]
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
}

#[derive(Debug, Args)]
pub struct DescribeArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    /// Report whether this column holds unique values
    #[arg(long)]
    pub unique: Option<String>,
    /// Number of sample rows printed ahead of the statistics
    #[arg(long, default_value_t = 5)]
    pub sample: usize,
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    #[command(flatten)]
    pub range: RangeArgs,
    /// Write matching rows as CSV to this file (`-` for stdout) instead of a table
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct AggregateArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    #[command(flatten)]
    pub range: RangeArgs,
    /// Columns to group by
    #[arg(short = 'g', long = "group", required = true, value_delimiter = ',')]
    pub group: Vec<String>,
    /// Numeric column to aggregate
    #[arg(long)]
    pub value: String,
    /// Statistics to compute
    #[arg(long, value_enum, value_delimiter = ',', default_values_t = Statistic::ALL)]
    pub stats: Vec<Statistic>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum UniverseMode {
    /// Columns for categories present in the selected range only
    #[default]
    Observed,
    /// Columns for every labelled code of the category kind
    Fixed,
}

#[derive(Debug, Args)]
pub struct PivotArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    #[command(flatten)]
    pub range: RangeArgs,
    /// Category column that becomes the pivot columns
    #[arg(long)]
    pub category: String,
    /// Numeric column summed per month and category
    #[arg(long)]
    pub value: String,
    /// Category kind used for labels (inferred from the column name if omitted)
    #[arg(long, value_enum)]
    pub kind: Option<CategoryKind>,
    /// Which categories become columns
    #[arg(long, value_enum, default_value = "observed")]
    pub universe: UniverseMode,
    /// Emit labelled chart series as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct LabelsArgs {
    /// Restrict output to one category kind
    #[arg(long, value_enum)]
    pub kind: Option<CategoryKind>,
    /// Look up a single code (requires --kind)
    #[arg(long, requires = "kind", allow_hyphen_values = true)]
    pub code: Option<i64>,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Dashboard configuration file (YAML)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Datasets to load (defaults to all three)
    #[arg(long = "datasets", value_enum, value_delimiter = ',')]
    pub datasets: Vec<DatasetKind>,
    #[command(flatten)]
    pub range: RangeArgs,
    /// CSV delimiter character
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input files (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Emit the report as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    data::parse_date_arg(value).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_delimiter_accepts_names_and_single_chars() {
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert_eq!(parse_delimiter(";"), Ok(b';'));
        assert!(parse_delimiter("ab").is_err());
        assert!(parse_delimiter("").is_err());
    }

    #[test]
    fn aggregate_defaults_to_every_statistic() {
        let cli = Cli::try_parse_from([
            "bikeshare-explorer",
            "aggregate",
            "-i",
            "day.csv",
            "-g",
            "season,weathersit",
            "--value",
            "cnt",
        ])
        .unwrap();
        let Commands::Aggregate(args) = cli.command else {
            panic!("expected aggregate command");
        };
        assert_eq!(args.group, vec!["season", "weathersit"]);
        assert_eq!(args.stats, Statistic::ALL.to_vec());
    }

    #[test]
    fn input_and_dataset_conflict() {
        let result = Cli::try_parse_from([
            "bikeshare-explorer",
            "preview",
            "-i",
            "day.csv",
            "--dataset",
            "hour",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn invalid_dates_are_rejected_at_parse_time() {
        let result = Cli::try_parse_from([
            "bikeshare-explorer",
            "filter",
            "-i",
            "day.csv",
            "--start",
            "someday",
        ]);
        assert!(result.is_err());
    }
}
