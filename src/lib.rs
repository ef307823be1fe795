pub mod aggregate;
pub mod cli;
pub mod config;
pub mod context;
pub mod data;
pub mod error;
pub mod filter;
pub mod io_utils;
pub mod labels;
pub mod loader;
pub mod pivot;
pub mod preview;
pub mod records;
pub mod report;
pub mod series;
pub mod stats;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{Cli, Commands, DatasetArgs, RangeArgs},
    config::{DashboardConfig, DatasetKind},
    filter::DateRange,
    loader::{DEFAULT_DATE_COLUMN, LoadOptions},
    records::RecordTable,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("bikeshare_explorer", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Preview(args) => preview::execute(&args),
        Commands::Describe(args) => stats::execute(&args),
        Commands::Filter(args) => filter::execute(&args),
        Commands::Aggregate(args) => aggregate::execute(&args),
        Commands::Pivot(args) => pivot::execute(&args),
        Commands::Labels(args) => labels::execute(&args),
        Commands::Report(args) => report::execute(&args),
    }
}

/// Loads the table selected by `args`: an explicit `--input` file, or a
/// configured dataset (day when none is named).
pub(crate) fn load_dataset(args: &DatasetArgs) -> Result<RecordTable> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let (path, configured_date_column) = match &args.input {
        Some(path) => (path.clone(), None),
        None => {
            let config = load_config(args.config.as_deref())?;
            let kind = args.dataset.unwrap_or(DatasetKind::Day);
            (config.path_for(kind), Some(config.date_column))
        }
    };
    let date_column = args
        .date_column
        .clone()
        .or(configured_date_column)
        .unwrap_or_else(|| DEFAULT_DATE_COLUMN.to_string());
    info!(
        "Loading '{}' with delimiter '{}'",
        path.display(),
        printable_delimiter(io_utils::resolve_input_delimiter(&path, args.delimiter))
    );
    let options = LoadOptions {
        date_column,
        delimiter: args.delimiter,
        encoding,
    };
    loader::load_table(&path, &options).with_context(|| format!("Loading dataset {path:?}"))
}

pub(crate) fn load_config(path: Option<&std::path::Path>) -> Result<DashboardConfig> {
    match path {
        Some(path) => {
            DashboardConfig::load(path).with_context(|| format!("Loading config from {path:?}"))
        }
        None => Ok(DashboardConfig::default()),
    }
}

/// The inclusive range requested on the command line, defaulted to and
/// clamped within the table's own bounds. `None` only for an empty table with
/// no explicit range.
pub(crate) fn resolve_range(table: &RecordTable, args: &RangeArgs) -> Result<Option<DateRange>> {
    let range = DateRange::resolve(table, args.start, args.end)
        .context("Resolving date range")?
        .map(|range| range.clamp_to(table));
    if let Some(range) = &range {
        debug!("Using date range {} to {}", range.start(), range.end());
    }
    Ok(range)
}

/// Applies the requested range to `table`.
pub(crate) fn select_range(table: &RecordTable, args: &RangeArgs) -> Result<RecordTable> {
    Ok(match resolve_range(table, args)? {
        Some(range) => filter::filter_range(table, &range),
        None => table.clone(),
    })
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        other => (other as char).to_string(),
    }
}
