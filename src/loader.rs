//! Dataset loader: CSV source → typed, date-sorted [`RecordTable`].

use std::path::Path;

use encoding_rs::{Encoding, UTF_8};
use log::{debug, info};

use crate::{
    data::{self, ColumnKind},
    error::{ExplorerError, Result},
    io_utils,
    records::RecordTable,
};

pub const DEFAULT_DATE_COLUMN: &str = "dteday";

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub date_column: String,
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            delimiter: None,
            encoding: UTF_8,
        }
    }
}

impl LoadOptions {
    pub fn with_date_column(mut self, column: impl Into<String>) -> Self {
        self.date_column = column.into();
        self
    }
}

/// Reads `path` in full, infers column kinds and sorts by the date column.
///
/// Either the whole table loads or an error is returned; a partially read
/// source never escapes.
pub fn load_table(path: &Path, options: &LoadOptions) -> Result<RecordTable> {
    let delimiter = io_utils::resolve_input_delimiter(path, options.delimiter);
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
    let headers = io_utils::reader_headers(&mut reader, options.encoding, path)?;
    let date_idx = headers
        .iter()
        .position(|h| h == &options.date_column)
        .ok_or_else(|| ExplorerError::MissingColumn(options.date_column.clone()))?;

    let mut raw_rows = Vec::new();
    for record in reader.byte_records() {
        let record = record.map_err(|source| ExplorerError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        raw_rows.push(io_utils::decode_record(&record, options.encoding, path)?);
    }
    debug!("Read {} raw row(s) from {:?}", raw_rows.len(), path);

    let mut kinds = infer_kinds(headers.len(), &raw_rows);
    if raw_rows.is_empty() {
        kinds[date_idx] = ColumnKind::Date;
    } else if !kinds[date_idx].is_temporal() {
        return Err(first_bad_date(&options.date_column, date_idx, &raw_rows));
    }

    let rows = raw_rows
        .iter()
        .map(|raw| {
            raw.iter()
                .zip(&kinds)
                .map(|(cell, kind)| data::parse_typed_value(cell, *kind))
                .collect()
        })
        .collect();
    let table = RecordTable::with_source(headers, kinds, rows, raw_rows, &options.date_column)?;
    info!(
        "Loaded {} row(s) and {} column(s) from {:?}",
        table.len(),
        table.headers().len(),
        path
    );
    Ok(table)
}

fn infer_kinds(width: usize, rows: &[Vec<String>]) -> Vec<ColumnKind> {
    let mut kinds: Vec<Option<ColumnKind>> = vec![None; width];
    for row in rows {
        for (kind, cell) in kinds.iter_mut().zip(row) {
            if data::is_missing(cell) {
                continue;
            }
            *kind = Some(ColumnKind::widen(*kind, cell.trim()));
        }
    }
    kinds
        .into_iter()
        .map(|kind| kind.unwrap_or(ColumnKind::Text))
        .collect()
}

fn first_bad_date(column: &str, idx: usize, rows: &[Vec<String>]) -> ExplorerError {
    let (row, value) = rows
        .iter()
        .enumerate()
        .find(|(_, raw)| {
            let cell = raw[idx].trim();
            data::parse_naive_date(cell).is_none() && data::parse_naive_datetime(cell).is_none()
        })
        .map(|(row, raw)| (row + 1, raw[idx].clone()))
        .unwrap_or((0, String::new()));
    ExplorerError::InvalidDate {
        column: column.to_string(),
        row,
        value,
    }
}
