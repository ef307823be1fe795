//! In-memory record table.
//!
//! A [`RecordTable`] owns typed rows plus the position of its designated date
//! column. Tables are never mutated once built; filtering produces a new
//! table sharing no state with its source.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::{
    data::{ColumnKind, Value},
    error::{ExplorerError, Result},
};

pub type Row = Vec<Option<Value>>;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordTable {
    headers: Vec<String>,
    kinds: Vec<ColumnKind>,
    rows: Vec<Row>,
    /// Cell text as read from the source, aligned with `rows`.
    source: Vec<Vec<String>>,
    date_column: usize,
}

impl RecordTable {
    /// Builds a table from already-typed rows.
    ///
    /// Every row must hold a temporal value in `date_column`; rows are stably
    /// sorted by that date so the row index is contiguous and ascending.
    pub fn new(
        headers: Vec<String>,
        kinds: Vec<ColumnKind>,
        rows: Vec<Row>,
        date_column: &str,
    ) -> Result<Self> {
        let source = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.as_ref().map(Value::as_display).unwrap_or_default())
                    .collect()
            })
            .collect();
        Self::with_source(headers, kinds, rows, source, date_column)
    }

    /// Like [`RecordTable::new`], keeping `source` as the text of each cell
    /// for pass-through output. `source` must have one entry per row.
    pub(crate) fn with_source(
        headers: Vec<String>,
        kinds: Vec<ColumnKind>,
        rows: Vec<Row>,
        source: Vec<Vec<String>>,
        date_column: &str,
    ) -> Result<Self> {
        let date_idx = headers
            .iter()
            .position(|h| h == date_column)
            .ok_or_else(|| ExplorerError::MissingColumn(date_column.to_string()))?;
        for (row_idx, row) in rows.iter().enumerate() {
            let cell = row.get(date_idx).and_then(|v| v.as_ref());
            if cell.and_then(Value::as_date).is_none() {
                return Err(ExplorerError::InvalidDate {
                    column: date_column.to_string(),
                    row: row_idx + 1,
                    value: cell.map(Value::as_display).unwrap_or_default(),
                });
            }
        }
        let mut paired = rows.into_iter().zip(source).collect::<Vec<_>>();
        paired.sort_by(|a, b| a.0[date_idx].cmp(&b.0[date_idx]));
        let (rows, source) = paired.into_iter().unzip();
        Ok(Self {
            headers,
            kinds,
            rows,
            source,
            date_column: date_idx,
        })
    }

    /// A table with the same columns holding the rows at `indices`, which
    /// must be ascending.
    pub(crate) fn select(&self, indices: impl IntoIterator<Item = usize>) -> Self {
        let (rows, source) = indices
            .into_iter()
            .map(|idx| (self.rows[idx].clone(), self.source[idx].clone()))
            .unzip();
        Self {
            headers: self.headers.clone(),
            kinds: self.kinds.clone(),
            rows,
            source,
            date_column: self.date_column,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn kinds(&self) -> &[ColumnKind] {
        &self.kinds
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn date_column(&self) -> &str {
        &self.headers[self.date_column]
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| ExplorerError::MissingColumn(name.to_string()))
    }

    /// Index of `name`, which must be an integer or float column.
    pub fn require_numeric(&self, name: &str) -> Result<usize> {
        let idx = self.require_column(name)?;
        if self.kinds[idx].is_numeric() {
            Ok(idx)
        } else {
            Err(ExplorerError::NonNumericColumn(name.to_string()))
        }
    }

    pub fn column_kind(&self, idx: usize) -> Option<ColumnKind> {
        self.kinds.get(idx).copied()
    }

    pub fn value(&self, row: usize, column: usize) -> Option<&Value> {
        self.rows.get(row)?.get(column)?.as_ref()
    }

    pub fn numeric(&self, row: usize, column: usize) -> Option<f64> {
        self.value(row, column).and_then(Value::as_f64)
    }

    /// Calendar date of row `row`.
    pub fn date_of(&self, row: usize) -> Option<NaiveDate> {
        self.value(row, self.date_column).and_then(Value::as_date)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.rows.len()).filter_map(|idx| self.date_of(idx))
    }

    /// Earliest and latest dates, or `None` for an empty table.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.date_of(0)?;
        let last = self.date_of(self.rows.len() - 1)?;
        Some((first, last))
    }

    /// True when no two present values in `column` are equal.
    pub fn is_unique(&self, column: &str) -> Result<bool> {
        let idx = self.require_column(column)?;
        let mut seen = HashSet::with_capacity(self.rows.len());
        for row in &self.rows {
            if let Some(value) = &row[idx]
                && !seen.insert(value.as_display())
            {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn head(&self, count: usize) -> RecordTable {
        self.select(0..count.min(self.rows.len()))
    }

    /// Rows as their source text, missing cells included verbatim.
    pub fn to_string_rows(&self) -> Vec<Vec<String>> {
        self.source.clone()
    }
}
