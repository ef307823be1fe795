//! Inclusive date-range filtering.

use anyhow::Context;
use chrono::NaiveDate;
use log::info;
use serde::Serialize;

use crate::{
    cli::FilterArgs,
    error::{ExplorerError, Result},
    io_utils,
    records::RecordTable,
    table,
};

/// Inclusive `[start, end]` range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Rejects `start > end` instead of swapping the bounds.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(ExplorerError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The full `[min, max]` domain of `table`; `None` when it has no rows.
    pub fn full(table: &RecordTable) -> Option<Self> {
        table
            .date_bounds()
            .map(|(start, end)| Self { start, end })
    }

    /// Resolves optional bounds against the table domain, defaulting each
    /// missing side to the table's min/max date.
    pub fn resolve(
        table: &RecordTable,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Option<Self>> {
        let Some(full) = Self::full(table) else {
            return match (start, end) {
                (Some(start), Some(end)) => Self::new(start, end).map(Some),
                _ => Ok(None),
            };
        };
        Self::new(start.unwrap_or(full.start), end.unwrap_or(full.end)).map(Some)
    }

    /// Narrows the range to the table domain. A range lying entirely outside
    /// the domain stays as it is and simply selects no rows.
    pub fn clamp_to(self, table: &RecordTable) -> Self {
        match Self::full(table) {
            Some(full) if self.start <= full.end && self.end >= full.start => Self {
                start: self.start.max(full.start),
                end: self.end.min(full.end),
            },
            _ => self,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Rows of `table` whose calendar date lies within `range`, in their
/// original order. The input table is left untouched.
pub fn filter_range(table: &RecordTable, range: &DateRange) -> RecordTable {
    let kept = (0..table.len()).filter(|idx| table.date_of(*idx).is_some_and(|d| range.contains(d)));
    table.select(kept)
}

pub fn execute(args: &FilterArgs) -> anyhow::Result<()> {
    let loaded = crate::load_dataset(&args.dataset)?;
    let filtered = crate::select_range(&loaded, &args.range)?;
    match &args.output {
        Some(path) => {
            let mut writer = io_utils::open_csv_writer(Some(path), io_utils::DEFAULT_CSV_DELIMITER)?;
            writer
                .write_record(filtered.headers())
                .context("Writing CSV header")?;
            for row in filtered.to_string_rows() {
                writer.write_record(&row).context("Writing CSV row")?;
            }
            writer.flush().context("Flushing CSV output")?;
        }
        None => table::print_table(filtered.headers(), &filtered.to_string_rows()),
    }
    info!(
        "Kept {} of {} row(s) within the selected date range",
        filtered.len(),
        loaded.len()
    );
    Ok(())
}
