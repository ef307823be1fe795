//! Session context owning the loaded datasets.
//!
//! A [`DashboardContext`] is built once at startup and passed by reference to
//! every handler. Tables are read-only after load.

use std::collections::BTreeMap;

use log::info;

use crate::{
    config::{DashboardConfig, DatasetKind},
    error::Result,
    loader::{LoadOptions, load_table},
    records::RecordTable,
};

#[derive(Debug, Clone)]
pub struct DashboardContext {
    date_column: String,
    tables: BTreeMap<DatasetKind, RecordTable>,
}

impl DashboardContext {
    /// Loads every dataset in `kinds`. The first failure aborts the whole
    /// context so no handler ever sees a partial session.
    pub fn load(config: &DashboardConfig, kinds: &[DatasetKind], options: &LoadOptions) -> Result<Self> {
        let options = options.clone().with_date_column(config.date_column.clone());
        let mut tables = BTreeMap::new();
        for kind in kinds {
            if tables.contains_key(kind) {
                continue;
            }
            let path = config.path_for(*kind);
            let table = load_table(&path, &options)?;
            tables.insert(*kind, table);
        }
        info!("Dashboard context holds {} dataset(s)", tables.len());
        Ok(Self {
            date_column: config.date_column.clone(),
            tables,
        })
    }

    /// Wraps tables that were loaded elsewhere.
    pub fn from_tables(
        date_column: impl Into<String>,
        tables: impl IntoIterator<Item = (DatasetKind, RecordTable)>,
    ) -> Self {
        Self {
            date_column: date_column.into(),
            tables: tables.into_iter().collect(),
        }
    }

    pub fn date_column(&self) -> &str {
        &self.date_column
    }

    pub fn table(&self, kind: DatasetKind) -> Option<&RecordTable> {
        self.tables.get(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = DatasetKind> + '_ {
        self.tables.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExplorerError;
    use std::fs;

    #[test]
    fn load_aborts_when_any_dataset_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("day.csv"), "dteday,cnt\n2011-01-01,5\n").unwrap();
        let yaml = "datasets:\n  day: day.csv\n  hour: missing.csv\n";
        let config_path = dir.path().join("dashboard.yml");
        fs::write(&config_path, yaml).unwrap();
        let config = DashboardConfig::load(&config_path).unwrap();

        let day_only =
            DashboardContext::load(&config, &[DatasetKind::Day], &LoadOptions::default()).unwrap();
        assert_eq!(day_only.table(DatasetKind::Day).map(RecordTable::len), Some(1));
        assert!(day_only.table(DatasetKind::Hour).is_none());

        let err = DashboardContext::load(
            &config,
            &[DatasetKind::Day, DatasetKind::Hour],
            &LoadOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ExplorerError::SourceNotFound { .. }));
    }
}
