//! Dashboard configuration: where each dataset lives and how to read it.
//!
//! ```yaml
//! date_column: dteday
//! datasets:
//!   day: data/day.csv
//!   hour: data/hour.csv
//!   merged: dashboard/gabungan_imputed.csv
//! ```
//!
//! Relative paths resolve against the directory holding the config file.

use std::{
    fmt,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ExplorerError, Result},
    loader::DEFAULT_DATE_COLUMN,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Day,
    Hour,
    Merged,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 3] = [DatasetKind::Day, DatasetKind::Hour, DatasetKind::Merged];

    pub fn name(self) -> &'static str {
        match self {
            DatasetKind::Day => "day",
            DatasetKind::Hour => "hour",
            DatasetKind::Merged => "merged",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetPaths {
    pub day: PathBuf,
    pub hour: PathBuf,
    pub merged: PathBuf,
}

impl Default for DatasetPaths {
    fn default() -> Self {
        Self {
            day: PathBuf::from("data/day.csv"),
            hour: PathBuf::from("data/hour.csv"),
            merged: PathBuf::from("dashboard/gabungan_imputed.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub date_column: String,
    pub datasets: DatasetPaths,
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            datasets: DatasetPaths::default(),
            base_dir: None,
        }
    }
}

impl DashboardConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| ExplorerError::SourceNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: DashboardConfig = serde_yaml::from_reader(BufReader::new(file))
            .map_err(|err| ExplorerError::Config {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;
        if config.date_column.trim().is_empty() {
            return Err(ExplorerError::Config {
                path: path.to_path_buf(),
                message: "date_column must not be empty".to_string(),
            });
        }
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn to_yaml_string(&self) -> std::result::Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Location of `kind`, resolved against the config file's directory.
    pub fn path_for(&self, kind: DatasetKind) -> PathBuf {
        let raw = match kind {
            DatasetKind::Day => &self.datasets.day,
            DatasetKind::Hour => &self.datasets.hour,
            DatasetKind::Merged => &self.datasets.merged,
        };
        match &self.base_dir {
            Some(base) if raw.is_relative() => base.join(raw),
            _ => raw.clone(),
        }
    }
}
