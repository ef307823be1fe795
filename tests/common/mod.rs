#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

pub const DAY_CSV: &str = "\
instant,dteday,season,yr,mnth,holiday,weekday,workingday,weathersit,temp,casual,registered,cnt
3,2011-01-20,1,0,1,0,4,1,2,0.26,100,900,1000
1,2011-01-05,1,0,1,0,3,1,1,0.20,50,450,500
2,2011-01-08,1,0,1,0,6,0,1,0.22,200,300,500
4,2011-02-01,1,0,2,0,2,1,3,0.18,10,90,100
5,2011-02-12,1,0,2,0,6,0,1,0.25,300,400,700
";

pub const HOUR_CSV: &str = "\
instant,dteday,season,hr,workingday,weathersit,cnt
1,2011-01-05,1,0,1,1,16
2,2011-01-05,1,1,1,1,40
3,2011-02-01,1,0,1,3,7
";

pub const MERGED_CSV: &str = "\
instant,dteday,hr,season_hour,weathersit_hour,workingday_hour,cnt_hour,season_day,weathersit_day,workingday_day,cnt_day
1,2011-01-05,0,1,1,1,16,1,1,1,500
2,2011-01-05,1,1,2,1,40,1,1,1,500
3,2011-01-08,0,1,1,0,30,1,1,0,500
4,2011-02-01,0,1,3,1,7,1,3,1,100
";

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Lays out the three bike-sharing datasets plus a config pointing at
    /// them, returning the config path.
    pub fn write_dashboard(&self) -> PathBuf {
        self.write("data/day.csv", DAY_CSV);
        self.write("data/hour.csv", HOUR_CSV);
        self.write("dashboard/gabungan_imputed.csv", MERGED_CSV);
        self.write(
            "dashboard.yml",
            "date_column: dteday\n\
             datasets:\n  \
               day: data/day.csv\n  \
               hour: data/hour.csv\n  \
               merged: dashboard/gabungan_imputed.csv\n",
        )
    }
}
