// Keeps the daily count of requests sent to the routes API so the free
// tier is never exceeded.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::QuotaError;

// Every run asks for both directions.
pub const REQUESTS_PER_RUN: u32 = 2;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaRecord {
    pub date: NaiveDate,
    pub count: u32,
}

impl QuotaRecord {
    pub fn fresh(today: NaiveDate) -> Self {
        QuotaRecord {
            date: today,
            count: 0,
        }
    }

    /// Reads the record stored at `path`.  A file that is missing,
    /// unreadable or not a valid record is treated as an unused quota for
    /// `today`; nothing is ever reported as an error here.
    pub fn load_or_default(path: &Path, today: NaiveDate) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No quota file at {}, starting fresh", path.display());
                return Self::fresh(today);
            }
            Err(e) => {
                warn!("Unable to read quota file {}: {}", path.display(), e);
                return Self::fresh(today);
            }
        };
        match serde_json::from_str(&contents) {
            Ok(record) => record,
            Err(e) => {
                warn!("Ignoring malformed quota file {}: {}", path.display(), e);
                Self::fresh(today)
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), QuotaError> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json).map_err(|source| QuotaError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

pub struct QuotaTracker {
    path: PathBuf,
    daily_limit: u32,
    step: u32,
}

impl QuotaTracker {
    pub fn new<P: Into<PathBuf>>(path: P, daily_limit: u32, step: u32) -> Self {
        QuotaTracker {
            path: path.into(),
            daily_limit,
            step,
        }
    }

    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    pub fn check_and_consume(&self) -> Result<bool, QuotaError> {
        self.check_and_consume_on(Utc::now().date_naive())
    }

    /// Decides whether a run may go ahead on `today`.
    ///
    /// A record left over from an earlier day only resets the counter.
    /// Otherwise, including when the file was missing or unreadable and
    /// fell back to an empty record for `today`, the step is added.  A refused call leaves the file
    /// untouched, an approved one rewrites it straight away.
    pub fn check_and_consume_on(&self, today: NaiveDate) -> Result<bool, QuotaError> {
        let mut record = QuotaRecord::load_or_default(&self.path, today);
        if record.date != today {
            record = QuotaRecord::fresh(today);
        } else {
            record.count = record.count.saturating_add(self.step);
        }

        if record.count >= self.daily_limit {
            info!("Daily quota of {} requests reached", self.daily_limit);
            return Ok(false);
        }

        record.save(&self.path)?;
        Ok(true)
    }

    /// Usage recorded for `today` without changing anything.
    pub fn usage_on(&self, today: NaiveDate) -> QuotaRecord {
        let record = QuotaRecord::load_or_default(&self.path, today);
        if record.date == today {
            record
        } else {
            QuotaRecord::fresh(today)
        }
    }
}
