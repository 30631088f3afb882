mod endpoints;
mod retrieve;

pub mod config;
pub mod csv_log;
pub mod error;
pub mod quota;
pub mod routes;

use std::fs;
use std::path::Path;

use chrono::Utc;
use tracing::{error, info};

use config::Config;
use csv_log::{CsvLog, CsvRow};
use error::RunError;
use quota::{QuotaTracker, REQUESTS_PER_RUN};
use routes::{Direction, RoutesClient};

/// What happened during a single run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub quota_denied: bool,
    pub logged: Vec<Direction>,
    pub failed: Vec<Direction>,
}

// Either file may have been pointed somewhere other than the data directory.
fn create_parent_dir(file: &Path) -> Result<(), RunError> {
    match file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|source| RunError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

/// Records one snapshot of both commute legs.
///
/// Only file errors end the run early.  A leg whose request fails is
/// logged, noted in the summary, and the other leg still goes ahead.
pub fn log_commute(config: &Config) -> Result<RunSummary, RunError> {
    create_parent_dir(&config.csv_file)?;
    create_parent_dir(&config.quota_file)?;
    let log = CsvLog::new(&config.csv_file);
    log.ensure_header()?;

    let mut summary = RunSummary::default();
    let quota = QuotaTracker::new(&config.quota_file, config.daily_limit, REQUESTS_PER_RUN);
    if !quota.check_and_consume()? {
        info!("Quota limit reached, skipping this run");
        summary.quota_denied = true;
        return Ok(summary);
    }

    let client = RoutesClient::new(config);
    for direction in Direction::ALL.iter().copied() {
        let (origin, destination) = direction.places(config);
        match client.fetch_routes(origin, destination) {
            Ok(routes) => {
                let row = CsvRow::new(Utc::now(), direction, routes);
                log.append_row(&row)?;
                info!(
                    "Logged {} route data to {} on {}",
                    direction,
                    log.path().display(),
                    row.timestamp
                );
                summary.logged.push(direction);
            }
            Err(e) => {
                error!("API Error ({}): {}", direction, e);
                summary.failed.push(direction);
            }
        }
    }
    Ok(summary)
}
