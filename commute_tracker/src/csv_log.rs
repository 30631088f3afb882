use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use tracing::info;

use crate::error::CsvLogError;
use crate::routes::{Direction, RouteResult};

/// Route alternatives kept per row.
pub const ROUTE_SLOTS: usize = 3;

pub static HEADER: [&str; 2 + 4 * ROUTE_SLOTS] = [
    "timestamp",
    "direction",
    "route_name",
    "duration",
    "static_duration",
    "distance",
    "route_1_name",
    "route_1_duration",
    "route_1_static_duration",
    "route_1_distance",
    "route_2_name",
    "route_2_duration",
    "route_2_static_duration",
    "route_2_distance",
];

static MISSING: &str = "N/A";
static NOT_A_NUMBER: &str = "NaN";

/// One direction's snapshot.
#[derive(Clone, Debug)]
pub struct CsvRow {
    pub timestamp: DateTime<Utc>,
    pub direction: Direction,
    pub routes: Vec<RouteResult>,
}

impl CsvRow {
    pub fn new(timestamp: DateTime<Utc>, direction: Direction, routes: Vec<RouteResult>) -> Self {
        CsvRow {
            timestamp,
            direction,
            routes,
        }
    }

    /// The row's columns in header order.  Routes past the last slot are
    /// dropped, empty slots are filled with `N/A`.
    pub fn fields(&self) -> Vec<String> {
        let mut fields = Vec::with_capacity(HEADER.len());
        fields.push(self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true));
        fields.push(self.direction.to_string());
        for slot in 0..ROUTE_SLOTS {
            match self.routes.get(slot) {
                Some(route) => {
                    fields.push(route.name.clone());
                    fields.push(seconds(route.duration_seconds));
                    fields.push(seconds(route.static_duration_seconds));
                    fields.push(route.distance_meters.to_string());
                }
                None => fields.extend((0..4).map(|_| MISSING.to_string())),
            }
        }
        fields
    }
}

fn seconds(value: Option<u64>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => NOT_A_NUMBER.to_string(),
    }
}

// Fields are written exactly as given: route names have already had their
// commas removed and nothing else is escaped.
fn writer(file: File) -> csv::Writer<File> {
    WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(file)
}

pub struct CsvLog {
    path: PathBuf,
}

impl CsvLog {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        CsvLog { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the file with its header line if it doesn't exist yet.
    /// Returns whether the file was created.
    pub fn ensure_header(&self) -> Result<bool, CsvLogError> {
        let file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
            Err(source) => {
                return Err(CsvLogError::Open {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let mut writer = writer(file);
        writer.write_record(HEADER.iter())?;
        writer.flush()?;
        info!("Created new CSV file with headers at {}", self.path.display());
        Ok(true)
    }

    pub fn append_row(&self, row: &CsvRow) -> Result<(), CsvLogError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| CsvLogError::Open {
                path: self.path.clone(),
                source,
            })?;
        let mut writer = writer(file);
        writer.write_record(row.fields())?;
        writer.flush()?;
        Ok(())
    }
}
