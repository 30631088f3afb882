use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not found")]
    Missing(&'static str),

    #[error("Invalid value \"{value}\" for {name}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum QuotaError {
    #[error("Failed to encode quota record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to write quota file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

// Raised per direction; the caller logs it and carries on with the next leg.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to send request: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Request failed with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to decode response body: {0}")]
    Decode(#[source] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum CsvLogError {
    #[error("Failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write csv record: {0}")]
    Write(#[from] csv::Error),

    #[error("Failed to flush csv file: {0}")]
    Flush(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Quota(#[from] QuotaError),

    #[error(transparent)]
    CsvLog(#[from] CsvLogError),
}
