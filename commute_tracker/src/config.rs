use std::env;
use std::path::PathBuf;
#[cfg(test)]
use std::path::Path;

use crate::error::ConfigError;

pub static DEFAULT_ROUTES_HOST: &str = "https://routes.googleapis.com";
pub static DEFAULT_LANGUAGE_CODE: &str = "en-IN";
pub static DEFAULT_DATA_DIR: &str = "data";

// Four runs an hour, two requests each, with some headroom.
pub const DEFAULT_DAILY_LIMIT: u32 = 4 * 24 + 100;

/// Everything a run needs, resolved once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Google Maps Platform API key.
    pub api_key: String,
    /// Place id of the origin of the morning leg.
    pub home_id: String,
    /// Place id of the destination of the morning leg.
    pub college_id: String,
    pub data_dir: PathBuf,
    pub csv_file: PathBuf,
    pub quota_file: PathBuf,
    pub daily_limit: u32,
    pub language_code: String,
    pub routes_host: String,
}

impl Config {
    /// Reads the configuration from the process environment. Call
    /// `dotenv::dotenv()` beforehand to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| non_empty(&lookup, name);
        let required = |name: &'static str| value(name).ok_or(ConfigError::Missing(name));

        let api_key = required("GMP_API_KEY")?;
        let home_id = required("HOME_ID")?;
        let college_id = required("COLLEGE_ID")?;

        let data_dir = data_dir(&lookup);
        let csv_file = value("CSV_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("routes_output.csv"));
        let QuotaSettings {
            quota_file,
            daily_limit,
        } = QuotaSettings::from_lookup(&lookup)?;

        Ok(Config {
            api_key,
            home_id,
            college_id,
            data_dir,
            csv_file,
            quota_file,
            daily_limit,
            language_code: value("LANGUAGE_CODE")
                .unwrap_or_else(|| DEFAULT_LANGUAGE_CODE.into()),
            routes_host: value("ROUTES_HOST")
                .map(|host| host.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_ROUTES_HOST.into()),
        })
    }
}

/// Just enough configuration to read the quota file.  Needs none of the
/// API credentials.
#[derive(Clone, Debug)]
pub struct QuotaSettings {
    pub quota_file: PathBuf,
    pub daily_limit: u32,
}

impl QuotaSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let quota_file = non_empty(&lookup, "QUOTA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir(&lookup).join("quota.json"));

        let daily_limit = match non_empty(&lookup, "DAILY_LIMIT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "DAILY_LIMIT",
                value: raw,
            })?,
            None => DEFAULT_DAILY_LIMIT,
        };

        Ok(QuotaSettings {
            quota_file,
            daily_limit,
        })
    }
}

fn non_empty<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).filter(|v| !v.trim().is_empty())
}

fn data_dir<F>(lookup: &F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, "DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

#[cfg(test)]
impl Config {
    pub(crate) fn for_tests(routes_host: &str, data_dir: &Path) -> Self {
        Config {
            api_key: "test-key".to_string(),
            home_id: "home-place".to_string(),
            college_id: "college-place".to_string(),
            data_dir: data_dir.to_path_buf(),
            csv_file: data_dir.join("routes_output.csv"),
            quota_file: data_dir.join("quota.json"),
            daily_limit: DEFAULT_DAILY_LIMIT,
            language_code: DEFAULT_LANGUAGE_CODE.to_string(),
            routes_host: routes_host.to_string(),
        }
    }
}
