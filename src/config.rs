use crate::error::Result;
use crate::utils::constants::{
    DEFAULT_CONFIG_FILE, DEFAULT_DATABASE_FILE, DEFAULT_LOG_FILE, DEFAULT_REPORT_FILE,
    DEFAULT_SOURCE_URL, ENV_PREFIX, MEGACITY_THRESHOLD,
};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use validator::Validate;

/// What the orchestrator does with a failed stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Log the error and carry on; the process exits successfully.
    Suppress,
    /// Log the error and stop with it.
    Propagate,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    #[validate(url)]
    pub source_url: String,

    pub database_path: PathBuf,

    pub output_path: PathBuf,

    pub log_file: PathBuf,

    #[validate(range(min = 1))]
    pub megacity_threshold: i64,

    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    pub error_policy: ErrorPolicy,
}

impl Settings {
    /// Defaults, then the optional config file, then `MEGACITY_*` variables.
    ///
    /// An explicitly named file must exist; the default file is optional.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let file = match config_file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings: Settings = Config::builder()
            .set_default("source_url", DEFAULT_SOURCE_URL)?
            .set_default("database_path", DEFAULT_DATABASE_FILE)?
            .set_default("output_path", DEFAULT_REPORT_FILE)?
            .set_default("log_file", DEFAULT_LOG_FILE)?
            .set_default("megacity_threshold", MEGACITY_THRESHOLD)?
            .set_default("error_policy", "suppress")?
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            database_path: PathBuf::from(DEFAULT_DATABASE_FILE),
            output_path: PathBuf::from(DEFAULT_REPORT_FILE),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            megacity_threshold: MEGACITY_THRESHOLD,
            request_timeout_secs: None,
            error_policy: ErrorPolicy::Suppress,
        }
    }
}
