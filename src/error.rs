use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Response body is not valid UTF-8 ({bytes} bytes)")]
    Decode { bytes: usize },

    #[error("Malformed record on line {line}: {message}")]
    Parse { line: u64, message: String },

    #[error("Database error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("Refusing to run a statement that modifies the database: {0}")]
    NotReadOnly(String),

    #[error("Could not open database {}: {source}", .path.display())]
    Connection {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Delimited file error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

impl PipelineError {
    pub fn parse(line: u64, message: impl Into<String>) -> Self {
        PipelineError::Parse {
            line,
            message: message.into(),
        }
    }

    /// Name of the error category written to the log.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Network(_) => "NetworkError",
            PipelineError::Decode { .. } => "DecodeError",
            PipelineError::Parse { .. } => "ParseError",
            PipelineError::Store(_) | PipelineError::NotReadOnly(_) => "StoreError",
            PipelineError::Connection { .. } => "ConnectionError",
            PipelineError::Io(_) | PipelineError::Csv(_) => "IOError",
            PipelineError::Config(_) | PipelineError::Validation(_) | PipelineError::Logging(_) => {
                "ConfigError"
            }
        }
    }
}
