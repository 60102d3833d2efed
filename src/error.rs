//! Error types shared by the data sources.

use thiserror::Error;

/// Errors raised while polling a data source.
///
/// Every variant is recoverable: the worker logs it, reports it to the UI,
/// and tries again on its next period.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("response did not include a data URL ({0})")]
    MissingDataUrl(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("sensor error: {0}")]
    Sensor(String),

    #[error("unexpected payload: {message}")]
    Payload { message: String },
}

impl FetchError {
    pub fn payload(message: impl Into<String>) -> Self {
        FetchError::Payload {
            message: message.into(),
        }
    }
}

/// Errors raised while loading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
