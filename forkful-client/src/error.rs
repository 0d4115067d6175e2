use std::path::PathBuf;

use thiserror::Error;

/// Failure of a request against the marketplace API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Non-2xx response. `message` is the body's `message` field when present.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// Body could not be parsed, kept raw for debugging.
    #[error("failed to decode response: {message}")]
    Decode { message: String, body: String },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("credential storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("credential storage unavailable: {0}")]
    Unavailable(String),
}

/// Error raised inside an orchestrator.
///
/// Never escapes the orchestrator boundary; it is converted into a failure
/// event (and, for [`ThunkError::AuthMissing`], a logout).
#[derive(Debug, Error)]
pub enum ThunkError {
    #[error("no authentication token")]
    AuthMissing,

    #[error("invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Credentials(#[from] CredentialError),

    #[error("unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ThunkError {
    pub fn is_auth_missing(&self) -> bool {
        matches!(self, ThunkError::AuthMissing)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("could not determine {0} directory")]
    NoDirectory(&'static str),
}

/// Error building a [`crate::MarketClient`] from configuration.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),
}
