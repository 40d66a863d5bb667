//! Error types for the Sleeper league data layer

use thiserror::Error;


pub type Result<T> = std::result::Result<T, SleeperError>;

#[derive(Error, Debug)]
pub enum SleeperError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse integer: {0}")]
    ParseInt(#[from] std::num::ParseIntError),

    #[error("League ID not provided and {env_var} environment variable not set")]
    MissingLeagueId { env_var: String },

    #[error("Week override must be an integer, got {value:?}")]
    InvalidWeekOverride { value: String },

    #[error("Sleeper API returned HTTP {status} for {url}: {body}")]
    Api {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Sleeper API returned an empty response for {url}")]
    EmptyResponse { url: String },

    #[error("Malformed {entity} payload: {message}")]
    Normalize { entity: &'static str, message: String },

    #[error("League data not loaded; call load() first")]
    NotLoaded,

    #[error("SQL rejected: {reason}")]
    SqlRejected { reason: String },

    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Invalid arguments for {tool}: {message}")]
    InvalidToolArguments { tool: String, message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },
}

impl SleeperError {
    /// Wrap a serde failure raised while validating one source entity.
    pub(crate) fn normalize(entity: &'static str, err: impl std::fmt::Display) -> Self {
        SleeperError::Normalize {
            entity,
            message: err.to_string(),
        }
    }

    pub(crate) fn rejected(reason: impl Into<String>) -> Self {
        SleeperError::SqlRejected {
            reason: reason.into(),
        }
    }
}
