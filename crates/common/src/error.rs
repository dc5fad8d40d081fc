//! Error types for qaboard

use thiserror::Error;

/// Result type alias using qaboard Error
pub type Result<T> = std::result::Result<T, Error>;

/// qaboard error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config encode error: {0}")]
    ConfigEncode(#[from] toml::ser::Error),

    #[error("Invalid fixture: {0}")]
    InvalidFixture(String),

    #[error("Invalid leaf result: passed {passed} exceeds tests run {tests_run}")]
    InvalidLeaf { tests_run: u32, passed: u32 },

    #[error("Unknown diagram part: {0}")]
    UnknownPart(String),

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Resource not found: {kind} with id {id}")]
    NotFound { kind: String, id: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<tempfile::PersistError> for Error {
    fn from(e: tempfile::PersistError) -> Self {
        Error::Io(e.error)
    }
}
