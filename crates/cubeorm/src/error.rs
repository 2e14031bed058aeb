//! Error types for cubeorm

use thiserror::Error;

/// Result type alias for cubeorm operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for statement building and execution
#[derive(Debug, Error)]
pub enum OrmError {
    /// The connection could not be established (bad config, network, auth)
    #[error("Connect error: {0}")]
    Connect(String),

    /// A submitted statement was rejected by the database
    #[error("Driver error: {0}")]
    Driver(String),

    /// A required argument was empty or missing
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration could not be read or parsed
    #[error("Config error: {0}")]
    Config(String),
}

impl OrmError {
    /// Create a connect error
    pub fn connect(message: impl Into<String>) -> Self {
        Self::Connect(message.into())
    }

    /// Create a driver error
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver(message.into())
    }

    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is a connect error
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Connect(_))
    }

    /// Check if this is a driver error
    pub fn is_driver(&self) -> bool {
        matches!(self, Self::Driver(_))
    }

    /// Check if this is an invalid argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

impl From<tokio_postgres::Error> for OrmError {
    fn from(err: tokio_postgres::Error) -> Self {
        match err.as_db_error() {
            Some(db_err) => Self::Driver(format!("{}: {}", db_err.code().code(), db_err.message())),
            None => Self::Driver(err.to_string()),
        }
    }
}

impl From<toml::de::Error> for OrmError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
