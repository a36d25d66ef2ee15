//! Parking store error types.

use std::path::PathBuf;

/// Errors from bulk-loading parking records into the store.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Reading or writing a records file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serializing a record failed
    #[error("JSON error: {message}")]
    Json { message: String },

    /// The database rejected a statement or is unreachable
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The target table has not been created
    #[error("table '{0}' does not exist")]
    MissingTable(&'static str),
}

/// Errors from the DataMall open-data API.
#[derive(Debug, thiserror::Error)]
pub enum DataMallError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication failed
    #[error("unauthorized: check DATAMALL_ACCOUNT_KEY")]
    Unauthorized,

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },
}
