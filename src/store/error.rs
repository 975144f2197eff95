use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by score store operations.
pub enum StoreError {
    /// The backing service could not be reached.
    #[error("score store at '{url}' is unavailable: {message}")]
    Unavailable {
        /// Endpoint URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// The backing service answered with a non-success status.
    #[error("query on '{table}' failed with status {status}: {message}")]
    QueryFailed {
        /// Table name.
        table: String,
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// A response arrived but could not be interpreted.
    #[error("invalid response from '{table}': {message}")]
    InvalidResponse {
        /// Table name.
        table: String,
        /// Error message.
        message: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {message}")]
    ClientBuild {
        /// Error message.
        message: String,
    },

    /// Seed file could not be read or parsed.
    #[error("failed to load seed file '{path}': {message}")]
    SeedLoadFailed {
        /// Seed file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },
}
