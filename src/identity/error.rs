use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned while resolving a caller's session token.
pub enum IdentityError {
    /// The auth or profile service could not be reached.
    #[error("identity service at '{url}' is unavailable: {message}")]
    Unavailable { url: String, message: String },

    /// The service answered with an unexpected status.
    #[error("identity lookup failed with status {status}: {message}")]
    LookupFailed { status: u16, message: String },

    /// A response arrived but could not be interpreted.
    #[error("invalid identity response: {message}")]
    InvalidResponse { message: String },

    #[error("failed to build HTTP client: {message}")]
    ClientBuild { message: String },
}
