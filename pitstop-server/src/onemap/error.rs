//! OneMap client error types.

/// Errors from the OneMap HTTP client.
///
/// Every variant means the provider could not give a usable answer, so the
/// web layer reports all of them as service unavailable.
#[derive(Debug, thiserror::Error)]
pub enum OneMapError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Credentials were rejected
    #[error("unauthorized (check ONEMAP_EMAIL and ONEMAP_PASSWORD)")]
    Unauthorized,

    /// The token endpoint returned an unusable expiry
    #[error("invalid token expiry: {0}")]
    InvalidExpiry(String),

    /// The client was shut down
    #[error("client closed")]
    Closed,
}
