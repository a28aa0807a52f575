use thiserror::Error;

/// Main error type for foafhub
#[derive(Error, Debug)]
pub enum FoafhubError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The platform refused access to a specific resource (e.g. a disabled repository)
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Name resolution, connect or timeout failure talking to the platform
    #[error("Network error: {0}")]
    Network(String),

    /// Request quota exhausted despite pacing
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Entity not found on the platform
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success API response
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response payload could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Graph serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for FoafhubError {
    fn from(err: reqwest::Error) -> Self {
        // Socket-level failures while sending or reading the body are transient
        if err.is_connect() || err.is_timeout() || err.is_request() || err.is_body() {
            FoafhubError::Network(err.to_string())
        } else if err.is_decode() {
            FoafhubError::Parse(err.to_string())
        } else {
            FoafhubError::Api {
                status: err.status().map(|s| s.as_u16()).unwrap_or(0),
                message: err.to_string(),
            }
        }
    }
}

/// Convenient Result type using FoafhubError
pub type Result<T> = std::result::Result<T, FoafhubError>;
