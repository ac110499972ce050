use thiserror::Error;

/// Type alias for Result with SweepError
pub type Result<T> = std::result::Result<T, SweepError>;

/// Error types for the sweep utility
#[derive(Error, Debug)]
pub enum SweepError {
    /// Gmail API returned an error
    #[error("Gmail API error: {0}")]
    ApiError(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthError(String),

    /// Rate limit exceeded - the server asked us to wait
    #[error("Rate limit exceeded, retry after {retry_after} seconds")]
    RateLimitExceeded { retry_after: u64 },

    /// Network-related error (connection issues, timeouts, etc.)
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Server returned 5xx error
    #[error("Server error (HTTP {status}): {message}")]
    ServerError { status: u16, message: String },

    /// Resource not found (404)
    #[error("Message not found: {0}")]
    MessageNotFound(String),

    /// Bad request (400) - typically a query the server rejected
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Forbidden (403)
    #[error("Access forbidden: {0}")]
    Forbidden(String),

    /// Label-related errors
    #[error("Label error: {0}")]
    LabelError(String),

    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Parse the Retry-After header from an HTTP response
///
/// Only the delay-seconds form is handled (e.g. "120"); a missing or
/// unparseable header falls back to 5 seconds.
fn parse_retry_after_header<B>(response: &hyper::Response<B>) -> u64 {
    const DEFAULT_RETRY_AFTER: u64 = 5;

    response
        .headers()
        .get("retry-after")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER)
}

impl From<google_gmail1::Error> for SweepError {
    fn from(error: google_gmail1::Error) -> Self {
        match error {
            // HTTP response with a non-success status code
            google_gmail1::Error::Failure(ref response) => {
                let status = response.status();
                let status_code = status.as_u16();
                let message = format!(
                    "HTTP {}: {}",
                    status_code,
                    status.canonical_reason().unwrap_or("Unknown")
                );

                match status_code {
                    429 => {
                        let retry_after = parse_retry_after_header(response);
                        SweepError::RateLimitExceeded { retry_after }
                    }
                    404 => SweepError::MessageNotFound("Resource not found".to_string()),
                    400 => SweepError::BadRequest(message),
                    403 => SweepError::Forbidden(message),
                    500..=599 => SweepError::ServerError {
                        status: status_code,
                        message,
                    },
                    _ => SweepError::ApiError(message),
                }
            }
            // Request not understood by the server
            google_gmail1::Error::BadRequest(ref err) => SweepError::BadRequest(format!("{}", err)),
            // Network/connection errors
            google_gmail1::Error::HttpError(ref err) => {
                SweepError::NetworkError(format!("Connection error: {}", err))
            }
            google_gmail1::Error::Io(err) => SweepError::NetworkError(err.to_string()),
            _ => SweepError::ApiError(error.to_string()),
        }
    }
}
