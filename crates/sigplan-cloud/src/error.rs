//! Remote optimizer error types.

use sigplan_core::ModelError;
use sigplan_verify::SafetyViolation;

/// Errors that can occur while talking to the remote optimizer.
#[derive(Debug, thiserror::Error)]
pub enum CloudError {
    /// No network connection could be established.
    #[error("no internet connection")]
    NoConnection,

    /// Missing or rejected credentials, or insufficient credits.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The service rejected the request body.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The service did not finish in time (HTTP 504).
    #[error("the remote optimizer timed out")]
    Timeout,

    /// Any other unsuccessful status code.
    #[error("unexpected response from the remote optimizer (status {status})")]
    Unknown { status: u16 },

    /// The HTTP request itself failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// A request or response body could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The request was rejected locally before it was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A response could not be turned into a valid model value.
    #[error("invalid response: {0}")]
    Model(#[from] ModelError),

    /// The returned schedule violates the safety restrictions.
    #[error("returned schedule is unsafe: {0}")]
    Unsafe(#[from] SafetyViolation),
}

/// Result type alias for remote operations.
pub type Result<T> = std::result::Result<T, CloudError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            CloudError::Unknown { status: 500 }.to_string(),
            "unexpected response from the remote optimizer (status 500)"
        );
        let err: CloudError = SafetyViolation::Incomplete { id: "sg1".into() }.into();
        assert!(err.to_string().starts_with("returned schedule is unsafe"));
    }
}
