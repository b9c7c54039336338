// src/error.rs
use thiserror::Error;

/// Failure taxonomy for backend calls. Every endpoint failure maps onto
/// exactly one of these; retry and fallback decisions match on the variant.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP 401 on any endpoint. Never retried.
    #[error("Access denied. Check your recruiter key configuration.")]
    Unauthorized,

    /// HTTP 404, carrying whatever message the server supplied.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A 2xx response whose envelope said `status != "success"`, or any
    /// other HTTP error status. Surfaced with the server-supplied message.
    #[error("{0}")]
    Service(String),

    /// Transport-level failure (connection refused, DNS, timeout).
    #[error("Network error: {0}")]
    Network(String),
}

impl ApiError {
    /// Whether a retry policy is allowed to re-issue the request.
    /// Authentication failures are terminal across every endpoint.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ApiError::Unauthorized)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_is_never_retryable() {
        assert!(!ApiError::Unauthorized.is_retryable());
        assert!(ApiError::Network("refused".into()).is_retryable());
        assert!(ApiError::Service("bad".into()).is_retryable());
        assert!(ApiError::NotFound("missing".into()).is_retryable());
    }
}
