//! Error types for the API client

use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API client errors
///
/// Variants are listed in the order a call can fail: the pre-flight size
/// check, the transport, decoding, the batch status and finally an item
/// status.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Bulk request carried more items than the remote service accepts
    #[error("Bulk request limit exceeded: {actual} requests given, at most {limit} allowed")]
    BatchSizeExceeded {
        /// Configured ceiling
        limit: usize,
        /// Number of items submitted
        actual: usize,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-2xx HTTP status
    #[error("API error ({status}): {message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// Request timeout
    #[error("Request timeout after {0:?}")]
    Timeout(std::time::Duration),

    /// All retry attempts exhausted
    #[error("All {attempts} retry attempts failed: {last_error}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Last error message
        last_error: String,
    },

    /// Response body could not be decoded into the expected shape
    #[error("Failed to decode {target} from '{}': {source}", String::from_utf8_lossy(.body))]
    Decode {
        /// Name of the response type being decoded
        target: &'static str,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
        /// Raw response body as received
        body: Vec<u8>,
    },

    /// Top-level `status` of a response was not `ok`
    ///
    /// For a single call this is the call's own status. For a bulk call it is
    /// always the batch-level status; item failures are [`ApiError::ItemStatus`].
    #[error("Erply API error {code} on {request}: {message}")]
    Status {
        /// Remote error code
        code: i64,
        /// Echoed request name
        request: String,
        /// Remote response status text
        message: String,
    },

    /// One item of a bulk response failed; earlier items succeeded
    #[error("Erply API error {code} on bulk item {index} ({request}): {message}")]
    ItemStatus {
        /// Position of the failing item in submission order
        index: usize,
        /// Remote error code
        code: i64,
        /// Echoed request name
        request: String,
        /// Remote response status text
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing environment variable
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a missing env var error
    pub fn missing_env(var: impl Into<String>) -> Self {
        Self::MissingEnvVar(var.into())
    }

    /// Create an API response error
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status,
            message: message.into(),
        }
    }

    /// Create a decode error, keeping the raw body
    pub fn decode(target: &'static str, source: serde_json::Error, body: &[u8]) -> Self {
        Self::Decode {
            target,
            source,
            body: body.to_vec(),
        }
    }

    /// Remote error code for status failures
    #[must_use]
    pub fn error_code(&self) -> Option<i64> {
        match self {
            Self::Status { code, .. } | Self::ItemStatus { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Raw body of a response that failed to decode
    #[must_use]
    pub fn raw_body(&self) -> Option<&[u8]> {
        match self {
            Self::Decode { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Check if this error is retryable at the transport level
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(e) => e.is_connect() || e.is_timeout(),
            Self::ApiResponse { status, .. } => *status >= 500 || *status == 429,
            Self::Timeout(_) => true,
            Self::BatchSizeExceeded { .. }
            | Self::RetriesExhausted { .. }
            | Self::Decode { .. }
            | Self::Status { .. }
            | Self::ItemStatus { .. }
            | Self::Config(_)
            | Self::MissingEnvVar(_)
            | Self::InvalidUrl(_) => false,
        }
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if (400..500).contains(status))
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if *status >= 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(ApiError::api_response(503, "unavailable").is_retryable());
        assert!(ApiError::api_response(429, "slow down").is_retryable());
        assert!(!ApiError::api_response(404, "missing").is_retryable());
        assert!(!ApiError::BatchSizeExceeded { limit: 100, actual: 101 }.is_retryable());
        assert!(
            !ApiError::Status {
                code: 1002,
                request: "getSuppliers".into(),
                message: "error".into(),
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_decode_error_keeps_body() {
        let source = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = ApiError::decode("GetSuppliersResponse", source, b"{oops");

        assert_eq!(err.raw_body(), Some(&b"{oops"[..]));
        assert!(err.to_string().contains("GetSuppliersResponse"));
        assert!(err.to_string().contains("{oops"));
    }

    #[test]
    fn test_error_code() {
        let err = ApiError::ItemStatus {
            index: 2,
            code: 1011,
            request: "saveSupplier".into(),
            message: "error".into(),
        };
        assert_eq!(err.error_code(), Some(1011));
        assert_eq!(ApiError::config("x").error_code(), None);
    }

    #[test]
    fn test_client_server_errors() {
        assert!(ApiError::api_response(400, "bad").is_client_error());
        assert!(ApiError::api_response(502, "bad gateway").is_server_error());
        assert!(!ApiError::api_response(502, "bad gateway").is_client_error());
    }
}
