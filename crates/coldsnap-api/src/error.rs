//! Error types for API operations.
//!
//! # Design
//! - A rejected login is not an error; it is `LogInOutcome::Failure`.
//! - Transport-class errors (network, timeout, non-2xx) and malformed-class
//!   errors (success-shaped bodies missing required fields) are separated so
//!   callers can log the latter as protocol mismatches.

use reqwest::StatusCode;
use thiserror::Error;

/// Result alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Primary error type for API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be completed (connect failure, timeout, cancellation).
    #[error("request to '{function}' failed")]
    Transport {
        /// API function the request targeted.
        function: String,
        /// Underlying HTTP client error.
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    #[error("request to '{function}' returned status {status}")]
    Status {
        /// API function the request targeted.
        function: String,
        /// Status code returned by the server.
        status: StatusCode,
    },
    /// A success-shaped response lacked a required field.
    #[error("malformed response: {field} {reason}")]
    MalformedResponse {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// The response body was not valid JSON.
    #[error("response body was not valid json")]
    InvalidJson {
        /// Underlying serde error.
        source: serde_json::Error,
    },
    /// The function name could not be resolved against the endpoint base URL.
    #[error("invalid function path '{function}'")]
    InvalidUrl {
        /// Function name supplied by the caller.
        function: String,
        /// Underlying URL parse error.
        source: url::ParseError,
    },
    /// The function name resolved outside the endpoint base URL.
    #[error("function path '{function}' leaves the endpoint base")]
    OutsideEndpoint {
        /// Function name supplied by the caller.
        function: String,
    },
    /// A header name or value could not be encoded.
    #[error("invalid header '{name}'")]
    InvalidHeader {
        /// Header name supplied by the caller.
        name: String,
    },
    /// Building the shared HTTP client failed.
    #[error("failed to build http client")]
    ClientBuild {
        /// Underlying HTTP client error.
        source: reqwest::Error,
    },
    /// Compressing or decompressing a payload failed.
    #[error("failed to {operation} payload")]
    Compression {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// A timestamp did not fit the requested representation.
    #[error("timestamp {value} out of range")]
    TimestampOutOfRange {
        /// Offending value.
        value: i64,
    },
}

impl ApiError {
    /// Whether the error belongs to the transport class (network, timeout, status).
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Status { .. })
    }

    /// Whether the server returned a body the protocol does not allow.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse { .. } | Self::InvalidJson { .. })
    }
}
