//! Error types for the Pelinda client
//!
//! This module defines all error types used throughout the crate.
//!
//! Only client construction surfaces an [`Error`] to the caller. Operations
//! build their result as `Result<T, Error>` internally and hand it back as an
//! [`Outcome`](crate::outcome::Outcome), using the error's `Display` text as
//! the failure message.

use thiserror::Error;

/// Result type alias for Pelinda operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the Pelinda client
#[derive(Error, Debug)]
pub enum Error {
    /// The probe request at construction was rejected by the server
    #[error("Invalid API key provided.")]
    InvalidApiKey,

    /// A request body carried an API key other than the client's
    #[error("Incorrect api key, ensure it matches with the one you used to create the instance.")]
    ApiKeyMismatch,

    /// A required request field was absent
    #[error("Missing '{0}' field.")]
    MissingField(String),

    /// Invalid input
    #[error("{0}")]
    InvalidInput(String),

    /// The server answered with a non-success status
    #[error("Could not request {endpoint}, Server returned {status}: {status_text}")]
    Http {
        /// Endpoint path (never includes the query string)
        endpoint: String,
        /// HTTP status code
        status: u16,
        /// Canonical reason phrase for the status
        status_text: String,
    },

    /// The server answered with success but the body lacks expected fields
    #[error("Missing {} in server response", quote_all(.0))]
    MissingResponseField(Vec<String>),

    /// The server answered with success but reported the action as failed
    #[error("Server rejected request to {endpoint}: {message}")]
    Rejected {
        /// Endpoint path
        endpoint: String,
        /// Message returned by the server
        message: String,
    },

    /// The response body could not be interpreted
    #[error("Invalid JSON in response from {endpoint}: {reason}")]
    InvalidResponse {
        /// Endpoint path
        endpoint: String,
        /// Parser or shape error
        reason: String,
    },

    /// The transport could not complete the request
    #[error("Request to {endpoint} failed: {message}")]
    RequestFailed {
        /// Endpoint path
        endpoint: String,
        /// Underlying transport error
        message: String,
    },

    /// Transport-level errors (DNS, connect, TLS, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Hardware identifier could not be determined
    #[error("Hardware identifier error: {0}")]
    HardwareId(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

fn quote_all(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| format!("'{}'", f))
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    /// Create a missing request field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an HTTP status error
    pub fn http(endpoint: impl Into<String>, status: u16, status_text: impl Into<String>) -> Self {
        Self::Http {
            endpoint: endpoint.into(),
            status,
            status_text: status_text.into(),
        }
    }

    /// Create a missing response field error
    pub fn missing_response_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingResponseField(fields.into_iter().map(Into::into).collect())
    }

    /// Create a server rejection error
    pub fn rejected(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// Wrap a transport failure with the endpoint it was aimed at
    pub fn request_failed(endpoint: impl Into<String>, source: &Error) -> Self {
        let message = match source {
            Error::Network(msg) => msg.clone(),
            other => other.to_string(),
        };
        Self::RequestFailed {
            endpoint: endpoint.into(),
            message,
        }
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a hardware identifier error
    pub fn hardware_id(msg: impl Into<String>) -> Self {
        Self::HardwareId(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
