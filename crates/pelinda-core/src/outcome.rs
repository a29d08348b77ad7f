//! Operation outcomes
//!
//! Every client operation returns an [`Outcome`]: either the payload for that
//! specific operation or a shared [`Failure`] carrying a human-readable
//! message. Operations never return an `Err`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Result of a client operation
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum Outcome<T> {
    /// The request succeeded and the response had the expected shape
    Success(T),
    /// Validation, transport, status or response-shape failure
    Failure(Failure),
}

/// Failure message shared by all operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct Failure {
    /// Human-readable reason
    pub message: String,
}

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl<T> Outcome<T> {
    /// `true` for [`Outcome::Success`]
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// `true` for [`Outcome::Failure`]
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// The success payload, if any
    pub fn payload(&self) -> Option<&T> {
        match self {
            Outcome::Success(payload) => Some(payload),
            Outcome::Failure(_) => None,
        }
    }

    /// The failure, if any
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(failure) => Some(failure),
        }
    }

    /// The failure message, if any
    pub fn message(&self) -> Option<&str> {
        self.failure().map(|f| f.message.as_str())
    }

    /// Convert into a `Result` so callers can use `?`
    pub fn into_result(self) -> Result<T, Failure> {
        match self {
            Outcome::Success(payload) => Ok(payload),
            Outcome::Failure(failure) => Err(failure),
        }
    }
}

impl<T> From<crate::Result<T>> for Outcome<T> {
    fn from(result: crate::Result<T>) -> Self {
        match result {
            Ok(payload) => Outcome::Success(payload),
            Err(err) => Outcome::Failure(Failure::new(err.to_string())),
        }
    }
}

/// Payload of `get_execution_count`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionCount {
    pub message: String,
    pub execution_count: i64,
}

/// Payload of operations that only confirm with a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledged {
    pub message: String,
}

/// Payload of `generate_key`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedKeys {
    pub message: String,
    pub generated_keys: Vec<String>,
}

/// Payload of `delete_key`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedKey {
    pub message: String,
    /// The key value that was sent for deletion
    pub deleted_key: String,
}

/// Payload of `check_identifier`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierService {
    pub message: String,
    pub service: String,
}

/// Payload of `extend_key_expiration`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedKey {
    pub message: String,
    /// Key record as returned by the server
    pub key: Value,
}

/// Payload of lookups that return the whole response object
///
/// Used by `fetch_key`, `fetch_generated_key` and `validate_key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchedRecord {
    pub result: Map<String, Value>,
}

impl FetchedRecord {
    /// Look up a top-level field of the response
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.result.get(field)
    }
}
