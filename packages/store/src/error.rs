//! Error types shared by every store and webhook implementation.

use thiserror::Error;

use crate::models::EmployeeId;

/// A remote store call failed. The local snapshot is never touched when this
/// is returned.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum StoreError {
    /// The backend answered with a non-success status.
    #[error("store rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The backend could not be reached at all.
    #[error("store unreachable: {0}")]
    Unreachable(String),

    /// The backend answered but the body could not be decoded.
    #[error("malformed store response: {0}")]
    Malformed(String),

    /// The request could not be built, usually a bad store URL.
    #[error("invalid store request: {0}")]
    InvalidRequest(String),

    #[error("no employee with id {0}")]
    NotFound(EmployeeId),
}

impl StoreError {
    /// Whether the failure happened before the backend saw the request.
    pub fn is_connection(&self) -> bool {
        matches!(self, StoreError::Unreachable(_))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Malformed(e.to_string())
    }
}

/// The webhook request could not be dispatched from this client.
///
/// A request that left the client but was never delivered does not produce
/// this error; see [`crate::Dispatched`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("webhook dispatch failed: {0}")]
pub struct TransportError(pub String);

/// Configuration could not be assembled.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),

    #[error("{var} is not a valid number: {value}")]
    Invalid { var: &'static str, value: String },

    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
}
