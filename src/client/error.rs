//! Client error types

use serde_json::Value;
use thiserror::Error;

/// Message used when the server gives no usable detail
pub const FALLBACK_MESSAGE: &str = "Request failed";

/// Errors from a single API call
#[derive(Error, Debug)]
pub enum ClientError {
    /// Missing, expired or rejected credentials (HTTP 401)
    #[error("Not authenticated: {message}")]
    Unauthorized { message: String },

    /// Any other non-success status
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request never got a response
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body did not have the expected shape
    #[error("Unexpected response from {path}: {error}")]
    Decode { path: String, error: String },
}

impl ClientError {
    /// Build the error for a non-success response
    pub(crate) fn from_status(status: u16, body: &[u8]) -> Self {
        let message = server_message(body).unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
        if status == 401 {
            ClientError::Unauthorized { message }
        } else {
            ClientError::Api { status, message }
        }
    }

    /// True if the caller should send the user back to login
    pub fn is_auth(&self) -> bool {
        matches!(self, ClientError::Unauthorized { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized { .. } => Some(401),
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Network(e) => e.status().map(|s| s.as_u16()),
            ClientError::Decode { .. } => None,
        }
    }
}

/// Extract human-readable detail from an error body.
///
/// A `detail` string wins; other non-empty JSON (field error maps) is
/// passed through as compact JSON. Non-JSON bodies carry no detail.
fn server_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match &value {
        Value::Object(map) => match map.get("detail") {
            Some(Value::String(detail)) if !detail.trim().is_empty() => Some(detail.clone()),
            _ if map.is_empty() => None,
            _ => Some(value.to_string()),
        },
        Value::Array(items) if !items.is_empty() => Some(value.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
