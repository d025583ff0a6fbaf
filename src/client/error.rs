//! Client error types

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Errors that can occur when talking to the payroll API
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Payroll API unavailable: {0}")]
    Unavailable(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api {
        status: u16,
        message: String,
        /// Message extracted from the response body, when it had one
        server_message: Option<String>,
    },

    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Classify a transport error
    pub fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else if e.is_connect() {
            ClientError::Unavailable(e.to_string())
        } else {
            ClientError::Request(e)
        }
    }

    /// Build an API error from a non-2xx response body
    pub fn from_status(status: u16, body: &str) -> Self {
        let server_message = extract_server_message(body);
        let message = server_message
            .clone()
            .unwrap_or_else(|| truncate(body.trim(), 200));
        ClientError::Api {
            status,
            message,
            server_message,
        }
    }

    /// HTTP status, for API errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message safe to show to the user as-is: the server's own message,
    /// or the validation summary. `None` means a generic fallback applies.
    pub fn user_message(&self) -> Option<String> {
        match self {
            ClientError::Api { server_message, .. } => server_message.clone(),
            ClientError::Validation(e) => Some(e.to_string()),
            ClientError::InvalidRequest(msg) => Some(msg.clone()),
            _ => None,
        }
    }
}

/// Pull a human-readable message out of an error body.
///
/// Recognized shapes: `{"message": ..}`, `{"error": ..}`, `{"detail": ..}`,
/// `{"error": {"message": ..}}`, `{"errors": [..]}` and a bare JSON string.
pub fn extract_server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    message_from_value(&value)
}

fn message_from_value(value: &serde_json::Value) -> Option<String> {
    use serde_json::Value;

    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(map) => ["message", "error", "detail", "msg"]
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(message_from_value)
            .or_else(|| map.get("errors").and_then(message_from_value)),
        Value::Array(items) => items.iter().find_map(message_from_value),
        _ => None,
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}
