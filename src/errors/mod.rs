//! Error handling module for the dashboard core.
//!
//! Provides the crate error type, the stable error codes, and the lenient parser for
//! error bodies returned by the REST backend.

use std::time::Duration;

use serde::Deserialize;

use crate::validation::ValidationErrors;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const API_ERROR: &str = "API_ERROR";
    pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
    pub const TIMEOUT: &str = "TIMEOUT";
    pub const DECODE_ERROR: &str = "DECODE_ERROR";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Client-side validation failed; nothing was sent to the backend
    Validation(ValidationErrors),
    /// A referenced record does not exist locally or on the server
    NotFound(String),
    /// The backend answered with a non-success status
    Api {
        status: u16,
        message: Option<String>,
    },
    /// Transport failure before a response arrived
    Network(String),
    /// The request exceeded the client timeout
    Timeout(Duration),
    /// A body could not be decoded
    Decode(String),
    /// Local storage or file system failure
    Storage(String),
    /// Invalid configuration
    Config(String),
}

impl AppError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Api { .. } => codes::API_ERROR,
            AppError::Network(_) => codes::NETWORK_ERROR,
            AppError::Timeout(_) => codes::TIMEOUT,
            AppError::Decode(_) => codes::DECODE_ERROR,
            AppError::Storage(_) => codes::STORAGE_ERROR,
            AppError::Config(_) => codes::CONFIG_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Validation(errors) => errors.to_string(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Api { status, message } => match message {
                Some(msg) => msg.clone(),
                None => format!("Request failed with status {}", status),
            },
            AppError::Network(msg) => msg.clone(),
            AppError::Timeout(after) => format!("Request timed out after {:?}", after),
            AppError::Decode(msg) => msg.clone(),
            AppError::Storage(msg) => msg.clone(),
            AppError::Config(msg) => msg.clone(),
        }
    }

    /// Reduce the error to the text a store keeps in its `error` field.
    ///
    /// Server-provided messages win, then the transport error, then `default`.
    pub fn user_message(&self, default: &str) -> String {
        match self {
            AppError::Api {
                message: Some(msg), ..
            } if !msg.trim().is_empty() => msg.clone(),
            AppError::Api { .. } => default.to_string(),
            AppError::Network(msg) | AppError::Decode(msg) if !msg.trim().is_empty() => {
                msg.clone()
            }
            AppError::Network(_) | AppError::Decode(_) => default.to_string(),
            other => other.message(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_) | AppError::Api { status: 404, .. })
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("HTTP error: {:?}", err);
        if err.is_timeout() {
            AppError::Timeout(crate::config::DEFAULT_API_TIMEOUT)
        } else if err.is_decode() {
            AppError::Decode(format!("Invalid response body: {}", err))
        } else {
            AppError::Network(format!("Network error: {}", err))
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::Decode(format!("JSON error: {}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("Storage error: {:?}", err);
        AppError::Storage(format!("Storage error: {}", err))
    }
}

/// Error details inside the `{ success, error: { code, message } }` envelope.
#[derive(Debug, Deserialize)]
pub struct ErrorDetails {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// The error body shapes the backend is known to send.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Envelope { error: ErrorDetails },
    Plain { message: String },
    Bare { error: String },
}

/// Extract a human-readable message from an error response body, if it carries one.
pub fn server_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let message = match parsed {
        ErrorBody::Envelope { error } => error.message.or(error.code)?,
        ErrorBody::Plain { message } => message,
        ErrorBody::Bare { error } => error,
    };

    let message = message.trim();
    if message.is_empty() {
        None
    } else {
        Some(message.to_string())
    }
}
