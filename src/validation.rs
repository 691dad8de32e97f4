//! Client-side form validation.
//!
//! Validation runs before any network call. Errors are keyed by field so a form can show
//! them inline next to the offending input.

use std::fmt;

/// A single failed rule for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All failed rules for one submission, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// First message recorded for `field`, for inline display.
    pub fn field(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// `Ok(())` when nothing failed.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Require a non-blank string.
    pub fn require(&mut self, field: &'static str, value: &str, label: &str) {
        if value.trim().is_empty() {
            self.add(field, format!("{} is required", label));
        }
    }

    /// Same as [`require`](Self::require) but only when the value is present.
    pub fn require_if_present(&mut self, field: &'static str, value: Option<&str>, label: &str) {
        if let Some(value) = value {
            self.require(field, value, label);
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Implemented by request bodies that can be checked before submission.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Parse a user-typed money amount.
pub fn parse_amount(input: &str) -> Result<f64, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Amount is required".to_string());
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err("Amount must be a number".to_string()),
    }
}
