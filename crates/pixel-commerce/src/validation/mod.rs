//! Form and payload validation.
//!
//! Every payload that reaches the provider implements [`Validate`]. A failed
//! validation reports one message per broken rule, keyed by field name, and
//! nothing is sent.

mod forms;
pub mod rules;
mod schemas;

pub use forms::*;
pub use schemas::Schema;

use serde::{Deserialize, Serialize};
use std::fmt;

/// One broken rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    /// Field path, dotted for nested objects (`shipping_address.zipCode`).
    pub field: String,
    pub message: String,
}

/// All broken rules of a payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors for a single field.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Record `message` against `field` unless `ok` holds.
    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.add(field, message);
        }
    }

    /// Merge a nested object's errors under `prefix`.
    pub fn nest(&mut self, prefix: &str, nested: ValidationErrors) {
        for error in nested.errors {
            self.add(format!("{}.{}", prefix, error.field), error.message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Messages recorded for `field`.
    pub fn messages_for(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// A payload with field rules.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_and_nests() {
        let mut nested = ValidationErrors::new();
        nested.check(false, "zipCode", "CEP inválido");
        let mut errors = ValidationErrors::new();
        errors.check(true, "name", "Nome é obrigatório");
        errors.nest("shipping_address", nested);
        assert_eq!(errors.len(), 1);
        assert!(errors.has("shipping_address.zipCode"));
        assert_eq!(errors.to_string(), "shipping_address.zipCode: CEP inválido");
        assert!(errors.into_result().is_err());
        assert!(ValidationErrors::new().into_result().is_ok());
    }
}
