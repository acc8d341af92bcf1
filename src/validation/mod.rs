//! Declarative body validation for write operations.
//!
//! A [`Schema`] is a table of field rules; [`validate`] walks it in order and
//! stops at the first violation.

pub mod schema;

use serde_json::{Map, Value};
use thiserror::Error;

pub use schema::{FieldKind, FieldRule, Schema};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("\"value\" must be of type object")]
    NotAnObject,

    #[error("\"{0}\" is required")]
    Required(String),

    #[error("\"{field}\" must be a {expected}")]
    WrongType { field: String, expected: &'static str },

    #[error("\"{0}\" is not allowed to be empty")]
    Empty(String),

    #[error("\"{field}\" length must be at least {min} characters long")]
    TooShort { field: String, min: usize },
}

impl ValidationError {
    /// Field that failed, if the failure is tied to one
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::NotAnObject => None,
            ValidationError::Required(f) | ValidationError::Empty(f) => Some(f.as_str()),
            ValidationError::WrongType { field, .. } | ValidationError::TooShort { field, .. } => {
                Some(field.as_str())
            }
        }
    }
}

/// Body that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedBody(Map<String, Value>);

impl ValidatedBody {
    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }
}

pub fn validate(schema: &Schema, body: &Value) -> Result<ValidatedBody, ValidationError> {
    let obj = body.as_object().ok_or(ValidationError::NotAnObject)?;

    for rule in &schema.rules {
        match obj.get(&rule.field) {
            None => {
                if rule.required {
                    return Err(ValidationError::Required(rule.field.clone()));
                }
            }
            Some(value) => check_value(rule, value)?,
        }
    }

    Ok(ValidatedBody(obj.clone()))
}

fn check_value(rule: &FieldRule, value: &Value) -> Result<(), ValidationError> {
    match rule.kind {
        FieldKind::String => {
            let s = value.as_str().ok_or_else(|| ValidationError::WrongType {
                field: rule.field.clone(),
                expected: rule.kind.name(),
            })?;
            if s.is_empty() {
                return Err(ValidationError::Empty(rule.field.clone()));
            }
            // Lengths count UTF-16 code units, like the JS clients of this API
            if s.encode_utf16().count() < rule.min_len {
                return Err(ValidationError::TooShort {
                    field: rule.field.clone(),
                    min: rule.min_len,
                });
            }
        }
    }
    Ok(())
}
