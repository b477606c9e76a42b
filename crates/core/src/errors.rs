//! Core error types for the investor nexus.
//!
//! Persistence is owned by the host application, so storage failures arrive
//! here already flattened to strings by whatever implements the repository
//! traits.

use thiserror::Error;

use crate::wizard::WizardError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the investor nexus core.
///
/// Classification outcomes such as "non accredited" or "no dilution" are
/// ordinary results and never surface through this type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),
}

impl ValidationError {
    /// Shorthand for an `InvalidInput` error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message() {
        let err: Error = ValidationError::MissingField("investorType".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Input validation failed: Required field 'investorType' is missing"
        );
    }

    #[test]
    fn test_json_error_maps_to_validation() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_error_into_string() {
        let message: String = Error::NotFound("cap table sub-1".to_string()).into();
        assert_eq!(message, "Record not found: cap table sub-1");
    }
}
