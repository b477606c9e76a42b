//! Wizard error types.

use thiserror::Error;

/// Errors raised while driving a multi-step wizard.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    /// A wizard was built without any steps, or every step is skipped.
    #[error("Wizard has no applicable steps")]
    NoSteps,

    /// Two steps share the same identifier.
    #[error("Duplicate step id: {0}")]
    DuplicateStep(String),

    /// The current step failed validation.
    #[error("Step '{step}' is incomplete: {}", reasons.join("; "))]
    StepInvalid { step: String, reasons: Vec<String> },

    /// No step has the requested identifier.
    #[error("Unknown step: {0}")]
    UnknownStep(String),

    /// The requested step has not been reached yet or is skipped.
    #[error("Step '{0}' is not reachable yet")]
    StepNotReached(String),

    /// The wizard has already finished.
    #[error("Wizard is already complete")]
    AlreadyComplete,
}

impl WizardError {
    pub fn step_invalid(step: impl Into<String>, reasons: Vec<String>) -> Self {
        Self::StepInvalid {
            step: step.into(),
            reasons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = WizardError::step_invalid(
            "profile",
            vec![
                "Legal name is required".to_string(),
                "Email is invalid".to_string(),
            ],
        );
        assert_eq!(
            err.to_string(),
            "Step 'profile' is incomplete: Legal name is required; Email is invalid"
        );

        let err = WizardError::UnknownStep("nope".to_string());
        assert_eq!(err.to_string(), "Unknown step: nope");
    }
}
