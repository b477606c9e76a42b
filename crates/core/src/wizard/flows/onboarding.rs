//! Investor onboarding: identity, accreditation, verification documents and
//! subscription agreement signature.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::accreditation::{
    AccreditationCriteria, AccreditationDetermination, AccreditationEngine, AccreditationStatus,
};
use crate::errors::Result;
use crate::wizard::stepper::{StepDefinition, StepKind, Wizard};

/// Proof that the signature pad was completed. The drawing itself stays with the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureCapture {
    pub signer_name: String,
    pub signed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingState {
    pub legal_name: String,
    pub email: String,
    pub criteria: AccreditationCriteria,
    pub determination: Option<AccreditationDetermination>,
    /// Labels of the verification documents the investor has uploaded.
    pub uploaded_documents: Vec<String>,
    pub agreed_to_terms: bool,
    pub signature: Option<SignatureCapture>,
}

impl OnboardingState {
    /// Verification documents still missing for the current determination.
    pub fn missing_documents(&self) -> Vec<String> {
        self.determination
            .as_ref()
            .map(|d| {
                d.verification_needed
                    .iter()
                    .filter(|label| !self.uploaded_documents.contains(label))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn is_accredited(&self) -> bool {
        self.determination
            .as_ref()
            .map(|d| d.status != AccreditationStatus::NonAccredited)
            .unwrap_or(false)
    }
}

pub fn onboarding_steps(engine: AccreditationEngine) -> Vec<StepDefinition<OnboardingState>> {
    let engine = Arc::new(engine);
    let validating_engine = Arc::clone(&engine);

    vec![
        StepDefinition::new("investor_type", "Investor Type", StepKind::Form).validate_with(
            |s: &OnboardingState| {
                if s.criteria.investor_type.is_none() {
                    vec!["Select an investor type".to_string()]
                } else {
                    Vec::new()
                }
            },
        ),
        StepDefinition::new("profile", "Investor Profile", StepKind::Form)
            .validate_with(validate_profile),
        StepDefinition::new("accreditation", "Accreditation", StepKind::Calculation)
            .validate_with(move |s: &OnboardingState| {
                match validating_engine.determine(&s.criteria) {
                    Ok(_) => Vec::new(),
                    Err(e) => vec![e.to_string()],
                }
            })
            .on_next(move |s: &mut OnboardingState| {
                s.determination = Some(engine.determine(&s.criteria)?);
                Ok(())
            }),
        StepDefinition::new("documents", "Verification Documents", StepKind::Documents)
            .skip_when(|s: &OnboardingState| !s.is_accredited())
            .validate_with(|s: &OnboardingState| {
                s.missing_documents()
                    .into_iter()
                    .map(|label| format!("Upload required document: {}", label))
                    .collect()
            }),
        StepDefinition::new("agreement", "Subscription Agreement", StepKind::Signature)
            .validate_with(validate_agreement),
        StepDefinition::new("review", "Review & Submit", StepKind::Review).validate_with(
            |s: &OnboardingState| {
                if s.determination.is_none() {
                    vec!["Accreditation has not been determined".to_string()]
                } else {
                    Vec::new()
                }
            },
        ),
    ]
}

pub fn onboarding_wizard(engine: AccreditationEngine) -> Result<Wizard<OnboardingState>> {
    Wizard::new(onboarding_steps(engine), OnboardingState::default())
}

fn validate_profile(s: &OnboardingState) -> Vec<String> {
    let mut errors = Vec::new();
    if s.legal_name.trim().is_empty() {
        errors.push("Legal name is required".to_string());
    }
    let email = s.email.trim();
    let valid_email = email
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.ends_with('.'))
        .unwrap_or(false);
    if !valid_email {
        errors.push("A valid email address is required".to_string());
    }
    errors
}

fn validate_agreement(s: &OnboardingState) -> Vec<String> {
    let mut errors = Vec::new();
    if !s.agreed_to_terms {
        errors.push("Accept the subscription agreement terms".to_string());
    }
    match &s.signature {
        None => errors.push("Signature is required".to_string()),
        Some(signature) => {
            if !signature
                .signer_name
                .trim()
                .eq_ignore_ascii_case(s.legal_name.trim())
            {
                errors.push("Signer name must match the legal name".to_string());
            }
        }
    }
    errors
}
