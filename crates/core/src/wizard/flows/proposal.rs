//! Drafting a governance proposal. Financing proposals carry issuance terms
//! and a dilution preview computed against the subsidiary's cap table.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dilution::{
    calculate_issuance, DilutionReport, IssuanceProposal, SeverityBands, Stakeholder,
};
use crate::errors::{Result, ValidationError};
use crate::wizard::stepper::{StepDefinition, StepKind, Wizard};

const MIN_TITLE_CHARS: usize = 5;
const MIN_VOTING_DAYS: u32 = 1;
const MAX_VOTING_DAYS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalCategory {
    General,
    Governance,
    Financing,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalDraft {
    pub title: String,
    pub summary: String,
    pub category: Option<ProposalCategory>,
    pub cap_table: Vec<Stakeholder>,
    pub issuance: Option<IssuanceProposal>,
    pub dilution_preview: Option<DilutionReport>,
    pub voting_period_days: u32,
}

impl ProposalDraft {
    fn is_financing(&self) -> bool {
        self.category == Some(ProposalCategory::Financing)
    }
}

pub fn proposal_steps(bands: SeverityBands) -> Vec<StepDefinition<ProposalDraft>> {
    vec![
        StepDefinition::new("basics", "Proposal Details", StepKind::Form)
            .validate_with(validate_basics),
        StepDefinition::new("category", "Category", StepKind::Form).validate_with(
            |d: &ProposalDraft| {
                if d.category.is_none() {
                    vec!["Choose a proposal category".to_string()]
                } else {
                    Vec::new()
                }
            },
        ),
        StepDefinition::new("financing_terms", "Financing Terms", StepKind::Calculation)
            .skip_when(|d: &ProposalDraft| !d.is_financing())
            .validate_with(validate_financing)
            .on_next(move |d: &mut ProposalDraft| {
                let issuance = d
                    .issuance
                    .as_ref()
                    .ok_or_else(|| ValidationError::MissingField("issuance".to_string()))?;
                d.dilution_preview = Some(calculate_issuance(&d.cap_table, issuance, &bands)?);
                Ok(())
            }),
        StepDefinition::new("voting_period", "Voting Period", StepKind::Form).validate_with(
            |d: &ProposalDraft| {
                if (MIN_VOTING_DAYS..=MAX_VOTING_DAYS).contains(&d.voting_period_days) {
                    Vec::new()
                } else {
                    vec![format!(
                        "Voting period must be between {} and {} days",
                        MIN_VOTING_DAYS, MAX_VOTING_DAYS
                    )]
                }
            },
        ),
        StepDefinition::new("review", "Review & Publish", StepKind::Review).validate_with(
            |d: &ProposalDraft| {
                if d.is_financing() && d.dilution_preview.is_none() {
                    vec!["Dilution preview has not been calculated".to_string()]
                } else {
                    Vec::new()
                }
            },
        ),
    ]
}

pub fn proposal_wizard(
    cap_table: Vec<Stakeholder>,
    bands: SeverityBands,
) -> Result<Wizard<ProposalDraft>> {
    let draft = ProposalDraft {
        cap_table,
        voting_period_days: 7,
        ..Default::default()
    };
    Wizard::new(proposal_steps(bands), draft)
}

fn validate_basics(d: &ProposalDraft) -> Vec<String> {
    let mut errors = Vec::new();
    if d.title.trim().chars().count() < MIN_TITLE_CHARS {
        errors.push(format!(
            "Title must be at least {} characters",
            MIN_TITLE_CHARS
        ));
    }
    if d.summary.trim().is_empty() {
        errors.push("Summary is required".to_string());
    }
    errors
}

fn validate_financing(d: &ProposalDraft) -> Vec<String> {
    let Some(issuance) = &d.issuance else {
        return vec!["Enter the investment amount and pre-money valuation".to_string()];
    };
    let mut errors = Vec::new();
    if issuance.investment_amount <= Decimal::ZERO {
        errors.push("Investment amount must be greater than zero".to_string());
    }
    if issuance.valuation_pre <= Decimal::ZERO {
        errors.push("Pre-money valuation must be greater than zero".to_string());
    }
    if d.cap_table.is_empty() {
        errors.push("The subsidiary has no cap table to dilute".to_string());
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dilution::SeverityLevel;
    use crate::wizard::WizardStatus;
    use rust_decimal_macros::dec;

    fn cap_table() -> Vec<Stakeholder> {
        vec![
            Stakeholder::new("u1", "Founder", 900),
            Stakeholder::new("u2", "Angel", 100),
        ]
    }

    fn fill_basics(wizard: &mut Wizard<ProposalDraft>, category: ProposalCategory) {
        let draft = wizard.state_mut();
        draft.title = "Series A extension".to_string();
        draft.summary = "Raise additional capital".to_string();
        wizard.next().unwrap();
        wizard.state_mut().category = Some(category);
        wizard.next().unwrap();
    }

    #[test]
    fn test_financing_proposal_computes_preview() {
        let mut wizard = proposal_wizard(cap_table(), SeverityBands::default()).unwrap();
        fill_basics(&mut wizard, ProposalCategory::Financing);

        assert_eq!(wizard.current_step().id(), "financing_terms");
        assert!(!wizard.can_proceed());

        wizard.state_mut().issuance = Some(IssuanceProposal {
            investment_amount: dec!(1000000),
            valuation_pre: dec!(9000000),
            incoming_investors: vec![],
        });
        wizard.next().unwrap();

        let preview = wizard.state().dilution_preview.clone().unwrap();
        assert_eq!(preview.new_shares_issued, 111);
        assert_eq!(preview.severities[0].level, SeverityLevel::Medium);

        wizard.next().unwrap();
        assert_eq!(wizard.next().unwrap(), WizardStatus::Completed);
    }

    #[test]
    fn test_general_proposal_skips_financing() {
        let mut wizard = proposal_wizard(cap_table(), SeverityBands::default()).unwrap();
        fill_basics(&mut wizard, ProposalCategory::Governance);
        assert_eq!(wizard.current_step().id(), "voting_period");

        wizard.state_mut().voting_period_days = 45;
        assert!(!wizard.can_proceed());
        wizard.state_mut().voting_period_days = 14;
        wizard.next().unwrap();
        assert_eq!(wizard.next().unwrap(), WizardStatus::Completed);
        assert!(wizard.state().dilution_preview.is_none());
    }

    #[test]
    fn test_basics_validation() {
        let draft = ProposalDraft {
            title: " abc ".to_string(),
            ..Default::default()
        };
        assert_eq!(validate_basics(&draft).len(), 2);
    }

    #[test]
    fn test_financing_validation_needs_cap_table() {
        let draft = ProposalDraft {
            category: Some(ProposalCategory::Financing),
            issuance: Some(IssuanceProposal {
                investment_amount: dec!(0),
                valuation_pre: dec!(1000),
                incoming_investors: vec![],
            }),
            ..Default::default()
        };
        assert_eq!(
            validate_financing(&draft),
            vec![
                "Investment amount must be greater than zero",
                "The subsidiary has no cap table to dilute",
            ]
        );
    }
}
