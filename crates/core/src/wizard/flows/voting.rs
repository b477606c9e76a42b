//! Shareholder voting on an open proposal.

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::wizard::stepper::{StepDefinition, StepKind, Wizard};

const MAX_RATIONALE_CHARS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteChoice {
    For,
    Against,
    Abstain,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingState {
    pub proposal_id: Option<String>,
    pub acknowledged_proposal: bool,
    pub choice: Option<VoteChoice>,
    /// Shares the voter holds in the subsidiary.
    pub voting_power: u64,
    pub rationale: Option<String>,
    pub confirmed: bool,
}

pub fn voting_steps() -> Vec<StepDefinition<VotingState>> {
    vec![
        StepDefinition::new("select_proposal", "Select Proposal", StepKind::Form).validate_with(
            |s: &VotingState| match s.proposal_id.as_deref().map(str::trim) {
                Some(id) if !id.is_empty() => Vec::new(),
                _ => vec!["Select a proposal to vote on".to_string()],
            },
        ),
        StepDefinition::new("review_proposal", "Review Proposal", StepKind::Review).validate_with(
            |s: &VotingState| {
                if s.acknowledged_proposal {
                    Vec::new()
                } else {
                    vec!["Confirm you have read the proposal".to_string()]
                }
            },
        ),
        StepDefinition::new("cast_vote", "Cast Vote", StepKind::Form).validate_with(validate_vote),
        StepDefinition::new("confirm", "Confirm Vote", StepKind::Review).validate_with(
            |s: &VotingState| {
                if s.confirmed {
                    Vec::new()
                } else {
                    vec!["Confirm your vote to submit it".to_string()]
                }
            },
        ),
    ]
}

pub fn voting_wizard(proposal_id: Option<String>, voting_power: u64) -> Result<Wizard<VotingState>> {
    let state = VotingState {
        proposal_id,
        voting_power,
        ..Default::default()
    };
    Wizard::new(voting_steps(), state)
}

fn validate_vote(s: &VotingState) -> Vec<String> {
    let mut errors = Vec::new();
    if s.choice.is_none() {
        errors.push("Choose For, Against or Abstain".to_string());
    }
    if s.voting_power == 0 {
        errors.push("You hold no voting shares in this subsidiary".to_string());
    }
    if let Some(rationale) = &s.rationale {
        if rationale.chars().count() > MAX_RATIONALE_CHARS {
            errors.push(format!(
                "Rationale must be at most {} characters",
                MAX_RATIONALE_CHARS
            ));
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::WizardStatus;

    #[test]
    fn test_vote_flow() {
        let mut wizard = voting_wizard(Some("prop-7".to_string()), 250).unwrap();
        wizard.next().unwrap();

        assert!(!wizard.can_proceed());
        wizard.state_mut().acknowledged_proposal = true;
        wizard.next().unwrap();

        wizard.state_mut().choice = Some(VoteChoice::For);
        wizard.next().unwrap();

        wizard.state_mut().confirmed = true;
        assert_eq!(wizard.next().unwrap(), WizardStatus::Completed);
        assert_eq!(wizard.into_state().choice, Some(VoteChoice::For));
    }

    #[test]
    fn test_blank_proposal_id_blocks() {
        let wizard = voting_wizard(Some("  ".to_string()), 10).unwrap();
        assert!(!wizard.can_proceed());
    }

    #[test]
    fn test_vote_validation() {
        let state = VotingState {
            rationale: Some("x".repeat(MAX_RATIONALE_CHARS + 1)),
            ..Default::default()
        };
        assert_eq!(validate_vote(&state).len(), 3);

        let state = VotingState {
            choice: Some(VoteChoice::Abstain),
            voting_power: 1,
            ..Default::default()
        };
        assert!(validate_vote(&state).is_empty());
    }
}
