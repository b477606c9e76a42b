//! Wizard flows built on the generic stepper.

mod onboarding;
mod proposal;
mod voting;

pub use onboarding::{onboarding_steps, onboarding_wizard, OnboardingState, SignatureCapture};
pub use proposal::{proposal_steps, proposal_wizard, ProposalCategory, ProposalDraft};
pub use voting::{voting_steps, voting_wizard, VoteChoice, VotingState};
