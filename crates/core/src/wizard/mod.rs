//! Multi-step wizard module.
//!
//! Onboarding, voting and proposal creation all walk the user through an
//! ordered set of steps with per-step gating. They share one state machine:
//!
//! ```text
//! Wizard<S> ──▶ StepDefinition<S> { validate, on_next, skip_when, kind }
//!     │
//!     ├─ next()   validate → on_next → advance past skipped steps
//!     ├─ back()   previous applicable step
//!     └─ go_to()  any step already reached
//! ```
//!
//! `StepKind` tells the UI which renderer to use; rendering itself lives
//! outside this crate.

pub mod errors;
pub mod flows;
pub mod stepper;

pub use errors::WizardError;
pub use flows::*;
pub use stepper::{StepDefinition, StepKind, StepSummary, Wizard, WizardProgress, WizardStatus};
