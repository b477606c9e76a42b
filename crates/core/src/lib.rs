//! Investor Nexus Core - accreditation, dilution and wizard logic.
//!
//! This crate holds the pure decision logic behind the investor portal:
//! classifying investors for accreditation, modelling how a new issuance
//! dilutes a subsidiary's cap table, and the step machine that drives the
//! onboarding, voting and proposal flows. It performs no I/O of its own;
//! persistence is reached through repository traits implemented by the host.

pub mod accreditation;
pub mod config;
pub mod constants;
pub mod dilution;
pub mod errors;
pub mod wizard;

pub use config::NexusConfig;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
