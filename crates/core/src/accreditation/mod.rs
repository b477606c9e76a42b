//! Accreditation module - classifies investors as non-accredited, accredited
//! or qualified purchasers and lists the documents needed to verify the claim.

mod accreditation_engine;
mod accreditation_model;
mod accreditation_service;
mod accreditation_traits;

pub use accreditation_engine::{determine, AccreditationEngine};
pub use accreditation_model::{
    AccreditationCriteria, AccreditationDetermination, AccreditationRecord, AccreditationRule,
    AccreditationStatus, AccreditationThresholds, InvestorType, LicenseType, RuleEvaluation,
    VerificationDocument,
};
pub use accreditation_service::AccreditationService;
pub use accreditation_traits::{AccreditationRepositoryTrait, AccreditationServiceTrait};
