//! Dilution module - post-issuance ownership, dilution and severity ratings
//! for a subsidiary's cap table.

mod dilution_calculator;
mod dilution_model;
mod dilution_service;
mod dilution_severity;
mod dilution_traits;

pub use dilution_calculator::{
    calculate_dilution, calculate_issuance, calculate_ownership_with_new_investors,
    calculate_post_money_valuation, price_per_share, shares_for_investment,
};
pub use dilution_model::{
    CapTable, DilutionOutcome, DilutionReport, DilutionSeverity, IncomingInvestor,
    InvestorAllocation, IssuanceProposal, SeverityBands, SeverityLevel, Stakeholder,
    StakeholderDilution,
};
pub use dilution_service::DilutionService;
pub use dilution_severity::get_dilution_severity;
pub use dilution_traits::{CapTableRepositoryTrait, DilutionServiceTrait};
