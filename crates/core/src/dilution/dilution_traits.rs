use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::dilution::dilution_model::{
    CapTable, DilutionOutcome, DilutionReport, IssuanceProposal, SeverityBands,
};
use crate::errors::Result;

/// Trait for reading cap tables from the host's data store.
pub trait CapTableRepositoryTrait: Send + Sync {
    fn load(&self, subsidiary_id: &str) -> Result<CapTable>;
}

/// Trait for dilution service operations
#[async_trait]
pub trait DilutionServiceTrait: Send + Sync {
    fn get_cap_table(&self, subsidiary_id: &str) -> Result<CapTable>;

    fn preview_new_shares(
        &self,
        subsidiary_id: &str,
        new_shares: u64,
        valuation_pre: Decimal,
        valuation_post: Decimal,
    ) -> Result<DilutionOutcome>;

    async fn preview_issuance(
        &self,
        subsidiary_id: &str,
        proposal: &IssuanceProposal,
    ) -> Result<DilutionReport>;

    async fn get_severity_bands(&self) -> SeverityBands;

    async fn update_severity_bands(&self, bands: SeverityBands) -> Result<()>;
}
