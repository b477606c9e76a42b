use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::errors::Result;

use super::dilution_calculator::{calculate_dilution, calculate_issuance};
use super::dilution_model::{
    CapTable, DilutionOutcome, DilutionReport, IssuanceProposal, SeverityBands,
};
use super::dilution_traits::{CapTableRepositoryTrait, DilutionServiceTrait};

pub struct DilutionService {
    cap_table_repository: Arc<dyn CapTableRepositoryTrait>,
    bands: RwLock<SeverityBands>,
}

impl DilutionService {
    pub fn new(cap_table_repository: Arc<dyn CapTableRepositoryTrait>) -> Self {
        Self {
            cap_table_repository,
            bands: RwLock::new(SeverityBands::default()),
        }
    }

    pub fn with_bands(
        cap_table_repository: Arc<dyn CapTableRepositoryTrait>,
        bands: SeverityBands,
    ) -> Self {
        Self {
            cap_table_repository,
            bands: RwLock::new(bands),
        }
    }
}

#[async_trait]
impl DilutionServiceTrait for DilutionService {
    fn get_cap_table(&self, subsidiary_id: &str) -> Result<CapTable> {
        self.cap_table_repository.load(subsidiary_id)
    }

    fn preview_new_shares(
        &self,
        subsidiary_id: &str,
        new_shares: u64,
        valuation_pre: Decimal,
        valuation_post: Decimal,
    ) -> Result<DilutionOutcome> {
        let cap_table = self.cap_table_repository.load(subsidiary_id)?;
        debug!(
            "Previewing {} new shares for {} ({} holders)",
            new_shares,
            subsidiary_id,
            cap_table.stakeholders.len()
        );
        calculate_dilution(
            &cap_table.stakeholders,
            new_shares,
            valuation_pre,
            valuation_post,
        )
    }

    async fn preview_issuance(
        &self,
        subsidiary_id: &str,
        proposal: &IssuanceProposal,
    ) -> Result<DilutionReport> {
        let cap_table = self.cap_table_repository.load(subsidiary_id)?;
        let bands = self.bands.read().await.clone();
        calculate_issuance(&cap_table.stakeholders, proposal, &bands)
    }

    async fn get_severity_bands(&self) -> SeverityBands {
        self.bands.read().await.clone()
    }

    async fn update_severity_bands(&self, bands: SeverityBands) -> Result<()> {
        bands.validate()?;
        *self.bands.write().await = bands;
        info!("Dilution severity bands updated");
        Ok(())
    }
}
