use async_trait::async_trait;

use crate::accreditation::accreditation_model::{
    AccreditationCriteria, AccreditationDetermination, AccreditationRecord,
    AccreditationThresholds,
};
use crate::errors::Result;

/// Trait for accreditation record persistence.
#[async_trait]
pub trait AccreditationRepositoryTrait: Send + Sync {
    async fn save(&self, record: &AccreditationRecord) -> Result<AccreditationRecord>;
    fn get_latest_for_investor(&self, investor_id: &str) -> Result<Option<AccreditationRecord>>;
}

/// Trait for accreditation service operations
#[async_trait]
pub trait AccreditationServiceTrait: Send + Sync {
    /// Runs the engine without persisting anything (live form preview).
    async fn preview(&self, criteria: &AccreditationCriteria) -> Result<AccreditationDetermination>;

    /// Runs the engine and persists the resulting record.
    async fn submit(
        &self,
        investor_id: &str,
        criteria: AccreditationCriteria,
    ) -> Result<AccreditationRecord>;

    fn get_latest(&self, investor_id: &str) -> Result<Option<AccreditationRecord>>;

    async fn get_thresholds(&self) -> AccreditationThresholds;

    async fn update_thresholds(&self, thresholds: AccreditationThresholds) -> Result<()>;
}
