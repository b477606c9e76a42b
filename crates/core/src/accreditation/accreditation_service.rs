use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::info;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::{Result, ValidationError};

use super::accreditation_engine::AccreditationEngine;
use super::accreditation_model::{
    AccreditationCriteria, AccreditationDetermination, AccreditationRecord,
    AccreditationThresholds,
};
use super::accreditation_traits::{AccreditationRepositoryTrait, AccreditationServiceTrait};

pub struct AccreditationService {
    repository: Arc<dyn AccreditationRepositoryTrait>,
    engine: RwLock<AccreditationEngine>,
}

impl AccreditationService {
    pub fn new(repository: Arc<dyn AccreditationRepositoryTrait>) -> Self {
        Self {
            repository,
            engine: RwLock::new(AccreditationEngine::new()),
        }
    }

    pub fn with_thresholds(
        repository: Arc<dyn AccreditationRepositoryTrait>,
        thresholds: AccreditationThresholds,
    ) -> Self {
        Self {
            repository,
            engine: RwLock::new(AccreditationEngine::with_thresholds(thresholds)),
        }
    }
}

#[async_trait]
impl AccreditationServiceTrait for AccreditationService {
    async fn preview(&self, criteria: &AccreditationCriteria) -> Result<AccreditationDetermination> {
        self.engine.read().await.determine(criteria)
    }

    async fn submit(
        &self,
        investor_id: &str,
        criteria: AccreditationCriteria,
    ) -> Result<AccreditationRecord> {
        if investor_id.trim().is_empty() {
            return Err(ValidationError::MissingField("investorId".to_string()).into());
        }

        let determination = self.engine.read().await.determine(&criteria)?;
        let record = AccreditationRecord {
            id: Uuid::new_v4().to_string(),
            investor_id: investor_id.to_string(),
            criteria,
            determination,
            determined_at: Utc::now(),
        };

        let saved = self.repository.save(&record).await?;
        info!(
            "Saved accreditation {} for investor {}: {}",
            saved.id, saved.investor_id, saved.determination.status
        );
        Ok(saved)
    }

    fn get_latest(&self, investor_id: &str) -> Result<Option<AccreditationRecord>> {
        self.repository.get_latest_for_investor(investor_id)
    }

    async fn get_thresholds(&self) -> AccreditationThresholds {
        self.engine.read().await.thresholds().clone()
    }

    async fn update_thresholds(&self, thresholds: AccreditationThresholds) -> Result<()> {
        thresholds.validate()?;
        *self.engine.write().await = AccreditationEngine::with_thresholds(thresholds);
        info!("Accreditation thresholds updated");
        Ok(())
    }
}
