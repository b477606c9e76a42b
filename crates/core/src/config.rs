//! Tunable thresholds for the nexus core.
//!
//! Defaults reproduce the regulatory accreditation thresholds and the
//! canonical 5/15/30 dilution severity bands. Hosts may ship a JSON override;
//! any key left out keeps its default.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::accreditation::AccreditationThresholds;
use crate::dilution::SeverityBands;
use crate::errors::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NexusConfig {
    pub accreditation: AccreditationThresholds,
    pub severity: SeverityBands,
}

impl NexusConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: NexusConfig = serde_json::from_str(json)?;
        config.validate()?;
        debug!("Loaded nexus configuration: {:?}", config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.accreditation.validate()?;
        self.severity.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_document_yields_defaults() {
        let config = NexusConfig::from_json("{}").unwrap();
        assert_eq!(config, NexusConfig::default());
        assert_eq!(config.accreditation.individual_income, dec!(200000));
        assert_eq!(config.severity.severe_from, dec!(30));
    }

    #[test]
    fn test_partial_override() {
        let config = NexusConfig::from_json(
            r#"{ "accreditation": { "netWorth": 1500000 }, "severity": { "mediumFrom": 2 } }"#,
        )
        .unwrap();
        assert_eq!(config.accreditation.net_worth, dec!(1500000));
        assert_eq!(config.accreditation.joint_income, dec!(300000));
        assert_eq!(config.severity.medium_from, dec!(2));
        assert_eq!(config.severity.high_from, dec!(15));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = NexusConfig::from_json(r#"{ "severity": { "highFrom": 50 } }"#);
        assert!(matches!(result, Err(Error::InvalidConfigValue(_))));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let result = NexusConfig::from_json("{ accreditation: ");
        assert!(matches!(result, Err(Error::Validation(_))));
    }
}
