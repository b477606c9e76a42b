//! Cap table and dilution domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{SEVERITY_HIGH_FROM, SEVERITY_MEDIUM_FROM, SEVERITY_SEVERE_FROM};
use crate::errors::{Error, Result, ValidationError};

/// A holder of equity before a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stakeholder {
    pub user_id: String,
    pub name: String,
    pub current_shares: u64,
}

impl Stakeholder {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>, current_shares: u64) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            current_shares,
        }
    }
}

/// The cap table of a single subsidiary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapTable {
    pub subsidiary_id: String,
    pub stakeholders: Vec<Stakeholder>,
}

impl CapTable {
    /// Total shares outstanding. Fails if the count does not fit in a `u64`.
    pub fn total_shares(&self) -> Result<u64> {
        total_shares(&self.stakeholders)
    }
}

pub(crate) fn total_shares(stakeholders: &[Stakeholder]) -> Result<u64> {
    checked_share_sum(stakeholders.iter().map(|s| s.current_shares))
}

pub(crate) fn checked_share_sum(shares: impl IntoIterator<Item = u64>) -> Result<u64> {
    shares.into_iter().try_fold(0u64, |acc, n| {
        acc.checked_add(n).ok_or_else(|| {
            ValidationError::invalid("share count exceeds the supported range").into()
        })
    })
}

/// A stakeholder row after a transaction has been applied.
///
/// Percentages are in percent (0-100), not fractions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakeholderDilution {
    pub user_id: Option<String>,
    pub name: String,
    pub is_new_investor: bool,
    pub current_shares: u64,
    pub current_ownership: Decimal,
    pub new_shares: u64,
    pub new_ownership: Decimal,
    /// Percentage-point drop in ownership.
    pub dilution: Decimal,
    /// Relative drop: `dilution / current_ownership * 100`.
    pub dilution_percent: Decimal,
    /// Estimated change in the dollar value of the stake.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_change: Option<Decimal>,
}

/// Shares allocated to an incoming investor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestorAllocation {
    pub user_id: Option<String>,
    pub name: String,
    pub shares: u64,
}

/// Result of issuing an anonymous block of new shares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DilutionOutcome {
    pub stakeholders: Vec<StakeholderDilution>,
    pub total_shares_before: u64,
    pub total_shares_after: u64,
    pub new_shares_issued: u64,
    /// Ownership held by the newly issued block.
    pub new_shares_ownership: Decimal,
}

/// An investor committing cash in a proposed round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingInvestor {
    pub user_id: Option<String>,
    pub name: String,
    pub amount: Decimal,
}

/// A proposed new issuance priced off the pre-money valuation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuanceProposal {
    pub investment_amount: Decimal,
    pub valuation_pre: Decimal,
    #[serde(default)]
    pub incoming_investors: Vec<IncomingInvestor>,
}

/// Full result of modelling an issuance against a cap table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DilutionReport {
    pub valuation_pre: Decimal,
    pub valuation_post: Decimal,
    pub price_per_share: Decimal,
    pub total_shares_before: u64,
    pub total_shares_after: u64,
    pub new_shares_issued: u64,
    pub stakeholders: Vec<StakeholderDilution>,
    /// Severity per existing stakeholder, keyed in the same order.
    pub severities: Vec<DilutionSeverity>,
}

impl DilutionReport {
    /// Rows for holders that existed before the issuance.
    pub fn existing(&self) -> impl Iterator<Item = &StakeholderDilution> {
        self.stakeholders.iter().filter(|s| !s.is_new_investor)
    }

    /// Rows for investors added by the issuance.
    pub fn new_investors(&self) -> impl Iterator<Item = &StakeholderDilution> {
        self.stakeholders.iter().filter(|s| s.is_new_investor)
    }
}

// =============================================================================
// Severity
// =============================================================================

/// Qualitative dilution rating, ordered from mildest to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityLevel {
    Low,
    Medium,
    High,
    Severe,
}

impl SeverityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityLevel::Low => "low",
            SeverityLevel::Medium => "medium",
            SeverityLevel::High => "high",
            SeverityLevel::Severe => "severe",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SeverityLevel::Low => "Minimal impact on ownership",
            SeverityLevel::Medium => "Moderate dilution of ownership",
            SeverityLevel::High => "Significant dilution of ownership",
            SeverityLevel::Severe => "Severe dilution; ownership substantially reduced",
        }
    }

    /// UI color tag for badges.
    pub fn color(&self) -> &'static str {
        match self {
            SeverityLevel::Low => "green",
            SeverityLevel::Medium => "yellow",
            SeverityLevel::High => "orange",
            SeverityLevel::Severe => "red",
        }
    }
}

impl std::fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DilutionSeverity {
    pub level: SeverityLevel,
    pub description: String,
    pub color: String,
}

impl From<SeverityLevel> for DilutionSeverity {
    fn from(level: SeverityLevel) -> Self {
        Self {
            level,
            description: level.description().to_string(),
            color: level.color().to_string(),
        }
    }
}

/// Cut points (in relative dilution percent) between severity levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeverityBands {
    pub medium_from: Decimal,
    pub high_from: Decimal,
    pub severe_from: Decimal,
}

impl Default for SeverityBands {
    fn default() -> Self {
        Self {
            medium_from: SEVERITY_MEDIUM_FROM,
            high_from: SEVERITY_HIGH_FROM,
            severe_from: SEVERITY_SEVERE_FROM,
        }
    }
}

impl SeverityBands {
    pub fn classify(&self, dilution_percent: Decimal) -> DilutionSeverity {
        let level = if dilution_percent < self.medium_from {
            SeverityLevel::Low
        } else if dilution_percent < self.high_from {
            SeverityLevel::Medium
        } else if dilution_percent < self.severe_from {
            SeverityLevel::High
        } else {
            SeverityLevel::Severe
        };
        level.into()
    }

    pub fn validate(&self) -> Result<()> {
        if self.medium_from <= Decimal::ZERO {
            return Err(Error::InvalidConfigValue(
                "mediumFrom must be > 0".to_string(),
            ));
        }
        if self.medium_from >= self.high_from {
            return Err(Error::InvalidConfigValue(
                "mediumFrom must be < highFrom".to_string(),
            ));
        }
        if self.high_from >= self.severe_from {
            return Err(Error::InvalidConfigValue(
                "highFrom must be < severeFrom".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_severity_ordering() {
        assert!(SeverityLevel::Low < SeverityLevel::Medium);
        assert!(SeverityLevel::Medium < SeverityLevel::High);
        assert!(SeverityLevel::High < SeverityLevel::Severe);
    }

    #[test]
    fn test_custom_bands_classify() {
        let bands = SeverityBands {
            medium_from: dec!(10),
            high_from: dec!(20),
            severe_from: dec!(40),
        };
        assert_eq!(bands.classify(dec!(9.9)).level, SeverityLevel::Low);
        assert_eq!(bands.classify(dec!(25)).level, SeverityLevel::High);
        assert_eq!(bands.classify(dec!(40)).level, SeverityLevel::Severe);
    }

    #[test]
    fn test_bands_validation() {
        assert!(SeverityBands::default().validate().is_ok());

        let unordered = SeverityBands {
            high_from: dec!(40),
            ..Default::default()
        };
        assert!(unordered.validate().is_err());

        let zero = SeverityBands {
            medium_from: dec!(0),
            ..Default::default()
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_cap_table_total_shares() {
        let table = CapTable {
            subsidiary_id: "sub-1".to_string(),
            stakeholders: vec![
                Stakeholder::new("u1", "Founder", 900),
                Stakeholder::new("u2", "Angel", 100),
            ],
        };
        assert_eq!(table.total_shares().unwrap(), 1000);
    }

    #[test]
    fn test_cap_table_total_shares_overflow() {
        let table = CapTable {
            subsidiary_id: "sub-1".to_string(),
            stakeholders: vec![
                Stakeholder::new("u1", "Founder", u64::MAX),
                Stakeholder::new("u2", "Angel", 1),
            ],
        };
        assert!(matches!(
            table.total_shares(),
            Err(Error::Validation(ValidationError::InvalidInput(_)))
        ));
    }

    #[test]
    fn test_issuance_proposal_defaults_investors() {
        let json = r#"{"investmentAmount": 1000000, "valuationPre": 9000000}"#;
        let proposal: IssuanceProposal = serde_json::from_str(json).unwrap();
        assert!(proposal.incoming_investors.is_empty());
        assert_eq!(proposal.valuation_pre, dec!(9000000));
    }
}
