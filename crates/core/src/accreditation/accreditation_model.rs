//! Accreditation domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{
    ENTITY_ASSETS_THRESHOLD, INDIVIDUAL_INCOME_THRESHOLD, JOINT_INCOME_THRESHOLD,
    NET_WORTH_THRESHOLD, QUALIFIED_PURCHASER_THRESHOLD, TRUST_ASSETS_THRESHOLD,
};
use crate::errors::{Error, Result};

// =============================================================================
// Inputs
// =============================================================================

/// The legal form of the investor, which selects the rule path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestorType {
    Individual,
    Entity,
    Trust,
}

impl InvestorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvestorType::Individual => "individual",
            InvestorType::Entity => "entity",
            InvestorType::Trust => "trust",
        }
    }
}

impl std::fmt::Display for InvestorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// FINRA licence held by an individual investor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseType {
    Series7,
    Series65,
    Series82,
    Other,
}

impl LicenseType {
    pub fn label(&self) -> &'static str {
        match self {
            LicenseType::Series7 => "Series 7",
            LicenseType::Series65 => "Series 65",
            LicenseType::Series82 => "Series 82",
            LicenseType::Other => "securities",
        }
    }
}

/// Answers collected by the onboarding accreditation step.
///
/// Currency amounts are whole US dollars. `None` means the investor did not
/// answer, which is not the same as answering zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccreditationCriteria {
    pub investor_type: Option<InvestorType>,

    // Individual path
    pub annual_income: Option<Decimal>,
    pub joint_income: Option<Decimal>,
    pub net_worth: Option<Decimal>,

    // Entity path
    pub entity_assets: Option<Decimal>,
    pub all_owners_accredited: Option<bool>,
    #[serde(rename = "is501c3")]
    pub is_501c3: Option<bool>,

    // Trust path
    pub trust_assets: Option<Decimal>,
    pub trustor_accredited: Option<bool>,

    // Professional path
    pub has_series_license: Option<bool>,
    pub license_type: Option<LicenseType>,
}

impl AccreditationCriteria {
    /// Creates empty criteria for the given investor type.
    pub fn for_type(investor_type: InvestorType) -> Self {
        Self {
            investor_type: Some(investor_type),
            ..Default::default()
        }
    }
}

// =============================================================================
// Outputs
// =============================================================================

/// Accreditation classification, ordered from least to most qualified.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AccreditationStatus {
    #[default]
    NonAccredited,
    Accredited,
    QualifiedPurchaser,
}

impl AccreditationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccreditationStatus::NonAccredited => "non_accredited",
            AccreditationStatus::Accredited => "accredited",
            AccreditationStatus::QualifiedPurchaser => "qualified_purchaser",
        }
    }

    /// Human-friendly label for badges.
    pub fn label(&self) -> &'static str {
        match self {
            AccreditationStatus::NonAccredited => "Non-Accredited",
            AccreditationStatus::Accredited => "Accredited Investor",
            AccreditationStatus::QualifiedPurchaser => "Qualified Purchaser",
        }
    }

    pub fn is_accredited(&self) -> bool {
        *self >= AccreditationStatus::Accredited
    }
}

impl std::fmt::Display for AccreditationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Individual rules evaluated by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccreditationRule {
    IndividualIncome,
    JointIncome,
    NetWorth,
    ProfessionalLicense,
    QualifiedPurchaser,
    EntityAssets,
    AllOwnersAccredited,
    Nonprofit501c3,
    TrustAssets,
    TrustorAccredited,
}

impl AccreditationRule {
    /// Documents an investor must provide when this rule is what qualified them.
    pub fn verification_documents(&self) -> &'static [VerificationDocument] {
        use VerificationDocument::*;
        match self {
            AccreditationRule::IndividualIncome => &[TaxReturns],
            AccreditationRule::JointIncome => &[JointTaxReturns],
            AccreditationRule::NetWorth => &[CpaLetterOrBankStatements],
            AccreditationRule::ProfessionalLicense => &[LicenseCopy],
            AccreditationRule::QualifiedPurchaser => {
                &[CpaLetterOrBankStatements, InvestmentStatements]
            }
            AccreditationRule::EntityAssets => &[EntityFinancialStatements],
            AccreditationRule::AllOwnersAccredited => &[OwnerAccreditationLetters],
            AccreditationRule::Nonprofit501c3 => {
                &[IrsDeterminationLetter, EntityFinancialStatements]
            }
            AccreditationRule::TrustAssets => &[TrustAgreement, TrustFinancialStatements],
            AccreditationRule::TrustorAccredited => &[TrustAgreement, TrustorVerification],
        }
    }
}

/// Document types requested for verification of an accreditation claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationDocument {
    TaxReturns,
    JointTaxReturns,
    CpaLetterOrBankStatements,
    InvestmentStatements,
    LicenseCopy,
    EntityFinancialStatements,
    OwnerAccreditationLetters,
    IrsDeterminationLetter,
    TrustAgreement,
    TrustFinancialStatements,
    TrustorVerification,
}

impl VerificationDocument {
    pub fn label(&self) -> &'static str {
        match self {
            VerificationDocument::TaxReturns => "Tax returns (last two years)",
            VerificationDocument::JointTaxReturns => "Joint tax returns (last two years)",
            VerificationDocument::CpaLetterOrBankStatements => "CPA letter or bank statements",
            VerificationDocument::InvestmentStatements => "Brokerage or investment statements",
            VerificationDocument::LicenseCopy => "License copy",
            VerificationDocument::EntityFinancialStatements => "Entity financial statements",
            VerificationDocument::OwnerAccreditationLetters => {
                "Accreditation verification for each equity owner"
            }
            VerificationDocument::IrsDeterminationLetter => "IRS 501(c)(3) determination letter",
            VerificationDocument::TrustAgreement => "Trust agreement",
            VerificationDocument::TrustFinancialStatements => "Trust financial statements",
            VerificationDocument::TrustorVerification => "Trustor accreditation verification",
        }
    }
}

/// Outcome of evaluating a single rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleEvaluation {
    pub rule: AccreditationRule,
    pub satisfied: bool,
    pub explanation: String,
}

impl RuleEvaluation {
    /// Renders the evaluation as a reasoning line with a met/not met marker.
    pub fn reasoning_line(&self) -> String {
        let marker = if self.satisfied { "✓" } else { "✗" };
        format!("{} {}", marker, self.explanation)
    }
}

/// Result of classifying an investor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccreditationDetermination {
    pub status: AccreditationStatus,
    /// One line per evaluated rule, in evaluation order.
    pub reasoning: Vec<String>,
    /// Labels of the documents needed to verify the satisfied rules.
    pub verification_needed: Vec<String>,
    pub satisfied_rules: Vec<AccreditationRule>,
    pub rules: Vec<RuleEvaluation>,
}

/// A determination persisted alongside the criteria that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccreditationRecord {
    pub id: String,
    pub investor_id: String,
    pub criteria: AccreditationCriteria,
    pub determination: AccreditationDetermination,
    pub determined_at: DateTime<Utc>,
}

// =============================================================================
// Thresholds
// =============================================================================

/// Dollar thresholds applied by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccreditationThresholds {
    pub individual_income: Decimal,
    pub joint_income: Decimal,
    pub net_worth: Decimal,
    pub qualified_purchaser_net_worth: Decimal,
    pub entity_assets: Decimal,
    pub trust_assets: Decimal,
}

impl Default for AccreditationThresholds {
    fn default() -> Self {
        Self {
            individual_income: INDIVIDUAL_INCOME_THRESHOLD,
            joint_income: JOINT_INCOME_THRESHOLD,
            net_worth: NET_WORTH_THRESHOLD,
            qualified_purchaser_net_worth: QUALIFIED_PURCHASER_THRESHOLD,
            entity_assets: ENTITY_ASSETS_THRESHOLD,
            trust_assets: TRUST_ASSETS_THRESHOLD,
        }
    }
}

impl AccreditationThresholds {
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("individualIncome", self.individual_income),
            ("jointIncome", self.joint_income),
            ("netWorth", self.net_worth),
            ("qualifiedPurchaserNetWorth", self.qualified_purchaser_net_worth),
            ("entityAssets", self.entity_assets),
            ("trustAssets", self.trust_assets),
        ];
        for (name, value) in named {
            if value <= Decimal::ZERO {
                return Err(Error::InvalidConfigValue(format!(
                    "{} threshold must be > 0",
                    name
                )));
            }
        }
        if self.qualified_purchaser_net_worth < self.net_worth {
            return Err(Error::InvalidConfigValue(
                "qualifiedPurchaserNetWorth must be >= netWorth".to_string(),
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
    fn test_status_ordering() {
        assert!(AccreditationStatus::NonAccredited < AccreditationStatus::Accredited);
        assert!(AccreditationStatus::Accredited < AccreditationStatus::QualifiedPurchaser);
        assert!(AccreditationStatus::QualifiedPurchaser.is_accredited());
        assert!(!AccreditationStatus::NonAccredited.is_accredited());
    }

    #[test]
    fn test_criteria_deserializes_from_form_json() {
        let json = r#"{
            "investorType": "entity",
            "entityAssets": 0,
            "allOwnersAccredited": true,
            "is501c3": false
        }"#;
        let criteria: AccreditationCriteria = serde_json::from_str(json).unwrap();
        assert_eq!(criteria.investor_type, Some(InvestorType::Entity));
        assert_eq!(criteria.entity_assets, Some(Decimal::ZERO));
        assert_eq!(criteria.all_owners_accredited, Some(true));
        assert_eq!(criteria.is_501c3, Some(false));
        assert_eq!(criteria.annual_income, None);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&AccreditationStatus::QualifiedPurchaser).unwrap();
        assert_eq!(json, "\"qualified_purchaser\"");
    }

    #[test]
    fn test_default_thresholds_are_valid() {
        assert!(AccreditationThresholds::default().validate().is_ok());
    }

    #[test]
    fn test_thresholds_reject_inverted_qualified_purchaser() {
        let thresholds = AccreditationThresholds {
            qualified_purchaser_net_worth: dec!(500000),
            ..Default::default()
        };
        assert!(thresholds.validate().is_err());

        let thresholds = AccreditationThresholds {
            joint_income: Decimal::ZERO,
            ..Default::default()
        };
        assert!(thresholds.validate().is_err());
    }
}
