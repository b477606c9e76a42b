//! Rule-based accreditation determination.
//!
//! The engine is a pure function of its input: no I/O, no clock, no hidden
//! state. It is cheap enough to run on every keystroke of the onboarding form.

use log::debug;
use rust_decimal::Decimal;

use crate::errors::{Result, ValidationError};

use super::accreditation_model::{
    AccreditationCriteria, AccreditationDetermination, AccreditationRule, AccreditationStatus,
    AccreditationThresholds, InvestorType, RuleEvaluation,
};

/// Classifies investors against a set of [`AccreditationThresholds`].
#[derive(Debug, Clone, Default)]
pub struct AccreditationEngine {
    thresholds: AccreditationThresholds,
}

impl AccreditationEngine {
    /// Creates an engine using the regulatory default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(thresholds: AccreditationThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &AccreditationThresholds {
        &self.thresholds
    }

    /// Classifies an investor.
    ///
    /// Fails only when `investor_type` is missing or an amount is negative.
    /// Failing every rule yields `NonAccredited` with a reason per rule.
    pub fn determine(&self, criteria: &AccreditationCriteria) -> Result<AccreditationDetermination> {
        let investor_type = criteria
            .investor_type
            .ok_or_else(|| ValidationError::MissingField("investorType".to_string()))?;
        validate_amounts(investor_type, criteria)?;

        let rules = match investor_type {
            InvestorType::Individual => self.evaluate_individual(criteria),
            InvestorType::Entity => self.evaluate_entity(criteria),
            InvestorType::Trust => self.evaluate_trust(criteria),
        };

        let satisfied_rules: Vec<AccreditationRule> = rules
            .iter()
            .filter(|r| r.satisfied)
            .map(|r| r.rule)
            .collect();

        let status = if satisfied_rules.contains(&AccreditationRule::QualifiedPurchaser) {
            AccreditationStatus::QualifiedPurchaser
        } else if satisfied_rules.is_empty() {
            AccreditationStatus::NonAccredited
        } else {
            AccreditationStatus::Accredited
        };

        let mut verification_needed: Vec<String> = Vec::new();
        for rule in &satisfied_rules {
            for document in rule.verification_documents() {
                let label = document.label();
                if !verification_needed.iter().any(|l| l == label) {
                    verification_needed.push(label.to_string());
                }
            }
        }

        debug!(
            "Accreditation for {} investor: {} ({} of {} rules satisfied)",
            investor_type,
            status,
            satisfied_rules.len(),
            rules.len()
        );

        Ok(AccreditationDetermination {
            status,
            reasoning: rules.iter().map(RuleEvaluation::reasoning_line).collect(),
            verification_needed,
            satisfied_rules,
            rules,
        })
    }

    fn evaluate_individual(&self, criteria: &AccreditationCriteria) -> Vec<RuleEvaluation> {
        let t = &self.thresholds;
        let license = match (criteria.has_series_license, criteria.license_type) {
            (Some(true), Some(license_type)) => RuleEvaluation {
                rule: AccreditationRule::ProfessionalLicense,
                satisfied: true,
                explanation: format!("Holds a {} license in good standing", license_type.label()),
            },
            (Some(true), None) => RuleEvaluation {
                rule: AccreditationRule::ProfessionalLicense,
                satisfied: true,
                explanation: "Holds a securities license in good standing".to_string(),
            },
            _ => RuleEvaluation {
                rule: AccreditationRule::ProfessionalLicense,
                satisfied: false,
                explanation: "No qualifying professional license (Series 7, 65 or 82)".to_string(),
            },
        };

        vec![
            threshold_rule(
                AccreditationRule::IndividualIncome,
                criteria.annual_income,
                t.individual_income,
                "Individual annual income",
                "accreditation",
            ),
            threshold_rule(
                AccreditationRule::JointIncome,
                criteria.joint_income,
                t.joint_income,
                "Joint annual income with spouse",
                "accreditation",
            ),
            threshold_rule(
                AccreditationRule::NetWorth,
                criteria.net_worth,
                t.net_worth,
                "Net worth excluding primary residence",
                "accreditation",
            ),
            license,
            threshold_rule(
                AccreditationRule::QualifiedPurchaser,
                criteria.net_worth,
                t.qualified_purchaser_net_worth,
                "Net worth",
                "qualified purchaser",
            ),
        ]
    }

    fn evaluate_entity(&self, criteria: &AccreditationCriteria) -> Vec<RuleEvaluation> {
        let t = &self.thresholds;
        let owners_accredited = criteria.all_owners_accredited == Some(true);
        let assets_met = criteria
            .entity_assets
            .map(|assets| assets >= t.entity_assets)
            .unwrap_or(false);

        // 501(c)(3) status only qualifies together with the asset threshold.
        let nonprofit = match criteria.is_501c3 {
            Some(true) if assets_met => RuleEvaluation {
                rule: AccreditationRule::Nonprofit501c3,
                satisfied: true,
                explanation: format!(
                    "501(c)(3) organization with total assets of at least {}",
                    format_usd(t.entity_assets)
                ),
            },
            Some(true) => RuleEvaluation {
                rule: AccreditationRule::Nonprofit501c3,
                satisfied: false,
                explanation: format!(
                    "501(c)(3) organization, but total assets are below {}",
                    format_usd(t.entity_assets)
                ),
            },
            _ => RuleEvaluation {
                rule: AccreditationRule::Nonprofit501c3,
                satisfied: false,
                explanation: "Not a 501(c)(3) organization".to_string(),
            },
        };

        vec![
            threshold_rule(
                AccreditationRule::EntityAssets,
                criteria.entity_assets,
                t.entity_assets,
                "Entity total assets",
                "accreditation",
            ),
            RuleEvaluation {
                rule: AccreditationRule::AllOwnersAccredited,
                satisfied: owners_accredited,
                explanation: if owners_accredited {
                    "All equity owners are accredited investors".to_string()
                } else {
                    "Not all equity owners are confirmed as accredited investors".to_string()
                },
            },
            nonprofit,
        ]
    }

    fn evaluate_trust(&self, criteria: &AccreditationCriteria) -> Vec<RuleEvaluation> {
        let t = &self.thresholds;
        let trustor_accredited = criteria.trustor_accredited == Some(true);

        vec![
            threshold_rule(
                AccreditationRule::TrustAssets,
                criteria.trust_assets,
                t.trust_assets,
                "Trust total assets",
                "accreditation",
            ),
            RuleEvaluation {
                rule: AccreditationRule::TrustorAccredited,
                satisfied: trustor_accredited,
                explanation: if trustor_accredited {
                    "Revocable trust whose grantor is an accredited investor".to_string()
                } else {
                    "Trustor is not confirmed as an accredited investor".to_string()
                },
            },
        ]
    }
}

/// Classifies an investor with the default thresholds.
pub fn determine(criteria: &AccreditationCriteria) -> Result<AccreditationDetermination> {
    AccreditationEngine::new().determine(criteria)
}

fn threshold_rule(
    rule: AccreditationRule,
    value: Option<Decimal>,
    threshold: Decimal,
    subject: &str,
    purpose: &str,
) -> RuleEvaluation {
    let (satisfied, explanation) = match value {
        Some(v) if v >= threshold => (
            true,
            format!(
                "{} of {} meets the {} {} threshold",
                subject,
                format_usd(v),
                format_usd(threshold),
                purpose
            ),
        ),
        Some(v) => (
            false,
            format!(
                "{} of {} is below the {} {} threshold",
                subject,
                format_usd(v),
                format_usd(threshold),
                purpose
            ),
        ),
        None => (
            false,
            format!(
                "{} not provided ({} {} threshold)",
                subject,
                format_usd(threshold),
                purpose
            ),
        ),
    };
    RuleEvaluation {
        rule,
        satisfied,
        explanation,
    }
}

/// Rejects negative amounts on the selected path. Other paths' fields are ignored.
fn validate_amounts(investor_type: InvestorType, criteria: &AccreditationCriteria) -> Result<()> {
    let amounts: Vec<(&str, Option<Decimal>)> = match investor_type {
        InvestorType::Individual => vec![
            ("annualIncome", criteria.annual_income),
            ("jointIncome", criteria.joint_income),
            ("netWorth", criteria.net_worth),
        ],
        InvestorType::Entity => vec![("entityAssets", criteria.entity_assets)],
        InvestorType::Trust => vec![("trustAssets", criteria.trust_assets)],
    };
    for (name, amount) in amounts {
        if let Some(value) = amount {
            if value < Decimal::ZERO {
                return Err(ValidationError::invalid(format!("{} must not be negative", name)).into());
            }
        }
    }
    Ok(())
}

/// Formats a dollar amount as `$1,234,567`, dropping cents.
fn format_usd(amount: Decimal) -> String {
    let whole = amount.trunc().abs().normalize().to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount <= Decimal::NEGATIVE_ONE {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}
