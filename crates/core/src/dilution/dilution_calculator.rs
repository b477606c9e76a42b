//! Post-issuance ownership calculations.
//!
//! Share counts are integers; ownership figures are percentages rounded to
//! `DECIMAL_PRECISION`. Existing holders never gain or lose shares through an
//! issuance, only the denominator grows. Inputs whose share counts or amounts
//! overflow are rejected as invalid input.

use log::{debug, warn};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::constants::{DECIMAL_PRECISION, DISPLAY_DECIMAL_PRECISION, UNNAMED_INVESTOR_LABEL};
use crate::errors::{Error, Result, ValidationError};

use super::dilution_model::{
    checked_share_sum, total_shares, DilutionOutcome, DilutionReport, InvestorAllocation,
    IssuanceProposal, SeverityBands, Stakeholder, StakeholderDilution,
};

/// Post-money valuation under the simple additive model.
pub fn calculate_post_money_valuation(
    investment_amount: Decimal,
    valuation_pre: Decimal,
) -> Result<Decimal> {
    valuation_pre
        .checked_add(investment_amount)
        .ok_or_else(|| out_of_range("post-money valuation"))
}

/// Price of one share at the pre-money valuation, or zero for an empty cap table.
pub fn price_per_share(valuation_pre: Decimal, total_shares: u64) -> Decimal {
    if total_shares == 0 {
        return Decimal::ZERO;
    }
    (valuation_pre / Decimal::from(total_shares)).round_dp(DECIMAL_PRECISION)
}

/// Whole shares an investment buys at `price`, rounded down.
pub fn shares_for_investment(amount: Decimal, price: Decimal) -> Result<u64> {
    if price <= Decimal::ZERO || amount <= Decimal::ZERO {
        return Ok(0);
    }
    amount
        .checked_div(price)
        .and_then(|shares| shares.floor().to_u64())
        .ok_or_else(|| out_of_range("share count"))
}

/// Issues `new_shares_issued` anonymous shares and recomputes every holder's stake.
///
/// `actual_change` is filled in when `valuation_pre` is positive.
pub fn calculate_dilution(
    stakeholders: &[Stakeholder],
    new_shares_issued: u64,
    valuation_pre: Decimal,
    valuation_post: Decimal,
) -> Result<DilutionOutcome> {
    if valuation_pre < Decimal::ZERO || valuation_post < Decimal::ZERO {
        return Err(ValidationError::invalid("valuations must not be negative").into());
    }

    let total_before = total_shares(stakeholders)?;
    let total_after = checked_share_sum([total_before, new_shares_issued])?;
    let valuations = (valuation_pre > Decimal::ZERO).then_some((valuation_pre, valuation_post));

    if total_after == 0 {
        warn!("Dilution requested against an empty cap table");
    }

    let rows = stakeholders
        .iter()
        .map(|s| existing_row(s, total_before, total_after, valuations))
        .collect();

    debug!(
        "Issued {} shares: {} -> {} total",
        new_shares_issued, total_before, total_after
    );

    Ok(DilutionOutcome {
        stakeholders: rows,
        total_shares_before: total_before,
        total_shares_after: total_after,
        new_shares_issued,
        new_shares_ownership: ownership(new_shares_issued, total_after),
    })
}

/// Appends incoming investors to the cap table and recomputes ownership
/// against the enlarged share count.
///
/// The investors' allocations are the only new shares; nothing else is issued.
pub fn calculate_ownership_with_new_investors(
    stakeholders: &[Stakeholder],
    investor_shares: &[InvestorAllocation],
) -> Result<Vec<StakeholderDilution>> {
    Ok(build_rows(stakeholders, investor_shares, None)?.rows)
}

/// Models a priced round: incoming investors buy shares at the pre-money
/// share price and every holder's stake is recomputed.
///
/// An empty cap table or zero pre-money valuation cannot be priced, so the
/// report comes back with no shares issued rather than an error.
pub fn calculate_issuance(
    stakeholders: &[Stakeholder],
    proposal: &IssuanceProposal,
    bands: &SeverityBands,
) -> Result<DilutionReport> {
    validate_proposal(proposal)?;

    let total_before = total_shares(stakeholders)?;
    let valuation_post =
        calculate_post_money_valuation(proposal.investment_amount, proposal.valuation_pre)?;

    if total_before == 0 || proposal.valuation_pre.is_zero() {
        warn!(
            "Cannot price issuance (total shares: {}, pre-money: {})",
            total_before, proposal.valuation_pre
        );
        let table = build_rows(stakeholders, &[], None)?;
        return Ok(report(
            proposal.valuation_pre,
            valuation_post,
            Decimal::ZERO,
            table,
            bands,
        ));
    }

    let allocations = allocate(stakeholders, proposal, total_before)?;
    let table = build_rows(
        stakeholders,
        &allocations,
        Some((proposal.valuation_pre, valuation_post)),
    )?;

    Ok(report(
        proposal.valuation_pre,
        valuation_post,
        price_per_share(proposal.valuation_pre, total_before),
        table,
        bands,
    ))
}

fn out_of_range(what: &str) -> Error {
    ValidationError::invalid(format!("{} exceeds the supported range", what)).into()
}

fn validate_proposal(proposal: &IssuanceProposal) -> Result<()> {
    if proposal.investment_amount < Decimal::ZERO {
        return Err(ValidationError::invalid("investmentAmount must not be negative").into());
    }
    if proposal.valuation_pre < Decimal::ZERO {
        return Err(ValidationError::invalid("valuationPre must not be negative").into());
    }
    if proposal
        .incoming_investors
        .iter()
        .any(|i| i.amount < Decimal::ZERO)
    {
        return Err(ValidationError::invalid("investor amounts must not be negative").into());
    }
    if !proposal.incoming_investors.is_empty() {
        let committed = proposal
            .incoming_investors
            .iter()
            .try_fold(Decimal::ZERO, |acc, i| acc.checked_add(i.amount))
            .ok_or_else(|| out_of_range("investor commitments"))?;
        if committed != proposal.investment_amount {
            return Err(ValidationError::invalid(format!(
                "investor commitments ({}) do not match investmentAmount ({})",
                committed, proposal.investment_amount
            ))
            .into());
        }
    }
    Ok(())
}

fn allocate(
    stakeholders: &[Stakeholder],
    proposal: &IssuanceProposal,
    total_before: u64,
) -> Result<Vec<InvestorAllocation>> {
    // Shares are priced as amount * shares / valuation to avoid rounding the price first.
    let shares_for = |amount: Decimal| -> Result<u64> {
        amount
            .checked_mul(Decimal::from(total_before))
            .and_then(|value| value.checked_div(proposal.valuation_pre))
            .and_then(|shares| shares.floor().to_u64())
            .ok_or_else(|| out_of_range("allocated share count"))
    };

    let allocations: Vec<InvestorAllocation> = if proposal.incoming_investors.is_empty() {
        vec![InvestorAllocation {
            user_id: None,
            name: UNNAMED_INVESTOR_LABEL.to_string(),
            shares: shares_for(proposal.investment_amount)?,
        }]
    } else {
        proposal
            .incoming_investors
            .iter()
            .map(|i| {
                Ok(InvestorAllocation {
                    user_id: i.user_id.clone(),
                    name: i.name.clone(),
                    shares: shares_for(i.amount)?,
                })
            })
            .collect::<Result<Vec<_>>>()?
    };

    debug!(
        "Allocated shares to {} investors ({} existing holders)",
        allocations.len(),
        stakeholders.len()
    );

    Ok(allocations.into_iter().filter(|a| a.shares > 0).collect())
}

/// Stakeholder rows together with the share totals they were computed against.
struct RecomputedTable {
    rows: Vec<StakeholderDilution>,
    total_before: u64,
    total_after: u64,
}

fn report(
    valuation_pre: Decimal,
    valuation_post: Decimal,
    price_per_share: Decimal,
    table: RecomputedTable,
    bands: &SeverityBands,
) -> DilutionReport {
    let severities = table
        .rows
        .iter()
        .filter(|s| !s.is_new_investor)
        .map(|s| bands.classify(s.dilution_percent))
        .collect();

    DilutionReport {
        valuation_pre,
        valuation_post,
        price_per_share,
        total_shares_before: table.total_before,
        total_shares_after: table.total_after,
        new_shares_issued: table.total_after - table.total_before,
        stakeholders: table.rows,
        severities,
    }
}

fn build_rows(
    stakeholders: &[Stakeholder],
    investors: &[InvestorAllocation],
    valuations: Option<(Decimal, Decimal)>,
) -> Result<RecomputedTable> {
    let total_before = total_shares(stakeholders)?;
    let issued = checked_share_sum(investors.iter().map(|i| i.shares))?;
    let total_after = checked_share_sum([total_before, issued])?;

    let mut rows: Vec<StakeholderDilution> = stakeholders
        .iter()
        .map(|s| existing_row(s, total_before, total_after, valuations))
        .collect();

    rows.extend(investors.iter().map(|investor| {
        let new_ownership = ownership(investor.shares, total_after);
        StakeholderDilution {
            user_id: investor.user_id.clone(),
            name: investor.name.clone(),
            is_new_investor: true,
            current_shares: 0,
            current_ownership: Decimal::ZERO,
            new_shares: investor.shares,
            new_ownership,
            dilution: Decimal::ZERO,
            dilution_percent: Decimal::ZERO,
            actual_change: valuations.map(|(_, post)| stake_value(new_ownership, post)),
        }
    }));

    Ok(RecomputedTable {
        rows,
        total_before,
        total_after,
    })
}

fn existing_row(
    stakeholder: &Stakeholder,
    total_before: u64,
    total_after: u64,
    valuations: Option<(Decimal, Decimal)>,
) -> StakeholderDilution {
    let current_ownership = ownership(stakeholder.current_shares, total_before);
    let new_ownership = ownership(stakeholder.current_shares, total_after);
    let dilution = current_ownership - new_ownership;
    let dilution_percent = if current_ownership.is_zero() {
        Decimal::ZERO
    } else {
        (dilution / current_ownership * dec!(100)).round_dp(DECIMAL_PRECISION)
    };

    StakeholderDilution {
        user_id: Some(stakeholder.user_id.clone()),
        name: stakeholder.name.clone(),
        is_new_investor: false,
        current_shares: stakeholder.current_shares,
        current_ownership,
        new_shares: stakeholder.current_shares,
        new_ownership,
        dilution,
        dilution_percent,
        actual_change: valuations.map(|(pre, post)| {
            stake_value(new_ownership, post) - stake_value(current_ownership, pre)
        }),
    }
}

fn ownership(shares: u64, total: u64) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(shares) / Decimal::from(total) * dec!(100)).round_dp(DECIMAL_PRECISION)
}

fn stake_value(ownership_pct: Decimal, valuation: Decimal) -> Decimal {
    (ownership_pct / dec!(100) * valuation).round_dp(DISPLAY_DECIMAL_PRECISION)
}
