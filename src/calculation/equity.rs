//! Equity grant valuation.
//!
//! Every grant is valued through [`value_grant`], which dispatches on the
//! grant kind for its tax treatment. Prices are in USD; values are reported
//! in ILS through the [`CurrencyService`].

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::{RiskFactors, TaxYearConfig};
use crate::currency::CurrencyService;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    CompanyStage, ComponentBreakdown, ComponentDetail, Currency, EquityGrant, EquitySummary,
    GrantKind, GrantValuation,
};

use super::contributions::compute_capital_gains_tax;
use super::vesting::compute_vesting_schedule;

/// Everything a grant valuation reads besides the grant itself.
#[derive(Clone, Copy)]
pub struct EquityContext<'a> {
    /// Tax tables for the year being valued.
    pub tax: &'a TaxYearConfig,
    /// Per-stage risk discount factors.
    pub risk_factors: &'a RiskFactors,
    /// Converts USD values to ILS.
    pub currency: &'a CurrencyService,
    /// Annual base salary and its currency, used to size ESPP purchases.
    pub annual_salary: Option<(Decimal, Currency)>,
}

/// Multiplies `value` by the discount factor for the company stage.
pub fn apply_risk_discount(value: Decimal, stage: CompanyStage, factors: &RiskFactors) -> Decimal {
    value * factors.factor_for(stage)
}

async fn usd_to_ils(amount_usd: Decimal, ctx: &EquityContext<'_>) -> EngineResult<Decimal> {
    if amount_usd <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    ctx.currency
        .convert(amount_usd, Currency::Usd, Currency::Ils)
        .await
}

fn out_of_range(grant: &EquityGrant, what: &str) -> EngineError {
    EngineError::AmountOutOfRange {
        operation: format!("{what} of grant {}", grant.id),
    }
}

/// Values a single grant in ILS.
///
/// # Errors
///
/// [`EngineError::AmountOutOfRange`] when a share count, spread or value
/// overflows, and any conversion error from the currency service.
pub async fn value_grant(
    grant: &EquityGrant,
    ctx: &EquityContext<'_>,
) -> EngineResult<GrantValuation> {
    let ordinary_rate = ctx.tax.equity.ordinary_income_rate;
    let price = grant.current_price.unwrap_or(Decimal::ZERO);
    let mut assumptions = Vec::new();
    if grant.current_price.is_none() {
        assumptions.push("No current share price; valued at zero".to_string());
    }

    let valuation = match &grant.kind {
        GrantKind::Rsu => {
            let value_usd = grant
                .amount
                .checked_mul(price)
                .ok_or_else(|| out_of_range(grant, "value"))?;
            let current_value = usd_to_ils(value_usd, ctx).await?;
            let value_at_vesting = current_value;
            let realized_gain = (current_value - value_at_vesting).max(Decimal::ZERO);
            let post_tax_value = current_value * (Decimal::ONE - ordinary_rate)
                - compute_capital_gains_tax(realized_gain, &ctx.tax.capital_gains);
            assumptions.push(format!(
                "Taxed as ordinary income at {ordinary_rate}; capital gains measured from value at vesting"
            ));

            GrantValuation {
                grant_id: grant.id.clone(),
                kind: grant.kind.label().to_string(),
                shares: grant.amount,
                current_value,
                post_tax_value,
                risk_adjusted_value: apply_risk_discount(
                    post_tax_value,
                    grant.company_stage,
                    ctx.risk_factors,
                ),
                assumptions,
            }
        }
        GrantKind::Iso { .. } | GrantKind::Nqso { .. } => {
            let strike = grant.kind.strike_price().unwrap_or(Decimal::ZERO);
            let spread = price
                .checked_sub(strike)
                .ok_or_else(|| out_of_range(grant, "spread"))?
                .max(Decimal::ZERO)
                .checked_mul(grant.amount)
                .ok_or_else(|| out_of_range(grant, "spread"))?;
            let current_value = usd_to_ils(spread, ctx).await?;
            let post_tax_value = if matches!(grant.kind, GrantKind::Iso { .. }) {
                assumptions.push("Intrinsic value taxed as capital gains".to_string());
                current_value - compute_capital_gains_tax(current_value, &ctx.tax.capital_gains)
            } else {
                assumptions.push(format!("Spread taxed as ordinary income at {ordinary_rate}"));
                current_value * (Decimal::ONE - ordinary_rate)
            };

            GrantValuation {
                grant_id: grant.id.clone(),
                kind: grant.kind.label().to_string(),
                shares: grant.amount,
                current_value,
                post_tax_value,
                risk_adjusted_value: apply_risk_discount(
                    post_tax_value,
                    grant.company_stage,
                    ctx.risk_factors,
                ),
                assumptions,
            }
        }
        GrantKind::Espp {
            salary_deduction_percent,
            discount_percent,
        } => {
            let discount = discount_percent.unwrap_or(ctx.tax.equity.espp_default_discount_percent);
            let purchase_price = (Decimal::ONE - discount / Decimal::ONE_HUNDRED)
                .checked_mul(price)
                .ok_or_else(|| out_of_range(grant, "purchase price"))?;

            let shares = match (salary_deduction_percent, ctx.annual_salary) {
                (Some(deduction), Some((salary, salary_currency)))
                    if purchase_price > Decimal::ZERO =>
                {
                    let salary_usd = ctx
                        .currency
                        .convert(salary, salary_currency, Currency::Usd)
                        .await?;
                    let contribution = (salary_usd
                        .checked_mul(*deduction)
                        .ok_or_else(|| out_of_range(grant, "contribution"))?
                        / Decimal::ONE_HUNDRED)
                        .min(ctx.tax.equity.espp_annual_purchase_limit_usd);
                    assumptions.push(format!(
                        "Annual contribution of {contribution} USD at purchase price {purchase_price}"
                    ));
                    contribution
                        .checked_div(purchase_price)
                        .ok_or_else(|| out_of_range(grant, "purchased shares"))?
                }
                _ => grant.amount,
            };

            let gain_usd = price
                .checked_sub(purchase_price)
                .and_then(|gain| gain.checked_mul(shares))
                .ok_or_else(|| out_of_range(grant, "discount gain"))?;
            let current_value = usd_to_ils(gain_usd, ctx).await?;
            let post_tax_value = current_value * (Decimal::ONE - ordinary_rate);
            assumptions
                .push("Discount gain taxed as ordinary income; no risk discount".to_string());

            GrantValuation {
                grant_id: grant.id.clone(),
                kind: grant.kind.label().to_string(),
                shares,
                current_value,
                post_tax_value,
                risk_adjusted_value: post_tax_value,
                assumptions,
            }
        }
    };

    debug!(
        grant_id = %grant.id,
        kind = grant.kind.label(),
        current_value = %valuation.current_value,
        risk_adjusted_value = %valuation.risk_adjusted_value,
        "Valued equity grant"
    );

    Ok(valuation)
}

fn accumulate(total: &mut Decimal, value: Decimal) -> EngineResult<()> {
    *total = total
        .checked_add(value)
        .ok_or_else(|| EngineError::AmountOutOfRange {
            operation: "equity totals".to_string(),
        })?;
    Ok(())
}

/// Values all grants and merges their vesting schedules.
///
/// The next vesting event is the earliest one dated strictly after `now`.
pub async fn summarize_equity(
    grants: &[EquityGrant],
    ctx: &EquityContext<'_>,
    now: DateTime<Utc>,
) -> EngineResult<EquitySummary> {
    let mut summary = EquitySummary::default();

    for grant in grants {
        let valuation = value_grant(grant, ctx).await?;
        accumulate(&mut summary.total_current_value, valuation.current_value)?;
        accumulate(&mut summary.total_post_tax_value, valuation.post_tax_value)?;
        accumulate(&mut summary.total_risk_adjusted_value, valuation.risk_adjusted_value)?;
        summary.valuations.push(valuation);
        summary.vesting_events.extend(compute_vesting_schedule(grant));
    }

    summary.vesting_events.sort_by_key(|event| event.date);

    let today = now.date_naive();
    summary.next_vesting = summary
        .vesting_events
        .iter()
        .find(|event| event.date > today)
        .cloned();

    Ok(summary)
}

/// Sums the USD value of vesting events falling in `now.year() + year_offset`.
///
/// A target year outside the calendar range has no events.
pub fn value_for_year(
    grants: &[EquityGrant],
    year_offset: i32,
    now: DateTime<Utc>,
) -> EngineResult<Decimal> {
    let Some(year) = now.year().checked_add(year_offset) else {
        return Ok(Decimal::ZERO);
    };
    let mut total = Decimal::ZERO;
    for event in grants
        .iter()
        .flat_map(compute_vesting_schedule)
        .filter(|event| event.date.year() == year)
    {
        accumulate(&mut total, event.estimated_value_usd)?;
    }
    Ok(total)
}

/// Rolls a summary up into one component per grant kind.
///
/// Gross is the current value; net is the risk-adjusted post-tax value.
pub fn equity_breakdown(summary: &EquitySummary) -> ComponentBreakdown {
    let mut by_kind: BTreeMap<&str, (Decimal, Decimal, Decimal, usize)> = BTreeMap::new();
    for valuation in &summary.valuations {
        let entry = by_kind.entry(valuation.kind.as_str()).or_default();
        entry.0 += valuation.current_value;
        entry.1 += valuation.post_tax_value;
        entry.2 += valuation.risk_adjusted_value;
        entry.3 += 1;
    }

    let components = by_kind
        .into_iter()
        .map(|(kind, (current, post_tax, risk_adjusted, count))| {
            let detail =
                ComponentDetail::new(current, format!("{count} {kind} grant(s) at current price"))
                    .with_assumption(format!("Post-tax value {post_tax}"))
                    .with_assumption(format!("Risk-adjusted value {risk_adjusted}"));
            (kind.to_string(), detail)
        })
        .collect();

    ComponentBreakdown {
        gross: summary.total_current_value,
        net: summary.total_risk_adjusted_value,
        components,
    }
}
