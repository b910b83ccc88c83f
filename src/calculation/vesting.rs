//! Vesting schedule projection.
//!
//! One projection serves every grant kind. Purchase-plan grants are bought
//! outright each period and so never produce vesting events.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{EquityGrant, GrantKind, VestingEvent, VestingType};

/// Longest vesting period, in years, that is projected event by event.
pub const MAX_PROJECTED_YEARS: u32 = 50;

const MONTHS_BETWEEN_CUSTOM_EVENTS: u32 = 12;

fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months)).unwrap_or(NaiveDate::MAX)
}

fn event(
    grant: &EquityGrant,
    date: NaiveDate,
    shares: Decimal,
    cumulative: Decimal,
) -> Option<VestingEvent> {
    let price = grant.current_price.unwrap_or(Decimal::ZERO);
    Some(VestingEvent {
        grant_id: grant.id.clone(),
        date,
        shares,
        cumulative_shares: cumulative,
        estimated_value_usd: shares.checked_mul(price)?,
    })
}

/// Projects the vesting events of a grant in date order.
///
/// - `standard`: equal tranches every `frequency` period over `total_years`,
///   starting at `vesting_start + cliff_months`. The first event also carries
///   the tranches accrued during the cliff. Cumulative shares never exceed
///   the grant, so late events may carry zero shares once it is fully vested.
/// - `cliff`: a single event for the whole grant at `vesting_start + cliff_months`.
/// - `custom`: one event per percentage, 12 months apart from the cliff date.
///   Percentages are applied as given and are not normalized.
///
/// Returns an empty schedule for ESPP grants, non-positive amounts, vesting
/// periods longer than [`MAX_PROJECTED_YEARS`] and schedules whose share or
/// value figures overflow.
///
/// # Examples
///
/// ```
/// use compensation_engine::calculation::compute_vesting_schedule;
/// use compensation_engine::models::{
///     CompanyStage, EquityGrant, GrantKind, VestingFrequency, VestingSchedule, VestingType,
/// };
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let grant = EquityGrant {
///     id: "grant_001".to_string(),
///     kind: GrantKind::Rsu,
///     amount: Decimal::from(4800),
///     grant_date: start,
///     vesting_start: start,
///     vesting: VestingSchedule {
///         schedule_type: VestingType::Standard,
///         total_years: 4,
///         cliff_months: 12,
///         frequency: VestingFrequency::Quarterly,
///         custom_percentages: vec![],
///     },
///     current_price: Some(Decimal::from(50)),
///     company_valuation: None,
///     company_stage: CompanyStage::Public,
/// };
///
/// let events = compute_vesting_schedule(&grant);
/// assert_eq!(events.len(), 16);
/// assert_eq!(events[0].shares, Decimal::from(1500));
/// assert_eq!(events.last().unwrap().cumulative_shares, Decimal::from(4800));
/// ```
pub fn compute_vesting_schedule(grant: &EquityGrant) -> Vec<VestingEvent> {
    if matches!(grant.kind, GrantKind::Espp { .. }) || grant.amount <= Decimal::ZERO {
        return Vec::new();
    }
    if grant.vesting.total_years > MAX_PROJECTED_YEARS {
        warn!(
            grant_id = %grant.id,
            total_years = grant.vesting.total_years,
            "Vesting period too long to project"
        );
        return Vec::new();
    }

    let first_date = add_months(grant.vesting_start, grant.vesting.cliff_months);

    let schedule = match grant.vesting.schedule_type {
        VestingType::Standard => standard_schedule(grant, first_date),
        VestingType::Cliff => event(grant, first_date, grant.amount, grant.amount).map(|e| vec![e]),
        VestingType::Custom => custom_schedule(grant, first_date),
    };

    schedule.unwrap_or_else(|| {
        warn!(grant_id = %grant.id, "Vesting schedule overflowed, no events projected");
        Vec::new()
    })
}

fn standard_schedule(grant: &EquityGrant, first_date: NaiveDate) -> Option<Vec<VestingEvent>> {
    let period = grant.vesting.frequency.months();
    let total_events = grant.vesting.total_years * 12 / period;
    if total_events == 0 {
        return Some(Vec::new());
    }

    let tranche = grant.amount / Decimal::from(total_events);
    let first_tranche = if grant.vesting.cliff_months > 0 {
        let cliff_periods = Decimal::from(grant.vesting.cliff_months / period);
        // A cliff longer than the grant vests everything on the first event.
        tranche
            .checked_mul(cliff_periods + Decimal::ONE)
            .unwrap_or(grant.amount)
    } else {
        tranche
    };

    let mut events = Vec::with_capacity(total_events as usize);
    let mut cumulative = Decimal::ZERO;

    for index in 0..total_events {
        let date = add_months(first_date, index * period);
        let scheduled = if index == 0 { first_tranche } else { tranche };
        let shares = scheduled.min(grant.amount - cumulative);
        cumulative += shares;
        events.push(event(grant, date, shares, cumulative)?);
    }

    // Division remainders land on the last event.
    if cumulative < grant.amount {
        if let Some(last) = events.last_mut() {
            let shares = last.shares + (grant.amount - cumulative);
            *last = event(grant, last.date, shares, grant.amount)?;
        }
    }

    Some(events)
}

fn custom_schedule(grant: &EquityGrant, first_date: NaiveDate) -> Option<Vec<VestingEvent>> {
    let mut cumulative = Decimal::ZERO;
    let mut events = Vec::with_capacity(grant.vesting.custom_percentages.len());

    for (percent, index) in grant.vesting.custom_percentages.iter().zip(0u32..) {
        let months = index.saturating_mul(MONTHS_BETWEEN_CUSTOM_EVENTS);
        let date = add_months(first_date, months);
        let shares = grant.amount.checked_mul(*percent)? / Decimal::ONE_HUNDRED;
        cumulative = cumulative.checked_add(shares)?;
        events.push(event(grant, date, shares, cumulative)?);
    }

    Some(events)
}
