//! Perk valuation.
//!
//! Perks are imputed income: the net value is what is left after tax at the
//! employee's marginal rate.

use rust_decimal::Decimal;

use crate::config::PerkBenchmarks;
use crate::models::{ComponentBreakdown, ComponentDetail, PerksConfig, RemoteWorkPolicy};

const MONTHS: u32 = 12;
const WORK_DAYS_PER_WEEK: u32 = 5;

fn monthly(value: Decimal) -> Decimal {
    value * Decimal::from(MONTHS)
}

/// Imputed annual value of the remote-work policy.
///
/// Fully remote saves the whole transportation benchmark; hybrid saves the
/// share of the week worked from home.
pub fn remote_work_value(perks: &PerksConfig, benchmarks: &PerkBenchmarks) -> Decimal {
    let annual = monthly(benchmarks.remote_transportation_monthly);
    match perks.remote_work {
        RemoteWorkPolicy::Office => Decimal::ZERO,
        RemoteWorkPolicy::Remote => annual,
        RemoteWorkPolicy::Hybrid => {
            let days = perks.hybrid_days_per_week.min(WORK_DAYS_PER_WEEK);
            annual * Decimal::from(days) / Decimal::from(WORK_DAYS_PER_WEEK)
        }
    }
}

/// Values the perks package in ILS per year.
pub fn calculate_perks(
    perks: &PerksConfig,
    benchmarks: &PerkBenchmarks,
    marginal_rate: Decimal,
) -> ComponentBreakdown {
    let mut breakdown = ComponentBreakdown::default();

    if perks.laptop_provided {
        let detail = match perks.laptop_annual_value {
            Some(value) => ComponentDetail::new(value, "Declared annual value"),
            None => ComponentDetail::new(benchmarks.laptop_annual_value, "Benchmark annual value")
                .with_assumption("Market benchmark for a company laptop"),
        };
        breakdown.components.insert("laptop".to_string(), detail);
    }

    let stipends = [
        ("internet", perks.internet_stipend),
        ("phone", perks.phone_stipend),
        ("gym", perks.gym_stipend),
        ("transportation", perks.transportation_stipend),
    ];
    for (name, amount) in stipends {
        if amount > Decimal::ZERO {
            breakdown.components.insert(
                name.to_string(),
                ComponentDetail::new(monthly(amount), "Monthly stipend x 12"),
            );
        }
    }

    let meals = match perks.meal_monthly_value {
        Some(value) => ComponentDetail::new(monthly(value), "Declared monthly value x 12"),
        None => ComponentDetail::new(
            monthly(benchmarks.meals.monthly_for(perks.meal_type)),
            "Benchmark monthly value x 12",
        ),
    };
    if meals.value > Decimal::ZERO {
        breakdown.components.insert("meals".to_string(), meals);
    }

    if perks.learning_budget > Decimal::ZERO {
        breakdown.components.insert(
            "learning_budget".to_string(),
            ComponentDetail::new(perks.learning_budget, "Annual budget"),
        );
    }

    let remote = remote_work_value(perks, benchmarks);
    if remote > Decimal::ZERO {
        breakdown.components.insert(
            "remote_work".to_string(),
            ComponentDetail::new(remote, "Saved commuting costs")
                .with_assumption(format!(
                    "{} per month transportation benchmark",
                    benchmarks.remote_transportation_monthly
                )),
        );
    }

    breakdown.gross = breakdown.components_total();
    breakdown.net = (breakdown.gross * (Decimal::ONE - marginal_rate)).max(Decimal::ZERO);
    breakdown
}
