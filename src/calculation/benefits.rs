//! Employer benefits valuation.
//!
//! Benefits are valued as annual ILS amounts from the monthly salary and the
//! benefits table. They are not taxed to the employee, so net equals gross.

use rust_decimal::Decimal;

use crate::config::{BenefitsTable, TaxYearConfig};
use crate::models::{BenefitsConfig, ComponentBreakdown, ComponentDetail, HealthCoverage};

const MONTHS: u32 = 12;

fn percent(value: Decimal) -> Decimal {
    value / Decimal::ONE_HUNDRED
}

/// Annual employer deposit on a capped monthly salary.
pub fn employer_contribution_value(
    monthly_salary: Decimal,
    ceiling: Decimal,
    rate: Decimal,
) -> Decimal {
    monthly_salary.max(Decimal::ZERO).min(ceiling) * rate * Decimal::from(MONTHS)
}

/// Salary value of one working day.
pub fn daily_rate(monthly_salary: Decimal, table: &BenefitsTable) -> Decimal {
    let working_days = table.leave.working_days_per_year;
    if working_days <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    monthly_salary.max(Decimal::ZERO) * Decimal::from(MONTHS) / working_days
}

/// Annual employer health insurance contribution.
pub fn health_insurance_value(benefits: &BenefitsConfig, table: &BenefitsTable) -> Decimal {
    if benefits.health_coverage == HealthCoverage::None {
        return Decimal::ZERO;
    }
    let monthly = benefits
        .health_monthly_contribution
        .unwrap_or_else(|| table.health_tiers.monthly_for(benefits.health_coverage));
    monthly * Decimal::from(MONTHS)
}

/// Sick days counted toward the value of the sick-leave policy.
pub fn valued_sick_days(benefits: &BenefitsConfig, table: &BenefitsTable) -> u32 {
    if benefits.unlimited_sick_leave {
        table.leave.unlimited_sick_equivalent_days
    } else {
        benefits.sick_days.saturating_sub(table.leave.statutory_sick_days)
    }
}

/// Values the full benefits package for a monthly salary in ILS.
pub fn calculate_comprehensive_benefits(
    monthly_salary: Decimal,
    benefits: &BenefitsConfig,
    tax: &TaxYearConfig,
    table: &BenefitsTable,
) -> ComponentBreakdown {
    let mut breakdown = ComponentBreakdown::default();
    let daily = daily_rate(monthly_salary, table);
    let leave = &table.leave;

    breakdown.components.insert(
        "pension_employer".to_string(),
        ComponentDetail::new(
            employer_contribution_value(
                monthly_salary,
                tax.pension.monthly_ceiling,
                percent(benefits.pension_employer_percent),
            ),
            format!("{}% of salary up to the monthly ceiling", benefits.pension_employer_percent),
        ),
    );

    breakdown.components.insert(
        "severance".to_string(),
        ComponentDetail::new(
            employer_contribution_value(
                monthly_salary,
                tax.pension.monthly_ceiling,
                percent(benefits.severance_percent),
            ),
            format!("{}% of salary up to the monthly ceiling", benefits.severance_percent),
        ),
    );

    breakdown.components.insert(
        "study_fund_employer".to_string(),
        ComponentDetail::new(
            employer_contribution_value(
                monthly_salary,
                tax.study_fund.monthly_ceiling,
                percent(benefits.study_fund_employer_percent),
            ),
            format!(
                "{}% of salary up to {} per month",
                benefits.study_fund_employer_percent, tax.study_fund.monthly_ceiling
            ),
        ),
    );

    let health = ComponentDetail::new(
        health_insurance_value(benefits, table),
        "Monthly employer contribution x 12",
    );
    let health = if benefits.health_monthly_contribution.is_none()
        && benefits.health_coverage != HealthCoverage::None
    {
        health.with_assumption("Tier default contribution")
    } else {
        health
    };
    breakdown.components.insert("health_insurance".to_string(), health);

    breakdown.components.insert(
        "paid_time_off".to_string(),
        ComponentDetail::new(
            daily * Decimal::from(benefits.vacation_days),
            format!("{} vacation days at the daily rate", benefits.vacation_days),
        )
        .with_assumption(format!("{} working days per year", leave.working_days_per_year)),
    );

    let sick_days = valued_sick_days(benefits, table);
    let sick = ComponentDetail::new(
        daily * Decimal::from(sick_days) * leave.sick_day_value_factor,
        format!(
            "{sick_days} days beyond the statutory {} at {} of the daily rate",
            leave.statutory_sick_days, leave.sick_day_value_factor
        ),
    );
    let sick = if benefits.unlimited_sick_leave {
        sick.with_assumption(format!(
            "Unlimited sick leave counted as {} days",
            leave.unlimited_sick_equivalent_days
        ))
    } else {
        sick
    };
    breakdown.components.insert("sick_leave".to_string(), sick);

    let parental_days = benefits
        .parental_leave_days
        .saturating_sub(leave.statutory_parental_leave_days);
    breakdown.components.insert(
        "parental_leave".to_string(),
        ComponentDetail::new(
            daily * Decimal::from(parental_days) * leave.parental_leave_value_factor,
            format!(
                "{parental_days} days beyond the statutory {} at {} of the daily rate",
                leave.statutory_parental_leave_days, leave.parental_leave_value_factor
            ),
        ),
    );

    breakdown.gross = breakdown.components_total();
    breakdown.net = breakdown.gross;
    breakdown
}
