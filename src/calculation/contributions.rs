//! Mandatory contributions and capital gains tax.
//!
//! National insurance, pension and study fund contributions are flat rates
//! applied to the monthly salary up to each contribution's ceiling.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{CapitalGainsConfig, ContributionRates, TaxYearConfig};

/// Employee and employer share of a contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContributionSplit {
    /// Employee share (deducted from salary).
    pub employee: Decimal,
    /// Employer share (on top of salary).
    pub employer: Decimal,
    /// `employee + employer`.
    pub total: Decimal,
}

fn capped(monthly_salary: Decimal, ceiling: Decimal) -> Decimal {
    monthly_salary.min(ceiling).max(Decimal::ZERO)
}

fn split(monthly_salary: Decimal, rates: &ContributionRates) -> ContributionSplit {
    let base = capped(monthly_salary, rates.monthly_ceiling);
    let employee = base * rates.employee_rate;
    let employer = base * rates.employer_rate;
    ContributionSplit {
        employee,
        employer,
        total: employee + employer,
    }
}

/// National insurance and health tax on a monthly salary.
pub fn compute_social_security(monthly_salary: Decimal, tables: &TaxYearConfig) -> Decimal {
    capped(monthly_salary, tables.social_security.monthly_ceiling) * tables.social_security.rate
}

/// Pension contributions on a monthly salary.
pub fn compute_pension_contributions(
    monthly_salary: Decimal,
    tables: &TaxYearConfig,
) -> ContributionSplit {
    split(monthly_salary, &tables.pension)
}

/// Study fund contributions on a monthly salary.
pub fn compute_study_fund_contributions(
    monthly_salary: Decimal,
    tables: &TaxYearConfig,
) -> ContributionSplit {
    split(monthly_salary, &tables.study_fund)
}

/// Capital gains tax on realised gains.
///
/// Gains at or below zero owe nothing; otherwise the part above the exemption
/// threshold is taxed at the flat rate.
pub fn compute_capital_gains_tax(gains: Decimal, config: &CapitalGainsConfig) -> Decimal {
    if gains <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (gains - config.exemption_threshold).max(Decimal::ZERO) * config.rate
}
