//! Calculation logic for the Compensation Engine.
//!
//! This module contains the tax engine (income tax, mandatory contributions,
//! net salary), the equity engine (vesting projection and grant valuation),
//! the benefits and perks valuation, input validation, and the
//! [`CompensationCalculator`] that ties them together.

mod benefits;
mod calculator;
mod contributions;
mod equity;
mod income_tax;
mod net_salary;
mod perks;
mod validation;
mod vesting;

pub use benefits::{
    calculate_comprehensive_benefits, daily_rate, employer_contribution_value,
    health_insurance_value, valued_sick_days,
};
pub use calculator::CompensationCalculator;
pub use contributions::{
    ContributionSplit, compute_capital_gains_tax, compute_pension_contributions,
    compute_social_security, compute_study_fund_contributions,
};
pub use equity::{
    EquityContext, apply_risk_discount, equity_breakdown, summarize_equity, value_for_year,
    value_grant,
};
pub use income_tax::{
    BracketTax, compute_income_tax, compute_marginal_rate, income_tax_by_bracket, taxable_income,
};
pub use net_salary::{compute_net_salary, compute_tax_breakdown};
pub use perks::{calculate_perks, remote_work_value};
pub use validation::{check_limits, validate_inputs};
pub use vesting::compute_vesting_schedule;
