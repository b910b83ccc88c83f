//! Net salary and the combined monthly tax breakdown.

use rust_decimal::Decimal;

use crate::config::TaxYearConfig;
use crate::models::TaxBreakdown;

use super::contributions::{
    compute_pension_contributions, compute_social_security, compute_study_fund_contributions,
};
use super::income_tax::{compute_income_tax, compute_marginal_rate};

/// Gross monthly salary minus income tax, national insurance, and the
/// employee pension and study fund contributions. Floored at zero.
pub fn compute_net_salary(
    gross_monthly_salary: Decimal,
    tax_points: Decimal,
    tables: &TaxYearConfig,
) -> Decimal {
    compute_tax_breakdown(gross_monthly_salary, tax_points, tables).net_salary
}

/// Builds the monthly [`TaxBreakdown`] for a salary.
///
/// Use [`TaxBreakdown::annualize`] for the annual view.
pub fn compute_tax_breakdown(
    gross_monthly_salary: Decimal,
    tax_points: Decimal,
    tables: &TaxYearConfig,
) -> TaxBreakdown {
    let gross = gross_monthly_salary.max(Decimal::ZERO);
    let income_tax = compute_income_tax(gross, tax_points, tables);
    let social_security = compute_social_security(gross, tables);
    let pension = compute_pension_contributions(gross, tables);
    let study_fund = compute_study_fund_contributions(gross, tables);

    let total_deductions = income_tax + social_security + pension.employee + study_fund.employee;
    let net_salary = (gross - total_deductions).max(Decimal::ZERO);
    let effective_rate = if gross.is_zero() {
        Decimal::ZERO
    } else {
        total_deductions / gross
    };

    TaxBreakdown {
        gross_salary: gross,
        income_tax,
        social_security,
        pension_employee: pension.employee,
        pension_employer: pension.employer,
        study_fund_employee: study_fund.employee,
        study_fund_employer: study_fund.employer,
        total_deductions,
        net_salary,
        marginal_rate: compute_marginal_rate(gross, tax_points, tables),
        effective_rate,
    }
}
