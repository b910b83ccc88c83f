//! Progressive income tax and marginal rate calculation.
//!
//! Taxable income is the monthly salary less the value of the employee's
//! credit points, floored at zero. Tax is then accumulated bracket by bracket
//! in ascending order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::TaxYearConfig;

/// Tax owed inside one bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTax {
    /// Lower bound of the bracket.
    pub min: Decimal,
    /// Upper bound of the bracket (`None` for the top bracket).
    pub max: Option<Decimal>,
    /// Marginal rate of the bracket.
    pub rate: Decimal,
    /// Portion of taxable income falling inside the bracket.
    pub taxable: Decimal,
    /// `taxable * rate`.
    pub tax: Decimal,
}

/// Monthly taxable income after deducting credit points.
pub fn taxable_income(
    monthly_salary: Decimal,
    tax_points: Decimal,
    tables: &TaxYearConfig,
) -> Decimal {
    let credit = tax_points.max(Decimal::ZERO) * tables.credit_point_value;
    (monthly_salary - credit).max(Decimal::ZERO)
}

/// Splits the income tax on a monthly salary into per-bracket lines.
///
/// Only brackets that receive part of the income produce a line.
pub fn income_tax_by_bracket(
    monthly_salary: Decimal,
    tax_points: Decimal,
    tables: &TaxYearConfig,
) -> Vec<BracketTax> {
    let income = taxable_income(monthly_salary, tax_points, tables);
    let mut lines = Vec::new();

    for bracket in &tables.brackets {
        if income <= bracket.min {
            break;
        }
        let upper = bracket.max.map_or(income, |max| income.min(max));
        let taxable = (upper - bracket.min).max(Decimal::ZERO);
        lines.push(BracketTax {
            min: bracket.min,
            max: bracket.max,
            rate: bracket.rate,
            taxable,
            tax: taxable * bracket.rate,
        });
    }

    lines
}

/// Computes monthly income tax.
///
/// Never negative; zero or negative salaries owe nothing.
///
/// # Examples
///
/// ```no_run
/// use compensation_engine::calculation::compute_income_tax;
/// use compensation_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/israel").unwrap();
/// let tables = loader.config().tax_year(2024).unwrap();
/// let tax = compute_income_tax(Decimal::from(7_000), Decimal::ZERO, tables);
/// assert_eq!(tax, Decimal::from(700));
/// ```
pub fn compute_income_tax(
    monthly_salary: Decimal,
    tax_points: Decimal,
    tables: &TaxYearConfig,
) -> Decimal {
    income_tax_by_bracket(monthly_salary, tax_points, tables)
        .iter()
        .map(|line| line.tax)
        .sum()
}

/// Combined marginal rate on the next shekel of salary.
///
/// The rate of the bracket holding the taxable income (the top bracket when the
/// income is above every bracket), plus the national insurance, employee
/// pension and employee study fund rates for each contribution whose ceiling
/// the salary is still under.
pub fn compute_marginal_rate(
    monthly_salary: Decimal,
    tax_points: Decimal,
    tables: &TaxYearConfig,
) -> Decimal {
    let income = taxable_income(monthly_salary, tax_points, tables);

    let bracket_rate = tables
        .brackets
        .iter()
        .find(|b| b.contains(income))
        .or_else(|| tables.brackets.last())
        .map(|b| b.rate)
        .unwrap_or(Decimal::ZERO);

    let mut rate = bracket_rate;
    if monthly_salary < tables.social_security.monthly_ceiling {
        rate += tables.social_security.rate;
    }
    if monthly_salary < tables.pension.monthly_ceiling {
        rate += tables.pension.employee_rate;
    }
    if monthly_salary < tables.study_fund.monthly_ceiling {
        rate += tables.study_fund.employee_rate;
    }
    rate
}
