//! Pre-flight plausibility checks on a compensation package.
//!
//! Problems are reported as human-readable messages. Nothing here blocks a
//! calculation; callers decide what to do with the report.

use rust_decimal::Decimal;

use crate::config::{PercentRange, ValidationPolicy};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    CompensationPackage, Currency, EquityGrant, GrantKind, ValidationReport, VestingType,
};

/// A field that breaks a hard limit, with a message for the caller.
struct LimitViolation {
    field: String,
    message: String,
}

fn check_percent(errors: &mut Vec<String>, label: &str, value: Decimal, range: &PercentRange) {
    if !range.contains(value) {
        errors.push(format!(
            "{label} of {value}% is outside the expected range of {}%-{}%",
            range.min, range.max
        ));
    }
}

fn check_magnitude(
    violations: &mut Vec<LimitViolation>,
    field: String,
    value: Decimal,
    max: Decimal,
) {
    if value.abs() > max {
        violations.push(LimitViolation {
            message: format!("{field} of {value} is beyond the supported maximum of {max}"),
            field,
        });
    }
}

fn grant_limit_violations(
    violations: &mut Vec<LimitViolation>,
    grant: &EquityGrant,
    policy: &ValidationPolicy,
) {
    let max = policy.max_amount;
    let field = |name: &str| format!("equity.grants[{}].{name}", grant.id);

    check_magnitude(violations, field("amount"), grant.amount, max);
    if let Some(price) = grant.current_price {
        check_magnitude(violations, field("current_price"), price, max);
    }
    if let Some(valuation) = grant.company_valuation {
        check_magnitude(violations, field("company_valuation"), valuation, max);
    }
    if let Some(strike) = grant.kind.strike_price() {
        check_magnitude(violations, field("strike_price"), strike, max);
    }
    if let GrantKind::Espp {
        salary_deduction_percent,
        discount_percent,
    } = &grant.kind
    {
        for (name, percent) in [
            ("salary_deduction_percent", salary_deduction_percent),
            ("discount_percent", discount_percent),
        ] {
            if let Some(percent) = percent {
                check_magnitude(violations, field(name), *percent, max);
            }
        }
    }
    for percent in &grant.vesting.custom_percentages {
        check_magnitude(violations, field("custom_percentages"), *percent, max);
    }

    if grant.vesting.total_years > policy.max_vesting_years {
        violations.push(LimitViolation {
            field: field("vesting.total_years"),
            message: format!(
                "Grant {}: vesting over {} years exceeds the maximum of {} years",
                grant.id, grant.vesting.total_years, policy.max_vesting_years
            ),
        });
    }
    if grant.vesting.cliff_months > policy.max_cliff_months {
        violations.push(LimitViolation {
            field: field("vesting.cliff_months"),
            message: format!(
                "Grant {}: cliff of {} months exceeds the maximum of {} months",
                grant.id, grant.vesting.cliff_months, policy.max_cliff_months
            ),
        });
    }
}

fn limit_violations(
    package: &CompensationPackage,
    policy: &ValidationPolicy,
) -> Vec<LimitViolation> {
    let mut violations = Vec::new();
    let max = policy.max_amount;
    let salary = &package.salary;

    check_magnitude(&mut violations, "salary.amount".to_string(), salary.amount, max);
    check_magnitude(&mut violations, "salary.tax_points".to_string(), salary.tax_points, max);
    if let Some(bonus) = &salary.bonus {
        check_magnitude(&mut violations, "salary.bonus.amount".to_string(), bonus.amount, max);
    }

    let benefits = &package.benefits;
    let perks = &package.perks;
    let amounts = [
        ("benefits.pension_employer_percent", Some(benefits.pension_employer_percent)),
        ("benefits.severance_percent", Some(benefits.severance_percent)),
        ("benefits.study_fund_employer_percent", Some(benefits.study_fund_employer_percent)),
        ("benefits.health_monthly_contribution", benefits.health_monthly_contribution),
        ("perks.laptop_annual_value", perks.laptop_annual_value),
        ("perks.internet_stipend", Some(perks.internet_stipend)),
        ("perks.phone_stipend", Some(perks.phone_stipend)),
        ("perks.gym_stipend", Some(perks.gym_stipend)),
        ("perks.meal_monthly_value", perks.meal_monthly_value),
        ("perks.transportation_stipend", Some(perks.transportation_stipend)),
        ("perks.learning_budget", Some(perks.learning_budget)),
    ];
    for (field, value) in amounts {
        if let Some(value) = value {
            check_magnitude(&mut violations, field.to_string(), value, max);
        }
    }

    for grant in &package.equity.grants {
        grant_limit_violations(&mut violations, grant, policy);
    }

    violations
}

/// Rejects a package whose figures are beyond what can be calculated.
///
/// Unlike [`validate_inputs`], this only enforces the hard limits of the
/// policy: the largest accepted amount, vesting length and cliff.
///
/// # Errors
///
/// [`EngineError::InvalidPackage`] naming the first field over a limit.
pub fn check_limits(package: &CompensationPackage, policy: &ValidationPolicy) -> EngineResult<()> {
    match limit_violations(package, policy).into_iter().next() {
        Some(violation) => Err(EngineError::InvalidPackage {
            field: violation.field,
            message: violation.message,
        }),
        None => Ok(()),
    }
}

fn check_grant(errors: &mut Vec<String>, grant: &EquityGrant) {
    if grant.amount <= Decimal::ZERO {
        errors.push(format!("Grant {}: amount must be greater than zero", grant.id));
    }

    if grant.kind.is_option() {
        match grant.kind.strike_price() {
            None => errors.push(format!("Grant {}: options require a strike price", grant.id)),
            Some(strike) if strike < Decimal::ZERO => errors.push(format!(
                "Grant {}: strike price cannot be negative",
                grant.id
            )),
            Some(_) => {}
        }
    }

    if let GrantKind::Espp {
        salary_deduction_percent,
        discount_percent,
    } = &grant.kind
    {
        let out_of_range = |p: &Option<Decimal>| {
            p.is_some_and(|p| p < Decimal::ZERO || p > Decimal::ONE_HUNDRED)
        };
        if out_of_range(salary_deduction_percent) || out_of_range(discount_percent) {
            errors.push(format!(
                "Grant {}: ESPP percentages must be between 0 and 100",
                grant.id
            ));
        }
    }

    if grant.current_price.is_some_and(|price| price < Decimal::ZERO) {
        errors.push(format!("Grant {}: stock price cannot be negative", grant.id));
    }

    if grant.vesting.schedule_type == VestingType::Custom {
        let total = grant
            .vesting
            .custom_percentages
            .iter()
            .try_fold(Decimal::ZERO, |sum, percent| sum.checked_add(*percent));
        match total {
            Some(total) if total <= Decimal::ONE_HUNDRED => {}
            Some(total) => errors.push(format!(
                "Grant {}: custom vesting percentages add up to {total}%, more than 100%",
                grant.id
            )),
            None => errors.push(format!(
                "Grant {}: custom vesting percentages add up to more than 100%",
                grant.id
            )),
        }
    }
}

/// Checks a package against the plausibility policy.
///
/// `is_valid` is true only when no problem was found. Figures beyond the
/// hard limits enforced by [`check_limits`] are reported here too.
pub fn validate_inputs(
    package: &CompensationPackage,
    policy: &ValidationPolicy,
) -> ValidationReport {
    let mut errors = Vec::new();
    let salary = &package.salary;

    if salary.amount <= Decimal::ZERO {
        errors.push("Salary must be greater than zero".to_string());
    }

    if let Some(threshold) = policy.unusually_high_annual_salary.get(&salary.currency) {
        if let Ok(annual) = salary.annual_amount() {
            if annual > *threshold {
                errors.push(format!(
                    "Annual salary of {annual} {} is unusually high, please verify",
                    salary.currency
                ));
            }
        }
    }

    if !matches!(salary.currency, Currency::Ils | Currency::Usd) {
        errors.push(format!(
            "Salary currency {} cannot be converted to ILS",
            salary.currency
        ));
    }

    if salary.bonus.as_ref().is_some_and(|b| b.amount < Decimal::ZERO) {
        errors.push("Bonus amount cannot be negative".to_string());
    }

    let benefits = &package.benefits;
    check_percent(
        &mut errors,
        "Employer pension contribution",
        benefits.pension_employer_percent,
        &policy.pension_employer_percent,
    );
    check_percent(
        &mut errors,
        "Severance contribution",
        benefits.severance_percent,
        &policy.severance_percent,
    );
    check_percent(
        &mut errors,
        "Employer study fund contribution",
        benefits.study_fund_employer_percent,
        &policy.study_fund_employer_percent,
    );

    if benefits.vacation_days > policy.max_vacation_days {
        errors.push(format!(
            "Vacation days must be between 0 and {}",
            policy.max_vacation_days
        ));
    }

    for grant in &package.equity.grants {
        check_grant(&mut errors, grant);
    }

    errors.extend(
        limit_violations(package, policy)
            .into_iter()
            .map(|violation| violation.message),
    );

    ValidationReport::from_errors(errors)
}
