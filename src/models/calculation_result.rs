//! Calculation result models for the Compensation Engine.
//!
//! This module contains the [`CompensationCalculation`] type and the structures
//! it aggregates: per-component breakdowns, the tax breakdown and the equity
//! summary. All of them are plain serializable records so export collaborators
//! can render them without touching the engine.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ExchangeRate, VestingEvent};

/// One named line inside a [`ComponentBreakdown`].
///
/// # Example
///
/// ```
/// use compensation_engine::models::ComponentDetail;
/// use rust_decimal::Decimal;
///
/// let detail = ComponentDetail::new(Decimal::from(300_000), "monthly x 12")
///     .with_assumption("Salary paid 12 times a year");
/// assert_eq!(detail.assumptions.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDetail {
    /// Annual value in ILS.
    pub value: Decimal,
    /// How the value was computed.
    pub method: String,
    /// Human-readable assumptions behind the value.
    pub assumptions: Vec<String>,
}

impl ComponentDetail {
    /// Creates a detail with no assumptions.
    pub fn new(value: Decimal, method: impl Into<String>) -> Self {
        Self {
            value,
            method: method.into(),
            assumptions: Vec::new(),
        }
    }

    /// Appends an assumption.
    pub fn with_assumption(mut self, assumption: impl Into<String>) -> Self {
        self.assumptions.push(assumption.into());
        self
    }
}

/// Gross and net annual value of one compensation component.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComponentBreakdown {
    /// Annual gross value in ILS.
    pub gross: Decimal,
    /// Annual net value in ILS.
    pub net: Decimal,
    /// Named lines making up the component.
    pub components: BTreeMap<String, ComponentDetail>,
}

impl ComponentBreakdown {
    /// Sum of all line values.
    pub fn components_total(&self) -> Decimal {
        self.components.values().map(|c| c.value).sum()
    }
}

/// Mandatory deductions and contributions for a salary.
///
/// Produced monthly by the tax engine; [`TaxBreakdown::annualize`] gives the
/// annual view.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaxBreakdown {
    /// Gross salary the breakdown was computed for.
    pub gross_salary: Decimal,
    /// Income tax.
    pub income_tax: Decimal,
    /// National insurance and health tax.
    pub social_security: Decimal,
    /// Employee pension contribution.
    pub pension_employee: Decimal,
    /// Employer pension contribution.
    pub pension_employer: Decimal,
    /// Employee study fund contribution.
    pub study_fund_employee: Decimal,
    /// Employer study fund contribution.
    pub study_fund_employer: Decimal,
    /// Sum of all employee-side deductions.
    pub total_deductions: Decimal,
    /// Gross salary minus deductions, floored at zero.
    pub net_salary: Decimal,
    /// Combined marginal rate on the next unit of salary.
    pub marginal_rate: Decimal,
    /// Deductions divided by gross salary.
    pub effective_rate: Decimal,
}

impl TaxBreakdown {
    /// Scales every monetary field by twelve. Rates are left untouched.
    pub fn annualize(&self) -> Self {
        let months = Decimal::from(12);
        Self {
            gross_salary: self.gross_salary * months,
            income_tax: self.income_tax * months,
            social_security: self.social_security * months,
            pension_employee: self.pension_employee * months,
            pension_employer: self.pension_employer * months,
            study_fund_employee: self.study_fund_employee * months,
            study_fund_employer: self.study_fund_employer * months,
            total_deductions: self.total_deductions * months,
            net_salary: self.net_salary * months,
            marginal_rate: self.marginal_rate,
            effective_rate: self.effective_rate,
        }
    }
}

/// Valuation of a single grant in ILS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantValuation {
    /// The grant valued.
    pub grant_id: String,
    /// Grant kind label (rsu, iso, nqso, espp).
    pub kind: String,
    /// Number of shares the value is based on.
    pub shares: Decimal,
    /// Current gross value.
    pub current_value: Decimal,
    /// Value after tax.
    pub post_tax_value: Decimal,
    /// Post-tax value discounted for company stage.
    pub risk_adjusted_value: Decimal,
    /// Assumptions used in the valuation.
    pub assumptions: Vec<String>,
}

/// Aggregated view of every grant in a package.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EquitySummary {
    /// Sum of current gross values in ILS.
    pub total_current_value: Decimal,
    /// Sum of post-tax values in ILS.
    pub total_post_tax_value: Decimal,
    /// Sum of risk-adjusted values in ILS.
    pub total_risk_adjusted_value: Decimal,
    /// Per-grant valuations in input order.
    pub valuations: Vec<GrantValuation>,
    /// Every projected vesting event, sorted by date.
    pub vesting_events: Vec<VestingEvent>,
    /// The first vesting event strictly after the valuation instant.
    pub next_vesting: Option<VestingEvent>,
}

/// Result of validating a package before calculation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Human-readable problems found.
    pub errors: Vec<String>,
    /// True iff `errors` is empty.
    pub is_valid: bool,
}

impl ValidationReport {
    /// Builds a report from a list of errors.
    pub fn from_errors(errors: Vec<String>) -> Self {
        let is_valid = errors.is_empty();
        Self { errors, is_valid }
    }
}

/// The complete result of a compensation calculation.
///
/// A new instance is produced for every calculation; it is never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationCalculation {
    /// The package the calculation is for.
    pub package_id: String,
    /// The tax year whose tables were applied.
    pub tax_year: i32,
    /// Base salary and bonus.
    pub base_salary: ComponentBreakdown,
    /// Employer benefits.
    pub benefits: ComponentBreakdown,
    /// Equity grants.
    pub equity: ComponentBreakdown,
    /// Perks.
    pub perks: ComponentBreakdown,
    /// Annual mandatory deductions.
    pub taxes: TaxBreakdown,
    /// Detailed equity valuation.
    pub equity_summary: EquitySummary,
    /// Sum of the four component gross values.
    pub total_gross: Decimal,
    /// Sum of the four component net values.
    pub total_net: Decimal,
    /// The exchange rate used.
    pub exchange_rate: ExchangeRate,
    /// When the calculation was performed.
    pub calculated_at: DateTime<Utc>,
    /// Caveat that applies to every figure in the result.
    pub disclaimer: String,
    /// Where the applied tax rules were published.
    pub rules_source_url: String,
}
