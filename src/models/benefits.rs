//! Benefit and perk configuration records.
//!
//! Both records are flat user input. Monetary fields are non-negative and
//! optional fields fall back to benchmarks from the benefits table.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Health insurance coverage tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthCoverage {
    /// No employer-paid health insurance.
    #[default]
    None,
    /// Employee-only supplementary coverage.
    Basic,
    /// Extended employee coverage.
    Premium,
    /// Coverage for the employee and family.
    Family,
}

/// Employer benefit configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenefitsConfig {
    /// Employer pension contribution in percent of salary.
    pub pension_employer_percent: Decimal,
    /// Employer severance (pitzuim) deposit in percent of salary.
    pub severance_percent: Decimal,
    /// Employer study fund contribution in percent of salary.
    pub study_fund_employer_percent: Decimal,
    /// Health insurance tier.
    pub health_coverage: HealthCoverage,
    /// Explicit monthly employer health contribution in ILS.
    pub health_monthly_contribution: Option<Decimal>,
    /// Paid vacation days per year.
    pub vacation_days: u32,
    /// Paid sick days per year.
    pub sick_days: u32,
    /// Whether sick leave is unlimited.
    pub unlimited_sick_leave: bool,
    /// Paid parental leave in working days.
    pub parental_leave_days: u32,
}

impl Default for BenefitsConfig {
    fn default() -> Self {
        Self {
            pension_employer_percent: Decimal::new(65, 1),
            severance_percent: Decimal::new(833, 2),
            study_fund_employer_percent: Decimal::new(75, 1),
            health_coverage: HealthCoverage::None,
            health_monthly_contribution: None,
            vacation_days: 12,
            sick_days: 18,
            unlimited_sick_leave: false,
            parental_leave_days: 0,
        }
    }
}

/// Meal benefit type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    /// No meal benefit.
    #[default]
    None,
    /// Meal card (Cibus, 10bis and similar).
    MealCard,
    /// Catered meals in the office.
    Catered,
    /// Both a card and catered meals.
    Both,
}

/// Where the employee is expected to work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteWorkPolicy {
    /// Full-time in the office.
    #[default]
    Office,
    /// Some days from home.
    Hybrid,
    /// Fully remote.
    Remote,
}

/// Employer-provided perks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PerksConfig {
    /// Whether a work laptop is provided.
    pub laptop_provided: bool,
    /// Annual value of the laptop in ILS, if known.
    pub laptop_annual_value: Option<Decimal>,
    /// Monthly internet stipend in ILS.
    pub internet_stipend: Decimal,
    /// Monthly phone stipend in ILS.
    pub phone_stipend: Decimal,
    /// Monthly gym stipend in ILS.
    pub gym_stipend: Decimal,
    /// Meal benefit type.
    pub meal_type: MealType,
    /// Monthly meal value in ILS, if known.
    pub meal_monthly_value: Option<Decimal>,
    /// Monthly transportation allowance in ILS.
    pub transportation_stipend: Decimal,
    /// Annual learning and development budget in ILS.
    pub learning_budget: Decimal,
    /// Remote-work policy.
    pub remote_work: RemoteWorkPolicy,
    /// Days per week worked from home under a hybrid policy.
    pub hybrid_days_per_week: u32,
}
