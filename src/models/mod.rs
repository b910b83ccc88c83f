//! Core data models for the Compensation Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod benefits;
mod calculation_result;
mod currency;
mod equity;
mod package;

pub use benefits::{BenefitsConfig, HealthCoverage, MealType, PerksConfig, RemoteWorkPolicy};
pub use calculation_result::{
    CompensationCalculation, ComponentBreakdown, ComponentDetail, EquitySummary, GrantValuation,
    TaxBreakdown, ValidationReport,
};
pub use currency::{Currency, ExchangeRate, RateProvenance};
pub use equity::{
    CompanyStage, EquityGrant, GrantKind, VestingEvent, VestingFrequency, VestingSchedule,
    VestingType,
};
pub use package::{
    Bonus, BonusFrequency, CompensationPackage, EquityConfig, PaymentFrequency, SalaryData,
};
