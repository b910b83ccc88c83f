//! Configuration loading and management for the Compensation Engine.
//!
//! Tax tables, contribution rates, perk benchmarks and the fallback exchange
//! rate are data, not code. Tax tables are keyed by the year they take effect
//! so supporting a new year means adding a YAML file.
//!
//! # Example
//!
//! ```no_run
//! use compensation_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/israel").unwrap();
//! println!("Loaded jurisdiction: {}", config.config().metadata().name);
//! ```

#[cfg(test)]
pub(crate) mod fixtures;
mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    BenefitsTable, CapitalGainsConfig, CompensationConfig, ContributionRates, CurrencySettings,
    EquityTaxConfig, EquityValuationConfig, HealthTierDefaults, JurisdictionMetadata, LeaveRules,
    MealBenchmarks, PercentRange, PerkBenchmarks, RiskFactors, SocialSecurityConfig, TaxBracket,
    TaxYearConfig, ValidationPolicy,
};
