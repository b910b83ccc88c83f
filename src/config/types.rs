//! Configuration types for compensation calculation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Everything that changes
//! between tax years lives in [`TaxYearConfig`]; the remaining tables hold
//! benchmarks and policy thresholds.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{EngineError, EngineResult};
use crate::models::{CompanyStage, Currency, HealthCoverage, MealType};

/// Metadata about the jurisdiction the tables describe.
#[derive(Debug, Clone, Deserialize)]
pub struct JurisdictionMetadata {
    /// Short code (e.g., "IL").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// The local currency all results are expressed in.
    pub local_currency: Currency,
    /// Disclaimer attached to every result.
    pub disclaimer: String,
    /// Where the figures were taken from.
    pub source_url: String,
}

/// One band of the progressive income tax table (monthly ILS).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaxBracket {
    /// Lower bound of the band.
    pub min: Decimal,
    /// Upper bound of the band. `None` means unbounded.
    #[serde(default)]
    pub max: Option<Decimal>,
    /// Marginal rate applied inside the band.
    pub rate: Decimal,
}

impl TaxBracket {
    /// Returns true if `income` falls inside `[min, max)`.
    pub fn contains(&self, income: Decimal) -> bool {
        income >= self.min && self.max.is_none_or(|max| income < max)
    }
}

/// National insurance and health tax settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SocialSecurityConfig {
    /// Flat employee rate.
    pub rate: Decimal,
    /// Monthly salary above which no contribution is due.
    pub monthly_ceiling: Decimal,
}

/// Employee and employer rates for a co-funded contribution.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContributionRates {
    /// Employee rate.
    pub employee_rate: Decimal,
    /// Employer rate.
    pub employer_rate: Decimal,
    /// Monthly salary cap the rates apply to.
    pub monthly_ceiling: Decimal,
}

/// Capital gains tax settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CapitalGainsConfig {
    /// Flat rate on taxable gains.
    pub rate: Decimal,
    /// Gains up to this amount are exempt.
    pub exemption_threshold: Decimal,
}

/// Tax treatment parameters for equity.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EquityTaxConfig {
    /// Flat rate applied to equity taxed as ordinary income.
    pub ordinary_income_rate: Decimal,
    /// ESPP discount assumed when none is given, in percent.
    pub espp_default_discount_percent: Decimal,
    /// Maximum ESPP purchases per year in USD.
    pub espp_annual_purchase_limit_usd: Decimal,
}

/// Tax tables effective from a given year.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaxYearConfig {
    /// The first year these tables apply to.
    pub year: i32,
    /// Monthly value of one tax credit point.
    pub credit_point_value: Decimal,
    /// Monthly income tax brackets, ascending.
    pub brackets: Vec<TaxBracket>,
    /// National insurance settings.
    pub social_security: SocialSecurityConfig,
    /// Pension contribution settings.
    pub pension: ContributionRates,
    /// Study fund contribution settings.
    pub study_fund: ContributionRates,
    /// Capital gains settings.
    pub capital_gains: CapitalGainsConfig,
    /// Equity tax treatment.
    pub equity: EquityTaxConfig,
}

/// Default monthly health contribution per coverage tier.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthTierDefaults {
    /// Basic tier.
    pub basic: Decimal,
    /// Premium tier.
    pub premium: Decimal,
    /// Family tier.
    pub family: Decimal,
}

impl HealthTierDefaults {
    /// Default monthly contribution for a coverage tier.
    pub fn monthly_for(&self, coverage: HealthCoverage) -> Decimal {
        match coverage {
            HealthCoverage::None => Decimal::ZERO,
            HealthCoverage::Basic => self.basic,
            HealthCoverage::Premium => self.premium,
            HealthCoverage::Family => self.family,
        }
    }
}

/// Leave rules used to value paid time off.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LeaveRules {
    /// Working days used to derive a daily rate.
    pub working_days_per_year: Decimal,
    /// Sick days every employee is entitled to by law.
    pub statutory_sick_days: u32,
    /// Share of the daily rate credited for extra sick days.
    pub sick_day_value_factor: Decimal,
    /// Days an unlimited sick policy is valued as.
    pub unlimited_sick_equivalent_days: u32,
    /// Parental leave days covered by national insurance.
    pub statutory_parental_leave_days: u32,
    /// Share of the daily rate credited for extra parental leave.
    pub parental_leave_value_factor: Decimal,
}

/// Default monthly meal value per meal type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MealBenchmarks {
    /// Meal card.
    pub meal_card: Decimal,
    /// Catered meals.
    pub catered: Decimal,
    /// Both.
    pub both: Decimal,
}

impl MealBenchmarks {
    /// Default monthly value for a meal type.
    pub fn monthly_for(&self, meal_type: MealType) -> Decimal {
        match meal_type {
            MealType::None => Decimal::ZERO,
            MealType::MealCard => self.meal_card,
            MealType::Catered => self.catered,
            MealType::Both => self.both,
        }
    }
}

/// Market benchmarks for perks without an explicit value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PerkBenchmarks {
    /// Annual value of a provided laptop.
    pub laptop_annual_value: Decimal,
    /// Monthly meal values.
    pub meals: MealBenchmarks,
    /// Monthly commuting cost saved by working from home full time.
    pub remote_transportation_monthly: Decimal,
}

/// Benefits configuration from benefits.yaml.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BenefitsTable {
    /// Health insurance defaults.
    pub health_tiers: HealthTierDefaults,
    /// Leave valuation rules.
    pub leave: LeaveRules,
    /// Perk benchmarks.
    pub perks: PerkBenchmarks,
}

/// Risk discount factor per company stage.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RiskFactors {
    /// Startup.
    pub startup: Decimal,
    /// Growth.
    pub growth: Decimal,
    /// Pre-IPO.
    pub pre_ipo: Decimal,
    /// Public.
    pub public: Decimal,
    /// Unclassified.
    pub unknown: Decimal,
}

impl RiskFactors {
    /// The discount factor for a stage.
    pub fn factor_for(&self, stage: CompanyStage) -> Decimal {
        match stage {
            CompanyStage::Startup => self.startup,
            CompanyStage::Growth => self.growth,
            CompanyStage::PreIpo => self.pre_ipo,
            CompanyStage::Public => self.public,
            CompanyStage::Unknown => self.unknown,
        }
    }
}

/// Equity valuation settings from equity.yaml.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EquityValuationConfig {
    /// Risk discount factors.
    pub risk_factors: RiskFactors,
    /// Share of salary assumed as equity in quick estimates.
    pub quick_estimate_equity_ratio: Decimal,
}

/// Exchange-rate settings from currency.yaml.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrencySettings {
    /// USD to ILS rate used when every source fails.
    pub fallback_rate: Decimal,
    /// How long a fetched rate stays valid.
    pub cache_ttl_seconds: u64,
    /// HTTP timeout per request.
    pub request_timeout_seconds: u64,
    /// Latest-rate endpoint of the primary source.
    pub primary_url: String,
    /// Dated endpoint of the primary source; `{date}` is replaced.
    pub historical_url: String,
    /// Endpoint of the secondary source.
    pub secondary_url: String,
}

/// An inclusive percentage range.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PercentRange {
    /// Lowest accepted value.
    pub min: Decimal,
    /// Highest accepted value.
    pub max: Decimal,
}

impl PercentRange {
    /// Returns true if `value` lies within the range.
    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Plausibility thresholds from validation.yaml.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValidationPolicy {
    /// Annual salary above which a package is flagged, per currency.
    pub unusually_high_annual_salary: HashMap<Currency, Decimal>,
    /// Accepted employer pension percentages.
    pub pension_employer_percent: PercentRange,
    /// Accepted severance percentages.
    pub severance_percent: PercentRange,
    /// Accepted employer study fund percentages.
    pub study_fund_employer_percent: PercentRange,
    /// Maximum vacation days.
    pub max_vacation_days: u32,
    /// Largest absolute value accepted for any amount or percentage.
    pub max_amount: Decimal,
    /// Longest accepted vesting period in years.
    pub max_vesting_years: u32,
    /// Longest accepted vesting cliff in months.
    pub max_cliff_months: u32,
}

/// The complete compensation configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct CompensationConfig {
    metadata: JurisdictionMetadata,
    /// Sorted oldest first.
    tax_years: Vec<TaxYearConfig>,
    benefits: BenefitsTable,
    equity: EquityValuationConfig,
    currency: CurrencySettings,
    validation: ValidationPolicy,
}

impl CompensationConfig {
    /// Creates a new CompensationConfig from its component parts.
    pub fn new(
        metadata: JurisdictionMetadata,
        tax_years: Vec<TaxYearConfig>,
        benefits: BenefitsTable,
        equity: EquityValuationConfig,
        currency: CurrencySettings,
        validation: ValidationPolicy,
    ) -> Self {
        let mut sorted_years = tax_years;
        sorted_years.sort_by_key(|t| t.year);
        Self {
            metadata,
            tax_years: sorted_years,
            benefits,
            equity,
            currency,
            validation,
        }
    }

    /// Returns the jurisdiction metadata.
    pub fn metadata(&self) -> &JurisdictionMetadata {
        &self.metadata
    }

    /// Returns all tax-year tables, oldest first.
    pub fn tax_years(&self) -> &[TaxYearConfig] {
        &self.tax_years
    }

    /// Returns the latest tax table effective on or before `year`.
    pub fn tax_year(&self, year: i32) -> EngineResult<&TaxYearConfig> {
        self.tax_years
            .iter()
            .rfind(|t| t.year <= year)
            .ok_or(EngineError::TaxYearNotFound { year })
    }

    /// Returns the benefits table.
    pub fn benefits(&self) -> &BenefitsTable {
        &self.benefits
    }

    /// Returns the equity valuation settings.
    pub fn equity(&self) -> &EquityValuationConfig {
        &self.equity
    }

    /// Returns the exchange-rate settings.
    pub fn currency(&self) -> &CurrencySettings {
        &self.currency
    }

    /// Returns the validation policy.
    pub fn validation(&self) -> &ValidationPolicy {
        &self.validation
    }
}
