//! In-code copies of the shipped Israeli tables for unit tests.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::models::Currency;

use super::types::*;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn bracket(min: &str, max: Option<&str>, rate: &str) -> TaxBracket {
    TaxBracket {
        min: dec(min),
        max: max.map(dec),
        rate: dec(rate),
    }
}

pub fn tax_year_2024() -> TaxYearConfig {
    TaxYearConfig {
        year: 2024,
        credit_point_value: dec("242"),
        brackets: vec![
            bracket("0", Some("7010"), "0.10"),
            bracket("7010", Some("10060"), "0.14"),
            bracket("10060", Some("16150"), "0.20"),
            bracket("16150", Some("22440"), "0.31"),
            bracket("22440", Some("46690"), "0.35"),
            bracket("46690", Some("60130"), "0.47"),
            bracket("60130", None, "0.50"),
        ],
        social_security: SocialSecurityConfig {
            rate: dec("0.12"),
            monthly_ceiling: dec("49030"),
        },
        pension: ContributionRates {
            employee_rate: dec("0.06"),
            employer_rate: dec("0.065"),
            monthly_ceiling: dec("49030"),
        },
        study_fund: ContributionRates {
            employee_rate: dec("0.025"),
            employer_rate: dec("0.075"),
            monthly_ceiling: dec("15712"),
        },
        capital_gains: CapitalGainsConfig {
            rate: dec("0.25"),
            exemption_threshold: dec("0"),
        },
        equity: EquityTaxConfig {
            ordinary_income_rate: dec("0.35"),
            espp_default_discount_percent: dec("15"),
            espp_annual_purchase_limit_usd: dec("25000"),
        },
    }
}

pub fn benefits_table() -> BenefitsTable {
    BenefitsTable {
        health_tiers: HealthTierDefaults {
            basic: dec("150"),
            premium: dec("300"),
            family: dec("550"),
        },
        leave: LeaveRules {
            working_days_per_year: dec("260"),
            statutory_sick_days: 7,
            sick_day_value_factor: dec("0.5"),
            unlimited_sick_equivalent_days: 10,
            statutory_parental_leave_days: 75,
            parental_leave_value_factor: dec("0.3"),
        },
        perks: PerkBenchmarks {
            laptop_annual_value: dec("3000"),
            meals: MealBenchmarks {
                meal_card: dec("1000"),
                catered: dec("1200"),
                both: dec("1800"),
            },
            remote_transportation_monthly: dec("500"),
        },
    }
}

pub fn equity_valuation() -> EquityValuationConfig {
    EquityValuationConfig {
        risk_factors: RiskFactors {
            startup: dec("0.3"),
            growth: dec("0.6"),
            pre_ipo: dec("0.8"),
            public: dec("1.0"),
            unknown: dec("0.5"),
        },
        quick_estimate_equity_ratio: dec("0.30"),
    }
}

pub fn currency_settings() -> CurrencySettings {
    CurrencySettings {
        fallback_rate: dec("3.70"),
        cache_ttl_seconds: 3600,
        request_timeout_seconds: 10,
        primary_url: "http://127.0.0.1:9/latest".to_string(),
        historical_url: "http://127.0.0.1:9/{date}".to_string(),
        secondary_url: "http://127.0.0.1:9/boi".to_string(),
    }
}

pub fn validation_policy() -> ValidationPolicy {
    let mut thresholds = HashMap::new();
    thresholds.insert(Currency::Ils, dec("5000000"));
    thresholds.insert(Currency::Usd, dec("1500000"));
    thresholds.insert(Currency::Eur, dec("1400000"));

    ValidationPolicy {
        unusually_high_annual_salary: thresholds,
        pension_employer_percent: PercentRange {
            min: dec("6.5"),
            max: dec("7.5"),
        },
        severance_percent: PercentRange {
            min: dec("6"),
            max: dec("8.33"),
        },
        study_fund_employer_percent: PercentRange {
            min: dec("0"),
            max: dec("7.5"),
        },
        max_vacation_days: 50,
        max_amount: dec("1000000000000"),
        max_vesting_years: 10,
        max_cliff_months: 60,
    }
}

pub fn compensation_config() -> CompensationConfig {
    CompensationConfig::new(
        JurisdictionMetadata {
            code: "IL".to_string(),
            name: "Israel".to_string(),
            local_currency: Currency::Ils,
            disclaimer: "For estimation purposes only. Not tax or legal advice.".to_string(),
            source_url: "https://www.gov.il/en/departments/israel_tax_authority".to_string(),
        },
        vec![tax_year_2024()],
        benefits_table(),
        equity_valuation(),
        currency_settings(),
        validation_policy(),
    )
}
