//! Compensation package model and salary types.
//!
//! A [`CompensationPackage`] is the root input of a calculation. Callers replace
//! its nested records wholesale; every calculation reads it as an immutable snapshot.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{BenefitsConfig, Currency, EquityGrant, PerksConfig};
use crate::error::{EngineError, EngineResult};

/// How often the base salary amount is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    /// The amount is a monthly figure.
    Monthly,
    /// The amount is an annual figure.
    Annual,
}

impl PaymentFrequency {
    /// Multiplier that turns one payment into an annual amount.
    pub fn annual_multiplier(self) -> Decimal {
        match self {
            Self::Monthly => Decimal::from(12),
            Self::Annual => Decimal::ONE,
        }
    }
}

/// How often a bonus is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusFrequency {
    /// Paid four times a year.
    Quarterly,
    /// Paid once a year.
    Annual,
}

impl BonusFrequency {
    /// Multiplier that turns one bonus payment into an annual amount.
    pub fn annual_multiplier(self) -> Decimal {
        match self {
            Self::Quarterly => Decimal::from(4),
            Self::Annual => Decimal::ONE,
        }
    }
}

/// A recurring bonus, in the salary's currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bonus {
    /// The amount of a single bonus payment.
    pub amount: Decimal,
    /// How often the bonus is paid.
    pub frequency: BonusFrequency,
    /// Whether the bonus is contractually guaranteed.
    #[serde(default)]
    pub guaranteed: bool,
}

/// Base salary information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryData {
    /// The base salary amount (non-negative).
    pub amount: Decimal,
    /// The currency the amount is expressed in.
    pub currency: Currency,
    /// Whether `amount` is monthly or annual.
    pub frequency: PaymentFrequency,
    /// Optional bonus.
    #[serde(default)]
    pub bonus: Option<Bonus>,
    /// Income tax credit points. Defaults to the resident baseline of 2.25.
    #[serde(default = "default_tax_points")]
    pub tax_points: Decimal,
}

fn default_tax_points() -> Decimal {
    Decimal::new(225, 2)
}

impl SalaryData {
    /// Annual base salary in the salary's own currency, without bonus.
    ///
    /// # Errors
    ///
    /// [`EngineError::AmountOutOfRange`] when the annual figure overflows.
    pub fn annual_amount(&self) -> EngineResult<Decimal> {
        self.amount
            .checked_mul(self.frequency.annual_multiplier())
            .ok_or_else(|| EngineError::AmountOutOfRange {
                operation: "annual salary".to_string(),
            })
    }

    /// Annualised bonus in the salary's own currency (zero without a bonus).
    pub fn annual_bonus(&self) -> EngineResult<Decimal> {
        let Some(bonus) = &self.bonus else {
            return Ok(Decimal::ZERO);
        };
        bonus
            .amount
            .checked_mul(bonus.frequency.annual_multiplier())
            .ok_or_else(|| EngineError::AmountOutOfRange {
                operation: "annual bonus".to_string(),
            })
    }
}

/// The equity section of a package.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EquityConfig {
    /// The grants held in this package.
    #[serde(default)]
    pub grants: Vec<EquityGrant>,
}

/// A complete compensation package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompensationPackage {
    /// Opaque identifier assigned by the caller.
    pub id: String,
    /// Display name, e.g. the employer or offer label.
    #[serde(default)]
    pub name: String,
    /// Base salary and bonus.
    pub salary: SalaryData,
    /// Benefit configuration.
    #[serde(default)]
    pub benefits: BenefitsConfig,
    /// Equity grants.
    #[serde(default)]
    pub equity: EquityConfig,
    /// Perks configuration.
    #[serde(default)]
    pub perks: PerksConfig,
    /// When the package was created.
    pub created_at: DateTime<Utc>,
    /// When the package was last replaced.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_monthly_salary_annualises_by_twelve() {
        let salary = SalaryData {
            amount: dec("25000"),
            currency: Currency::Ils,
            frequency: PaymentFrequency::Monthly,
            bonus: None,
            tax_points: dec("2.25"),
        };
        assert_eq!(salary.annual_amount().unwrap(), dec("300000"));
        assert_eq!(salary.annual_bonus().unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_quarterly_bonus_annualises_by_four() {
        let salary = SalaryData {
            amount: dec("120000"),
            currency: Currency::Usd,
            frequency: PaymentFrequency::Annual,
            bonus: Some(Bonus {
                amount: dec("5000"),
                frequency: BonusFrequency::Quarterly,
                guaranteed: false,
            }),
            tax_points: dec("2.25"),
        };
        assert_eq!(salary.annual_amount().unwrap(), dec("120000"));
        assert_eq!(salary.annual_bonus().unwrap(), dec("20000"));
    }

    #[test]
    fn test_annualising_a_huge_amount_is_an_error() {
        let salary = SalaryData {
            amount: Decimal::MAX,
            currency: Currency::Ils,
            frequency: PaymentFrequency::Monthly,
            bonus: Some(Bonus {
                amount: Decimal::MAX,
                frequency: BonusFrequency::Quarterly,
                guaranteed: true,
            }),
            tax_points: dec("2.25"),
        };
        assert!(matches!(
            salary.annual_amount(),
            Err(EngineError::AmountOutOfRange { .. })
        ));
        assert!(matches!(
            salary.annual_bonus(),
            Err(EngineError::AmountOutOfRange { .. })
        ));
    }

    #[test]
    fn test_deserialize_minimal_package() {
        let json = r#"{
            "id": "pkg_001",
            "salary": {
                "amount": "25000",
                "currency": "ILS",
                "frequency": "monthly"
            },
            "created_at": "2024-03-01T10:00:00Z",
            "updated_at": "2024-03-01T10:00:00Z"
        }"#;

        let package: CompensationPackage = serde_json::from_str(json).unwrap();
        assert_eq!(package.id, "pkg_001");
        assert_eq!(package.salary.tax_points, dec("2.25"));
        assert!(package.salary.bonus.is_none());
        assert!(package.equity.grants.is_empty());
    }
}
