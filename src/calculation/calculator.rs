//! End-to-end compensation calculation.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use tracing::{error, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::{CompensationConfig, TaxYearConfig};
use crate::currency::CurrencyService;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    BenefitsConfig, CompensationCalculation, CompensationPackage, ComponentBreakdown,
    ComponentDetail, Currency, SalaryData, ValidationReport,
};

use super::benefits::{calculate_comprehensive_benefits, employer_contribution_value};
use super::equity::{EquityContext, equity_breakdown, summarize_equity};
use super::net_salary::compute_tax_breakdown;
use super::perks::calculate_perks;
use super::validation::{check_limits, validate_inputs};

/// Annual salary and bonus converted to ILS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AnnualSalary {
    base: Decimal,
    bonus: Decimal,
}

impl AnnualSalary {
    fn total(self) -> EngineResult<Decimal> {
        checked_sum([self.base, self.bonus], "annual salary with bonus")
    }
}

fn checked_sum(
    values: impl IntoIterator<Item = Decimal>,
    operation: &str,
) -> EngineResult<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |total, value| total.checked_add(value))
        .ok_or_else(|| EngineError::AmountOutOfRange {
            operation: operation.to_string(),
        })
}

/// Orchestrates the tax, benefits, equity and currency engines.
///
/// The calculator is cheap to share: configuration is behind an `Arc` and the
/// currency service shares its rate cache.
pub struct CompensationCalculator {
    config: Arc<CompensationConfig>,
    currency: CurrencyService,
    clock: Arc<dyn Clock>,
}

impl CompensationCalculator {
    /// Creates a calculator from its collaborators.
    pub fn new(
        config: Arc<CompensationConfig>,
        currency: CurrencyService,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            currency,
            clock,
        }
    }

    /// Creates a calculator that uses the wall clock and the configured rate providers.
    pub fn from_config(config: Arc<CompensationConfig>) -> EngineResult<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let currency = CurrencyService::from_settings(config.currency(), clock.clone())?;
        Ok(Self::new(config, currency, clock))
    }

    /// The configuration in use.
    pub fn config(&self) -> &CompensationConfig {
        &self.config
    }

    /// The currency service in use.
    pub fn currency(&self) -> &CurrencyService {
        &self.currency
    }

    /// Runs the plausibility checks on a package.
    pub fn validate_inputs(&self, package: &CompensationPackage) -> ValidationReport {
        validate_inputs(package, self.config.validation())
    }

    /// Calculates the full compensation for a package.
    ///
    /// # Errors
    ///
    /// Any internal failure is logged and reported as the opaque
    /// [`EngineError::CalculationFailed`]. This includes packages beyond the
    /// hard limits of the validation policy.
    pub async fn calculate(
        &self,
        package: &CompensationPackage,
    ) -> EngineResult<CompensationCalculation> {
        let now = self.clock.now();

        match self.calculate_at(package, now).await {
            Ok(calculation) => {
                info!(
                    package_id = %package.id,
                    tax_year = calculation.tax_year,
                    total_gross = %calculation.total_gross,
                    total_net = %calculation.total_net,
                    "Calculated compensation"
                );
                Ok(calculation)
            }
            Err(err) => {
                error!(package_id = %package.id, error = %err, "Compensation calculation failed");
                Err(EngineError::CalculationFailed)
            }
        }
    }

    async fn annual_salary_ils(&self, salary: &SalaryData) -> EngineResult<AnnualSalary> {
        let base = self
            .currency
            .convert(salary.annual_amount()?, salary.currency, Currency::Ils)
            .await?;

        let annual_bonus = salary.annual_bonus()?;
        let bonus = if annual_bonus > Decimal::ZERO {
            self.currency
                .convert(annual_bonus, salary.currency, Currency::Ils)
                .await?
        } else {
            Decimal::ZERO
        };

        Ok(AnnualSalary { base, bonus })
    }

    async fn calculate_at(
        &self,
        package: &CompensationPackage,
        now: DateTime<Utc>,
    ) -> EngineResult<CompensationCalculation> {
        check_limits(package, self.config.validation())?;

        let salary = &package.salary;
        if salary.amount < Decimal::ZERO {
            return Err(EngineError::InvalidPackage {
                field: "salary.amount".to_string(),
                message: format!("negative salary {}", salary.amount),
            });
        }
        if salary.bonus.as_ref().is_some_and(|b| b.amount < Decimal::ZERO) {
            return Err(EngineError::InvalidPackage {
                field: "salary.bonus.amount".to_string(),
                message: "negative bonus".to_string(),
            });
        }

        let tax = self.config.tax_year(now.year())?;
        let ctx = EquityContext {
            tax,
            risk_factors: &self.config.equity().risk_factors,
            currency: &self.currency,
            annual_salary: Some((salary.annual_amount()?, salary.currency)),
        };

        let (exchange_rate, annual, equity_summary) = tokio::join!(
            self.currency.current_rate(),
            self.annual_salary_ils(salary),
            summarize_equity(&package.equity.grants, &ctx, now),
        );
        let annual = annual?;
        let equity_summary = equity_summary?;

        let monthly = annual.total()? / Decimal::from(12);
        let monthly_taxes = compute_tax_breakdown(monthly, salary.tax_points, tax);
        let taxes = monthly_taxes.annualize();

        let base_salary =
            self.base_salary_breakdown(salary, annual, taxes.net_salary, exchange_rate.rate)?;
        let benefits = calculate_comprehensive_benefits(
            monthly,
            &package.benefits,
            tax,
            self.config.benefits(),
        );
        let equity = equity_breakdown(&equity_summary);
        let perks = calculate_perks(
            &package.perks,
            &self.config.benefits().perks,
            monthly_taxes.marginal_rate,
        );

        let breakdowns = [&base_salary, &benefits, &equity, &perks];
        let total_gross = checked_sum(breakdowns.iter().map(|b| b.gross), "total gross")?;
        let total_net = checked_sum(breakdowns.iter().map(|b| b.net), "total net")?;

        Ok(CompensationCalculation {
            package_id: package.id.clone(),
            tax_year: tax.year,
            base_salary,
            benefits,
            equity,
            perks,
            taxes,
            equity_summary,
            total_gross,
            total_net,
            exchange_rate,
            calculated_at: now,
            disclaimer: self.config.metadata().disclaimer.clone(),
            rules_source_url: self.config.metadata().source_url.clone(),
        })
    }

    fn base_salary_breakdown(
        &self,
        salary: &SalaryData,
        annual: AnnualSalary,
        annual_net: Decimal,
        rate: Decimal,
    ) -> EngineResult<ComponentBreakdown> {
        let mut breakdown = ComponentBreakdown {
            gross: annual.total()?,
            net: annual_net,
            ..ComponentBreakdown::default()
        };

        let mut base = ComponentDetail::new(
            annual.base,
            format!("{} {:?} salary annualised", salary.amount, salary.frequency),
        );
        if salary.currency != Currency::Ils {
            base = base.with_assumption(format!("Converted from {} at {rate}", salary.currency));
        }
        breakdown.components.insert("base_salary".to_string(), base);

        if let Some(bonus) = &salary.bonus {
            let mut detail = ComponentDetail::new(
                annual.bonus,
                format!("{} {:?} bonus annualised", bonus.amount, bonus.frequency),
            );
            if !bonus.guaranteed {
                detail = detail.with_assumption("Bonus is not guaranteed");
            }
            breakdown.components.insert("bonus".to_string(), detail);
        }

        Ok(breakdown)
    }

    /// Cheap annual estimate for live previews.
    ///
    /// Annual salary and bonus in ILS, plus the mandatory employer pension,
    /// severance and study fund deposits at default rates, plus a flat share
    /// of salary as an equity guess. Any failure yields zero.
    pub async fn calculate_quick_total(&self, salary: &SalaryData) -> Decimal {
        match self.quick_total(salary).await {
            Ok(total) => total,
            Err(err) => {
                warn!(error = %err, "Quick total estimate failed");
                Decimal::ZERO
            }
        }
    }

    async fn quick_total(&self, salary: &SalaryData) -> EngineResult<Decimal> {
        let tax = self.config.tax_year(self.clock.now().year())?;
        let annual = self.annual_salary_ils(salary).await?.total()?;
        let monthly = annual / Decimal::from(12);

        checked_sum(
            [
                annual,
                mandatory_employer_deposits(monthly, tax),
                annual * self.config.equity().quick_estimate_equity_ratio,
            ],
            "quick total",
        )
    }
}

fn mandatory_employer_deposits(monthly: Decimal, tax: &TaxYearConfig) -> Decimal {
    let defaults = BenefitsConfig::default();
    let hundred = Decimal::ONE_HUNDRED;

    employer_contribution_value(
        monthly,
        tax.pension.monthly_ceiling,
        defaults.pension_employer_percent / hundred,
    ) + employer_contribution_value(
        monthly,
        tax.pension.monthly_ceiling,
        defaults.severance_percent / hundred,
    ) + employer_contribution_value(
        monthly,
        tax.study_fund.monthly_ceiling,
        defaults.study_fund_employer_percent / hundred,
    )
}
