//! Integration tests for the Compensation Engine.
//!
//! These tests drive the HTTP router end to end against the shipped Israeli
//! configuration, with a pinned clock and in-process exchange-rate sources:
//! - Salary taxation
//! - Currency conversion and the rate fallback chain
//! - Equity valuation and vesting
//! - Benefits and perks
//! - Validation and quick estimates
//! - Error cases

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt;

use compensation_engine::api::{AppState, create_router};
use compensation_engine::calculation::CompensationCalculator;
use compensation_engine::clock::FixedClock;
use compensation_engine::config::ConfigLoader;
use compensation_engine::currency::{CurrencyService, RateCache, RateSource, StaticRateSource};
use compensation_engine::error::{EngineError, EngineResult};
use compensation_engine::models::ExchangeRate;

// =============================================================================
// Test Helpers
// =============================================================================

struct UnreachableSource(&'static str);

#[async_trait]
impl RateSource for UnreachableSource {
    fn name(&self) -> &str {
        self.0
    }

    async fn fetch_latest(&self) -> EngineResult<ExchangeRate> {
        Err(EngineError::RateUnavailable {
            provider: self.0.to_string(),
            message: "connection refused".to_string(),
        })
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn router_with_sources(sources: Vec<Arc<dyn RateSource>>) -> Router {
    let loader = ConfigLoader::load("./config/israel").expect("Failed to load config");
    let config = loader.into_config();
    let fallback = config.currency().fallback_rate;

    let clock = Arc::new(FixedClock::new(now()));
    let cache = Arc::new(RateCache::new(Duration::hours(1), clock.clone()));
    let currency = CurrencyService::new(sources, cache, fallback, clock.clone());
    let calculator = CompensationCalculator::new(Arc::new(config), currency, clock);

    create_router(AppState::new(calculator))
}

fn create_router_for_test() -> Router {
    router_with_sources(vec![Arc::new(StaticRateSource::new(decimal("3.75"), now()))])
}

async fn post(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

fn package(salary: Value) -> Value {
    json!({
        "id": "pkg_001",
        "name": "Senior engineer offer",
        "salary": salary,
        "created_at": "2025-06-01T09:00:00Z",
        "updated_at": "2025-06-01T09:00:00Z"
    })
}

fn ils_monthly(amount: &str) -> Value {
    json!({ "amount": amount, "currency": "ILS", "frequency": "monthly", "tax_points": "2.25" })
}

fn rsu_grant(amount: &str, price: &str, stage: &str) -> Value {
    json!({
        "id": "rsu_001",
        "kind": { "type": "RSU" },
        "amount": amount,
        "grant_date": "2024-01-01",
        "vesting_start": "2024-01-01",
        "vesting": {
            "type": "standard",
            "total_years": 4,
            "cliff_months": 12,
            "frequency": "quarterly"
        },
        "current_price": price,
        "company_stage": stage
    })
}

fn assert_decimal(value: &Value, expected: &str) {
    let actual = value
        .as_str()
        .unwrap_or_else(|| panic!("Expected a decimal string, got {value}"));
    assert_eq!(
        decimal(actual).normalize(),
        decimal(expected).normalize(),
        "Expected {expected}, got {actual}"
    );
}

fn as_decimal(value: &Value) -> Decimal {
    decimal(value.as_str().unwrap())
}

// =============================================================================
// SECTION 1: Salary Taxation
// =============================================================================

#[tokio::test]
async fn test_monthly_25000_ils_tax_breakdown() {
    let (status, result) = post(
        create_router_for_test(),
        "/calculate",
        json!({ "package": package(ils_monthly("25000")) }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["tax_year"], 2025);
    assert_eq!(
        result["disclaimer"],
        "For estimation purposes only. Not tax or legal advice."
    );

    let taxes = &result["taxes"];
    assert_decimal(&taxes["gross_salary"], "300000");
    assert_decimal(&taxes["income_tax"], "60015.9");
    assert_decimal(&taxes["social_security"], "36000");
    assert_decimal(&taxes["pension_employee"], "18000");
    assert_decimal(&taxes["study_fund_employee"], "4713.6");
    assert_decimal(&taxes["net_salary"], "181270.5");
    assert_decimal(&taxes["marginal_rate"], "0.53");

    assert_decimal(&result["base_salary"]["gross"], "300000");
    assert_decimal(&result["base_salary"]["net"], "181270.5");
}

#[tokio::test]
async fn test_annual_salary_normalised_to_monthly_for_tax() {
    let (_, monthly) = post(
        create_router_for_test(),
        "/calculate",
        json!({ "package": package(ils_monthly("25000")) }),
    )
    .await;
    let (_, annual) = post(
        create_router_for_test(),
        "/calculate",
        json!({
            "package": package(json!({
                "amount": "300000",
                "currency": "ILS",
                "frequency": "annual"
            }))
        }),
    )
    .await;

    assert_eq!(monthly["taxes"], annual["taxes"]);
    assert_eq!(monthly["total_gross"], annual["total_gross"]);
}

#[tokio::test]
async fn test_totals_are_sum_of_components() {
    let mut pkg = package(ils_monthly("30000"));
    pkg["equity"] = json!({ "grants": [rsu_grant("4800", "50", "growth")] });
    pkg["perks"] = json!({ "laptop_provided": true, "meal_type": "meal_card" });

    let (status, result) =

        post(create_router_for_test(), "/calculate", json!({ "package": pkg })).await;
    assert_eq!(status, StatusCode::OK);

    let parts = ["base_salary", "benefits", "equity", "perks"];
    let gross: Decimal = parts.iter().map(|p| as_decimal(&result[*p]["gross"])).sum();
    let net: Decimal = parts.iter().map(|p| as_decimal(&result[*p]["net"])).sum();
    assert_eq!(as_decimal(&result["total_gross"]), gross);
    assert_eq!(as_decimal(&result["total_net"]), net);
}

// =============================================================================
// SECTION 2: Currency Conversion
// =============================================================================

#[tokio::test]
async fn test_usd_salary_converted_at_current_rate() {
    let salary = json!({ "amount": "10000", "currency": "USD", "frequency": "monthly" });
    let (status, result) = post(
        create_router_for_test(),
        "/calculate",
        json!({ "package": package(salary) }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_decimal(&result["base_salary"]["components"]["base_salary"]["value"], "450000");
    assert_decimal(&result["exchange_rate"]["rate"], "3.75");
    assert_eq!(result["exchange_rate"]["source"]["kind"], "remote");
    assert_eq!(result["exchange_rate"]["source"]["provider"], "static");
}

#[tokio::test]
async fn test_all_sources_down_uses_fallback_rate() {
    let router = router_with_sources(vec![
        Arc::new(UnreachableSource("primary")),
        Arc::new(UnreachableSource("secondary")),
    ]);
    let salary = json!({ "amount": "10000", "currency": "USD", "frequency": "monthly" });
    let (status, result) = post(router, "/calculate", json!({ "package": package(salary) })).await;

    assert_eq!(status, StatusCode::OK);
    assert_decimal(&result["exchange_rate"]["rate"], "3.70");
    assert_eq!(result["exchange_rate"]["source"]["kind"], "fallback");
    assert_decimal(&result["base_salary"]["gross"], "444000");
}

#[tokio::test]
async fn test_secondary_source_used_when_primary_down() {
    let router = router_with_sources(vec![
        Arc::new(UnreachableSource("primary")),
        Arc::new(StaticRateSource::new(decimal("3.6"), now())),
    ]);
    let salary = json!({ "amount": "1000", "currency": "USD", "frequency": "annual" });
    let (_, result) = post(router, "/calculate", json!({ "package": package(salary) })).await;

    assert_decimal(&result["exchange_rate"]["rate"], "3.6");
    assert_decimal(&result["base_salary"]["gross"], "3600");
}

// =============================================================================
// SECTION 3: Equity
// =============================================================================

#[tokio::test]
async fn test_rsu_grant_vesting_and_valuation() {
    let mut pkg = package(ils_monthly("25000"));
    pkg["equity"] = json!({ "grants": [rsu_grant("4800", "50", "public")] });

    let (status, result) =

        post(create_router_for_test(), "/calculate", json!({ "package": pkg })).await;
    assert_eq!(status, StatusCode::OK);

    let summary = &result["equity_summary"];
    let events = summary["vesting_events"].as_array().unwrap();
    assert_eq!(events.len(), 16);
    assert_decimal(&events[0]["shares"], "1500");
    assert_decimal(&events[15]["cumulative_shares"], "4800");
    assert_eq!(summary["next_vesting"]["date"], "2025-07-01");

    // 4,800 × 50 USD × 3.75
    assert_decimal(&result["equity"]["gross"], "900000");
    assert_decimal(&result["equity"]["net"], "585000");
    assert_decimal(&result["equity"]["components"]["rsu"]["value"], "900000");
}

#[tokio::test]
async fn test_startup_options_are_risk_discounted() {
    let mut pkg = package(ils_monthly("25000"));
    pkg["equity"] = json!({ "grants": [{
        "id": "opt_001",
        "kind": { "type": "NQSO", "strike_price": "2" },
        "amount": "10000",
        "grant_date": "2025-01-01",
        "vesting_start": "2025-01-01",
        "vesting": { "type": "cliff", "total_years": 1, "cliff_months": 12 },
        "current_price": "6",
        "company_stage": "startup"
    }] });

    let (_, result) =

        post(create_router_for_test(), "/calculate", json!({ "package": pkg })).await;

    // (6 - 2) × 10,000 × 3.75 = 150,000; × 0.65 × 0.3
    assert_decimal(&result["equity"]["gross"], "150000");
    assert_decimal(&result["equity"]["net"], "29250");
    assert_eq!(result["equity_summary"]["vesting_events"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_underwater_options_are_worth_nothing() {
    let mut pkg = package(ils_monthly("25000"));
    pkg["equity"] = json!({ "grants": [{
        "id": "iso_001",
        "kind": { "type": "ISO", "strike_price": "20" },
        "amount": "1000",
        "grant_date": "2025-01-01",
        "vesting_start": "2025-01-01",
        "vesting": { "type": "standard", "total_years": 4, "cliff_months": 12 },
        "current_price": "15",
        "company_stage": "growth"
    }] });

    let (_, result) =

        post(create_router_for_test(), "/calculate", json!({ "package": pkg })).await;
    assert_decimal(&result["equity"]["gross"], "0");
    assert_decimal(&result["equity"]["net"], "0");
}

#[tokio::test]
async fn test_espp_has_no_vesting_events() {
    let mut pkg = package(ils_monthly("25000"));
    pkg["equity"] = json!({ "grants": [{
        "id": "espp_001",
        "kind": { "type": "ESPP", "salary_deduction_percent": "10", "discount_percent": "15" },
        "amount": "0",
        "grant_date": "2025-01-01",
        "vesting_start": "2025-01-01",
        "vesting": { "type": "standard", "total_years": 1 },
        "current_price": "100",
        "company_stage": "public"
    }] });

    let (status, result) =

        post(create_router_for_test(), "/calculate", json!({ "package": pkg })).await;
    assert_eq!(status, StatusCode::OK);
    assert!(result["equity_summary"]["vesting_events"].as_array().unwrap().is_empty());
    assert!(result["equity_summary"]["next_vesting"].is_null());

    // 300,000 ILS = 80,000 USD; 8,000 USD buys 94.1 shares at 85 with a 15 USD gain each
    let gross = as_decimal(&result["equity"]["gross"]);
    assert!((gross - decimal("5294.1176")).abs() < decimal("0.001"), "got {gross}");
}

// =============================================================================
// SECTION 4: Benefits and Perks
// =============================================================================

#[tokio::test]
async fn test_benefits_components_for_default_package() {
    let (_, result) = post(
        create_router_for_test(),
        "/calculate",
        json!({ "package": package(ils_monthly("26000")) }),
    )
    .await;

    let benefits = &result["benefits"];
    assert_decimal(&benefits["components"]["pension_employer"]["value"], "20280");
    assert_decimal(&benefits["components"]["severance"]["value"], "25989.6");
    assert_decimal(&benefits["components"]["study_fund_employer"]["value"], "14140.8");
    assert_decimal(&benefits["components"]["paid_time_off"]["value"], "14400");
    assert_eq!(benefits["gross"], benefits["net"]);
}

#[tokio::test]
async fn test_perks_taxed_at_marginal_rate() {
    let mut pkg = package(ils_monthly("25000"));
    pkg["perks"] = json!({ "laptop_provided": true, "learning_budget": "7000" });

    let (_, result) =

        post(create_router_for_test(), "/calculate", json!({ "package": pkg })).await;

    assert_decimal(&result["perks"]["gross"], "10000");
    // Marginal rate at 25,000/month is 53%
    assert_decimal(&result["perks"]["net"], "4700");
}

// =============================================================================
// SECTION 5: Validation and Quick Estimates
// =============================================================================

#[tokio::test]
async fn test_validate_reports_problems() {
    let mut pkg = package(ils_monthly("0"));
    pkg["benefits"] = json!({ "vacation_days": 80 });

    let (status, report) =

        post(create_router_for_test(), "/validate", json!({ "package": pkg })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["is_valid"], false);
    assert_eq!(report["errors"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_validate_accepts_typical_package() {
    let (_, report) = post(
        create_router_for_test(),
        "/validate",
        json!({ "package": package(ils_monthly("25000")) }),
    )
    .await;
    assert_eq!(report["is_valid"], true);
    assert!(report["errors"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_strict_calculation_rejects_invalid_package() {
    let (status, error) = post(
        create_router_for_test(),
        "/calculate",
        json!({ "package": package(ils_monthly("0")), "strict": true }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_PACKAGE");
    assert!(error["details"].as_str().unwrap().contains("Salary must be greater than zero"));
}

#[tokio::test]
async fn test_quick_total_for_usd_salary() {
    let (status, result) = post(
        create_router_for_test(),
        "/quick-total",
        json!({ "salary": { "amount": "120000", "currency": "USD", "frequency": "annual" } }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // 450,000 ILS + 29,250 pension + 37,485 severance + 14,140.8 study fund + 135,000 equity
    assert_decimal(&result["total"], "665875.8");
}

#[tokio::test]
async fn test_quick_total_unsupported_currency_is_zero() {
    let (status, result) = post(
        create_router_for_test(),
        "/quick-total",
        json!({ "salary": { "amount": "5000", "currency": "EUR", "frequency": "monthly" } }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_decimal(&result["total"], "0");
}

// =============================================================================
// SECTION 6: Error Cases
// =============================================================================

#[tokio::test]
async fn test_unsupported_salary_currency_returns_422() {
    let salary = json!({ "amount": "5000", "currency": "EUR", "frequency": "monthly" });
    let (status, error) = post(
        create_router_for_test(),
        "/calculate",
        json!({ "package": package(salary) }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["code"], "CALCULATION_FAILED");
    assert_eq!(error["message"], "Calculation failed, please check the package inputs");
}

#[tokio::test]
async fn test_unknown_currency_code_returns_400() {
    let salary = json!({ "amount": "5000", "currency": "GBP", "frequency": "monthly" });
    let (status, error) = post(
        create_router_for_test(),
        "/calculate",
        json!({ "package": package(salary) }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_missing_package_returns_validation_error() {
    let (status, error) =
        post(create_router_for_test(), "/calculate", json!({ "strict": true })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_out_of_range_figures_fail_without_crashing() {
    let mut long_vesting = package(ils_monthly("25000"));
    let mut grant = rsu_grant("4800", "50", "public");
    grant["vesting"]["total_years"] = json!(400_000_000);
    grant["vesting"]["cliff_months"] = json!(u32::MAX);
    long_vesting["equity"] = json!({ "grants": [grant] });

    let huge_salary = package(ils_monthly("79228162514264337593543950335"));

    for pkg in [long_vesting, huge_salary] {
        let (status, error) = post(
            create_router_for_test(),
            "/calculate",
            json!({ "package": pkg.clone() }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error["code"], "CALCULATION_FAILED");

        let (status, report) =

            post(create_router_for_test(), "/validate", json!({ "package": pkg })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["is_valid"], false);
        assert!(
            report["errors"]
                .as_array()
                .unwrap()
                .iter()
                .any(|e| e.as_str().unwrap().contains("maximum")),
            "{report}"
        );
    }
}
