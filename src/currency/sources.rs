//! Remote exchange-rate providers.
//!
//! Each provider turns one HTTP JSON endpoint into an [`ExchangeRate`]. A
//! non-2xx status, a malformed body or a missing field is reported as
//! [`EngineError::RateUnavailable`] so the service can move on to the next tier.

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{ExchangeRate, RateProvenance};

/// A provider of USD to ILS rates.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Provider label recorded on every rate it returns.
    fn name(&self) -> &str;

    /// Fetches the latest available rate.
    async fn fetch_latest(&self) -> EngineResult<ExchangeRate>;

    /// Fetches the rate published on `date`.
    async fn fetch_on(&self, date: NaiveDate) -> EngineResult<ExchangeRate> {
        Err(unavailable(
            self.name(),
            format!("historical rates are not offered (requested {date})"),
        ))
    }
}

fn unavailable(provider: &str, message: impl Into<String>) -> EngineError {
    EngineError::RateUnavailable {
        provider: provider.to_string(),
        message: message.into(),
    }
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .unwrap_or_else(Utc::now)
}

fn positive_rate(provider: &str, rate: Decimal) -> EngineResult<Decimal> {
    if rate > Decimal::ZERO {
        Ok(rate)
    } else {
        Err(unavailable(provider, format!("non-positive rate {rate}")))
    }
}

async fn get_json(client: &reqwest::Client, url: &str, provider: &str) -> EngineResult<Value> {
    debug!(provider, url, "Fetching exchange rate");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| unavailable(provider, format!("request failed: {e}")))?;

    if !response.status().is_success() {
        return Err(unavailable(
            provider,
            format!("status {}", response.status()),
        ));
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| unavailable(provider, format!("invalid JSON body: {e}")))
}

#[derive(Debug, Deserialize)]
struct LatestRatesPayload {
    rates: HashMap<String, Decimal>,
    #[serde(default)]
    date: Option<NaiveDate>,
}

/// Parses a `{ "rates": { "ILS": 3.7 }, "date": "2024-06-01" }` payload.
pub fn parse_latest_rates(provider: &str, body: Value) -> EngineResult<ExchangeRate> {
    let payload: LatestRatesPayload = serde_json::from_value(body)
        .map_err(|e| unavailable(provider, format!("unexpected payload: {e}")))?;

    let rate = payload
        .rates
        .get("ILS")
        .copied()
        .ok_or_else(|| unavailable(provider, "missing ILS rate"))?;

    Ok(ExchangeRate::new(
        positive_rate(provider, rate)?,
        payload.date.map(midnight_utc).unwrap_or_else(Utc::now),
        RateProvenance::Remote(provider.to_string()),
    ))
}

fn decimal_from_json(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::String(s) => Decimal::from_str(s).ok(),
        _ => None,
    }
}

/// Parses an SDMX-JSON payload holding a single USD/ILS series.
///
/// The rate is the first value of the most recent observation of the first
/// series in the first data set.
pub fn parse_sdmx_observation(provider: &str, body: Value) -> EngineResult<ExchangeRate> {
    let series = body
        .pointer("/data/dataSets/0/series")
        .and_then(Value::as_object)
        .and_then(|series| series.values().next())
        .ok_or_else(|| unavailable(provider, "missing series"))?;

    let observations = series
        .get("observations")
        .and_then(Value::as_object)
        .ok_or_else(|| unavailable(provider, "missing observations"))?;

    let latest = observations
        .iter()
        .filter_map(|(key, obs)| key.parse::<u32>().ok().map(|index| (index, obs)))
        .max_by_key(|(index, _)| *index)
        .ok_or_else(|| unavailable(provider, "no observations"))?;

    let rate = latest
        .1
        .get(0)
        .and_then(decimal_from_json)
        .ok_or_else(|| unavailable(provider, "observation has no numeric value"))?;

    let observed_on = body
        .pointer("/data/structure/dimensions/observation/0/values")
        .and_then(Value::as_array)
        .and_then(|values| values.get(latest.0 as usize))
        .and_then(|v| v.get("id"))
        .and_then(Value::as_str)
        .and_then(|id| NaiveDate::parse_from_str(id, "%Y-%m-%d").ok());

    Ok(ExchangeRate::new(
        positive_rate(provider, rate)?,
        observed_on.map(midnight_utc).unwrap_or_else(Utc::now),
        RateProvenance::Remote(provider.to_string()),
    ))
}

/// The primary provider: an open exchange-rate API keyed on USD.
#[derive(Debug, Clone)]
pub struct ExchangeRateApiSource {
    client: reqwest::Client,
    latest_url: String,
    historical_url: String,
}

impl ExchangeRateApiSource {
    /// Provider label.
    pub const NAME: &'static str = "exchangerate-api";

    /// Creates the provider. `historical_url` must contain a `{date}` placeholder.
    pub fn new(client: reqwest::Client, latest_url: String, historical_url: String) -> Self {
        Self {
            client,
            latest_url,
            historical_url,
        }
    }
}

#[async_trait]
impl RateSource for ExchangeRateApiSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn fetch_latest(&self) -> EngineResult<ExchangeRate> {
        let body = get_json(&self.client, &self.latest_url, Self::NAME).await?;
        parse_latest_rates(Self::NAME, body)
    }

    async fn fetch_on(&self, date: NaiveDate) -> EngineResult<ExchangeRate> {
        let url = self
            .historical_url
            .replace("{date}", &date.format("%Y-%m-%d").to_string());
        let body = get_json(&self.client, &url, Self::NAME).await?;
        parse_latest_rates(Self::NAME, body)
    }
}

/// The secondary provider: Bank of Israel representative rates (SDMX-JSON).
#[derive(Debug, Clone)]
pub struct BankOfIsraelSource {
    client: reqwest::Client,
    url: String,
}

impl BankOfIsraelSource {
    /// Provider label.
    pub const NAME: &'static str = "bank-of-israel";

    /// Creates the provider.
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl RateSource for BankOfIsraelSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn fetch_latest(&self) -> EngineResult<ExchangeRate> {
        let body = get_json(&self.client, &self.url, Self::NAME).await?;
        parse_sdmx_observation(Self::NAME, body)
    }
}

/// A provider that always returns the same rate.
///
/// Useful offline and in tests, where the network must not be touched.
#[derive(Debug, Clone)]
pub struct StaticRateSource {
    rate: Decimal,
    as_of: DateTime<Utc>,
}

impl StaticRateSource {
    /// Provider label.
    pub const NAME: &'static str = "static";

    /// Creates a provider pinned to `rate`, reported as published at `as_of`.
    pub fn new(rate: Decimal, as_of: DateTime<Utc>) -> Self {
        Self { rate, as_of }
    }
}

#[async_trait]
impl RateSource for StaticRateSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn fetch_latest(&self) -> EngineResult<ExchangeRate> {
        Ok(ExchangeRate::new(
            positive_rate(Self::NAME, self.rate)?,
            self.as_of,
            RateProvenance::Remote(Self::NAME.to_string()),
        ))
    }

    async fn fetch_on(&self, _date: NaiveDate) -> EngineResult<ExchangeRate> {
        self.fetch_latest().await
    }
}
