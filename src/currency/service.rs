//! USD/ILS conversion with caching and an ordered fallback chain.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::config::CurrencySettings;
use crate::error::{EngineError, EngineResult};
use crate::models::{Currency, ExchangeRate, RateProvenance};

use super::cache::RateCache;
use super::sources::{BankOfIsraelSource, ExchangeRateApiSource, RateSource};

/// Converts amounts between USD and ILS.
///
/// `current_rate` never fails: it walks the providers in order, then falls
/// back to an expired cache entry, then to the configured constant. The only
/// error a caller can see is [`EngineError::UnsupportedConversion`].
pub struct CurrencyService {
    sources: Vec<Arc<dyn RateSource>>,
    cache: Arc<RateCache>,
    fallback_rate: Decimal,
    clock: Arc<dyn Clock>,
}

impl CurrencyService {
    /// Creates a service over explicit providers (tried in order) and a shared cache.
    pub fn new(
        sources: Vec<Arc<dyn RateSource>>,
        cache: Arc<RateCache>,
        fallback_rate: Decimal,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sources,
            cache,
            fallback_rate,
            clock,
        }
    }

    /// Creates a service wired to the configured HTTP providers.
    pub fn from_settings(settings: &CurrencySettings, clock: Arc<dyn Clock>) -> EngineResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(StdDuration::from_secs(settings.request_timeout_seconds))
            .build()
            .map_err(|e| EngineError::RateUnavailable {
                provider: "http-client".to_string(),
                message: e.to_string(),
            })?;

        let sources: Vec<Arc<dyn RateSource>> = vec![
            Arc::new(ExchangeRateApiSource::new(
                client.clone(),
                settings.primary_url.clone(),
                settings.historical_url.clone(),
            )),
            Arc::new(BankOfIsraelSource::new(client, settings.secondary_url.clone())),
        ];

        let ttl = Duration::seconds(i64::try_from(settings.cache_ttl_seconds).unwrap_or(i64::MAX));
        let cache = Arc::new(RateCache::new(ttl, clock.clone()));

        Ok(Self::new(sources, cache, settings.fallback_rate, clock))
    }

    /// The cache this service reads and writes.
    pub fn cache(&self) -> &Arc<RateCache> {
        &self.cache
    }

    /// Returns the current USD to ILS rate.
    pub async fn current_rate(&self) -> ExchangeRate {
        if let Some(rate) = self.cache.get() {
            debug!(rate = %rate.rate, source = %rate.source, "Exchange rate cache hit");
            return rate;
        }

        for source in &self.sources {
            match source.fetch_latest().await {
                Ok(rate) => {
                    info!(rate = %rate.rate, provider = source.name(), "Fetched exchange rate");
                    self.cache.set(rate.clone());
                    return rate;
                }
                Err(err) => {
                    warn!(provider = source.name(), error = %err, "Exchange rate provider failed");
                }
            }
        }

        if let Some(stale) = self.cache.get_stale() {
            warn!(rate = %stale.rate, "All providers failed, serving expired cached rate");
            let provider = match &stale.source {
                RateProvenance::Remote(name) | RateProvenance::StaleCache(name) => name.clone(),
                other => other.to_string(),
            };
            return stale.relabel(RateProvenance::StaleCache(provider));
        }

        warn!(rate = %self.fallback_rate, "All providers failed, using fallback rate");
        ExchangeRate::new(self.fallback_rate, self.clock.now(), RateProvenance::Fallback)
    }

    /// Converts `amount` from one currency to another at the current rate.
    ///
    /// Identity when the currencies match. Only USD and ILS convert.
    pub async fn convert(
        &self,
        amount: Decimal,
        from: Currency,
        to: Currency,
    ) -> EngineResult<Decimal> {
        if from == to {
            return Ok(amount);
        }
        ensure_supported(from, to)?;
        let rate = self.current_rate().await;
        convert_at(&rate, amount, from, to)
    }

    /// Returns the rate published on `date`, or the current rate labelled
    /// as historical-unavailable when no provider can serve it.
    pub async fn historical_rate(&self, date: NaiveDate) -> ExchangeRate {
        for source in &self.sources {
            match source.fetch_on(date).await {
                Ok(rate) => return rate,
                Err(err) => {
                    debug!(
                        provider = source.name(),
                        %date,
                        error = %err,
                        "Historical rate unavailable"
                    );
                }
            }
        }

        warn!(%date, "No historical rate available, using current rate");
        self.current_rate()
            .await
            .relabel(RateProvenance::HistoricalUnavailable)
    }

    /// Empties the shared cache, forcing the next lookup to fetch.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Returns true if the shared cache holds an unexpired rate.
    pub fn is_cache_valid(&self) -> bool {
        self.cache.is_valid()
    }
}

fn ensure_supported(from: Currency, to: Currency) -> EngineResult<()> {
    match (from, to) {
        (Currency::Usd, Currency::Ils) | (Currency::Ils, Currency::Usd) => Ok(()),
        _ if from == to => Ok(()),
        _ => Err(EngineError::UnsupportedConversion { from, to }),
    }
}

/// Converts `amount` using an already-fetched rate snapshot.
pub fn convert_at(
    rate: &ExchangeRate,
    amount: Decimal,
    from: Currency,
    to: Currency,
) -> EngineResult<Decimal> {
    ensure_supported(from, to)?;
    match (from, to) {
        (Currency::Usd, Currency::Ils) => {
            amount
                .checked_mul(rate.rate)
                .ok_or_else(|| EngineError::AmountOutOfRange {
                    operation: format!("conversion of {amount} USD to ILS"),
                })
        }
        (Currency::Ils, Currency::Usd) => {
            amount
                .checked_div(rate.rate)
                .ok_or_else(|| EngineError::RateUnavailable {
                    provider: rate.source.to_string(),
                    message: format!("cannot divide by rate {}", rate.rate),
                })
        }
        _ => Ok(amount),
    }
}
