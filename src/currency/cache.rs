//! Time-based cache for the USD/ILS exchange rate.
//!
//! The cache holds a single slot. It is shared behind an `Arc` by every
//! [`CurrencyService`](super::CurrencyService) that should see the same rate;
//! concurrent writers simply overwrite each other.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};

use crate::clock::Clock;
use crate::models::ExchangeRate;

#[derive(Debug, Clone)]
struct CacheEntry {
    rate: ExchangeRate,
    expires_at: DateTime<Utc>,
}

/// A single-slot exchange-rate cache with an explicit TTL.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use compensation_engine::clock::{Clock, FixedClock};
/// use compensation_engine::currency::RateCache;
/// use compensation_engine::models::{ExchangeRate, RateProvenance};
/// use chrono::{Duration, Utc};
/// use rust_decimal::Decimal;
///
/// let clock = Arc::new(FixedClock::new(Utc::now()));
/// let cache = RateCache::new(Duration::hours(1), clock.clone());
/// cache.set(ExchangeRate::new(Decimal::new(365, 2), clock.now(), RateProvenance::Fallback));
/// assert!(cache.is_valid());
///
/// clock.advance(Duration::hours(1));
/// assert!(!cache.is_valid());
/// assert!(cache.get_stale().is_some());
/// ```
pub struct RateCache {
    entry: Mutex<Option<CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl RateCache {
    /// Creates an empty cache.
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entry: Mutex::new(None),
            ttl,
            clock,
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<CacheEntry>> {
        self.entry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the cached rate if it has not expired.
    pub fn get(&self) -> Option<ExchangeRate> {
        let now = self.clock.now();
        self.slot()
            .as_ref()
            .filter(|entry| now < entry.expires_at)
            .map(|entry| entry.rate.clone())
    }

    /// Returns the cached rate whether or not it has expired.
    pub fn get_stale(&self) -> Option<ExchangeRate> {
        self.slot().as_ref().map(|entry| entry.rate.clone())
    }

    /// Stores a rate and resets the expiry to now + TTL.
    pub fn set(&self, rate: ExchangeRate) {
        let expires_at = self.clock.now() + self.ttl;
        *self.slot() = Some(CacheEntry { rate, expires_at });
    }

    /// Empties the cache.
    pub fn clear(&self) {
        *self.slot() = None;
    }

    /// Returns true if a rate is cached and has not expired.
    pub fn is_valid(&self) -> bool {
        self.get().is_some()
    }

    /// The time-to-live applied on every `set`.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl std::fmt::Debug for RateCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateCache")
            .field("entry", &*self.slot())
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::RateProvenance;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn test_clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
        ))
    }

    fn rate(value: i64) -> ExchangeRate {
        ExchangeRate::new(
            Decimal::new(value, 2),
            Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
            RateProvenance::Remote("test".to_string()),
        )
    }

    #[test]
    fn test_empty_cache_is_invalid() {
        let cache = RateCache::new(Duration::hours(1), test_clock());
        assert!(!cache.is_valid());
        assert!(cache.get().is_none());
        assert!(cache.get_stale().is_none());
    }

    #[test]
    fn test_entry_valid_until_ttl_elapses() {
        let clock = test_clock();
        let cache = RateCache::new(Duration::hours(1), clock.clone());
        cache.set(rate(365));

        clock.advance(Duration::minutes(59));
        assert_eq!(cache.get().unwrap().rate, Decimal::new(365, 2));

        clock.advance(Duration::minutes(1));
        assert!(cache.get().is_none());
        assert_eq!(cache.get_stale().unwrap().rate, Decimal::new(365, 2));
    }

    #[test]
    fn test_set_overwrites_and_resets_expiry() {
        let clock = test_clock();
        let cache = RateCache::new(Duration::hours(1), clock.clone());
        cache.set(rate(365));
        clock.advance(Duration::minutes(50));
        cache.set(rate(372));
        clock.advance(Duration::minutes(50));

        assert_eq!(cache.get().unwrap().rate, Decimal::new(372, 2));
    }

    #[test]
    fn test_clear_removes_entry() {
        let cache = RateCache::new(Duration::hours(1), test_clock());
        cache.set(rate(365));
        cache.clear();
        assert!(!cache.is_valid());
        assert!(cache.get_stale().is_none());
    }
}
