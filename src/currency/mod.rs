//! Currency conversion for the Compensation Engine.
//!
//! Rates come from remote providers tried in a fixed order, are cached for a
//! configurable TTL, and degrade to a stale cache entry or a configured
//! constant when every provider fails.

mod cache;
mod service;
mod sources;

pub use cache::RateCache;
pub use service::{CurrencyService, convert_at};
pub use sources::{
    BankOfIsraelSource, ExchangeRateApiSource, RateSource, StaticRateSource, parse_latest_rates,
    parse_sdmx_observation,
};
