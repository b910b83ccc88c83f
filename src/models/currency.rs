//! Currency and exchange-rate models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Currencies a package may be denominated in.
///
/// Only USD and ILS can be converted between each other. EUR is accepted on
/// input so that packages entered in euros fail loudly instead of silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Israeli New Shekel (the local currency).
    Ils,
    /// US Dollar.
    Usd,
    /// Euro.
    Eur,
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ils => write!(f, "ILS"),
            Self::Usd => write!(f, "USD"),
            Self::Eur => write!(f, "EUR"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ILS" | "NIS" => Ok(Self::Ils),
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

/// Where an exchange rate came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "provider", rename_all = "snake_case")]
pub enum RateProvenance {
    /// Fetched from the named remote provider.
    Remote(String),
    /// An expired cache entry served because every provider failed.
    StaleCache(String),
    /// The configured constant used when nothing else was available.
    Fallback,
    /// A historical lookup failed; this is the current rate instead.
    HistoricalUnavailable,
}

impl std::fmt::Display for RateProvenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote(provider) => write!(f, "{provider}"),
            Self::StaleCache(provider) => write!(f, "{provider} (stale)"),
            Self::Fallback => write!(f, "fallback"),
            Self::HistoricalUnavailable => write!(f, "historical unavailable"),
        }
    }
}

/// A USD to ILS exchange rate snapshot.
///
/// # Example
///
/// ```
/// use compensation_engine::models::{ExchangeRate, RateProvenance};
/// use chrono::Utc;
/// use rust_decimal::Decimal;
///
/// let rate = ExchangeRate::new(Decimal::new(370, 2), Utc::now(), RateProvenance::Fallback);
/// assert_eq!(rate.rate, Decimal::new(37, 1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// How many ILS one USD buys.
    pub rate: Decimal,
    /// When the rate was published or fetched.
    pub last_updated: DateTime<Utc>,
    /// Where the rate came from.
    pub source: RateProvenance,
}

impl ExchangeRate {
    /// Creates a new exchange rate snapshot.
    #[must_use]
    pub const fn new(rate: Decimal, last_updated: DateTime<Utc>, source: RateProvenance) -> Self {
        Self {
            rate,
            last_updated,
            source,
        }
    }

    /// Returns the same rate relabelled with a different provenance.
    #[must_use]
    pub fn relabel(&self, source: RateProvenance) -> Self {
        Self {
            source,
            ..self.clone()
        }
    }
}
