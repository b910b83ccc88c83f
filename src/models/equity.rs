//! Equity grant models.
//!
//! Grants are a tagged union over [`GrantKind`]: every kind shares the same
//! vesting description while carrying its own pricing terms.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The kind of equity grant along with its kind-specific terms.
///
/// # Example
///
/// ```
/// use compensation_engine::models::GrantKind;
///
/// let json = r#"{"type": "ISO", "strike_price": "4.50"}"#;
/// let kind: GrantKind = serde_json::from_str(json).unwrap();
/// assert!(kind.is_option());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum GrantKind {
    /// Restricted stock units.
    Rsu,
    /// Tax-advantaged stock options.
    Iso {
        /// Exercise price per share in USD.
        #[serde(default)]
        strike_price: Option<Decimal>,
    },
    /// Non-qualified stock options.
    Nqso {
        /// Exercise price per share in USD.
        #[serde(default)]
        strike_price: Option<Decimal>,
    },
    /// Employee stock purchase plan.
    Espp {
        /// Percentage of salary withheld for purchases.
        #[serde(default)]
        salary_deduction_percent: Option<Decimal>,
        /// Purchase discount off the market price, in percent.
        #[serde(default)]
        discount_percent: Option<Decimal>,
    },
}

impl GrantKind {
    /// Short label used in breakdown keys and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Rsu => "rsu",
            Self::Iso { .. } => "iso",
            Self::Nqso { .. } => "nqso",
            Self::Espp { .. } => "espp",
        }
    }

    /// Returns true for the two option kinds.
    pub fn is_option(&self) -> bool {
        matches!(self, Self::Iso { .. } | Self::Nqso { .. })
    }

    /// The strike price for option kinds.
    pub fn strike_price(&self) -> Option<Decimal> {
        match self {
            Self::Iso { strike_price } | Self::Nqso { strike_price } => *strike_price,
            _ => None,
        }
    }
}

/// Maturity stage of the issuing company, used for risk adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompanyStage {
    /// Early-stage startup.
    Startup,
    /// Growth-stage private company.
    Growth,
    /// Late-stage private company preparing to list.
    PreIpo,
    /// Publicly traded company.
    Public,
    /// Anything the caller could not classify.
    #[serde(other)]
    Unknown,
}

/// The shape of a vesting schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VestingType {
    /// Equal periodic tranches after an optional cliff.
    Standard,
    /// Everything vests at the end of the cliff.
    Cliff,
    /// Annual tranches from an explicit percentage list.
    Custom,
}

/// How often a standard schedule releases a tranche.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VestingFrequency {
    /// Every month.
    Monthly,
    /// Every three months.
    #[default]
    Quarterly,
    /// Every twelve months.
    Annually,
}

impl VestingFrequency {
    /// Length of one vesting period in months.
    pub fn months(self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Quarterly => 3,
            Self::Annually => 12,
        }
    }
}

/// Describes when the shares of a grant vest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VestingSchedule {
    /// The schedule shape.
    #[serde(rename = "type")]
    pub schedule_type: VestingType,
    /// Total vesting duration in years.
    pub total_years: u32,
    /// Cliff length in months (0 for none).
    #[serde(default)]
    pub cliff_months: u32,
    /// Release frequency for standard schedules.
    #[serde(default)]
    pub frequency: VestingFrequency,
    /// Annual percentages for custom schedules.
    #[serde(default)]
    pub custom_percentages: Vec<Decimal>,
}

/// A single equity grant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityGrant {
    /// Identifier assigned by the caller.
    pub id: String,
    /// Grant kind and kind-specific terms.
    pub kind: GrantKind,
    /// Number of shares or units granted.
    pub amount: Decimal,
    /// The date the grant was made.
    pub grant_date: NaiveDate,
    /// The date vesting starts counting from.
    pub vesting_start: NaiveDate,
    /// The vesting schedule.
    pub vesting: VestingSchedule,
    /// Current market or fair value per share in USD, if known.
    #[serde(default)]
    pub current_price: Option<Decimal>,
    /// Latest company valuation in USD, if known.
    #[serde(default)]
    pub company_valuation: Option<Decimal>,
    /// The company's maturity stage.
    pub company_stage: CompanyStage,
}

/// A projected vesting event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingEvent {
    /// The grant this event belongs to.
    pub grant_id: String,
    /// The date the shares vest.
    pub date: NaiveDate,
    /// Shares vesting on this date.
    pub shares: Decimal,
    /// Shares vested up to and including this date.
    pub cumulative_shares: Decimal,
    /// Shares multiplied by the current price (zero without a price).
    pub estimated_value_usd: Decimal,
}
