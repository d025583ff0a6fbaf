//! Record types mirrored from the payroll API
//!
//! Every record is a flat struct of optional fields. The server is the
//! source of truth; the client only holds transient copies for display
//! and for building create/update requests.
//!
//! - `Business`: a tenant
//! - `Employee`, `PayRate`, `Deduction`, `Incident`: per-employee payroll data
//! - `MealBenefitConfig`, `TipCreditConfig`: per-tenant wage configuration
//! - `TimeEntry`: a raw time-clock punch as returned by the API

mod business;
mod deduction;
mod employee;
mod incident;
mod meal_benefit;
mod pay_rate;
mod tip_credit;
mod time_entry;

pub use business::Business;
pub use deduction::{Deduction, DeductionKind};
pub use employee::Employee;
pub use incident::{Incident, IncidentType};
pub use meal_benefit::MealBenefitConfig;
pub use pay_rate::{PayRate, RateType};
pub use tip_credit::TipCreditConfig;
pub use time_entry::TimeEntry;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;

use crate::validation::Validate;

/// A record identifier.
///
/// The API hands out ids as JSON numbers on some endpoints and as strings
/// on others. Both forms are accepted and written back in the form they
/// arrived in. Equality is on the text, so `"7"` and `"07"` are different
/// records.
#[derive(Debug, Clone)]
pub struct RecordId {
    raw: String,
    numeric: bool,
}

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            raw: id.into().trim().to_string(),
            numeric: false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Numeric value, only when the text is the canonical form of an
    /// integer (no sign, no leading zeros)
    fn canonical_number(&self) -> Option<i64> {
        let n: i64 = self.raw.parse().ok()?;
        (n.to_string() == self.raw).then_some(n)
    }
}

impl PartialEq for RecordId {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for RecordId {}

impl std::hash::Hash for RecordId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        Self {
            raw: n.to_string(),
            numeric: true,
        }
    }
}

// Canonical integers sort numerically and before everything else, which
// sorts by text. Two ids compare equal only when their text is equal.
impl Ord for RecordId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.canonical_number(), other.canonical_number()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.raw.cmp(&other.raw),
        }
    }
}

impl PartialOrd for RecordId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.canonical_number().filter(|_| self.numeric) {
            Some(n) => serializer.serialize_i64(n),
            None => serializer.serialize_str(&self.raw),
        }
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Str(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(n) => Ok(RecordId::from(n)),
            Raw::Str(s) => Ok(RecordId::new(s)),
        }
    }
}

/// A REST resource exposed by the payroll API
pub trait Resource: Serialize + DeserializeOwned + Validate + Send + Sync {
    /// Path segment under the API base URL (e.g. `"employees"`)
    const PATH: &'static str;

    /// Key a single record may be wrapped under (e.g. `"employee"`)
    const SINGULAR: &'static str;

    /// Resource-specific keys a list may be wrapped under
    const COLLECTION_KEYS: &'static [&'static str];

    /// Human-readable name used in notices
    const LABEL: &'static str;

    /// Whether list requests are scoped with `?business_id=`
    const TENANT_SCOPED: bool = true;

    /// Server-assigned id, absent on records not yet created
    fn id(&self) -> Option<&RecordId>;
}

/// Lenient field decoders for values the API sends in more than one shape
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberLike {
        Float(f64),
        Text(String),
    }

    /// Decimal fields arrive as numbers or as strings like `"12.50"`
    pub fn opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        let raw: Option<NumberLike> = Option::deserialize(deserializer)?;
        Ok(match raw {
            Some(NumberLike::Float(v)) => Some(v),
            Some(NumberLike::Text(s)) => {
                let s = s.trim();
                if s.is_empty() {
                    None
                } else {
                    Some(s.parse().map_err(serde::de::Error::custom)?)
                }
            }
            None => None,
        })
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextLike {
        Text(String),
        Int(i64),
        Float(f64),
    }

    /// Free-form values that are sometimes numeric (epoch timestamps)
    pub fn opt_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let raw: Option<TextLike> = Option::deserialize(deserializer)?;
        Ok(match raw {
            Some(TextLike::Text(s)) => Some(s),
            Some(TextLike::Int(n)) => Some(n.to_string()),
            Some(TextLike::Float(v)) => Some((v as i64).to_string()),
            None => None,
        })
    }

    /// Dates arrive as `"2024-01-15"`, as full timestamps, or blank
    pub fn opt_date<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<chrono::NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        let Some(raw) = raw else { return Ok(None) };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        let date_part = raw.get(..10).unwrap_or(raw);
        chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom)
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolLike {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    /// Flags arrive as booleans, 0/1, or `"true"`/`"false"`
    pub fn opt_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
        let raw: Option<BoolLike> = Option::deserialize(deserializer)?;
        Ok(match raw {
            Some(BoolLike::Bool(b)) => Some(b),
            Some(BoolLike::Int(n)) => Some(n != 0),
            Some(BoolLike::Text(s)) => match s.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" => Some(true),
                "false" | "0" | "no" => Some(false),
                "" => None,
                other => {
                    return Err(serde::de::Error::custom(format!("invalid flag: {}", other)))
                }
            },
            None => None,
        })
    }
}
