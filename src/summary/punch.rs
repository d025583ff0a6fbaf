//! Normalized time-clock punches
//!
//! A `Punch` is what the aggregator consumes: one employee, one event
//! kind, one timezone-aware instant. Upstream quirks (alternate field
//! names, numeric ids, naive timestamps) are resolved before a `Punch`
//! is built.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::models::RecordId;

/// Kind of time-clock event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PunchKind {
    CheckIn,
    CheckOut,
    BreakStart,
    BreakEnd,
}

impl PunchKind {
    pub fn all() -> &'static [PunchKind] {
        &[
            PunchKind::CheckIn,
            PunchKind::CheckOut,
            PunchKind::BreakStart,
            PunchKind::BreakEnd,
        ]
    }

    /// Wire name sent to the API
    pub fn as_str(&self) -> &'static str {
        match self {
            PunchKind::CheckIn => "check_in",
            PunchKind::CheckOut => "check_out",
            PunchKind::BreakStart => "break_start",
            PunchKind::BreakEnd => "break_end",
        }
    }
}

/// Accepts `check_in`, `check-in`, `checkin` and the `clock_in`
/// spelling some terminals use
impl FromStr for PunchKind {
    type Err = PunchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        match normalized.as_str() {
            "checkin" | "clockin" | "in" => Ok(Self::CheckIn),
            "checkout" | "clockout" | "out" => Ok(Self::CheckOut),
            "breakstart" | "startbreak" => Ok(Self::BreakStart),
            "breakend" | "endbreak" => Ok(Self::BreakEnd),
            "" => Err(PunchError::MissingKind),
            _ => Err(PunchError::UnknownKind(s.trim().to_string())),
        }
    }
}

impl std::fmt::Display for PunchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single normalized time-clock event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Punch {
    pub employee_id: RecordId,
    pub kind: PunchKind,
    pub at: DateTime<FixedOffset>,
    /// Id of the time entry this punch came from, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<RecordId>,
}

impl Punch {
    pub fn new(employee_id: impl Into<RecordId>, kind: PunchKind, at: DateTime<FixedOffset>) -> Self {
        Self {
            employee_id: employee_id.into(),
            kind,
            at,
            entry_id: None,
        }
    }

    /// Builder method: set the source entry id
    pub fn entry(mut self, id: RecordId) -> Self {
        self.entry_id = Some(id);
        self
    }

    /// Calendar date of the punch in its own offset
    pub fn date(&self) -> NaiveDate {
        self.at.date_naive()
    }
}

/// Reasons a raw time entry cannot become a `Punch`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PunchError {
    #[error("missing employee id")]
    MissingEmployee,

    #[error("missing punch type")]
    MissingKind,

    #[error("unknown punch type: {0}")]
    UnknownKind(String),

    #[error("missing timestamp")]
    MissingTimestamp,

    #[error("unparseable timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Parse a punch timestamp.
///
/// RFC 3339 values keep their offset. Naive values (no offset) are read
/// as UTC. Unix epoch values in seconds or milliseconds are accepted.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, PunchError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(PunchError::MissingTimestamp);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt);
    }

    let naive_formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];

    for fmt in naive_formats {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Utc.fix().from_utc_datetime(&naive));
        }
    }

    if let Ok(n) = s.parse::<i64>() {
        // Anything past year 2286 in seconds is taken as milliseconds
        let millis = if n.unsigned_abs() >= 10_000_000_000 {
            Some(n)
        } else {
            n.checked_mul(1000)
        };
        if let Some(dt) = millis.and_then(DateTime::<Utc>::from_timestamp_millis) {
            return Ok(dt.fixed_offset());
        }
    }

    Err(PunchError::InvalidTimestamp(s.to_string()))
}
