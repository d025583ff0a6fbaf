//! Time-clock entries as returned by the API

use serde::{Deserialize, Serialize};

use super::{lenient, RecordId, Resource};
use crate::summary::{parse_timestamp, Punch, PunchError, PunchKind};
use crate::validation::{Checker, Validate, ValidationErrors};

/// A raw time-clock entry.
///
/// Older API versions report the punch instant as `created_at`, newer ones
/// as `timestamp`. Both are kept here and resolved once by
/// [`TimeEntry::to_punch`]; nothing downstream sees the difference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<RecordId>,
    #[serde(alias = "type", skip_serializing_if = "Option::is_none")]
    pub punch_type: Option<String>,
    #[serde(
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<String>,
    #[serde(
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TimeEntry {
    /// The punch instant, preferring `timestamp` over `created_at`
    pub fn raw_timestamp(&self) -> Option<&str> {
        [self.timestamp.as_deref(), self.created_at.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }

    /// Normalize into a [`Punch`]
    pub fn to_punch(&self) -> Result<Punch, PunchError> {
        let employee_id = self
            .employee_id
            .clone()
            .filter(|id| !id.as_str().is_empty())
            .ok_or(PunchError::MissingEmployee)?;

        let raw_kind = self
            .punch_type
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(PunchError::MissingKind)?;
        let kind: PunchKind = raw_kind.parse()?;

        let raw_ts = self.raw_timestamp().ok_or(PunchError::MissingTimestamp)?;
        let at = parse_timestamp(raw_ts)?;

        let punch = Punch::new(employee_id, kind, at);
        Ok(match &self.id {
            Some(id) => punch.entry(id.clone()),
            None => punch,
        })
    }
}

impl Resource for TimeEntry {
    const PATH: &'static str = "time-entries";
    const SINGULAR: &'static str = "time_entry";
    const COLLECTION_KEYS: &'static [&'static str] = &["time_entries", "timeEntries", "entries"];
    const LABEL: &'static str = "Time entry";

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}

impl Validate for TimeEntry {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checker = Checker::new();
        checker
            .required("employee_id", self.employee_id.as_ref())
            .required_str("punch_type", self.punch_type.as_deref());

        if let Some(kind) = self.punch_type.as_deref() {
            if !kind.trim().is_empty() && kind.parse::<PunchKind>().is_err() {
                checker.fail("punch_type", format!("unknown punch type: {}", kind));
            }
        }
        if let Some(ts) = self.raw_timestamp() {
            if let Err(e) = parse_timestamp(ts) {
                checker.fail("timestamp", e.to_string());
            }
        }

        checker.finish()
    }
}
