//! Time summary output types

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;

use super::punch::PunchKind;
use crate::models::{MealBenefitConfig, RecordId};

/// Hours per Monday-start week paid at the regular rate
pub const WEEKLY_REGULAR_HOURS: f64 = 40.0;

pub(crate) const WEEKLY_REGULAR_SECONDS: i64 = 40 * 3600;

pub(crate) fn seconds_to_hours(seconds: i64) -> f64 {
    seconds as f64 / 3600.0
}

/// One completed shift
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub check_in: DateTime<FixedOffset>,
    pub check_out: DateTime<FixedOffset>,
    pub break_seconds: i64,
    pub worked_seconds: i64,
}

impl DaySummary {
    pub fn worked_hours(&self) -> f64 {
        seconds_to_hours(self.worked_seconds)
    }

    pub fn break_hours(&self) -> f64 {
        seconds_to_hours(self.break_seconds)
    }
}

/// Worked time in one ISO week
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekSummary {
    /// Monday the week starts on
    pub week_start: NaiveDate,
    pub days_worked: usize,
    pub worked_seconds: i64,
    pub regular_seconds: i64,
    pub overtime_seconds: i64,
}

impl WeekSummary {
    pub fn regular_hours(&self) -> f64 {
        seconds_to_hours(self.regular_seconds)
    }

    pub fn overtime_hours(&self) -> f64 {
        seconds_to_hours(self.overtime_seconds)
    }

    pub fn total_hours(&self) -> f64 {
        seconds_to_hours(self.worked_seconds)
    }
}

/// Raw punch counts by kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PunchCounts {
    pub check_in: usize,
    pub check_out: usize,
    pub break_start: usize,
    pub break_end: usize,
}

impl PunchCounts {
    pub fn record(&mut self, kind: PunchKind) {
        match kind {
            PunchKind::CheckIn => self.check_in += 1,
            PunchKind::CheckOut => self.check_out += 1,
            PunchKind::BreakStart => self.break_start += 1,
            PunchKind::BreakEnd => self.break_end += 1,
        }
    }

    pub fn get(&self, kind: PunchKind) -> usize {
        match kind {
            PunchKind::CheckIn => self.check_in,
            PunchKind::CheckOut => self.check_out,
            PunchKind::BreakStart => self.break_start,
            PunchKind::BreakEnd => self.break_end,
        }
    }

    pub fn total(&self) -> usize {
        self.check_in + self.check_out + self.break_start + self.break_end
    }
}

/// Per-employee totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeSummary {
    pub employee_id: RecordId,
    pub regular_hours: f64,
    pub overtime_hours: f64,
    pub total_hours: f64,
    pub punches: PunchCounts,
    pub days: Vec<DaySummary>,
    pub weeks: Vec<WeekSummary>,
}

impl EmployeeSummary {
    /// Number of worked days that earn the given meal benefit
    pub fn meal_benefit_days(&self, config: &MealBenefitConfig) -> usize {
        self.days
            .iter()
            .filter(|d| config.applies_to(d.worked_hours()))
            .count()
    }
}

/// Data the aggregator could not turn into hours
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anomaly {
    /// Check-in on a date with no check-out
    MissingCheckOut {
        employee_id: RecordId,
        date: NaiveDate,
    },
    /// Check-out on a date with no check-in
    MissingCheckIn {
        employee_id: RecordId,
        date: NaiveDate,
    },
    /// Shift whose breaks cover its whole length, or whose check-out
    /// precedes its check-in
    NonPositiveDay {
        employee_id: RecordId,
        date: NaiveDate,
        worked_seconds: i64,
    },
    /// Break start with no later break end on the same date
    UnpairedBreakStart {
        employee_id: RecordId,
        at: DateTime<FixedOffset>,
    },
    /// Break end left over after pairing
    UnpairedBreakEnd {
        employee_id: RecordId,
        at: DateTime<FixedOffset>,
    },
    /// Paired breaks on a date with neither a check-in nor a check-out
    BreaksWithoutShift {
        employee_id: RecordId,
        date: NaiveDate,
        break_seconds: i64,
    },
    /// Shift on a date too close to the calendar limits to place in a week
    OutOfRangeDate {
        employee_id: RecordId,
        date: NaiveDate,
    },
}

impl Anomaly {
    pub fn employee_id(&self) -> &RecordId {
        match self {
            Anomaly::MissingCheckOut { employee_id, .. }
            | Anomaly::MissingCheckIn { employee_id, .. }
            | Anomaly::NonPositiveDay { employee_id, .. }
            | Anomaly::UnpairedBreakStart { employee_id, .. }
            | Anomaly::UnpairedBreakEnd { employee_id, .. }
            | Anomaly::BreaksWithoutShift { employee_id, .. }
            | Anomaly::OutOfRangeDate { employee_id, .. } => employee_id,
        }
    }
}

impl std::fmt::Display for Anomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Anomaly::MissingCheckOut { employee_id, date } => {
                write!(f, "employee {}: check-in without check-out on {}", employee_id, date)
            }
            Anomaly::MissingCheckIn { employee_id, date } => {
                write!(f, "employee {}: check-out without check-in on {}", employee_id, date)
            }
            Anomaly::NonPositiveDay {
                employee_id,
                date,
                worked_seconds,
            } => write!(
                f,
                "employee {}: {} worked {:.2}h, discarded",
                employee_id,
                date,
                seconds_to_hours(*worked_seconds)
            ),
            Anomaly::UnpairedBreakStart { employee_id, at } => {
                write!(f, "employee {}: break start at {} never ended", employee_id, at)
            }
            Anomaly::UnpairedBreakEnd { employee_id, at } => {
                write!(f, "employee {}: break end at {} without start", employee_id, at)
            }
            Anomaly::BreaksWithoutShift {
                employee_id,
                date,
                break_seconds,
            } => write!(
                f,
                "employee {}: {:.2}h of breaks on {} without check-in or check-out",
                employee_id,
                seconds_to_hours(*break_seconds),
                date
            ),
            Anomaly::OutOfRangeDate { employee_id, date } => {
                write!(f, "employee {}: shift on {} is out of range, discarded", employee_id, date)
            }
        }
    }
}

/// A time entry that could not be normalized into a punch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedEntry {
    pub entry_id: Option<RecordId>,
    pub reason: String,
}

impl std::fmt::Display for SkippedEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.entry_id {
            Some(id) => write!(f, "entry {}: {}", id, self.reason),
            None => write!(f, "entry without id: {}", self.reason),
        }
    }
}

/// Result of aggregating a punch list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeSummary {
    /// Ordered by employee id
    pub employees: Vec<EmployeeSummary>,
    pub anomalies: Vec<Anomaly>,
    pub skipped: Vec<SkippedEntry>,
}

/// Totals across every employee in a summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SummaryTotals {
    pub employees: usize,
    pub regular_hours: f64,
    pub overtime_hours: f64,
    pub total_hours: f64,
}

impl TimeSummary {
    pub fn employee(&self, id: &RecordId) -> Option<&EmployeeSummary> {
        self.employees.iter().find(|e| &e.employee_id == id)
    }

    pub fn totals(&self) -> SummaryTotals {
        self.employees
            .iter()
            .fold(SummaryTotals::default(), |mut acc, e| {
                acc.employees += 1;
                acc.regular_hours += e.regular_hours;
                acc.overtime_hours += e.overtime_hours;
                acc.total_hours += e.total_hours;
                acc
            })
    }

    /// Whether any input was dropped or left unmatched
    pub fn has_issues(&self) -> bool {
        !self.anomalies.is_empty() || !self.skipped.is_empty()
    }
}
