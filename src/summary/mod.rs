//! Time Summaries
//!
//! Aggregates time-clock punches into per-employee regular and overtime
//! hours for display.
//!
//! ## Data Flow
//!
//! 1. A [`PunchSource`] yields raw [`TimeEntry`](crate::models::TimeEntry) records
//!    (from the API or from a CSV export)
//! 2. Entries are normalized into [`Punch`]es; failures become
//!    [`SkippedEntry`] values
//! 3. [`summarize`] computes daily, weekly and total hours, reporting
//!    unmatched punches as [`Anomaly`] values

mod aggregator;
mod punch;
mod report;
mod source;

pub use aggregator::{normalize_entries, summarize, summarize_entries, week_start};
pub use punch::{parse_timestamp, Punch, PunchError, PunchKind};
pub use report::{
    Anomaly, DaySummary, EmployeeSummary, PunchCounts, SkippedEntry, SummaryTotals, TimeSummary,
    WeekSummary, WEEKLY_REGULAR_HOURS,
};
pub use source::{CsvPunchSource, PunchSource, SourceError};

use chrono::NaiveDate;

use crate::models::{RecordId, TimeEntry};

/// Restricts which entries go into a summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodFilter {
    /// First calendar date included
    pub from: Option<NaiveDate>,
    /// Last calendar date included
    pub to: Option<NaiveDate>,
    pub employee_id: Option<RecordId>,
}

impl PeriodFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the first included date
    pub fn since(mut self, date: NaiveDate) -> Self {
        self.from = Some(date);
        self
    }

    /// Builder method: set the last included date
    pub fn until(mut self, date: NaiveDate) -> Self {
        self.to = Some(date);
        self
    }

    /// Builder method: restrict to one employee
    pub fn employee(mut self, id: RecordId) -> Self {
        self.employee_id = Some(id);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none() && self.employee_id.is_none()
    }

    /// Check whether a normalized punch falls inside the filter
    pub fn matches(&self, punch: &Punch) -> bool {
        let date = punch.date();
        self.from.map_or(true, |from| date >= from)
            && self.to.map_or(true, |to| date <= to)
            && self
                .employee_id
                .as_ref()
                .map_or(true, |id| &punch.employee_id == id)
    }
}

/// Normalize, filter and aggregate raw entries.
///
/// Entries that fail normalization are always reported as skipped, even
/// when a filter is set, since their date and employee are unknown.
pub fn summarize_period(entries: &[TimeEntry], filter: &PeriodFilter) -> TimeSummary {
    let (punches, skipped) = normalize_entries(entries);
    let punches: Vec<Punch> = punches.into_iter().filter(|p| filter.matches(p)).collect();

    let mut summary = summarize(&punches);
    summary.skipped = skipped;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, employee: i64, kind: &str, ts: &str) -> TimeEntry {
        TimeEntry {
            id: Some(RecordId::from(id)),
            employee_id: Some(RecordId::from(employee)),
            punch_type: Some(kind.to_string()),
            timestamp: Some(ts.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_day_with_lunch_break() {
        let entries = vec![
            entry(1, 10, "check_in", "2024-01-01T09:00:00"),
            entry(2, 10, "break_start", "2024-01-01T12:00:00"),
            entry(3, 10, "break_end", "2024-01-01T12:30:00"),
            entry(4, 10, "check_out", "2024-01-01T17:00:00"),
        ];

        let summary = summarize_entries(&entries);
        let employee = &summary.employees[0];
        assert_eq!(employee.total_hours, 7.5);
        assert_eq!(employee.regular_hours, 7.5);
        assert_eq!(employee.overtime_hours, 0.0);
        assert!(!summary.has_issues());
    }

    #[test]
    fn test_period_filter() {
        let entries = vec![
            entry(1, 10, "check_in", "2024-01-01T09:00:00Z"),
            entry(2, 10, "check_out", "2024-01-01T17:00:00Z"),
            entry(3, 10, "check_in", "2024-01-02T09:00:00Z"),
            entry(4, 10, "check_out", "2024-01-02T13:00:00Z"),
            entry(5, 11, "check_in", "2024-01-02T09:00:00Z"),
            entry(6, 11, "check_out", "2024-01-02T10:00:00Z"),
        ];

        let day_two = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let filter = PeriodFilter::new().since(day_two).until(day_two);
        let summary = summarize_period(&entries, &filter);
        assert_eq!(summary.employees.len(), 2);
        assert_eq!(summary.employees[0].total_hours, 4.0);

        let filter = PeriodFilter::new().employee(RecordId::from(11));
        let summary = summarize_period(&entries, &filter);
        assert_eq!(summary.employees.len(), 1);
        assert_eq!(summary.employees[0].total_hours, 1.0);
    }
}
