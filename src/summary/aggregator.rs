//! Time-Summary Aggregator
//!
//! Turns an unordered punch list into per-employee regular and overtime
//! hours:
//!
//! 1. Group punches by employee, then by calendar date.
//! 2. On each date with both a check-in and a check-out, the shift runs
//!    from the earliest check-in to the latest check-out.
//! 3. Each break start is paired with the next break end after it; the
//!    paired durations are subtracted from the shift.
//! 4. Shifts of zero or negative length are reported, not counted.
//! 5. Days are bucketed into Monday-start weeks; the first
//!    [`WEEKLY_REGULAR_HOURS`](super::WEEKLY_REGULAR_HOURS) of each week are
//!    regular, the rest overtime.
//!
//! The computation is a pure function of its input. Everything it cannot
//! use ends up in [`TimeSummary::anomalies`] or [`TimeSummary::skipped`].

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate};
use std::collections::BTreeMap;

use super::punch::{Punch, PunchKind};
use super::report::{
    seconds_to_hours, Anomaly, DaySummary, EmployeeSummary, PunchCounts, SkippedEntry,
    TimeSummary, WeekSummary, WEEKLY_REGULAR_SECONDS,
};
use crate::models::{RecordId, TimeEntry};

type Instant = DateTime<FixedOffset>;

/// Punches of one employee on one calendar date
#[derive(Default)]
struct DayPunches {
    check_ins: Vec<Instant>,
    check_outs: Vec<Instant>,
    break_starts: Vec<Instant>,
    break_ends: Vec<Instant>,
}

/// Aggregate normalized punches into a [`TimeSummary`]
pub fn summarize(punches: &[Punch]) -> TimeSummary {
    let mut by_employee: BTreeMap<&RecordId, Vec<&Punch>> = BTreeMap::new();
    for punch in punches {
        by_employee.entry(&punch.employee_id).or_default().push(punch);
    }

    let mut summary = TimeSummary::default();
    for (employee_id, punches) in by_employee {
        let employee = summarize_employee(employee_id, &punches, &mut summary.anomalies);
        summary.employees.push(employee);
    }

    tracing::debug!(
        employees = summary.employees.len(),
        anomalies = summary.anomalies.len(),
        "Summarized {} punches",
        punches.len()
    );

    summary
}

/// Normalize raw time entries, then aggregate them.
///
/// Entries that cannot be normalized are listed in
/// [`TimeSummary::skipped`] instead of being dropped.
pub fn summarize_entries(entries: &[TimeEntry]) -> TimeSummary {
    let (punches, skipped) = normalize_entries(entries);
    let mut summary = summarize(&punches);
    summary.skipped = skipped;
    summary
}

/// Split raw entries into usable punches and skipped entries
pub fn normalize_entries(entries: &[TimeEntry]) -> (Vec<Punch>, Vec<SkippedEntry>) {
    let mut punches = Vec::with_capacity(entries.len());
    let mut skipped = Vec::new();

    for entry in entries {
        match entry.to_punch() {
            Ok(punch) => punches.push(punch),
            Err(e) => {
                tracing::warn!(entry_id = ?entry.id, "Skipping time entry: {}", e);
                skipped.push(SkippedEntry {
                    entry_id: entry.id.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    (punches, skipped)
}

fn summarize_employee(
    employee_id: &RecordId,
    punches: &[&Punch],
    anomalies: &mut Vec<Anomaly>,
) -> EmployeeSummary {
    let mut counts = PunchCounts::default();
    let mut by_date: BTreeMap<NaiveDate, DayPunches> = BTreeMap::new();

    for punch in punches {
        counts.record(punch.kind);
        let day = by_date.entry(punch.date()).or_default();
        match punch.kind {
            PunchKind::CheckIn => day.check_ins.push(punch.at),
            PunchKind::CheckOut => day.check_outs.push(punch.at),
            PunchKind::BreakStart => day.break_starts.push(punch.at),
            PunchKind::BreakEnd => day.break_ends.push(punch.at),
        }
    }

    let mut days = Vec::new();
    for (date, mut day) in by_date {
        let (break_total, paired_breaks) = pair_breaks(employee_id, &mut day, anomalies);

        let first_in = day.check_ins.iter().min().copied();
        let last_out = day.check_outs.iter().max().copied();

        match (first_in, last_out) {
            (Some(check_in), Some(check_out)) => {
                let worked = (check_out - check_in) - break_total;
                let worked_seconds = worked.num_seconds();
                if worked_seconds <= 0 {
                    anomalies.push(Anomaly::NonPositiveDay {
                        employee_id: employee_id.clone(),
                        date,
                        worked_seconds,
                    });
                } else if week_start(date).is_none() {
                    anomalies.push(Anomaly::OutOfRangeDate {
                        employee_id: employee_id.clone(),
                        date,
                    });
                } else {
                    days.push(DaySummary {
                        date,
                        check_in,
                        check_out,
                        break_seconds: break_total.num_seconds(),
                        worked_seconds,
                    });
                }
            }
            (Some(_), None) => anomalies.push(Anomaly::MissingCheckOut {
                employee_id: employee_id.clone(),
                date,
            }),
            (None, Some(_)) => anomalies.push(Anomaly::MissingCheckIn {
                employee_id: employee_id.clone(),
                date,
            }),
            (None, None) => {
                if paired_breaks > 0 {
                    anomalies.push(Anomaly::BreaksWithoutShift {
                        employee_id: employee_id.clone(),
                        date,
                        break_seconds: break_total.num_seconds(),
                    });
                }
            }
        }
    }

    let weeks = split_weeks(&days);
    let regular_seconds: i64 = weeks.iter().map(|w| w.regular_seconds).sum();
    let overtime_seconds: i64 = weeks.iter().map(|w| w.overtime_seconds).sum();

    EmployeeSummary {
        employee_id: employee_id.clone(),
        regular_hours: seconds_to_hours(regular_seconds),
        overtime_hours: seconds_to_hours(overtime_seconds),
        total_hours: seconds_to_hours(regular_seconds + overtime_seconds),
        punches: counts,
        days,
        weeks,
    }
}

/// Pair each break start with the next unused break end after it and
/// return the summed break time with the number of pairs. Leftovers on
/// either side are reported.
fn pair_breaks(
    employee_id: &RecordId,
    day: &mut DayPunches,
    anomalies: &mut Vec<Anomaly>,
) -> (Duration, usize) {
    day.break_starts.sort();
    day.break_ends.sort();

    let mut total = Duration::zero();
    let mut pairs = 0;
    let mut used = vec![false; day.break_ends.len()];
    let mut next_end = 0;

    for start in &day.break_starts {
        // Ends at or before this start can never pair with it or any later start
        while next_end < day.break_ends.len() && day.break_ends[next_end] <= *start {
            next_end += 1;
        }

        if next_end < day.break_ends.len() {
            total += day.break_ends[next_end] - *start;
            used[next_end] = true;
            next_end += 1;
            pairs += 1;
        } else {
            anomalies.push(Anomaly::UnpairedBreakStart {
                employee_id: employee_id.clone(),
                at: *start,
            });
        }
    }

    for (end, used) in day.break_ends.iter().zip(used) {
        if !used {
            anomalies.push(Anomaly::UnpairedBreakEnd {
                employee_id: employee_id.clone(),
                at: *end,
            });
        }
    }

    (total, pairs)
}

/// Monday of the ISO week containing `date`, if that Monday is still a
/// representable date
pub fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_signed(Duration::days(
        date.weekday().num_days_from_monday() as i64,
    ))
}

fn split_weeks(days: &[DaySummary]) -> Vec<WeekSummary> {
    let mut by_week: BTreeMap<NaiveDate, (usize, i64)> = BTreeMap::new();
    for day in days {
        let Some(start) = week_start(day.date) else {
            continue;
        };
        let entry = by_week.entry(start).or_default();
        entry.0 += 1;
        entry.1 += day.worked_seconds;
    }

    by_week
        .into_iter()
        .map(|(week_start, (days_worked, worked_seconds))| {
            let regular_seconds = worked_seconds.min(WEEKLY_REGULAR_SECONDS);
            WeekSummary {
                week_start,
                days_worked,
                worked_seconds,
                regular_seconds,
                overtime_seconds: worked_seconds - regular_seconds,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::parse_timestamp;
    use chrono::TimeZone;

    fn punch(employee: i64, kind: PunchKind, ts: &str) -> Punch {
        Punch::new(RecordId::from(employee), kind, parse_timestamp(ts).unwrap())
    }

    fn shift(employee: i64, date: &str, start: &str, end: &str) -> Vec<Punch> {
        vec![
            punch(employee, PunchKind::CheckIn, &format!("{}T{}:00Z", date, start)),
            punch(employee, PunchKind::CheckOut, &format!("{}T{}:00Z", date, end)),
        ]
    }

    #[test]
    fn test_single_shift_is_exact() {
        let summary = summarize(&shift(1, "2024-01-01", "09:00", "17:15"));
        let employee = &summary.employees[0];

        assert_eq!(employee.total_hours, 8.25);
        assert_eq!(employee.regular_hours, 8.25);
        assert_eq!(employee.overtime_hours, 0.0);
        assert_eq!(employee.days.len(), 1);
        assert!(summary.anomalies.is_empty());
    }

    #[test]
    fn test_break_reduces_by_exact_duration() {
        let mut punches = shift(1, "2024-01-01", "09:00", "17:00");
        punches.push(punch(1, PunchKind::BreakStart, "2024-01-01T12:00:00Z"));
        punches.push(punch(1, PunchKind::BreakEnd, "2024-01-01T12:30:00Z"));

        let summary = summarize(&punches);
        let employee = &summary.employees[0];

        assert_eq!(employee.total_hours, 7.5);
        assert_eq!(employee.regular_hours, 7.5);
        assert_eq!(employee.overtime_hours, 0.0);
        assert_eq!(employee.days[0].break_seconds, 1800);
        assert_eq!(employee.punches.total(), 4);
    }

    #[test]
    fn test_overtime_after_forty_hours() {
        // Monday 2024-01-01 through Friday, 9 hours a day
        let mut punches = Vec::new();
        for day in 1..=5 {
            punches.extend(shift(1, &format!("2024-01-0{}", day), "08:00", "17:00"));
        }

        let employee = &summarize(&punches).employees[0];
        assert_eq!(employee.total_hours, 45.0);
        assert_eq!(employee.regular_hours, 40.0);
        assert_eq!(employee.overtime_hours, 5.0);
        assert_eq!(employee.weeks.len(), 1);
    }

    #[test]
    fn test_weeks_are_monday_based() {
        // Sunday 2024-01-07 and Monday 2024-01-08 fall in different weeks
        let mut punches = Vec::new();
        for day in 2..=7 {
            punches.extend(shift(1, &format!("2024-01-0{}", day), "08:00", "16:00"));
        }
        punches.extend(shift(1, "2024-01-08", "08:00", "16:00"));

        let employee = &summarize(&punches).employees[0];
        assert_eq!(employee.weeks.len(), 2);
        assert_eq!(
            employee.weeks[0].week_start,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(employee.weeks[0].overtime_hours(), 8.0);
        assert_eq!(employee.weeks[1].regular_hours(), 8.0);
        assert_eq!(employee.overtime_hours, 8.0);
        assert_eq!(employee.regular_hours, 48.0);
    }

    #[test]
    fn test_missing_checkout_contributes_nothing() {
        let punches = vec![punch(1, PunchKind::CheckIn, "2024-01-01T09:00:00Z")];
        let summary = summarize(&punches);

        assert_eq!(summary.employees[0].total_hours, 0.0);
        assert_eq!(summary.employees[0].punches.check_in, 1);
        assert_eq!(
            summary.anomalies,
            vec![Anomaly::MissingCheckOut {
                employee_id: RecordId::from(1),
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            }]
        );
    }

    #[test]
    fn test_non_positive_day_is_reported() {
        let mut punches = shift(1, "2024-01-01", "09:00", "10:00");
        punches.push(punch(1, PunchKind::BreakStart, "2024-01-01T09:00:00Z"));
        punches.push(punch(1, PunchKind::BreakEnd, "2024-01-01T10:30:00Z"));

        let summary = summarize(&punches);
        assert_eq!(summary.employees[0].total_hours, 0.0);
        assert!(matches!(
            summary.anomalies[0],
            Anomaly::NonPositiveDay { worked_seconds: -1800, .. }
        ));
    }

    #[test]
    fn test_employees_never_mix() {
        let mut punches = shift(1, "2024-01-01", "09:00", "17:00");
        punches.extend(shift(2, "2024-01-01", "10:00", "12:00"));
        punches.push(punch(2, PunchKind::BreakStart, "2024-01-01T11:00:00Z"));
        punches.push(punch(1, PunchKind::BreakEnd, "2024-01-01T11:30:00Z"));

        let summary = summarize(&punches);
        assert_eq!(summary.employees.len(), 2);

        // Breaks from different employees must not pair up
        let one = summary.employee(&RecordId::from(1)).unwrap();
        let two = summary.employee(&RecordId::from(2)).unwrap();
        assert_eq!(one.total_hours, 8.0);
        assert_eq!(two.total_hours, 2.0);
        assert_eq!(summary.anomalies.len(), 2);
        assert_eq!(summary.totals().total_hours, 10.0);
    }

    fn text_punch(employee: &str, kind: PunchKind, ts: &str) -> Punch {
        Punch::new(RecordId::new(employee), kind, parse_timestamp(ts).unwrap())
    }

    #[test]
    fn test_lookalike_ids_stay_separate() {
        let shifts = [
            ("7", "09:00", "10:00"),
            ("07", "09:00", "11:00"),
            ("+7", "09:00", "12:00"),
            ("emp-1", "08:00", "12:00"),
            ("1", "08:00", "13:00"),
            ("01", "08:00", "14:00"),
        ];
        let mut punches = Vec::new();
        for (id, start, end) in shifts {
            for date in ["2024-01-01", "2024-01-02"] {
                punches.push(text_punch(id, PunchKind::CheckIn, &format!("{}T{}:00Z", date, start)));
                punches.push(text_punch(id, PunchKind::CheckOut, &format!("{}T{}:00Z", date, end)));
            }
        }

        let summary = summarize(&punches);
        assert_eq!(summary.employees.len(), 6);
        assert!(summary.anomalies.is_empty());

        for (id, expected) in [
            ("7", 2.0),
            ("07", 4.0),
            ("+7", 6.0),
            ("emp-1", 8.0),
            ("1", 10.0),
            ("01", 12.0),
        ] {
            let employee = summary.employee(&RecordId::new(id)).unwrap();
            assert_eq!(employee.total_hours, expected, "employee {}", id);
            assert_eq!(employee.punches.total(), 4, "employee {}", id);
        }
    }

    #[test]
    fn test_breaks_without_shift_are_reported() {
        let punches = vec![
            punch(1, PunchKind::BreakStart, "2024-01-01T12:00:00Z"),
            punch(1, PunchKind::BreakEnd, "2024-01-01T12:30:00Z"),
        ];

        let summary = summarize(&punches);
        assert_eq!(summary.employees[0].total_hours, 0.0);
        assert!(summary.has_issues());
        assert_eq!(
            summary.anomalies,
            vec![Anomaly::BreaksWithoutShift {
                employee_id: RecordId::from(1),
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                break_seconds: 1800,
            }]
        );
    }

    #[test]
    fn test_week_start_near_calendar_limit() {
        assert_eq!(
            week_start(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );

        for date in NaiveDate::MIN.iter_days().take(7) {
            if let Some(monday) = week_start(date) {
                assert_eq!(monday.weekday(), chrono::Weekday::Mon);
                assert!(monday <= date);
            }
        }

        // A shift whose Monday would fall before the first representable date
        if let Some(date) = NaiveDate::MIN
            .iter_days()
            .take(7)
            .find(|d| week_start(*d).is_none())
        {
            let at = |h: u32| {
                chrono::Utc
                    .from_utc_datetime(&date.and_hms_opt(h, 0, 0).unwrap())
                    .fixed_offset()
            };
            let punches = vec![
                Punch::new(RecordId::from(1), PunchKind::CheckIn, at(9)),
                Punch::new(RecordId::from(1), PunchKind::CheckOut, at(17)),
            ];

            let summary = summarize(&punches);
            assert_eq!(summary.employees[0].total_hours, 0.0);
            assert_eq!(
                summary.anomalies,
                vec![Anomaly::OutOfRangeDate {
                    employee_id: RecordId::from(1),
                    date,
                }]
            );
        }
    }

    #[test]
    fn test_break_pairing_uses_next_end() {
        let mut punches = shift(1, "2024-01-01", "08:00", "18:00");
        for (kind, time) in [
            (PunchKind::BreakEnd, "07:00"),
            (PunchKind::BreakStart, "10:00"),
            (PunchKind::BreakEnd, "10:15"),
            (PunchKind::BreakStart, "13:00"),
            (PunchKind::BreakEnd, "13:45"),
            (PunchKind::BreakStart, "17:30"),
        ] {
            punches.push(punch(1, kind, &format!("2024-01-01T{}:00Z", time)));
        }

        let summary = summarize(&punches);
        let day = &summary.employees[0].days[0];
        assert_eq!(day.break_seconds, 60 * 60);
        assert_eq!(day.worked_hours(), 9.0);

        let kinds: Vec<_> = summary
            .anomalies
            .iter()
            .map(|a| matches!(a, Anomaly::UnpairedBreakStart { .. }))
            .collect();
        assert_eq!(kinds, vec![true, false]);
    }

    #[test]
    fn test_earliest_in_latest_out() {
        let mut punches = shift(1, "2024-01-01", "09:00", "12:00");
        punches.extend(shift(1, "2024-01-01", "13:00", "17:00"));

        let employee = &summarize(&punches).employees[0];
        assert_eq!(employee.total_hours, 8.0);
        assert_eq!(employee.punches.check_in, 2);
    }

    #[test]
    fn test_deterministic_regardless_of_order() {
        let mut punches = shift(2, "2024-01-01", "09:00", "17:00");
        punches.extend(shift(1, "2024-01-02", "09:00", "11:00"));
        punches.push(punch(1, PunchKind::CheckIn, "2024-01-03T09:00:00Z"));

        let forward = summarize(&punches);
        punches.reverse();
        let backward = summarize(&punches);

        assert_eq!(forward, backward);
        assert_eq!(forward.employees[0].employee_id, RecordId::from(1));
    }

    #[test]
    fn test_summarize_entries_reports_skipped() {
        let entries: Vec<TimeEntry> = serde_json::from_str(
            r#"[
                {"id": 1, "employee_id": 7, "punch_type": "check_in", "timestamp": "2024-01-01T09:00:00Z"},
                {"id": 2, "employee_id": 7, "punch_type": "check_out", "created_at": "2024-01-01T17:00:00Z"},
                {"id": 3, "employee_id": 7, "punch_type": "check_out"},
                {"id": 4, "employee_id": 7, "punch_type": "check_in", "timestamp": "not a time"},
                {"id": 5, "employee_id": 7, "punch_type": "check_in", "timestamp": -9223372036854775808}
            ]"#,
        )
        .unwrap();

        let summary = summarize_entries(&entries);
        assert_eq!(summary.employees[0].total_hours, 8.0);
        assert_eq!(summary.skipped.len(), 3);
        assert_eq!(summary.skipped[2].entry_id, Some(RecordId::from(5)));
        assert_eq!(summary.skipped[0].entry_id, Some(RecordId::from(3)));
        assert!(summary.has_issues());
    }
}
