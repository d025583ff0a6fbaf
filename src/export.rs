//! Output Rendering
//!
//! Renders records and time summaries as aligned text tables, CSV or JSON
//! for the console's stdout.

use serde::Serialize;
use std::io::Write;
use std::str::FromStr;
use thiserror::Error;

use crate::format;
use crate::models::{
    Business, Deduction, Employee, Incident, MealBenefitConfig, PayRate, RecordId,
    TimeEntry, TipCreditConfig,
};
use crate::summary::{PunchKind, TimeSummary};

/// Output format for command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(ExportError::UnknownFormat(s.trim().to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unknown output format '{0}' (table, json, csv)")]
    UnknownFormat(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Records that render as one table row
pub trait TableRow {
    fn headers() -> &'static [&'static str];
    fn cells(&self, currency: &str) -> Vec<String>;
}

fn id_cell(id: Option<&RecordId>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string())
}

fn money_cell(value: Option<f64>, currency: &str) -> String {
    value
        .map(|v| format::money(v, currency))
        .unwrap_or_else(|| "-".to_string())
}

fn flag_cell(value: Option<bool>) -> String {
    match value {
        Some(true) => "yes".to_string(),
        Some(false) => "no".to_string(),
        None => "-".to_string(),
    }
}

impl TableRow for Business {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "EIN", "Timezone", "Min wage", "Active"]
    }

    fn cells(&self, currency: &str) -> Vec<String> {
        vec![
            id_cell(self.id.as_ref()),
            format::text(self.name.as_deref()),
            format::text(self.ein.as_deref()),
            format::text(self.timezone.as_deref()),
            money_cell(self.minimum_wage, currency),
            flag_cell(self.active),
        ]
    }
}

impl TableRow for Employee {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "Position", "Email", "Hired", "Rate", "Active"]
    }

    fn cells(&self, currency: &str) -> Vec<String> {
        vec![
            id_cell(self.id.as_ref()),
            self.display_name(),
            format::text(self.position.as_deref()),
            format::text(self.email.as_deref()),
            format::date(self.hire_date),
            money_cell(self.hourly_rate, currency),
            flag_cell(self.active),
        ]
    }
}

impl TableRow for PayRate {
    fn headers() -> &'static [&'static str] {
        &["ID", "Employee", "Rate", "Type", "Effective", "Description"]
    }

    fn cells(&self, currency: &str) -> Vec<String> {
        vec![
            id_cell(self.id.as_ref()),
            id_cell(self.employee_id.as_ref()),
            money_cell(self.rate, currency),
            self.rate_type
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".to_string()),
            format::date(self.effective_date),
            format::text(self.description.as_deref()),
        ]
    }
}

impl TableRow for Deduction {
    fn headers() -> &'static [&'static str] {
        &["ID", "Employee", "Name", "Kind", "Amount", "Active"]
    }

    fn cells(&self, currency: &str) -> Vec<String> {
        let amount = match (self.amount, self.is_percentage) {
            (Some(v), Some(true)) => format::percent(v),
            (v, _) => money_cell(v, currency),
        };
        vec![
            id_cell(self.id.as_ref()),
            self.employee_id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_else(|| "all".to_string()),
            format::text(self.name.as_deref()),
            self.kind
                .map(|k| k.to_string())
                .unwrap_or_else(|| "-".to_string()),
            amount,
            flag_cell(self.active),
        ]
    }
}

impl TableRow for Incident {
    fn headers() -> &'static [&'static str] {
        &["ID", "Employee", "Type", "Amount", "Date", "Description"]
    }

    fn cells(&self, currency: &str) -> Vec<String> {
        vec![
            id_cell(self.id.as_ref()),
            id_cell(self.employee_id.as_ref()),
            self.incident_type
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".to_string()),
            money_cell(self.amount, currency),
            format::date(self.date),
            format::text(self.description.as_deref()),
        ]
    }
}

impl TableRow for MealBenefitConfig {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "Credit", "Min hours", "Taxable", "Active"]
    }

    fn cells(&self, currency: &str) -> Vec<String> {
        vec![
            id_cell(self.id.as_ref()),
            format::text(self.name.as_deref()),
            money_cell(self.credit_amount, currency),
            self.min_hours
                .map(format::hours)
                .unwrap_or_else(|| "-".to_string()),
            flag_cell(self.taxable),
            flag_cell(self.active),
        ]
    }
}

impl TableRow for TipCreditConfig {
    fn headers() -> &'static [&'static str] {
        &["ID", "State", "Min wage", "Cash wage", "Tip credit", "Effective"]
    }

    fn cells(&self, currency: &str) -> Vec<String> {
        vec![
            id_cell(self.id.as_ref()),
            format::text(self.state.as_deref()),
            money_cell(self.minimum_wage, currency),
            money_cell(self.cash_wage, currency),
            money_cell(self.tip_credit, currency),
            format::date(self.effective_date),
        ]
    }
}

impl TableRow for TimeEntry {
    fn headers() -> &'static [&'static str] {
        &["ID", "Employee", "Type", "Timestamp", "Notes"]
    }

    fn cells(&self, _currency: &str) -> Vec<String> {
        vec![
            id_cell(self.id.as_ref()),
            id_cell(self.employee_id.as_ref()),
            format::text(self.punch_type.as_deref()),
            format::text(self.raw_timestamp()),
            format::text(self.notes.as_deref()),
        ]
    }
}

/// Render rows as an aligned text table
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<width$}", cell, width = w))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&line(headers.to_vec()));
    out.push('\n');
    out.push_str(&"-".repeat(widths.iter().sum::<usize>() + 3 * widths.len().saturating_sub(1)));
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}

/// Render records as a table
pub fn records_table<R: TableRow>(records: &[R], currency: &str) -> String {
    let rows: Vec<Vec<String>> = records.iter().map(|r| r.cells(currency)).collect();
    render_table(R::headers(), &rows)
}

/// Write records as CSV using the table columns
pub fn write_records_csv<R: TableRow, W: Write>(
    records: &[R],
    currency: &str,
    writer: W,
) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(R::headers())?;
    for record in records {
        csv.write_record(record.cells(currency))?;
    }
    csv.flush()?;
    Ok(())
}

/// Pretty JSON for any serializable value
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(value)?)
}

const SUMMARY_HEADERS: &[&str] = &[
    "employee_id",
    "regular_hours",
    "overtime_hours",
    "total_hours",
    "check_ins",
    "check_outs",
    "break_starts",
    "break_ends",
];

fn summary_rows(summary: &TimeSummary) -> Vec<Vec<String>> {
    summary
        .employees
        .iter()
        .map(|e| {
            let mut row = vec![
                e.employee_id.to_string(),
                format::hours(e.regular_hours),
                format::hours(e.overtime_hours),
                format::hours(e.total_hours),
            ];
            row.extend(PunchKind::all().iter().map(|k| e.punches.get(*k).to_string()));
            row
        })
        .collect()
}

/// Write per-employee totals as CSV, one row per employee
pub fn write_summary_csv<W: Write>(summary: &TimeSummary, writer: W) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(SUMMARY_HEADERS)?;
    for row in summary_rows(summary) {
        csv.write_record(&row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Render per-employee totals, followed by anomalies and skipped entries
pub fn summary_table(summary: &TimeSummary) -> String {
    if summary.employees.is_empty() && !summary.has_issues() {
        return "No time entries for the selected period\n".to_string();
    }

    let headers = [
        "Employee", "Regular", "Overtime", "Total", "In", "Out", "Brk+", "Brk-",
    ];
    let mut out = render_table(&headers, &summary_rows(summary));

    let totals = summary.totals();
    out.push_str(&format!(
        "\n{} employees: {} regular, {} overtime, {} total hours\n",
        totals.employees,
        format::hours(totals.regular_hours),
        format::hours(totals.overtime_hours),
        format::hours(totals.total_hours)
    ));

    if !summary.anomalies.is_empty() {
        out.push_str(&format!("\nUnmatched ({}):\n", summary.anomalies.len()));
        for anomaly in &summary.anomalies {
            out.push_str(&format!("  {}\n", anomaly));
        }
    }

    if !summary.skipped.is_empty() {
        out.push_str(&format!("\nSkipped entries ({}):\n", summary.skipped.len()));
        for skipped in &summary.skipped {
            out.push_str(&format!("  {}\n", skipped));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::summarize_entries;

    fn summary() -> TimeSummary {
        let entries: Vec<TimeEntry> = serde_json::from_str(
            r#"[
                {"id": 1, "employee_id": 2, "punch_type": "check_in", "timestamp": "2024-01-01T09:00:00Z"},
                {"id": 2, "employee_id": 2, "punch_type": "check_out", "timestamp": "2024-01-01T17:30:00Z"},
                {"id": 3, "employee_id": 5, "punch_type": "check_in", "timestamp": "2024-01-01T09:00:00Z"},
                {"id": 4, "punch_type": "check_out", "timestamp": "2024-01-01T10:00:00Z"}
            ]"#,
        )
        .unwrap();
        summarize_entries(&entries)
    }

    #[test]
    fn test_output_format() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!(matches!(
            "xml".parse::<OutputFormat>(),
            Err(ExportError::UnknownFormat(f)) if f == "xml"
        ));
    }

    #[test]
    fn test_render_table_alignment() {
        let table = render_table(
            &["ID", "Name"],
            &[
                vec!["1".to_string(), "Ana Ruiz".to_string()],
                vec!["10".to_string(), "Bo".to_string()],
            ],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "ID | Name");
        assert_eq!(lines[1], "-------------");
        assert_eq!(lines[2], "1  | Ana Ruiz");
        assert_eq!(lines[3], "10 | Bo");
    }

    #[test]
    fn test_summary_csv() {
        let mut out = Vec::new();
        write_summary_csv(&summary(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], SUMMARY_HEADERS.join(","));
        assert_eq!(lines[1], "2,8.50,0.00,8.50,1,1,0,0");
        assert_eq!(lines[2], "5,0.00,0.00,0.00,1,0,0,0");
    }

    #[test]
    fn test_summary_table_lists_issues() {
        let table = summary_table(&summary());
        assert!(table.contains("2 employees: 8.50 regular, 0.00 overtime, 8.50 total hours"));
        assert!(table.contains("Unmatched (1):"));
        assert!(table.contains("check-in without check-out on 2024-01-01"));
        assert!(table.contains("Skipped entries (1):"));
        assert!(table.contains("entry 4: missing employee id"));
    }

    #[test]
    fn test_empty_summary() {
        assert_eq!(
            summary_table(&TimeSummary::default()),
            "No time entries for the selected period\n"
        );
    }

    #[test]
    fn test_records_csv() {
        let deduction = Deduction {
            id: Some(RecordId::from(1)),
            name: Some("Uniform".to_string()),
            amount: Some(12.5),
            is_percentage: Some(false),
            ..Default::default()
        };

        let mut out = Vec::new();
        write_records_csv(&[deduction], "$", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text.lines().nth(1),
            Some("1,all,Uniform,-,$12.50,-")
        );
    }
}
