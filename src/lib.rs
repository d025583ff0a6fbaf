//! # Payroll Console
//!
//! Client-side core of a payroll and workforce-management admin console:
//! typed access to the payroll REST API, form validation, and time-clock
//! summaries with weekly overtime.
//!
//! ## Features
//!
//! - **REST client**: list/get/create/update/delete for every payroll
//!   resource, multipart employee registration and punches
//! - **Validation**: records are checked before they leave the process
//! - **Time summaries**: punches become regular and overtime hours, with
//!   unmatched data reported rather than dropped
//! - **Offline summaries**: time-clock CSV exports as a punch source
//!
//! ## Modules
//!
//! - [`client`]: REST client and response unwrapping
//! - [`models`]: record types
//! - [`summary`]: punch normalization and hour aggregation
//! - [`validation`]: client-side form checks
//! - [`export`]: table, CSV and JSON rendering
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use payroll_console::client::{ClientConfig, PayrollClient};
//! use payroll_console::summary::{summarize_period, PeriodFilter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PayrollClient::new(ClientConfig::default())?;
//!
//!     let filter = PeriodFilter::new()
//!         .since(chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
//!         .until(chrono::NaiveDate::from_ymd_opt(2024, 1, 7).unwrap());
//!     let entries = client.time_entries(&filter).await?;
//!
//!     let summary = summarize_period(&entries, &filter);
//!     for employee in &summary.employees {
//!         println!(
//!             "{}: {:.2} regular, {:.2} overtime",
//!             employee.employee_id, employee.regular_hours, employee.overtime_hours
//!         );
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod export;
pub mod format;
pub mod i18n;
pub mod logging;
pub mod models;
pub mod notify;
pub mod summary;
pub mod validation;

// Re-export top-level types for convenience
pub use client::{ClientConfig, ClientError, PayrollClient, Photo, PunchRequest};

pub use models::{
    Business, Deduction, DeductionKind, Employee, Incident, IncidentType, MealBenefitConfig,
    PayRate, RateType, RecordId, Resource, TimeEntry, TipCreditConfig,
};

pub use summary::{
    summarize, summarize_entries, summarize_period, Anomaly, CsvPunchSource, EmployeeSummary,
    PeriodFilter, Punch, PunchError, PunchKind, PunchSource, SkippedEntry, SourceError,
    TimeSummary, WEEKLY_REGULAR_HOURS,
};

pub use validation::{check_tip_credit, FieldError, Validate, ValidationErrors};

pub use config::{Config, ConfigError, LoggingConfig};

pub use export::{ExportError, OutputFormat, TableRow};

pub use i18n::Language;

pub use notify::{Notice, NoticeLevel, Notifier};
