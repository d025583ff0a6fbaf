//! Payroll Console CLI
//!
//! Command-line front end for the payroll API:
//! - Manage businesses, employees and wage configuration
//! - Register employees and record punches with photos
//! - Summarize worked hours from the API or a CSV export
//! - Check tip-credit configurations before saving them

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use payroll_console::client::{ClientConfig, ClientError, PayrollClient, Photo, PunchRequest};
use payroll_console::config::{generate_default_config, Config};
use payroll_console::export::{self, OutputFormat, TableRow};
use payroll_console::format;
use payroll_console::i18n::{Language, Message};
use payroll_console::models::{
    Business, Deduction, Employee, Incident, MealBenefitConfig, PayRate, RecordId, Resource,
    TimeEntry, TipCreditConfig,
};
use payroll_console::notify::{Notice, Notifier, StderrNotifier};
use payroll_console::summary::{
    summarize_period, CsvPunchSource, PeriodFilter, PunchKind, PunchSource, SourceError,
};
use payroll_console::validation::{check_tip_credit, ValidationErrors};

#[derive(Parser)]
#[command(name = "payroll-console")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Admin console for the payroll API")]
#[command(long_about = "Payroll Console manages payroll records through the payroll REST API.\nIt records punches and summarizes worked hours into regular and overtime.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API base URL, overrides the config file
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Business (tenant) to scope requests to
    #[arg(long, global = true)]
    pub business_id: Option<String>,

    /// Output format (table, json, csv)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Message language (en, es)
    #[arg(long, value_parser = parse_language, global = true)]
    pub lang: Option<Language>,
}

/// REST resources the console manages
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ResourceKind {
    Businesses,
    Employees,
    PayRates,
    Deductions,
    Incidents,
    MealBenefits,
    TipCredits,
    TimeEntries,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List records of a resource
    List {
        resource: ResourceKind,
    },

    /// Show one record
    Show {
        resource: ResourceKind,
        id: String,
    },

    /// Delete one record
    Delete {
        resource: ResourceKind,
        id: String,
    },

    /// Create a record from a JSON file
    Create {
        resource: ResourceKind,
        /// JSON file holding the record
        #[arg(long)]
        file: PathBuf,
    },

    /// Update a record from a JSON file
    Update {
        resource: ResourceKind,
        id: String,
        /// JSON file holding the new field values
        #[arg(long)]
        file: PathBuf,
    },

    /// Register an employee, optionally with a photo
    RegisterEmployee {
        /// JSON file holding the employee
        #[arg(long)]
        file: PathBuf,
        /// Photo to attach (jpg, png, webp)
        #[arg(long)]
        photo: Option<PathBuf>,
    },

    /// Record a time-clock punch
    Punch {
        employee_id: String,
        /// check-in, check-out, break-start or break-end
        kind: PunchKind,
        /// Photo taken at the time clock
        #[arg(long)]
        photo: Option<PathBuf>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Summarize worked hours into regular and overtime
    Summary {
        /// First date included (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        from: Option<NaiveDate>,
        /// Last date included (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        to: Option<NaiveDate>,
        /// Only this employee
        #[arg(long)]
        employee: Option<String>,
        /// Read punches from a CSV export instead of the API
        #[arg(long)]
        csv_input: Option<PathBuf>,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that cash wage + tip credit equals the minimum wage
    CheckTipCredit {
        #[arg(long)]
        minimum_wage: f64,
        #[arg(long)]
        cash_wage: f64,
        #[arg(long)]
        tip_credit: f64,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn parse_language(s: &str) -> Result<Language, String> {
    Language::from_code(s).ok_or_else(|| format!("unsupported language '{}' (en, es)", s))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}': {} (expected YYYY-MM-DD)", s, e))
}

/// Run a generic body with `$R` bound to the record type of a resource
macro_rules! with_resource {
    ($kind:expr, $R:ident => $body:expr) => {
        match $kind {
            ResourceKind::Businesses => {
                type $R = Business;
                $body
            }
            ResourceKind::Employees => {
                type $R = Employee;
                $body
            }
            ResourceKind::PayRates => {
                type $R = PayRate;
                $body
            }
            ResourceKind::Deductions => {
                type $R = Deduction;
                $body
            }
            ResourceKind::Incidents => {
                type $R = Incident;
                $body
            }
            ResourceKind::MealBenefits => {
                type $R = MealBenefitConfig;
                $body
            }
            ResourceKind::TipCredits => {
                type $R = TipCreditConfig;
                $body
            }
            ResourceKind::TimeEntries => {
                type $R = TimeEntry;
                $body
            }
        }
    };
}

/// Everything a command needs: the client, output settings and notices
struct Console {
    client: PayrollClient,
    format: OutputFormat,
    language: Language,
    currency: String,
    notifier: StderrNotifier,
}

impl Console {
    fn new(config: &Config, format: OutputFormat) -> anyhow::Result<Self> {
        let client = PayrollClient::new(ClientConfig::from(&config.api))
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            format,
            language: config.ui.language,
            currency: config.ui.currency_symbol.clone(),
            notifier: StderrNotifier,
        })
    }

    fn success(&mut self, message: Message<'_>) {
        let text = self.language.text(&message);
        self.notifier.notify(Notice::success(text));
    }

    fn print_records<R: Resource + TableRow>(&self, records: &[R]) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Table => print!("{}", export::records_table(records, &self.currency)),
            OutputFormat::Json => println!("{}", export::to_json(records)?),
            OutputFormat::Csv => {
                export::write_records_csv(records, &self.currency, std::io::stdout().lock())?
            }
        }
        Ok(())
    }

    async fn list<R: Resource + TableRow>(&mut self) -> anyhow::Result<()> {
        let records = self.client.list::<R>().await?;
        if records.is_empty() && self.format == OutputFormat::Table {
            self.notifier
                .notify(Notice::info(format!("No {} found", R::PATH.replace('-', " "))));
            return Ok(());
        }
        self.print_records(&records)
    }

    async fn show<R: Resource + TableRow>(&mut self, id: &RecordId) -> anyhow::Result<()> {
        let record = self.client.get::<R>(id).await?;
        self.print_records(std::slice::from_ref(&record))
    }

    async fn delete<R: Resource>(&mut self, id: &RecordId) -> anyhow::Result<()> {
        self.client.delete::<R>(id).await?;
        self.success(Message::Deleted(R::LABEL));
        Ok(())
    }

    async fn create<R: Resource + TableRow + Clone>(&mut self, file: &Path) -> anyhow::Result<()> {
        let record: R = read_record(file)?;
        let created = self.client.create(&record).await?;
        self.success(Message::Created(R::LABEL));
        self.print_records(std::slice::from_ref(&created))
    }

    async fn update<R: Resource + TableRow + Clone>(
        &mut self,
        id: &RecordId,
        file: &Path,
    ) -> anyhow::Result<()> {
        let record: R = read_record(file)?;
        let updated = self.client.update(id, &record).await?;
        self.success(Message::Updated(R::LABEL));
        self.print_records(std::slice::from_ref(&updated))
    }

    async fn register_employee(&mut self, file: &Path, photo: Option<&Path>) -> anyhow::Result<()> {
        let employee: Employee = read_record(file)?;
        let photo = match photo {
            Some(path) => Some(Photo::from_path(path).await?),
            None => None,
        };

        let registered = self.client.register_employee(&employee, photo).await?;
        self.success(Message::EmployeeRegistered);
        self.print_records(std::slice::from_ref(&registered))
    }

    async fn punch(
        &mut self,
        employee_id: RecordId,
        kind: PunchKind,
        photo: Option<&Path>,
        notes: Option<String>,
    ) -> anyhow::Result<()> {
        let mut request = PunchRequest::new(employee_id, kind);
        if let Some(notes) = notes {
            request = request.notes(notes);
        }
        if let Some(path) = photo {
            request = request.photo(Photo::from_path(path).await?);
        }

        let entry = self.client.punch(request).await?;
        self.success(Message::PunchRecorded(kind));
        self.print_records(std::slice::from_ref(&entry))
    }

    async fn summary(
        &mut self,
        filter: PeriodFilter,
        csv_input: Option<&Path>,
        output: Option<&Path>,
    ) -> anyhow::Result<()> {
        let csv_source = csv_input.map(CsvPunchSource::new);
        let source: &dyn PunchSource = match &csv_source {
            Some(source) => source,
            None => &self.client,
        };

        tracing::info!(source = source.name(), ?filter, "Building time summary");
        let entries = source.fetch_entries(&filter).await?;
        let summary = summarize_period(&entries, &filter);

        let mut buf = Vec::new();
        match self.format {
            OutputFormat::Table => buf.extend_from_slice(export::summary_table(&summary).as_bytes()),
            OutputFormat::Json => {
                buf.extend_from_slice(export::to_json(&summary)?.as_bytes());
                buf.push(b'\n');
            }
            OutputFormat::Csv => export::write_summary_csv(&summary, &mut buf)?,
        }

        match output {
            Some(path) => {
                std::fs::write(path, &buf)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                self.notifier.notify(Notice::success(format!(
                    "Summary for {} employees written to {}",
                    summary.employees.len(),
                    path.display()
                )));
            }
            None => std::io::stdout().lock().write_all(&buf)?,
        }

        if summary.has_issues() {
            self.notifier.notify(Notice::warning(format!(
                "{} unmatched punches and {} skipped entries left out of the totals",
                summary.anomalies.len(),
                summary.skipped.len()
            )));
        }

        Ok(())
    }
}

/// Read a JSON record from disk
fn read_record<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(business_id) = &cli.business_id {
        config.api.business_id = Some(business_id.clone());
    }
    if let Some(language) = cli.lang {
        config.ui.language = language;
    }

    Ok(config)
}

/// Turn a command failure into the notice shown to the user
fn error_notice(err: &anyhow::Error, language: Language) -> Notice {
    if let Some(e) = err.downcast_ref::<ClientError>() {
        return Notice::from_client_error(e, language);
    }
    if let Some(SourceError::Client(e)) = err.downcast_ref::<SourceError>() {
        return Notice::from_client_error(e, language);
    }
    if let Some(e) = err.downcast_ref::<ValidationErrors>() {
        return Notice::from_client_error(&ClientError::Validation(e.clone()), language);
    }
    Notice::error(format!("{:#}", err))
}

async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    // Commands that never talk to the API
    match &cli.command {
        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(path, content)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    StderrNotifier.notify(Notice::success(format!(
                        "Config written to {}",
                        path.display()
                    )));
                }
                None => print!("{}", content),
            }
            return Ok(());
        }
        Commands::CheckTipCredit {
            minimum_wage,
            cash_wage,
            tip_credit,
        } => {
            check_tip_credit(Some(*minimum_wage), Some(*cash_wage), Some(*tip_credit))?;
            let symbol = &config.ui.currency_symbol;
            StderrNotifier.notify(Notice::success(format!(
                "{} + {} = {}",
                format::money(*cash_wage, symbol),
                format::money(*tip_credit, symbol),
                format::money(*minimum_wage, symbol)
            )));
            return Ok(());
        }
        _ => {}
    }

    let mut console = Console::new(&config, cli.format)?;

    match cli.command {
        Commands::List { resource } => with_resource!(resource, R => console.list::<R>().await),

        Commands::Show { resource, id } => {
            let id = RecordId::new(id);
            with_resource!(resource, R => console.show::<R>(&id).await)
        }

        Commands::Delete { resource, id } => {
            let id = RecordId::new(id);
            with_resource!(resource, R => console.delete::<R>(&id).await)
        }

        Commands::Create { resource, file } => {
            with_resource!(resource, R => console.create::<R>(&file).await)
        }

        Commands::Update { resource, id, file } => {
            let id = RecordId::new(id);
            with_resource!(resource, R => console.update::<R>(&id, &file).await)
        }

        Commands::RegisterEmployee { file, photo } => {
            console.register_employee(&file, photo.as_deref()).await
        }

        Commands::Punch {
            employee_id,
            kind,
            photo,
            notes,
        } => {
            console
                .punch(RecordId::new(employee_id), kind, photo.as_deref(), notes)
                .await
        }

        Commands::Summary {
            from,
            to,
            employee,
            csv_input,
            output,
        } => {
            let mut filter = PeriodFilter::new();
            if let Some(from) = from {
                filter = filter.since(from);
            }
            if let Some(to) = to {
                filter = filter.until(to);
            }
            if let Some(employee) = employee {
                filter = filter.employee(RecordId::new(employee));
            }
            console
                .summary(filter, csv_input.as_deref(), output.as_deref())
                .await
        }

        Commands::Config { .. } | Commands::CheckTipCredit { .. } => Ok(()),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            StderrNotifier.notify(error_notice(&err, cli.lang.unwrap_or_default()));
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = payroll_console::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    tracing::debug!(
        base_url = %config.api.base_url,
        business_id = ?config.api.business_id,
        "Payroll Console v{}",
        env!("CARGO_PKG_VERSION")
    );

    let language = config.ui.language;
    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            StderrNotifier.notify(error_notice(&err, language));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_summary() {
        let cli = Cli::try_parse_from([
            "payroll-console",
            "--format",
            "csv",
            "summary",
            "--from",
            "2024-01-01",
            "--employee",
            "7",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Csv);
        match cli.command {
            Commands::Summary { from, employee, .. } => {
                assert_eq!(from, NaiveDate::from_ymd_opt(2024, 1, 1));
                assert_eq!(employee.as_deref(), Some("7"));
            }
            _ => panic!("expected summary command"),
        }
    }

    #[test]
    fn test_cli_resource_names() {
        let cli = Cli::try_parse_from(["payroll-console", "list", "meal-benefits"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::List {
                resource: ResourceKind::MealBenefits
            }
        ));

        assert!(Cli::try_parse_from(["payroll-console", "list", "payslips"]).is_err());
    }

    #[test]
    fn test_cli_punch_kind() {
        let cli =
            Cli::try_parse_from(["payroll-console", "punch", "12", "break-start"]).unwrap();
        match cli.command {
            Commands::Punch { kind, .. } => assert_eq!(kind, PunchKind::BreakStart),
            _ => panic!("expected punch command"),
        }

        assert!(Cli::try_parse_from(["payroll-console", "punch", "12", "lunch"]).is_err());
    }

    #[test]
    fn test_error_notice_uses_server_message() {
        let err = anyhow::Error::new(ClientError::from_status(
            422,
            r#"{"message": "Employee already clocked in"}"#,
        ));
        let notice = error_notice(&err, Language::En);
        assert_eq!(notice.message, "Employee already clocked in");
    }

    #[test]
    fn test_error_notice_for_tip_credit() {
        let err = anyhow::Error::new(
            check_tip_credit(Some(7.25), Some(2.13), Some(5.0)).unwrap_err(),
        );
        let notice = error_notice(&err, Language::En);
        assert!(notice.message.starts_with("Please correct the highlighted fields"));
    }
}
