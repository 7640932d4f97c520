//! # BillCraft CLI Library
//!
//! Everything behind the `billcraft` binary. `main.rs` only calls [`run`].
//!
//! ## Module Organization
//! ```text
//! billcraft_lib/
//! ├── lib.rs          ◄─── You are here (startup & dispatch)
//! ├── cli.rs          ◄─── clap definitions
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── config.rs   ◄─── Configuration (TOML + BILLCRAFT_* env)
//! │   └── ledger.rs   ◄─── Invoices, expenses, numbering counter
//! ├── commands/
//! │   ├── mod.rs      ◄─── Render trait, text/JSON output
//! │   ├── invoice.rs  ◄─── Invoice commands
//! │   ├── expense.rs  ◄─── Expense commands
//! │   └── report.rs   ◄─── Dashboard reports
//! ├── store.rs        ◄─── ledger.json persistence
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod state;
pub mod store;

use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, ExpenseCommand, InvoiceCommand, ReportCommand};
use commands::{emit, expense, invoice, report};
use error::ApiError;
use state::{ConfigState, LedgerState};
use store::LedgerStore;

/// Runs the CLI and returns the process exit code.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Command Execution                                 │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber to stderr, RUST_LOG overrides                  │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults ◄── config.toml ◄── BILLCRAFT_* env                     │
/// │                                                                         │
/// │  3. Load Ledger ──────────────────────────────────────────────────────► │
/// │     • data_file, or ledger.json in the platform data dir                │
/// │     • missing file = empty ledger                                       │
/// │                                                                         │
/// │  4. Dispatch ─────────────────────────────────────────────────────────► │
/// │     • mutating commands save the ledger before returning                │
/// │                                                                         │
/// │  5. Print ────────────────────────────────────────────────────────────► │
/// │     • stdout: result (text or --json)                                   │
/// │     • stderr: error, exit code 1                                        │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match execute(&cli, Utc::now(), |key| std::env::var(key).ok()) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            if cli.json {
                match serde_json::to_string_pretty(&err) {
                    Ok(body) => eprintln!("{}", body),
                    Err(_) => eprintln!("{}", err),
                }
            } else {
                eprintln!("error {}", err);
            }
            ExitCode::FAILURE
        }
    }
}

/// Loads state, runs one command and returns what to print.
///
/// `now` stamps new invoices, dates expenses entered without one and anchors
/// the report window. `env` supplies the `BILLCRAFT_*` overrides.
pub fn execute(
    cli: &Cli,
    now: DateTime<Utc>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<String, ApiError> {
    let config = ConfigState::load_with(cli.config.clone(), env)?;
    let store = LedgerStore::locate(config.data_file.as_deref())?;
    debug!(path = ?store.path(), "Ledger file located");

    let ledger = LedgerState::new(store.load()?);
    let json = cli.json;

    match &cli.command {
        Command::Invoice(cmd) => match cmd {
            InvoiceCommand::New(args) => emit(
                &invoice::create_invoice(&config, &ledger, &store, args, now)?,
                json,
                &config,
            ),
            InvoiceCommand::Preview(args) => {
                emit(&invoice::preview_invoice(&config, args)?, json, &config)
            }
            InvoiceCommand::List => emit(&invoice::list_invoices(&ledger), json, &config),
            InvoiceCommand::Status { id, status } => emit(
                &invoice::update_invoice_status(&ledger, &store, id, status)?,
                json,
                &config,
            ),
            InvoiceCommand::Delete { id } => emit(
                &invoice::delete_invoice(&ledger, &store, id)?,
                json,
                &config,
            ),
        },
        Command::Expense(cmd) => match cmd {
            ExpenseCommand::Add(args) => emit(
                &expense::add_expense(&ledger, &store, args, now.date_naive())?,
                json,
                &config,
            ),
            ExpenseCommand::List => emit(&expense::list_expenses(&ledger), json, &config),
            ExpenseCommand::Remove { id } => {
                emit(&expense::remove_expense(&ledger, &store, id)?, json, &config)
            }
        },
        Command::Report(cmd) => match cmd {
            ReportCommand::Summary => emit(&report::summary(&config, &ledger), json, &config),
            ReportCommand::Series { range } => {
                emit(&report::series(&config, &ledger, range, now)?, json, &config)
            }
            ReportCommand::Split => emit(&report::split(&ledger), json, &config),
            ReportCommand::Shares => emit(&report::shares(&config, &ledger), json, &config),
        },
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so stdout stays clean for `--json`.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=billcraft_lib=trace` - Trace for the app only
/// - Default: warnings, plus info from the app
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,billcraft_lib=info,billcraft_core=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "BillCraft starting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    use crate::error::ErrorCode;

    struct Workspace {
        dir: TempDir,
        config: String,
    }

    /// A config file pointing the ledger into a temp dir.
    fn workspace() -> Workspace {
        let dir = TempDir::new().unwrap();
        let ledger = dir.path().join("ledger.json");
        let config = dir.path().join("config.toml");
        std::fs::write(
            &config,
            format!(
                "business_name = \"Acme Studio\"\ndata_file = {:?}\n",
                ledger.to_string_lossy()
            ),
        )
        .unwrap();

        Workspace {
            config: config.to_string_lossy().into_owned(),
            dir,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, 9, 30, 0).unwrap()
    }

    /// Money serializes as a decimal string.
    fn amount(value: &serde_json::Value) -> Decimal {
        value.as_str().unwrap().parse().unwrap()
    }

    /// Runs with an empty environment so a developer's `BILLCRAFT_*`
    /// settings never leak into the temp workspace.
    fn no_env(_key: &str) -> Option<String> {
        None
    }

    fn exec(ws: &Workspace, args: &[&str]) -> Result<String, ApiError> {
        let mut argv = vec!["billcraft", "--config", ws.config.as_str()];
        argv.extend_from_slice(args);
        execute(&Cli::try_parse_from(argv).unwrap(), now(), no_env)
    }

    #[test]
    fn test_end_to_end_json() {
        let ws = workspace();

        let out = exec(
            &ws,
            &[
                "--json",
                "invoice",
                "new",
                "--customer",
                "Globex",
                "--status",
                "Paid",
                "--item",
                "Design|2|500|10|18",
            ],
        )
        .unwrap();
        let created: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(created["invoice"]["sequence_number"], "INV-2026-0001");
        assert_eq!(amount(&created["invoice"]["total"]), dec!(1062));

        let args = [
            "expense", "add", "--date", "2026-03-02", "--category", "Rent", "--amount", "500",
        ];
        exec(&ws, &args).unwrap();

        let summary: serde_json::Value =
            serde_json::from_str(&exec(&ws, &["--json", "report", "summary"]).unwrap()).unwrap();
        assert_eq!(amount(&summary["revenue"]), dec!(1062));
        assert_eq!(amount(&summary["net"]), dec!(562));

        assert!(ws.dir.path().join("ledger.json").exists());
    }

    #[test]
    fn test_text_output_uses_currency_format() {
        let ws = workspace();
        exec(&ws, &["expense", "add", "--date", "2026-03-02", "--amount", "150000"]).unwrap();

        let split = exec(&ws, &["report", "split"]).unwrap();
        assert!(split.contains("₹1,50,000.00"));

        let summary = exec(&ws, &["report", "summary"]).unwrap();
        assert!(summary.starts_with("Acme Studio (INR)"));
    }

    #[test]
    fn test_expense_without_date_uses_today() {
        let ws = workspace();
        let out = exec(&ws, &["--json", "expense", "add", "--category", "Misc"]).unwrap();

        let saved: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(saved["expense"]["date"], "2026-03-15");
        assert_eq!(amount(&saved["expense"]["amount"]), Decimal::ZERO);
    }

    #[test]
    fn test_env_overrides_come_from_the_lookup() {
        let ws = workspace();
        let elsewhere = ws.dir.path().join("other.json");
        let env = |key: &str| {
            (key == "BILLCRAFT_DATA").then(|| elsewhere.to_string_lossy().into_owned())
        };

        let argv = ["billcraft", "--config", ws.config.as_str(), "expense", "add", "--amount", "5"];
        execute(&Cli::try_parse_from(argv).unwrap(), now(), env).unwrap();

        assert!(elsewhere.exists());
        assert!(!ws.dir.path().join("ledger.json").exists());
    }

    #[test]
    fn test_errors_carry_codes() {
        let ws = workspace();

        let missing = "550e8400-e29b-41d4-a716-446655440000";
        let err = exec(&ws, &["invoice", "delete", missing]).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let argv = ["billcraft", "--config", "/definitely/not/here.toml", "invoice", "list"];
        let cli = Cli::try_parse_from(argv).unwrap();
        assert_eq!(execute(&cli, now(), no_env).unwrap_err().code, ErrorCode::ConfigError);
    }
}
