//! # Command Line
//!
//! ```text
//! billcraft [--json] [--config <path>] <command>
//!
//!   invoice new      --customer .. --item "desc|qty|price|discount|rate" ..
//!   invoice preview  (same flags, nothing saved)
//!   invoice list
//!   invoice status   <id> <Draft|Sent|Paid|Overdue>
//!   invoice delete   <id>
//!
//!   expense add      [--date 2026-03-01] --category Rent [--amount 25000]
//!   expense list
//!   expense remove   <id>
//!
//!   report summary | series [--range 3m|6m|12m|all] | split | shares
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "billcraft", version, about = "Invoices, expenses and the numbers behind them")]
pub struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (defaults to config.toml in the platform config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create, list and update invoices
    #[command(subcommand)]
    Invoice(InvoiceCommand),

    /// Record and list expenses
    #[command(subcommand)]
    Expense(ExpenseCommand),

    /// Dashboard metrics and charts
    #[command(subcommand)]
    Report(ReportCommand),
}

#[derive(Debug, Subcommand)]
pub enum InvoiceCommand {
    /// Save a new invoice
    New(InvoiceArgs),
    /// Show the computed lines and totals without saving
    Preview(InvoiceArgs),
    /// List invoices, newest first
    List,
    /// Change an invoice's status
    Status {
        id: String,
        /// Draft, Sent, Paid or Overdue
        status: String,
    },
    /// Delete an invoice
    Delete { id: String },
}

/// Fields of an invoice being drafted.
#[derive(Debug, Clone, Default, Args)]
pub struct InvoiceArgs {
    #[arg(long, default_value = "")]
    pub customer: String,

    /// Email or phone
    #[arg(long, default_value = "")]
    pub contact: String,

    /// Customer's tax registration (GSTIN, VAT id, ...)
    #[arg(long, default_value = "")]
    pub tax_id: String,

    /// split (intra-state) or single (inter-state); config default if omitted
    #[arg(long)]
    pub mode: Option<String>,

    /// Initial status (Draft if omitted)
    #[arg(long)]
    pub status: Option<String>,

    /// "description|quantity|price|discount%|tax%"; trailing fields optional
    #[arg(long = "item", value_name = "SPEC")]
    pub items: Vec<String>,
}

#[derive(Debug, Subcommand)]
pub enum ExpenseCommand {
    /// Record an expense
    Add(ExpenseArgs),
    /// List expenses, newest first, with the running total
    List,
    /// Remove an expense
    Remove { id: String },
}

#[derive(Debug, Clone, Default, Args)]
pub struct ExpenseArgs {
    /// YYYY-MM-DD (today if omitted)
    #[arg(long)]
    pub date: Option<String>,

    /// Utilities, Rent, Salaries, Software, Travel or Misc
    #[arg(long, default_value = "Utilities")]
    pub category: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Zero if omitted
    #[arg(long, allow_hyphen_values = true)]
    pub amount: Option<String>,

    /// Receipt reference (file name, URL, ...)
    #[arg(long)]
    pub receipt: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum ReportCommand {
    /// Revenue, collected tax, expenses and net
    Summary,
    /// Monthly revenue vs expenses
    Series {
        /// 3m, 6m, 12m or all
        #[arg(long, default_value = "6m")]
        range: String,
    },
    /// Expense totals per category
    Split,
    /// Tax, expense and profit as shares of revenue
    Shares,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_invoice_new() {
        let cli = Cli::try_parse_from([
            "billcraft",
            "--json",
            "invoice",
            "new",
            "--customer",
            "Acme",
            "--mode",
            "single",
            "--item",
            "Design|2|500|10|18",
            "--item",
            "Hosting|1|1200",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Command::Invoice(InvoiceCommand::New(args)) => {
                assert_eq!(args.customer, "Acme");
                assert_eq!(args.mode.as_deref(), Some("single"));
                assert_eq!(args.items.len(), 2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_report_series_default_range() {
        let cli = Cli::try_parse_from(["billcraft", "report", "series"]).unwrap();
        match cli.command {
            Command::Report(ReportCommand::Series { range }) => assert_eq!(range, "6m"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_expense_add_date_and_amount_are_optional() {
        let cli = Cli::try_parse_from(["billcraft", "expense", "add"]).unwrap();
        match cli.command {
            Command::Expense(ExpenseCommand::Add(args)) => {
                assert_eq!(args.date, None);
                assert_eq!(args.amount, None);
                assert_eq!(args.category, "Utilities");
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from(["billcraft", "expense", "add", "--amount", "-5"]).unwrap();
        match cli.command {
            Command::Expense(ExpenseCommand::Add(args)) => {
                assert_eq!(args.amount.as_deref(), Some("-5"))
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
