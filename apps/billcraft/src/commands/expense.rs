//! # Expense Commands
//!
//! Expenses are write-once: add and remove, never edit.

use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use billcraft_core::validation::{
    parse_date, validate_expense_amount, validate_record_id, validate_short_text,
};
use billcraft_core::{Expense, ExpenseCategory, Money};

use super::Render;
use crate::cli::ExpenseArgs;
use crate::error::ApiError;
use crate::state::{ConfigState, LedgerState};
use crate::store::LedgerStore;

#[derive(Debug, Clone, Serialize)]
pub struct ExpenseResponse {
    pub expense: Expense,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpenseListResponse {
    pub expenses: Vec<Expense>,
    pub total: Money,
}

#[derive(Debug, Clone, Serialize)]
pub struct RemovedExpenseResponse {
    pub expense: Expense,
}

/// Validates and records an expense.
///
/// A missing date means `today`; a missing amount means zero.
pub fn add_expense(
    ledger: &LedgerState,
    store: &LedgerStore,
    args: &ExpenseArgs,
    today: NaiveDate,
) -> Result<ExpenseResponse, ApiError> {
    debug!(date = ?args.date, category = %args.category, "expense add command");

    let date = match &args.date {
        Some(raw) => parse_date(raw)?,
        None => today,
    };

    let expense = Expense {
        id: Uuid::new_v4().to_string(),
        date,
        category: args.category.parse::<ExpenseCategory>()?,
        description: validate_short_text("description", &args.description)?,
        amount: validate_expense_amount(args.amount.as_deref().unwrap_or_default())?,
        receipt: match &args.receipt {
            Some(r) if !r.trim().is_empty() => Some(validate_short_text("receipt", r)?),
            _ => None,
        },
    };

    let expense = ledger.with_ledger_mut(|l| {
        let expense = l.add_expense(expense).clone();
        store.save(l)?;
        Ok::<Expense, ApiError>(expense)
    })?;

    info!(
        id = %expense.id,
        category = %expense.category,
        amount = %expense.amount,
        "Expense saved"
    );
    Ok(ExpenseResponse { expense })
}

/// Lists expenses, newest first, with their total.
pub fn list_expenses(ledger: &LedgerState) -> ExpenseListResponse {
    debug!("expense list command");
    ledger.with_ledger(|l| ExpenseListResponse {
        expenses: l.expenses().to_vec(),
        total: l.expense_total(),
    })
}

pub fn remove_expense(
    ledger: &LedgerState,
    store: &LedgerStore,
    id: &str,
) -> Result<RemovedExpenseResponse, ApiError> {
    debug!(id = %id, "expense remove command");

    let id = validate_record_id(id)?;
    let expense = ledger.with_ledger_mut(|l| {
        let removed = l.remove_expense(&id)?;
        store.save(l)?;
        Ok::<Expense, ApiError>(removed)
    })?;

    info!(id = %id, "Expense removed");
    Ok(RemovedExpenseResponse { expense })
}

// =============================================================================
// Rendering
// =============================================================================

fn expense_row(expense: &Expense, config: &ConfigState) -> String {
    format!(
        "{}  {:<10} {:<28} {:>16}  {}",
        expense.date,
        expense.category.as_str(),
        expense.label(),
        config.format_currency(expense.amount),
        expense.id,
    )
}

impl Render for ExpenseResponse {
    fn render(&self, config: &ConfigState) -> String {
        format!("Saved expense\n  {}", expense_row(&self.expense, config))
    }
}

impl Render for ExpenseListResponse {
    fn render(&self, config: &ConfigState) -> String {
        if self.expenses.is_empty() {
            return "No expenses yet".to_string();
        }

        let mut out = String::new();
        for expense in &self.expenses {
            let _ = writeln!(out, "{}", expense_row(expense, config));
        }
        let _ = write!(out, "Total {}", config.format_currency(self.total));
        out
    }
}

impl Render for RemovedExpenseResponse {
    fn render(&self, config: &ConfigState) -> String {
        format!(
            "Removed {} ({})",
            self.expense.label(),
            config.format_currency(self.expense.amount)
        )
    }
}
