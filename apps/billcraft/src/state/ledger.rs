//! # Ledger State
//!
//! The invoice and expense collections plus the numbering counter.
//!
//! ## Thread Safety
//! The ledger is wrapped in `Arc<Mutex<T>>`: one writer at a time, and a
//! mutation plus its save happen under the same lock.
//!
//! ## Ledger Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Ledger Operations                                    │
//! │                                                                         │
//! │  CLI Action               Command                 Ledger Change         │
//! │  ──────────               ───────                 ─────────────         │
//! │                                                                         │
//! │  invoice new ────────────► create_invoice() ────► invoices.insert(0)   │
//! │                                                   counter.next()        │
//! │                                                                         │
//! │  invoice status ─────────► update_status() ─────► invoice.status = s   │
//! │                                                                         │
//! │  invoice delete ─────────► delete_invoice() ────► invoices.remove(i)   │
//! │                                                   (counter untouched)   │
//! │                                                                         │
//! │  expense add ────────────► add_expense() ───────► expenses.insert(0)   │
//! │                                                                         │
//! │  expense remove ─────────► remove_expense() ────► expenses.remove(i)   │
//! │                                                                         │
//! │  report ... ─────────────► (read only) ─────────► metrics / series     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Collections are kept newest first.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use billcraft_core::invoice::finalize;
use billcraft_core::numbering::{format_invoice_number, next_sequence};
use billcraft_core::{
    find_expense_index, find_invoice_index, CoreResult, Expense, Invoice, InvoiceCounter,
    InvoiceDraft, InvoiceStatus, Money, NumberingPolicy,
};

/// Everything the app persists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    invoices: Vec<Invoice>,

    #[serde(default)]
    expenses: Vec<Expense>,

    /// Last number handed out under the monotonic policy
    #[serde(default, rename = "issued_sequence")]
    counter: InvoiceCounter,
}

impl Ledger {
    /// Invoices, newest first.
    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    /// Expenses, newest first.
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn issued_sequence(&self) -> u32 {
        self.counter.issued()
    }

    /// Raises the counter past every number already on file.
    ///
    /// Called after loading, so a file written before the counter existed
    /// (or edited by hand) never causes a number to be reissued.
    pub fn reconcile_counter(&mut self) {
        self.counter
            .observe_all(self.invoices.iter().map(|inv| inv.sequence_number()));
    }

    /// Finalizes `draft` under the next sequence number and stores it.
    ///
    /// ## Numbering
    /// `INV-{year of created_at}-{n}`, with `n` chosen by `policy`.
    pub fn issue_invoice(
        &mut self,
        draft: InvoiceDraft,
        policy: NumberingPolicy,
        id: String,
        created_at: DateTime<Utc>,
    ) -> &Invoice {
        let seq = next_sequence(policy, self.invoices.len(), &mut self.counter);
        let number = format_invoice_number(created_at.year(), seq);

        let invoice = finalize(draft, id, number, created_at);
        self.invoices.insert(0, invoice);
        &self.invoices[0]
    }

    /// Sets an invoice's status. Returns the updated invoice and its
    /// previous status.
    pub fn set_invoice_status(
        &mut self,
        id: &str,
        status: InvoiceStatus,
    ) -> CoreResult<(&Invoice, InvoiceStatus)> {
        let index = find_invoice_index(&self.invoices, id)?;
        let invoice = &mut self.invoices[index];

        let previous = invoice.set_status(status);
        Ok((&*invoice, previous))
    }

    /// Removes an invoice. Its sequence number is not given back.
    pub fn delete_invoice(&mut self, id: &str) -> CoreResult<Invoice> {
        let index = find_invoice_index(&self.invoices, id)?;

        Ok(self.invoices.remove(index))
    }

    pub fn add_expense(&mut self, expense: Expense) -> &Expense {
        self.expenses.insert(0, expense);
        &self.expenses[0]
    }

    pub fn remove_expense(&mut self, id: &str) -> CoreResult<Expense> {
        let index = find_expense_index(&self.expenses, id)?;

        Ok(self.expenses.remove(index))
    }

    /// Running total shown under the expense list.
    pub fn expense_total(&self) -> Money {
        self.expenses.iter().map(|e| e.amount).sum()
    }
}

/// Shared ledger state.
///
/// ## Thread Safety
/// Uses `Arc<Mutex<Ledger>>` because:
/// - `Arc`: Allows shared ownership across threads
/// - `Mutex`: Ensures only one thread modifies the ledger at a time
#[derive(Debug, Default)]
pub struct LedgerState {
    ledger: Arc<Mutex<Ledger>>,
}

impl LedgerState {
    pub fn new(ledger: Ledger) -> Self {
        LedgerState {
            ledger: Arc::new(Mutex::new(ledger)),
        }
    }

    /// Executes a function with read access to the ledger.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let count = ledger_state.with_ledger(|l| l.invoices().len());
    /// ```
    pub fn with_ledger<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Ledger) -> R,
    {
        let ledger = self.ledger.lock().expect("Ledger mutex poisoned");
        f(&ledger)
    }

    /// Executes a function with write access to the ledger.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// ledger_state.with_ledger_mut(|l| {
    ///     l.remove_expense(&id)?;
    ///     store.save(l)
    /// })?;
    /// ```
    pub fn with_ledger_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Ledger) -> R,
    {
        let mut ledger = self.ledger.lock().expect("Ledger mutex poisoned");
        f(&mut ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use billcraft_core::{CoreError, ExpenseCategory, LineItem, Percent, TaxMode};
    use chrono::{NaiveDate, TimeZone};
    use rust_decimal::Decimal;

    fn draft(price: i64) -> InvoiceDraft {
        let mut draft = InvoiceDraft::new(TaxMode::Split, Percent::from_whole(18));
        draft.items = vec![LineItem::new(
            "Design Service",
            Decimal::ONE,
            Money::from_major(price),
            Percent::ZERO,
            Percent::from_whole(18),
        )];
        draft
    }

    fn at(year: i32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, 6, 1, 9, 0, 0).unwrap()
    }

    fn expense(id: &str, amount: i64) -> Expense {
        Expense {
            id: id.to_string(),
            date: NaiveDate::from_ymd_opt(2026, 6, 2).unwrap(),
            category: ExpenseCategory::Rent,
            description: String::new(),
            amount: Money::from_major(amount),
            receipt: None,
        }
    }

    #[test]
    fn test_issue_numbers_and_orders_newest_first() {
        let mut ledger = Ledger::default();
        ledger.issue_invoice(draft(100), NumberingPolicy::Monotonic, "a".into(), at(2026));
        let second = ledger
            .issue_invoice(draft(200), NumberingPolicy::Monotonic, "b".into(), at(2026))
            .clone();

        assert_eq!(second.sequence_number(), "INV-2026-0002");
        assert_eq!(second.total(), Money::from_major(236));
        assert_eq!(ledger.invoices()[0].id(), "b");
        assert_eq!(ledger.invoices()[1].sequence_number(), "INV-2026-0001");
    }

    #[test]
    fn test_monotonic_survives_delete() {
        let mut ledger = Ledger::default();
        for id in ["a", "b", "c"] {
            ledger.issue_invoice(draft(1), NumberingPolicy::Monotonic, id.into(), at(2026));
        }
        ledger.delete_invoice("c").unwrap();

        let next = ledger.issue_invoice(draft(1), NumberingPolicy::Monotonic, "d".into(), at(2027));
        assert_eq!(next.sequence_number(), "INV-2027-0004");
    }

    #[test]
    fn test_collection_size_reuses_after_delete() {
        let mut ledger = Ledger::default();
        for id in ["a", "b", "c"] {
            ledger.issue_invoice(draft(1), NumberingPolicy::CollectionSize, id.into(), at(2026));
        }
        ledger.delete_invoice("c").unwrap();

        let policy = NumberingPolicy::CollectionSize;
        let next = ledger.issue_invoice(draft(1), policy, "d".into(), at(2026));
        assert_eq!(next.sequence_number(), "INV-2026-0003");
    }

    #[test]
    fn test_status_update_and_missing_ids() {
        let mut ledger = Ledger::default();
        ledger.issue_invoice(draft(100), NumberingPolicy::Monotonic, "a".into(), at(2026));

        let (invoice, previous) = ledger.set_invoice_status("a", InvoiceStatus::Paid).unwrap();
        assert_eq!(previous, InvoiceStatus::Draft);
        assert_eq!(invoice.status(), InvoiceStatus::Paid);

        assert!(matches!(
            ledger.set_invoice_status("zzz", InvoiceStatus::Sent),
            Err(CoreError::InvoiceNotFound(_))
        ));
        assert!(matches!(ledger.delete_invoice("zzz"), Err(CoreError::InvoiceNotFound(_))));
        assert!(matches!(ledger.remove_expense("zzz"), Err(CoreError::ExpenseNotFound(_))));
    }

    #[test]
    fn test_expenses_and_running_total() {
        let mut ledger = Ledger::default();
        ledger.add_expense(expense("e1", 100));
        ledger.add_expense(expense("e2", 50));

        assert_eq!(ledger.expenses()[0].id, "e2");
        assert_eq!(ledger.expense_total(), Money::from_major(150));

        let removed = ledger.remove_expense("e1").unwrap();
        assert_eq!(removed.amount, Money::from_major(100));
        assert_eq!(ledger.expense_total(), Money::from_major(50));
    }

    #[test]
    fn test_state_wrapper() {
        let state = LedgerState::new(Ledger::default());
        state.with_ledger_mut(|l| {
            l.add_expense(expense("e1", 10));
        });
        assert_eq!(state.with_ledger(|l| l.expenses().len()), 1);
    }
}
