//! # billcraft-core: Pure Billing Logic for BillCraft
//!
//! This crate is the **heart** of BillCraft. It turns line items into
//! invoice totals and invoice/expense collections into dashboard metrics,
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        BillCraft Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/billcraft (CLI)                         │   │
//! │  │    invoice new ──► invoice list ──► expense add ──► report      │   │
//! │  │    config (TOML + env) • ledger.json store • tracing            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ full collections in, values out        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ billcraft-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   line    │  │  invoice  │  │  metrics  │  │  series   │  │   │
//! │  │   │  compute  │─►│ aggregate │─►│ summarize │  │  monthly  │  │   │
//! │  │   │           │  │ finalize  │  │  shares   │  │  merge    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ numbering │  │ validation│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO RANDOMNESS • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`line`] - Line-item calculator (discount, taxable, tax components)
//! - [`invoice`] - Invoice totals, drafts and finalization
//! - [`numbering`] - `INV-2026-0007` sequence numbers
//! - [`metrics`] - Revenue, collected tax, net, category split, shares
//! - [`series`] - Monthly series, merge, range window
//! - [`types`] - Domain types (Invoice, LineItem, Expense, ...)
//! - [`money`] - Exact decimal money
//! - [`error`] - Domain error types
//! - [`validation`] - Boundary parsing and flags
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same collections in, same numbers out
//! 2. **No I/O**: persistence, clocks and id generation belong to the app
//! 3. **Exact Money**: decimals, rounded only for display
//! 4. **Total Calculators**: every typed input has an answer; only boundary
//!    parsing and lookups can fail
//!
//! ## Example Usage
//!
//! ```rust
//! use billcraft_core::invoice::aggregate;
//! use billcraft_core::{LineItem, Money, Percent, TaxMode};
//!
//! let items = vec![LineItem::new(
//!     "Design Service",
//!     2.into(),
//!     Money::from_major(500),
//!     Percent::from_whole(10),
//!     Percent::from_whole(18),
//! )];
//!
//! let totals = aggregate(&items, TaxMode::Split);
//! assert_eq!(totals.subtotal, Money::from_major(900));
//! assert_eq!(totals.tax_total, Money::from_major(162));
//! assert_eq!(totals.total, Money::from_major(1062));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod invoice;
pub mod line;
pub mod metrics;
pub mod money;
pub mod numbering;
pub mod series;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use invoice::{aggregate, finalize, DraftPreview, InvoiceDraft, InvoiceTotals};
pub use line::{compute, LineComputation};
pub use metrics::{MetricsPolicy, MetricsSnapshot, StatusScope};
pub use money::Money;
pub use numbering::{InvoiceCounter, NumberingPolicy};
pub use series::{MergedPoint, PeriodKey, SeriesPoint, SeriesRange};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Prefix of every invoice sequence number.
pub const INVOICE_NUMBER_PREFIX: &str = "INV";

/// Minimum digits in the sequence part (`0007`). Larger numbers just grow.
pub const INVOICE_NUMBER_WIDTH: usize = 4;

/// Tax rate given to new blank lines when nothing is configured.
pub const DEFAULT_TAX_RATE: i64 = 18;

/// Length cap for free-text fields (names, descriptions, contact info).
///
/// ## Business Reason
/// Keeps a pasted document from ending up in a customer name.
pub const MAX_TEXT_LENGTH: usize = 200;

// =============================================================================
// Lookups
// =============================================================================

// Lookups return positions so callers can update or remove in place.

/// Position of the invoice with `id`.
pub fn find_invoice_index(invoices: &[Invoice], id: &str) -> CoreResult<usize> {
    invoices
        .iter()
        .position(|inv| inv.id() == id)
        .ok_or_else(|| CoreError::InvoiceNotFound(id.to_string()))
}

/// Position of the expense with `id`.
pub fn find_expense_index(expenses: &[Expense], id: &str) -> CoreResult<usize> {
    expenses
        .iter()
        .position(|e| e.id == id)
        .ok_or_else(|| CoreError::ExpenseNotFound(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_lookups() {
        let stub = |secs| {
            let at = Utc.timestamp_opt(secs, 0).unwrap();
            Invoice::stub(InvoiceStatus::Paid, Money::from_major(10), Money::zero(), at)
        };
        let invoices = vec![stub(1_000), stub(2_000)];
        let id = invoices[1].id().to_string();

        assert_eq!(find_invoice_index(&invoices, &id).unwrap(), 1);
        assert!(matches!(
            find_invoice_index(&invoices, "missing"),
            Err(CoreError::InvoiceNotFound(id)) if id == "missing"
        ));
        assert!(matches!(
            find_expense_index(&[], "missing"),
            Err(CoreError::ExpenseNotFound(_))
        ));
    }
}
