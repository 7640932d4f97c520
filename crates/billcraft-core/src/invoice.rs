//! # Invoice Aggregator
//!
//! Folds line computations into invoice totals, holds the editable draft,
//! and finalizes a draft into an immutable [`Invoice`].
//!
//! ## Draft Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌──────────┐  add_item / update_item   ┌──────────┐                   │
//! │  │  Draft   │──────────────────────────►│  Draft   │──┐ preview()      │
//! │  │ (1 line) │◄──────────────────────────│ (n lines)│◄─┘ (every edit)   │
//! │  └──────────┘       remove_item         └────┬─────┘                   │
//! │                                              │ finalize(id, number, at) │
//! │                                              ▼                          │
//! │                                       ┌─────────────┐                   │
//! │                                       │   Invoice   │ totals cached,    │
//! │                                       │ (immutable) │ only status moves │
//! │                                       └─────────────┘                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::line::{compute, LineComputation};
use crate::money::Money;
use crate::types::{Invoice, InvoiceStatus, LineItem, Percent, TaxMode};

// =============================================================================
// Totals
// =============================================================================

/// Invoice-level sums of every [`LineComputation`] field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceTotals {
    /// Σ base (quantity × price), before discounts.
    pub gross: Money,
    /// Σ discount amounts.
    pub discount_total: Money,
    /// Σ taxable amounts: after discount, before tax.
    pub subtotal: Money,
    pub tax_component_a_total: Money,
    pub tax_component_b_total: Money,
    pub tax_component_c_total: Money,
    /// A + B + C totals.
    pub tax_total: Money,
    pub total: Money,
}

impl InvoiceTotals {
    fn add_line(mut self, line: &LineComputation) -> Self {
        self.gross += line.base;
        self.discount_total += line.discount_amount;
        self.subtotal += line.taxable_amount;
        self.tax_component_a_total += line.tax_component_a;
        self.tax_component_b_total += line.tax_component_b;
        self.tax_component_c_total += line.tax_component_c;
        self.tax_total = self.tax_component_a_total
            + self.tax_component_b_total
            + self.tax_component_c_total;
        self.total += line.total;
        self
    }
}

/// Sums the line computations of `items` under `mode`.
///
/// Addition is commutative, so item order never changes the result; an
/// empty slice gives all-zero totals.
pub fn aggregate(items: &[LineItem], mode: TaxMode) -> InvoiceTotals {
    items
        .iter()
        .map(|item| compute(item, mode))
        .fold(InvoiceTotals::default(), |acc, line| acc.add_line(&line))
}

// =============================================================================
// Draft
// =============================================================================

/// An invoice being edited. Nothing about it is persisted until
/// [`finalize`] turns it into an [`Invoice`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceDraft {
    pub customer_name: String,
    pub contact_info: String,
    pub tax_id: String,
    pub tax_mode: TaxMode,
    pub status: InvoiceStatus,
    pub items: Vec<LineItem>,
}

/// Live preview of a draft: one computation per line plus the totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DraftPreview {
    pub lines: Vec<LineComputation>,
    pub totals: InvoiceTotals,
}

impl InvoiceDraft {
    /// A fresh draft holding one blank line at `default_tax_rate`.
    pub fn new(tax_mode: TaxMode, default_tax_rate: Percent) -> Self {
        InvoiceDraft {
            customer_name: String::new(),
            contact_info: String::new(),
            tax_id: String::new(),
            tax_mode,
            status: InvoiceStatus::Draft,
            items: vec![LineItem::blank(default_tax_rate)],
        }
    }

    /// Appends a line; returns its index.
    pub fn add_item(&mut self, item: LineItem) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    /// Replaces the line at `index`. Returns `false` if there is none.
    pub fn update_item(&mut self, index: usize, item: LineItem) -> bool {
        match self.items.get_mut(index) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    /// Removes and returns the line at `index`, if any.
    pub fn remove_item(&mut self, index: usize) -> Option<LineItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn totals(&self) -> InvoiceTotals {
        aggregate(&self.items, self.tax_mode)
    }

    pub fn preview(&self) -> DraftPreview {
        let lines: Vec<LineComputation> = self
            .items
            .iter()
            .map(|item| compute(item, self.tax_mode))
            .collect();
        let totals = lines
            .iter()
            .fold(InvoiceTotals::default(), |acc, line| acc.add_line(line));
        DraftPreview { lines, totals }
    }
}

// =============================================================================
// Finalize
// =============================================================================

/// Freezes `draft` into an invoice.
///
/// The caller supplies the identity (`id`, `sequence_number`) and the
/// timestamp, keeping this function free of clocks and randomness. The
/// totals are computed once here and cached; `amount_due` starts equal to
/// `total`.
pub fn finalize(
    draft: InvoiceDraft,
    id: impl Into<String>,
    sequence_number: impl Into<String>,
    created_at: DateTime<Utc>,
) -> Invoice {
    let totals = draft.totals();

    Invoice {
        id: id.into(),
        sequence_number: sequence_number.into(),
        created_at,
        customer_name: draft.customer_name,
        contact_info: draft.contact_info,
        tax_id: draft.tax_id,
        tax_mode: draft.tax_mode,
        status: draft.status,
        items: draft.items,
        subtotal: totals.subtotal,
        tax_total: totals.tax_total,
        total: totals.total,
        amount_due: totals.total,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
