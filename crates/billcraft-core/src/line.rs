//! # Line-Item Calculator
//!
//! Turns one [`LineItem`] and a [`TaxMode`] into every figure shown next to
//! the line: base, discount, taxable amount, tax components and total.
//!
//! ## Calculation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  quantity × unit_price ─────────────────────────────► base             │
//! │                                                         │               │
//! │  base × discount% ──────────────────────────────────► discount_amount  │
//! │                                                         │               │
//! │  max(base − discount_amount, 0) ────────────────────► taxable_amount   │
//! │                                                         │               │
//! │            ┌─────────── Split ──────────┐   ┌── Single ──┐             │
//! │            ▼                            ▼   ▼            │             │
//! │  taxable × rate/2 → A    taxable × rate/2 → B   taxable × rate → C    │
//! │                                                         │               │
//! │  taxable + A + B + C ───────────────────────────────► total            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Runs on every edit for the live preview and once per item at save time.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{LineItem, TaxMode};

/// Derived figures for one line. Never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineComputation {
    pub base: Money,
    pub discount_amount: Money,
    pub taxable_amount: Money,
    /// First split component (e.g. CGST). Zero in single mode.
    pub tax_component_a: Money,
    /// Second split component (e.g. SGST). Zero in single mode.
    pub tax_component_b: Money,
    /// Single-mode component (e.g. IGST). Zero in split mode.
    pub tax_component_c: Money,
    pub total: Money,
}

impl LineComputation {
    /// Sum of the three tax components.
    pub fn tax_total(&self) -> Money {
        self.tax_component_a + self.tax_component_b + self.tax_component_c
    }
}

/// Computes a line under `mode`.
///
/// Pure and total: negative or oversized discounts are accepted, and the
/// taxable amount is floored at zero so no line ever goes negative.
///
/// ```rust
/// use billcraft_core::line::compute;
/// use billcraft_core::money::Money;
/// use billcraft_core::types::{LineItem, Percent, TaxMode};
///
/// let item = LineItem::new(
///     "Design Service",
///     2.into(),
///     Money::from_major(500),
///     Percent::from_whole(10),
///     Percent::from_whole(18),
/// );
///
/// let line = compute(&item, TaxMode::Split);
/// assert_eq!(line.taxable_amount, Money::from_major(900));
/// assert_eq!(line.tax_component_a, Money::from_major(81));
/// assert_eq!(line.total, Money::from_major(1062));
/// ```
pub fn compute(item: &LineItem, mode: TaxMode) -> LineComputation {
    let base = item.unit_price.multiply_quantity(item.quantity);
    let discount_amount = base.percentage(item.discount);
    let taxable_amount = (base - discount_amount).floor_at_zero();

    let (tax_component_a, tax_component_b, tax_component_c) = match mode {
        TaxMode::Single => (
            Money::zero(),
            Money::zero(),
            taxable_amount.percentage(item.tax_rate),
        ),
        TaxMode::Split => {
            let half = taxable_amount.percentage(item.tax_rate.half());
            (half, half, Money::zero())
        }
    };

    LineComputation {
        base,
        discount_amount,
        taxable_amount,
        tax_component_a,
        tax_component_b,
        tax_component_c,
        total: taxable_amount + tax_component_a + tax_component_b + tax_component_c,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
