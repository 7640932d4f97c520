//! # Domain Types
//!
//! Core domain types used throughout BillCraft.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Invoice      │   │    LineItem     │   │    Expense      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  quantity       │   │  id (UUID)      │       │
//! │  │  sequence_number│   │  unit_price     │   │  date           │       │
//! │  │  status         │   │  discount  (%)  │   │  category       │       │
//! │  │  cached totals  │   │  tax_rate  (%)  │   │  amount         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Percent      │   │    TaxMode      │   │ InvoiceStatus   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  18 = 18%       │   │  Split (A + B)  │   │  Draft   Sent   │       │
//! │  │  exact decimal  │   │  Single (C)     │   │  Paid  Overdue  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every invoice has:
//! - `id`: UUID v4 - immutable, used to address the record
//! - `sequence_number`: `INV-2026-0007` - human-readable, display only

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Percent
// =============================================================================

/// A percentage as an exact decimal: `Percent::from_whole(18)` is 18%.
///
/// Used for discounts, tax rates and the clamped ratios the metrics engine
/// hands to the renderer. Values are not range-checked here; see
/// [`crate::validation::validate_line_item`] for the flags raised on
/// out-of-range discounts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct Percent(#[ts(as = "String")] Decimal);

impl Percent {
    /// 0%.
    pub const ZERO: Percent = Percent(Decimal::ZERO);

    /// 100%.
    pub const HUNDRED: Percent = Percent(Decimal::ONE_HUNDRED);

    #[inline]
    pub const fn new(value: Decimal) -> Self {
        Percent(value)
    }

    #[inline]
    pub fn from_whole(value: i64) -> Self {
        Percent(Decimal::from(value))
    }

    /// Returns the percentage value (18 for 18%).
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Half of this rate: each component of a split tax.
    #[inline]
    pub fn half(&self) -> Percent {
        Percent(self.0 / Decimal::TWO)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Restricts the value to `[min, max]`.
    pub fn clamp(self, min: Percent, max: Percent) -> Percent {
        if self < min {
            min
        } else if self > max {
            max
        } else {
            self
        }
    }

    /// Rounds to `dp` decimal places (display only).
    pub fn rounded(&self, dp: u32) -> Percent {
        Percent(self.0.round_dp(dp))
    }
}

impl Default for Percent {
    fn default() -> Self {
        Percent::ZERO
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

// =============================================================================
// Tax Mode
// =============================================================================

/// How a line's tax rate is applied.
///
/// ```text
/// ┌──────────────────────────────────────────────────────────────────────┐
/// │  SPLIT  (intra-state)        taxable × rate/2  ──► component A       │
/// │                              taxable × rate/2  ──► component B       │
/// │                                                                      │
/// │  SINGLE (inter-state)        taxable × rate    ──► component C       │
/// │                                                                      │
/// │  Same taxable & rate  ⇒  A + B == C  (only the split differs)        │
/// └──────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaxMode {
    /// Two equal jurisdictional components (e.g. CGST + SGST).
    #[default]
    Split,
    /// One component (e.g. IGST).
    Single,
}

impl fmt::Display for TaxMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaxMode::Split => write!(f, "split"),
            TaxMode::Single => write!(f, "single"),
        }
    }
}

impl FromStr for TaxMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "split" | "intra" | "gst" => Ok(TaxMode::Split),
            "single" | "inter" | "igst" => Ok(TaxMode::Single),
            _ => Err(ValidationError::NotAllowed {
                field: "tax mode".to_string(),
                allowed: vec!["split".to_string(), "single".to_string()],
            }),
        }
    }
}

// =============================================================================
// Invoice Status
// =============================================================================

/// Invoice status.
///
/// There is no transition graph: the user may move an invoice from any
/// status to any other, and the app records what it is told.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Sent,
    Paid,
    Overdue,
}

impl InvoiceStatus {
    /// Every status, in display order.
    pub const ALL: [InvoiceStatus; 4] = [
        InvoiceStatus::Draft,
        InvoiceStatus::Sent,
        InvoiceStatus::Paid,
        InvoiceStatus::Overdue,
    ];

    /// Statuses that represent confirmed or collected value.
    pub fn is_confirmed(&self) -> bool {
        matches!(self, InvoiceStatus::Paid | InvoiceStatus::Sent)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "Draft",
            InvoiceStatus::Sent => "Sent",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Overdue => "Overdue",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        InvoiceStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: InvoiceStatus::ALL
                    .iter()
                    .map(|s| s.as_str().to_string())
                    .collect(),
            })
    }
}

// =============================================================================
// Expense Category
// =============================================================================

/// The closed set of expense categories.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub enum ExpenseCategory {
    #[default]
    Utilities,
    Rent,
    Salaries,
    Software,
    Travel,
    Misc,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 6] = [
        ExpenseCategory::Utilities,
        ExpenseCategory::Rent,
        ExpenseCategory::Salaries,
        ExpenseCategory::Software,
        ExpenseCategory::Travel,
        ExpenseCategory::Misc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::Rent => "Rent",
            ExpenseCategory::Salaries => "Salaries",
            ExpenseCategory::Software => "Software",
            ExpenseCategory::Travel => "Travel",
            ExpenseCategory::Misc => "Misc",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ExpenseCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "category".to_string(),
                allowed: ExpenseCategory::ALL
                    .iter()
                    .map(|c| c.as_str().to_string())
                    .collect(),
            })
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One billable line of an invoice.
///
/// Typed at the boundary: raw form text goes through
/// [`crate::validation::RawLineItem::parse`], which coerces anything
/// unparseable to zero before it gets here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    pub description: String,
    /// Units billed; fractional quantities (hours) are allowed.
    #[ts(as = "String")]
    pub quantity: Decimal,
    pub unit_price: Money,
    /// Discount as a percentage of the line base.
    pub discount: Percent,
    /// Full tax rate; split mode halves it per component.
    pub tax_rate: Percent,
}

impl LineItem {
    pub fn new(
        description: impl Into<String>,
        quantity: Decimal,
        unit_price: Money,
        discount: Percent,
        tax_rate: Percent,
    ) -> Self {
        LineItem {
            description: description.into(),
            quantity,
            unit_price,
            discount,
            tax_rate,
        }
    }

    /// An empty line: quantity 1, no price, no discount, the default rate.
    pub fn blank(default_tax_rate: Percent) -> Self {
        LineItem::new(
            String::new(),
            Decimal::ONE,
            Money::zero(),
            Percent::ZERO,
            default_tax_rate,
        )
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// A finalized invoice.
///
/// Created only by [`crate::invoice::finalize`]. The money fields are a
/// snapshot of the line computations taken at save time; they are never
/// recomputed from `items` on read. `status` is the only field that changes
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Invoice {
    pub(crate) id: String,
    pub(crate) sequence_number: String,
    #[ts(as = "String")]
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) customer_name: String,
    pub(crate) contact_info: String,
    pub(crate) tax_id: String,
    pub(crate) tax_mode: TaxMode,
    pub(crate) status: InvoiceStatus,
    pub(crate) items: Vec<LineItem>,
    pub(crate) subtotal: Money,
    pub(crate) tax_total: Money,
    pub(crate) total: Money,
    pub(crate) amount_due: Money,
}

impl Invoice {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn sequence_number(&self) -> &str {
        &self.sequence_number
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn contact_info(&self) -> &str {
        &self.contact_info
    }

    pub fn tax_id(&self) -> &str {
        &self.tax_id
    }

    pub fn tax_mode(&self) -> TaxMode {
        self.tax_mode
    }

    pub fn status(&self) -> InvoiceStatus {
        self.status
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Sum of taxable amounts (after discount, before tax).
    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn tax_total(&self) -> Money {
        self.tax_total
    }

    pub fn total(&self) -> Money {
        self.total
    }

    /// Equal to `total` at creation; partial payments are not tracked.
    pub fn amount_due(&self) -> Money {
        self.amount_due
    }

    /// Moves the invoice to `status`, returning the previous one.
    ///
    /// Any status may follow any other.
    pub fn set_status(&mut self, status: InvoiceStatus) -> InvoiceStatus {
        std::mem::replace(&mut self.status, status)
    }
}

// =============================================================================
// Expense
// =============================================================================

/// A recorded business expense. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Expense {
    pub id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub category: ExpenseCategory,
    pub description: String,
    pub amount: Money,
    /// Opaque attachment reference (file name, URL, ...). Never interpreted.
    pub receipt: Option<String>,
}

impl Expense {
    /// Text shown in listings: the description, or the category when blank.
    pub fn label(&self) -> &str {
        if self.description.trim().is_empty() {
            self.category.as_str()
        } else {
            &self.description
        }
    }
}

// =============================================================================
// Test Fixtures
// =============================================================================

#[cfg(test)]
impl Invoice {
    /// Invoice with hand-picked cached totals, for metrics tests.
    pub(crate) fn stub(
        status: InvoiceStatus,
        total: Money,
        tax_total: Money,
        created_at: DateTime<Utc>,
    ) -> Self {
        Invoice {
            id: format!("inv-{}", created_at.timestamp()),
            sequence_number: "INV-TEST-0000".to_string(),
            created_at,
            customer_name: "Test Customer".to_string(),
            contact_info: String::new(),
            tax_id: String::new(),
            tax_mode: TaxMode::Split,
            status,
            items: Vec::new(),
            subtotal: total - tax_total,
            tax_total,
            total,
            amount_due: total,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percent_half() {
        assert_eq!(Percent::from_whole(18).half(), Percent::from_whole(9));
        assert_eq!(Percent::from_whole(5).half(), Percent::new(dec!(2.5)));
    }

    #[test]
    fn test_percent_clamp_and_display() {
        let p = Percent::from_whole(140).clamp(Percent::ZERO, Percent::HUNDRED);
        assert_eq!(p, Percent::HUNDRED);
        assert_eq!(Percent::new(dec!(18.00)).to_string(), "18%");
        assert_eq!(Percent::new(dec!(2.5)).to_string(), "2.5%");
    }

    #[test]
    fn test_tax_mode_parsing() {
        assert_eq!("split".parse::<TaxMode>().unwrap(), TaxMode::Split);
        assert_eq!("GST".parse::<TaxMode>().unwrap(), TaxMode::Split);
        assert_eq!("igst".parse::<TaxMode>().unwrap(), TaxMode::Single);
        assert!("vat".parse::<TaxMode>().is_err());
        assert_eq!(TaxMode::default(), TaxMode::Split);
    }

    #[test]
    fn test_status_parsing_is_case_insensitive() {
        assert_eq!("paid".parse::<InvoiceStatus>().unwrap(), InvoiceStatus::Paid);
        assert_eq!(" Overdue ".parse::<InvoiceStatus>().unwrap(), InvoiceStatus::Overdue);
        let err = "cancelled".parse::<InvoiceStatus>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "status must be one of: [\"Draft\", \"Sent\", \"Paid\", \"Overdue\"]"
        );
    }

    #[test]
    fn test_confirmed_statuses() {
        assert!(InvoiceStatus::Paid.is_confirmed());
        assert!(InvoiceStatus::Sent.is_confirmed());
        assert!(!InvoiceStatus::Draft.is_confirmed());
        assert!(!InvoiceStatus::Overdue.is_confirmed());
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("rent".parse::<ExpenseCategory>().unwrap(), ExpenseCategory::Rent);
        assert!("Food".parse::<ExpenseCategory>().is_err());
    }

    #[test]
    fn test_status_moves_freely() {
        let mut invoice = Invoice::stub(
            InvoiceStatus::Paid,
            Money::from_major(100),
            Money::from_major(18),
            Utc::now(),
        );
        assert_eq!(invoice.set_status(InvoiceStatus::Draft), InvoiceStatus::Paid);
        assert_eq!(invoice.set_status(InvoiceStatus::Overdue), InvoiceStatus::Draft);
        assert_eq!(invoice.status(), InvoiceStatus::Overdue);
        // Cached totals untouched by status changes
        assert_eq!(invoice.total(), Money::from_major(100));
    }

    #[test]
    fn test_expense_label_falls_back_to_category() {
        let mut expense = Expense {
            id: "e1".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            category: ExpenseCategory::Travel,
            description: "  ".to_string(),
            amount: Money::from_major(30),
            receipt: None,
        };
        assert_eq!(expense.label(), "Travel");
        expense.description = "Cab to client".to_string();
        assert_eq!(expense.label(), "Cab to client");
    }

    #[test]
    fn test_blank_line_item() {
        let item = LineItem::blank(Percent::from_whole(18));
        assert_eq!(item.quantity, Decimal::ONE);
        assert!(item.unit_price.is_zero());
        assert_eq!(item.tax_rate, Percent::from_whole(18));
    }
}
