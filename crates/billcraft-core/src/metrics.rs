//! # Metrics Engine
//!
//! Dashboard figures derived from the full invoice and expense collections.
//!
//! ## Status Scopes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Draft   Sent   Paid   Overdue                        │
//! │  revenue             ·      ✓      ✓       ·      (Confirmed)           │
//! │  collected_tax       ✓      ✓      ✓       ✓      (All)                 │
//! │  revenue_series      ✓      ✓      ✓       ✓      (All)                 │
//! │                                                                         │
//! │  MetricsPolicy::DEFAULT. Each row is configurable on its own.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The default keeps tax on drafts and overdue invoices in `collected_tax`
//! even though their totals are left out of `revenue`. Setting
//! `collected_tax` to `Confirmed` makes the two agree.
//!
//! Every function here is a pure fold over its input: recomputed from
//! scratch on each call, never cached.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Expense, ExpenseCategory, Invoice, InvoiceStatus, Percent};

// =============================================================================
// Policy
// =============================================================================

/// Which invoice statuses a metric counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StatusScope {
    /// Every invoice regardless of status.
    All,
    /// Paid and Sent only.
    Confirmed,
}

impl StatusScope {
    pub fn includes(&self, status: InvoiceStatus) -> bool {
        match self {
            StatusScope::All => true,
            StatusScope::Confirmed => status.is_confirmed(),
        }
    }
}

impl fmt::Display for StatusScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusScope::All => write!(f, "all"),
            StatusScope::Confirmed => write!(f, "confirmed"),
        }
    }
}

impl FromStr for StatusScope {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StatusScope::All),
            "confirmed" => Ok(StatusScope::Confirmed),
            _ => Err(ValidationError::NotAllowed {
                field: "status scope".to_string(),
                allowed: vec!["all".to_string(), "confirmed".to_string()],
            }),
        }
    }
}

/// One [`StatusScope`] per invoice-based metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MetricsPolicy {
    pub revenue: StatusScope,
    pub collected_tax: StatusScope,
    pub revenue_series: StatusScope,
}

impl MetricsPolicy {
    pub const DEFAULT: MetricsPolicy = MetricsPolicy {
        revenue: StatusScope::Confirmed,
        collected_tax: StatusScope::All,
        revenue_series: StatusScope::All,
    };
}

impl Default for MetricsPolicy {
    fn default() -> Self {
        MetricsPolicy::DEFAULT
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Headline dashboard figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MetricsSnapshot {
    pub revenue: Money,
    pub collected_tax: Money,
    pub expense_total: Money,
    /// `revenue - expense_total`; negative when expenses exceed revenue.
    pub net: Money,
}

/// Computes the headline figures.
///
/// ## Example
/// ```rust
/// use billcraft_core::metrics::{summarize, MetricsPolicy};
///
/// let snapshot = summarize(&[], &[], &MetricsPolicy::DEFAULT);
/// assert!(snapshot.revenue.is_zero());
/// assert!(snapshot.net.is_zero());
/// ```
pub fn summarize(
    invoices: &[Invoice],
    expenses: &[Expense],
    policy: &MetricsPolicy,
) -> MetricsSnapshot {
    let revenue: Money = invoices
        .iter()
        .filter(|inv| policy.revenue.includes(inv.status()))
        .map(Invoice::total)
        .sum();

    let collected_tax: Money = invoices
        .iter()
        .filter(|inv| policy.collected_tax.includes(inv.status()))
        .map(Invoice::tax_total)
        .sum();

    let expense_total: Money = expenses.iter().map(|e| e.amount).sum();

    MetricsSnapshot {
        revenue,
        collected_tax,
        expense_total,
        net: revenue - expense_total,
    }
}

/// Total expense amount per category. Categories without expenses are
/// absent.
pub fn split_by_category(expenses: &[Expense]) -> BTreeMap<ExpenseCategory, Money> {
    let mut split = BTreeMap::new();
    for expense in expenses {
        *split.entry(expense.category).or_insert_with(Money::zero) += expense.amount;
    }
    split
}

// =============================================================================
// Ratios
// =============================================================================

/// `part` as a percentage of `total`, clamped to `[0, 100]`.
///
/// Returns zero when `total` or `part` is zero or negative. A positive ratio
/// too large for a decimal is past the upper clamp, so it reads as 100.
///
/// ```rust
/// use billcraft_core::metrics::safe_percent;
/// use billcraft_core::money::Money;
/// use billcraft_core::types::Percent;
///
/// assert_eq!(safe_percent(Money::from_major(25), Money::from_major(200)).to_string(), "12.5%");
/// assert_eq!(safe_percent(Money::from_major(5), Money::zero()), Percent::ZERO);
/// assert_eq!(safe_percent(Money::from_major(300), Money::from_major(200)), Percent::HUNDRED);
/// ```
pub fn safe_percent(part: Money, total: Money) -> Percent {
    if !total.is_positive() || !part.is_positive() {
        return Percent::ZERO;
    }

    part.amount()
        .checked_div(total.amount())
        .and_then(|ratio| ratio.checked_mul(rust_decimal::Decimal::ONE_HUNDRED))
        .map(|value| Percent::new(value).clamp(Percent::ZERO, Percent::HUNDRED))
        .unwrap_or(Percent::HUNDRED)
}

/// Progress-bar shares shown under the dashboard cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardShares {
    pub tax_share: Percent,
    pub expense_share: Percent,
    pub profit_share: Percent,
}

/// Tax, expense and net profit, each as a share of revenue.
pub fn dashboard_shares(snapshot: &MetricsSnapshot) -> DashboardShares {
    DashboardShares {
        tax_share: safe_percent(snapshot.collected_tax, snapshot.revenue),
        expense_share: safe_percent(snapshot.expense_total, snapshot.revenue),
        profit_share: safe_percent(snapshot.net, snapshot.revenue),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
