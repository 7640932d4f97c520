//! # Report Commands
//!
//! Read-only views over the ledger. Which invoice statuses count toward
//! each figure comes from `config.metrics`.
//!
//! ```text
//! summary ──► summarize()            revenue / collected tax / expenses / net
//! series  ──► revenue_series() ─┐
//!             expense_series() ─┴─► merge_series() ──► trailing_window()
//! split   ──► split_by_category()
//! shares  ──► summarize() ──► dashboard_shares()
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use billcraft_core::metrics::{dashboard_shares, split_by_category, summarize, DashboardShares};
use billcraft_core::series::{expense_series, merge_series, revenue_series, trailing_window};
use billcraft_core::{ExpenseCategory, MergedPoint, MetricsSnapshot, Money, SeriesRange};

use super::{format_percent, report_header, Render};
use crate::error::ApiError;
use crate::state::{ConfigState, LedgerState};

#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    #[serde(flatten)]
    pub snapshot: MetricsSnapshot,
    pub invoice_count: usize,
    pub expense_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesResponse {
    pub range: SeriesRange,
    pub points: Vec<MergedPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SplitResponse {
    pub categories: BTreeMap<ExpenseCategory, Money>,
    pub total: Money,
}

#[derive(Debug, Clone, Serialize)]
pub struct SharesResponse {
    pub snapshot: MetricsSnapshot,
    pub shares: DashboardShares,
}

pub fn summary(config: &ConfigState, ledger: &LedgerState) -> SummaryResponse {
    debug!(policy = ?config.metrics, "report summary command");
    ledger.with_ledger(|l| SummaryResponse {
        snapshot: summarize(l.invoices(), l.expenses(), &config.metrics),
        invoice_count: l.invoices().len(),
        expense_count: l.expenses().len(),
    })
}

/// Monthly revenue against expenses, limited to the trailing `range`
/// ending with the current month.
pub fn series(
    config: &ConfigState,
    ledger: &LedgerState,
    range: &str,
    now: DateTime<Utc>,
) -> Result<SeriesResponse, ApiError> {
    debug!(range = %range, "report series command");

    let range: SeriesRange = range.parse()?;
    let merged = ledger.with_ledger(|l| {
        merge_series(
            &revenue_series(l.invoices(), &config.metrics),
            &expense_series(l.expenses()),
        )
    });

    Ok(SeriesResponse {
        range,
        points: trailing_window(&merged, range, now.date_naive()),
    })
}

pub fn split(ledger: &LedgerState) -> SplitResponse {
    debug!("report split command");
    ledger.with_ledger(|l| SplitResponse {
        categories: split_by_category(l.expenses()),
        total: l.expense_total(),
    })
}

pub fn shares(config: &ConfigState, ledger: &LedgerState) -> SharesResponse {
    debug!("report shares command");
    let snapshot = ledger.with_ledger(|l| summarize(l.invoices(), l.expenses(), &config.metrics));
    SharesResponse {
        shares: dashboard_shares(&snapshot),
        snapshot,
    }
}

// =============================================================================
// Rendering
// =============================================================================

impl Render for SummaryResponse {
    fn render(&self, config: &ConfigState) -> String {
        let s = &self.snapshot;
        format!(
            "{}\n\
             Revenue        {:>18}  ({} invoices)\n\
             Collected tax  {:>18}\n\
             Expenses       {:>18}  ({} entries)\n\
             Net            {:>18}",
            report_header(config),
            config.format_currency(s.revenue),
            self.invoice_count,
            config.format_currency(s.collected_tax),
            config.format_currency(s.expense_total),
            self.expense_count,
            config.format_currency(s.net),
        )
    }
}

impl Render for SeriesResponse {
    fn render(&self, config: &ConfigState) -> String {
        if self.points.is_empty() {
            return "No activity in this range".to_string();
        }

        let mut out = format!("{:<8} {:>18} {:>18}", "Month", "Revenue", "Expenses");
        for point in &self.points {
            let _ = write!(
                out,
                "\n{:<8} {:>18} {:>18}",
                point.period.to_string(),
                config.format_currency(point.revenue),
                config.format_currency(point.expenses),
            );
        }
        out
    }
}

impl Render for SplitResponse {
    fn render(&self, config: &ConfigState) -> String {
        if self.categories.is_empty() {
            return "No expenses yet".to_string();
        }

        let mut out = String::new();
        for (category, amount) in &self.categories {
            let amount = config.format_currency(*amount);
            let _ = writeln!(out, "{:<10} {:>18}", category.as_str(), amount);
        }
        let _ = write!(out, "{:<10} {:>18}", "Total", config.format_currency(self.total));
        out
    }
}

impl Render for SharesResponse {
    fn render(&self, _config: &ConfigState) -> String {
        format!(
            "Tax share      {}\nExpense share  {}\nProfit share   {}",
            format_percent(self.shares.tax_share),
            format_percent(self.shares.expense_share),
            format_percent(self.shares.profit_share),
        )
    }
}
