//! # Monthly Series
//!
//! Buckets dated records into `YYYY-MM` periods for charting.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  invoices ──► revenue_series ──┐                                        │
//! │  (created_at, UTC)             │                                        │
//! │                                ├──► merge_series ──► trailing_window   │
//! │  expenses ──► expense_series ──┘   (outer join,      (3m / 6m / 12m /  │
//! │  (date)                             missing = 0)      all)              │
//! │                                                                         │
//! │  Every series: ascending by period, one point per period, and only     │
//! │  periods that have data. Gaps are not filled.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::metrics::MetricsPolicy;
use crate::money::Money;
use crate::types::{Expense, Invoice};

// =============================================================================
// Period Key
// =============================================================================

/// A calendar month, rendered as `YYYY-MM`.
///
/// Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PeriodKey {
    year: i32,
    month: u32,
}

impl PeriodKey {
    /// Returns `None` unless `month` is in `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(PeriodKey { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        PeriodKey {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The period `months` months earlier.
    pub fn months_back(&self, months: u32) -> Self {
        let index = i64::from(self.year) * 12 + i64::from(self.month - 1) - i64::from(months);
        PeriodKey {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl From<PeriodKey> for String {
    fn from(key: PeriodKey) -> Self {
        key.to_string()
    }
}

impl FromStr for PeriodKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidFormat {
            field: "period".to_string(),
            reason: "expected YYYY-MM".to_string(),
        };

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        PeriodKey::new(year, month).ok_or_else(invalid)
    }
}

impl TryFrom<String> for PeriodKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// =============================================================================
// Series Builders
// =============================================================================

/// One bucket of a single-valued series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SeriesPoint {
    #[ts(as = "String")]
    pub period: PeriodKey,
    pub value: Money,
}

/// Groups `records` by the month of `date_of`, summing `value_of`.
///
/// ```rust
/// use billcraft_core::money::Money;
/// use billcraft_core::series::build_monthly_series;
/// use chrono::NaiveDate;
///
/// let d = |m, day| NaiveDate::from_ymd_opt(2026, m, day).unwrap();
/// let rows = [(d(2, 1), 10), (d(1, 5), 5), (d(2, 20), 7)];
///
/// let series = build_monthly_series(&rows, |r| r.0, |r| Money::from_major(r.1));
/// assert_eq!(series.len(), 2);
/// assert_eq!(series[0].period.to_string(), "2026-01");
/// assert_eq!(series[1].value, Money::from_major(17));
/// ```
pub fn build_monthly_series<'a, T, D, V>(
    records: impl IntoIterator<Item = &'a T>,
    date_of: D,
    value_of: V,
) -> Vec<SeriesPoint>
where
    T: 'a,
    D: Fn(&T) -> NaiveDate,
    V: Fn(&T) -> Money,
{
    let mut buckets: BTreeMap<PeriodKey, Money> = BTreeMap::new();
    for record in records {
        *buckets
            .entry(PeriodKey::from_date(date_of(record)))
            .or_default() += value_of(record);
    }

    buckets
        .into_iter()
        .map(|(period, value)| SeriesPoint { period, value })
        .collect()
}

/// Invoice totals per month of creation (UTC), restricted to the statuses
/// `policy.revenue_series` admits.
pub fn revenue_series(invoices: &[Invoice], policy: &MetricsPolicy) -> Vec<SeriesPoint> {
    build_monthly_series(
        invoices
            .iter()
            .filter(|inv| policy.revenue_series.includes(inv.status())),
        |inv| inv.created_at().date_naive(),
        |inv| inv.total(),
    )
}

/// Expense amounts per month of the expense date.
pub fn expense_series(expenses: &[Expense]) -> Vec<SeriesPoint> {
    build_monthly_series(expenses, |e| e.date, |e| e.amount)
}

// =============================================================================
// Merge
// =============================================================================

/// One period of the combined revenue/expense chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MergedPoint {
    #[ts(as = "String")]
    pub period: PeriodKey,
    pub revenue: Money,
    pub expenses: Money,
}

/// Outer-joins the two series on period; a missing side reads as zero.
pub fn merge_series(revenue: &[SeriesPoint], expenses: &[SeriesPoint]) -> Vec<MergedPoint> {
    let mut merged: BTreeMap<PeriodKey, (Money, Money)> = BTreeMap::new();

    for point in revenue {
        merged.entry(point.period).or_default().0 += point.value;
    }
    for point in expenses {
        merged.entry(point.period).or_default().1 += point.value;
    }

    merged
        .into_iter()
        .map(|(period, (revenue, expenses))| MergedPoint {
            period,
            revenue,
            expenses,
        })
        .collect()
}

// =============================================================================
// Range Window
// =============================================================================

/// How far back the analytics chart looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SeriesRange {
    ThreeMonths,
    #[default]
    SixMonths,
    TwelveMonths,
    All,
}

impl SeriesRange {
    /// Number of months covered, `None` for everything.
    pub fn months(&self) -> Option<u32> {
        match self {
            SeriesRange::ThreeMonths => Some(3),
            SeriesRange::SixMonths => Some(6),
            SeriesRange::TwelveMonths => Some(12),
            SeriesRange::All => None,
        }
    }
}

impl FromStr for SeriesRange {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "3m" => Ok(SeriesRange::ThreeMonths),
            "6m" => Ok(SeriesRange::SixMonths),
            "12m" => Ok(SeriesRange::TwelveMonths),
            "all" => Ok(SeriesRange::All),
            _ => Err(ValidationError::NotAllowed {
                field: "range".to_string(),
                allowed: ["3m", "6m", "12m", "all"].map(String::from).to_vec(),
            }),
        }
    }
}

/// Keeps the points inside the `range` months ending with the month of
/// `as_of` (inclusive). Points after `as_of` are kept too; future-dated
/// records are the user's to explain.
pub fn trailing_window(
    points: &[MergedPoint],
    range: SeriesRange,
    as_of: NaiveDate,
) -> Vec<MergedPoint> {
    let Some(months) = range.months() else {
        return points.to_vec();
    };

    let start = PeriodKey::from_date(as_of).months_back(months - 1);
    points
        .iter()
        .filter(|point| point.period >= start)
        .cloned()
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
