//! # Invoice Numbering
//!
//! Human-readable sequence numbers of the form `INV-2026-0007`.
//!
//! ## Policies
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Save #1, #2, #3, delete #3, save again                                │
//! │                                                                         │
//! │  CollectionSize   n = len + 1        0001 0002 0003 ✗ → 0003 (reused)  │
//! │  Monotonic        n = counter + 1    0001 0002 0003 ✗ → 0004           │
//! │                                                                         │
//! │  Monotonic counter: starts at 0, +1 per save, never decremented,       │
//! │  raised on load to the largest number already on file                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The year in the number is the year of the invoice's creation date; the
//! counter itself is not reset per year.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::{INVOICE_NUMBER_PREFIX, INVOICE_NUMBER_WIDTH};

/// How the next sequence number is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum NumberingPolicy {
    /// Number of stored invoices plus one. Numbers can repeat after a
    /// deletion.
    CollectionSize,
    /// A persisted counter that only moves forward.
    #[default]
    Monotonic,
}

impl fmt::Display for NumberingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberingPolicy::CollectionSize => write!(f, "collection_size"),
            NumberingPolicy::Monotonic => write!(f, "monotonic"),
        }
    }
}

impl FromStr for NumberingPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "collection_size" | "count" => Ok(NumberingPolicy::CollectionSize),
            "monotonic" => Ok(NumberingPolicy::Monotonic),
            _ => Err(ValidationError::NotAllowed {
                field: "numbering policy".to_string(),
                allowed: vec!["collection_size".to_string(), "monotonic".to_string()],
            }),
        }
    }
}

/// The last sequence number handed out under [`NumberingPolicy::Monotonic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct InvoiceCounter(u32);

impl InvoiceCounter {
    pub const fn new(issued: u32) -> Self {
        InvoiceCounter(issued)
    }

    /// Highest number issued so far (0 when nothing has been issued).
    pub const fn issued(&self) -> u32 {
        self.0
    }

    /// Advances the counter and returns the new number.
    pub fn next(&mut self) -> u32 {
        self.0 = self.0.saturating_add(1);
        self.0
    }

    /// Raises the counter to `seen` if it is behind. Never lowers it.
    pub fn observe(&mut self, seen: u32) {
        self.0 = self.0.max(seen);
    }

    /// Raises the counter past every parseable number in `numbers`.
    pub fn observe_all<'a>(&mut self, numbers: impl IntoIterator<Item = &'a str>) {
        for number in numbers {
            if let Some((_, seq)) = parse_invoice_number(number) {
                self.observe(seq);
            }
        }
    }
}

/// Picks the next sequence number under `policy`.
///
/// `existing` is the number of invoices currently stored. The counter only
/// moves under [`NumberingPolicy::Monotonic`].
pub fn next_sequence(
    policy: NumberingPolicy,
    existing: usize,
    counter: &mut InvoiceCounter,
) -> u32 {
    match policy {
        NumberingPolicy::CollectionSize => {
            let n = u32::try_from(existing).unwrap_or(u32::MAX).saturating_add(1);
            // Keep the counter ahead so switching policies never goes back
            counter.observe(n);
            n
        }
        NumberingPolicy::Monotonic => counter.next(),
    }
}

/// Formats `INV-{year}-{seq}` with the sequence zero-padded to four digits.
///
/// ```rust
/// use billcraft_core::numbering::format_invoice_number;
///
/// assert_eq!(format_invoice_number(2026, 7), "INV-2026-0007");
/// assert_eq!(format_invoice_number(2026, 12345), "INV-2026-12345");
/// ```
pub fn format_invoice_number(year: i32, seq: u32) -> String {
    format!(
        "{}-{}-{:0width$}",
        INVOICE_NUMBER_PREFIX,
        year,
        seq,
        width = INVOICE_NUMBER_WIDTH
    )
}

/// Recovers `(year, seq)` from a stored number. `None` if it does not
/// follow the `INV-{year}-{seq}` shape.
pub fn parse_invoice_number(number: &str) -> Option<(i32, u32)> {
    let mut parts = number.trim().splitn(3, '-');

    if parts.next()? != INVOICE_NUMBER_PREFIX {
        return None;
    }
    let year = parts.next()?.parse::<i32>().ok()?;
    let seq = parts.next()?;
    if seq.is_empty() || !seq.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some((year, seq.parse().ok()?))
}

// =============================================================================
// Unit Tests
// =============================================================================
