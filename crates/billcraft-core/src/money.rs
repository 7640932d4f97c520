//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  THE INTEGER CENTS PROBLEM (split tax)                                  │
//! │    taxable ₹0.05 at 18% single tax  = 0.9 paise → 1 paisa              │
//! │    taxable ₹0.05 at 9% + 9% split   = 0.45 + 0.45 → 0 + 0 paise        │
//! │    The two modes disagree on the same invoice ❌                        │
//! │                                                                         │
//! │  OUR SOLUTION: Exact base-10 decimals                                   │
//! │    0.45 + 0.45 = 0.90 exactly, same as the single tax                   │
//! │    Rounding happens once, when an amount is displayed                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use billcraft_core::money::Money;
//! use billcraft_core::types::Percent;
//!
//! let price = Money::from_major(500);
//! let base = price.multiply_quantity(2.into());      // 1000
//! let tax = base.percentage(Percent::from_whole(18)); // 180
//! assert_eq!(tax, Money::from_major(180));
//! ```
//!
//! Arithmetic saturates at the decimal range instead of panicking, so the
//! calculators stay total over every input they can be handed.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::types::Percent;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in the (single) business currency.
///
/// ## Design Decisions
/// - **Decimal (signed)**: negative values appear in derived figures such as
///   `net` when expenses exceed revenue
/// - **No currency symbol**: formatting is the renderer's job
/// - **Serialized as a string**: `"1062.00"` survives any JSON parser intact
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  LineItem.unit_price ──► LineComputation.base ──► taxable ──► total    │
/// │                                                                         │
/// │  Σ line totals ──► Invoice.total ──► MetricsSnapshot.revenue           │
/// │                                                                         │
/// │  Expense.amount ──► MetricsSnapshot.expense_total ──► net              │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct Money(#[ts(as = "String")] Decimal);

impl Money {
    /// Wraps an exact decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a whole-unit amount (rupees, dollars, ...).
    ///
    /// ```rust
    /// use billcraft_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(1062).to_string(), "1062.00");
    /// ```
    #[inline]
    pub fn from_major(major: i64) -> Self {
        Money(Decimal::from(major))
    }

    /// Returns the underlying decimal.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Clamps negative amounts to zero.
    ///
    /// Used for the taxable amount: a discount larger than the base never
    /// produces a negative line.
    #[inline]
    pub fn floor_at_zero(self) -> Self {
        if self.is_negative() {
            Money::zero()
        } else {
            self
        }
    }

    /// Multiplies by a (possibly fractional) quantity.
    ///
    /// ```rust
    /// use billcraft_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let hourly = Money::from_major(1200);
    /// let billed = hourly.multiply_quantity(Decimal::new(15, 1)); // 1.5 h
    /// assert_eq!(billed, Money::from_major(1800));
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: Decimal) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Returns `rate` percent of this amount, exactly.
    ///
    /// ## User Workflow
    /// ```text
    /// Line base: 1000
    ///      │
    ///      ▼
    /// percentage(10%) ← discount
    ///      │
    ///      ▼
    /// Taxable: 900 ──► percentage(18%) ← tax ──► 162
    /// ```
    pub fn percentage(&self, rate: Percent) -> Money {
        Money(self.0.saturating_mul(rate.value()) / Decimal::ONE_HUNDRED)
    }

    /// Rounds to `dp` decimal places, half away from zero.
    ///
    /// Only used on the way out (display, exports); calculations keep the
    /// exact value.
    pub fn rounded(&self, dp: u32) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain two-decimal rendering without a currency symbol.
///
/// ## Note
/// For debugging and machine output. Localized display with a symbol and
/// digit grouping lives in the app's configuration.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.rounded(2).0)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by a decimal factor (quantities).
impl Mul<Decimal> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: Decimal) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
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
    fn test_from_major() {
        let money = Money::from_major(1099);
        assert_eq!(money.amount(), dec!(1099));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::new(dec!(10.99)).to_string(), "10.99");
        assert_eq!(Money::from_major(5).to_string(), "5.00");
        assert_eq!(Money::new(dec!(-5.5)).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
        assert_eq!(Money::new(dec!(0.005)).to_string(), "0.01");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_major(1000);
        let b = Money::from_major(500);

        assert_eq!(a + b, Money::from_major(1500));
        assert_eq!(a - b, Money::from_major(500));
        assert_eq!(b - a, Money::from_major(-500));
        assert_eq!(a * dec!(3), Money::from_major(3000));
        assert_eq!(-a, Money::from_major(-1000));
    }

    #[test]
    fn test_percentage_is_exact() {
        // 5 paise at 9% twice equals 5 paise at 18% once
        let taxable = Money::new(dec!(0.05));
        let half = taxable.percentage(Percent::new(dec!(9)));
        let full = taxable.percentage(Percent::new(dec!(18)));
        assert_eq!(half + half, full);
        assert_eq!(full.amount(), dec!(0.009));
    }

    #[test]
    fn test_floor_at_zero() {
        assert_eq!(Money::from_major(-1).floor_at_zero(), Money::zero());
        assert_eq!(Money::from_major(7).floor_at_zero(), Money::from_major(7));
    }

    #[test]
    fn test_rounded_half_away_from_zero() {
        assert_eq!(Money::new(dec!(2.345)).rounded(2).amount(), dec!(2.35));
        assert_eq!(Money::new(dec!(-2.345)).rounded(2).amount(), dec!(-2.35));
    }

    #[test]
    fn test_saturates_instead_of_panicking() {
        let huge = Money::new(Decimal::MAX);
        assert_eq!(huge + huge, Money::new(Decimal::MAX));
        assert_eq!(huge.multiply_quantity(dec!(10)), Money::new(Decimal::MAX));
    }

    #[test]
    fn test_sum() {
        let total: Money = [Money::from_major(1), Money::from_major(2)].iter().sum();
        assert_eq!(total, Money::from_major(3));
        let empty: Money = Vec::<Money>::new().into_iter().sum();
        assert!(empty.is_zero());
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Money::new(dec!(1062.50))).unwrap();
        assert_eq!(json, "\"1062.50\"");
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Money::new(dec!(1062.5)));
    }
}
