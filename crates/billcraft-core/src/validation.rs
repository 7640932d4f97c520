//! # Validation Module
//!
//! Boundary parsing for BillCraft: turns the text a user typed into typed
//! values, and flags values the calculators accept but a user probably
//! did not mean.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI arguments (clap)                                         │
//! │  └── Presence of flags, subcommand shape                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Coercion: "abc" → 0, " 12.50 " → 12.50      (never fails)         │
//! │  ├── Rejection: bad date, bad id, negative expense  (Err)              │
//! │  └── Flags: discount 150%, negative rate            (Vec of warnings)  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Calculators                                                  │
//! │  └── Total over typed input: clamp taxable at 0, saturate on overflow  │
//! │                                                                         │
//! │  Flags are logged by the app and the record is still saved             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use billcraft_core::validation::{coerce_decimal, parse_date};
//! use rust_decimal::Decimal;
//!
//! assert_eq!(coerce_decimal("12.50"), Decimal::new(1250, 2));
//! assert_eq!(coerce_decimal("twelve"), Decimal::ZERO);
//! assert!(parse_date("2026-02-30").is_err());
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{LineItem, Percent};
use crate::MAX_TEXT_LENGTH;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Coercion
// =============================================================================

/// Parses a decimal from free-form input, falling back to zero.
///
/// Accepts plain (`"1062.50"`) and scientific (`"1e3"`) notation after
/// trimming whitespace. Empty or non-numeric text becomes `0`.
pub fn coerce_decimal(raw: &str) -> Decimal {
    let raw = raw.trim();
    if raw.is_empty() {
        return Decimal::ZERO;
    }

    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .unwrap_or(Decimal::ZERO)
}

/// A line item exactly as entered: every numeric field still text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawLineItem {
    pub description: String,
    pub quantity: String,
    pub unit_price: String,
    pub discount: String,
    pub tax_rate: String,
}

impl RawLineItem {
    /// Coerces every numeric field with [`coerce_decimal`].
    ///
    /// Never fails; use [`validate_line_item`] on the result to find values
    /// worth warning about.
    pub fn parse(&self) -> LineItem {
        LineItem::new(
            self.description.trim(),
            coerce_decimal(&self.quantity),
            Money::new(coerce_decimal(&self.unit_price)),
            Percent::new(coerce_decimal(&self.discount)),
            Percent::new(coerce_decimal(&self.tax_rate)),
        )
    }
}

// =============================================================================
// Line Item Flags
// =============================================================================

/// Lists the suspicious values on a line.
///
/// ## Flags
/// - discount outside `[0, 100]`
/// - negative quantity, unit price or tax rate
///
/// An empty vector means nothing to report. The line stays computable
/// either way.
pub fn validate_line_item(item: &LineItem) -> Vec<ValidationError> {
    let mut flags = Vec::new();

    if item.discount < Percent::ZERO || item.discount > Percent::HUNDRED {
        flags.push(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: "0".to_string(),
            max: "100".to_string(),
        });
    }

    if item.quantity < Decimal::ZERO {
        flags.push(ValidationError::MustBeNonNegative {
            field: "quantity".to_string(),
        });
    }

    if item.unit_price.is_negative() {
        flags.push(ValidationError::MustBeNonNegative {
            field: "unit price".to_string(),
        });
    }

    if item.tax_rate.is_negative() {
        flags.push(ValidationError::MustBeNonNegative {
            field: "tax rate".to_string(),
        });
    }

    flags
}

// =============================================================================
// Expense Validators
// =============================================================================

/// Parses an expense amount.
///
/// ## Rules
/// - Non-numeric text coerces to zero (zero is allowed)
/// - Must not be negative
///
/// ```rust
/// use billcraft_core::validation::validate_expense_amount;
///
/// assert!(validate_expense_amount("499.99").is_ok());
/// assert!(validate_expense_amount("").unwrap().is_zero());
/// assert!(validate_expense_amount("-5").is_err());
/// ```
pub fn validate_expense_amount(raw: &str) -> ValidationResult<Money> {
    let amount = Money::new(coerce_decimal(raw));

    if amount.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: "amount".to_string(),
        });
    }

    Ok(amount)
}

/// Parses a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(raw: &str) -> ValidationResult<NaiveDate> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: "date".to_string(),
        });
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| ValidationError::InvalidFormat {
        field: "date".to_string(),
        reason: "expected YYYY-MM-DD".to_string(),
    })
}

// =============================================================================
// String Validators
// =============================================================================

/// Checks a free-text field against a length cap and returns it trimmed.
///
/// Empty text is allowed; callers that need a value check for it.
pub fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// [`validate_text`] with the default cap.
pub fn validate_short_text(field: &str, value: &str) -> ValidationResult<String> {
    validate_text(field, value, MAX_TEXT_LENGTH)
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a record id (UUID) and returns it in canonical lowercase form.
///
/// ```rust
/// use billcraft_core::validation::validate_record_id;
///
/// assert!(validate_record_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_record_id("not-a-uuid").is_err());
/// ```
pub fn validate_record_id(id: &str) -> ValidationResult<String> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    let parsed = uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(parsed.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================
