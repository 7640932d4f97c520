//! # Error Types
//!
//! Domain-specific error types for billcraft-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  billcraft-core errors (this file)                                     │
//! │  ├── CoreError        - Record lookups by id                           │
//! │  └── ValidationError  - Boundary parsing failures                      │
//! │                                                                         │
//! │  apps/billcraft errors                                                 │
//! │  ├── StoreError       - Ledger file failures                           │
//! │  ├── ConfigError      - Configuration failures                         │
//! │  └── ApiError         - What the user sees (code + message)            │
//! │                                                                         │
//! │  Flow: ValidationError or CoreError → ApiError → stderr / JSON         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The calculators themselves never return errors: every line, invoice and
//! metric is defined for any typed input. Errors only exist where text is
//! turned into types and where records are looked up by id.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No invoice with this id in the supplied collection.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(String),

    /// No expense with this id in the supplied collection.
    #[error("Expense not found: {0}")]
    ExpenseNotFound(String),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors raised while turning raw text into typed values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
    },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g., invalid UUID, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
