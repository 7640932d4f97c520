//! # API Error Type
//!
//! Unified error type for BillCraft commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in BillCraft                              │
//! │                                                                         │
//! │  billcraft invoice status 550e... Paid                                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Bad input? ───── ValidationError::NotAllowed ─────┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Unknown id? ──── CoreError::InvoiceNotFound ──── ApiError ────►│  │
//! │  │         │                                          ▲            │  │
//! │  │         ▼                                          │            │  │
//! │  │  Disk trouble? ── StoreError::Io ──────────────────┘            │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stderr:  error [NOT_FOUND]: Invoice not found: 550e...                 │
//! │  --json:  {"code":"NOT_FOUND","message":"Invoice not found: 550e..."}   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use billcraft_core::{CoreError, ValidationError};

use crate::state::ConfigError;
use crate::store::StoreError;

/// Error returned from commands.
///
/// ## Serialization
/// This is what `--json` callers receive on stderr when a command fails:
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "date has invalid format: expected YYYY-MM-DD"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No record with the given id
    NotFound,

    /// Input could not be parsed or was rejected
    ValidationError,

    /// Reading or writing the ledger file failed
    StorageError,

    /// Configuration could not be loaded or is invalid
    ConfigError,

    /// Anything else
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvoiceNotFound(id) => ApiError::not_found("Invoice", &id),
            CoreError::ExpenseNotFound(id) => ApiError::not_found("Expense", &id),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts ledger store errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        // Log the underlying cause, show a short message
        tracing::error!(error = %err, "Ledger store failure");
        match err {
            StoreError::Io(_) => {
                ApiError::new(ErrorCode::StorageError, "Could not access the ledger file")
            }
            StoreError::Serialization(e) => ApiError::new(
                ErrorCode::StorageError,
                format!("Ledger file is not valid: {}", e),
            ),
            StoreError::NoDataDir => ApiError::new(
                ErrorCode::StorageError,
                "Could not determine a data directory; set BILLCRAFT_DATA",
            ),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping() {
        let err: ApiError = CoreError::InvoiceNotFound("abc".to_string()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Invoice not found: abc");

        let err: ApiError = CoreError::ExpenseNotFound("e1".to_string()).into();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err: ApiError = ValidationError::Required {
            field: "date".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.to_string(), "[VALIDATION_ERROR] date is required");
    }

    #[test]
    fn test_store_error_mapping() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: ApiError = StoreError::Io(io).into();
        assert_eq!(err.code, ErrorCode::StorageError);
    }

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::not_found("Expense", "e1");
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"code":"NOT_FOUND","message":"Expense not found: e1"}"#);
    }
}
