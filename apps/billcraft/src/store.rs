//! # Ledger Store
//!
//! Persists the ledger as a single JSON document.
//!
//! ## File Layout
//! ```json
//! {
//!   "invoices": [ { "id": "...", "sequence_number": "INV-2026-0001", ... } ],
//!   "expenses": [ { "id": "...", "date": "2026-03-01", ... } ],
//!   "issued_sequence": 1
//! }
//! ```
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  serialize ──► ledger.json.tmp ──► rename ──► ledger.json              │
//! │                                                                         │
//! │  A crash mid-write leaves the previous ledger.json in place.           │
//! │  A missing ledger.json loads as an empty ledger.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use thiserror::Error;
use tracing::{debug, info};

use crate::state::Ledger;

/// File name used inside the platform data directory.
pub const LEDGER_FILE_NAME: &str = "ledger.json";

/// Errors from reading or writing the ledger file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No data directory available")]
    NoDataDir,
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// The JSON ledger file.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LedgerStore { path: path.into() }
    }

    /// Store at `override_path`, or `ledger.json` in the platform data dir.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.billcraft.billcraft/ledger.json`
    /// - **Windows**: `%APPDATA%\billcraft\billcraft\data\ledger.json`
    /// - **Linux**: `~/.local/share/billcraft/ledger.json`
    pub fn locate(override_path: Option<&Path>) -> StoreResult<Self> {
        if let Some(path) = override_path {
            return Ok(LedgerStore::new(path));
        }

        let dirs = ProjectDirs::from("com", "billcraft", "billcraft").ok_or(StoreError::NoDataDir)?;
        Ok(LedgerStore::new(dirs.data_dir().join(LEDGER_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the ledger. A missing file is an empty ledger.
    pub fn load(&self) -> StoreResult<Ledger> {
        if !self.path.exists() {
            debug!(path = ?self.path, "Ledger file not found, starting empty");
            return Ok(Ledger::default());
        }

        let contents = fs::read_to_string(&self.path)?;
        let mut ledger: Ledger = serde_json::from_str(&contents)?;
        ledger.reconcile_counter();

        debug!(
            path = ?self.path,
            invoices = ledger.invoices().len(),
            expenses = ledger.expenses().len(),
            "Ledger loaded"
        );
        Ok(ledger)
    }

    /// Writes the ledger through a temp file and a rename.
    pub fn save(&self, ledger: &Ledger) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = serde_json::to_string_pretty(ledger)?;
        let tmp = self.temp_path();
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;

        info!(path = ?self.path, "Ledger saved");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| LEDGER_FILE_NAME.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use billcraft_core::{
        Expense, ExpenseCategory, InvoiceDraft, Money, NumberingPolicy, Percent, TaxMode,
    };
    use chrono::{NaiveDate, TimeZone, Utc};
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty_ledger() {
        let dir = TempDir::new().unwrap();
        let store = LedgerStore::new(dir.path().join("ledger.json"));

        let ledger = store.load().unwrap();
        assert!(ledger.invoices().is_empty());
        assert!(ledger.expenses().is_empty());
        assert_eq!(ledger.issued_sequence(), 0);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let store = LedgerStore::new(dir.path().join("nested").join("ledger.json"));

        let mut ledger = Ledger::default();
        let draft = InvoiceDraft::new(TaxMode::Split, Percent::from_whole(18));
        let at = Utc.with_ymd_and_hms(2026, 4, 1, 12, 0, 0).unwrap();
        ledger.issue_invoice(draft, NumberingPolicy::Monotonic, "inv-1".to_string(), at);
        ledger.add_expense(Expense {
            id: "exp-1".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
            category: ExpenseCategory::Software,
            description: "Editor licence".to_string(),
            amount: Money::from_major(99),
            receipt: Some("receipt.pdf".to_string()),
        });

        store.save(&ledger).unwrap();
        assert!(store.path().exists());
        assert!(!store.temp_path().exists());

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.invoices(), ledger.invoices());
        assert_eq!(reloaded.expenses(), ledger.expenses());
        assert_eq!(reloaded.issued_sequence(), 1);
    }

    #[test]
    fn test_counter_catches_up_with_stored_numbers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.json");

        // Older file without the counter field
        let mut ledger = Ledger::default();
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        for n in 0..3 {
            let draft = InvoiceDraft::new(TaxMode::Single, Percent::from_whole(5));
            ledger.issue_invoice(draft, NumberingPolicy::CollectionSize, format!("id-{n}"), at);
        }
        let mut json: serde_json::Value = serde_json::to_value(&ledger).unwrap();
        json.as_object_mut().unwrap().remove("issued_sequence");
        fs::write(&path, serde_json::to_string(&json).unwrap()).unwrap();

        let reloaded = LedgerStore::new(&path).load().unwrap();
        assert_eq!(reloaded.issued_sequence(), 3);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.json");
        fs::write(&path, "{ not json").unwrap();

        let err = LedgerStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
