//! # State Module
//!
//! Manages application state for the CLI.
//!
//! ## Why Multiple State Types?
//! Instead of a single `AppState` struct, each concern gets its own type and
//! every command takes only what it needs:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      run()                                      │   │
//! │  │  let config = ConfigState::load(cli.config)?;                   │   │
//! │  │  let store  = LedgerStore::locate(config.data_file)?;           │   │
//! │  │  let ledger = LedgerState::new(store.load()?);                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │              ┌───────────────┴──────────────┐                          │
//! │              ▼                              ▼                           │
//! │  ┌──────────────────────┐      ┌──────────────────────────┐            │
//! │  │    ConfigState       │      │      LedgerState         │            │
//! │  │                      │      │                          │            │
//! │  │  currency, grouping  │      │  Arc<Mutex<Ledger>>      │            │
//! │  │  default tax rate    │      │  invoices, expenses,     │            │
//! │  │  numbering, metrics  │      │  numbering counter       │            │
//! │  └──────────────────────┘      └──────────────────────────┘            │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • ConfigState: Read-only after loading                                │
//! │  • LedgerState: Protected by Arc<Mutex<T>> for exclusive access        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod ledger;

pub use config::{ConfigError, ConfigState, DigitGrouping};
pub use ledger::{Ledger, LedgerState};
