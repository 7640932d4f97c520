//! # BillCraft Entry Point
//!
//! ## Application Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        BillCraft CLI                                    │
//! │                                                                         │
//! │  main.rs ────► hands off to billcraft_lib::run()                       │
//! │                                                                         │
//! │  lib.rs ─────► tracing, config, ledger load, dispatch                  │
//! │                                                                         │
//! │  commands/ ──► invoice, expense, report                                │
//! │                                                                         │
//! │  state/ ─────► ConfigState, LedgerState                                │
//! │                                                                         │
//! │  store.rs ───► ledger.json (read on start, written after each change)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    billcraft_lib::run()
}
