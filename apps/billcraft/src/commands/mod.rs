//! # Commands Module
//!
//! Everything the CLI can do.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (output plumbing)
//! ├── invoice.rs  ◄─── Draft, preview, save, list, status, delete
//! ├── expense.rs  ◄─── Add, list, remove
//! └── report.rs   ◄─── Summary, monthly series, category split, shares
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  fn create_invoice(                                                     │
//! │      config: &ConfigState,    ◄── only the state it needs              │
//! │      ledger: &LedgerState,                                              │
//! │      store:  &LedgerStore,                                              │
//! │      args:   &InvoiceArgs,    ◄── parsed by clap                       │
//! │      now:    DateTime<Utc>,   ◄── clock passed in (tests pin it)       │
//! │  ) -> Result<InvoiceResponse, ApiError>                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  emit(&response, json, config)                                          │
//! │         ├── --json ──► serde_json (core types serialize as-is)         │
//! │         └── text ────► Render::render (currency formatting)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod expense;
pub mod invoice;
pub mod report;

use serde::Serialize;

use crate::error::ApiError;
use crate::state::ConfigState;

/// Human-readable rendering of a command response.
pub trait Render {
    fn render(&self, config: &ConfigState) -> String;
}

/// Turns a response into the text printed on stdout.
pub fn emit<T>(value: &T, json: bool, config: &ConfigState) -> Result<String, ApiError>
where
    T: Serialize + Render,
{
    if json {
        serde_json::to_string_pretty(value)
            .map_err(|e| ApiError::internal(format!("Could not serialize output: {}", e)))
    } else {
        Ok(value.render(config))
    }
}

/// `Acme Studio (INR)`: first line of summaries and saved invoices.
pub(crate) fn report_header(config: &ConfigState) -> String {
    format!("{} ({})", config.business_name, config.currency_code)
}

/// Percentages on screen get one decimal.
pub(crate) fn format_percent(p: billcraft_core::Percent) -> String {
    p.rounded(1).to_string()
}
