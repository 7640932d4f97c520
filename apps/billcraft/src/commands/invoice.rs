//! # Invoice Commands
//!
//! ## Invoice Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Invoice Lifecycle                                    │
//! │                                                                         │
//! │  ┌──────────┐   preview_invoice   ┌──────────┐   create_invoice        │
//! │  │  --item  │────────────────────►│  Draft   │──────────────────┐      │
//! │  │  flags   │   (nothing saved)   │ preview  │                  │      │
//! │  └──────────┘                     └──────────┘                  ▼      │
//! │                                                          ┌──────────┐  │
//! │        update_invoice_status (any → any) ◄──────────────│ Invoice  │  │
//! │        delete_invoice ◄─────────────────────────────────│ (saved)  │  │
//! │                                                          └──────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use billcraft_core::validation::{
    validate_line_item, validate_record_id, validate_short_text, RawLineItem,
};
use billcraft_core::{
    DraftPreview, Invoice, InvoiceDraft, InvoiceStatus, InvoiceTotals, LineComputation, Percent,
    TaxMode,
};

use super::{format_percent, report_header, Render};
use crate::cli::InvoiceArgs;
use crate::error::ApiError;
use crate::state::{ConfigState, LedgerState};
use crate::store::LedgerStore;

// =============================================================================
// Responses
// =============================================================================

/// One previewed line: what was typed and what it computes to.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewLine {
    pub description: String,
    pub tax_rate: Percent,
    pub computation: LineComputation,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewResponse {
    pub tax_mode: TaxMode,
    pub lines: Vec<PreviewLine>,
    pub totals: InvoiceTotals,
    /// Suspicious values found while parsing (still computed).
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceResponse {
    pub invoice: Invoice,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceListResponse {
    pub invoices: Vec<Invoice>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusChangeResponse {
    pub invoice: Invoice,
    pub previous: InvoiceStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletedInvoiceResponse {
    pub id: String,
    pub sequence_number: String,
}

// =============================================================================
// Draft Building
// =============================================================================

/// Splits `"desc|qty|price|discount|rate"` into raw fields.
///
/// Missing trailing fields take quantity 1, price 0, discount 0 and
/// `default_tax_rate`.
pub fn parse_item_spec(spec: &str, default_tax_rate: Percent) -> RawLineItem {
    let mut fields = spec.split('|').map(str::trim);
    let mut next_or = |fallback: String| fields.next().map(str::to_string).unwrap_or(fallback);

    RawLineItem {
        description: next_or(String::new()),
        quantity: next_or("1".to_string()),
        unit_price: next_or("0".to_string()),
        discount: next_or("0".to_string()),
        tax_rate: next_or(default_tax_rate.value().to_string()),
    }
}

/// Builds a draft from the command-line fields.
///
/// Returns the draft and the warnings raised for its lines. Text fields
/// and enum values are rejected when invalid; numeric oddities are only
/// flagged.
pub fn build_draft(
    config: &ConfigState,
    args: &InvoiceArgs,
) -> Result<(InvoiceDraft, Vec<String>), ApiError> {
    let mode = match &args.mode {
        Some(mode) => mode.parse::<TaxMode>()?,
        None => config.default_tax_mode,
    };

    let mut draft = InvoiceDraft::new(mode, config.default_tax_rate);
    draft.customer_name = validate_short_text("customer", &args.customer)?;
    draft.contact_info = validate_short_text("contact", &args.contact)?;
    draft.tax_id = validate_short_text("tax id", &args.tax_id)?;
    if let Some(status) = &args.status {
        draft.status = status.parse()?;
    }

    let mut warnings = Vec::new();
    if !args.items.is_empty() {
        // Replace the blank starter line
        draft.remove_item(0);

        for spec in &args.items {
            let mut item = parse_item_spec(spec, config.default_tax_rate).parse();
            item.description = validate_short_text("description", &item.description)?;

            for flag in validate_line_item(&item) {
                warn!(item = %item.description, %flag, "Line item flagged");
                warnings.push(format!("{}: {}", display_description(&item.description), flag));
            }
            draft.add_item(item);
        }
    }

    Ok((draft, warnings))
}

fn display_description(description: &str) -> &str {
    if description.is_empty() {
        "(untitled)"
    } else {
        description
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Computes a draft without saving anything.
pub fn preview_invoice(
    config: &ConfigState,
    args: &InvoiceArgs,
) -> Result<PreviewResponse, ApiError> {
    debug!(items = args.items.len(), "invoice preview command");

    let (draft, warnings) = build_draft(config, args)?;
    let DraftPreview { lines, totals } = draft.preview();

    let lines = draft
        .items
        .iter()
        .zip(lines)
        .map(|(item, computation)| PreviewLine {
            description: item.description.clone(),
            tax_rate: item.tax_rate,
            computation,
        })
        .collect();

    Ok(PreviewResponse {
        tax_mode: draft.tax_mode,
        lines,
        totals,
        warnings,
    })
}

/// Finalizes a draft, numbers it and saves the ledger.
pub fn create_invoice(
    config: &ConfigState,
    ledger: &LedgerState,
    store: &LedgerStore,
    args: &InvoiceArgs,
    now: DateTime<Utc>,
) -> Result<InvoiceResponse, ApiError> {
    debug!(customer = %args.customer, items = args.items.len(), "invoice new command");

    let (draft, _warnings) = build_draft(config, args)?;
    let id = Uuid::new_v4().to_string();

    let invoice = ledger.with_ledger_mut(|l| {
        let invoice = l.issue_invoice(draft, config.numbering, id, now).clone();
        store.save(l)?;
        Ok::<Invoice, ApiError>(invoice)
    })?;

    info!(
        id = %invoice.id(),
        number = %invoice.sequence_number(),
        total = %invoice.total(),
        "Invoice saved"
    );
    Ok(InvoiceResponse { invoice })
}

/// Lists invoices, newest first.
pub fn list_invoices(ledger: &LedgerState) -> InvoiceListResponse {
    debug!("invoice list command");
    ledger.with_ledger(|l| InvoiceListResponse {
        invoices: l.invoices().to_vec(),
    })
}

/// Moves an invoice to any status.
pub fn update_invoice_status(
    ledger: &LedgerState,
    store: &LedgerStore,
    id: &str,
    status: &str,
) -> Result<StatusChangeResponse, ApiError> {
    debug!(id = %id, status = %status, "invoice status command");

    let id = validate_record_id(id)?;
    let status: InvoiceStatus = status.parse()?;

    let response = ledger.with_ledger_mut(|l| {
        let (invoice, previous) = l.set_invoice_status(&id, status)?;
        let response = StatusChangeResponse {
            invoice: invoice.clone(),
            previous,
        };
        store.save(l)?;
        Ok::<StatusChangeResponse, ApiError>(response)
    })?;

    info!(id = %id, from = %response.previous, to = %status, "Invoice status changed");
    Ok(response)
}

/// Deletes an invoice. Its number is not reused under monotonic numbering.
pub fn delete_invoice(
    ledger: &LedgerState,
    store: &LedgerStore,
    id: &str,
) -> Result<DeletedInvoiceResponse, ApiError> {
    debug!(id = %id, "invoice delete command");

    let id = validate_record_id(id)?;
    let removed = ledger.with_ledger_mut(|l| {
        let removed = l.delete_invoice(&id)?;
        store.save(l)?;
        Ok::<Invoice, ApiError>(removed)
    })?;

    info!(id = %id, number = %removed.sequence_number(), "Invoice deleted");
    Ok(DeletedInvoiceResponse {
        id,
        sequence_number: removed.sequence_number().to_string(),
    })
}

// =============================================================================
// Rendering
// =============================================================================

impl Render for PreviewResponse {
    fn render(&self, config: &ConfigState) -> String {
        let money = |m| config.format_currency(m);
        let mut out = String::new();

        let _ = writeln!(out, "Preview ({} tax)", self.tax_mode);
        for line in &self.lines {
            let c = &line.computation;
            let _ = writeln!(
                out,
                "  {:<24} base {:>14}  disc {:>12}  taxable {:>14}  tax {:>12} ({})  total {:>14}",
                display_description(&line.description),
                money(c.base),
                money(c.discount_amount),
                money(c.taxable_amount),
                money(c.tax_total()),
                format_percent(line.tax_rate),
                money(c.total),
            );
        }

        let t = &self.totals;
        let _ = writeln!(out, "  Subtotal   {:>16}", money(t.subtotal));
        match self.tax_mode {
            TaxMode::Split => {
                let _ = writeln!(out, "  Tax A      {:>16}", money(t.tax_component_a_total));
                let _ = writeln!(out, "  Tax B      {:>16}", money(t.tax_component_b_total));
            }
            TaxMode::Single => {
                let _ = writeln!(out, "  Tax        {:>16}", money(t.tax_component_c_total));
            }
        }
        let _ = write!(out, "  Total      {:>16}", money(t.total));

        for warning in &self.warnings {
            let _ = write!(out, "\n  warning: {}", warning);
        }
        out
    }
}

fn invoice_row(invoice: &Invoice, config: &ConfigState) -> String {
    format!(
        "{}  {}  {:<24} {:<8} {:>16}  {}",
        invoice.sequence_number(),
        invoice.created_at().format("%Y-%m-%d"),
        invoice.customer_name(),
        invoice.status().as_str(),
        config.format_currency(invoice.total()),
        invoice.id(),
    )
}

impl Render for InvoiceResponse {
    fn render(&self, config: &ConfigState) -> String {
        let inv = &self.invoice;
        format!(
            "{}\nSaved {} for {} ({})\n  Subtotal {}\n  Tax      {}\n  Total    {}\n  id: {}",
            report_header(config),
            inv.sequence_number(),
            display_description(inv.customer_name()),
            inv.status(),
            config.format_currency(inv.subtotal()),
            config.format_currency(inv.tax_total()),
            config.format_currency(inv.total()),
            inv.id(),
        )
    }
}

impl Render for InvoiceListResponse {
    fn render(&self, config: &ConfigState) -> String {
        if self.invoices.is_empty() {
            return "No invoices yet".to_string();
        }
        self.invoices
            .iter()
            .map(|inv| invoice_row(inv, config))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Render for StatusChangeResponse {
    fn render(&self, _config: &ConfigState) -> String {
        format!(
            "{}: {} -> {}",
            self.invoice.sequence_number(),
            self.previous,
            self.invoice.status()
        )
    }
}

impl Render for DeletedInvoiceResponse {
    fn render(&self, _config: &ConfigState) -> String {
        format!("Deleted {} ({})", self.sequence_number, self.id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use billcraft_core::{Money, NumberingPolicy};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    use crate::error::ErrorCode;
    use crate::state::Ledger;

    fn args(items: &[&str]) -> InvoiceArgs {
        InvoiceArgs {
            customer: "Acme Inc".to_string(),
            items: items.iter().map(|s| s.to_string()).collect(),
            ..InvoiceArgs::default()
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 10, 0, 0).unwrap()
    }

    struct Fixture {
        _dir: TempDir,
        config: ConfigState,
        ledger: LedgerState,
        store: LedgerStore,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let store = LedgerStore::new(dir.path().join("ledger.json"));
        Fixture {
            _dir: dir,
            config: ConfigState::default(),
            ledger: LedgerState::new(Ledger::default()),
            store,
        }
    }

    #[test]
    fn test_parse_item_spec_defaults() {
        let raw = parse_item_spec("Hosting", Percent::from_whole(18));
        assert_eq!(raw.description, "Hosting");
        assert_eq!(raw.quantity, "1");
        assert_eq!(raw.unit_price, "0");
        assert_eq!(raw.discount, "0");
        assert_eq!(raw.tax_rate, "18");

        let raw = parse_item_spec(" Design | 2 | 500 ", Percent::from_whole(5));
        assert_eq!(raw.quantity, "2");
        assert_eq!(raw.unit_price, "500");
        assert_eq!(raw.tax_rate, "5");
    }

    #[test]
    fn test_preview_split_and_single() {
        let config = ConfigState::default();

        let split = preview_invoice(&config, &args(&["Design|2|500|10|18"])).unwrap();
        assert_eq!(split.tax_mode, TaxMode::Split);
        assert_eq!(split.lines[0].computation.tax_component_a, Money::from_major(81));
        assert_eq!(split.totals.total, Money::from_major(1062));

        let mut single_args = args(&["Design|2|500|10|18"]);
        single_args.mode = Some("single".to_string());
        let single = preview_invoice(&config, &single_args).unwrap();
        assert_eq!(single.totals.tax_component_c_total, Money::from_major(162));
        assert_eq!(single.totals.total, split.totals.total);
    }

    #[test]
    fn test_preview_without_items_uses_blank_line() {
        let preview = preview_invoice(&ConfigState::default(), &args(&[])).unwrap();
        assert_eq!(preview.lines.len(), 1);
        assert_eq!(preview.lines[0].tax_rate, Percent::from_whole(18));
        assert!(preview.totals.total.is_zero());
    }

    #[test]
    fn test_garbage_numbers_coerce_and_odd_ones_warn() {
        let preview = preview_invoice(
            &ConfigState::default(),
            &args(&["Mystery|abc|xyz", "Refund|1|100|150|18"]),
        )
        .unwrap();

        assert!(preview.lines[0].computation.total.is_zero());
        assert!(preview.lines[1].computation.taxable_amount.is_zero());
        assert_eq!(preview.warnings.len(), 1);
        assert!(preview.warnings[0].starts_with("Refund: discount"));
    }

    #[test]
    fn test_bad_mode_and_status_are_rejected() {
        let mut bad_mode = args(&[]);
        bad_mode.mode = Some("vat".to_string());
        let err = preview_invoice(&ConfigState::default(), &bad_mode).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let mut bad_status = args(&[]);
        bad_status.status = Some("cancelled".to_string());
        assert!(preview_invoice(&ConfigState::default(), &bad_status).is_err());
    }

    #[test]
    fn test_create_list_status_delete() {
        let fx = fixture();

        let create = |items: &[&str]| {
            create_invoice(&fx.config, &fx.ledger, &fx.store, &args(items), now())
                .unwrap()
                .invoice
        };
        let first = create(&["A|1|100|0|18"]);
        let second = create(&["B|2|50|0|0"]);

        assert_eq!(first.sequence_number(), "INV-2026-0001");
        assert_eq!(second.sequence_number(), "INV-2026-0002");
        assert_eq!(first.total().amount(), dec!(118));
        assert_eq!(second.total(), Money::from_major(100));

        let listed = list_invoices(&fx.ledger);
        assert_eq!(listed.invoices[0].id(), second.id());

        let changed = update_invoice_status(&fx.ledger, &fx.store, first.id(), "paid").unwrap();
        assert_eq!(changed.previous, InvoiceStatus::Draft);
        assert_eq!(changed.invoice.status(), InvoiceStatus::Paid);

        delete_invoice(&fx.ledger, &fx.store, second.id()).unwrap();

        // Persisted state matches memory
        let on_disk = fx.store.load().unwrap();
        assert_eq!(on_disk.invoices().len(), 1);
        assert_eq!(on_disk.invoices()[0].status(), InvoiceStatus::Paid);

        // Monotonic: number 2 is not reused
        assert_eq!(create(&[]).sequence_number(), "INV-2026-0003");
    }

    #[test]
    fn test_collection_size_policy_from_config() {
        let mut fx = fixture();
        fx.config.numbering = NumberingPolicy::CollectionSize;

        let a = create_invoice(&fx.config, &fx.ledger, &fx.store, &args(&[]), now()).unwrap();
        create_invoice(&fx.config, &fx.ledger, &fx.store, &args(&[]), now()).unwrap();
        let last = create_invoice(&fx.config, &fx.ledger, &fx.store, &args(&[]), now()).unwrap();
        delete_invoice(&fx.ledger, &fx.store, last.invoice.id()).unwrap();

        let again = create_invoice(&fx.config, &fx.ledger, &fx.store, &args(&[]), now()).unwrap();
        assert_eq!(a.invoice.sequence_number(), "INV-2026-0001");
        assert_eq!(again.invoice.sequence_number(), "INV-2026-0003");
    }

    #[test]
    fn test_unknown_and_malformed_ids() {
        let fx = fixture();
        let missing = Uuid::new_v4().to_string();

        let err = update_invoice_status(&fx.ledger, &fx.store, &missing, "Paid").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = delete_invoice(&fx.ledger, &fx.store, "not-a-uuid").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_render_preview() {
        let config = ConfigState::default();
        let preview = preview_invoice(&config, &args(&["Design|2|500|10|18"])).unwrap();
        let text = preview.render(&config);

        assert!(text.contains("Preview (split tax)"));
        assert!(text.contains("₹1,062.00"));
        assert!(text.contains("Tax A"));
    }

    #[test]
    fn test_render_saved_invoice_names_the_business() {
        let mut fx = fixture();
        fx.config.business_name = "Acme Studio".to_string();

        let saved = create_invoice(&fx.config, &fx.ledger, &fx.store, &args(&[]), now()).unwrap();
        let text = saved.render(&fx.config);
        assert!(text.starts_with("Acme Studio (INR)\nSaved INV-2026-0001 for Acme Inc"));
    }
}
