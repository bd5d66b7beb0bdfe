//! # Invoice Rules
//!
//! The pure half of the invoice transaction: request validation, line
//! pricing, and the stock policy. The atomic commit lives in
//! `bizledger-db::engine` and calls into this module before it opens a
//! transaction.
//!
//! ## create_invoice Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  InvoiceRequest ──► validate() ───────────────► EmptyCart / Invalid*   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  price_invoice(request, items) ───────────────► UnknownItem            │
//! │       │   line_total = quantity × rate                                  │
//! │       │   total      = Σ line_total                                     │
//! │       ▼                                                                 │
//! │  requested_quantities() ─► Availability::evaluate per item             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  stock_decision(config) ─┬─ overdraft allowed ─► AdvisoryWarning       │
//! │                          └─ overdraft refused ─► InsufficientStock     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use ts_rs::TS;

use crate::error::{InvoiceError, InvoiceResult, ValidationError};
use crate::money::Money;
use crate::types::{new_id, Invoice, InvoiceLine, InvoiceStatus, Item};
use crate::validation::validate_invoice_number;
use crate::{MAX_INVOICE_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Requests
// =============================================================================

/// One requested line: which item, how many, at what rate.
///
/// The rate may differ from the item's list price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineRequest {
    pub item_id: String,
    pub quantity: i64,
    pub rate_cents: i64,
}

impl LineRequest {
    pub fn new(item_id: impl Into<String>, quantity: i64, rate: Money) -> Self {
        LineRequest {
            item_id: item_id.into(),
            quantity,
            rate_cents: rate.cents(),
        }
    }
}

/// Everything needed to create an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceRequest {
    pub party_id: String,
    pub invoice_number: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub lines: Vec<LineRequest>,
}

impl InvoiceRequest {
    /// Checks the request shape. Runs before any lookup or write.
    pub fn validate(&self) -> InvoiceResult<()> {
        validate_invoice_number(&self.invoice_number)?;

        if self.lines.is_empty() {
            return Err(InvoiceError::EmptyCart);
        }

        if self.lines.len() > MAX_INVOICE_LINES {
            return Err(InvoiceError::TooManyLines {
                max: MAX_INVOICE_LINES,
            });
        }

        for line in &self.lines {
            if !(1..=MAX_LINE_QUANTITY).contains(&line.quantity) {
                return Err(InvoiceError::InvalidQuantity {
                    item_id: line.item_id.clone(),
                    quantity: line.quantity,
                    max: MAX_LINE_QUANTITY,
                });
            }
            if line.rate_cents < 0 {
                return Err(InvoiceError::InvalidRate {
                    item_id: line.item_id.clone(),
                    rate_cents: line.rate_cents,
                });
            }
        }

        Ok(())
    }

    /// Distinct item ids in first-seen order.
    pub fn item_ids(&self) -> Vec<&str> {
        self.requested_quantities()
            .into_iter()
            .map(|(id, _)| id)
            .collect()
    }

    /// Total requested quantity per item, in first-seen order.
    ///
    /// An item listed on two lines is checked against stock once, with the
    /// quantities summed.
    pub fn requested_quantities(&self) -> Vec<(&str, i64)> {
        let mut totals: Vec<(&str, i64)> = Vec::new();
        for line in &self.lines {
            match totals.iter().position(|(id, _)| *id == line.item_id) {
                Some(idx) => totals[idx].1 += line.quantity,
                None => totals.push((line.item_id.as_str(), line.quantity)),
            }
        }
        totals
    }
}

// =============================================================================
// Pricing
// =============================================================================

/// A line after its item has been resolved and its total computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedLine {
    pub line_no: i64,
    pub item_id: String,
    pub item_name: String,
    pub quantity: i64,
    pub rate: Money,
    pub total: Money,
}

/// Priced lines plus their exact sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedInvoice {
    pub lines: Vec<PricedLine>,
    pub total: Money,
}

impl PricedInvoice {
    /// Builds the header record that will be committed.
    pub fn header(
        &self,
        invoice_id: &str,
        request: &InvoiceRequest,
        created_at: DateTime<Utc>,
    ) -> Invoice {
        Invoice {
            id: invoice_id.to_string(),
            invoice_number: request.invoice_number.trim().to_string(),
            party_id: request.party_id.clone(),
            date: request.date,
            total_amount_cents: self.total.cents(),
            status: InvoiceStatus::Final,
            created_at,
        }
    }

    /// Builds the line records that will be committed, with fresh ids.
    pub fn line_records(&self, invoice_id: &str) -> Vec<InvoiceLine> {
        self.lines
            .iter()
            .map(|line| InvoiceLine {
                id: new_id(),
                invoice_id: invoice_id.to_string(),
                item_id: line.item_id.clone(),
                line_no: line.line_no,
                quantity: line.quantity,
                rate_cents: line.rate.cents(),
                total_cents: line.total.cents(),
            })
            .collect()
    }
}

/// Prices every line of `request` against the resolved `items`.
///
/// ## Errors
/// - `UnknownItem` if a line references an id missing from `items`
/// - `Validation` if a line total or the invoice total overflows
pub fn price_invoice(
    request: &InvoiceRequest,
    items: &HashMap<String, Item>,
) -> InvoiceResult<PricedInvoice> {
    let overflow = |field: &str| {
        InvoiceError::Validation(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        })
    };

    let mut lines = Vec::with_capacity(request.lines.len());
    let mut total = Money::zero();

    for (idx, line) in request.lines.iter().enumerate() {
        let item = items
            .get(&line.item_id)
            .ok_or_else(|| InvoiceError::UnknownItem(line.item_id.clone()))?;

        let rate = Money::from_cents(line.rate_cents);
        let line_total = rate
            .checked_multiply_quantity(line.quantity)
            .ok_or_else(|| overflow("line total"))?;
        total = total
            .checked_add(line_total)
            .ok_or_else(|| overflow("invoice total"))?;

        lines.push(PricedLine {
            line_no: idx as i64 + 1,
            item_id: line.item_id.clone(),
            item_name: item.name.clone(),
            quantity: line.quantity,
            rate,
            total: line_total,
        });
    }

    Ok(PricedInvoice { lines, total })
}

// =============================================================================
// Stock Policy
// =============================================================================

/// Result of an availability check. Advisory only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Availability {
    pub sufficient: bool,
    pub available: i64,
}

impl Availability {
    pub fn evaluate(available: i64, requested: i64) -> Self {
        Availability {
            sufficient: available >= requested,
            available,
        }
    }
}

/// Invoice engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// When true, a sale larger than stock commits and drives stock
    /// negative, with an advisory warning. When false it is refused.
    pub allow_overdraft: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            allow_overdraft: true,
        }
    }
}

impl EngineConfig {
    pub fn allow_overdraft(mut self, allow: bool) -> Self {
        self.allow_overdraft = allow;
        self
    }
}

/// Non-fatal findings attached to a successful invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum AdvisoryWarning {
    /// Stock was short and the sale was committed anyway.
    InsufficientStock {
        item_id: String,
        item_name: String,
        available: i64,
        requested: i64,
    },
    /// Another invoice already uses this number.
    DuplicateInvoiceNumber {
        invoice_number: String,
        existing: i64,
    },
}

impl fmt::Display for AdvisoryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdvisoryWarning::InsufficientStock {
                item_name,
                available,
                requested,
                ..
            } => write!(
                f,
                "Low stock for {}: available {}, sold {}",
                item_name, available, requested
            ),
            AdvisoryWarning::DuplicateInvoiceNumber {
                invoice_number,
                existing,
            } => write!(
                f,
                "Invoice number {} is already used by {} other invoice(s)",
                invoice_number, existing
            ),
        }
    }
}

/// Applies the overdraft policy to one item.
///
/// Returns `Ok(None)` when stock covers the request, `Ok(Some(warning))`
/// when it doesn't but overdraft is allowed, and `InsufficientStock`
/// otherwise.
pub fn stock_decision(
    config: &EngineConfig,
    item: &Item,
    requested: i64,
) -> InvoiceResult<Option<AdvisoryWarning>> {
    let availability = Availability::evaluate(item.stock_quantity, requested);
    if availability.sufficient {
        return Ok(None);
    }

    if config.allow_overdraft {
        Ok(Some(AdvisoryWarning::InsufficientStock {
            item_id: item.id.clone(),
            item_name: item.name.clone(),
            available: availability.available,
            requested,
        }))
    } else {
        Err(InvoiceError::InsufficientStock {
            item_id: item.id.clone(),
            item_name: item.name.clone(),
            available: availability.available,
            requested,
        })
    }
}

// =============================================================================
// Result
// =============================================================================

/// Successful outcome of `InvoiceEngine::create_invoice`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreatedInvoice {
    pub invoice_id: String,
    pub invoice_number: String,
    pub total_amount: Money,
    pub line_count: usize,
    pub warnings: Vec<AdvisoryWarning>,
}

// =============================================================================
// Unit Tests
// =============================================================================
