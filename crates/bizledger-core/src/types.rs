//! # Domain Types
//!
//! Ledger records shared by every layer of BizLedger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Ledger Records                                  │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────────┐   ┌─────────────────┐  │
//! │  │     Party       │   │       Invoice        │   │      Item       │  │
//! │  │  ─────────────  │   │  ──────────────────  │   │  ─────────────  │  │
//! │  │  id (UUID)      │◄──│  party_id (FK)       │   │  id (UUID)      │  │
//! │  │  name           │   │  invoice_number      │   │  sku (business) │  │
//! │  │  phone          │   │  date                │   │  price_cents    │  │
//! │  └─────────────────┘   │  total_amount_cents  │   │  stock_quantity │  │
//! │                        │  status              │   │  tax_rate_bps   │  │
//! │                        └──────────▲───────────┘   └────────▲────────┘  │
//! │                                   │                        │           │
//! │                        ┌──────────┴────────────────────────┴────────┐  │
//! │                        │              InvoiceLine                   │  │
//! │                        │  invoice_id, item_id, quantity, rate,      │  │
//! │                        │  total = quantity × rate                   │  │
//! │                        └────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every record has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID: (`sku`, `invoice_number`) - human-readable, not unique

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::money::Money;

/// Generates a new record identifier.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 1800 bps = 18%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage such as `18.0`.
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round().max(0.0) as u32)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Party
// =============================================================================

/// A customer or counterparty that invoices are issued to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Party {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when registering a party.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewParty {
    pub name: String,
    pub phone: Option<String>,
}

// =============================================================================
// Item
// =============================================================================

/// A stocked item that can appear on invoice lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub sku: Option<String>,

    /// List price in cents. Invoice lines may use a different rate.
    pub price_cents: i64,

    /// Current stock. Only committed invoices change it; negative values
    /// mean the item was oversold under an overdraft policy.
    pub stock_quantity: i64,

    pub tax_rate_bps: u32,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Item {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    /// Stock valuation at list price.
    pub fn stock_value(&self) -> Money {
        self.price().multiply_quantity(self.stock_quantity)
    }
}

/// Fields supplied when registering an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub sku: Option<String>,
    pub price_cents: i64,
    pub stock_quantity: i64,
    pub tax_rate_bps: u32,
}

// =============================================================================
// Invoice Status
// =============================================================================

/// Lifecycle state of an invoice.
///
/// The transaction engine only ever writes `Final`; `Draft` exists in the
/// schema for callers that stage invoices outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    #[default]
    Final,
}

impl InvoiceStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Final => "final",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(InvoiceStatus::Draft),
            "final" => Ok(InvoiceStatus::Final),
            _ => Err(ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: vec!["draft".to_string(), "final".to_string()],
            }),
        }
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// A committed invoice header. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Invoice {
    pub id: String,
    pub invoice_number: String,
    pub party_id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    /// Always equals the sum of the line totals.
    pub total_amount_cents: i64,
    pub status: InvoiceStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }
}

/// Invoice header joined with the party name, for registers and lists.
///
/// `party_name` is `None` when the party row is missing (LEFT JOIN).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InvoiceSummary {
    pub id: String,
    pub invoice_number: String,
    pub party_id: String,
    pub party_name: Option<String>,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub total_amount_cents: i64,
    pub status: InvoiceStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl InvoiceSummary {
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }
}

// =============================================================================
// Invoice Line
// =============================================================================

/// One (item, quantity, rate) entry of a committed invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InvoiceLine {
    pub id: String,
    pub invoice_id: String,
    pub item_id: String,
    /// 1-based position on the invoice.
    pub line_no: i64,
    pub quantity: i64,
    pub rate_cents: i64,
    /// `quantity * rate_cents`
    pub total_cents: i64,
}

impl InvoiceLine {
    #[inline]
    pub fn rate(&self) -> Money {
        Money::from_cents(self.rate_cents)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Employee
// =============================================================================

/// Staff master data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub role: Option<String>,
    pub base_salary_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Employee {
    /// Builds a pay slip for one pay period.
    pub fn pay_slip(&self, bonus: Money) -> PaySlip {
        let base = Money::from_cents(self.base_salary_cents);
        PaySlip {
            employee_id: self.id.clone(),
            employee_name: self.name.clone(),
            role: self.role.clone(),
            base_salary: base,
            bonus,
            net_pay: base + bonus,
        }
    }
}

/// Fields supplied when registering an employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    pub role: Option<String>,
    pub base_salary_cents: i64,
}

/// Payroll slip: base salary plus bonus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaySlip {
    pub employee_id: String,
    pub employee_name: String,
    pub role: Option<String>,
    pub base_salary: Money,
    pub bonus: Money,
    pub net_pay: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================
