//! # bizledger-core: Pure Business Logic for BizLedger
//!
//! Every rule that decides what goes into the ledger lives here as plain
//! functions over plain data. Nothing in this crate touches a database, a
//! file or the clock; callers pass "today" in explicitly.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        BizLedger Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/cli (thin adapter)                      │   │
//! │  │   party add ─► item add ─► invoice create ─► report trend      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ bizledger-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌──────────┐ ┌────────┐ │   │
//! │  │   │  types  │ │  money  │ │ invoice  │ │analytics │ │document│ │   │
//! │  │   │ Party   │ │ Money   │ │ pricing  │ │ Period   │ │ Invoice│ │   │
//! │  │   │ Item    │ │ TaxRate │ │ stock    │ │ windows  │ │ Doc    │ │   │
//! │  │   │ Invoice │ │         │ │ warnings │ │ buckets  │ │        │ │   │
//! │  │   └─────────┘ └─────────┘ └──────────┘ └──────────┘ └────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 bizledger-db (Ledger Store)                     │   │
//! │  │        SQLite, migrations, atomic invoice commit, reports       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Ledger records (Party, Item, Invoice, InvoiceLine, Employee)
//! - [`money`] - Integer money (no floating point)
//! - [`invoice`] - Invoice request validation, pricing and stock rules
//! - [`analytics`] - Reporting periods, windows and report rows
//! - [`document`] - Plain records for an invoice renderer
//! - [`error`] - Domain error types
//! - [`validation`] - Field-level validation
//!
//! ## Example Usage
//!
//! ```rust
//! use bizledger_core::money::Money;
//! use bizledger_core::types::TaxRate;
//!
//! let rate = Money::from_cents(5000); // 50.00
//! let line_total = rate.multiply_quantity(3);
//! assert_eq!(line_total.cents(), 15000);
//!
//! // rates are tax-inclusive
//! let tax = line_total.included_tax(TaxRate::from_bps(1800)); // 18%
//! assert_eq!(tax.cents(), 2288);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod document;
pub mod error;
pub mod invoice;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, InvoiceError, InvoiceResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Tax rate applied to new items when none is given (18%).
pub const DEFAULT_TAX_RATE_BPS: u32 = 1800;

/// Maximum number of lines on a single invoice.
pub const MAX_INVOICE_LINES: usize = 100;

/// Maximum quantity on a single invoice line.
///
/// Keeps `quantity * rate` comfortably inside `i64` cents.
pub const MAX_LINE_QUANTITY: i64 = 100_000;
