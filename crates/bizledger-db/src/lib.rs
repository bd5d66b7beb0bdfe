//! # bizledger-db: Ledger Store for BizLedger
//!
//! Durable storage for the ledger and everything that reads or writes it:
//! repositories, the atomic invoice engine, the inventory ledger and the
//! analytics queries. SQLite via sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        BizLedger Data Flow                              │
//! │                                                                         │
//! │  CLI command (invoice create)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  bizledger-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │ InvoiceEngine │    │  Analytics   │  │   │
//! │  │   │   (pool.rs)   │    │  (engine.rs)  │    │ Engine       │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ write gate    │    │ trend/top-N  │  │   │
//! │  │   │ Migrations    │    │ one SQLite tx │    │ dashboard    │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │          ▲                    │                                 │   │
//! │  │          │             ┌──────┴──────────────────┐             │   │
//! │  │   Repositories         │ InventoryLedger         │             │   │
//! │  │   party/item/invoice/  │ (stock decrement in tx) │             │   │
//! │  │   employee             └─────────────────────────┘             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <data dir>/bizledger/ledger.db                                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Parties, items, invoices, employees
//! - [`inventory`] - Stock reads and the in-transaction decrement
//! - [`engine`] - `create_invoice` as one atomic unit
//! - [`analytics`] - Trends, rankings, dashboard
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bizledger_db::{Database, DbConfig};
//! use bizledger_core::invoice::EngineConfig;
//!
//! let db = Database::new(DbConfig::new("ledger.db")).await?;
//!
//! let created = db
//!     .invoice_engine(EngineConfig::default())
//!     .create_invoice(&request)
//!     .await?;
//!
//! let trend = db.analytics().sales_trend(Period::Monthly).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod engine;
pub mod error;
pub mod inventory;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use analytics::AnalyticsEngine;
pub use engine::InvoiceEngine;
pub use error::{DbError, DbResult};
pub use inventory::InventoryLedger;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::employee::EmployeeRepository;
pub use repository::invoice::{InvoiceFilter, InvoiceRepository};
pub use repository::item::ItemRepository;
pub use repository::party::PartyRepository;
