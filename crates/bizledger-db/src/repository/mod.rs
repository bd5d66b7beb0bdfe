//! # Repository Module
//!
//! Ledger store repositories.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CLI command / engine                                                  │
//! │       │                                                                 │
//! │       │  db.parties().insert(&new_party)                               │
//! │       ▼                                                                 │
//! │  PartyRepository / ItemRepository / InvoiceRepository / ...            │
//! │  ├── pool-level methods (&self)       one statement, autocommit        │
//! │  └── *_in(conn, ..) functions         run inside a caller's tx         │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Master data (parties, items, employees) is append-only: there are no
//! update or delete operations. Item stock changes only through committed
//! invoices.
//!
//! ## Available Repositories
//!
//! - [`PartyRepository`](party::PartyRepository) - insert, list, lookups
//! - [`ItemRepository`](item::ItemRepository) - insert, list, low-stock count
//! - [`InvoiceRepository`](invoice::InvoiceRepository) - insert_atomic,
//!   filtered listing, lines, invoice documents
//! - [`EmployeeRepository`](employee::EmployeeRepository) - staff master data

pub mod employee;
pub mod invoice;
pub mod item;
pub mod party;
