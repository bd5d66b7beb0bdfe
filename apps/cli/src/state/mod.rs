//! # State Module
//!
//! Two focused state types, built once in [`crate::run`] and passed to
//! the commands that need them.
//!
//! ```text
//! ┌──────────────────┐  ┌──────────────────────┐
//! │    DbState       │  │    ConfigState       │
//! │                  │  │                      │
//! │  Database        │  │  db_path             │
//! │  (SQLite pool,   │  │  allow_overdraft     │
//! │   write gate)    │  │  currency_symbol     │
//! │                  │  │  company_name        │
//! └──────────────────┘  └──────────────────────┘
//! ```
//!
//! `ConfigState` is read-only after startup.

mod config;
mod db;

pub use config::ConfigState;
pub use db::DbState;
