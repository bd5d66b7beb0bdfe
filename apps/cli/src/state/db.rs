//! # Database State
//!
//! Wraps the `Database` handle shared by every command.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! pub async fn list_parties(db: &DbState) -> Result<Vec<Party>, ApiError> {
//!     Ok(db.inner().parties().list().await?)
//! }
//! ```

use bizledger_db::{Database, DbConfig};

use crate::error::ApiError;

/// Wrapper around `Database` for command dispatch.
#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Opens (and migrates) the ledger described by `config`.
    pub async fn connect(config: DbConfig) -> Result<Self, ApiError> {
        Ok(DbState::new(Database::new(config).await?))
    }

    pub fn inner(&self) -> &Database {
        &self.db
    }
}
