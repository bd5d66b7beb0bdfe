//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ├──► InvoiceError::StorageFailure (inside create_invoice)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in CLI) ← code + operator-facing message                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bizledger_core::{InvoiceError, ValidationError};
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Input rejected before any statement ran.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Overdraft refused while committing an invoice.
    #[error("Insufficient stock for {item_id}: {available} available, {requested} requested")]
    InsufficientStock {
        item_id: String,
        available: i64,
        requested: i64,
    },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Invoice referencing a non-existent party_id
    /// - Line referencing a non-existent item_id
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// CHECK constraint violation (negative price, zero quantity, ...).
    #[error("Constraint violation: {message}")]
    CheckViolation { message: String },

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Begin or commit failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // "FOREIGN KEY constraint failed"
                // "CHECK constraint failed: <expr>"
                if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else if msg.contains("CHECK constraint failed") {
                    DbError::CheckViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Any store failure inside the invoice transaction aborts the whole unit.
impl From<DbError> for InvoiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Validation(v) => InvoiceError::Validation(v),
            DbError::InsufficientStock {
                item_id,
                available,
                requested,
            } => InvoiceError::InsufficientStock {
                item_name: item_id.clone(),
                item_id,
                available,
                requested,
            },
            other => InvoiceError::StorageFailure(other.to_string()),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_failure_is_not_validation() {
        let err: InvoiceError = DbError::TransactionFailed("disk I/O error".into()).into();
        assert!(!err.is_validation());
        assert_eq!(
            err.to_string(),
            "Storage failure: Transaction failed: disk I/O error"
        );
    }

    #[test]
    fn test_refused_overdraft_stays_a_stock_error() {
        let err: InvoiceError = DbError::InsufficientStock {
            item_id: "w".into(),
            available: 1,
            requested: 3,
        }
        .into();
        assert!(err.is_validation());
        assert!(matches!(
            err,
            InvoiceError::InsufficientStock { available: 1, requested: 3, .. }
        ));
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(
            DbError::not_found("Invoice", "abc").to_string(),
            "Invoice not found: abc"
        );
    }
}
