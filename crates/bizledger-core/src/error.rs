//! # Error Types
//!
//! Domain-specific error types for bizledger-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bizledger-core errors (this file)                                     │
//! │  ├── ValidationError  - A single field is malformed                    │
//! │  ├── InvoiceError     - create_invoice failed (nothing committed)      │
//! │  └── CoreError        - Lookups and record assembly                    │
//! │                                                                         │
//! │  bizledger-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── ApiError         - What the operator sees (code + message)        │
//! │                                                                         │
//! │  Flow: ValidationError → InvoiceError/CoreError → ApiError             │
//! │        DbError ─────────► InvoiceError::StorageFailure ─► ApiError     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Classes
//! Every [`InvoiceError`] except [`InvoiceError::StorageFailure`] is a
//! validation-class error: it is raised before the transaction opens and
//! retrying the same request yields the same result.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// General domain errors outside the invoice commit path.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Party not found: {0}")]
    PartyNotFound(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Invoice not found: {0}")]
    InvoiceNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Invoice Error
// =============================================================================

/// Failure kinds of the invoice transaction.
///
/// ## When Each Occurs
/// ```text
/// validate request ──► EmptyCart, InvalidQuantity, InvalidRate,
///       │               TooManyLines, Validation
///       ▼
/// resolve party/items ──► UnknownParty, UnknownItem
///       │
///       ▼
/// stock rule (overdraft refused) ──► InsufficientStock
///       │
///       ▼
/// transaction ──► StorageFailure (whole unit rolled back)
/// ```
#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error("Unknown party: {0}")]
    UnknownParty(String),

    #[error("Invoice must contain at least one line")]
    EmptyCart,

    #[error("Unknown item: {0}")]
    UnknownItem(String),

    #[error("Invalid quantity {quantity} for item {item_id}: must be between 1 and {max}")]
    InvalidQuantity {
        item_id: String,
        quantity: i64,
        max: i64,
    },

    #[error("Invalid rate {rate_cents} for item {item_id}: must not be negative")]
    InvalidRate { item_id: String, rate_cents: i64 },

    #[error("Invoice cannot have more than {max} lines")]
    TooManyLines { max: usize },

    /// Only raised when overdraft is disallowed.
    #[error("Insufficient stock for {item_name}: available {available}, requested {requested}")]
    InsufficientStock {
        item_id: String,
        item_name: String,
        available: i64,
        requested: i64,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage failure: {0}")]
    StorageFailure(String),
}

impl InvoiceError {
    /// True for errors raised before any write was attempted.
    pub fn is_validation(&self) -> bool {
        !matches!(self, InvoiceError::StorageFailure(_))
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by [`crate::validation`] before any business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g., invalid UUID, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result of the invoice transaction.
pub type InvoiceResult<T> = Result<T, InvoiceError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_message() {
        let err = InvoiceError::InsufficientStock {
            item_id: "i-1".to_string(),
            item_name: "Widget".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Widget: available 3, requested 5"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "invoice_number".to_string(),
        };
        assert_eq!(err.to_string(), "invoice_number is required");

        let err = ValidationError::Negative {
            field: "price".to_string(),
        };
        assert_eq!(err.to_string(), "price must not be negative");
    }

    #[test]
    fn test_error_classes() {
        assert!(InvoiceError::EmptyCart.is_validation());
        assert!(InvoiceError::UnknownParty("p".into()).is_validation());
        assert!(InvoiceError::UnknownItem("x".into()).is_validation());
        assert!(!InvoiceError::StorageFailure("disk full".into()).is_validation());
    }

    #[test]
    fn test_validation_converts() {
        let err: InvoiceError = ValidationError::Required {
            field: "invoice_number".to_string(),
        }
        .into();
        assert!(matches!(err, InvoiceError::Validation(_)));

        let err: CoreError = ValidationError::Required {
            field: "name".to_string(),
        }
        .into();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
