//! # Validation Module
//!
//! Field-level validation for master data and invoice requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI argument parsing (clap)                                  │
//! │  └── Types: numbers are numbers, dates are dates                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Business rules: names present, prices not negative, ...           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bizledger_core::validation::{validate_party_name, validate_quantity};
//!
//! assert!(validate_party_name("Acme Traders").is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::{MAX_INVOICE_LINES, MAX_LINE_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_SKU_LEN: usize = 50;
const MAX_PHONE_LEN: usize = 20;
const MAX_INVOICE_NUMBER_LEN: usize = 50;

// =============================================================================
// String Validators
// =============================================================================

fn require_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a party name (required, at most 200 characters).
pub fn validate_party_name(name: &str) -> ValidationResult<()> {
    require_text("party name", name, MAX_NAME_LEN)
}

/// Validates an item name (required, at most 200 characters).
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    require_text("item name", name, MAX_NAME_LEN)
}

/// Validates an employee name (required, at most 200 characters).
pub fn validate_employee_name(name: &str) -> ValidationResult<()> {
    require_text("employee name", name, MAX_NAME_LEN)
}

/// Validates an invoice number (required, at most 50 characters).
///
/// Numbers are not required to be unique.
pub fn validate_invoice_number(number: &str) -> ValidationResult<()> {
    require_text("invoice_number", number, MAX_INVOICE_NUMBER_LEN)
}

/// Validates an optional SKU.
///
/// ## Rules
/// - Absent or blank is allowed
/// - At most 50 characters
/// - Letters, numbers, hyphens and underscores only
///
/// ## Example
/// ```rust
/// use bizledger_core::validation::validate_sku;
///
/// assert!(validate_sku(Some("WID-001")).is_ok());
/// assert!(validate_sku(None).is_ok());
/// assert!(validate_sku(Some("bad sku!")).is_err());
/// ```
pub fn validate_sku(sku: Option<&str>) -> ValidationResult<()> {
    let Some(sku) = sku.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(());
    };

    if sku.len() > MAX_SKU_LEN {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: MAX_SKU_LEN,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates an optional phone number.
///
/// Digits plus `+`, `-`, spaces and parentheses; at most 20 characters.
pub fn validate_phone(phone: Option<&str>) -> ValidationResult<()> {
    let Some(phone) = phone.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(());
    };

    if phone.len() > MAX_PHONE_LEN {
        return Err(ValidationError::TooLong {
            field: "phone".to_string(),
            max: MAX_PHONE_LEN,
        });
    }

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'))
    {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, spaces, '+', '-', '(' and ')'".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an invoice line quantity (1..=MAX_LINE_QUANTITY).
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if !(1..=MAX_LINE_QUANTITY).contains(&quantity) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }
    Ok(())
}

fn non_negative(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a list price (zero is allowed for free items).
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    non_negative("price", cents)
}

/// Validates an invoice line rate.
pub fn validate_rate_cents(cents: i64) -> ValidationResult<()> {
    non_negative("rate", cents)
}

/// Validates a base salary.
pub fn validate_salary_cents(cents: i64) -> ValidationResult<()> {
    non_negative("base_salary", cents)
}

/// Validates opening stock for a new item.
pub fn validate_opening_stock(quantity: i64) -> ValidationResult<()> {
    non_negative("stock_quantity", quantity)
}

/// Validates a tax rate in basis points (0% to 100%).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10_000,
        });
    }
    Ok(())
}

/// Validates the number of lines on an invoice request.
pub fn validate_line_count(count: usize) -> ValidationResult<()> {
    if count > MAX_INVOICE_LINES {
        return Err(ValidationError::OutOfRange {
            field: "lines".to_string(),
            min: 1,
            max: MAX_INVOICE_LINES as i64,
        });
    }
    Ok(())
}

// =============================================================================
// Format Validators
// =============================================================================

/// Validates a UUID string.
pub fn validate_uuid(field: &str, value: &str) -> ValidationResult<()> {
    uuid::Uuid::parse_str(value)
        .map(|_| ())
        .map_err(|e| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: e.to_string(),
        })
}

/// Parses an ISO calendar date (`YYYY-MM-DD`).
pub fn parse_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("expected YYYY-MM-DD ({})", e),
        }
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
