//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Invoice total = Σ (quantity × rate)                                    │
//! │                                                                         │
//! │  With floats:   0.1 + 0.2 = 0.30000000000000004                         │
//! │                 ledger totals drift from their lines                    │
//! │                                                                         │
//! │  With cents:    10 + 20 = 30                                            │
//! │                 total_amount == Σ line_total, exactly, every time       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bizledger_core::money::Money;
//!
//! let rate = Money::parse("49.99").unwrap();
//! assert_eq!(rate.cents(), 4999);
//!
//! let total = rate.checked_multiply_quantity(2).unwrap();
//! assert_eq!(total.to_decimal_string(), "99.98");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in minor units (cents).
///
/// Signed so that overdrawn balances and corrections can be represented.
/// Serializes as the bare integer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Parses a decimal amount such as `"150"`, `"150.5"` or `"150.50"`.
    ///
    /// At most two fractional digits are accepted; anything finer would
    /// silently lose value.
    ///
    /// ## Example
    /// ```rust
    /// use bizledger_core::money::Money;
    ///
    /// assert_eq!(Money::parse("10.5").unwrap().cents(), 1050);
    /// assert_eq!(Money::parse("-3.25").unwrap().cents(), -325);
    /// assert!(Money::parse("1.234").is_err());
    /// assert!(Money::parse("abc").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Money, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let s = input.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let (major, minor) = match digits.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (digits, ""),
        };

        if major.is_empty() && minor.is_empty() {
            return Err(invalid("expected a number like 12.50"));
        }
        if minor.len() > 2 {
            return Err(invalid("at most two decimal places are allowed"));
        }
        if !major.chars().all(|c| c.is_ascii_digit()) || !minor.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("expected a number like 12.50"));
        }

        let major: i64 = if major.is_empty() {
            0
        } else {
            major.parse().map_err(|_| invalid("amount is too large"))?
        };
        let minor: i64 = match minor.len() {
            0 => 0,
            1 => minor.parse::<i64>().map_err(|_| invalid("bad fraction"))? * 10,
            _ => minor.parse().map_err(|_| invalid("bad fraction"))?,
        };

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(|| invalid("amount is too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Multiplies by a quantity, returning `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use bizledger_core::money::Money;
    ///
    /// let line = Money::from_cents(5000).checked_multiply_quantity(3);
    /// assert_eq!(line, Some(Money::from_cents(15000)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_multiply_quantity(2), None);
    /// ```
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Multiplies by a quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Money {
        Money(self.0 * qty)
    }

    /// Adds, returning `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Tax contained in this tax-inclusive amount at `rate`, rounded half
    /// up to the cent.
    ///
    /// `amount_cents * bps / (10000 + bps)`, computed in i128.
    pub fn included_tax(&self, rate: TaxRate) -> Money {
        let divisor = 10_000 + rate.bps() as i128;
        let tax_cents = (self.0 as i128 * rate.bps() as i128 * 2 + divisor) / (divisor * 2);
        Money::from_cents(tax_cents as i64)
    }

    /// Integer average over `count` entries; zero for an empty set.
    pub fn average_over(&self, count: i64) -> Money {
        if count <= 0 {
            return Money::zero();
        }
        Money(self.0 / count)
    }

    /// Plain decimal rendering used in exports and documents (`"150.00"`).
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{}{}.{:02}", sign, abs / 100, abs % 100)
    }

    /// Decimal rendering with a currency symbol (`"₹150.00"`).
    pub fn display_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{}{}{}.{:02}", sign, symbol, abs / 100, abs % 100)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug display with a `$` symbol. Use [`Money::display_with_symbol`] for
/// operator-facing output.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_with_symbol("$"))
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
