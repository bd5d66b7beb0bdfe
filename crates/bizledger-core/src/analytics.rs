//! # Analytics
//!
//! Reporting periods, lookback windows and the row types produced by the
//! analytics engine in `bizledger-db`.
//!
//! ## Periods
//! ```text
//! ┌──────────┬──────────────────┬──────────────┬──────────────────────────┐
//! │ Period   │ Lookback window  │ Bucket       │ Example label            │
//! ├──────────┼──────────────────┼──────────────┼──────────────────────────┤
//! │ Daily    │ last 30 days     │ %Y-%m-%d     │ 2025-01-15               │
//! │ Monthly  │ last 12 months   │ %Y-%m        │ 2025-01                  │
//! │ Annual   │ last 5 years     │ %Y           │ 2025                     │
//! └──────────┴──────────────────┴──────────────┴──────────────────────────┘
//! ```
//!
//! The window is inclusive: an invoice dated exactly `today - lookback` is
//! counted. Month arithmetic clamps to the last day of the month
//! (2024-02-29 minus 12 months is 2023-02-28).

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

/// Lookback for [`Period::Daily`].
pub const DAILY_LOOKBACK_DAYS: u64 = 30;

/// Lookback for [`Period::Monthly`].
pub const MONTHLY_LOOKBACK_MONTHS: u32 = 12;

/// Lookback for [`Period::Annual`].
pub const ANNUAL_LOOKBACK_YEARS: u32 = 5;

/// Default N for top-N breakdowns.
pub const DEFAULT_TOP_LIMIT: u32 = 5;

/// Items with stock strictly below this count as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

// =============================================================================
// Period
// =============================================================================

/// Reporting granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Period {
    Daily,
    Monthly,
    Annual,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::Daily, Period::Monthly, Period::Annual];

    /// First date inside the window ending at `today`.
    pub fn window_start(&self, today: NaiveDate) -> NaiveDate {
        let start = match self {
            Period::Daily => today.checked_sub_days(Days::new(DAILY_LOOKBACK_DAYS)),
            Period::Monthly => today.checked_sub_months(Months::new(MONTHLY_LOOKBACK_MONTHS)),
            Period::Annual => {
                today.checked_sub_months(Months::new(ANNUAL_LOOKBACK_YEARS * 12))
            }
        };
        start.unwrap_or(NaiveDate::MIN)
    }

    /// strftime pattern that truncates a date to this period's bucket.
    ///
    /// The same pattern works for SQLite `strftime()` and chrono.
    pub const fn bucket_format(&self) -> &'static str {
        match self {
            Period::Daily => "%Y-%m-%d",
            Period::Monthly => "%Y-%m",
            Period::Annual => "%Y",
        }
    }

    /// Bucket label for a single date.
    pub fn bucket_label(&self, date: NaiveDate) -> String {
        date.format(self.bucket_format()).to_string()
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Monthly => "monthly",
            Period::Annual => "annual",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(Period::Daily),
            "monthly" | "month" => Ok(Period::Monthly),
            "annual" | "annually" | "yearly" | "year" => Ok(Period::Annual),
            _ => Err(ValidationError::NotAllowed {
                field: "period".to_string(),
                allowed: Period::ALL.iter().map(|p| p.to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Report Rows
// =============================================================================

/// One bucket of a sales trend series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct TrendPoint {
    pub bucket_label: String,
    pub total_amount_cents: i64,
    pub invoice_count: i64,
}

impl TrendPoint {
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }
}

/// One entry of a top-N breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct RankedEntry {
    pub label: String,
    pub value_cents: i64,
}

impl RankedEntry {
    #[inline]
    pub fn value(&self) -> Money {
        Money::from_cents(self.value_cents)
    }
}

/// Totals across a trend series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TrendSummary {
    pub total_amount: Money,
    pub invoice_count: i64,
    /// Integer average invoice value; zero when there are no invoices.
    pub average_ticket: Money,
}

impl TrendSummary {
    pub fn from_points(points: &[TrendPoint]) -> Self {
        let total_amount: Money = points.iter().map(TrendPoint::total_amount).sum();
        let invoice_count: i64 = points.iter().map(|p| p.invoice_count).sum();
        TrendSummary {
            total_amount,
            invoice_count,
            average_ticket: total_amount.average_over(invoice_count),
        }
    }
}

/// Headline figures for the whole ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardSummary {
    /// Sum of all `final` invoice totals.
    pub total_sales: Money,
    pub invoice_count: i64,
    /// Items with stock below [`LOW_STOCK_THRESHOLD`].
    pub low_stock_items: i64,
    pub party_count: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_window_start() {
        let today = d(2025, 3, 31);
        assert_eq!(Period::Daily.window_start(today), d(2025, 3, 1));
        assert_eq!(Period::Monthly.window_start(today), d(2024, 3, 31));
        assert_eq!(Period::Annual.window_start(today), d(2020, 3, 31));
    }

    #[test]
    fn test_window_start_clamps_month_end() {
        assert_eq!(Period::Monthly.window_start(d(2024, 2, 29)), d(2023, 2, 28));
    }

    #[test]
    fn test_bucket_labels() {
        let date = d(2025, 1, 15);
        assert_eq!(Period::Daily.bucket_label(date), "2025-01-15");
        assert_eq!(Period::Monthly.bucket_label(date), "2025-01");
        assert_eq!(Period::Annual.bucket_label(date), "2025");
    }

    #[test]
    fn test_parse_period() {
        assert_eq!("Monthly".parse::<Period>().unwrap(), Period::Monthly);
        assert_eq!("yearly".parse::<Period>().unwrap(), Period::Annual);
        assert_eq!("day".parse::<Period>().unwrap(), Period::Daily);
        assert!("weekly".parse::<Period>().is_err());
    }

    #[test]
    fn test_trend_summary() {
        let points = vec![
            TrendPoint {
                bucket_label: "2025-01".to_string(),
                total_amount_cents: 15000,
                invoice_count: 2,
            },
            TrendPoint {
                bucket_label: "2025-02".to_string(),
                total_amount_cents: 3000,
                invoice_count: 1,
            },
        ];

        let summary = TrendSummary::from_points(&points);
        assert_eq!(summary.total_amount.cents(), 18000);
        assert_eq!(summary.invoice_count, 3);
        assert_eq!(summary.average_ticket.cents(), 6000);

        let empty = TrendSummary::from_points(&[]);
        assert_eq!(empty.average_ticket, Money::zero());
    }
}
