//! # Report Commands
//!
//! Thin wrappers over the analytics engine. Every report takes an
//! optional `--as-of` date so results can be reproduced later.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use bizledger_core::analytics::{DashboardSummary, Period, RankedEntry, TrendPoint, TrendSummary};

use crate::cli::WindowArgs;
use crate::commands::invoice::date_or_today;
use crate::error::ApiError;
use crate::state::DbState;

/// Trend series plus totals across it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    pub period: Period,
    pub as_of: NaiveDate,
    pub points: Vec<TrendPoint>,
    pub summary: TrendSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingReport {
    pub period: Period,
    pub as_of: NaiveDate,
    pub entries: Vec<RankedEntry>,
}

fn resolve(window: &WindowArgs) -> Result<(Period, NaiveDate), ApiError> {
    Ok((
        window.period.into(),
        date_or_today("as_of", window.as_of.as_deref())?,
    ))
}

pub async fn sales_trend(db: &DbState, window: &WindowArgs) -> Result<TrendReport, ApiError> {
    let (period, as_of) = resolve(window)?;
    let points = db.inner().analytics().sales_trend_as_of(period, as_of).await?;

    Ok(TrendReport {
        period,
        as_of,
        summary: TrendSummary::from_points(&points),
        points,
    })
}

pub async fn top_products(
    db: &DbState,
    window: &WindowArgs,
    limit: u32,
) -> Result<RankingReport, ApiError> {
    let (period, as_of) = resolve(window)?;
    let entries = db
        .inner()
        .analytics()
        .top_products_as_of(period, limit, as_of)
        .await?;

    Ok(RankingReport {
        period,
        as_of,
        entries,
    })
}

pub async fn top_customers(
    db: &DbState,
    window: &WindowArgs,
    limit: u32,
) -> Result<RankingReport, ApiError> {
    let (period, as_of) = resolve(window)?;
    let entries = db
        .inner()
        .analytics()
        .top_customers_as_of(period, limit, as_of)
        .await?;

    Ok(RankingReport {
        period,
        as_of,
        entries,
    })
}

pub async fn dashboard(db: &DbState) -> Result<DashboardSummary, ApiError> {
    Ok(db.inner().analytics().dashboard_summary().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::PeriodArg;
    use crate::commands::{invoice, item, party, test_support};
    use crate::state::ConfigState;

    #[tokio::test]
    async fn test_reports() {
        let db = test_support::db().await;
        let acme = party::add_party(&db, "Acme".into(), None).await.unwrap();
        let widget = item::add_item(&db, "Widget".into(), None, "100.00", 10, 0.0)
            .await
            .unwrap();

        for (number, date) in [("INV-1", "2025-01-10"), ("INV-2", "2025-01-20")] {
            invoice::create_invoice(
                &db,
                &ConfigState::default(),
                acme.id.clone(),
                number.into(),
                Some(date),
                &[format!("{}:1", widget.id)],
            )
            .await
            .unwrap();
        }

        let window = WindowArgs {
            period: PeriodArg::Monthly,
            as_of: Some("2025-02-01".into()),
        };

        let trend = sales_trend(&db, &window).await.unwrap();
        assert_eq!(trend.points.len(), 1);
        assert_eq!(trend.summary.invoice_count, 2);
        assert_eq!(trend.summary.average_ticket.cents(), 10000);

        let customers = top_customers(&db, &window, 5).await.unwrap();
        assert_eq!(customers.entries[0].label, "Acme");
        assert_eq!(customers.entries[0].value_cents, 20000);

        let summary = dashboard(&db).await.unwrap();
        assert_eq!(summary.low_stock_items, 1);

        let bad = WindowArgs {
            period: PeriodArg::Daily,
            as_of: Some("yesterday".into()),
        };
        assert!(top_products(&db, &bad, 5).await.is_err());
    }
}
