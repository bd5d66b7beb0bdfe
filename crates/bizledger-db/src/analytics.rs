//! # Analytics Engine
//!
//! Read-only aggregation over the invoice ledger: time-bucketed sales
//! trends, top-N breakdowns and the dashboard headline.
//!
//! ## Query Shape
//! ```text
//! invoices (status = 'final', date >= window_start)
//!    │
//!    ├── GROUP BY strftime(bucket_format, date)    → sales_trend
//!    ├── JOIN invoice_items, items GROUP BY name    → top_products
//!    └── JOIN parties GROUP BY name                 → top_customers
//! ```
//!
//! Each report is one SELECT, so it sees a committed snapshot and never a
//! half-written invoice. Ranking ties fall back to the first-registered
//! entity (lowest rowid).
//!
//! The window has no upper bound: invoices dated after `today` still
//! count. The `*_as_of` variants take an explicit `today`; the plain forms
//! use the current UTC date.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use bizledger_core::analytics::{
    DashboardSummary, Period, RankedEntry, TrendPoint, LOW_STOCK_THRESHOLD,
};
use bizledger_core::Money;

use crate::error::DbResult;
use crate::repository::item::ItemRepository;
use crate::repository::party::PartyRepository;

/// Read-only reporting over the ledger.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    pool: SqlitePool,
}

impl AnalyticsEngine {
    pub fn new(pool: SqlitePool) -> Self {
        AnalyticsEngine { pool }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    // =========================================================================
    // Trend
    // =========================================================================

    /// Sales per bucket over the period's lookback window, oldest first.
    ///
    /// Buckets without invoices are omitted.
    pub async fn sales_trend(&self, period: Period) -> DbResult<Vec<TrendPoint>> {
        self.sales_trend_as_of(period, Self::today()).await
    }

    pub async fn sales_trend_as_of(
        &self,
        period: Period,
        today: NaiveDate,
    ) -> DbResult<Vec<TrendPoint>> {
        let start = period.window_start(today);

        let points = sqlx::query_as::<_, TrendPoint>(
            r#"
            SELECT
                strftime(?1, date) AS bucket_label,
                SUM(total_amount_cents) AS total_amount_cents,
                COUNT(*) AS invoice_count
            FROM invoices
            WHERE status = 'final'
              AND date >= ?2
            GROUP BY bucket_label
            ORDER BY bucket_label ASC
            "#,
        )
        .bind(period.bucket_format())
        .bind(start)
        .fetch_all(&self.pool)
        .await?;

        debug!(%period, %start, %today, buckets = points.len(), "Sales trend");
        Ok(points)
    }

    // =========================================================================
    // Rankings
    // =========================================================================

    /// Items ranked by summed line totals inside the window.
    pub async fn top_products(&self, period: Period, limit: u32) -> DbResult<Vec<RankedEntry>> {
        self.top_products_as_of(period, limit, Self::today()).await
    }

    pub async fn top_products_as_of(
        &self,
        period: Period,
        limit: u32,
        today: NaiveDate,
    ) -> DbResult<Vec<RankedEntry>> {
        let start = period.window_start(today);

        let entries = sqlx::query_as::<_, RankedEntry>(
            r#"
            SELECT
                it.name AS label,
                SUM(ii.total_cents) AS value_cents
            FROM invoice_items ii
            JOIN invoices i ON i.id = ii.invoice_id
            JOIN items it ON it.id = ii.item_id
            WHERE i.status = 'final'
              AND i.date >= ?1
            GROUP BY it.name
            ORDER BY value_cents DESC, MIN(it.rowid) ASC
            LIMIT ?2
            "#,
        )
        .bind(start)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        debug!(%period, limit, rows = entries.len(), "Top products");
        Ok(entries)
    }

    /// Parties ranked by summed invoice totals inside the window.
    pub async fn top_customers(&self, period: Period, limit: u32) -> DbResult<Vec<RankedEntry>> {
        self.top_customers_as_of(period, limit, Self::today()).await
    }

    pub async fn top_customers_as_of(
        &self,
        period: Period,
        limit: u32,
        today: NaiveDate,
    ) -> DbResult<Vec<RankedEntry>> {
        let start = period.window_start(today);

        let entries = sqlx::query_as::<_, RankedEntry>(
            r#"
            SELECT
                p.name AS label,
                SUM(i.total_amount_cents) AS value_cents
            FROM invoices i
            JOIN parties p ON p.id = i.party_id
            WHERE i.status = 'final'
              AND i.date >= ?1
            GROUP BY p.name
            ORDER BY value_cents DESC, MIN(p.rowid) ASC
            LIMIT ?2
            "#,
        )
        .bind(start)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        debug!(%period, limit, rows = entries.len(), "Top customers");
        Ok(entries)
    }

    // =========================================================================
    // Dashboard
    // =========================================================================

    /// Whole-ledger headline figures (no time window).
    pub async fn dashboard_summary(&self) -> DbResult<DashboardSummary> {
        let (total_sales_cents, invoice_count): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN status = 'final' THEN total_amount_cents END), 0),
                COUNT(*)
            FROM invoices
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let low_stock_items = ItemRepository::new(self.pool.clone())
            .count_low_stock(LOW_STOCK_THRESHOLD)
            .await?;
        let party_count = PartyRepository::new(self.pool.clone()).count().await?;

        Ok(DashboardSummary {
            total_sales: Money::from_cents(total_sales_cents),
            invoice_count,
            low_stock_items,
            party_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use bizledger_core::invoice::{EngineConfig, InvoiceRequest, LineRequest};
    use bizledger_core::{NewItem, NewParty};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    async fn party(db: &Database, name: &str) -> String {
        db.parties()
            .insert(&NewParty {
                name: name.into(),
                phone: None,
            })
            .await
            .unwrap()
            .id
    }

    async fn item(db: &Database, name: &str, stock: i64) -> String {
        db.items()
            .insert(&NewItem {
                name: name.into(),
                sku: None,
                price_cents: 100,
                stock_quantity: stock,
                tax_rate_bps: 1800,
            })
            .await
            .unwrap()
            .id
    }

    async fn sell(db: &Database, party_id: &str, date: NaiveDate, lines: Vec<LineRequest>) {
        db.invoice_engine(EngineConfig::default())
            .create_invoice(&InvoiceRequest {
                party_id: party_id.to_string(),
                invoice_number: format!("INV-{date}"),
                date,
                lines,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_trend_buckets_and_window() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let acme = party(&db, "Acme").await;
        let widget = item(&db, "Widget", 100).await;

        sell(&db, &acme, d(2025, 1, 10), vec![LineRequest::new(&widget, 1, Money::from_cents(10000))]).await;
        sell(&db, &acme, d(2025, 1, 20), vec![LineRequest::new(&widget, 1, Money::from_cents(5000))]).await;
        sell(&db, &acme, d(2023, 6, 1), vec![LineRequest::new(&widget, 1, Money::from_cents(700))]).await;

        let monthly = db
            .analytics()
            .sales_trend_as_of(Period::Monthly, d(2025, 2, 1))
            .await
            .unwrap();
        assert_eq!(
            monthly,
            vec![TrendPoint {
                bucket_label: "2025-01".into(),
                total_amount_cents: 15000,
                invoice_count: 2,
            }]
        );

        let annual = db
            .analytics()
            .sales_trend_as_of(Period::Annual, d(2025, 2, 1))
            .await
            .unwrap();
        assert_eq!(
            annual.iter().map(|p| p.bucket_label.as_str()).collect::<Vec<_>>(),
            vec!["2023", "2025"]
        );

        // window edge is inclusive: 2025-01-20 is exactly 30 days before
        let daily = db
            .analytics()
            .sales_trend_as_of(Period::Daily, d(2025, 2, 19))
            .await
            .unwrap();
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].bucket_label, "2025-01-20");
    }

    #[tokio::test]
    async fn test_rankings_descending_with_limit() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let acme = party(&db, "Acme").await;
        let zed = party(&db, "Zed").await;
        let widget = item(&db, "Widget", 100).await;
        let gadget = item(&db, "Gadget", 100).await;
        let today = d(2025, 3, 1);

        sell(&db, &acme, d(2025, 2, 1), vec![LineRequest::new(&widget, 3, Money::from_cents(10000))]).await;
        sell(&db, &zed, d(2025, 2, 2), vec![LineRequest::new(&gadget, 5, Money::from_cents(10000))]).await;

        let products = db
            .analytics()
            .top_products_as_of(Period::Monthly, 5, today)
            .await
            .unwrap();
        assert_eq!(
            products,
            vec![
                RankedEntry { label: "Gadget".into(), value_cents: 50000 },
                RankedEntry { label: "Widget".into(), value_cents: 30000 },
            ]
        );

        let customers = db
            .analytics()
            .top_customers_as_of(Period::Monthly, 1, today)
            .await
            .unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].label, "Zed");
    }

    #[tokio::test]
    async fn test_ties_keep_registration_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let acme = party(&db, "Acme").await;
        let beta = item(&db, "Beta", 10).await;
        let alpha = item(&db, "Alpha", 10).await;

        sell(
            &db,
            &acme,
            d(2025, 2, 1),
            vec![
                LineRequest::new(&alpha, 1, Money::from_cents(500)),
                LineRequest::new(&beta, 1, Money::from_cents(500)),
            ],
        )
        .await;

        let products = db
            .analytics()
            .top_products_as_of(Period::Monthly, 5, d(2025, 2, 2))
            .await
            .unwrap();
        assert_eq!(products[0].label, "Beta");
        assert_eq!(products[1].label, "Alpha");
    }

    #[tokio::test]
    async fn test_future_dated_invoices_count() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let acme = party(&db, "Acme").await;
        let widget = item(&db, "Widget", 100).await;
        let today = d(2025, 6, 15);

        sell(&db, &acme, d(2025, 6, 16), vec![LineRequest::new(&widget, 2, Money::from_cents(500))]).await;

        let trend = db.analytics().sales_trend_as_of(Period::Daily, today).await.unwrap();
        assert_eq!(
            trend,
            vec![TrendPoint {
                bucket_label: "2025-06-16".into(),
                total_amount_cents: 1000,
                invoice_count: 1,
            }]
        );

        let products = db
            .analytics()
            .top_products_as_of(Period::Daily, 5, today)
            .await
            .unwrap();
        assert_eq!(products, vec![RankedEntry { label: "Widget".into(), value_cents: 1000 }]);

        let customers = db
            .analytics()
            .top_customers_as_of(Period::Daily, 5, today)
            .await
            .unwrap();
        assert_eq!(customers[0].label, "Acme");
    }

    #[tokio::test]
    async fn test_plain_forms_use_utc_today() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let acme = party(&db, "Acme").await;
        let widget = item(&db, "Widget", 100).await;
        let today = Utc::now().date_naive();

        sell(&db, &acme, today, vec![LineRequest::new(&widget, 1, Money::from_cents(300))]).await;

        let analytics = db.analytics();
        assert_eq!(
            analytics.sales_trend(Period::Daily).await.unwrap(),
            analytics.sales_trend_as_of(Period::Daily, today).await.unwrap()
        );
        assert_eq!(
            analytics.top_products(Period::Daily, 5).await.unwrap(),
            analytics.top_products_as_of(Period::Daily, 5, today).await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_dashboard_summary() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let acme = party(&db, "Acme").await;
        let widget = item(&db, "Widget", 12).await;
        item(&db, "Gadget", 50).await;

        sell(&db, &acme, d(2025, 1, 1), vec![LineRequest::new(&widget, 4, Money::from_cents(250))]).await;

        let summary = db.analytics().dashboard_summary().await.unwrap();
        assert_eq!(summary.total_sales.cents(), 1000);
        assert_eq!(summary.invoice_count, 1);
        assert_eq!(summary.low_stock_items, 1);
        assert_eq!(summary.party_count, 1);
    }
}
