//! # Export Command

use std::io;
use tracing::info;

use bizledger_db::InvoiceFilter;

use crate::cli::{ExportArgs, ExportKind};
use crate::commands::report;
use crate::error::ApiError;
use crate::export as csv_export;
use crate::state::DbState;

/// Writes the requested CSV to `out` and returns the number of data rows.
pub async fn export<W: io::Write>(db: &DbState, args: &ExportArgs, out: W) -> Result<usize, ApiError> {
    let rows = match args.kind {
        ExportKind::Invoices => {
            let invoices = db.inner().invoices().list(&InvoiceFilter::default()).await?;
            csv_export::write_invoices(out, &invoices)?;
            invoices.len()
        }
        ExportKind::Inventory => {
            let items = db.inner().items().list().await?;
            csv_export::write_inventory(out, &items)?;
            items.len()
        }
        ExportKind::Trend => {
            let trend = report::sales_trend(db, &args.window).await?;
            csv_export::write_trend(out, &trend.points)?;
            trend.points.len()
        }
        ExportKind::TopProducts => {
            let ranking = report::top_products(db, &args.window, args.limit).await?;
            csv_export::write_rankings(out, &ranking.entries)?;
            ranking.entries.len()
        }
        ExportKind::TopCustomers => {
            let ranking = report::top_customers(db, &args.window, args.limit).await?;
            csv_export::write_rankings(out, &ranking.entries)?;
            ranking.entries.len()
        }
    };

    info!(kind = ?args.kind, rows, "Export written");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{PeriodArg, WindowArgs};
    use crate::commands::{item, test_support};

    fn args(kind: ExportKind) -> ExportArgs {
        ExportArgs {
            kind,
            window: WindowArgs {
                period: PeriodArg::Annual,
                as_of: Some("2025-06-30".into()),
            },
            limit: 5,
            out: None,
        }
    }

    #[tokio::test]
    async fn test_inventory_export() {
        let db = test_support::db().await;
        item::add_item(&db, "Widget".into(), Some("W-1".into()), "2.50", 4, 18.0)
            .await
            .unwrap();

        let mut buf = Vec::new();
        let rows = export(&db, &args(ExportKind::Inventory), &mut buf).await.unwrap();

        assert_eq!(rows, 1);
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Item Name,SKU,Price,Stock Qty,Total Value\nWidget,W-1,2.50,4,10.00\n"
        );
    }

    #[tokio::test]
    async fn test_empty_register_export() {
        let db = test_support::db().await;
        let mut buf = Vec::new();
        let rows = export(&db, &args(ExportKind::Invoices), &mut buf).await.unwrap();

        assert_eq!(rows, 0);
        assert!(String::from_utf8(buf).unwrap().starts_with("Invoice Number,"));
    }
}
