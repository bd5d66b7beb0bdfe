//! # Invoice Engine
//!
//! The one write path for sales: validates a request, prices it, applies
//! the stock policy, and commits header, lines and stock movement as a
//! single SQLite transaction.
//!
//! ## Commit Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  request.validate()                     (no I/O)                        │
//! │  write_gate.lock()                      one invoice commit at a time    │
//! │  BEGIN                                                                  │
//! │    party   ── find_in(tx) ──► UnknownParty                              │
//! │    items   ── find_in(tx) ──► UnknownItem                               │
//! │    price_invoice()           total = Σ quantity × rate                  │
//! │    stock_decision() per item ──► warning | InsufficientStock            │
//! │    count_by_number_in(tx) ──► DuplicateInvoiceNumber warning            │
//! │    commit_in(tx)             INSERT header + lines, then                │
//! │                              stock - q  (guarded when no overdraft)     │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Any error before COMMIT drops the transaction, which rolls back. The
//! store then holds exactly what it held before the call.

use chrono::Utc;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use bizledger_core::invoice::{
    price_invoice, stock_decision, AdvisoryWarning, CreatedInvoice, EngineConfig, InvoiceRequest,
};
use bizledger_core::{new_id, InvoiceError, InvoiceResult};

use crate::error::DbError;
use crate::repository::invoice::{commit_in, count_by_number_in};
use crate::repository::{item, party};

/// Creates invoices. Obtain one through [`crate::Database::invoice_engine`].
///
/// Engines built from the same `Database` share its write gate, so
/// concurrent `create_invoice` calls commit one after another.
#[derive(Debug, Clone)]
pub struct InvoiceEngine {
    pool: SqlitePool,
    write_gate: Arc<Mutex<()>>,
    config: EngineConfig,
}

impl InvoiceEngine {
    pub fn new(pool: SqlitePool, write_gate: Arc<Mutex<()>>, config: EngineConfig) -> Self {
        InvoiceEngine {
            pool,
            write_gate,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Creates an invoice and moves stock, all or nothing.
    ///
    /// ## Errors
    /// Every variant except `StorageFailure` is a validation failure (see
    /// [`InvoiceError::is_validation`]). Either way nothing is written.
    pub async fn create_invoice(&self, request: &InvoiceRequest) -> InvoiceResult<CreatedInvoice> {
        request.validate()?;

        let _gate = self.write_gate.lock().await;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        if party::find_in(&mut *tx, &request.party_id).await?.is_none() {
            return Err(InvoiceError::UnknownParty(request.party_id.clone()));
        }

        let mut items = HashMap::new();
        for item_id in request.item_ids() {
            let found = item::find_in(&mut *tx, item_id)
                .await?
                .ok_or_else(|| InvoiceError::UnknownItem(item_id.to_string()))?;
            items.insert(found.id.clone(), found);
        }

        let priced = price_invoice(request, &items)?;

        let mut warnings = Vec::new();
        for (item_id, requested) in request.requested_quantities() {
            let Some(item) = items.get(item_id) else {
                return Err(InvoiceError::UnknownItem(item_id.to_string()));
            };
            if let Some(warning) = stock_decision(&self.config, item, requested)? {
                warnings.push(warning);
            }
        }

        let invoice_number = request.invoice_number.trim();
        let existing = count_by_number_in(&mut *tx, invoice_number).await?;
        if existing > 0 {
            warnings.push(AdvisoryWarning::DuplicateInvoiceNumber {
                invoice_number: invoice_number.to_string(),
                existing,
            });
        }

        let invoice_id = new_id();
        let header = priced.header(&invoice_id, request, Utc::now());
        let lines = priced.line_records(&invoice_id);

        commit_in(&mut tx, &header, &lines, self.config.allow_overdraft)
            .await
            .map_err(|e| match e {
                // Guard refused: stock changed since the policy check.
                DbError::InsufficientStock {
                    item_id,
                    available,
                    requested,
                } => InvoiceError::InsufficientStock {
                    item_name: items
                        .get(&item_id)
                        .map(|item| item.name.clone())
                        .unwrap_or_else(|| item_id.clone()),
                    item_id,
                    available,
                    requested,
                },
                other => other.into(),
            })?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        for warning in &warnings {
            warn!(invoice_id = %invoice_id, %warning, "Invoice committed with warning");
        }
        info!(
            invoice_id = %invoice_id,
            invoice_number = %header.invoice_number,
            total = %priced.total,
            lines = lines.len(),
            "Invoice created"
        );
        debug!(party_id = %request.party_id, date = %request.date, "Invoice header");

        Ok(CreatedInvoice {
            invoice_id,
            invoice_number: header.invoice_number,
            total_amount: priced.total,
            line_count: lines.len(),
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use bizledger_core::invoice::LineRequest;
    use bizledger_core::{Money, NewItem, NewParty};
    use chrono::NaiveDate;

    struct Shop {
        db: Database,
        party_id: String,
        widget: String,
        gadget: String,
    }

    async fn shop() -> Shop {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let party = db
            .parties()
            .insert(&NewParty {
                name: "Acme".into(),
                phone: None,
            })
            .await
            .unwrap();
        let mut ids = Vec::new();
        for (name, stock) in [("Widget", 10), ("Gadget", 2)] {
            let item = db
                .items()
                .insert(&NewItem {
                    name: name.into(),
                    sku: None,
                    price_cents: 5000,
                    stock_quantity: stock,
                    tax_rate_bps: 1800,
                })
                .await
                .unwrap();
            ids.push(item.id);
        }
        Shop {
            db,
            party_id: party.id,
            widget: ids.remove(0),
            gadget: ids.remove(0),
        }
    }

    fn request(shop: &Shop, number: &str, lines: Vec<LineRequest>) -> InvoiceRequest {
        InvoiceRequest {
            party_id: shop.party_id.clone(),
            invoice_number: number.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            lines,
        }
    }

    async fn stock(shop: &Shop, id: &str) -> i64 {
        shop.db.inventory().stock_of(id).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_invoice_commits_everything() {
        let shop = shop().await;
        let engine = shop.db.invoice_engine(EngineConfig::default());

        let created = engine
            .create_invoice(&request(
                &shop,
                "INV-1",
                vec![
                    LineRequest::new(&shop.widget, 3, Money::from_cents(5000)),
                    LineRequest::new(&shop.gadget, 1, Money::from_cents(4500)),
                ],
            ))
            .await
            .unwrap();

        assert_eq!(created.total_amount.cents(), 19500);
        assert_eq!(created.line_count, 2);
        assert!(created.warnings.is_empty());
        assert_eq!(stock(&shop, &shop.widget).await, 7);
        assert_eq!(stock(&shop, &shop.gadget).await, 1);

        let lines = shop.db.invoices().lines(&created.invoice_id).await.unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].rate_cents, 4500);
    }

    #[tokio::test]
    async fn test_unknown_party_and_item_write_nothing() {
        let shop = shop().await;
        let engine = shop.db.invoice_engine(EngineConfig::default());

        let mut bad_party = request(
            &shop,
            "INV-1",
            vec![LineRequest::new(&shop.widget, 1, Money::from_cents(5000))],
        );
        bad_party.party_id = "nobody".into();
        let err = engine.create_invoice(&bad_party).await.unwrap_err();
        assert!(matches!(err, InvoiceError::UnknownParty(_)));

        let err = engine
            .create_invoice(&request(
                &shop,
                "INV-2",
                vec![
                    LineRequest::new(&shop.widget, 1, Money::from_cents(5000)),
                    LineRequest::new("ghost", 1, Money::from_cents(100)),
                ],
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, InvoiceError::UnknownItem(ref id) if id == "ghost"));
        assert!(err.is_validation());

        assert_eq!(shop.db.invoices().count().await.unwrap(), 0);
        assert_eq!(stock(&shop, &shop.widget).await, 10);
    }

    #[tokio::test]
    async fn test_empty_cart_rejected() {
        let shop = shop().await;
        let err = shop
            .db
            .invoice_engine(EngineConfig::default())
            .create_invoice(&request(&shop, "INV-1", vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, InvoiceError::EmptyCart));
    }

    #[tokio::test]
    async fn test_overdraft_allowed_warns_and_goes_negative() {
        let shop = shop().await;
        let created = shop
            .db
            .invoice_engine(EngineConfig::default())
            .create_invoice(&request(
                &shop,
                "INV-1",
                vec![LineRequest::new(&shop.gadget, 5, Money::from_cents(5000))],
            ))
            .await
            .unwrap();

        assert!(matches!(
            created.warnings.as_slice(),
            [AdvisoryWarning::InsufficientStock { available: 2, requested: 5, .. }]
        ));
        assert_eq!(stock(&shop, &shop.gadget).await, -3);
    }

    #[tokio::test]
    async fn test_overdraft_refused_sums_repeated_lines() {
        let shop = shop().await;
        let engine = shop
            .db
            .invoice_engine(EngineConfig::default().allow_overdraft(false));

        // 1 + 2 > 2 even though each line alone fits
        let err = engine
            .create_invoice(&request(
                &shop,
                "INV-1",
                vec![
                    LineRequest::new(&shop.gadget, 1, Money::from_cents(5000)),
                    LineRequest::new(&shop.gadget, 2, Money::from_cents(5000)),
                ],
            ))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            InvoiceError::InsufficientStock { available: 2, requested: 3, .. }
        ));
        assert_eq!(stock(&shop, &shop.gadget).await, 2);
        assert_eq!(shop.db.invoices().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_number_is_a_warning() {
        let shop = shop().await;
        let engine = shop.db.invoice_engine(EngineConfig::default());
        let lines = vec![LineRequest::new(&shop.widget, 1, Money::from_cents(5000))];

        engine
            .create_invoice(&request(&shop, "INV-7", lines.clone()))
            .await
            .unwrap();
        let second = engine
            .create_invoice(&request(&shop, " INV-7 ", lines))
            .await
            .unwrap();

        assert_eq!(second.invoice_number, "INV-7");
        assert!(matches!(
            second.warnings.as_slice(),
            [AdvisoryWarning::DuplicateInvoiceNumber { existing: 1, .. }]
        ));
        assert_eq!(shop.db.invoices().count().await.unwrap(), 2);
    }
}
