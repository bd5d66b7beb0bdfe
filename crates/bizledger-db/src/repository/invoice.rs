//! # Invoice Repository
//!
//! Invoice headers and lines.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  InvoiceEngine::create_invoice ──┐                                      │
//! │                                  ├──► commit_in(tx)                     │
//! │  InvoiceRepository::insert_atomic┘      check ledger invariants         │
//! │     (opens its own tx)                  INSERT header                   │
//! │                                         INSERT lines                    │
//! │                                         decrement stock per item        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Header, lines and stock movement always land in one transaction: no
//! reader ever sees a header without its lines, and every stored line has
//! taken its quantity off the item. Invoices are never updated afterwards.

use chrono::NaiveDate;
use sqlx::sqlite::SqliteExecutor;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool, Transaction};
use std::collections::HashMap;
use tracing::{debug, info};

use bizledger_core::document::InvoiceDocument;
use bizledger_core::{
    CoreError, Invoice, InvoiceLine, InvoiceStatus, InvoiceSummary, Money, ValidationError,
};

use crate::error::{DbError, DbResult};
use crate::inventory;
use crate::repository::{item, party};

// =============================================================================
// Filter
// =============================================================================

/// Criteria for [`InvoiceRepository::list`]. Empty filter = every invoice.
///
/// ## Example
/// ```rust,ignore
/// let filter = InvoiceFilter::default()
///     .party(&party_id)
///     .between(from, to)
///     .limit(50);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceFilter {
    pub party_id: Option<String>,
    pub invoice_number: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<InvoiceStatus>,
    pub limit: Option<u32>,
}

impl InvoiceFilter {
    pub fn party(mut self, party_id: impl Into<String>) -> Self {
        self.party_id = Some(party_id.into());
        self
    }

    pub fn number(mut self, invoice_number: impl Into<String>) -> Self {
        self.invoice_number = Some(invoice_number.into());
        self
    }

    /// Inclusive date range. Either bound may be open.
    pub fn between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn status(mut self, status: InvoiceStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for invoice database operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Writes a header, its lines and their stock movement as one unit.
    ///
    /// Pre-priced records only; sales from a request go through the invoice
    /// engine. See [`commit_in`] for the checks applied.
    ///
    /// ## Errors
    /// * `DbError::Validation` - Ledger invariants broken, nothing written
    /// * `DbError::InsufficientStock` - Overdraft refused, nothing written
    pub async fn insert_atomic(
        &self,
        header: &Invoice,
        lines: &[InvoiceLine],
        allow_overdraft: bool,
    ) -> DbResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        commit_in(&mut tx, header, lines, allow_overdraft).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            invoice_id = %header.id,
            invoice_number = %header.invoice_number,
            lines = lines.len(),
            "Invoice stored"
        );
        Ok(())
    }

    /// Invoices matching `filter`, newest first, with party names.
    pub async fn list(&self, filter: &InvoiceFilter) -> DbResult<Vec<InvoiceSummary>> {
        let mut qb = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT
                i.id,
                i.invoice_number,
                i.party_id,
                p.name AS party_name,
                i.date,
                i.total_amount_cents,
                i.status,
                i.created_at
            FROM invoices i
            LEFT JOIN parties p ON p.id = i.party_id
            WHERE 1 = 1
            "#,
        );

        if let Some(party_id) = &filter.party_id {
            qb.push(" AND i.party_id = ").push_bind(party_id.clone());
        }
        if let Some(number) = &filter.invoice_number {
            qb.push(" AND i.invoice_number = ")
                .push_bind(number.trim().to_string());
        }
        if let Some(from) = filter.from {
            qb.push(" AND i.date >= ").push_bind(from);
        }
        if let Some(to) = filter.to {
            qb.push(" AND i.date <= ").push_bind(to);
        }
        if let Some(status) = filter.status {
            qb.push(" AND i.status = ").push_bind(status);
        }

        qb.push(" ORDER BY i.date DESC, i.created_at DESC, i.rowid DESC");

        if let Some(limit) = filter.limit {
            qb.push(" LIMIT ").push_bind(i64::from(limit));
        }

        let invoices = qb
            .build_query_as::<InvoiceSummary>()
            .fetch_all(&self.pool)
            .await?;

        debug!(count = invoices.len(), ?filter, "Listed invoices");
        Ok(invoices)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, invoice_number, party_id, date, total_amount_cents, status, created_at
            FROM invoices
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    /// Lines of one invoice, in line order. Empty for an unknown id.
    pub async fn lines(&self, invoice_id: &str) -> DbResult<Vec<InvoiceLine>> {
        let lines = sqlx::query_as::<_, InvoiceLine>(
            r#"
            SELECT id, invoice_id, item_id, line_no, quantity, rate_cents, total_cents
            FROM invoice_items
            WHERE invoice_id = ?1
            ORDER BY line_no
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Assembles the renderer payload for one invoice.
    ///
    /// ## Returns
    /// * `Ok(None)` - No invoice with this id
    /// * `Err(DbError::NotFound)` - Invoice references a missing party/item
    pub async fn document(&self, invoice_id: &str) -> DbResult<Option<InvoiceDocument>> {
        let Some(invoice) = self.get_by_id(invoice_id).await? else {
            return Ok(None);
        };

        let party = party::find_in(&self.pool, &invoice.party_id)
            .await?
            .ok_or_else(|| DbError::not_found("Party", &invoice.party_id))?;

        let lines = self.lines(invoice_id).await?;

        let mut items = HashMap::new();
        for line in &lines {
            if items.contains_key(&line.item_id) {
                continue;
            }
            if let Some(found) = item::find_in(&self.pool, &line.item_id).await? {
                items.insert(found.id.clone(), found);
            }
        }

        let document =
            InvoiceDocument::assemble(&invoice, &party, &lines, &items).map_err(|e| match e {
                CoreError::ItemNotFound(id) => DbError::not_found("Item", id),
                other => DbError::Internal(other.to_string()),
            })?;

        Ok(Some(document))
    }
}

// =============================================================================
// Transaction-Scoped Statements
// =============================================================================

/// Stores an invoice inside `tx`: header, lines, then one stock decrement
/// per distinct item (repeated lines are summed).
///
/// Checks the ledger invariants before writing: at least one line, every
/// line belongs to `header`, each line total is `quantity * rate`, and the
/// header total is the sum of the line totals. On any error the caller
/// drops `tx` and everything written here rolls back.
pub async fn commit_in(
    tx: &mut Transaction<'_, Sqlite>,
    header: &Invoice,
    lines: &[InvoiceLine],
    allow_overdraft: bool,
) -> DbResult<()> {
    check_ledger_invariants(header, lines)?;

    insert_header_in(&mut **tx, header).await?;
    insert_lines_in(&mut **tx, lines).await?;

    for (item_id, quantity) in quantities_by_item(lines) {
        if inventory::decrement(tx, item_id, quantity, allow_overdraft).await? {
            continue;
        }

        let available: Option<i64> =
            sqlx::query_scalar("SELECT stock_quantity FROM items WHERE id = ?1")
                .bind(item_id)
                .fetch_optional(&mut **tx)
                .await?;

        return Err(match available {
            Some(available) => DbError::InsufficientStock {
                item_id: item_id.to_string(),
                available,
                requested: quantity,
            },
            None => DbError::not_found("Item", item_id),
        });
    }

    Ok(())
}

fn quantities_by_item(lines: &[InvoiceLine]) -> Vec<(&str, i64)> {
    let mut totals: Vec<(&str, i64)> = Vec::new();
    for line in lines {
        match totals.iter_mut().find(|(id, _)| *id == line.item_id) {
            Some((_, qty)) => *qty += line.quantity,
            None => totals.push((line.item_id.as_str(), line.quantity)),
        }
    }
    totals
}

async fn insert_header_in(conn: &mut SqliteConnection, header: &Invoice) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO invoices (
            id, invoice_number, party_id, date, total_amount_cents, status, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&header.id)
    .bind(&header.invoice_number)
    .bind(&header.party_id)
    .bind(header.date)
    .bind(header.total_amount_cents)
    .bind(header.status)
    .bind(header.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn insert_lines_in(conn: &mut SqliteConnection, lines: &[InvoiceLine]) -> DbResult<()> {
    for line in lines {
        sqlx::query(
            r#"
            INSERT INTO invoice_items (
                id, invoice_id, item_id, line_no, quantity, rate_cents, total_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&line.id)
        .bind(&line.invoice_id)
        .bind(&line.item_id)
        .bind(line.line_no)
        .bind(line.quantity)
        .bind(line.rate_cents)
        .bind(line.total_cents)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Number of stored invoices using `invoice_number`.
pub async fn count_by_number_in<'e, E>(executor: E, invoice_number: &str) -> DbResult<i64>
where
    E: SqliteExecutor<'e>,
{
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices WHERE invoice_number = ?1")
        .bind(invoice_number)
        .fetch_one(executor)
        .await?;
    Ok(count)
}

fn check_ledger_invariants(header: &Invoice, lines: &[InvoiceLine]) -> DbResult<()> {
    let invalid = |field: &str, reason: String| {
        DbError::Validation(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason,
        })
    };

    if lines.is_empty() {
        return Err(DbError::Validation(ValidationError::Required {
            field: "lines".to_string(),
        }));
    }

    let mut sum = Money::zero();
    for line in lines {
        if line.invoice_id != header.id {
            return Err(invalid(
                "invoice_id",
                format!("line {} belongs to {}", line.id, line.invoice_id),
            ));
        }
        let expected = line.rate().checked_multiply_quantity(line.quantity);
        if expected != Some(line.total()) {
            return Err(invalid(
                "total",
                format!("line {} total is not quantity x rate", line.line_no),
            ));
        }
        sum = sum
            .checked_add(line.total())
            .ok_or_else(|| invalid("total_amount", "overflow".to_string()))?;
    }

    if sum != header.total_amount() {
        return Err(invalid(
            "total_amount",
            format!(
                "header total {} does not match line sum {}",
                header.total_amount().to_decimal_string(),
                sum.to_decimal_string()
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use bizledger_core::{new_id, NewItem, NewParty};
    use chrono::Utc;

    struct Fixture {
        db: Database,
        party_id: String,
        item_id: String,
    }

    async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let party = db
            .parties()
            .insert(&NewParty {
                name: "Acme".into(),
                phone: Some("555-0100".into()),
            })
            .await
            .unwrap();
        let item = db
            .items()
            .insert(&NewItem {
                name: "Widget".into(),
                sku: None,
                price_cents: 5000,
                stock_quantity: 10,
                tax_rate_bps: 1800,
            })
            .await
            .unwrap();
        Fixture {
            db,
            party_id: party.id,
            item_id: item.id,
        }
    }

    fn invoice(f: &Fixture, number: &str, date: NaiveDate, qty: i64) -> (Invoice, Vec<InvoiceLine>) {
        let id = new_id();
        let line = InvoiceLine {
            id: new_id(),
            invoice_id: id.clone(),
            item_id: f.item_id.clone(),
            line_no: 1,
            quantity: qty,
            rate_cents: 5000,
            total_cents: qty * 5000,
        };
        let header = Invoice {
            id,
            invoice_number: number.to_string(),
            party_id: f.party_id.clone(),
            date,
            total_amount_cents: qty * 5000,
            status: InvoiceStatus::Final,
            created_at: Utc::now(),
        };
        (header, vec![line])
    }

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    #[tokio::test]
    async fn test_insert_atomic_and_read_back() {
        let f = fixture().await;
        let repo = f.db.invoices();
        let (header, lines) = invoice(&f, "INV-1", d(1, 15), 3);

        repo.insert_atomic(&header, &lines, true).await.unwrap();

        let stored = repo.get_by_id(&header.id).await.unwrap().unwrap();
        assert_eq!(stored.total_amount_cents, 15000);
        assert_eq!(stored.date, d(1, 15));
        assert_eq!(stored.status, InvoiceStatus::Final);

        let stored_lines = repo.lines(&header.id).await.unwrap();
        assert_eq!(stored_lines, lines);

        let widget = f.db.items().get_by_id(&f.item_id).await.unwrap().unwrap();
        assert_eq!(widget.stock_quantity, 7);
    }

    async fn line_rows(f: &Fixture) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM invoice_items")
            .fetch_one(f.db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_refused_second_line_rolls_back_written_rows() {
        let f = fixture().await;
        let gadget = f
            .db
            .items()
            .insert(&NewItem {
                name: "Gadget".into(),
                sku: None,
                price_cents: 1000,
                stock_quantity: 1,
                tax_rate_bps: 0,
            })
            .await
            .unwrap();

        let (mut header, mut lines) = invoice(&f, "INV-1", d(1, 15), 2);
        lines.push(InvoiceLine {
            id: new_id(),
            invoice_id: header.id.clone(),
            item_id: gadget.id.clone(),
            line_no: 2,
            quantity: 5,
            rate_cents: 1000,
            total_cents: 5000,
        });
        header.total_amount_cents += 5000;

        // header, both lines and the Widget decrement are written before
        // the Gadget guard refuses
        let err = f
            .db
            .invoices()
            .insert_atomic(&header, &lines, false)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::InsufficientStock { available: 1, requested: 5, .. }
        ));

        assert_eq!(f.db.invoices().count().await.unwrap(), 0);
        assert_eq!(line_rows(&f).await, 0);
        assert_eq!(f.db.inventory().stock_of(&f.item_id).await.unwrap(), 10);
        assert_eq!(f.db.inventory().stock_of(&gadget.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_repeated_item_lines_decrement_once_in_total() {
        let f = fixture().await;
        let (mut header, mut lines) = invoice(&f, "INV-1", d(1, 15), 3);
        let repeat = InvoiceLine {
            id: new_id(),
            line_no: 2,
            ..lines[0].clone()
        };
        lines.push(repeat);
        header.total_amount_cents *= 2;

        f.db.invoices().insert_atomic(&header, &lines, false).await.unwrap();
        assert_eq!(f.db.inventory().stock_of(&f.item_id).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_insert_atomic_rejects_broken_totals() {
        let f = fixture().await;
        let (mut header, lines) = invoice(&f, "INV-1", d(1, 15), 3);
        header.total_amount_cents += 1;

        let err = f.db.invoices().insert_atomic(&header, &lines, true).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
        assert_eq!(f.db.invoices().count().await.unwrap(), 0);

        let err = f.db.invoices().insert_atomic(&header, &[], true).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }

    #[tokio::test]
    async fn test_failed_line_rolls_back_header() {
        let f = fixture().await;
        let (header, mut lines) = invoice(&f, "INV-1", d(1, 15), 1);
        lines[0].item_id = "no-such-item".to_string();

        let err = f.db.invoices().insert_atomic(&header, &lines, true).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert_eq!(f.db.invoices().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_filters_and_orders_newest_first() {
        let f = fixture().await;
        let repo = f.db.invoices();
        for (number, date) in [("INV-1", d(1, 5)), ("INV-2", d(2, 5)), ("INV-3", d(3, 5))] {
            let (header, lines) = invoice(&f, number, date, 1);
            repo.insert_atomic(&header, &lines, true).await.unwrap();
        }

        let all = repo.list(&InvoiceFilter::default()).await.unwrap();
        assert_eq!(
            all.iter().map(|i| i.invoice_number.as_str()).collect::<Vec<_>>(),
            vec!["INV-3", "INV-2", "INV-1"]
        );
        assert_eq!(all[0].party_name.as_deref(), Some("Acme"));

        let feb_on = repo
            .list(&InvoiceFilter::default().between(Some(d(2, 1)), None).limit(1))
            .await
            .unwrap();
        assert_eq!(feb_on.len(), 1);
        assert_eq!(feb_on[0].invoice_number, "INV-3");

        let by_number = repo
            .list(&InvoiceFilter::default().number("INV-2").party(&f.party_id))
            .await
            .unwrap();
        assert_eq!(by_number.len(), 1);

        let drafts = repo
            .list(&InvoiceFilter::default().status(InvoiceStatus::Draft))
            .await
            .unwrap();
        assert!(drafts.is_empty());
    }

    #[tokio::test]
    async fn test_document() {
        let f = fixture().await;
        let (header, lines) = invoice(&f, "INV-9", d(1, 15), 2);
        f.db.invoices().insert_atomic(&header, &lines, true).await.unwrap();

        let doc = f.db.invoices().document(&header.id).await.unwrap().unwrap();
        assert_eq!(doc.invoice_number, "INV-9");
        assert_eq!(doc.party_name, "Acme");
        assert_eq!(doc.lines.len(), 1);
        assert_eq!(doc.lines[0].name, "Widget");
        assert_eq!(doc.lines[0].total.cents(), 10000);

        assert!(f.db.invoices().document("missing").await.unwrap().is_none());
    }
}
