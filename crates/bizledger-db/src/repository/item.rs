//! # Item Repository
//!
//! Stocked items. Insert and read only: `stock_quantity` is written once
//! at registration and afterwards changes only through committed invoices
//! (see [`crate::inventory`]).

use chrono::Utc;
use sqlx::sqlite::SqliteExecutor;
use sqlx::SqlitePool;
use tracing::debug;

use bizledger_core::validation::{
    validate_item_name, validate_opening_stock, validate_price_cents, validate_sku,
    validate_tax_rate_bps,
};
use bizledger_core::{new_id, Item, NewItem};

use crate::error::DbResult;

/// Repository for item database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.items();
/// let item = repo.insert(&NewItem { name: "Widget".into(), .. }).await?;
/// let all = repo.list().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Registers an item with its opening stock.
    ///
    /// ## Returns
    /// * `Ok(Item)` - The stored record
    /// * `Err(DbError::Validation)` - Blank name, bad SKU, negative price or
    ///   stock, tax rate above 100%
    pub async fn insert(&self, item: &NewItem) -> DbResult<Item> {
        validate_item_name(&item.name)?;
        validate_sku(item.sku.as_deref())?;
        validate_price_cents(item.price_cents)?;
        validate_opening_stock(item.stock_quantity)?;
        validate_tax_rate_bps(item.tax_rate_bps)?;

        let record = Item {
            id: new_id(),
            name: item.name.trim().to_string(),
            sku: item
                .sku
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            price_cents: item.price_cents,
            stock_quantity: item.stock_quantity,
            tax_rate_bps: item.tax_rate_bps,
            created_at: Utc::now(),
        };

        debug!(id = %record.id, sku = ?record.sku, "Inserting item");

        sqlx::query(
            r#"
            INSERT INTO items (
                id, name, sku, price_cents, stock_quantity, tax_rate_bps, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&record.id)
        .bind(&record.name)
        .bind(&record.sku)
        .bind(record.price_cents)
        .bind(record.stock_quantity)
        .bind(record.tax_rate_bps)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    /// All items, in registration order.
    pub async fn list(&self) -> DbResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, sku, price_cents, stock_quantity, tax_rate_bps, created_at
            FROM items
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = items.len(), "Listed items");
        Ok(items)
    }

    /// Gets an item by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Item>> {
        find_in(&self.pool, id).await
    }

    /// Gets the first item registered with `sku`. SKUs are not unique.
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, sku, price_cents, stock_quantity, tax_rate_bps, created_at
            FROM items
            WHERE sku = ?1
            ORDER BY rowid
            LIMIT 1
            "#,
        )
        .bind(sku.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Number of items with stock strictly below `threshold`.
    pub async fn count_low_stock(&self, threshold: i64) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM items WHERE stock_quantity < ?1")
                .bind(threshold)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}

/// Looks an item up on any executor (pool or open transaction).
pub async fn find_in<'e, E>(executor: E, id: &str) -> DbResult<Option<Item>>
where
    E: SqliteExecutor<'e>,
{
    let item = sqlx::query_as::<_, Item>(
        r#"
        SELECT id, name, sku, price_cents, stock_quantity, tax_rate_bps, created_at
        FROM items
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(item)
}
