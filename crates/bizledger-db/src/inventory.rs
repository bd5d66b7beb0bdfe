//! # Inventory Ledger
//!
//! Stock reads and the single stock write path.
//!
//! Stock only moves when an invoice commits, so [`decrement`] takes an
//! open transaction rather than a pool: there is no way to change stock
//! outside an invoice.
//!
//! ## Overdraft Guard
//! ```text
//! allow_overdraft = true   UPDATE items SET stock = stock - q WHERE id = ?
//! allow_overdraft = false  UPDATE items SET stock = stock - q WHERE id = ?
//!                                                   AND stock >= q
//!                          rows_affected == 0  →  refused
//! ```
//! The conditional form makes the floor check and the write one statement,
//! so two sales racing for the last unit cannot both pass.

use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;

use bizledger_core::invoice::Availability;

use crate::error::{DbError, DbResult};

/// Read-side view of stock levels.
#[derive(Debug, Clone)]
pub struct InventoryLedger {
    pool: SqlitePool,
}

impl InventoryLedger {
    pub fn new(pool: SqlitePool) -> Self {
        InventoryLedger { pool }
    }

    /// Current stock for one item.
    pub async fn stock_of(&self, item_id: &str) -> DbResult<i64> {
        let stock: Option<i64> =
            sqlx::query_scalar("SELECT stock_quantity FROM items WHERE id = ?1")
                .bind(item_id)
                .fetch_optional(&self.pool)
                .await?;

        stock.ok_or_else(|| DbError::not_found("Item", item_id))
    }

    /// Whether `quantity` units of `item_id` are on hand.
    ///
    /// Advisory only: nothing is reserved, and the answer can be stale by
    /// the time an invoice commits.
    pub async fn check_availability(&self, item_id: &str, quantity: i64) -> DbResult<Availability> {
        let available = self.stock_of(item_id).await?;
        Ok(Availability::evaluate(available, quantity))
    }
}

/// Subtracts `quantity` from an item's stock inside `tx`.
///
/// ## Returns
/// * `Ok(true)` - Stock decremented
/// * `Ok(false)` - Overdraft refused, or no such item; nothing changed
pub async fn decrement(
    tx: &mut Transaction<'_, Sqlite>,
    item_id: &str,
    quantity: i64,
    allow_overdraft: bool,
) -> DbResult<bool> {
    let sql = if allow_overdraft {
        "UPDATE items SET stock_quantity = stock_quantity - ?2 WHERE id = ?1"
    } else {
        "UPDATE items SET stock_quantity = stock_quantity - ?2 WHERE id = ?1 AND stock_quantity >= ?2"
    };

    let result = sqlx::query(sql)
        .bind(item_id)
        .bind(quantity)
        .execute(&mut **tx)
        .await?;

    let applied = result.rows_affected() == 1;
    debug!(item_id, quantity, allow_overdraft, applied, "Stock decrement");
    Ok(applied)
}
