//! # Item Commands

use tracing::{debug, info};

use bizledger_core::invoice::Availability;
use bizledger_core::{Item, Money, NewItem, TaxRate};

use crate::error::ApiError;
use crate::state::DbState;

/// Registers an item. `price` is a decimal string, `tax_percent` e.g. `18`.
pub async fn add_item(
    db: &DbState,
    name: String,
    sku: Option<String>,
    price: &str,
    stock: i64,
    tax_percent: f64,
) -> Result<Item, ApiError> {
    debug!(name = %name, price, stock, tax_percent, "add_item command");

    if !tax_percent.is_finite() || !(0.0..=100.0).contains(&tax_percent) {
        return Err(ApiError::validation("tax must be a percentage between 0 and 100"));
    }

    let item = db
        .inner()
        .items()
        .insert(&NewItem {
            name,
            sku,
            price_cents: Money::parse(price)?.cents(),
            stock_quantity: stock,
            tax_rate_bps: TaxRate::from_percentage(tax_percent).bps(),
        })
        .await?;

    info!(item_id = %item.id, "Item added");
    Ok(item)
}

pub async fn list_items(db: &DbState) -> Result<Vec<Item>, ApiError> {
    Ok(db.inner().items().list().await?)
}

/// Advisory stock check by item id or SKU; nothing is reserved.
pub async fn check_stock(db: &DbState, item_key: &str, qty: i64) -> Result<Availability, ApiError> {
    let items = db.inner().items();
    let item = match items.get_by_id(item_key).await? {
        Some(item) => item,
        None => items
            .get_by_sku(item_key)
            .await?
            .ok_or_else(|| ApiError::not_found("Item", item_key))?,
    };

    Ok(db.inner().inventory().check_availability(&item.id, qty).await?)
}
