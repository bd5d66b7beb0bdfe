//! # Commands Module
//!
//! One async function per CLI action. Each takes the state it needs and
//! returns a serializable value or an [`ApiError`](crate::error::ApiError);
//! printing is left to the dispatcher.
//!
//! ## Command Categories
//! - **Party**: `add_party`, `list_parties`
//! - **Item**: `add_item`, `list_items`, `check_stock`
//! - **Invoice**: `create_invoice`, `list_invoices`, `show_invoice`
//! - **Employee**: `add_employee`, `list_employees`, `pay_slip`
//! - **Report**: `sales_trend`, `top_products`, `top_customers`, `dashboard`
//! - **Export**: `export` (CSV)

pub mod employee;
pub mod export;
pub mod invoice;
pub mod item;
pub mod party;
pub mod report;

#[cfg(test)]
pub(crate) mod test_support {
    use bizledger_db::{Database, DbConfig};

    use crate::state::DbState;

    pub async fn db() -> DbState {
        DbState::new(Database::new(DbConfig::in_memory()).await.unwrap())
    }
}
