//! # Party Repository
//!
//! Customers and counterparties. Insert and read only.

use chrono::Utc;
use sqlx::sqlite::SqliteExecutor;
use sqlx::SqlitePool;
use tracing::debug;

use bizledger_core::validation::{validate_party_name, validate_phone};
use bizledger_core::{new_id, NewParty, Party};

use crate::error::DbResult;

/// Repository for party database operations.
#[derive(Debug, Clone)]
pub struct PartyRepository {
    pool: SqlitePool,
}

impl PartyRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PartyRepository { pool }
    }

    /// Registers a party and returns the stored record.
    ///
    /// Name and phone are validated first; a blank phone is stored as NULL.
    pub async fn insert(&self, party: &NewParty) -> DbResult<Party> {
        validate_party_name(&party.name)?;
        validate_phone(party.phone.as_deref())?;

        let record = Party {
            id: new_id(),
            name: party.name.trim().to_string(),
            phone: party
                .phone
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            created_at: Utc::now(),
        };

        debug!(id = %record.id, name = %record.name, "Inserting party");

        sqlx::query("INSERT INTO parties (id, name, phone, created_at) VALUES (?1, ?2, ?3, ?4)")
            .bind(&record.id)
            .bind(&record.name)
            .bind(&record.phone)
            .bind(record.created_at)
            .execute(&self.pool)
            .await?;

        Ok(record)
    }

    /// All parties, in registration order.
    pub async fn list(&self) -> DbResult<Vec<Party>> {
        let parties = sqlx::query_as::<_, Party>(
            "SELECT id, name, phone, created_at FROM parties ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = parties.len(), "Listed parties");
        Ok(parties)
    }

    /// Gets a party by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Party>> {
        find_in(&self.pool, id).await
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM parties")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Looks a party up on any executor (pool or open transaction).
pub async fn find_in<'e, E>(executor: E, id: &str) -> DbResult<Option<Party>>
where
    E: SqliteExecutor<'e>,
{
    let party = sqlx::query_as::<_, Party>(
        "SELECT id, name, phone, created_at FROM parties WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(party)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig, DbError};

    #[tokio::test]
    async fn test_insert_and_list_in_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.parties();

        let zed = repo
            .insert(&NewParty {
                name: "  Zed Stores ".into(),
                phone: Some("  ".into()),
            })
            .await
            .unwrap();
        let acme = repo
            .insert(&NewParty {
                name: "Acme".into(),
                phone: Some("555-0100".into()),
            })
            .await
            .unwrap();

        assert_eq!(zed.name, "Zed Stores");
        assert_eq!(zed.phone, None);

        let all = repo.list().await.unwrap();
        assert_eq!(
            all.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
            vec![zed.id.as_str(), acme.id.as_str()]
        );
        assert_eq!(repo.count().await.unwrap(), 2);

        let fetched = repo.get_by_id(&acme.id).await.unwrap().unwrap();
        assert_eq!(fetched.phone.as_deref(), Some("555-0100"));
        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_rejects_blank_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db
            .parties()
            .insert(&NewParty {
                name: " ".into(),
                phone: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
        assert_eq!(db.parties().count().await.unwrap(), 0);
    }
}
