//! # Party Commands

use tracing::{debug, info};

use bizledger_core::{NewParty, Party};

use crate::error::ApiError;
use crate::state::DbState;

pub async fn add_party(
    db: &DbState,
    name: String,
    phone: Option<String>,
) -> Result<Party, ApiError> {
    debug!(name = %name, "add_party command");

    let party = db.inner().parties().insert(&NewParty { name, phone }).await?;

    info!(party_id = %party.id, "Party added");
    Ok(party)
}

pub async fn list_parties(db: &DbState) -> Result<Vec<Party>, ApiError> {
    Ok(db.inner().parties().list().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_add_and_list() {
        let db = test_support::db().await;
        add_party(&db, "Acme".into(), None).await.unwrap();

        let parties = list_parties(&db).await.unwrap();
        assert_eq!(parties.len(), 1);
        assert_eq!(parties[0].name, "Acme");

        let err = add_party(&db, "".into(), None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
