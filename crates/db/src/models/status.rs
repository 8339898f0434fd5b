use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StatusError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// One row of the pull-request status enumeration. The rows are seeded by
/// the schema migration; the service layer resolves them by name.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Status {
    pub id: Uuid,
    pub name: String,
}

impl Status {
    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, StatusError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let record = sqlx::query_as::<_, Self>(
            "SELECT id, name
             FROM pull_request_statuses
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(record)
    }

    pub async fn find_all<'e, E>(executor: E) -> Result<Vec<Self>, StatusError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let records = sqlx::query_as::<_, Self>(
            "SELECT id, name
             FROM pull_request_statuses
             ORDER BY name ASC",
        )
        .fetch_all(executor)
        .await?;

        Ok(records)
    }
}
