use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UserError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, UserError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let record = sqlx::query_as::<_, Self>(
            "SELECT id, username, is_active, created_at, updated_at
             FROM users
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(record)
    }

    pub async fn find_all<'e, E>(executor: E) -> Result<Vec<Self>, UserError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let records = sqlx::query_as::<_, Self>(
            "SELECT id, username, is_active, created_at, updated_at
             FROM users
             ORDER BY created_at ASC",
        )
        .fetch_all(executor)
        .await?;

        Ok(records)
    }

    pub async fn create<'e, E>(
        executor: E,
        id: Uuid,
        username: &str,
        is_active: bool,
    ) -> Result<Self, UserError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let record = sqlx::query_as::<_, Self>(
            "INSERT INTO users (id, username, is_active)
             VALUES ($1, $2, $3)
             RETURNING id, username, is_active, created_at, updated_at",
        )
        .bind(id)
        .bind(username)
        .bind(is_active)
        .fetch_one(executor)
        .await?;

        Ok(record)
    }

    pub async fn set_active<'e, E>(executor: E, id: Uuid, is_active: bool) -> Result<Self, UserError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let record = sqlx::query_as::<_, Self>(
            "UPDATE users
             SET is_active = $2,
                 updated_at = datetime('now', 'subsec')
             WHERE id = $1
             RETURNING id, username, is_active, created_at, updated_at",
        )
        .bind(id)
        .bind(is_active)
        .fetch_one(executor)
        .await?;

        Ok(record)
    }

    pub async fn delete_by_id<'e, E>(executor: E, id: Uuid) -> Result<u64, UserError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
