use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TeamError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    pub async fn find_by_name<'e, E>(executor: E, name: &str) -> Result<Option<Self>, TeamError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let record = sqlx::query_as::<_, Self>(
            "SELECT id, name, created_at, updated_at
             FROM teams
             WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(executor)
        .await?;

        Ok(record)
    }

    /// The team a user belongs to. Membership is written once at team
    /// creation, so a user resolves to at most one team here.
    pub async fn find_by_user_id<'e, E>(executor: E, user_id: Uuid) -> Result<Option<Self>, TeamError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let record = sqlx::query_as::<_, Self>(
            "SELECT t.id, t.name, t.created_at, t.updated_at
             FROM teams t
             INNER JOIN team_memberships tm ON tm.team_id = t.id
             WHERE tm.user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

        Ok(record)
    }

    pub async fn create<'e, E>(executor: E, id: Uuid, name: &str) -> Result<Self, TeamError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let record = sqlx::query_as::<_, Self>(
            "INSERT INTO teams (id, name)
             VALUES ($1, $2)
             RETURNING id, name, created_at, updated_at",
        )
        .bind(id)
        .bind(name)
        .fetch_one(executor)
        .await?;

        Ok(record)
    }

    pub async fn add_member<'e, E>(executor: E, team_id: Uuid, user_id: Uuid) -> Result<(), TeamError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            "INSERT INTO team_memberships (team_id, user_id)
             VALUES ($1, $2)",
        )
        .bind(team_id)
        .bind(user_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn member_ids<'e, E>(executor: E, team_id: Uuid) -> Result<Vec<Uuid>, TeamError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id
             FROM team_memberships
             WHERE team_id = $1
             ORDER BY created_at ASC",
        )
        .bind(team_id)
        .fetch_all(executor)
        .await?;

        Ok(ids)
    }
}
