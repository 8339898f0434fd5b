use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PullRequestError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PullRequest {
    pub id: Uuid,
    pub title: String,
    pub author_id: Uuid,
    pub status_id: Uuid,
    pub merged_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ReviewerAssignmentCount {
    pub reviewer_id: Uuid,
    pub username: String,
    pub assigned_count: i64,
}

impl PullRequest {
    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, PullRequestError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let record = sqlx::query_as::<_, Self>(
            "SELECT id, title, author_id, status_id, merged_at, created_at, updated_at
             FROM pull_requests
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(record)
    }

    pub async fn create<'e, E>(
        executor: E,
        id: Uuid,
        title: &str,
        author_id: Uuid,
        status_id: Uuid,
    ) -> Result<Self, PullRequestError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let record = sqlx::query_as::<_, Self>(
            "INSERT INTO pull_requests (id, title, author_id, status_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id, title, author_id, status_id, merged_at, created_at, updated_at",
        )
        .bind(id)
        .bind(title)
        .bind(author_id)
        .bind(status_id)
        .fetch_one(executor)
        .await?;

        Ok(record)
    }

    pub async fn mark_merged<'e, E>(
        executor: E,
        id: Uuid,
        status_id: Uuid,
        merged_at: DateTime<Utc>,
    ) -> Result<Self, PullRequestError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let record = sqlx::query_as::<_, Self>(
            "UPDATE pull_requests
             SET status_id = $2,
                 merged_at = $3,
                 updated_at = datetime('now', 'subsec')
             WHERE id = $1
             RETURNING id, title, author_id, status_id, merged_at, created_at, updated_at",
        )
        .bind(id)
        .bind(status_id)
        .bind(merged_at)
        .fetch_one(executor)
        .await?;

        Ok(record)
    }

    /// Reviewer IDs in slot order.
    pub async fn reviewer_ids<'e, E>(executor: E, id: Uuid) -> Result<Vec<Uuid>, PullRequestError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id
             FROM pull_request_reviewers
             WHERE pull_request_id = $1
             ORDER BY position ASC",
        )
        .bind(id)
        .fetch_all(executor)
        .await?;

        Ok(ids)
    }

    pub async fn add_reviewer<'e, E>(
        executor: E,
        id: Uuid,
        user_id: Uuid,
        position: i64,
    ) -> Result<(), PullRequestError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            "INSERT INTO pull_request_reviewers (pull_request_id, user_id, position)
             VALUES ($1, $2, $3)",
        )
        .bind(id)
        .bind(user_id)
        .bind(position)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Overwrites the slot held by `old_user_id` with `new_user_id`; the
    /// slot position is untouched.
    pub async fn replace_reviewer<'e, E>(
        executor: E,
        id: Uuid,
        old_user_id: Uuid,
        new_user_id: Uuid,
    ) -> Result<(), PullRequestError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            "UPDATE pull_request_reviewers
             SET user_id = $3
             WHERE pull_request_id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(old_user_id)
        .bind(new_user_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn find_by_reviewer<'e, E>(
        executor: E,
        user_id: Uuid,
    ) -> Result<Vec<Self>, PullRequestError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let records = sqlx::query_as::<_, Self>(
            "SELECT pr.id, pr.title, pr.author_id, pr.status_id, pr.merged_at,
                    pr.created_at, pr.updated_at
             FROM pull_requests pr
             INNER JOIN pull_request_reviewers prr ON prr.pull_request_id = pr.id
             WHERE prr.user_id = $1
             ORDER BY pr.created_at ASC",
        )
        .bind(user_id)
        .fetch_all(executor)
        .await?;

        Ok(records)
    }

    pub async fn count_all<'e, E>(executor: E) -> Result<i64, PullRequestError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pull_requests")
            .fetch_one(executor)
            .await?;

        Ok(count)
    }

    pub async fn count_by_status<'e, E>(
        executor: E,
        status_id: Uuid,
    ) -> Result<i64, PullRequestError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM pull_requests WHERE status_id = $1",
        )
        .bind(status_id)
        .fetch_one(executor)
        .await?;

        Ok(count)
    }

    /// Per-reviewer assignment counts over all pull requests, busiest first.
    pub async fn reviewer_assignment_counts<'e, E>(
        executor: E,
    ) -> Result<Vec<ReviewerAssignmentCount>, PullRequestError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let records = sqlx::query_as::<_, ReviewerAssignmentCount>(
            "SELECT prr.user_id AS reviewer_id,
                    u.username AS username,
                    COUNT(prr.pull_request_id) AS assigned_count
             FROM pull_request_reviewers prr
             INNER JOIN users u ON u.id = prr.user_id
             GROUP BY prr.user_id, u.username
             ORDER BY assigned_count DESC, u.username ASC",
        )
        .fetch_all(executor)
        .await?;

        Ok(records)
    }
}
