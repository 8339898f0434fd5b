use db::models::{Status, status::StatusError};
use sqlx::{Executor, Sqlite};
use thiserror::Error;
use uuid::Uuid;

pub const OPEN: &str = "OPEN";
pub const MERGED: &str = "MERGED";

#[derive(Debug, Error)]
pub enum StatusResolutionError {
    /// The status enumeration in the store is missing a required row. This
    /// is a deployment/migration defect, not something a caller can fix by
    /// retrying the request.
    #[error("status '{0}' is not configured in the store")]
    ConfigMissing(String),
    #[error(transparent)]
    Storage(#[from] StatusError),
}

/// Resolves a status name against the full enumeration, fetched per call.
/// The enumeration is tiny and fixed, so no caching is done here.
pub async fn resolve_status_id<'e, E>(executor: E, name: &str) -> Result<Uuid, StatusResolutionError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let statuses = Status::find_all(executor).await?;
    id_by_name(&statuses, name)
}

pub fn id_by_name(statuses: &[Status], name: &str) -> Result<Uuid, StatusResolutionError> {
    statuses
        .iter()
        .find(|status| status.name == name)
        .map(|status| status.id)
        .ok_or_else(|| StatusResolutionError::ConfigMissing(name.to_string()))
}

pub fn name_by_id(statuses: &[Status], id: Uuid) -> Option<String> {
    statuses
        .iter()
        .find(|status| status.id == id)
        .map(|status| status.name.clone())
}
