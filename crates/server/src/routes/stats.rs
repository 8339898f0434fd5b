use axum::{Json, extract::State, routing::get};
use tracing::instrument;

use api_types::StatsResponse;

use super::error::ErrorResponse;
use crate::AppState;

pub fn router() -> axum::Router<AppState> {
    axum::Router::new().route("/stats", get(stats))
}

#[instrument(name = "stats.get", skip(state))]
async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ErrorResponse> {
    let stats = state.pull_requests.stats().await?;

    Ok(Json(stats))
}
