use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use tracing::instrument;

use api_types::{GetTeamQuery, Team, TeamResponse};

use super::error::ErrorResponse;
use crate::AppState;

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/team/add", post(add_team))
        .route("/team/get", get(get_team))
}

#[instrument(name = "teams.add", skip(state, payload), fields(team_name = %payload.team_name))]
async fn add_team(
    State(state): State<AppState>,
    Json(payload): Json<Team>,
) -> Result<(StatusCode, Json<TeamResponse>), ErrorResponse> {
    let team = state.teams.create_team_with_users(&payload).await?;

    Ok((StatusCode::CREATED, Json(TeamResponse { team })))
}

#[instrument(name = "teams.get", skip(state), fields(team_name = %query.team_name))]
async fn get_team(
    State(state): State<AppState>,
    Query(query): Query<GetTeamQuery>,
) -> Result<Json<Team>, ErrorResponse> {
    let team = state.teams.get_team_by_name(&query.team_name).await?;

    Ok(Json(team))
}
