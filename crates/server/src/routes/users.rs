use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use tracing::instrument;
use uuid::Uuid;

use api_types::{ListUsersResponse, RegisterUserRequest, SetUserActiveRequest, UserResponse};

use super::error::ErrorResponse;
use crate::AppState;

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/users", get(list_users))
        .route("/users/register", post(register_user))
        .route("/users/setIsActive", post(set_user_active))
        .route("/users/{user_id}", delete(unregister_user))
}

#[instrument(name = "users.list", skip(state))]
async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<ListUsersResponse>, ErrorResponse> {
    let users = state.users.list_users().await?;

    Ok(Json(ListUsersResponse { users }))
}

#[instrument(
    name = "users.register",
    skip(state, payload),
    fields(user_id = %payload.user_id)
)]
async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ErrorResponse> {
    let user = state.users.register_user(&payload).await?;

    Ok((StatusCode::CREATED, Json(UserResponse { user })))
}

#[instrument(
    name = "users.set_is_active",
    skip(state, payload),
    fields(user_id = %payload.user_id, is_active = payload.is_active)
)]
async fn set_user_active(
    State(state): State<AppState>,
    Json(payload): Json<SetUserActiveRequest>,
) -> Result<Json<UserResponse>, ErrorResponse> {
    let user = state
        .teams
        .set_user_active(payload.user_id, payload.is_active)
        .await?;

    Ok(Json(UserResponse { user }))
}

#[instrument(name = "users.unregister", skip(state), fields(user_id = %user_id))]
async fn unregister_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, ErrorResponse> {
    state.users.unregister_user(user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
