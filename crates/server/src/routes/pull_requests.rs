use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use rand::{SeedableRng, rngs::StdRng};
use tracing::instrument;

use api_types::{
    CreatePullRequestRequest, MergePullRequestRequest, PullRequestResponse,
    ReassignReviewerRequest, ReassignReviewerResponse, ReviewerPullRequestsQuery,
    ReviewerPullRequestsResponse,
};

use super::error::ErrorResponse;
use crate::AppState;

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/pullRequest/create", post(create_pull_request))
        .route("/pullRequest/reassign", post(reassign_reviewer))
        .route("/pullRequest/merge", post(merge_pull_request))
        .route("/users/getReview", get(pull_requests_by_reviewer))
}

#[instrument(
    name = "pull_requests.create",
    skip(state, payload),
    fields(pull_request_id = %payload.pull_request_id, author_id = %payload.author_id)
)]
async fn create_pull_request(
    State(state): State<AppState>,
    Json(payload): Json<CreatePullRequestRequest>,
) -> Result<(StatusCode, Json<PullRequestResponse>), ErrorResponse> {
    let mut rng = StdRng::from_entropy();
    let pr = state
        .pull_requests
        .create_pull_request(&mut rng, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(PullRequestResponse { pr })))
}

#[instrument(
    name = "pull_requests.reassign",
    skip(state, payload),
    fields(pull_request_id = %payload.pull_request_id, old_user_id = %payload.old_user_id)
)]
async fn reassign_reviewer(
    State(state): State<AppState>,
    Json(payload): Json<ReassignReviewerRequest>,
) -> Result<Json<ReassignReviewerResponse>, ErrorResponse> {
    let mut rng = StdRng::from_entropy();
    let response = state
        .pull_requests
        .reassign_reviewer(&mut rng, payload.old_user_id, payload.pull_request_id)
        .await?;

    Ok(Json(response))
}

#[instrument(
    name = "pull_requests.merge",
    skip(state, payload),
    fields(pull_request_id = %payload.pull_request_id)
)]
async fn merge_pull_request(
    State(state): State<AppState>,
    Json(payload): Json<MergePullRequestRequest>,
) -> Result<Json<PullRequestResponse>, ErrorResponse> {
    let pr = state
        .pull_requests
        .mark_as_merged(payload.pull_request_id)
        .await?;

    Ok(Json(PullRequestResponse { pr }))
}

#[instrument(
    name = "pull_requests.by_reviewer",
    skip(state),
    fields(user_id = %query.user_id)
)]
async fn pull_requests_by_reviewer(
    State(state): State<AppState>,
    Query(query): Query<ReviewerPullRequestsQuery>,
) -> Result<Json<ReviewerPullRequestsResponse>, ErrorResponse> {
    let pull_requests = state
        .pull_requests
        .find_pull_requests_by_reviewer(query.user_id)
        .await?;

    Ok(Json(ReviewerPullRequestsResponse {
        user_id: query.user_id,
        pull_requests,
    }))
}
