use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub mod error;
mod health;
mod pull_requests;
mod stats;
mod teams;
mod users;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(pull_requests::router())
        .merge(teams::router())
        .merge(users::router())
        .merge(stats::router())
        .merge(health::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
