use axum::{Json, routing::get};
use serde_json::{Value, json};

use crate::AppState;

pub fn router() -> axum::Router<AppState> {
    axum::Router::new().route("/health", get(health))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}
