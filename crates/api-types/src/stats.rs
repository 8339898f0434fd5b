use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewerStats {
    pub reviewer_id: Uuid,
    pub username: String,
    pub assigned_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_pull_requests: i64,
    pub open_pull_requests: i64,
    pub merged_pull_requests: i64,
    pub reviewer_stats: Vec<ReviewerStats>,
}
