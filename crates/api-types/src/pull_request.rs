use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Full pull-request projection: the status is rendered by name and the
/// reviewer list is in slot order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    pub pull_request_id: Uuid,
    pub pull_request_name: String,
    pub author_id: Uuid,
    pub status: String,
    pub assigned_reviewers: Vec<Uuid>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "mergedAt")]
    pub merged_at: Option<DateTime<Utc>>,
}

/// Short projection used when listing pull requests by reviewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestShort {
    pub pull_request_id: Uuid,
    pub pull_request_name: String,
    pub author_id: Uuid,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePullRequestRequest {
    pub pull_request_id: Uuid,
    pub pull_request_name: String,
    pub author_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MergePullRequestRequest {
    pub pull_request_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReassignReviewerRequest {
    pub pull_request_id: Uuid,
    pub old_user_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestResponse {
    pub pr: PullRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReassignReviewerResponse {
    pub pr: PullRequest,
    pub replaced_by: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewerPullRequestsQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewerPullRequestsResponse {
    pub user_id: Uuid,
    pub pull_requests: Vec<PullRequestShort>,
}
