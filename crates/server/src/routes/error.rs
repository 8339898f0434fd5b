use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use services::services::{PullRequestServiceError, TeamServiceError, UserServiceError};

/// JSON error body with a stable machine-readable code, so callers can
/// branch without parsing the human-readable message.
#[derive(Debug)]
pub struct ErrorResponse {
    status: StatusCode,
    code: &'static str,
    message: String,
    details: String,
}

impl ErrorResponse {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: details.into(),
        }
    }

    fn internal(details: String) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL",
            "internal server error",
            details,
        )
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let body = json!({
            "error": {
                "code": self.code,
                "message": self.message,
                "details": self.details,
            }
        });

        (self.status, Json(body)).into_response()
    }
}

impl From<PullRequestServiceError> for ErrorResponse {
    fn from(err: PullRequestServiceError) -> Self {
        use PullRequestServiceError as E;

        let details = err.to_string();
        match &err {
            E::AlreadyExists => Self::new(
                StatusCode::CONFLICT,
                "PR_EXISTS",
                "pull request already exists",
                details,
            ),
            E::AlreadyMerged => Self::new(
                StatusCode::CONFLICT,
                "PR_MERGED",
                "pull request already merged",
                details,
            ),
            E::NoReviewCandidates => Self::new(
                StatusCode::CONFLICT,
                "NO_CANDIDATE",
                "no active users to assign as reviewers",
                details,
            ),
            E::UserNotReviewer => Self::new(
                StatusCode::BAD_REQUEST,
                "NOT_ASSIGNED",
                "user is not a reviewer",
                details,
            ),
            E::NotFound => Self::new(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "pull request not found",
                details,
            ),
            E::AuthorNotFound | E::TeamNotFound(_) => {
                let message = details.clone();
                Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message, details)
            }
            _ => {
                tracing::error!(error = %err, "pull request operation failed");
                Self::internal(details)
            }
        }
    }
}

impl From<TeamServiceError> for ErrorResponse {
    fn from(err: TeamServiceError) -> Self {
        use TeamServiceError as E;

        let details = err.to_string();
        match &err {
            E::AlreadyExists => Self::new(
                StatusCode::CONFLICT,
                "TEAM_EXISTS",
                "team already exists",
                details,
            ),
            E::NotFound => Self::new(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "team not found",
                details,
            ),
            E::UserNotFound => Self::new(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "user not found",
                details,
            ),
            _ => {
                tracing::error!(error = %err, "team operation failed");
                Self::internal(details)
            }
        }
    }
}

impl From<UserServiceError> for ErrorResponse {
    fn from(err: UserServiceError) -> Self {
        use UserServiceError as E;

        let details = err.to_string();
        match &err {
            E::AlreadyExists => Self::new(
                StatusCode::CONFLICT,
                "USER_EXISTS",
                "user already exists",
                details,
            ),
            E::NotFound => Self::new(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "user not found",
                details,
            ),
            _ => {
                tracing::error!(error = %err, "user operation failed");
                Self::internal(details)
            }
        }
    }
}
