use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User projection including the team the user belongs to, if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub username: String,
    pub is_active: bool,
    pub team_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUserRequest {
    pub user_id: Uuid,
    pub username: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetUserActiveRequest {
    pub user_id: Uuid,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserProfile>,
}
