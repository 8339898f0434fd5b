use api_types::{RegisterUserRequest, UserProfile};
use db::{
    DBService,
    models::{User, user::UserError},
};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UserServiceError {
    #[error("user already exists")]
    AlreadyExists,
    #[error("user not found")]
    NotFound,
    #[error("user error: {0}")]
    User(#[from] UserError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Clone)]
pub struct UserService {
    db: DBService,
}

impl UserService {
    pub fn new(db: DBService) -> Self {
        Self { db }
    }

    pub async fn register_user(
        &self,
        req: &RegisterUserRequest,
    ) -> Result<UserProfile, UserServiceError> {
        let pool = &self.db.pool;

        if User::find_by_id(pool, req.user_id).await?.is_some() {
            return Err(UserServiceError::AlreadyExists);
        }

        let user = User::create(pool, req.user_id, &req.username, req.is_active).await?;

        Ok(UserProfile {
            user_id: user.id,
            username: user.username,
            is_active: user.is_active,
            team_name: None,
        })
    }

    /// Removes a user entirely; team memberships cascade away, so the user
    /// drops out of future candidate pools.
    pub async fn unregister_user(&self, user_id: Uuid) -> Result<(), UserServiceError> {
        let deleted = User::delete_by_id(&self.db.pool, user_id).await?;
        if deleted == 0 {
            return Err(UserServiceError::NotFound);
        }

        Ok(())
    }

    pub async fn list_users(&self) -> Result<Vec<UserProfile>, UserServiceError> {
        let users = User::find_all(&self.db.pool).await?;

        Ok(users
            .into_iter()
            .map(|user| UserProfile {
                user_id: user.id,
                username: user.username,
                is_active: user.is_active,
                team_name: None,
            })
            .collect())
    }
}
