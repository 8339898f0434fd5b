use api_types::{Team as TeamView, TeamMember, UserProfile};
use db::{
    DBService,
    models::{Team, User, team::TeamError, user::UserError},
};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TeamServiceError {
    #[error("team already exists")]
    AlreadyExists,
    #[error("team not found")]
    NotFound,
    #[error("user not found")]
    UserNotFound,
    #[error("team {team_id} references missing user {user_id}")]
    MissingTeamMember { team_id: Uuid, user_id: Uuid },
    #[error("user error: {0}")]
    User(#[from] UserError),
    #[error("team error: {0}")]
    Team(#[from] TeamError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Team roster management. Membership is fixed at creation time; the only
/// later mutation on a member is the activity flag.
#[derive(Clone)]
pub struct TeamService {
    db: DBService,
}

impl TeamService {
    pub fn new(db: DBService) -> Self {
        Self { db }
    }

    /// Creates a team together with its members. Members that are not yet
    /// registered are created on the fly; already-registered users are
    /// linked as they are.
    pub async fn create_team_with_users(
        &self,
        team: &TeamView,
    ) -> Result<TeamView, TeamServiceError> {
        let mut tx = self.db.pool.begin().await?;

        if Team::find_by_name(&mut *tx, &team.team_name)
            .await?
            .is_some()
        {
            return Err(TeamServiceError::AlreadyExists);
        }

        let created = Team::create(&mut *tx, Uuid::new_v4(), &team.team_name).await?;

        for member in &team.members {
            if User::find_by_id(&mut *tx, member.user_id).await?.is_none() {
                User::create(&mut *tx, member.user_id, &member.username, member.is_active).await?;
            }
            Team::add_member(&mut *tx, created.id, member.user_id).await?;
        }

        tx.commit().await?;

        tracing::debug!(team = %team.team_name, members = team.members.len(), "created team");

        Ok(team.clone())
    }

    pub async fn get_team_by_name(&self, name: &str) -> Result<TeamView, TeamServiceError> {
        let pool = &self.db.pool;

        let team = Team::find_by_name(pool, name)
            .await?
            .ok_or(TeamServiceError::NotFound)?;

        let mut members = Vec::new();
        for user_id in Team::member_ids(pool, team.id).await? {
            let user = User::find_by_id(pool, user_id).await?.ok_or(
                TeamServiceError::MissingTeamMember {
                    team_id: team.id,
                    user_id,
                },
            )?;
            members.push(TeamMember {
                user_id: user.id,
                username: user.username,
                is_active: user.is_active,
            });
        }

        Ok(TeamView {
            team_name: team.name,
            members,
        })
    }

    /// Flips a user's activity flag and reports the user together with the
    /// team they belong to.
    pub async fn set_user_active(
        &self,
        user_id: Uuid,
        is_active: bool,
    ) -> Result<UserProfile, TeamServiceError> {
        let pool = &self.db.pool;

        let user = User::find_by_id(pool, user_id)
            .await?
            .ok_or(TeamServiceError::UserNotFound)?;

        let updated = User::set_active(pool, user.id, is_active).await?;
        let team = Team::find_by_user_id(pool, user_id).await?;

        Ok(UserProfile {
            user_id: updated.id,
            username: updated.username,
            is_active: updated.is_active,
            team_name: team.map(|team| team.name),
        })
    }
}
