use api_types::{
    CreatePullRequestRequest, PullRequest as PullRequestView, PullRequestShort,
    ReassignReviewerResponse, ReviewerStats, StatsResponse,
};
use chrono::Utc;
use db::{
    DBService,
    models::{
        PullRequest, Status, Team, User, pull_request::PullRequestError, team::TeamError,
        user::UserError,
    },
};
use rand::Rng;
use sqlx::{Sqlite, Transaction};
use thiserror::Error;
use uuid::Uuid;

use super::{
    reviewer_selection::{self, MAX_REVIEWERS, NoCandidates},
    statuses::{self, MERGED, OPEN, StatusResolutionError},
};

#[derive(Debug, Error)]
pub enum PullRequestServiceError {
    #[error("pull request already exists")]
    AlreadyExists,
    #[error("pull request not found")]
    NotFound,
    #[error("author not found")]
    AuthorNotFound,
    #[error("no team found for user {0}")]
    TeamNotFound(Uuid),
    #[error("no users available to review")]
    NoReviewCandidates,
    #[error("user is not a reviewer")]
    UserNotReviewer,
    #[error("cannot change pull request state because already merged")]
    AlreadyMerged,
    #[error("team {team_id} references missing user {user_id}")]
    MissingTeamMember { team_id: Uuid, user_id: Uuid },
    #[error("status resolution error: {0}")]
    Status(#[from] StatusResolutionError),
    #[error("user error: {0}")]
    User(#[from] UserError),
    #[error("team error: {0}")]
    Team(#[from] TeamError),
    #[error("pull request error: {0}")]
    PullRequest(#[from] PullRequestError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<NoCandidates> for PullRequestServiceError {
    fn from(_: NoCandidates) -> Self {
        Self::NoReviewCandidates
    }
}

/// Coordinates the pull-request lifecycle: reviewer assignment at creation,
/// reviewer replacement, and the open -> merged transition.
///
/// Reviewer activity is checked when a slot is filled. A reviewer who goes
/// inactive afterwards keeps the slot until explicitly reassigned.
///
/// Every mutating operation runs inside a single store transaction, so two
/// concurrent writers to the same pull request cannot interleave their
/// read-decide-write cycles.
#[derive(Clone)]
pub struct PullRequestService {
    db: DBService,
}

impl PullRequestService {
    pub fn new(db: DBService) -> Self {
        Self { db }
    }

    pub async fn create_pull_request<R>(
        &self,
        rng: &mut R,
        req: &CreatePullRequestRequest,
    ) -> Result<PullRequestView, PullRequestServiceError>
    where
        R: Rng + ?Sized,
    {
        let mut tx = self.db.pool.begin().await?;

        if PullRequest::find_by_id(&mut *tx, req.pull_request_id)
            .await?
            .is_some()
        {
            return Err(PullRequestServiceError::AlreadyExists);
        }

        let author = User::find_by_id(&mut *tx, req.author_id)
            .await?
            .ok_or(PullRequestServiceError::AuthorNotFound)?;

        let team = Team::find_by_user_id(&mut *tx, author.id)
            .await?
            .ok_or(PullRequestServiceError::TeamNotFound(author.id))?;

        let candidates = active_teammates(&mut tx, &team, author.id, &[]).await?;
        if candidates.is_empty() {
            return Err(PullRequestServiceError::NoReviewCandidates);
        }

        let reviewers = reviewer_selection::select_reviewers(rng, &candidates, MAX_REVIEWERS);

        let all_statuses = Status::find_all(&mut *tx)
            .await
            .map_err(StatusResolutionError::from)?;
        let open_id = statuses::id_by_name(&all_statuses, OPEN)?;

        let pr = PullRequest::create(
            &mut *tx,
            req.pull_request_id,
            &req.pull_request_name,
            author.id,
            open_id,
        )
        .await?;

        for (position, reviewer_id) in reviewers.iter().enumerate() {
            PullRequest::add_reviewer(&mut *tx, pr.id, *reviewer_id, position as i64).await?;
        }

        tx.commit().await?;

        tracing::debug!(
            pull_request_id = %pr.id,
            reviewers = ?reviewers,
            "assigned reviewers to new pull request"
        );

        Ok(project(pr, reviewers, &all_statuses))
    }

    pub async fn reassign_reviewer<R>(
        &self,
        rng: &mut R,
        old_user_id: Uuid,
        pr_id: Uuid,
    ) -> Result<ReassignReviewerResponse, PullRequestServiceError>
    where
        R: Rng + ?Sized,
    {
        let mut tx = self.db.pool.begin().await?;

        let pr = PullRequest::find_by_id(&mut *tx, pr_id)
            .await?
            .ok_or(PullRequestServiceError::NotFound)?;

        let status = Status::find_by_id(&mut *tx, pr.status_id)
            .await
            .map_err(StatusResolutionError::from)?;
        if status.is_some_and(|status| status.name == MERGED) {
            return Err(PullRequestServiceError::AlreadyMerged);
        }

        let reviewers = PullRequest::reviewer_ids(&mut *tx, pr.id).await?;
        if !reviewers.contains(&old_user_id) {
            return Err(PullRequestServiceError::UserNotReviewer);
        }

        let team = Team::find_by_user_id(&mut *tx, old_user_id)
            .await?
            .ok_or(PullRequestServiceError::TeamNotFound(old_user_id))?;

        // Every current reviewer is excluded, including the one on the way
        // out, so the replacement is always a fresh teammate.
        let candidates = active_teammates(&mut tx, &team, pr.author_id, &reviewers).await?;
        if candidates.is_empty() {
            return Err(PullRequestServiceError::NoReviewCandidates);
        }

        let replacement = reviewer_selection::select_replacement(rng, &candidates)?;
        PullRequest::replace_reviewer(&mut *tx, pr.id, old_user_id, replacement).await?;
        let updated_reviewers = PullRequest::reviewer_ids(&mut *tx, pr.id).await?;

        let all_statuses = Status::find_all(&mut *tx)
            .await
            .map_err(StatusResolutionError::from)?;

        tx.commit().await?;

        tracing::debug!(
            pull_request_id = %pr.id,
            old_reviewer = %old_user_id,
            new_reviewer = %replacement,
            "reassigned reviewer"
        );

        Ok(ReassignReviewerResponse {
            pr: project(pr, updated_reviewers, &all_statuses),
            replaced_by: replacement,
        })
    }

    pub async fn mark_as_merged(
        &self,
        pr_id: Uuid,
    ) -> Result<PullRequestView, PullRequestServiceError> {
        let mut tx = self.db.pool.begin().await?;

        let pr = PullRequest::find_by_id(&mut *tx, pr_id)
            .await?
            .ok_or(PullRequestServiceError::NotFound)?;

        let all_statuses = Status::find_all(&mut *tx)
            .await
            .map_err(StatusResolutionError::from)?;
        let merged_id = statuses::id_by_name(&all_statuses, MERGED)?;

        let reviewers = PullRequest::reviewer_ids(&mut *tx, pr.id).await?;

        // Merging twice is a no-op: the original merge timestamp survives.
        if pr.status_id == merged_id {
            tx.commit().await?;
            return Ok(project(pr, reviewers, &all_statuses));
        }

        let updated = PullRequest::mark_merged(&mut *tx, pr.id, merged_id, Utc::now()).await?;
        tx.commit().await?;

        Ok(project(updated, reviewers, &all_statuses))
    }

    pub async fn find_pull_requests_by_reviewer(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<PullRequestShort>, PullRequestServiceError> {
        let pool = &self.db.pool;

        let prs = PullRequest::find_by_reviewer(pool, user_id).await?;
        let all_statuses = Status::find_all(pool)
            .await
            .map_err(StatusResolutionError::from)?;

        Ok(prs
            .into_iter()
            .map(|pr| PullRequestShort {
                pull_request_id: pr.id,
                pull_request_name: pr.title,
                author_id: pr.author_id,
                status: statuses::name_by_id(&all_statuses, pr.status_id).unwrap_or_default(),
            })
            .collect())
    }

    pub async fn stats(&self) -> Result<StatsResponse, PullRequestServiceError> {
        let pool = &self.db.pool;

        let all_statuses = Status::find_all(pool)
            .await
            .map_err(StatusResolutionError::from)?;
        let open_id = statuses::id_by_name(&all_statuses, OPEN)?;
        let merged_id = statuses::id_by_name(&all_statuses, MERGED)?;

        let total = PullRequest::count_all(pool).await?;
        let open = PullRequest::count_by_status(pool, open_id).await?;
        let merged = PullRequest::count_by_status(pool, merged_id).await?;

        let reviewer_stats = PullRequest::reviewer_assignment_counts(pool)
            .await?
            .into_iter()
            .map(|row| ReviewerStats {
                reviewer_id: row.reviewer_id,
                username: row.username,
                assigned_count: row.assigned_count,
            })
            .collect();

        Ok(StatsResponse {
            total_pull_requests: total,
            open_pull_requests: open,
            merged_pull_requests: merged,
            reviewer_stats,
        })
    }
}

/// Active members of `team`, excluding the author and `excluded` users.
/// A membership row pointing at a user that no longer exists is a
/// data-consistency failure, not a candidate to skip.
async fn active_teammates(
    tx: &mut Transaction<'_, Sqlite>,
    team: &Team,
    author_id: Uuid,
    excluded: &[Uuid],
) -> Result<Vec<Uuid>, PullRequestServiceError> {
    let member_ids = Team::member_ids(&mut **tx, team.id).await?;

    let mut candidates = Vec::new();
    for user_id in member_ids {
        if user_id == author_id || excluded.contains(&user_id) {
            continue;
        }

        let user = User::find_by_id(&mut **tx, user_id).await?.ok_or(
            PullRequestServiceError::MissingTeamMember {
                team_id: team.id,
                user_id,
            },
        )?;

        if user.is_active {
            candidates.push(user_id);
        }
    }

    Ok(candidates)
}

fn project(pr: PullRequest, reviewers: Vec<Uuid>, all_statuses: &[Status]) -> PullRequestView {
    PullRequestView {
        pull_request_id: pr.id,
        pull_request_name: pr.title,
        author_id: pr.author_id,
        status: statuses::name_by_id(all_statuses, pr.status_id).unwrap_or_default(),
        assigned_reviewers: reviewers,
        created_at: pr.created_at,
        merged_at: pr.merged_at,
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    async fn service() -> (PullRequestService, DBService) {
        let db = DBService::new_in_memory().await.unwrap();
        (PullRequestService::new(db.clone()), db)
    }

    async fn seed_team(db: &DBService, name: &str, members: &[(Uuid, &str, bool)]) {
        let team = Team::create(&db.pool, Uuid::new_v4(), name).await.unwrap();
        for (user_id, username, is_active) in members {
            User::create(&db.pool, *user_id, username, *is_active)
                .await
                .unwrap();
            Team::add_member(&db.pool, team.id, *user_id).await.unwrap();
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn create_req(author_id: Uuid) -> CreatePullRequestRequest {
        CreatePullRequestRequest {
            pull_request_id: Uuid::new_v4(),
            pull_request_name: "Feature X".to_string(),
            author_id,
        }
    }

    #[tokio::test]
    async fn create_assigns_two_reviewers_from_active_teammates() {
        let (service, db) = service().await;
        let author = Uuid::new_v4();
        let active: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        let inactive = Uuid::new_v4();
        seed_team(
            &db,
            "large-team",
            &[
                (author, "author", true),
                (active[0], "r1", true),
                (active[1], "r2", true),
                (active[2], "r3", true),
                (inactive, "r4", false),
            ],
        )
        .await;

        let pr = service
            .create_pull_request(&mut rng(), &create_req(author))
            .await
            .unwrap();

        assert_eq!(pr.status, "OPEN");
        assert_eq!(pr.merged_at, None);
        assert_eq!(pr.assigned_reviewers.len(), 2);
        assert_ne!(pr.assigned_reviewers[0], pr.assigned_reviewers[1]);
        for reviewer in &pr.assigned_reviewers {
            assert_ne!(*reviewer, author);
            assert_ne!(*reviewer, inactive);
            assert!(active.contains(reviewer));
        }
    }

    #[tokio::test]
    async fn create_with_single_candidate_assigns_exactly_that_one() {
        let (service, db) = service().await;
        let author = Uuid::new_v4();
        let only = Uuid::new_v4();
        seed_team(
            &db,
            "small-team",
            &[(author, "author", true), (only, "r1", true)],
        )
        .await;

        let pr = service
            .create_pull_request(&mut rng(), &create_req(author))
            .await
            .unwrap();

        assert_eq!(pr.assigned_reviewers, vec![only]);
    }

    #[tokio::test]
    async fn create_without_active_teammates_fails() {
        let (service, db) = service().await;
        let author = Uuid::new_v4();
        let dormant = Uuid::new_v4();
        seed_team(
            &db,
            "sleepy-team",
            &[(author, "author", true), (dormant, "r1", false)],
        )
        .await;

        let err = service
            .create_pull_request(&mut rng(), &create_req(author))
            .await
            .unwrap_err();

        assert!(matches!(err, PullRequestServiceError::NoReviewCandidates));
    }

    #[tokio::test]
    async fn create_rejects_duplicate_pull_request_id() {
        let (service, db) = service().await;
        let author = Uuid::new_v4();
        seed_team(
            &db,
            "team",
            &[(author, "author", true), (Uuid::new_v4(), "r1", true)],
        )
        .await;

        let req = create_req(author);
        service
            .create_pull_request(&mut rng(), &req)
            .await
            .unwrap();
        let err = service
            .create_pull_request(&mut rng(), &req)
            .await
            .unwrap_err();

        assert!(matches!(err, PullRequestServiceError::AlreadyExists));
    }

    #[tokio::test]
    async fn create_fails_for_unknown_author() {
        let (service, _db) = service().await;

        let err = service
            .create_pull_request(&mut rng(), &create_req(Uuid::new_v4()))
            .await
            .unwrap_err();

        assert!(matches!(err, PullRequestServiceError::AuthorNotFound));
    }

    #[tokio::test]
    async fn create_fails_for_author_without_team() {
        let (service, db) = service().await;
        let author = Uuid::new_v4();
        User::create(&db.pool, author, "loner", true).await.unwrap();

        let err = service
            .create_pull_request(&mut rng(), &create_req(author))
            .await
            .unwrap_err();

        assert!(matches!(err, PullRequestServiceError::TeamNotFound(id) if id == author));
    }

    #[tokio::test]
    async fn merge_sets_status_and_timestamp_once() {
        let (service, db) = service().await;
        let author = Uuid::new_v4();
        seed_team(
            &db,
            "team",
            &[(author, "author", true), (Uuid::new_v4(), "r1", true)],
        )
        .await;
        let pr = service
            .create_pull_request(&mut rng(), &create_req(author))
            .await
            .unwrap();

        let merged = service.mark_as_merged(pr.pull_request_id).await.unwrap();
        assert_eq!(merged.status, "MERGED");
        let merged_at = merged.merged_at.expect("merge timestamp set");

        let again = service.mark_as_merged(pr.pull_request_id).await.unwrap();
        assert_eq!(again.status, "MERGED");
        assert_eq!(again.merged_at, Some(merged_at));
        assert_eq!(again.assigned_reviewers, merged.assigned_reviewers);
    }

    #[tokio::test]
    async fn merge_fails_for_unknown_pull_request() {
        let (service, _db) = service().await;

        let err = service.mark_as_merged(Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, PullRequestServiceError::NotFound));
    }

    #[tokio::test]
    async fn reassign_replaces_exactly_one_slot() {
        let (service, db) = service().await;
        let author = Uuid::new_v4();
        let teammates: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        seed_team(
            &db,
            "team",
            &[
                (author, "author", true),
                (teammates[0], "r1", true),
                (teammates[1], "r2", true),
                (teammates[2], "r3", true),
            ],
        )
        .await;
        let pr = service
            .create_pull_request(&mut rng(), &create_req(author))
            .await
            .unwrap();
        let before = pr.assigned_reviewers.clone();
        let outgoing = before[0];
        let spare = *teammates
            .iter()
            .find(|id| !before.contains(id))
            .expect("one teammate left over");

        let resp = service
            .reassign_reviewer(&mut rng(), outgoing, pr.pull_request_id)
            .await
            .unwrap();

        assert_eq!(resp.replaced_by, spare);
        let after = resp.pr.assigned_reviewers;
        assert_eq!(after.len(), before.len());
        assert_eq!(after[0], spare);
        assert_eq!(after[1], before[1]);
        assert!(!after.contains(&outgoing));
    }

    #[tokio::test]
    async fn reassign_fails_once_merged() {
        let (service, db) = service().await;
        let author = Uuid::new_v4();
        let r1 = Uuid::new_v4();
        seed_team(
            &db,
            "team",
            &[
                (author, "author", true),
                (r1, "r1", true),
                (Uuid::new_v4(), "r2", true),
            ],
        )
        .await;
        let pr = service
            .create_pull_request(&mut rng(), &create_req(author))
            .await
            .unwrap();
        service.mark_as_merged(pr.pull_request_id).await.unwrap();

        let reviewer = pr.assigned_reviewers[0];
        let err = service
            .reassign_reviewer(&mut rng(), reviewer, pr.pull_request_id)
            .await
            .unwrap_err();

        assert!(matches!(err, PullRequestServiceError::AlreadyMerged));
    }

    #[tokio::test]
    async fn reassign_fails_for_non_reviewer() {
        let (service, db) = service().await;
        let author = Uuid::new_v4();
        seed_team(
            &db,
            "team",
            &[(author, "author", true), (Uuid::new_v4(), "r1", true)],
        )
        .await;
        let pr = service
            .create_pull_request(&mut rng(), &create_req(author))
            .await
            .unwrap();

        let err = service
            .reassign_reviewer(&mut rng(), author, pr.pull_request_id)
            .await
            .unwrap_err();

        assert!(matches!(err, PullRequestServiceError::UserNotReviewer));
    }

    #[tokio::test]
    async fn reassign_fails_for_unknown_pull_request() {
        let (service, _db) = service().await;

        let err = service
            .reassign_reviewer(&mut rng(), Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, PullRequestServiceError::NotFound));
    }

    #[tokio::test]
    async fn reassign_without_spare_candidate_fails_and_keeps_the_list() {
        let (service, db) = service().await;
        let author = Uuid::new_v4();
        let r1 = Uuid::new_v4();
        let r2 = Uuid::new_v4();
        seed_team(
            &db,
            "team",
            &[(author, "author", true), (r1, "r1", true), (r2, "r2", true)],
        )
        .await;
        let pr = service
            .create_pull_request(&mut rng(), &create_req(author))
            .await
            .unwrap();
        let before = pr.assigned_reviewers.clone();
        assert_eq!(before.len(), 2);

        let err = service
            .reassign_reviewer(&mut rng(), before[0], pr.pull_request_id)
            .await
            .unwrap_err();
        assert!(matches!(err, PullRequestServiceError::NoReviewCandidates));

        let unchanged = PullRequest::reviewer_ids(&db.pool, pr.pull_request_id)
            .await
            .unwrap();
        assert_eq!(unchanged, before);
    }

    #[tokio::test]
    async fn inactive_spare_is_not_picked_as_replacement() {
        let (service, db) = service().await;
        let author = Uuid::new_v4();
        let r1 = Uuid::new_v4();
        let r2 = Uuid::new_v4();
        let benched = Uuid::new_v4();
        seed_team(
            &db,
            "team",
            &[
                (author, "author", true),
                (r1, "r1", true),
                (r2, "r2", true),
                (benched, "r3", false),
            ],
        )
        .await;
        let pr = service
            .create_pull_request(&mut rng(), &create_req(author))
            .await
            .unwrap();

        let err = service
            .reassign_reviewer(&mut rng(), pr.assigned_reviewers[0], pr.pull_request_id)
            .await
            .unwrap_err();

        assert!(matches!(err, PullRequestServiceError::NoReviewCandidates));
    }

    #[tokio::test]
    async fn find_by_reviewer_returns_short_projections() {
        let (service, db) = service().await;
        let author = Uuid::new_v4();
        let only = Uuid::new_v4();
        seed_team(
            &db,
            "team",
            &[(author, "author", true), (only, "r1", true)],
        )
        .await;
        let first = service
            .create_pull_request(&mut rng(), &create_req(author))
            .await
            .unwrap();
        let second = service
            .create_pull_request(&mut rng(), &create_req(author))
            .await
            .unwrap();

        let assigned = service.find_pull_requests_by_reviewer(only).await.unwrap();
        let ids: Vec<Uuid> = assigned.iter().map(|pr| pr.pull_request_id).collect();
        assert_eq!(assigned.len(), 2);
        assert!(ids.contains(&first.pull_request_id));
        assert!(ids.contains(&second.pull_request_id));
        assert!(assigned.iter().all(|pr| pr.status == "OPEN"));

        let none = service
            .find_pull_requests_by_reviewer(author)
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn stats_counts_statuses_and_reviewer_load() {
        let (service, db) = service().await;
        let author = Uuid::new_v4();
        let only = Uuid::new_v4();
        seed_team(
            &db,
            "team",
            &[(author, "author", true), (only, "r1", true)],
        )
        .await;
        let first = service
            .create_pull_request(&mut rng(), &create_req(author))
            .await
            .unwrap();
        service
            .create_pull_request(&mut rng(), &create_req(author))
            .await
            .unwrap();
        service.mark_as_merged(first.pull_request_id).await.unwrap();

        let stats = service.stats().await.unwrap();

        assert_eq!(stats.total_pull_requests, 2);
        assert_eq!(stats.open_pull_requests, 1);
        assert_eq!(stats.merged_pull_requests, 1);
        assert_eq!(stats.reviewer_stats.len(), 1);
        assert_eq!(stats.reviewer_stats[0].reviewer_id, only);
        assert_eq!(stats.reviewer_stats[0].assigned_count, 2);
    }
}
