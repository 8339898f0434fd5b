use db::DBService;
use services::services::{PullRequestService, TeamService, UserService};

#[derive(Clone)]
pub struct AppState {
    pub pull_requests: PullRequestService,
    pub teams: TeamService,
    pub users: UserService,
}

impl AppState {
    pub fn new(db: DBService) -> Self {
        Self {
            pull_requests: PullRequestService::new(db.clone()),
            teams: TeamService::new(db.clone()),
            users: UserService::new(db),
        }
    }
}
