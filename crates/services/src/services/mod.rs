pub mod pull_requests;
pub mod reviewer_selection;
pub mod statuses;
pub mod teams;
pub mod users;

pub use pull_requests::{PullRequestService, PullRequestServiceError};
pub use teams::{TeamService, TeamServiceError};
pub use users::{UserService, UserServiceError};
