//! Wire types shared between the service and HTTP layers.
//!
//! This crate contains:
//! - Projection types (e.g., `PullRequest`, `TeamMember`) - the API representation of entities
//! - Request types (e.g., `CreatePullRequestRequest`) - API input types
//! - Response wrappers matching the served JSON shapes

pub mod pull_request;
pub mod stats;
pub mod team;
pub mod user;

pub use pull_request::*;
pub use stats::*;
pub use team::*;
pub use user::*;
