mod pull_request;
mod review;
mod user;

pub use pull_request::PullRequest;
pub use review::*;
pub use user::User;
