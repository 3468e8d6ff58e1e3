use serde::{Deserialize, Serialize};

use super::user::User;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
    Dismissed,
    Pending,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: u64,
    /// `None` when the reviewer's account has been deleted.
    pub user: Option<User>,
    pub body: Option<String>,
    pub state: ReviewState,
    /// Kept as the raw RFC 3339 string; pending reviews have none.
    #[serde(default)]
    pub submitted_at: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

impl Review {
    pub fn is_submitted(&self) -> bool {
        self.state != ReviewState::Pending && self.submitted_at.is_some()
    }

    pub fn reviewer(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.login.as_str())
    }
}
