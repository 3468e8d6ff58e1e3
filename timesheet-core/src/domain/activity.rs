use time::OffsetDateTime;

/// A commit as read from a repository's history, before normalization.
///
/// The timestamp is kept in git's native shape: seconds since the epoch plus
/// the author's UTC offset in minutes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommit {
    pub project: String,
    pub seconds: i64,
    pub offset_minutes: i32,
    pub message: String,
    pub author: String,
}

/// A pull request review as returned by the code-hosting service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReview {
    pub repository: String,
    /// RFC 3339, absent for reviews that were never submitted.
    pub submitted_at: Option<String>,
    pub pull_request_title: String,
    pub body: Option<String>,
    pub reviewer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitEntry {
    pub project: String,
    pub timestamp: OffsetDateTime,
    /// Summary line of the commit message.
    pub message: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewEntry {
    pub repository: String,
    pub timestamp: OffsetDateTime,
    pub pull_request_title: String,
    /// Single-line review text, or the placeholder if the reviewer left none.
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityEntry {
    Commit(CommitEntry),
    Review(ReviewEntry),
}

impl ActivityEntry {
    pub fn timestamp(&self) -> OffsetDateTime {
        match self {
            Self::Commit(commit) => commit.timestamp,
            Self::Review(review) => review.timestamp,
        }
    }

    /// Project name for commits, repository for reviews.
    pub fn category(&self) -> &str {
        match self {
            Self::Commit(commit) => &commit.project,
            Self::Review(review) => &review.repository,
        }
    }

    pub fn description(&self) -> String {
        match self {
            Self::Commit(commit) => commit.message.clone(),
            Self::Review(review) => format!("{}: {}", review.pull_request_title, review.body),
        }
    }
}

impl From<CommitEntry> for ActivityEntry {
    fn from(commit: CommitEntry) -> Self {
        Self::Commit(commit)
    }
}

impl From<ReviewEntry> for ActivityEntry {
    fn from(review: ReviewEntry) -> Self {
        Self::Review(review)
    }
}
