use thiserror::Error;
use time::{format_description::well_known::Rfc3339, Duration, OffsetDateTime, UtcOffset};

use crate::{CommitEntry, EntryFilter, RawCommit, RawReview, ReviewEntry, TargetMonth};

pub const DEFAULT_REVIEW_PLACEHOLDER: &str = "Reviewed pull request";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

impl TryFrom<RawCommit> for CommitEntry {
    type Error = NormalizeError;

    fn try_from(raw: RawCommit) -> Result<Self, Self::Error> {
        Ok(Self {
            timestamp: git_timestamp(raw.seconds, raw.offset_minutes)?,
            message: summary_line(&raw.message),
            project: raw.project,
            author: raw.author,
        })
    }
}

impl ReviewEntry {
    pub fn try_from_raw(raw: RawReview, placeholder: &str) -> Result<Self, NormalizeError> {
        let submitted_at = raw.submitted_at.as_deref().ok_or_else(|| {
            NormalizeError::InvalidTimestamp(format!(
                "review on '{}' has no submission date",
                raw.pull_request_title
            ))
        })?;
        let timestamp = OffsetDateTime::parse(submitted_at, &Rfc3339)
            .map_err(|e| NormalizeError::InvalidTimestamp(format!("{submitted_at}: {e}")))?;

        let body = raw
            .body
            .as_deref()
            .map(single_line)
            .filter(|body| !body.is_empty())
            .unwrap_or_else(|| placeholder.to_owned());

        Ok(Self {
            repository: raw.repository,
            timestamp,
            pull_request_title: raw.pull_request_title,
            body,
        })
    }
}

/// Turns raw records into entries that belong to the target month.
///
/// Records with unreadable dates are logged and dropped, records outside the
/// month are dropped silently. When `offset` is set every timestamp is
/// shifted into it before the month check, so months are judged on the
/// reader's clock instead of each author's.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    pub month: TargetMonth,
    pub offset: Option<UtcOffset>,
    pub reviewer: Option<&'a str>,
    pub review_placeholder: &'a str,
}

impl<'a> Normalizer<'a> {
    pub fn new(month: TargetMonth) -> Self {
        Self {
            month,
            offset: None,
            reviewer: None,
            review_placeholder: DEFAULT_REVIEW_PLACEHOLDER,
        }
    }

    pub fn with_offset(self, offset: Option<UtcOffset>) -> Self {
        Self { offset, ..self }
    }

    pub fn with_reviewer(self, reviewer: Option<&'a str>) -> Self {
        Self { reviewer, ..self }
    }

    pub fn with_review_placeholder(self, review_placeholder: &'a str) -> Self {
        Self {
            review_placeholder,
            ..self
        }
    }

    pub fn normalize_commits(&self, raw: Vec<RawCommit>) -> Vec<CommitEntry> {
        let entries: Vec<CommitEntry> = raw
            .into_iter()
            .filter_map(|commit| {
                let project = commit.project.clone();
                match CommitEntry::try_from(commit).and_then(|entry| self.localize_commit(entry)) {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        tracing::warn!("Dropping commit in {}: {}", project, e);
                        None
                    }
                }
            })
            .collect();

        self.month.apply(entries)
    }

    /// Without a configured reviewer no review is kept. A blank reviewer
    /// counts as none, since reviews by deleted accounts carry an empty login.
    pub fn normalize_reviews(&self, raw: Vec<RawReview>) -> Vec<ReviewEntry> {
        let Some(reviewer) = self.reviewer.filter(|r| !r.trim().is_empty()) else {
            return Vec::new();
        };

        let entries: Vec<ReviewEntry> = raw
            .into_iter()
            .filter(|review| review.reviewer == reviewer)
            .filter_map(|review| {
                let repository = review.repository.clone();
                match ReviewEntry::try_from_raw(review, self.review_placeholder)
                    .and_then(|entry| self.localize_review(entry))
                {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        tracing::warn!("Dropping review in {}: {}", repository, e);
                        None
                    }
                }
            })
            .collect();

        self.month.apply(entries)
    }

    fn localize(&self, timestamp: OffsetDateTime) -> Result<OffsetDateTime, NormalizeError> {
        match self.offset {
            Some(offset) => shift_to_offset(timestamp, offset).ok_or_else(|| {
                NormalizeError::InvalidTimestamp(format!("{timestamp} cannot be shifted to {offset}"))
            }),
            None => Ok(timestamp),
        }
    }

    fn localize_commit(&self, entry: CommitEntry) -> Result<CommitEntry, NormalizeError> {
        Ok(CommitEntry {
            timestamp: self.localize(entry.timestamp)?,
            ..entry
        })
    }

    fn localize_review(&self, entry: ReviewEntry) -> Result<ReviewEntry, NormalizeError> {
        Ok(ReviewEntry {
            timestamp: self.localize(entry.timestamp)?,
            ..entry
        })
    }
}

fn git_timestamp(seconds: i64, offset_minutes: i32) -> Result<OffsetDateTime, NormalizeError> {
    let invalid = || NormalizeError::InvalidTimestamp(format!("{seconds} {offset_minutes:+}min"));

    let offset = offset_minutes
        .checked_mul(60)
        .and_then(|offset_seconds| UtcOffset::from_whole_seconds(offset_seconds).ok())
        .ok_or_else(invalid)?;
    let utc = OffsetDateTime::from_unix_timestamp(seconds).map_err(|_| invalid())?;

    shift_to_offset(utc, offset).ok_or_else(invalid)
}

/// Same instant, expressed in `offset`.
fn shift_to_offset(timestamp: OffsetDateTime, offset: UtcOffset) -> Option<OffsetDateTime> {
    let delta = offset.whole_seconds() - timestamp.offset().whole_seconds();
    timestamp
        .checked_add(Duration::seconds(i64::from(delta)))
        .map(|shifted| shifted.replace_offset(offset))
}

fn summary_line(message: &str) -> String {
    message.lines().next().unwrap_or_default().trim().to_owned()
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
