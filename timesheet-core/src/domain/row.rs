use time::OffsetDateTime;

use crate::{ActivityEntry, DateFormatter};

/// Fixed comment written next to every row of a given entry kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowComments {
    pub commit: String,
    pub review: String,
}

impl Default for RowComments {
    fn default() -> Self {
        Self {
            commit: "Development".to_string(),
            review: "Code review".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimesheetRow {
    pub category: String,
    pub display_date: String,
    pub description: String,
    pub comment: String,
    pub hours: f64,
    pub sort_key: OffsetDateTime,
}

impl TimesheetRow {
    pub fn new(
        entry: &ActivityEntry,
        hours: f64,
        formatter: &dyn DateFormatter,
        comments: &RowComments,
    ) -> Self {
        let comment = match entry {
            ActivityEntry::Commit(_) => &comments.commit,
            ActivityEntry::Review(_) => &comments.review,
        };

        Self {
            category: entry.category().to_owned(),
            display_date: formatter.format(entry.timestamp()),
            description: entry.description(),
            comment: comment.clone(),
            hours,
            sort_key: entry.timestamp(),
        }
    }
}
