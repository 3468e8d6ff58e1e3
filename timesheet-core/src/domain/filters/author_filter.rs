use std::collections::HashSet;

use crate::CommitEntry;

use super::EntryFilter;

/// Keeps commits whose author is on the allow-list. Matching is exact and
/// case-sensitive.
pub struct AuthorFilter<'a> {
    allowed: &'a HashSet<String>,
}

impl<'a> AuthorFilter<'a> {
    pub fn new(allowed: &'a HashSet<String>) -> Self {
        Self { allowed }
    }
}

impl EntryFilter<CommitEntry> for AuthorFilter<'_> {
    fn keeps(&self, entry: &CommitEntry) -> bool {
        self.allowed.contains(&entry.author)
    }
}

pub fn filter_by_author(commits: Vec<CommitEntry>, allowed: &HashSet<String>) -> Vec<CommitEntry> {
    AuthorFilter::new(allowed).apply(commits)
}
