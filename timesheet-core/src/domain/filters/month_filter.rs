use crate::{CommitEntry, ReviewEntry, TargetMonth};

use super::EntryFilter;

impl EntryFilter<CommitEntry> for TargetMonth {
    fn keeps(&self, entry: &CommitEntry) -> bool {
        self.contains(entry.timestamp)
    }
}

impl EntryFilter<ReviewEntry> for TargetMonth {
    fn keeps(&self, entry: &ReviewEntry) -> bool {
        self.contains(entry.timestamp)
    }
}
