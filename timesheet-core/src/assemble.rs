use crate::{
    ActivityEntry, Allocation, CommitEntry, DateFormatter, ReviewEntry, RowComments,
    TimesheetError, TimesheetRow,
};

/// Pairs every entry with a duration and orders the rows by timestamp.
///
/// Reviews take durations from the front of the allocation, commits from the
/// back walking backward. With one duration per entry the two walks never
/// meet. Rows are sorted stably, so on equal timestamps reviews stay ahead of
/// commits.
pub fn assemble(
    commits: Vec<CommitEntry>,
    reviews: Vec<ReviewEntry>,
    allocation: &Allocation,
    formatter: &dyn DateFormatter,
    comments: &RowComments,
) -> Result<Vec<TimesheetRow>, TimesheetError> {
    let expected = commits.len() + reviews.len();
    if allocation.len() != expected {
        return Err(TimesheetError::AllocationMismatch {
            expected,
            actual: allocation.len(),
        });
    }

    let hours = allocation.rounded();

    let review_rows = reviews
        .into_iter()
        .map(ActivityEntry::Review)
        .zip(hours.iter());
    let commit_rows = commits
        .into_iter()
        .map(ActivityEntry::Commit)
        .zip(hours.iter().rev());

    let mut rows: Vec<TimesheetRow> = review_rows
        .chain(commit_rows)
        .map(|(entry, hours)| TimesheetRow::new(&entry, *hours, formatter, comments))
        .collect();
    rows.sort_by_key(|row| row.sort_key);

    Ok(rows)
}
