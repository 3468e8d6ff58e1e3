use std::collections::HashSet;

use rand::Rng;
use time::UtcOffset;

use crate::{
    allocate, assemble, csv, filter_by_author, AllocationRequest, DateFormatter, Normalizer,
    RawCommit, RawReview, RowComments, TargetMonth, TimesheetError, TimesheetRow,
    DEFAULT_REVIEW_PLACEHOLDER,
};

/// Everything a run needs to know, fixed before any record is read.
#[derive(Debug, Clone)]
pub struct TimesheetConfig {
    pub month: TargetMonth,
    /// Commit author identities counted as the user's own work.
    pub allowed_authors: HashSet<String>,
    /// Login whose reviews are reported. `None` skips reviews.
    pub reviewer: Option<String>,
    pub target_hours: f64,
    pub variation: f64,
    pub comments: RowComments,
    pub review_placeholder: String,
    /// Offset the month and dates are judged in. `None` keeps each source's own.
    pub offset: Option<UtcOffset>,
}

impl TimesheetConfig {
    pub fn new(month: TargetMonth, target_hours: f64, variation: f64) -> Self {
        Self {
            month,
            allowed_authors: HashSet::new(),
            reviewer: None,
            target_hours,
            variation,
            comments: RowComments::default(),
            review_placeholder: DEFAULT_REVIEW_PLACEHOLDER.to_string(),
            offset: None,
        }
    }

    fn normalizer(&self) -> Normalizer<'_> {
        Normalizer::new(self.month)
            .with_offset(self.offset)
            .with_reviewer(self.reviewer.as_deref())
            .with_review_placeholder(&self.review_placeholder)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Timesheet {
    month: TargetMonth,
    rows: Vec<TimesheetRow>,
}

impl Timesheet {
    /// Runs a whole month through normalization, filtering, allocation and
    /// assembly.
    pub fn build<R: Rng + ?Sized>(
        config: &TimesheetConfig,
        raw_commits: Vec<RawCommit>,
        raw_reviews: Vec<RawReview>,
        formatter: &dyn DateFormatter,
        rng: &mut R,
    ) -> Result<Self, TimesheetError> {
        let normalizer = config.normalizer();

        let commits = normalizer.normalize_commits(raw_commits);
        let in_month = commits.len();
        let commits = filter_by_author(commits, &config.allowed_authors);
        let reviews = normalizer.normalize_reviews(raw_reviews);
        tracing::debug!(
            "{} of {} commits in {} are by allowed authors",
            commits.len(),
            in_month,
            config.month
        );

        let request = AllocationRequest::new(
            commits.len() + reviews.len(),
            config.target_hours,
            config.variation,
        )?;
        let allocation = allocate(&request, rng)?;

        let rows = assemble(commits, reviews, &allocation, formatter, &config.comments)?;
        tracing::info!(
            "Built timesheet for {} with {} rows and {:.2} hours",
            config.month,
            rows.len(),
            allocation.effective_total()
        );

        Ok(Self {
            month: config.month,
            rows,
        })
    }

    pub fn month(&self) -> TargetMonth {
        self.month
    }

    pub fn rows(&self) -> &[TimesheetRow] {
        &self.rows
    }

    pub fn total_hours(&self) -> f64 {
        self.rows.iter().map(|row| row.hours).sum()
    }

    pub fn to_csv(&self) -> String {
        csv::serialize(&self.rows)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};
    use time::{macros::datetime, OffsetDateTime};

    use super::*;
    use crate::{AllocationError, PatternFormatter, DEFAULT_DATE_FORMAT};

    fn raw_commit(timestamp: OffsetDateTime, author: &str, message: &str) -> RawCommit {
        RawCommit {
            project: "toki".to_string(),
            seconds: timestamp.unix_timestamp(),
            offset_minutes: 0,
            message: message.to_string(),
            author: author.to_string(),
        }
    }

    fn raw_review(submitted_at: &str) -> RawReview {
        RawReview {
            repository: "ponbac/toki2".to_string(),
            submitted_at: Some(submitted_at.to_string()),
            pull_request_title: "Timer history".to_string(),
            body: None,
            reviewer: "alice".to_string(),
        }
    }

    fn march_config() -> TimesheetConfig {
        let mut config = TimesheetConfig::new(TargetMonth::new(2024, 3).unwrap(), 160.0, 0.0);
        config.allowed_authors = HashSet::from(["Alice".to_string()]);
        config.reviewer = Some("alice".to_string());
        config
    }

    fn build(config: &TimesheetConfig, commits: Vec<RawCommit>, reviews: Vec<RawReview>) -> Timesheet {
        let formatter = PatternFormatter::new(DEFAULT_DATE_FORMAT).unwrap();
        Timesheet::build(config, commits, reviews, &formatter, &mut StdRng::seed_from_u64(11))
            .unwrap()
    }

    #[test]
    fn test_month_of_commits_and_a_review() {
        let timesheet = build(
            &march_config(),
            vec![
                raw_commit(datetime!(2024-03-20 14:00 UTC), "Alice", "feat: stats view"),
                raw_commit(datetime!(2024-03-05 09:00 UTC), "Alice", "fix: login"),
            ],
            vec![raw_review("2024-03-10T12:00:00Z")],
        );

        let rows = timesheet.rows();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.hours > 0.0));
        assert!((timesheet.total_hours() - 160.0).abs() <= 0.015);
        assert_eq!(
            rows.iter().map(|r| r.display_date.as_str()).collect::<Vec<_>>(),
            vec!["05.03.2024", "10.03.2024", "20.03.2024"]
        );
        assert_eq!(rows[1].description, "Timer history: Reviewed pull request");

        let csv = timesheet.to_csv();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Project/Repo,Date,Commit/Review Message,Comments,Time used")
        );
        assert_eq!(lines.count(), 3);
    }

    #[test]
    fn test_commits_by_other_authors_are_left_out() {
        let timesheet = build(
            &march_config(),
            vec![
                raw_commit(datetime!(2024-03-05 09:00 UTC), "Alice", "mine"),
                raw_commit(datetime!(2024-03-06 09:00 UTC), "Bob", "theirs"),
            ],
            vec![],
        );

        assert_eq!(timesheet.rows().len(), 1);
        assert_eq!(timesheet.rows()[0].description, "mine");
        assert!(!timesheet.to_csv().contains("theirs"));
        assert!((timesheet.total_hours() - 160.0).abs() <= 0.015);
    }

    #[test]
    fn test_nothing_to_report_gives_header_only() {
        let timesheet = build(
            &march_config(),
            vec![raw_commit(datetime!(2024-04-01 09:00 UTC), "Alice", "next month")],
            vec![raw_review("2024-02-10T12:00:00Z")],
        );

        assert!(timesheet.rows().is_empty());
        assert_eq!(timesheet.to_csv(), crate::csv::HEADER);
    }

    #[test]
    fn test_invalid_target_fails_the_build() {
        let mut config = march_config();
        config.target_hours = 0.0;
        let formatter = PatternFormatter::new(DEFAULT_DATE_FORMAT).unwrap();

        let result = Timesheet::build(
            &config,
            vec![],
            vec![],
            &formatter,
            &mut StdRng::seed_from_u64(1),
        );

        assert!(matches!(result, Err(TimesheetError::Allocation(_))));
    }

    #[test]
    fn test_variation_at_or_above_target_fails_for_every_seed() {
        let mut config = march_config();
        config.target_hours = 1.0;
        config.variation = 5.0;
        let formatter = PatternFormatter::new(DEFAULT_DATE_FORMAT).unwrap();

        for seed in 0..50 {
            let result = Timesheet::build(
                &config,
                vec![raw_commit(datetime!(2024-03-05 09:00 UTC), "Alice", "fix: login")],
                vec![],
                &formatter,
                &mut StdRng::seed_from_u64(seed),
            );

            assert_eq!(
                result,
                Err(TimesheetError::Allocation(AllocationError::InvalidVariation(5.0)))
            );
        }
    }
}
