use github::{PullRequest, RepoClient, Review};
use time::{Duration, Time};
use timesheet_core::{RawReview, TargetMonth};

use crate::settings::GithubSettings;

/// Collects submitted reviews on pull requests touched during `month`.
///
/// Repositories and pull requests are fetched one after another. A failure
/// is logged and only drops that repository or pull request.
pub async fn fetch_reviews(settings: &GithubSettings, month: &TargetMonth) -> Vec<RawReview> {
    if !settings.is_enabled() {
        tracing::info!("No reviewer or repositories configured, skipping reviews");
        return Vec::new();
    }

    // A day of slack covers reviewers east of UTC.
    let since = month.first_day().with_time(Time::MIDNIGHT).assume_utc() - Duration::days(1);
    let mut reviews = Vec::new();

    for repository in &settings.repositories {
        let client = match RepoClient::new(repository, settings.token.as_deref(), &settings.api_url) {
            Ok(client) => client,
            Err(e) => {
                tracing::error!("Skipping {}: {}", repository, e);
                continue;
            }
        };

        let pull_requests = match client.get_pull_requests_updated_since(since).await {
            Ok(pull_requests) => pull_requests,
            Err(e) => {
                tracing::error!("Failed to list pull requests in {}: {}", repository, e);
                continue;
            }
        };

        let before = reviews.len();
        for pull_request in &pull_requests {
            match client.get_reviews(pull_request.number).await {
                Ok(found) => reviews.extend(
                    found
                        .into_iter()
                        .filter(Review::is_submitted)
                        .map(|review| to_raw_review(repository, pull_request, review)),
                ),
                Err(e) => tracing::error!(
                    "Failed to get reviews for {}#{}: {}",
                    repository,
                    pull_request.number,
                    e
                ),
            }
        }

        tracing::info!(
            "Found {} submitted reviews on {} pull requests in {}",
            reviews.len() - before,
            pull_requests.len(),
            repository
        );
    }

    reviews
}

fn to_raw_review(repository: &str, pull_request: &PullRequest, review: Review) -> RawReview {
    RawReview {
        repository: repository.to_owned(),
        reviewer: review.reviewer().unwrap_or_default().to_owned(),
        submitted_at: review.submitted_at,
        pull_request_title: pull_request.title.clone(),
        body: review.body,
    }
}
