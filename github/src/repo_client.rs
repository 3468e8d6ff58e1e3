use reqwest::{header::ACCEPT, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use time::OffsetDateTime;

use crate::models::{PullRequest, Review};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";
const MEDIA_TYPE: &str = "application/vnd.github+json";
const USER_AGENT: &str = concat!("timesheet/", env!("CARGO_PKG_VERSION"));
const PER_PAGE: usize = 100;

#[derive(Error, Debug)]
pub enum RepoClientError {
    #[error("invalid repository '{0}', expected owner/name")]
    InvalidRepository(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("NotFound: {0}")]
    NotFound(String),
    #[error("ResponseError: {0}")]
    ResponseError(String),
    #[error("ParsingError: {0}")]
    ParsingError(String),
}

/// Read access to one repository's pull requests and reviews.
pub struct RepoClient {
    client: reqwest::Client,
    api_url: String,
    owner: String,
    repo: String,
    token: Option<String>,
}

impl RepoClient {
    /// `repository` is `owner/name`. Without a token only public repositories
    /// are visible and the rate limit is much lower.
    pub fn new(
        repository: &str,
        token: Option<&str>,
        api_url: &str,
    ) -> Result<Self, RepoClientError> {
        let (owner, repo) = repository
            .split_once('/')
            .filter(|(owner, repo)| !owner.is_empty() && !repo.is_empty() && !repo.contains('/'))
            .ok_or_else(|| RepoClientError::InvalidRepository(repository.to_owned()))?;

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RepoClientError::ResponseError(e.to_string()))?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_owned(),
            owner: owner.to_owned(),
            repo: repo.to_owned(),
            token: token.filter(|t| !t.is_empty()).map(str::to_owned),
        })
    }

    pub fn repository(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_url,
            self.owner,
            self.repo,
            path.trim_start_matches('/')
        )
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, RepoClientError> {
        let mut request = self
            .client
            .get(url)
            .query(query)
            .header(ACCEPT, MEDIA_TYPE)
            .header("X-GitHub-Api-Version", API_VERSION);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| RepoClientError::ResponseError(e.to_string()))?;

        match resp.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(RepoClientError::Unauthorized)
            }
            StatusCode::NOT_FOUND => return Err(RepoClientError::NotFound(url.to_owned())),
            status if !status.is_success() => {
                return Err(RepoClientError::ResponseError(format!(
                    "GET {url} returned {status}"
                )))
            }
            _ => {}
        }

        resp.json::<T>().await.map_err(|e| {
            RepoClientError::ParsingError(format!("Failed to parse response as JSON: {}", e))
        })
    }

    /// Pull requests in any state that were updated at or after `since`,
    /// most recently updated first.
    ///
    /// Pages are requested newest first and paging stops at the first page
    /// that is short or reaches back past `since`.
    pub async fn get_pull_requests_updated_since(
        &self,
        since: OffsetDateTime,
    ) -> Result<Vec<PullRequest>, RepoClientError> {
        let url = self.url("pulls");
        let mut pull_requests = Vec::new();

        for page in 1.. {
            let batch: Vec<PullRequest> = self
                .fetch(
                    &url,
                    &[
                        ("state", "all".to_string()),
                        ("sort", "updated".to_string()),
                        ("direction", "desc".to_string()),
                        ("per_page", PER_PAGE.to_string()),
                        ("page", page.to_string()),
                    ],
                )
                .await?;

            let exhausted = batch.len() < PER_PAGE
                || batch.last().is_some_and(|pr| pr.updated_at < since);
            pull_requests.extend(batch.into_iter().filter(|pr| pr.updated_at >= since));

            if exhausted {
                break;
            }
        }

        tracing::debug!(
            "Found {} pull requests in {} updated since {}",
            pull_requests.len(),
            self.repository(),
            since
        );

        Ok(pull_requests)
    }

    /// All reviews on one pull request, oldest first.
    pub async fn get_reviews(&self, number: u64) -> Result<Vec<Review>, RepoClientError> {
        let url = self.url(&format!("pulls/{number}/reviews"));
        let mut reviews = Vec::new();

        for page in 1.. {
            let batch: Vec<Review> = self
                .fetch(
                    &url,
                    &[
                        ("per_page", PER_PAGE.to_string()),
                        ("page", page.to_string()),
                    ],
                )
                .await?;

            let exhausted = batch.len() < PER_PAGE;
            reviews.extend(batch);

            if exhausted {
                break;
            }
        }

        Ok(reviews)
    }
}
