use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::{Contributor, PullRequest};

pub const GITHUB_API_URL: &str = "https://api.github.com";
pub const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const USER_AGENT: &str = concat!("contributors-leaderboard/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("GitHub {endpoint} responded with HTTP {status}")]
    Status { endpoint: &'static str, status: u16 },
    #[error("GitHub {endpoint} request failed: {source}")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// Where contributor and pull request data comes from.
#[async_trait]
pub trait ContributorSource: Send + Sync {
    async fn contributors(&self) -> Result<Vec<Contributor>, UpstreamError>;

    async fn pull_requests(&self) -> Result<Vec<PullRequest>, UpstreamError>;
}

#[derive(Clone, Debug)]
pub struct GithubClient {
    client: Client,
    repo_url: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(
        api_url: &str,
        repository: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let repository = repository.trim_matches('/');
        let parts: Vec<&str> = repository.split('/').collect();
        if parts.len() != 2 || parts.iter().any(|part| part.is_empty()) {
            anyhow::bail!("Repository should be in the `owner/repo` form, got `{repository}`");
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        let repo_url = format!("{}/repos/{}", api_url.trim_end_matches('/'), repository);

        Ok(Self {
            client,
            repo_url,
            token: token.filter(|token| !token.is_empty()),
        })
    }

    pub fn repo_url(&self) -> &str {
        &self.repo_url
    }

    /// Fetches a JSON listing. GitHub answers `204 No Content` for listings of
    /// empty repositories, which is read as an empty list.
    async fn list<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, UpstreamError> {
        let mut request = self
            .client
            .get(format!("{}/{}", self.repo_url, endpoint))
            .header(ACCEPT, GITHUB_ACCEPT)
            .query(query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|source| UpstreamError::Request { endpoint, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }
        if status == StatusCode::NO_CONTENT || response.content_length() == Some(0) {
            return Ok(Vec::new());
        }

        response
            .json()
            .await
            .map_err(|source| UpstreamError::Request { endpoint, source })
    }
}

#[async_trait]
impl ContributorSource for GithubClient {
    #[instrument(skip(self))]
    async fn contributors(&self) -> Result<Vec<Contributor>, UpstreamError> {
        self.list("contributors", &[]).await
    }

    #[instrument(skip(self))]
    async fn pull_requests(&self) -> Result<Vec<PullRequest>, UpstreamError> {
        self.list("pulls", &[("state", "all"), ("per_page", "100")])
            .await
    }
}
