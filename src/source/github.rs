// ABOUTME: GitHub REST client for commit listings.
// ABOUTME: Scoped per deployment; carries the optional API token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;

use super::{CommitResolver, ResolveError};
use crate::config::{SourceConfig, resolve_optional};
use crate::error::Result;
use crate::types::{CommitSha, RepoRef};

const USER_AGENT: &str = concat!("dockhand/", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize)]
struct CommitEntry {
    sha: String,
}

/// HTTP client for the GitHub commits API.
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(config: &SourceConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_owned(),
            token: resolve_optional(config.token.as_ref())?,
        })
    }
}

#[async_trait]
impl CommitResolver for GithubClient {
    async fn resolve(&self, repo: &RepoRef) -> std::result::Result<CommitSha, ResolveError> {
        let url = format!(
            "{}/repos/{}/{}/commits",
            self.api_url,
            repo.owner(),
            repo.repo()
        );

        let mut request = self
            .client
            .get(&url)
            .query(&[("per_page", "1")])
            .header(ACCEPT, "application/vnd.github.v3+json");
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("token {}", token));
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ResolveError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let commits: Vec<CommitEntry> =
            serde_json::from_str(&body).map_err(|e| ResolveError::Malformed(e.to_string()))?;
        let newest = commits.into_iter().next().ok_or(ResolveError::Empty)?;
        let sha = CommitSha::parse(&newest.sha)?;

        tracing::debug!(%repo, commit = %sha, "resolved newest commit");
        Ok(sha)
    }
}
