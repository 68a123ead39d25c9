//! Minimal GitHub REST client

use crate::error::BotError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Debug, Serialize)]
struct NewComment<'a> {
    body: &'a str,
}

/// The comment GitHub created
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub id: u64,
    #[serde(default)]
    pub html_url: Option<String>,
}

pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
    owner: String,
    repo: String,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_url", &self.api_url)
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .finish_non_exhaustive()
    }
}

impl GitHubClient {
    /// `repository` is `owner/name`
    pub fn new(api_url: &str, token: &str, repository: &str) -> Result<Self, BotError> {
        let (owner, repo) = repository
            .split_once('/')
            .filter(|(o, r)| !o.is_empty() && !r.is_empty() && !r.contains('/'))
            .ok_or_else(|| BotError::InvalidRepository(repository.to_string()))?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("repo-bot/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    /// Configure from the variables GitHub Actions provides
    pub fn from_env() -> Result<Self, BotError> {
        let token = std::env::var("GITHUB_TOKEN").map_err(|_| BotError::MissingEnv("GITHUB_TOKEN"))?;
        let repository = std::env::var("GITHUB_REPOSITORY")
            .map_err(|_| BotError::MissingEnv("GITHUB_REPOSITORY"))?;
        let api_url = std::env::var("GITHUB_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(&api_url, &token, &repository)
    }

    /// Comment on an issue or pull request
    pub async fn add_issue_comment(&self, number: u64, body: &str) -> Result<Comment, BotError> {
        let url = format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.api_url, self.owner, self.repo, number
        );
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .json(&NewComment { body })
            .send()
            .await?;

        let comment: Comment = check_response(resp).await?.json().await?;
        tracing::info!(number, comment_id = comment.id, "Comment posted");
        Ok(comment)
    }
}

async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, BotError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    Err(BotError::Api {
        status: status.as_u16(),
        message: resp.text().await.unwrap_or_default(),
    })
}
