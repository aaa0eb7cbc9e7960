//! Repository host client over the GitHub REST v3 API.
//!
//! One client serves as [`IssueSource`], [`DocumentStore`] and
//! [`IssueNotifier`] for a single repository.

use crate::collaborators::{DocumentStore, IssueNotifier, IssueSource};
use crate::config::GitHubConfig;
use crate::types::{CommitInfo, Issue, RepoRef, StoredDocument};
use crate::{Error, Result};
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, instrument};

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

#[derive(Deserialize)]
struct IssuePayload {
    number: u64,
    title: String,
    body: Option<String>,
}

#[derive(Deserialize)]
struct ContentsPayload {
    content: Option<String>,
    sha: String,
}

#[derive(Serialize)]
struct PutContentsRequest<'a> {
    message: &'a str,
    content: String,
    sha: &'a str,
    branch: &'a str,
}

#[derive(Deserialize)]
struct PutContentsPayload {
    commit: Option<CommitPayload>,
}

#[derive(Deserialize)]
struct CommitPayload {
    sha: Option<String>,
}

#[derive(Deserialize)]
struct ErrorPayload {
    message: String,
}

/// HTTP client bound to one repository.
pub struct GitHubClient {
    client: Client,
    api_url: String,
    repo: RepoRef,
    token: String,
    branch: String,
}

impl GitHubClient {
    /// Creates a client with a 30 second request timeout.
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        Self::with_timeout(config, Duration::from_secs(30))
    }

    /// Creates a client with a custom request timeout.
    pub fn with_timeout(config: &GitHubConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("promptplace/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::Network)?;
        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            repo: RepoRef::new(&config.owner, &config.repo),
            token: config.token.clone(),
            branch: config.branch.clone(),
        })
    }

    /// Repository this client is bound to.
    pub const fn repo(&self) -> &RepoRef {
        &self.repo
    }

    fn repo_url(&self, tail: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_url, self.repo.owner, self.repo.name, tail
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(AUTHORIZATION, format!("token {}", self.token))
            .header(ACCEPT, GITHUB_ACCEPT)
    }

    async fn send(&self, method: Method, tail: &str, body: Option<serde_json::Value>) -> Result<Response> {
        let url = self.repo_url(tail);
        let mut request = self.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // GitHub error bodies carry a human-readable `message`
        let detail = response
            .json::<ErrorPayload>()
            .await
            .map(|payload| payload.message)
            .unwrap_or_default();
        let mut message = format!("{method} {tail} returned {status}");
        if !detail.is_empty() {
            message.push_str(": ");
            message.push_str(&detail);
        }
        Err(Error::GitHub(message))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        tail: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T> {
        let response = self.send(method, tail, body).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Decode a contents payload: base64, wrapped at 60 columns by the host.
fn decode_content(encoded: &str) -> Result<String> {
    let compact: String = encoded.split_ascii_whitespace().collect();
    let bytes = STANDARD.decode(compact)?;
    Ok(String::from_utf8(bytes)?)
}

#[async_trait::async_trait]
impl IssueSource for GitHubClient {
    #[instrument(skip(self), fields(repo = %self.repo))]
    async fn get_issue(&self, number: u64) -> Result<Issue> {
        let payload: IssuePayload = self
            .send_json(Method::GET, &format!("issues/{number}"), None)
            .await?;
        debug!(title = %payload.title, "Fetched issue");
        Ok(Issue {
            number: payload.number,
            title: payload.title,
            body: payload.body,
        })
    }
}

#[async_trait::async_trait]
impl DocumentStore for GitHubClient {
    #[instrument(skip(self), fields(repo = %self.repo))]
    async fn get_document(&self, path: &str) -> Result<StoredDocument> {
        let payload: ContentsPayload = self
            .send_json(Method::GET, &format!("contents/{path}"), None)
            .await?;
        let encoded = payload
            .content
            .ok_or_else(|| Error::GitHub(format!("Could not retrieve {path} content")))?;
        let content = decode_content(&encoded)?;
        info!(bytes = content.len(), sha = %payload.sha, "Fetched document");
        Ok(StoredDocument {
            content,
            version: payload.sha,
        })
    }

    #[instrument(skip(self, content), fields(repo = %self.repo, bytes = content.len()))]
    async fn put_document(
        &self,
        path: &str,
        content: &str,
        version: &str,
        message: &str,
    ) -> Result<CommitInfo> {
        let request = PutContentsRequest {
            message,
            content: STANDARD.encode(content.as_bytes()),
            sha: version,
            branch: &self.branch,
        };
        let payload: PutContentsPayload = self
            .send_json(
                Method::PUT,
                &format!("contents/{path}"),
                Some(serde_json::to_value(&request)?),
            )
            .await?;
        let sha = payload
            .commit
            .and_then(|commit| commit.sha)
            .ok_or_else(|| Error::GitHub("Failed to commit changes: response has no commit sha".to_string()))?;
        info!(%sha, "Committed document");
        Ok(CommitInfo { sha })
    }
}

#[async_trait::async_trait]
impl IssueNotifier for GitHubClient {
    #[instrument(skip(self, body), fields(repo = %self.repo))]
    async fn comment(&self, number: u64, body: &str) -> Result<()> {
        self.send(
            Method::POST,
            &format!("issues/{number}/comments"),
            Some(json!({ "body": body })),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(repo = %self.repo))]
    async fn close(&self, number: u64) -> Result<()> {
        self.send(
            Method::PATCH,
            &format!("issues/{number}"),
            Some(json!({ "state": "closed" })),
        )
        .await?;
        Ok(())
    }
}
