//! GitHub REST API client
//!
//! Implements [`RepoHost`] against the v3 REST API. Works with github.com and
//! GitHub Enterprise Server (set the API URL to `https://<host>/api/v3`).
//! Every call is a single attempt.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use prlint_core::{HostError, HostResult, IssueComment, RepoHost, RepoRef};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// Public GitHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";
const PAGE_SIZE: usize = 100;

/// GitHub client configuration
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// API base URL
    pub api_url: String,
    /// Token sent as a bearer credential
    pub token: String,
}

impl GitHubConfig {
    pub fn new(token: &str) -> Self {
        GitHubConfig {
            api_url: DEFAULT_API_URL.to_string(),
            token: token.to_string(),
        }
    }

    /// Use a different API base URL
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.to_string();
        self
    }
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommentResponse {
    id: u64,
    body: Option<String>,
    html_url: Option<String>,
}

impl From<CommentResponse> for IssueComment {
    fn from(c: CommentResponse) -> Self {
        IssueComment {
            id: c.id,
            body: c.body.unwrap_or_default(),
            html_url: c.html_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}

fn transport(err: reqwest::Error) -> HostError {
    HostError::Transport(err.to_string())
}

/// Client for the GitHub REST API
pub struct GitHubClient {
    base_url: Url,
    http_client: reqwest::Client,
}

impl GitHubClient {
    /// Create a new client
    pub fn new(config: GitHubConfig) -> HostResult<Self> {
        let base_url = Url::parse(config.api_url.trim_end_matches('/')).map_err(|e| {
            HostError::Transport(format!("invalid API URL '{}': {}", config.api_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(HostError::Transport(format!(
                "invalid API URL '{}'",
                config.api_url
            )));
        }

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| HostError::Transport("token contains invalid characters".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        let http_client = reqwest::Client::builder()
            .user_agent(concat!("prlint/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(transport)?;

        Ok(GitHubClient {
            base_url,
            http_client,
        })
    }

    /// Build `<base>/<segments...>`; segments are percent-encoded.
    fn url<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(method = %method, url = %url, "GitHub API request");
        self.http_client.request(method, url)
    }

    /// Turn a non-success response into a `HostError`.
    async fn check(response: Response) -> HostResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&text)
            .map(|e| e.message)
            .unwrap_or(text);

        if status == StatusCode::NOT_FOUND {
            Err(HostError::NotFound(url))
        } else {
            Err(HostError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    async fn json<T: serde::de::DeserializeOwned>(response: Response) -> HostResult<T> {
        let bytes = response.bytes().await.map_err(transport)?;
        serde_json::from_slice(&bytes).map_err(|e| HostError::Decode(e.to_string()))
    }
}

/// Decode the base64 payload of a contents response. GitHub wraps it at
/// 60 columns.
fn decode_content(encoded: &str) -> HostResult<Vec<u8>> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|e| HostError::Decode(format!("file content is not valid base64: {}", e)))
}

#[async_trait]
impl RepoHost for GitHubClient {
    async fn fetch_file(
        &self,
        repo: &RepoRef,
        path: &str,
        reference: &str,
    ) -> HostResult<Vec<u8>> {
        let mut url = self.url(
            ["repos", repo.owner.as_str(), repo.name.as_str(), "contents"]
                .into_iter()
                .chain(path.split('/').filter(|s| !s.is_empty())),
        );
        url.query_pairs_mut().append_pair("ref", reference);

        let response = self
            .request(Method::GET, url)
            .send()
            .await
            .map_err(transport)?;
        let response = Self::check(response).await?;

        // Directories come back as a JSON array; treat them as missing.
        let value: serde_json::Value = Self::json(response).await?;
        let content = serde_json::from_value::<ContentResponse>(value)
            .ok()
            .and_then(|c| c.content)
            .ok_or_else(|| HostError::NotFound(format!("{} at {}", path, reference)))?;

        decode_content(&content)
    }

    async fn list_comments(
        &self,
        repo: &RepoRef,
        issue_number: u64,
    ) -> HostResult<Vec<IssueComment>> {
        let number = issue_number.to_string();
        let mut comments = Vec::new();
        let mut page = 1u32;

        loop {
            let mut url = self.url([
                "repos",
                repo.owner.as_str(),
                repo.name.as_str(),
                "issues",
                number.as_str(),
                "comments",
            ]);
            url.query_pairs_mut()
                .append_pair("per_page", &PAGE_SIZE.to_string())
                .append_pair("page", &page.to_string());

            let response = self
                .request(Method::GET, url)
                .send()
                .await
                .map_err(transport)?;
            let batch: Vec<CommentResponse> = Self::json(Self::check(response).await?).await?;
            let last_page = batch.len() < PAGE_SIZE;
            comments.extend(batch.into_iter().map(IssueComment::from));

            if last_page {
                break;
            }
            page += 1;
        }

        debug!(issue = issue_number, count = comments.len(), "Listed comments");
        Ok(comments)
    }

    async fn create_comment(
        &self,
        repo: &RepoRef,
        issue_number: u64,
        body: &str,
    ) -> HostResult<IssueComment> {
        let number = issue_number.to_string();
        let url = self.url([
            "repos",
            repo.owner.as_str(),
            repo.name.as_str(),
            "issues",
            number.as_str(),
            "comments",
        ]);

        let response = self
            .request(Method::POST, url)
            .json(&json!({ "body": body }))
            .send()
            .await
            .map_err(transport)?;
        let created: CommentResponse = Self::json(Self::check(response).await?).await?;
        Ok(created.into())
    }

    async fn update_comment(&self, repo: &RepoRef, comment_id: u64, body: &str) -> HostResult<()> {
        let id = comment_id.to_string();
        let url = self.url([
            "repos",
            repo.owner.as_str(),
            repo.name.as_str(),
            "issues",
            "comments",
            id.as_str(),
        ]);

        let response = self
            .request(Method::PATCH, url)
            .json(&json!({ "body": body }))
            .send()
            .await
            .map_err(transport)?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete_comment(&self, repo: &RepoRef, comment_id: u64) -> HostResult<()> {
        let id = comment_id.to_string();
        let url = self.url([
            "repos",
            repo.owner.as_str(),
            repo.name.as_str(),
            "issues",
            "comments",
            id.as_str(),
        ]);

        let response = self
            .request(Method::DELETE, url)
            .send()
            .await
            .map_err(transport)?;
        Self::check(response).await?;
        Ok(())
    }
}
