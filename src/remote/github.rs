//! GitHub-hosted word list.
//!
//! Reads and writes both go through the contents API. A fetch takes the file
//! body and its blob sha from the same response, so the sha sent back on
//! `PUT` always names the version that was merged.

use super::{FetchedFile, RemoteFile, RemoteStore};
use crate::config::RemoteConfig;
use crate::error::RemoteError;
use async_trait::async_trait;
use base64::Engine;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const USER_AGENT: &str = concat!("wordsync/", env!("CARGO_PKG_VERSION"));

/// `GET /repos/{repo}/contents/{path}` body. Files over 1 MB come back with
/// an empty `content` and `encoding: "none"`.
#[derive(Deserialize)]
struct ContentsResponse {
    sha: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: String,
}

/// `GET /repos/{repo}/git/blobs/{sha}` body.
#[derive(Deserialize)]
struct BlobResponse {
    content: String,
    #[serde(default)]
    encoding: String,
}

#[derive(Serialize)]
struct UpdateFileRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
    branch: &'a str,
}

/// Decode a base64 body as returned by the API, which wraps lines at 60 chars.
fn decode_content(url: &str, encoded: &str) -> Result<String, RemoteError> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| RemoteError::Decode {
            url: url.to_string(),
            message: format!("invalid base64 content: {}", e),
        })?;
    String::from_utf8(bytes).map_err(|e| RemoteError::Decode {
        url: url.to_string(),
        message: format!("content is not UTF-8: {}", e),
    })
}

fn map_http_error(url: &str, error: reqwest::Error) -> RemoteError {
    let message = if error.is_timeout() {
        format!("Request timeout: {}", error)
    } else if error.is_connect() {
        format!("Connection error: {}", error)
    } else {
        format!("HTTP error: {}", error)
    };
    RemoteError::RequestFailed {
        url: url.to_string(),
        message,
    }
}

async fn ensure_success(url: &str, response: Response) -> Result<Response, RemoteError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(RemoteError::Status {
        url: url.to_string(),
        status,
        body,
    })
}

/// GitHub repository client
pub struct GitHubRemote {
    client: Client,
    config: RemoteConfig,
    token: Option<String>,
}

impl GitHubRemote {
    /// Build a client. The token is read from the environment variable named
    /// by `config.token_env`; without it fetches still work but writes fail.
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        let token = std::env::var(&config.token_env)
            .ok()
            .filter(|t| !t.is_empty());
        Self::with_token(config, token)
    }

    pub fn with_token(config: RemoteConfig, token: Option<String>) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(HTTP_CONNECT_TIMEOUT)
            .timeout(HTTP_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                RemoteError::NotConfigured(format!("Failed to create HTTP client: {}", e))
            })?;
        Ok(Self {
            client,
            config,
            token,
        })
    }

    fn path_for(&self, file: RemoteFile) -> &str {
        match file {
            RemoteFile::Words => &self.config.words_path,
            RemoteFile::Ngrams => &self.config.ngrams_path,
        }
    }

    pub fn contents_url(&self, file: RemoteFile) -> String {
        format!(
            "{}/repos/{}/contents/{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.repo,
            self.path_for(file).trim_start_matches('/')
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("Accept", "application/vnd.github+json");
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    pub fn blob_url(&self, sha: &str) -> String {
        format!(
            "{}/repos/{}/git/blobs/{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.repo,
            sha
        )
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        request: RequestBuilder,
    ) -> Result<T, RemoteError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| map_http_error(url, e))?;
        let response = ensure_success(url, response).await?;
        response.json().await.map_err(|e| RemoteError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

/// Body and revision of one version of the file.
fn fetched_from(
    url: &str,
    contents: ContentsResponse,
    blob: Option<BlobResponse>,
) -> Result<FetchedFile, RemoteError> {
    let (encoded, encoding) = match &blob {
        Some(blob) => (blob.content.as_str(), blob.encoding.as_str()),
        None => (contents.content.as_str(), contents.encoding.as_str()),
    };
    if encoding != "base64" {
        return Err(RemoteError::Decode {
            url: url.to_string(),
            message: format!("unsupported content encoding '{}'", encoding),
        });
    }
    Ok(FetchedFile {
        content: decode_content(url, encoded)?,
        revision: Some(contents.sha),
    })
}

#[async_trait]
impl RemoteStore for GitHubRemote {
    async fn fetch(&self, file: RemoteFile) -> Result<FetchedFile, RemoteError> {
        let url = self.contents_url(file);
        debug!(file = file.as_str(), url = %url, "Downloading remote file");
        let request = self
            .client
            .get(&url)
            .query(&[("ref", self.config.branch.as_str())]);
        let contents: ContentsResponse = self.get_json(&url, request).await?;

        if contents.encoding == "base64" {
            return fetched_from(&url, contents, None);
        }
        // Too large to inline; read the blob the sha names.
        let blob_url = self.blob_url(&contents.sha);
        debug!(file = file.as_str(), url = %blob_url, "Downloading large file blob");
        let blob: BlobResponse = self.get_json(&blob_url, self.client.get(&blob_url)).await?;
        fetched_from(&blob_url, contents, Some(blob))
    }

    async fn write(
        &self,
        file: RemoteFile,
        content: &str,
        revision: Option<&str>,
        message: &str,
    ) -> Result<(), RemoteError> {
        if self.token.is_none() {
            return Err(RemoteError::NotConfigured(format!(
                "no token in ${}; cannot write {}",
                self.config.token_env,
                file.as_str()
            )));
        }

        let url = self.contents_url(file);
        let body = UpdateFileRequest {
            message,
            content: base64::engine::general_purpose::STANDARD.encode(content.as_bytes()),
            sha: revision,
            branch: &self.config.branch,
        };
        debug!(file = file.as_str(), url = %url, bytes = content.len(), "Writing remote file");
        let response = self
            .authorized(self.client.put(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| map_http_error(&url, e))?;
        ensure_success(&url, response).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "github"
    }
}
