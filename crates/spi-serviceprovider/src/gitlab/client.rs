//! Minimal GitLab REST API v4 client

use reqwest::{Response, StatusCode};
use serde::Deserialize;
use spi_tokenstorage::SecureString;
use tracing::debug;
use url::Url;

use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::url::repo_url_from_string;

/// Project visibility levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Private,
    Internal,
    Public,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: u64,
    pub path_with_namespace: String,
    pub visibility: Visibility,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
}

/// The personal access token used for the request
#[derive(Debug, Clone, Deserialize)]
pub struct PersonalAccessToken {
    #[serde(default)]
    pub scopes: Vec<String>,
}

/// Client authenticated with a token, bound to one GitLab instance
pub struct GitlabClient {
    http: reqwest::Client,
    api_url: Url,
    token: SecureString,
}

impl GitlabClient {
    /// Project by id or `namespace/path`
    pub async fn get_project(&self, project: &str) -> Result<Project> {
        let response = self.get(&["projects", project], &[]).await?;
        Ok(response.json().await?)
    }

    /// The user owning the token
    pub async fn current_user(&self) -> Result<User> {
        let response = self.get(&["user"], &[]).await?;
        Ok(response.json().await?)
    }

    /// Scopes of the token, None when the token is not a personal access token
    pub async fn current_token_scopes(&self) -> Result<Option<Vec<String>>> {
        match self.get(&["personal_access_tokens", "self"], &[]).await {
            Ok(response) => Ok(Some(response.json::<PersonalAccessToken>().await?.scopes)),
            Err(e) if matches!(e.status_code(), Some(401 | 403 | 404)) => {
                debug!("Token scopes are not available: {}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Raw contents of a file; `git_ref` empty for the default branch
    pub async fn raw_file(&self, project: &str, file_path: &str, git_ref: &str) -> Result<Response> {
        let mut query = Vec::new();
        if !git_ref.is_empty() {
            query.push(("ref", git_ref));
        }
        self.get(&["projects", project, "repository", "files", file_path, "raw"], &query)
            .await
    }

    /// GET an API endpoint; every path segment is escaped as a whole
    async fn get(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Response> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::configuration(format!("{} can't be a GitLab base URL", self.api_url)))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        debug!("GET {}", url);
        let response = self
            .http
            .get(url.clone())
            .bearer_auth(self.token.expose())
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(Error::unexpected_status(response.status().as_u16(), url.as_str()));
        }
        Ok(response)
    }
}

/// Creates clients for a GitLab instance
#[derive(Clone)]
pub struct GitlabClientBuilder {
    http_client: reqwest::Client,
    base_url: String,
}

impl GitlabClientBuilder {
    pub fn new(http_client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    pub fn create_authenticated_client(&self, credentials: &Credentials) -> Result<GitlabClient> {
        let api_url = repo_url_from_string(&format!("{}/api/v4", self.base_url.trim_end_matches('/')))?;
        Ok(GitlabClient {
            http: self.http_client.clone(),
            api_url,
            token: credentials.token.clone(),
        })
    }
}
