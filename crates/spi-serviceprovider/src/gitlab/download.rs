//! Single file download from GitLab repositories

use async_trait::async_trait;
use futures::StreamExt;
use tracing::debug;

use super::client::GitlabClientBuilder;
use super::url_matcher::RepoUrlMatcher;
use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::traits::DownloadFileCapability;

pub struct GitlabDownloadFileCapability {
    client_builder: GitlabClientBuilder,
    repo_url_matcher: RepoUrlMatcher,
}

impl GitlabDownloadFileCapability {
    pub fn new(client_builder: GitlabClientBuilder, repo_url_matcher: RepoUrlMatcher) -> Self {
        Self {
            client_builder,
            repo_url_matcher,
        }
    }
}

#[async_trait]
impl DownloadFileCapability for GitlabDownloadFileCapability {
    async fn download_file(
        &self,
        repo_url: &str,
        filepath: &str,
        git_ref: &str,
        credentials: &Credentials,
        max_file_size: u64,
    ) -> Result<String> {
        let (owner, project) = self.repo_url_matcher.parse_owner_and_project(repo_url)?;
        let client = self.client_builder.create_authenticated_client(credentials)?;

        let response = client
            .raw_file(&format!("{owner}/{project}"), filepath, git_ref)
            .await
            .map_err(|e| match e.status_code() {
                Some(404) => Error::not_found("file", format!("{owner}/{project}/{filepath}")),
                _ => e,
            })?;

        let too_large = || Error::FileTooLarge {
            path: filepath.to_string(),
            limit: max_file_size,
        };
        if response.content_length().is_some_and(|len| len > max_file_size) {
            return Err(too_large());
        }

        let mut contents = Vec::new();
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            contents.extend_from_slice(&chunk?);
            if contents.len() as u64 > max_file_size {
                return Err(too_large());
            }
        }

        debug!("Downloaded {} bytes of {}", contents.len(), filepath);
        Ok(String::from_utf8_lossy(&contents).into_owned())
    }
}
