//! Recognizes project URLs of a GitLab instance

use regex::Regex;
use url::Url;

use crate::error::{Error, Result};
use crate::url::{host_of, repo_url_from_schemaless_string};

/// Extracts owner (possibly nested groups) and project from repository URLs
#[derive(Debug, Clone)]
pub struct RepoUrlMatcher {
    base_url: Url,
    path_regex: Regex,
}

impl RepoUrlMatcher {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = repo_url_from_schemaless_string(base_url)?;
        let path_regex = Regex::new(r"^/(?P<owner>[^/]+(?:/[^/]+)*)/(?P<project>[^/]+?)(?:\.git)?/?$")
            .map_err(|e| Error::configuration(format!("invalid repository url pattern: {e}")))?;
        Ok(Self { base_url, path_regex })
    }

    /// `(owner, project)` of a repository URL on this instance.
    ///
    /// Anything after `/-/` (tree, blob and similar views) is ignored.
    pub fn parse_owner_and_project(&self, repo_url: &str) -> Result<(String, String)> {
        let unrecognized = || Error::UnrecognizedRepoUrl {
            url: repo_url.to_string(),
            base_url: self.base_url.to_string(),
        };

        let url = repo_url_from_schemaless_string(repo_url)?;
        if host_of(&url) != host_of(&self.base_url) {
            return Err(unrecognized());
        }

        let path = url.path().split("/-/").next().unwrap_or_default();
        let captures = self.path_regex.captures(path).ok_or_else(unrecognized)?;
        Ok((captures["owner"].to_string(), captures["project"].to_string()))
    }
}
