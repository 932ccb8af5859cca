//! Repository URL parsing

use url::Url;

use crate::error::{Error, Result};

/// Parses the repository URL of a request
pub type RepoUrlParser = fn(&str) -> Result<Url>;

/// Parse a repository URL that may be missing its scheme; `https` is assumed
pub fn repo_url_from_schemaless_string(repo_url: &str) -> Result<Url> {
    if repo_url.contains("://") {
        repo_url_from_string(repo_url)
    } else {
        repo_url_from_string(&format!("https://{repo_url}"))
    }
}

pub fn repo_url_from_string(repo_url: &str) -> Result<Url> {
    Url::parse(repo_url).map_err(|source| Error::InvalidUrl {
        url: repo_url.to_string(),
        source,
    })
}

/// Host of the URL including a non-default port, as used in provider host labels
pub fn host_of(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        _ => String::new(),
    }
}

/// Host label value for a request's repository URL.
///
/// Same as [`host_of`], except that a port written in `repo_url` is kept even
/// when it is the scheme's default, so `gitlab.com:443` stays `gitlab.com:443`.
pub fn host_label(repo_url: &str, url: &Url) -> String {
    let host = host_of(url);
    match (url.port(), written_port(repo_url)) {
        (None, Some(port)) => format!("{host}:{port}"),
        _ => host,
    }
}

fn written_port(repo_url: &str) -> Option<&str> {
    let rest = repo_url.split_once("://").map_or(repo_url, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next()?;
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, host_port)| host_port);
    if host_port.ends_with(']') {
        return None;
    }
    let (_, port) = host_port.rsplit_once(':')?;
    (!port.is_empty() && port.bytes().all(|b| b.is_ascii_digit())).then_some(port)
}
