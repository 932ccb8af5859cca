//! Wiremock helpers for the GitLab API
//!
//! Repositories live at `/{owner}/{project}` of the mock server, the API at
//! `/api/v4`, the same as on a real GitLab instance.

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Host label value of tokens and remote secrets for the mock server
pub fn mock_host(server: &MockServer) -> String {
    server.address().to_string()
}

/// Anonymous GET of the repository page answers with `status`
pub async fn mock_repo_page(server: &MockServer, repo_path: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/{repo_path}")))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// The user owning `token`, and the scopes of the token
pub async fn mock_current_user(server: &MockServer, token: &str, username: &str) {
    Mock::given(method("GET"))
        .and(path("/api/v4/user"))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "username": username,
            "name": "Test User",
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v4/personal_access_tokens/self"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "name": "spi",
            "scopes": ["read_repository", "read_user"],
        })))
        .mount(server)
        .await;
}

/// Project lookup answering with `visibility`; `project` is the url-encoded path
pub async fn mock_project(server: &MockServer, encoded_project: &str, visibility: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v4/projects/{encoded_project}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "path_with_namespace": encoded_project.replace("%2F", "/"),
            "visibility": visibility,
        })))
        .mount(server)
        .await;
}

pub async fn mock_project_status(server: &MockServer, encoded_project: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v4/projects/{encoded_project}")))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({
            "message": status.to_string(),
        })))
        .mount(server)
        .await;
}

/// Raw file endpoint at `git_ref`
pub async fn mock_raw_file(
    server: &MockServer,
    encoded_project: &str,
    encoded_file: &str,
    git_ref: &str,
    content: &str,
) {
    Mock::given(method("GET"))
        .and(path(format!(
            "/api/v4/projects/{encoded_project}/repository/files/{encoded_file}/raw"
        )))
        .and(query_param("ref", git_ref))
        .respond_with(ResponseTemplate::new(200).set_body_string(content))
        .mount(server)
        .await;
}
