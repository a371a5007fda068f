//! GitHub REST adapter
//!
//! Unauthenticated requests work but are limited to 60 per hour; a token
//! raises the limit and grants access to private repositories.

use super::{make_agent, RepositorySource, USER_AGENT};
use crate::config::GithubConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::models::{RepoMetadata, RepoRef};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const SERVICE: &str = "GitHub";
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";
const API_VERSION: &str = "2022-11-28";

pub struct GitHubSource {
    api_url: String,
    token: Option<String>,
    agent: ureq::Agent,
}

#[derive(Deserialize)]
struct RepoResponse {
    name: String,
    owner: OwnerResponse,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    stargazers_count: u64,
    language: Option<String>,
    description: Option<String>,
}

#[derive(Deserialize)]
struct OwnerResponse {
    login: String,
}

#[derive(Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Map a non-success status to an error for `resource`.
///
/// GitHub reports primary rate limiting as 403 with
/// `x-ratelimit-remaining: 0`, secondary limits as 429.
fn classify_status(status: u16, rate_limit_exhausted: bool, resource: &str) -> PipelineError {
    match status {
        404 => PipelineError::not_found(resource),
        401 => PipelineError::auth_failure(SERVICE),
        429 => PipelineError::rate_limited(SERVICE),
        403 if rate_limit_exhausted => PipelineError::rate_limited(SERVICE),
        403 => PipelineError::forbidden(resource),
        _ => PipelineError::dependency(SERVICE, Some(status), format!("HTTP {}", status)),
    }
}

fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~')
}

/// Percent-encode each path segment, keeping the `/` separators
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            segment
                .bytes()
                .map(|b| {
                    if is_unreserved(b) {
                        (b as char).to_string()
                    } else {
                        format!("%{:02X}", b)
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("/")
}

type Response = ureq::http::Response<ureq::Body>;

impl GitHubSource {
    pub fn new(config: &GithubConfig) -> Self {
        Self {
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone().filter(|t| !t.trim().is_empty()),
            agent: make_agent(Duration::from_secs(config.timeout_secs)),
        }
    }

    fn get(&self, url: &str, accept: &str) -> PipelineResult<Response> {
        let mut req = self
            .agent
            .get(url)
            .header("Accept", accept)
            .header("User-Agent", USER_AGENT)
            .header("X-GitHub-Api-Version", API_VERSION);
        if let Some(token) = &self.token {
            req = req.header("Authorization", &format!("Bearer {}", token));
        }

        req.call()
            .map_err(|e| PipelineError::dependency(SERVICE, None, e.to_string()))
    }

    fn check(response: Response, resource: &str) -> PipelineResult<Response> {
        let status = response.status().as_u16();
        if status < 400 {
            return Ok(response);
        }
        let exhausted = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim() == "0");
        Err(classify_status(status, exhausted, resource))
    }
}

impl RepositorySource for GitHubSource {
    fn metadata(&self, repo: &RepoRef) -> PipelineResult<RepoMetadata> {
        let url = format!("{}/repos/{}/{}", self.api_url, repo.owner, repo.name);
        let response = Self::check(self.get(&url, JSON_MEDIA_TYPE)?, &repo.slug())?;

        let body: RepoResponse = response
            .into_body()
            .read_json()
            .map_err(|e| PipelineError::schema(SERVICE, e.to_string()))?;

        Ok(RepoMetadata {
            name: body.name,
            owner: body.owner.login,
            size_kb: body.size,
            stars: body.stargazers_count,
            primary_language: body.language,
            description: body.description,
        })
    }

    fn file_tree(&self, repo: &RepoRef) -> PipelineResult<Vec<String>> {
        let url = format!(
            "{}/repos/{}/{}/git/trees/HEAD?recursive=1",
            self.api_url, repo.owner, repo.name
        );
        let response = Self::check(self.get(&url, JSON_MEDIA_TYPE)?, &repo.slug())?;

        let body: TreeResponse = response
            .into_body()
            .read_json()
            .map_err(|e| PipelineError::schema(SERVICE, e.to_string()))?;

        if body.truncated {
            warn!("File tree for {} was truncated by GitHub", repo);
        }

        let files: Vec<String> = body
            .tree
            .into_iter()
            .filter(|entry| entry.kind == "blob")
            .map(|entry| entry.path)
            .collect();
        debug!("{} has {} files", repo, files.len());
        Ok(files)
    }

    fn fetch_file(&self, repo: &RepoRef, path: &str) -> PipelineResult<Option<Vec<u8>>> {
        let url = format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_url,
            repo.owner,
            repo.name,
            encode_path(path)
        );
        let response = self.get(&url, RAW_MEDIA_TYPE)?;
        if response.status().as_u16() == 404 {
            return Ok(None);
        }
        let response = Self::check(response, path)?;

        response
            .into_body()
            .read_to_vec()
            .map(Some)
            .map_err(|e| PipelineError::dependency(SERVICE, None, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_status_mapping() {
        assert_eq!(classify_status(404, false, "octo/x").kind(), ErrorKind::NotFound);
        assert_eq!(classify_status(403, false, "octo/x").kind(), ErrorKind::Forbidden);
        assert_eq!(classify_status(403, true, "octo/x").kind(), ErrorKind::RateLimited);
        assert_eq!(classify_status(429, false, "octo/x").kind(), ErrorKind::RateLimited);
        assert_eq!(classify_status(401, false, "octo/x").kind(), ErrorKind::AuthFailure);
        assert_eq!(classify_status(500, false, "octo/x").kind(), ErrorKind::Dependency);
    }

    #[test]
    fn test_not_found_names_the_resource() {
        assert_eq!(
            classify_status(404, false, "octo/missing"),
            PipelineError::not_found("octo/missing")
        );
    }

    #[test]
    fn test_encode_path() {
        assert_eq!(encode_path("src/main.rs"), "src/main.rs");
        assert_eq!(encode_path("docs/My Notes.md"), "docs/My%20Notes.md");
        assert_eq!(encode_path("a#b/c?d"), "a%23b/c%3Fd");
    }

    #[test]
    fn test_tree_response_keeps_blobs() {
        let json = r#"{"sha":"abc","tree":[
            {"path":"src","type":"tree"},
            {"path":"src/main.rs","type":"blob","size":10},
            {"path":"README.md","type":"blob"}
        ],"truncated":false}"#;
        let body: TreeResponse = serde_json::from_str(json).unwrap();
        let blobs: Vec<_> = body
            .tree
            .into_iter()
            .filter(|e| e.kind == "blob")
            .map(|e| e.path)
            .collect();
        assert_eq!(blobs, vec!["src/main.rs", "README.md"]);
    }

    #[test]
    fn test_new_ignores_blank_token() {
        let config = GithubConfig {
            token: Some("  ".into()),
            api_url: "https://api.github.com/".into(),
            timeout_secs: 5,
        };
        let source = GitHubSource::new(&config);
        assert!(source.token.is_none());
        assert_eq!(source.api_url, "https://api.github.com");
    }
}
