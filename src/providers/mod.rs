//! External collaborators
//!
//! The pipeline talks to three outside services through the traits defined
//! here. Concrete adapters use sync HTTP via ureq (no async runtime) and map
//! HTTP status codes to [`PipelineError`](crate::error::PipelineError)
//! variants at the call site, so nothing downstream inspects message text.
//!
//! | Trait               | Adapter              | Service          |
//! |---------------------|----------------------|------------------|
//! | [`RepositorySource`] | [`GitHubSource`]     | GitHub REST API  |
//! | [`QualityAssessor`]  | [`OpenRouterAssessor`] | OpenRouter chat completions |
//! | [`Renderer`]         | [`TogetherRenderer`] | Together image generation |

pub mod content;
pub mod github;
pub mod openrouter;
pub mod prompts;
pub mod retry;
pub mod together;

use crate::error::PipelineResult;
use crate::models::{AttributeSet, FileCandidate, QualitativeAssessment, RepoMetadata, RepoRef};
use serde::Serialize;
use std::time::Duration;

pub use content::{fetch_contents, ContentPolicy, MAX_FILE_BYTES};
pub use github::GitHubSource;
pub use openrouter::OpenRouterAssessor;
pub use retry::{RetryPolicy, Retrier, Sleeper, ThreadSleeper};
pub use together::TogetherRenderer;

/// Read access to a hosted repository
pub trait RepositorySource: Send + Sync {
    fn metadata(&self, repo: &RepoRef) -> PipelineResult<RepoMetadata>;

    /// Every file path in the default branch (directories excluded)
    fn file_tree(&self, repo: &RepoRef) -> PipelineResult<Vec<String>>;

    /// Raw bytes of one file; `Ok(None)` when the file does not exist
    fn fetch_file(&self, repo: &RepoRef, path: &str) -> PipelineResult<Option<Vec<u8>>>;
}

/// Model-based review of a file sample
pub trait QualityAssessor: Send + Sync {
    /// Must reject an empty slice with `EmptyInput`
    fn assess(&self, files: &[FileCandidate]) -> PipelineResult<QualitativeAssessment>;
}

/// What a renderer produced for a description
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderOutput {
    pub image_url: String,
    pub model: String,
}

/// Downstream handoff of the generated description
pub trait Renderer: Send + Sync {
    fn render(&self, description: &str, attributes: &AttributeSet) -> PipelineResult<RenderOutput>;
}

/// Shared ureq agent setup: status codes are handled by the caller
pub(crate) fn make_agent(timeout: Duration) -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false)
        .timeout_global(Some(timeout))
        .build()
        .new_agent()
}

pub(crate) const USER_AGENT: &str = concat!("repocat/", env!("CARGO_PKG_VERSION"));
