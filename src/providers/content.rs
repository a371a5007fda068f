//! File content policy and batch fetching

use super::retry::Retrier;
use super::RepositorySource;
use crate::error::{PipelineError, PipelineResult};
use crate::models::RepoRef;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Byte ceiling applied to every fetched file
pub const MAX_FILE_BYTES: usize = 50_000;

fn default_max_file_bytes() -> usize {
    MAX_FILE_BYTES
}

/// Truncation and binary-detection rules for fetched files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ContentPolicy {
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: usize,
}

impl Default for ContentPolicy {
    fn default() -> Self {
        Self {
            max_file_bytes: MAX_FILE_BYTES,
        }
    }
}

impl ContentPolicy {
    pub fn new(max_file_bytes: usize) -> Self {
        Self { max_file_bytes }
    }

    /// Decode raw bytes as text, truncated to the ceiling.
    ///
    /// Returns `None` for binary content (NUL bytes or invalid UTF-8).
    /// A multi-byte character split by the ceiling is dropped whole.
    pub fn apply(&self, raw: &[u8]) -> Option<String> {
        if raw.contains(&0) {
            return None;
        }

        let truncated = raw.len() > self.max_file_bytes;
        let slice = &raw[..raw.len().min(self.max_file_bytes)];

        match std::str::from_utf8(slice) {
            Ok(text) => Some(text.to_string()),
            // error_len() == None means the input ended mid-character
            Err(e) if truncated && e.error_len().is_none() => {
                std::str::from_utf8(&slice[..e.valid_up_to()])
                    .ok()
                    .map(str::to_string)
            }
            Err(_) => None,
        }
    }

    /// Enforce the ceiling on text that is already decoded
    pub fn truncate(&self, text: &str) -> String {
        if text.len() <= self.max_file_bytes {
            return text.to_string();
        }
        let mut end = self.max_file_bytes;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text[..end].to_string()
    }
}

/// Fetch `paths` from `source`, applying `policy` to each file.
///
/// Missing files, binary files and per-file dependency errors are dropped.
/// Access, credential and exhausted rate-limit failures abort the batch.
pub fn fetch_contents(
    source: &dyn RepositorySource,
    repo: &RepoRef,
    paths: &[String],
    policy: &ContentPolicy,
    retrier: &Retrier,
) -> PipelineResult<BTreeMap<String, String>> {
    let mut contents = BTreeMap::new();

    for path in paths {
        let fetched = retrier.run(&format!("fetch {}", path), || source.fetch_file(repo, path));

        let raw = match fetched {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("Skipping {}: not found", path);
                continue;
            }
            Err(PipelineError::Dependency { message, .. }) => {
                warn!("Skipping {}: {}", path, message);
                continue;
            }
            Err(err) => return Err(err),
        };

        match policy.apply(&raw) {
            Some(text) => {
                if raw.len() > policy.max_file_bytes {
                    debug!(
                        "Truncated {} from {} to {} bytes",
                        path,
                        raw.len(),
                        text.len()
                    );
                }
                contents.insert(path.clone(), text);
            }
            None => debug!("Skipping {}: binary content", path),
        }
    }

    Ok(contents)
}
