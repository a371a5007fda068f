use crate::providers::{ContentPolicy, RetryPolicy};
use crate::selection::TieBreak;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Keys shorter than this are treated as unset
pub const MIN_API_KEY_LEN: usize = 10;

fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_assessor_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_assessor_model() -> String {
    "google/gemini-2.5-flash".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_renderer_base_url() -> String {
    "https://api.together.xyz/v1".to_string()
}

fn default_renderer_model() -> String {
    "black-forest-labs/FLUX.1.1-pro".to_string()
}

fn default_width() -> u32 {
    768
}

fn default_height() -> u32 {
    432
}

fn default_steps() -> u32 {
    20
}

fn default_http_timeout() -> u64 {
    30
}

fn default_model_timeout() -> u64 {
    120
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubConfig {
    /// Personal access token; `GITHUB_TOKEN` overrides
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_github_api_url")]
    pub api_url: String,

    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: default_github_api_url(),
            timeout_secs: default_http_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssessorConfig {
    /// OpenRouter key; `OPENROUTER_API_KEY` overrides
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_assessor_base_url")]
    pub base_url: String,

    #[serde(default = "default_assessor_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_model_timeout")]
    pub timeout_secs: u64,
}

impl Default for AssessorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_assessor_base_url(),
            model: default_assessor_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_model_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RendererConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Together key; `TOGETHER_API_KEY` overrides
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_renderer_base_url")]
    pub base_url: String,

    #[serde(default = "default_renderer_model")]
    pub model: String,

    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    #[serde(default = "default_steps")]
    pub steps: u32,

    #[serde(default = "default_model_timeout")]
    pub timeout_secs: u64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            base_url: default_renderer_base_url(),
            model: default_renderer_model(),
            width: default_width(),
            height: default_height(),
            steps: default_steps(),
            timeout_secs: default_model_timeout(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectionConfig {
    #[serde(default)]
    pub tie_break: TieBreak,
}

/// Process configuration, built once and handed to each component
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub github: GithubConfig,

    #[serde(default)]
    pub assessor: AssessorConfig,

    #[serde(default)]
    pub renderer: RendererConfig,

    #[serde(default)]
    pub retry: RetryPolicy,

    #[serde(default)]
    pub selection: SelectionConfig,

    #[serde(default)]
    pub fetch: ContentPolicy,
}

/// A key is usable when it is present and not implausibly short
pub fn usable_key(key: Option<&str>) -> Option<&str> {
    key.map(str::trim).filter(|k| k.len() >= MIN_API_KEY_LEN)
}

impl Config {
    /// Load configuration, with priority:
    /// 1. Environment variables (highest)
    /// 2. `path`, or the user config file when no path is given
    /// 3. Built-in defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => match Self::user_config_path().filter(|p| p.exists()) {
                Some(p) => Self::from_file(&p)?,
                None => Config::default(),
            },
        };

        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Override credentials from the environment through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("GITHUB_TOKEN").filter(|v| !v.is_empty()) {
            self.github.token = Some(token);
        }
        if let Some(key) = lookup("OPENROUTER_API_KEY").filter(|v| !v.is_empty()) {
            self.assessor.api_key = Some(key);
        }
        if let Some(key) = lookup("TOGETHER_API_KEY").filter(|v| !v.is_empty()) {
            self.renderer.api_key = Some(key);
        }
    }

    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("repocat").join("config.toml"))
    }

    pub fn assessor_key(&self) -> Option<&str> {
        usable_key(self.assessor.api_key.as_deref())
    }

    pub fn renderer_key(&self) -> Option<&str> {
        usable_key(self.renderer.api_key.as_deref())
    }

    /// Write the example config, creating parent directories.
    /// An existing file is left untouched; returns whether a new file was written.
    pub fn write_example(config_path: &Path) -> Result<bool> {
        if config_path.exists() {
            return Ok(false);
        }
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(config_path, EXAMPLE_CONFIG)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        Ok(true)
    }
}

pub const EXAMPLE_CONFIG: &str = r#"# repocat configuration
#
# Credentials can also come from GITHUB_TOKEN, OPENROUTER_API_KEY and
# TOGETHER_API_KEY; the environment wins over this file.

[github]
# token = "ghp_..."          # raises the API limit from 60 to 5000 requests/hour
# api_url = "https://api.github.com"
# timeout_secs = 30

[assessor]
# api_key = "sk-or-..."      # https://openrouter.ai/keys
# model = "google/gemini-2.5-flash"
# temperature = 0.3
# max_tokens = 4096
# timeout_secs = 120

[renderer]
# enabled = true
# api_key = "..."            # https://api.together.xyz/settings/api-keys
# model = "black-forest-labs/FLUX.1.1-pro"
# width = 768
# height = 432
# steps = 20

[retry]
# max_attempts = 3
# base_delay_ms = 1000
# multiplier = 2.0

[selection]
# "lexicographic" picks the same files on every run; "random" varies the sample
# tie_break = "lexicographic"

[fetch]
# max_file_bytes = 50000
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.assessor.model, "google/gemini-2.5-flash");
        assert_eq!(config.renderer.width, 768);
        assert!(config.renderer.enabled);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.fetch.max_file_bytes, 50_000);
        assert_eq!(config.selection.tie_break, TieBreak::Lexicographic);
        assert!(config.assessor_key().is_none());
    }

    #[test]
    fn test_example_config_parses_to_defaults() {
        let config: Config = toml::from_str(EXAMPLE_CONFIG).unwrap();
        assert_eq!(config.retry, RetryPolicy::default());
        assert_eq!(config.fetch, ContentPolicy::default());
    }

    #[test]
    fn test_partial_sections() {
        let toml_str = r#"
[assessor]
model = "anthropic/claude-sonnet-4"

[selection]
tie_break = "random"

[retry]
max_attempts = 5
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.assessor.model, "anthropic/claude-sonnet-4");
        assert_eq!(config.assessor.temperature, 0.3);
        assert_eq!(config.selection.tie_break, TieBreak::Random);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.base_delay_ms, 1000);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config: Config = toml::from_str("[github]\ntoken = \"from-file\"").unwrap();
        let env: HashMap<&str, &str> = [
            ("GITHUB_TOKEN", "from-env"),
            ("OPENROUTER_API_KEY", "sk-or-1234567890"),
            ("TOGETHER_API_KEY", ""),
        ]
        .into_iter()
        .collect();

        config.apply_env(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.github.token.as_deref(), Some("from-env"));
        assert_eq!(config.assessor_key(), Some("sk-or-1234567890"));
        assert!(config.renderer.api_key.is_none());
    }

    #[test]
    fn test_short_keys_are_unusable() {
        assert_eq!(usable_key(Some("short")), None);
        assert_eq!(usable_key(Some("  ")), None);
        assert_eq!(usable_key(None), None);
        assert_eq!(usable_key(Some("0123456789")), Some("0123456789"));
    }

    #[test]
    fn test_load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repocat.toml");
        std::fs::write(&path, "[renderer]\nenabled = false\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert!(!config.renderer.enabled);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repocat.toml");
        std::fs::write(&path, "[retry]\nmax_attempts = \"many\"\n").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }

    #[test]
    fn test_write_example_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert!(Config::write_example(&path).unwrap());
        std::fs::write(&path, "# mine").unwrap();
        assert!(!Config::write_example(&path).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine");
    }
}
