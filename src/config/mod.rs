//! Configuration for repocat
//!
//! Loaded once at startup from:
//! - `--config <path>`, or `~/.config/repocat/config.toml`
//! - Environment variables for credentials
//!
//! Components never read the environment themselves; each receives its
//! section of [`Config`] through its constructor.

mod settings;

pub use settings::{
    usable_key, AssessorConfig, Config, GithubConfig, RendererConfig, SelectionConfig,
    EXAMPLE_CONFIG, MIN_API_KEY_LEN,
};
