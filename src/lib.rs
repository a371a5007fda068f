//! Repocat - repository quality pipeline
//!
//! Samples a handful of representative files from a repository, scores
//! them with static heuristics and a model-based review, fuses the two
//! scores, and maps the result onto categorical attributes for a renderer.

pub mod analysis;
pub mod attributes;
pub mod config;
pub mod error;
pub mod health;
pub mod models;
pub mod pipeline;
pub mod providers;
pub mod scoring;
pub mod selection;

pub use error::{ErrorKind, PipelineError, PipelineResult};
pub use pipeline::{Orchestrator, PipelineOutput, PipelineState};
