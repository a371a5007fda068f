use crate::error::{ClassifiedError, PipelineError, PipelineResult};
use crate::models::{AttributeSet, FileCandidate, FusedResult, HeuristicMetrics, QualitativeAssessment, RepoMetadata, RepoRef};
use crate::providers::RenderOutput;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Metadata,
    SelectFiles,
    FetchContents,
    Heuristics,
    Assessment,
    FuseAndMap,
    Render,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::Metadata,
        Stage::SelectFiles,
        Stage::FetchContents,
        Stage::Heuristics,
        Stage::Assessment,
        Stage::FuseAndMap,
        Stage::Render,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Metadata => "metadata",
            Stage::SelectFiles => "select_files",
            Stage::FetchContents => "fetch_contents",
            Stage::Heuristics => "heuristics",
            Stage::Assessment => "assessment",
            Stage::FuseAndMap => "fuse_and_map",
            Stage::Render => "render",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Accumulator for one run. Each stage fills exactly one group of fields.
#[derive(Debug, Clone)]
pub struct PipelineState {
    pub repo: RepoRef,
    pub generation_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub metadata: Option<RepoMetadata>,
    pub selected_paths: Option<Vec<String>>,
    pub files: Option<Vec<FileCandidate>>,
    pub heuristics: Option<HeuristicMetrics>,
    pub assessment: Option<QualitativeAssessment>,
    pub fused: Option<FusedResult>,
    pub attributes: Option<AttributeSet>,
    pub description: Option<String>,
    pub render: Option<RenderOutput>,
    pub error: Option<PipelineError>,
}

impl PipelineState {
    pub fn new(repo: RepoRef, generation_id: Uuid) -> Self {
        Self {
            repo,
            generation_id,
            started_at: Utc::now(),
            metadata: None,
            selected_paths: None,
            files: None,
            heuristics: None,
            assessment: None,
            fused: None,
            attributes: None,
            description: None,
            render: None,
            error: None,
        }
    }

    /// Convert a completed state into the caller-facing output
    pub fn into_output(self) -> PipelineResult<PipelineOutput> {
        fn require<T>(value: Option<T>, missing: &'static str) -> PipelineResult<T> {
            value.ok_or(PipelineError::MissingStageOutput {
                stage: "output",
                missing,
            })
        }

        Ok(PipelineOutput {
            generation_id: self.generation_id,
            repository: self.repo.slug(),
            metadata: require(self.metadata, "metadata")?,
            fused: require(self.fused, "fused")?,
            attributes: require(self.attributes, "attributes")?,
            description: require(self.description, "description")?,
            render: self.render,
            started_at: self.started_at,
            completed_at: Utc::now(),
        })
    }
}

/// Successful result of a pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub generation_id: Uuid,
    pub repository: String,
    pub metadata: RepoMetadata,
    pub fused: FusedResult,
    pub attributes: AttributeSet,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render: Option<RenderOutput>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

/// Terminal failure of a pipeline run, as reported to the caller
#[derive(Debug, Clone, Serialize)]
pub struct PipelineFailure {
    pub generation_id: Uuid,
    pub stage: &'static str,
    pub error: ClassifiedError,
}
