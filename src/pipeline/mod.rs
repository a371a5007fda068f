//! Analysis pipeline
//!
//! Runs one generation request through the stages in order:
//! 1. Fetch repository metadata
//! 2. Fetch the file tree and select a representative sample
//! 3. Fetch file contents (missing and binary files are dropped)
//! 4. Compute heuristic metrics
//! 5. Request the qualitative assessment
//! 6. Fuse scores, map attributes, write the render description
//! 7. Hand off to the renderer (when one is configured)
//!
//! The first failing stage ends the run; its error is recorded on the
//! state and returned unchanged. Content fetch, assessment and render go
//! through the [`Retrier`]; the other stages are not retried.

mod state;

pub use state::{PipelineFailure, PipelineOutput, PipelineState, Stage};

use crate::analysis::HeuristicAnalyzer;
use crate::attributes::{describe, AttributeMapper};
use crate::error::{PipelineError, PipelineResult};
use crate::models::{FileCandidate, RepoRef};
use crate::providers::{
    fetch_contents, ContentPolicy, QualityAssessor, Renderer, RepositorySource, Retrier,
};
use crate::scoring::FusionEngine;
use crate::selection::FileSelector;
use std::time::Instant;
use tracing::{debug, error, info};
use uuid::Uuid;

fn missing(stage: Stage, what: &'static str) -> PipelineError {
    PipelineError::MissingStageOutput {
        stage: stage.name(),
        missing: what,
    }
}

pub struct Orchestrator {
    source: Box<dyn RepositorySource>,
    assessor: Box<dyn QualityAssessor>,
    renderer: Option<Box<dyn Renderer>>,
    selector: FileSelector,
    analyzer: HeuristicAnalyzer,
    fusion: FusionEngine,
    mapper: AttributeMapper,
    content_policy: ContentPolicy,
    retrier: Retrier,
}

impl Orchestrator {
    pub fn new(source: Box<dyn RepositorySource>, assessor: Box<dyn QualityAssessor>) -> Self {
        Self {
            source,
            assessor,
            renderer: None,
            selector: FileSelector::default(),
            analyzer: HeuristicAnalyzer::new(),
            fusion: FusionEngine::new(),
            mapper: AttributeMapper::new(),
            content_policy: ContentPolicy::default(),
            retrier: Retrier::default(),
        }
    }

    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_selector(mut self, selector: FileSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_content_policy(mut self, policy: ContentPolicy) -> Self {
        self.content_policy = policy;
        self
    }

    pub fn with_retrier(mut self, retrier: Retrier) -> Self {
        self.retrier = retrier;
        self
    }

    /// Run the pipeline for a repository URL.
    ///
    /// The URL is validated before any stage runs.
    pub fn run(&self, url: &str, generation_id: Uuid) -> PipelineResult<PipelineOutput> {
        let repo = RepoRef::parse(url)?;
        let mut state = PipelineState::new(repo, generation_id);

        match self.execute(&mut state) {
            Ok(()) => state.into_output(),
            Err((_, err)) => Err(err),
        }
    }

    /// Run every stage against `state`, returning the failing stage on error.
    ///
    /// The state keeps whatever the completed stages produced, plus the error.
    pub fn execute(&self, state: &mut PipelineState) -> Result<(), (Stage, PipelineError)> {
        info!("Starting generation {} for {}", state.generation_id, state.repo);
        let run_start = Instant::now();

        for stage in Stage::ALL {
            let start = Instant::now();
            if let Err(err) = self.run_stage(stage, state) {
                error!(
                    "Stage {} failed for {} ({}): {}",
                    stage,
                    state.repo,
                    err.kind(),
                    err
                );
                state.error = Some(err.clone());
                return Err((stage, err));
            }
            debug!("Stage {} completed in {:?}", stage, start.elapsed());
        }

        info!(
            "Generation {} completed in {:.2}s",
            state.generation_id,
            run_start.elapsed().as_secs_f64()
        );
        Ok(())
    }

    fn run_stage(&self, stage: Stage, state: &mut PipelineState) -> PipelineResult<()> {
        match stage {
            Stage::Metadata => self.fetch_metadata(state),
            Stage::SelectFiles => self.select_files(state),
            Stage::FetchContents => self.fetch_contents(state),
            Stage::Heuristics => self.analyze_heuristics(state),
            Stage::Assessment => self.assess_quality(state),
            Stage::FuseAndMap => self.fuse_and_map(state),
            Stage::Render => self.render(state),
        }
    }

    fn fetch_metadata(&self, state: &mut PipelineState) -> PipelineResult<()> {
        let metadata = self.source.metadata(&state.repo)?;
        info!(
            "{}: {} KB, {} stars, language {}",
            state.repo,
            metadata.size_kb,
            metadata.stars,
            metadata.language_name()
        );
        state.metadata = Some(metadata);
        Ok(())
    }

    fn select_files(&self, state: &mut PipelineState) -> PipelineResult<()> {
        let metadata = state
            .metadata
            .as_ref()
            .ok_or_else(|| missing(Stage::SelectFiles, "metadata"))?;

        let tree = self.source.file_tree(&state.repo)?;
        let selected = self
            .selector
            .select(&tree, metadata.primary_language.as_deref());
        info!("Selected {} of {} files", selected.len(), tree.len());

        state.selected_paths = Some(selected);
        Ok(())
    }

    fn fetch_contents(&self, state: &mut PipelineState) -> PipelineResult<()> {
        let paths = state
            .selected_paths
            .as_ref()
            .ok_or_else(|| missing(Stage::FetchContents, "selected_paths"))?;

        let mut contents = fetch_contents(
            self.source.as_ref(),
            &state.repo,
            paths,
            &self.content_policy,
            &self.retrier,
        )?;

        // Keep selection order; sources that skip the policy are truncated here
        let files: Vec<FileCandidate> = paths
            .iter()
            .filter_map(|path| {
                contents.remove(path).map(|text| {
                    FileCandidate::new(path.clone()).with_content(self.content_policy.truncate(&text))
                })
            })
            .collect();

        if files.len() < paths.len() {
            debug!("Dropped {} unreadable files", paths.len() - files.len());
        }
        state.files = Some(files);
        Ok(())
    }

    fn analyze_heuristics(&self, state: &mut PipelineState) -> PipelineResult<()> {
        let files = state
            .files
            .as_ref()
            .ok_or_else(|| missing(Stage::Heuristics, "files"))?;

        let metrics = self.analyzer.analyze(files)?;
        debug!(
            "Heuristics: line avg {}, nesting avg {}, comment ratio {}",
            metrics.line_length_avg, metrics.nesting_depth_avg, metrics.comment_ratio
        );
        state.heuristics = Some(metrics);
        Ok(())
    }

    fn assess_quality(&self, state: &mut PipelineState) -> PipelineResult<()> {
        let files = state
            .files
            .as_ref()
            .ok_or_else(|| missing(Stage::Assessment, "files"))?;

        let assessment = self
            .retrier
            .run("quality assessment", || self.assessor.assess(files))?;
        info!("Qualitative score {:.1}", assessment.overall_score);
        state.assessment = Some(assessment);
        Ok(())
    }

    fn fuse_and_map(&self, state: &mut PipelineState) -> PipelineResult<()> {
        let stage = Stage::FuseAndMap;
        let heuristics = state
            .heuristics
            .as_ref()
            .ok_or_else(|| missing(stage, "heuristics"))?;
        let assessment = state
            .assessment
            .as_ref()
            .ok_or_else(|| missing(stage, "assessment"))?;
        let metadata = state
            .metadata
            .as_ref()
            .ok_or_else(|| missing(stage, "metadata"))?;
        let files = state.files.as_ref().ok_or_else(|| missing(stage, "files"))?;

        let analyzed: Vec<String> = files.iter().map(|f| f.path.clone()).collect();
        let fused = self.fusion.combine(heuristics, assessment, analyzed);
        let attributes = self.mapper.map(metadata, &fused);
        let description = describe(&attributes);

        state.fused = Some(fused);
        state.attributes = Some(attributes);
        state.description = Some(description);
        Ok(())
    }

    fn render(&self, state: &mut PipelineState) -> PipelineResult<()> {
        let Some(renderer) = &self.renderer else {
            debug!("No renderer configured, skipping handoff");
            return Ok(());
        };

        let description = state
            .description
            .as_ref()
            .ok_or_else(|| missing(Stage::Render, "description"))?;
        let attributes = state
            .attributes
            .as_ref()
            .ok_or_else(|| missing(Stage::Render, "attributes"))?;

        let output = self
            .retrier
            .run("render", || renderer.render(description, attributes))?;
        state.render = Some(output);
        Ok(())
    }
}
