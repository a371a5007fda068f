//! Heuristic static analysis
//!
//! Computes structural metrics for each fetched file with the pattern
//! profile of its language, then folds them into one [`HeuristicMetrics`]
//! record for the whole sample.
//!
//! Aggregation rules:
//! - averages (line length, function length, nesting, complexity) are the
//!   mean of the non-zero per-file averages
//! - the long-line percentage and comment ratio are averaged over every
//!   analysed file
//! - maxima are taken over every file; counts and totals are summed
//! - `has_tests` / `has_type_hints` are OR-combined

pub mod metrics;
pub mod patterns;

use crate::error::{PipelineError, PipelineResult};
use crate::models::{FileCandidate, HeuristicMetrics};
use metrics::{mean, round_to, ComplexityStats, FunctionStats, LineStats, NestingStats};
use tracing::debug;

/// Metrics for a single file before aggregation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileMetrics {
    pub path: String,
    pub lines: LineStats,
    pub functions: FunctionStats,
    pub nesting: NestingStats,
    pub comment_ratio: f64,
    pub has_type_hints: bool,
    pub complexity: ComplexityStats,
    pub is_test: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicAnalyzer;

impl HeuristicAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyse one file. Empty content yields zeroed metrics.
    pub fn analyze_file(&self, file: &FileCandidate) -> FileMetrics {
        let content = file.content();
        let profile = patterns::profile(file.language);

        FileMetrics {
            path: file.path.clone(),
            lines: metrics::line_lengths(content),
            functions: metrics::function_lengths(content, profile),
            nesting: metrics::nesting_depth(content, profile),
            comment_ratio: metrics::comment_ratio(content, profile),
            has_type_hints: metrics::has_type_hints(content, profile),
            complexity: metrics::complexity(content),
            is_test: metrics::is_test_path(&file.path),
        }
    }

    /// Analyse and aggregate `files`.
    ///
    /// Files without content are skipped. Fails with
    /// [`PipelineError::EmptyInput`] when nothing is left to analyse.
    pub fn analyze(&self, files: &[FileCandidate]) -> PipelineResult<HeuristicMetrics> {
        if files.is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        let per_file: Vec<FileMetrics> = files
            .iter()
            .filter(|f| !f.content().is_empty())
            .map(|f| self.analyze_file(f))
            .collect();

        if per_file.is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        debug!("Analysed {} of {} files", per_file.len(), files.len());
        Ok(aggregate(&per_file))
    }
}

fn mean_of_nonzero(values: impl Iterator<Item = f64>) -> f64 {
    let nonzero: Vec<f64> = values.filter(|v| *v > 0.0).collect();
    round_to(mean(&nonzero), 1)
}

fn aggregate(files: &[FileMetrics]) -> HeuristicMetrics {
    let too_long: Vec<f64> = files.iter().map(|f| f.lines.too_long_pct).collect();
    let comments: Vec<f64> = files.iter().map(|f| f.comment_ratio).collect();

    HeuristicMetrics {
        line_length_avg: mean_of_nonzero(files.iter().map(|f| f.lines.avg)),
        line_length_max: files.iter().map(|f| f.lines.max).max().unwrap_or(0),
        lines_too_long_pct: round_to(mean(&too_long), 1),
        function_length_avg: mean_of_nonzero(files.iter().map(|f| f.functions.avg)),
        function_length_max: files.iter().map(|f| f.functions.max).max().unwrap_or(0),
        function_count: files.iter().map(|f| f.functions.count).sum(),
        nesting_depth_avg: mean_of_nonzero(files.iter().map(|f| f.nesting.avg)),
        nesting_depth_max: files.iter().map(|f| f.nesting.max).max().unwrap_or(0),
        comment_ratio: round_to(mean(&comments), 2),
        has_tests: files.iter().any(|f| f.is_test),
        has_type_hints: files.iter().any(|f| f.has_type_hints),
        complexity_avg: mean_of_nonzero(files.iter().map(|f| f.complexity.avg)),
        complexity_max: files.iter().map(|f| f.complexity.max).max().unwrap_or(0),
        complexity_total: files.iter().map(|f| f.complexity.total).sum(),
    }
}
