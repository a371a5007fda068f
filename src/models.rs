//! Core data models for Repocat
//!
//! These models flow between pipeline stages. Each is produced by exactly
//! one stage and read-only afterwards.

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

const GITHUB_PREFIX: &str = "https://github.com/";

/// A validated `owner/name` repository reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    /// Parse a `https://github.com/owner/repo[/...]` URL.
    ///
    /// Trailing path segments (`/tree/main`, ...) and a `.git` suffix are ignored.
    pub fn parse(url: &str) -> Result<Self, PipelineError> {
        let url = url.trim();
        let path = url.strip_prefix(GITHUB_PREFIX).ok_or_else(|| {
            PipelineError::Validation(format!("'{}' must start with '{}'", url, GITHUB_PREFIX))
        })?;

        let mut parts = path.trim_end_matches('/').split('/');
        let owner = parts.next().unwrap_or_default();
        let name = parts.next().unwrap_or_default();
        let name = name.strip_suffix(".git").unwrap_or(name);

        if owner.is_empty() || name.is_empty() {
            return Err(PipelineError::Validation(format!(
                "'{}' must include a non-empty owner and repository name",
                url
            )));
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Languages with dedicated heuristic and selection tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Go,
    Rust,
    Java,
    C,
    Cpp,
    Ruby,
    Php,
    #[default]
    Unknown,
}

impl Language {
    pub const KNOWN: [Language; 10] = [
        Language::Python,
        Language::JavaScript,
        Language::TypeScript,
        Language::Go,
        Language::Rust,
        Language::Java,
        Language::C,
        Language::Cpp,
        Language::Ruby,
        Language::Php,
    ];

    /// Display name as reported by GitHub's language statistics
    pub fn name(&self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::JavaScript => "JavaScript",
            Language::TypeScript => "TypeScript",
            Language::Go => "Go",
            Language::Rust => "Rust",
            Language::Java => "Java",
            Language::C => "C",
            Language::Cpp => "C++",
            Language::Ruby => "Ruby",
            Language::Php => "PHP",
            Language::Unknown => "Unknown",
        }
    }

    /// Case-insensitive lookup from a language name; anything unrecognised is `Unknown`
    pub fn from_name(name: &str) -> Self {
        let name = name.trim().to_lowercase();
        match name.as_str() {
            "cpp" | "c++" => Language::Cpp,
            _ => Self::KNOWN
                .into_iter()
                .find(|lang| lang.name().to_lowercase() == name)
                .unwrap_or(Language::Unknown),
        }
    }

    /// Source extensions, with leading dot
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::Python => &[".py"],
            Language::JavaScript => &[".js", ".jsx"],
            Language::TypeScript => &[".ts", ".tsx"],
            Language::Go => &[".go"],
            Language::Rust => &[".rs"],
            Language::Java => &[".java"],
            Language::C => &[".c", ".h"],
            Language::Cpp => &[".cpp", ".hpp", ".cc", ".hh"],
            Language::Ruby => &[".rb"],
            Language::Php => &[".php"],
            Language::Unknown => &[],
        }
    }

    /// Detect a file's language from its extension
    pub fn from_path(path: &str) -> Self {
        let ext = match Path::new(path).extension().and_then(|e| e.to_str()) {
            Some(ext) => format!(".{}", ext.to_lowercase()),
            None => return Language::Unknown,
        };
        Self::KNOWN
            .into_iter()
            .find(|lang| lang.extensions().contains(&ext.as_str()))
            .unwrap_or(Language::Unknown)
    }

    pub fn is_known(&self) -> bool {
        *self != Language::Unknown
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Language {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Repository metadata from the hosting service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoMetadata {
    pub name: String,
    pub owner: String,
    pub size_kb: u64,
    #[serde(default)]
    pub stars: u64,
    #[serde(default)]
    pub primary_language: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl RepoMetadata {
    pub fn language(&self) -> Language {
        self.primary_language
            .as_deref()
            .map(Language::from_name)
            .unwrap_or_default()
    }

    pub fn language_name(&self) -> &str {
        self.primary_language.as_deref().unwrap_or("Unknown")
    }
}

/// A selected file, enriched with content once fetched
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileCandidate {
    pub path: String,
    pub content: Option<String>,
    pub language: Language,
}

impl FileCandidate {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let language = Language::from_path(&path);
        Self {
            path,
            content: None,
            language,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn content(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

/// Aggregated static-analysis metrics across the analysed files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeuristicMetrics {
    pub line_length_avg: f64,
    pub line_length_max: usize,
    pub lines_too_long_pct: f64,
    pub function_length_avg: f64,
    pub function_length_max: usize,
    pub function_count: usize,
    pub nesting_depth_avg: f64,
    pub nesting_depth_max: usize,
    pub comment_ratio: f64,
    pub has_tests: bool,
    pub has_type_hints: bool,
    pub complexity_avg: f64,
    pub complexity_max: usize,
    pub complexity_total: usize,
}

/// One named dimension of the model-based review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetric {
    pub name: String,
    pub score: f64,
    pub description: String,
}

/// Structured result of the qualitative (model-based) review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitativeAssessment {
    #[serde(alias = "overall_quality_score")]
    pub overall_score: f64,
    pub metrics: Vec<QualityMetric>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
    pub summary: String,
}

impl QualitativeAssessment {
    /// Check score bounds; returns a description of the first violation.
    pub fn validate(&self) -> Result<(), String> {
        if !in_score_range(self.overall_score) {
            return Err(format!(
                "overall score {} is outside [0, 10]",
                self.overall_score
            ));
        }
        for metric in &self.metrics {
            if metric.name.trim().is_empty() {
                return Err("metric with empty name".to_string());
            }
            if !in_score_range(metric.score) {
                return Err(format!(
                    "metric '{}' score {} is outside [0, 10]",
                    metric.name, metric.score
                ));
            }
        }
        Ok(())
    }
}

fn in_score_range(score: f64) -> bool {
    score.is_finite() && (0.0..=10.0).contains(&score)
}

/// Final fused score with the merged metric map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FusedResult {
    /// Always within [0.0, 10.0], one decimal
    pub score: f64,
    pub heuristic_score: f64,
    pub qualitative_score: f64,
    pub files_analyzed: Vec<String>,
    #[serde(skip)]
    pub heuristics: HeuristicMetrics,
    pub metrics: BTreeMap<String, serde_json::Value>,
}

impl FusedResult {
    pub fn has_tests(&self) -> bool {
        self.heuristics.has_tests
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CatSize {
    Small,
    Medium,
    Large,
    VeryLarge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CatAge {
    Kitten,
    Young,
    Adult,
    Senior,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    Happy,
    Neutral,
    Concerned,
    Grumpy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Breed {
    Tabby,
    Siamese,
    Persian,
    MaineCoon,
    ScottishFold,
    BritishShorthair,
    Ragdoll,
    DomesticShorthair,
}

/// Categorical attributes handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeSet {
    pub size: CatSize,
    pub age: CatAge,
    pub expression: Expression,
    pub breed: Breed,
    pub background: String,
    pub beauty_score: f64,
    pub language: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repo_ref() {
        let r = RepoRef::parse("https://github.com/octo/widgets").unwrap();
        assert_eq!(r.owner, "octo");
        assert_eq!(r.name, "widgets");

        let r = RepoRef::parse("https://github.com/octo/widgets.git/").unwrap();
        assert_eq!(r.slug(), "octo/widgets");

        let r = RepoRef::parse("https://github.com/octo/widgets/tree/main/src").unwrap();
        assert_eq!(r.name, "widgets");
    }

    #[test]
    fn test_parse_repo_ref_rejects_malformed() {
        for bad in [
            "",
            "http://github.com/octo/widgets",
            "https://gitlab.com/octo/widgets",
            "https://github.com/octo",
            "https://github.com//widgets",
            "https://github.com/",
        ] {
            assert!(
                matches!(RepoRef::parse(bad), Err(PipelineError::Validation(_))),
                "expected validation error for {bad:?}"
            );
        }
    }

    #[test]
    fn test_language_lookup() {
        assert_eq!(Language::from_name("python"), Language::Python);
        assert_eq!(Language::from_name("C++"), Language::Cpp);
        assert_eq!(Language::from_name(" TypeScript "), Language::TypeScript);
        assert_eq!(Language::from_name("Kotlin"), Language::Unknown);

        assert_eq!(Language::from_path("src/app.tsx"), Language::TypeScript);
        assert_eq!(Language::from_path("include/util.hh"), Language::Cpp);
        assert_eq!(Language::from_path("README.md"), Language::Unknown);
        assert_eq!(Language::from_path("Makefile"), Language::Unknown);
    }

    #[test]
    fn test_assessment_validation() {
        let mut assessment = QualitativeAssessment {
            overall_score: 7.5,
            metrics: vec![QualityMetric {
                name: "Readability".into(),
                score: 8.0,
                description: String::new(),
            }],
            strengths: vec![],
            weaknesses: vec![],
            recommendations: vec![],
            summary: String::new(),
        };
        assert!(assessment.validate().is_ok());

        assessment.metrics[0].score = 11.0;
        assert!(assessment.validate().is_err());

        assessment.metrics[0].score = 5.0;
        assessment.overall_score = f64::NAN;
        assert!(assessment.validate().is_err());
    }

    #[test]
    fn test_assessment_requires_every_field() {
        let complete = r#"{"overall_quality_score": 6.5,
            "metrics": [{"name": "Readability", "score": 7, "description": "Clear"}],
            "strengths": [], "weaknesses": [], "recommendations": [], "summary": "ok"}"#;
        let parsed: QualitativeAssessment = serde_json::from_str(complete).unwrap();
        assert_eq!(parsed.overall_score, 6.5);

        let bare = r#"{"overall_quality_score": 7.0}"#;
        assert!(serde_json::from_str::<QualitativeAssessment>(bare).is_err());

        let metric_without_description = complete.replace(r#", "description": "Clear""#, "");
        assert!(serde_json::from_str::<QualitativeAssessment>(&metric_without_description).is_err());
    }
}
