//! Prompt templates for the code-quality review

use crate::models::{FileCandidate, Language};
use serde_json::{json, Value};

pub const REVIEW_SYSTEM_PROMPT: &str = r#"You are an expert code quality analyst. Analyze the provided code files and assess:

1. Code Quality Metrics (score each 0-10):
   - Readability: How easy is the code to understand?
   - Maintainability: How easy is it to modify and extend?
   - Complexity: Are there overly complex sections?
   - Best Practices: Does it follow language/framework conventions?
   - Error Handling: How robust is error management?

2. Identify specific strengths and weaknesses
3. Provide actionable recommendations for improvement
4. Generate an overall quality score (weighted average)

Return your analysis in the specified JSON schema."#;

/// Fence tag for a file's code block
fn fence_tag(language: Language) -> String {
    match language {
        Language::Unknown => String::new(),
        Language::Cpp => "cpp".to_string(),
        other => other.name().to_lowercase(),
    }
}

/// Render files as labelled fenced code blocks
pub fn format_files(files: &[FileCandidate]) -> String {
    files
        .iter()
        .map(|file| {
            format!(
                "File: {}\n```{}\n{}\n```",
                file.path,
                fence_tag(file.language),
                file.content()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn build_review_prompt(files: &[FileCandidate]) -> String {
    format!(
        "Analyze the following code files for quality:\n\n{}\n\nProvide a comprehensive code quality analysis.",
        format_files(files)
    )
}

/// JSON schema the model is asked to answer with
pub fn review_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "overall_quality_score": {
                "type": "number",
                "minimum": 0,
                "maximum": 10,
                "description": "Overall quality score 0-10"
            },
            "metrics": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "score": { "type": "number", "minimum": 0, "maximum": 10 },
                        "description": { "type": "string" }
                    },
                    "required": ["name", "score", "description"],
                    "additionalProperties": false
                }
            },
            "strengths": { "type": "array", "items": { "type": "string" } },
            "weaknesses": { "type": "array", "items": { "type": "string" } },
            "recommendations": { "type": "array", "items": { "type": "string" } },
            "summary": { "type": "string" }
        },
        "required": [
            "overall_quality_score",
            "metrics",
            "strengths",
            "weaknesses",
            "recommendations",
            "summary"
        ],
        "additionalProperties": false
    })
}
