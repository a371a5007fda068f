//! OpenRouter quality assessor
//!
//! Sends the sampled files to an OpenAI-compatible chat completions
//! endpoint with a strict JSON schema and validates the answer into a
//! [`QualitativeAssessment`].

use super::prompts::{build_review_prompt, review_schema, REVIEW_SYSTEM_PROMPT};
use super::{make_agent, QualityAssessor, USER_AGENT};
use crate::config::AssessorConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::models::{FileCandidate, QualitativeAssessment};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, info};

const SERVICE: &str = "OpenRouter";

pub struct OpenRouterAssessor {
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    agent: ureq::Agent,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    response_format: Value,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatContent,
}

#[derive(Deserialize)]
struct ChatContent {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
    #[serde(default)]
    total_tokens: u64,
}

pub(crate) fn classify_status(service: &str, status: u16, body: String) -> PipelineError {
    match status {
        429 => PipelineError::rate_limited(service),
        401 | 403 => PipelineError::auth_failure(service),
        _ => PipelineError::dependency(service, Some(status), body),
    }
}

static FENCED_JSON: OnceLock<Regex> = OnceLock::new();

/// Pull the JSON object out of a model reply, tolerating a ```json fence
fn extract_json(reply: &str) -> &str {
    let fenced = FENCED_JSON
        .get_or_init(|| Regex::new(r"(?s)```(?:json)?\s*(\{.*\})\s*```").expect("valid regex"));
    if let Some(inner) = fenced.captures(reply).and_then(|c| c.get(1)) {
        return inner.as_str();
    }

    match (reply.find('{'), reply.rfind('}')) {
        (Some(start), Some(end)) if end > start => &reply[start..=end],
        _ => reply.trim(),
    }
}

/// Parse and validate a model reply
pub fn parse_assessment(reply: &str) -> PipelineResult<QualitativeAssessment> {
    let assessment: QualitativeAssessment = serde_json::from_str(extract_json(reply))
        .map_err(|e| PipelineError::schema(SERVICE, format!("invalid JSON: {}", e)))?;
    assessment
        .validate()
        .map_err(|msg| PipelineError::schema(SERVICE, msg))?;
    Ok(assessment)
}

impl OpenRouterAssessor {
    pub fn new(config: &AssessorConfig, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            agent: make_agent(Duration::from_secs(config.timeout_secs)),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body<'a>(&'a self, user_prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: REVIEW_SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            response_format: json!({
                "type": "json_schema",
                "json_schema": {
                    "name": "code_quality_analysis",
                    "strict": true,
                    "schema": review_schema()
                }
            }),
        }
    }
}

impl QualityAssessor for OpenRouterAssessor {
    fn assess(&self, files: &[FileCandidate]) -> PipelineResult<QualitativeAssessment> {
        if files.is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        let user_prompt = build_review_prompt(files);
        debug!(
            "Requesting review of {} files ({} prompt chars) from {}",
            files.len(),
            user_prompt.len(),
            self.model
        );

        let response = self
            .agent
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .header("User-Agent", USER_AGENT)
            .send_json(&self.request_body(&user_prompt))
            .map_err(|e| PipelineError::dependency(SERVICE, None, e.to_string()))?;

        let status = response.status().as_u16();
        if status >= 400 {
            let error_text = response.into_body().read_to_string().unwrap_or_default();
            return Err(classify_status(SERVICE, status, error_text));
        }

        let resp: ChatResponse = response
            .into_body()
            .read_json()
            .map_err(|e| PipelineError::schema(SERVICE, e.to_string()))?;

        if let Some(usage) = &resp.usage {
            info!(
                "Token usage - Prompt: {}, Completion: {}, Total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        let reply = resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| PipelineError::schema(SERVICE, "No response choices"))?;

        parse_assessment(&reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const REPLY: &str = r#"{
        "overall_quality_score": 7.5,
        "metrics": [{"name": "Readability", "score": 8, "description": "Clear"}],
        "strengths": ["Consistent naming"],
        "weaknesses": ["Sparse tests"],
        "recommendations": ["Add tests"],
        "summary": "Tidy codebase"
    }"#;

    #[test]
    fn test_parse_plain_json() {
        let assessment = parse_assessment(REPLY).unwrap();
        assert_eq!(assessment.overall_score, 7.5);
        assert_eq!(assessment.metrics[0].name, "Readability");
        assert_eq!(assessment.summary, "Tidy codebase");
    }

    #[test]
    fn test_parse_fenced_json() {
        let reply = format!("Here you go:\n```json\n{}\n```\n", REPLY);
        assert_eq!(parse_assessment(&reply).unwrap().overall_score, 7.5);
    }

    #[test]
    fn test_out_of_range_score_is_schema_error() {
        let reply = REPLY.replace("7.5", "11.0");
        let err = parse_assessment(&reply).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_missing_fields_are_schema_errors() {
        let err = parse_assessment(r#"{"overall_quality_score": 7.0}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);

        let reply = REPLY.replace(r#", "description": "Clear""#, "");
        let err = parse_assessment(&reply).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_garbage_is_schema_error() {
        let err = parse_assessment("I cannot help with that").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(classify_status(SERVICE, 429, String::new()).kind(), ErrorKind::RateLimited);
        assert_eq!(classify_status(SERVICE, 401, String::new()).kind(), ErrorKind::AuthFailure);
        assert_eq!(classify_status(SERVICE, 503, String::new()).kind(), ErrorKind::Dependency);
    }

    #[test]
    fn test_empty_file_list_is_rejected() {
        let assessor = OpenRouterAssessor::new(&AssessorConfig::default(), "sk-or-test-key");
        assert_eq!(assessor.assess(&[]), Err(PipelineError::EmptyInput));
    }

    #[test]
    fn test_request_uses_json_schema() {
        let assessor = OpenRouterAssessor::new(&AssessorConfig::default(), "sk-or-test-key");
        let body = serde_json::to_value(assessor.request_body("hello")).unwrap();
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hello");
    }
}
