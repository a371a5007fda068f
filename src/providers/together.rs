use super::openrouter::classify_status;
use super::{make_agent, RenderOutput, Renderer, USER_AGENT};
use crate::config::RendererConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::models::AttributeSet;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

const SERVICE: &str = "Together";

/// Image generation via Together's OpenAI-style images endpoint
pub struct TogetherRenderer {
    endpoint: String,
    api_key: String,
    model: String,
    width: u32,
    height: u32,
    steps: u32,
    agent: ureq::Agent,
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    width: u32,
    height: u32,
    steps: u32,
    n: u32,
    response_format: &'a str,
}

#[derive(Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    url: Option<String>,
}

impl TogetherRenderer {
    pub fn new(config: &RendererConfig, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: format!(
                "{}/images/generations",
                config.base_url.trim_end_matches('/')
            ),
            api_key: api_key.into(),
            model: config.model.clone(),
            width: config.width,
            height: config.height,
            steps: config.steps,
            agent: make_agent(Duration::from_secs(config.timeout_secs)),
        }
    }
}

impl Renderer for TogetherRenderer {
    fn render(&self, description: &str, attributes: &AttributeSet) -> PipelineResult<RenderOutput> {
        if description.trim().is_empty() {
            return Err(PipelineError::Validation(
                "render description cannot be empty".into(),
            ));
        }

        let preview: String = description.chars().take(50).collect();
        info!(
            "Rendering {:?}/{:?} cat: {}...",
            attributes.size, attributes.expression, preview
        );

        let body = ImageRequest {
            model: &self.model,
            prompt: description,
            width: self.width,
            height: self.height,
            steps: self.steps,
            n: 1,
            response_format: "url",
        };

        let response = self
            .agent
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .header("User-Agent", USER_AGENT)
            .send_json(&body)
            .map_err(|e| PipelineError::dependency(SERVICE, None, e.to_string()))?;

        let status = response.status().as_u16();
        if status >= 400 {
            let error_text = response.into_body().read_to_string().unwrap_or_default();
            return Err(classify_status(SERVICE, status, error_text));
        }

        let resp: ImageResponse = response
            .into_body()
            .read_json()
            .map_err(|e| PipelineError::schema(SERVICE, e.to_string()))?;

        let image_url = resp
            .data
            .into_iter()
            .find_map(|d| d.url)
            .ok_or_else(|| PipelineError::schema(SERVICE, "No image URL in response"))?;

        info!("Image generated: {}", image_url);
        Ok(RenderOutput {
            image_url,
            model: self.model.clone(),
        })
    }
}
