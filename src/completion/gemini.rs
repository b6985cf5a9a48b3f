// src/completion/gemini.rs

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    completion::{CompletionClient, CompletionRequest, ResponseFormat, ensure_prompt},
    config::{Config, GenerationConfig},
    error::AppError,
};

/// Client for the Gemini `generateContent` endpoint.
///
/// The API key is optional at construction; a missing key is reported on each call
/// so the rest of the service keeps working without it.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    generation: GenerationConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    status: Option<String>,
}

impl GeminiClient {
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
        generation: GenerationConfig,
        timeout: std::time::Duration,
    ) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            generation,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(
            config.gemini_api_key.clone(),
            config.gemini_base_url.clone(),
            config.generation.clone(),
            config.completion_timeout,
        )
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.generation.model
        )
    }
}

/// Builds the JSON body for a `generateContent` call.
pub fn build_request_body(request: &CompletionRequest, generation: &GenerationConfig) -> Value {
    let mut generation_config = json!({
        "temperature": generation.temperature,
        "topP": generation.top_p,
        "topK": generation.top_k,
        "maxOutputTokens": generation.max_output_tokens,
    });

    if let ResponseFormat::Json { schema } = &request.format {
        generation_config["responseMimeType"] = json!("application/json");
        if let Some(schema) = schema {
            generation_config["responseSchema"] = schema.clone();
        }
    }

    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": request.prompt }]
        }],
        "generationConfig": generation_config,
    })
}

fn extract_text(response: GenerateContentResponse) -> Result<String, AppError> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(AppError::Upstream(format!("prompt blocked by provider: {}", reason)));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Upstream("no candidates in model response".to_string()))?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AppError::Upstream(format!(
            "empty model response (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    Ok(text)
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, AppError> {
        ensure_prompt(&request.prompt)?;

        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Gemini API key not configured".to_string()))?;

        tracing::debug!(
            model = %self.generation.model,
            prompt_chars = request.prompt.chars().count(),
            "Calling Gemini"
        );

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&build_request_body(&request, &self.generation))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(err) => format!(
                    "{} ({})",
                    err.error.message,
                    err.error.status.unwrap_or_else(|| status.to_string())
                ),
                Err(_) => body,
            };
            return Err(AppError::Upstream(format!(
                "Gemini returned {}: {}",
                status, detail
            )));
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("undecodable Gemini response: {}", e)))?;

        let text = extract_text(payload)?;
        tracing::debug!(response_chars = text.chars().count(), "Gemini call succeeded");
        Ok(text)
    }
}
