use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::{GeminiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::errors::{GeminiError, GeminiResult};
use crate::types::*;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// The hosted text-generation service the advisor talks to.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a JSON document for `prompt` constrained by `response_schema`.
    ///
    /// Returns the raw model text; validating it is the caller's job.
    async fn generate_json(&self, prompt: &str, response_schema: &Value) -> GeminiResult<String>;

    /// Get the model name being used
    fn model_name(&self) -> &str;
}

/// Client for interacting with the Gemini API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
    api_key: String,
    model_name: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a new Gemini API client
    pub fn new(config: GeminiConfig) -> GeminiResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                GeminiError::ConfigError(
                    "API key is required to initialize the Gemini client".to_string(),
                )
            })?;

        let model_name = config
            .model_name
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        let mut builder = Client::builder().connect_timeout(Duration::from_secs(10));
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| {
            GeminiError::ConfigError(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            config,
            api_key,
            model_name,
            base_url,
        })
    }

    /// Get the generateContent URL for the configured model.
    ///
    /// The API key travels in the `x-goog-api-key` header, never in the URL.
    fn get_base_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model_name)
    }

    /// Generate content using the Gemini API
    pub async fn generate_content(
        &self,
        request: GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse> {
        let url = self.get_base_url();

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                GeminiError::RequestError(format!("Failed to send request: {}", e.without_url()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.map_err(|e| {
                GeminiError::ResponseError(format!(
                    "Failed to read error response: {}",
                    e.without_url()
                ))
            })?;

            let message = match serde_json::from_str::<ApiErrorResponse>(&error_body) {
                Ok(parsed) => format!(
                    "API request failed: {} (status: {})",
                    parsed.error.message, parsed.error.status
                ),
                Err(_) => format!("API request failed: {}", error_body),
            };

            return Err(GeminiError::HttpError {
                status_code: status.as_u16(),
                message,
            });
        }

        let response_body = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| {
                GeminiError::ParsingError(format!("Failed to parse response: {}", e.without_url()))
            })?;

        Ok(response_body)
    }

    /// Creates a single-turn request asking for JSON output shaped by `response_schema`.
    pub(crate) fn create_json_request(
        &self,
        prompt: &str,
        response_schema: &Value,
    ) -> GenerateContentRequest {
        let system_instruction = self
            .config
            .system_prompt
            .as_ref()
            .map(|prompt| Content::system(prompt.clone()));

        GenerateContentRequest {
            contents: vec![Content::user(prompt.to_string())],
            system_instruction,
            generation_config: Some(GenerationConfig {
                temperature: self.config.temperature,
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(response_schema.clone()),
            }),
        }
    }

    /// Helper method to extract text from a response
    pub fn extract_text_from_response(response: &GenerateContentResponse) -> GeminiResult<String> {
        let candidate = response.candidates.first().ok_or_else(|| {
            GeminiError::ResponseError("No candidates in response".to_string())
        })?;

        if let Some(reason) = &candidate.finish_reason {
            if reason != "STOP" {
                warn!("Gemini generation finish reason: {}", reason);
            }
        }

        let content = candidate
            .content
            .as_ref()
            .ok_or_else(|| GeminiError::ResponseError("No content in candidate".to_string()))?;

        let part = content
            .parts
            .first()
            .ok_or_else(|| GeminiError::ResponseError("No parts in content".to_string()))?;

        let text = part
            .text
            .as_ref()
            .ok_or_else(|| GeminiError::ResponseError("No text in part".to_string()))?;

        Ok(text.clone())
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate_json(&self, prompt: &str, response_schema: &Value) -> GeminiResult<String> {
        debug!(model = %self.model_name, prompt_len = prompt.len(), "Calling Gemini");

        let request = self.create_json_request(prompt, response_schema);
        let response = self.generate_content(request).await?;

        if let Some(usage) = &response.usage_metadata {
            debug!(
                "Gemini token usage: prompt={}, response={}, total={}",
                usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
            );
        }

        Self::extract_text_from_response(&response)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
