//! Text generation backends.

use std::time::Duration;

use serde_json::{json, Value};

use super::{Result, StoryError};
use crate::config::StoryConfig;

/// What the generator is asked for
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub system: String,
    pub prompt: String,
    /// JSON schema the answer must follow, when the backend supports it
    pub response_schema: Option<Value>,
}

/// Anything that turns a prompt into text
pub trait TextGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

/// OpenAI-compatible `/chat/completions` client (OpenAI, Gemini)
pub struct ChatCompletionsGenerator {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
    api_key: String,
    temperature: Option<f64>,
}

impl ChatCompletionsGenerator {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| StoryError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
            temperature: None,
        })
    }

    /// Build from config, reading the provider's API key from the environment
    pub fn from_config(config: &StoryConfig) -> Result<Self> {
        let var = config.provider.api_key_var();
        let api_key = std::env::var(var)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(StoryError::MissingApiKey(var))?;

        let mut generator = Self::new(config.base_url(), config.model(), api_key)?;
        generator.temperature = config.temperature;
        Ok(generator)
    }

    fn endpoint(&self) -> String {
        if self.base_url.ends_with('/') {
            format!("{}chat/completions", self.base_url)
        } else {
            format!("{}/chat/completions", self.base_url)
        }
    }

    fn request_body(&self, request: &GenerationRequest) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.prompt }
            ],
        });

        if let Some(temperature) = self.temperature {
            body["temperature"] = json!(temperature);
        }
        if let Some(schema) = &request.response_schema {
            body["response_format"] = json!({
                "type": "json_schema",
                "json_schema": {
                    "name": "dialog",
                    "strict": true,
                    "schema": schema
                }
            });
        }
        body
    }
}

impl TextGenerator for ChatCompletionsGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let url = self.endpoint();
        log::debug!("Requesting dialog from {} ({})", url, self.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(request))
            .send()
            .map_err(|e| StoryError::Request(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().unwrap_or_default();
            return Err(StoryError::Api { status, body });
        }

        let json: Value = response
            .json()
            .map_err(|e| StoryError::InvalidResponse(format!("Failed to parse JSON: {}", e)))?;
        extract_content(&json)
    }
}

fn extract_content(json: &Value) -> Result<String> {
    json["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| StoryError::InvalidResponse("missing choices[0].message.content".to_string()))
}
