use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::prompt::TranslationPrompt;
use crate::providers::{TranslationProvider, transport_error};

/// Translation provider backed by a local Ollama server
#[derive(Debug)]
pub struct OllamaProvider {
    /// Base URL of the Ollama API
    base_url: String,
    /// Model to generate with
    model: String,
    /// Sampling temperature
    temperature: f32,
    /// HTTP client for making requests
    client: Client,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize)]
pub struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// System message to guide the model
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    stream: bool,
}

/// Generation options for the Ollama API
#[derive(Debug, Serialize)]
pub struct GenerationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Generation response from the Ollama API
#[derive(Debug, Deserialize)]
pub struct GenerationResponse {
    /// Model name
    #[serde(default)]
    pub model: String,
    /// Generated text
    pub response: String,
    /// Whether the generation is complete
    #[serde(default)]
    pub done: bool,
    /// Number of generated tokens
    #[serde(default)]
    pub eval_count: Option<u64>,
}

impl GenerationRequest {
    /// Create a new non-streaming generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            options: None,
            stream: false,
        }
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options = Some(GenerationOptions {
            temperature: Some(temperature),
        });
        self
    }
}

impl OllamaProvider {
    /// Create a provider for `endpoint` (e.g. `http://localhost:11434`)
    pub fn new(endpoint: &str, model: &str, timeout_secs: u64, temperature: f32) -> Result<Self> {
        let endpoint = endpoint.trim().trim_end_matches('/');
        let base_url = if endpoint.is_empty() {
            "http://localhost:11434".to_string()
        } else if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("http://{}", endpoint)
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            // Ollama speaks HTTP/1.1
            .http1_only()
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .context("Failed to build HTTP client for Ollama")?;

        Ok(Self {
            base_url,
            model: model.to_string(),
            temperature,
            client,
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a generation request to the Ollama API
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| transport_error("Ollama", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to read Ollama response: {}", e)))?;

        if !status.is_success() {
            error!("Ollama API error ({}): {}", status, body);
            return Err(ProviderError::from_status(status.as_u16(), body));
        }

        serde_json::from_str::<GenerationResponse>(&body).map_err(|e| {
            let preview: String = body.chars().take(500).collect();
            error!("Failed to parse Ollama API response: {}. Raw response: {}", e, preview);
            ProviderError::ParseError(e.to_string())
        })
    }
}

#[async_trait]
impl TranslationProvider for OllamaProvider {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
        instructions: Option<&str>,
    ) -> Result<String, ProviderError> {
        let prompt = TranslationPrompt::build(text, source_lang, target_lang, instructions);
        let request = GenerationRequest::new(&self.model, prompt.user)
            .system(prompt.system)
            .temperature(self.temperature);

        let response = self.generate(&request).await?;
        debug!(
            "Ollama model {} produced {} token(s)",
            response.model,
            response.eval_count.unwrap_or_default()
        );

        let translated = response.response.trim();
        if translated.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(translated.to_string())
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
