//! Ollama text-generation bridge.
//!
//! One prompt in, raw text out via `POST {base}/api/generate` with streaming
//! disabled. Low temperature keeps the extraction prompts close to the
//! requested JSON shape.

use crate::error::BridgeError;
use crate::traits::TextGenerator;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GENERATE_TIMEOUT_SECS: u64 = 180;

#[derive(Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    top_p: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// reqwest-based Ollama client for insight extraction prompts.
pub struct OllamaBridge {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaBridge {
    /// Create a bridge against `base_url` (e.g. `http://localhost:11434`).
    pub fn new(base_url: &str, model: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(GENERATE_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
        }
    }
}

#[async_trait]
impl TextGenerator for OllamaBridge {
    async fn generate(&self, prompt: &str) -> Result<String, BridgeError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            options: GenerateOptions {
                temperature: 0.3,
                top_p: 0.9,
            },
        };

        let res = self.client.post(&url).json(&body).send().await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(BridgeError::Backend { status, body });
        }

        let parsed: GenerateResponse = res
            .json()
            .await
            .map_err(|e| BridgeError::Malformed(format!("generate response: {}", e)))?;

        Ok(parsed.response)
    }
}
