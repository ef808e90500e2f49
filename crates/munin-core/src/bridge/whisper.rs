//! whisper.cpp server bridge: audio file in, transcript out.
//!
//! Speaks the `whisper-server` HTTP contract: multipart POST to
//! `{base}/inference` with `response_format=json`, response `{"text": ...}`.
//! Transcription of a long recording takes seconds to minutes; callers must
//! keep it off the request-serving path.

use crate::error::BridgeError;
use crate::traits::SpeechTranscriber;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const INFERENCE_TIMEOUT_SECS: u64 = 1800;

#[derive(Deserialize)]
struct InferenceResponse {
    text: String,
}

/// reqwest-based client for a local whisper.cpp server.
pub struct WhisperBridge {
    base_url: String,
    client: reqwest::Client,
}

impl WhisperBridge {
    /// Create a bridge against `base_url` (e.g. `http://localhost:8090`).
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(INFERENCE_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl SpeechTranscriber for WhisperBridge {
    async fn transcribe(&self, audio_path: &Path) -> Result<String, BridgeError> {
        let bytes = tokio::fs::read(audio_path).await?;
        let file_name = audio_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("response_format", "json");

        let url = format!("{}/inference", self.base_url);
        let res = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    BridgeError::ModelUnavailable(format!("whisper server: {}", e))
                } else {
                    BridgeError::Http(e)
                }
            })?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(BridgeError::Backend { status, body });
        }

        let parsed: InferenceResponse = res
            .json()
            .await
            .map_err(|e| BridgeError::Malformed(format!("inference response: {}", e)))?;

        Ok(parsed.text.trim().to_string())
    }
}
