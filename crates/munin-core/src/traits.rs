//! Capability traits for the three black-box model services.
//!
//! The orchestrator is written against these seams only; swap any backend
//! (local or remote) without touching pipeline logic. Production
//! implementations live in `bridge` and in `munin-index`.

use crate::error::BridgeError;
use crate::types::SearchHit;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Speech-to-text over a whole audio artifact.
#[async_trait]
pub trait SpeechTranscriber: Send + Sync {
    /// Transcribe the file at `audio_path` into a trimmed transcript.
    /// An empty string is a valid (if unhelpful) result, not an error.
    async fn transcribe(&self, audio_path: &Path) -> Result<String, BridgeError>;
}

/// Free-text generation for the insight prompts.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send one prompt, return the model's raw text response.
    async fn generate(&self, prompt: &str) -> Result<String, BridgeError>;
}

/// Per-chunk metadata merged into every index entry of a meeting, so a search
/// hit can be traced back to its source without a second lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub filename: String,
    pub participants: Vec<String>,
    pub key_topics: Vec<String>,
}

/// Content-addressable semantic index over transcript chunks.
#[async_trait]
pub trait EmbeddingIndex: Send + Sync {
    /// Chunk `transcript` and insert every chunk keyed by
    /// `{meeting_id}_chunk_{index}` with `metadata` merged into each entry.
    async fn add_meeting(
        &self,
        meeting_id: &str,
        transcript: &str,
        metadata: ChunkMetadata,
    ) -> Result<(), BridgeError>;

    /// Nearest-neighbor search against the query, best matches first.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, BridgeError>;
}
