//! Qdrant-backed embedding index with Ollama embeddings.
//!
//! Straight REST over reqwest: one collection, cosine distance, vector size
//! taken from the embed model's first response. Qdrant point ids must be
//! UUIDs, so the deterministic composite key `{meeting_id}_chunk_{index}` is
//! hashed to a UUIDv5 for the id and stored verbatim in the payload.

use crate::chunk::chunk_transcript;
use async_trait::async_trait;
use munin_core::error::BridgeError;
use munin_core::traits::{ChunkMetadata, EmbeddingIndex};
use munin_core::types::SearchHit;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info};
use uuid::Uuid;

const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct SearchResponse {
    result: Vec<ScoredPoint>,
}

#[derive(Deserialize)]
struct ScoredPoint {
    score: f32,
    #[serde(default)]
    payload: serde_json::Map<String, serde_json::Value>,
}

/// Semantic index over Qdrant, embeddings via Ollama.
pub struct QdrantIndex {
    qdrant_url: String,
    ollama_url: String,
    embed_model: String,
    collection: String,
    chunk_words: usize,
    client: reqwest::Client,
    collection_ready: OnceCell<()>,
}

impl QdrantIndex {
    pub fn new(
        qdrant_url: &str,
        ollama_url: &str,
        embed_model: &str,
        collection: &str,
        chunk_words: usize,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            qdrant_url: qdrant_url.trim_end_matches('/').to_string(),
            ollama_url: ollama_url.trim_end_matches('/').to_string(),
            embed_model: embed_model.to_string(),
            collection: collection.to_string(),
            chunk_words,
            client,
            collection_ready: OnceCell::new(),
        }
    }

    /// Deterministic Qdrant point id for one chunk of one meeting.
    pub fn point_id(meeting_id: &str, chunk_index: usize) -> Uuid {
        let composite = format!("{}_chunk_{}", meeting_id, chunk_index);
        Uuid::new_v5(&Uuid::NAMESPACE_OID, composite.as_bytes())
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, BridgeError> {
        let url = format!("{}/api/embeddings", self.ollama_url);
        let res = self
            .client
            .post(&url)
            .json(&json!({ "model": self.embed_model, "prompt": text }))
            .send()
            .await?;
        let res = check_status(res).await?;
        let parsed: EmbeddingResponse = res
            .json()
            .await
            .map_err(|e| BridgeError::Malformed(format!("embedding response: {}", e)))?;
        if parsed.embedding.is_empty() {
            return Err(BridgeError::Malformed("empty embedding".to_string()));
        }
        Ok(parsed.embedding)
    }

    /// Create the collection if it does not exist yet. Idempotent; runs once
    /// per process, keyed off the first vector we see.
    async fn ensure_collection(&self, vector_size: usize) -> Result<(), BridgeError> {
        self.collection_ready
            .get_or_try_init(|| async {
                let url = format!("{}/collections/{}", self.qdrant_url, self.collection);
                let exists = self.client.get(&url).send().await?;
                if exists.status().is_success() {
                    return Ok(());
                }
                info!("index: creating collection {} (dim {})", self.collection, vector_size);
                let res = self
                    .client
                    .put(&url)
                    .json(&json!({
                        "vectors": { "size": vector_size, "distance": "Cosine" }
                    }))
                    .send()
                    .await?;
                check_status(res).await.map(|_| ())
            })
            .await
            .map(|_| ())
    }

    async fn upsert_points(&self, points: Vec<serde_json::Value>) -> Result<(), BridgeError> {
        let url = format!(
            "{}/collections/{}/points?wait=true",
            self.qdrant_url, self.collection
        );
        let res = self
            .client
            .put(&url)
            .json(&json!({ "points": points }))
            .send()
            .await?;
        check_status(res).await.map(|_| ())
    }
}

#[async_trait]
impl EmbeddingIndex for QdrantIndex {
    async fn add_meeting(
        &self,
        meeting_id: &str,
        transcript: &str,
        metadata: ChunkMetadata,
    ) -> Result<(), BridgeError> {
        let chunks = chunk_transcript(transcript, self.chunk_words);
        if chunks.is_empty() {
            debug!("index: nothing to index for meeting {}", meeting_id);
            return Ok(());
        }

        let mut points = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            let vector = self.embed(chunk).await?;
            self.ensure_collection(vector.len()).await?;
            points.push(json!({
                "id": Self::point_id(meeting_id, i).to_string(),
                "vector": vector,
                "payload": {
                    "key": format!("{}_chunk_{}", meeting_id, i),
                    "meeting_id": meeting_id,
                    "chunk_index": i,
                    "content": chunk,
                    "filename": metadata.filename,
                    "participants": metadata.participants,
                    "key_topics": metadata.key_topics,
                }
            }));
        }

        self.upsert_points(points).await?;
        info!("index: meeting {} indexed ({} chunks)", meeting_id, chunks.len());
        Ok(())
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, BridgeError> {
        let vector = self.embed(query).await?;
        self.ensure_collection(vector.len()).await?;

        let url = format!(
            "{}/collections/{}/points/search",
            self.qdrant_url, self.collection
        );
        let res = self
            .client
            .post(&url)
            .json(&json!({
                "vector": vector,
                "limit": limit,
                "with_payload": true
            }))
            .send()
            .await?;
        let res = check_status(res).await?;
        let parsed: SearchResponse = res
            .json()
            .await
            .map_err(|e| BridgeError::Malformed(format!("search response: {}", e)))?;

        let hits = parsed
            .result
            .into_iter()
            .filter_map(|p| {
                let meeting_id = p.payload.get("meeting_id")?.as_str()?.to_string();
                let content = p.payload.get("content")?.as_str()?.to_string();
                let chunk_index = p
                    .payload
                    .get("chunk_index")
                    .and_then(|v| v.as_u64())
                    .unwrap_or(0) as usize;
                Some(SearchHit {
                    meeting_id,
                    content,
                    chunk_index,
                    score: p.score,
                })
            })
            .collect();
        Ok(hits)
    }
}

async fn check_status(res: reqwest::Response) -> Result<reqwest::Response, BridgeError> {
    if res.status().is_success() {
        Ok(res)
    } else {
        let status = res.status().as_u16();
        let body = res.text().await.unwrap_or_default();
        Err(BridgeError::Backend { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_ids_are_deterministic_and_distinct() {
        let a = QdrantIndex::point_id("m1", 0);
        assert_eq!(a, QdrantIndex::point_id("m1", 0));
        assert_ne!(a, QdrantIndex::point_id("m1", 1));
        assert_ne!(a, QdrantIndex::point_id("m2", 0));
    }
}
