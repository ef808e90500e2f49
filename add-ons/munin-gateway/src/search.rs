//! Semantic search handler: query the index, re-hydrate hits against the
//! meeting store, drop hits whose meeting vanished. A backend failure is
//! reported in-band as `{error, results: []}` with a 200, never as an HTTP
//! error.

use crate::meetings::iso_timestamp;
use crate::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use tracing::warn;

const SEARCH_LIMIT: usize = 5;
const SNIPPET_CHARS: usize = 200;

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// GET /search?q= — ranked matches with meeting context.
pub async fn search_get(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> (StatusCode, Json<serde_json::Value>) {
    let hits = match state.index.search(&params.q, SEARCH_LIMIT).await {
        Ok(hits) => hits,
        Err(e) => {
            warn!("search: backend failed: {}", e);
            return (
                StatusCode::OK,
                Json(json!({ "error": format!("Search failed: {}", e), "results": [] })),
            );
        }
    };

    let mut ids: Vec<String> = hits.iter().map(|h| h.meeting_id.clone()).collect();
    ids.sort();
    ids.dedup();
    let meetings = match state.storage.meetings_by_ids(&ids) {
        Ok(ms) => ms,
        Err(e) => {
            return (
                StatusCode::OK,
                Json(json!({ "error": format!("Search failed: {}", e), "results": [] })),
            );
        }
    };
    let by_id: HashMap<&str, _> = meetings.iter().map(|m| (m.id.as_str(), m)).collect();

    // Index entries may outlive their meeting (or precede its commit); those
    // hits are silently dropped here rather than surfaced half-hydrated.
    let results: Vec<serde_json::Value> = hits
        .iter()
        .filter_map(|h| {
            let m = by_id.get(h.meeting_id.as_str())?;
            Some(json!({
                "meeting_id": h.meeting_id,
                "content_snippet": snippet(&h.content),
                "score": h.score,
                "meeting_title": m.title,
                "meeting_filename": m.filename,
                "created_at": iso_timestamp(m.created_at_ms),
            }))
        })
        .collect();

    (StatusCode::OK, Json(json!(results)))
}

/// First `SNIPPET_CHARS` characters with an ellipsis when truncated.
fn snippet(content: &str) -> String {
    if content.chars().count() <= SNIPPET_CHARS {
        content.to_string()
    } else {
        let cut: String = content.chars().take(SNIPPET_CHARS).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use munin_core::error::BridgeError;
    use munin_core::traits::{ChunkMetadata, EmbeddingIndex};
    use munin_core::types::SearchHit;
    use munin_core::MuninConfig;
    use munin_pipeline::Scheduler;
    use munin_store::MeetingStorage;
    use std::path::PathBuf;
    use std::sync::Arc;

    struct MockIndex {
        hits: Result<Vec<SearchHit>, ()>,
    }

    #[async_trait]
    impl EmbeddingIndex for MockIndex {
        async fn add_meeting(
            &self,
            _meeting_id: &str,
            _transcript: &str,
            _metadata: ChunkMetadata,
        ) -> Result<(), BridgeError> {
            Ok(())
        }

        async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<SearchHit>, BridgeError> {
            match &self.hits {
                Ok(hits) => Ok(hits.clone()),
                Err(()) => Err(BridgeError::ModelUnavailable("index down".into())),
            }
        }
    }

    struct NoopScheduler;

    impl Scheduler for NoopScheduler {
        fn schedule(&self, _meeting_id: String, _upload_path: PathBuf) {}
    }

    fn state_with(dir: &tempfile::TempDir, hits: Result<Vec<SearchHit>, ()>) -> AppState {
        AppState {
            config: MuninConfig::default(),
            storage: Arc::new(MeetingStorage::new(dir.path().join("munin.sqlite")).unwrap()),
            index: Arc::new(MockIndex { hits }),
            scheduler: Arc::new(NoopScheduler),
        }
    }

    fn hit(meeting_id: &str, content: &str) -> SearchHit {
        SearchHit {
            meeting_id: meeting_id.to_string(),
            content: content.to_string(),
            chunk_index: 0,
            score: 0.9,
        }
    }

    async fn run_search(state: AppState, q: &str) -> (StatusCode, serde_json::Value) {
        let (status, Json(body)) =
            search_get(State(state), Query(SearchParams { q: q.to_string() })).await;
        (status, body)
    }

    #[test]
    fn short_content_is_not_truncated() {
        assert_eq!(snippet("brief"), "brief");
    }

    #[test]
    fn long_content_gets_ellipsis_on_char_boundary() {
        let long = "ä".repeat(300);
        let s = snippet(&long);
        assert!(s.ends_with("..."));
        assert_eq!(s.chars().count(), SNIPPET_CHARS + 3);
    }

    #[tokio::test]
    async fn no_matches_is_an_empty_list_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(&dir, Ok(Vec::new()));
        let (status, body) = run_search(state, "quarterly budget").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn backend_failure_is_reported_in_band() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(&dir, Err(()));
        let (status, body) = run_search(state, "anything").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["error"].as_str().unwrap().contains("Search failed"));
        assert_eq!(body["results"], json!([]));
    }

    #[tokio::test]
    async fn hits_for_vanished_meetings_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(
            &dir,
            Ok(vec![hit("alive", "budget talk"), hit("gone", "ghost chunk")]),
        );
        state.storage.create_meeting("alive", "q3.wav").unwrap();

        let (status, body) = run_search(state, "budget").await;
        assert_eq!(status, StatusCode::OK);
        let results = body.as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["meeting_id"], "alive");
        assert_eq!(results[0]["content_snippet"], "budget talk");
        assert_eq!(results[0]["meeting_filename"], "q3.wav");
    }
}
