//! Upload and meeting-browsing handlers.
//!
//! POST /upload-meeting validates synchronously, persists the queued record,
//! schedules orchestration, and returns immediately; processing state is only
//! observable by polling GET /meetings/{id}.

use crate::AppState;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use munin_core::config::{is_allowed_extension, ALLOWED_EXTENSIONS};
use munin_core::types::Meeting;
use serde_json::json;
use tracing::{info, warn};

/// Millisecond timestamp as RFC 3339, or null when out of range.
pub fn iso_timestamp(ms: i64) -> Option<String> {
    chrono::DateTime::from_timestamp_millis(ms).map(|dt| dt.to_rfc3339())
}

/// Lowercased ".ext" suffix of an upload filename, or empty string.
fn extension_of_filename(filename: &str) -> String {
    std::path::Path::new(filename)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_ascii_lowercase()))
        .unwrap_or_default()
}

/// POST /upload-meeting — multipart upload; accepts, queues, schedules.
pub async fn upload_meeting_post(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> (StatusCode, Json<serde_json::Value>) {
    // First "file" field wins; anything else in the form is ignored.
    let mut upload: Option<(String, axum::body::Bytes)> = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or_default().to_string();
            match field.bytes().await {
                Ok(bytes) => {
                    upload = Some((filename, bytes));
                    break;
                }
                Err(e) => {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(json!({ "error": format!("Upload read failed: {}", e) })),
                    );
                }
            }
        }
    }

    let Some((filename, bytes)) = upload else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No file provided" })),
        );
    };
    if filename.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No file provided" })),
        );
    }

    let ext = extension_of_filename(&filename);
    if !is_allowed_extension(&ext) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": format!(
                    "Unsupported file type. Allowed: {}",
                    ALLOWED_EXTENSIONS.join(", ")
                )
            })),
        );
    }

    // Id is assigned here and immutable from now on; the upload is stored
    // namespaced by it, so concurrent jobs never contend on filenames.
    let meeting_id = uuid::Uuid::new_v4().to_string();
    let path = state.config.upload_dir.join(format!("{}{}", meeting_id, ext));
    if let Err(e) = tokio::fs::write(&path, &bytes).await {
        warn!("upload: save failed for {}: {}", filename, e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("File upload failed: {}", e) })),
        );
    }

    if let Err(e) = state.storage.create_meeting(&meeting_id, &filename) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Record create failed: {}", e) })),
        );
    }

    info!("upload: accepted {} as meeting {}", filename, meeting_id);
    state.scheduler.schedule(meeting_id.clone(), path);

    (
        StatusCode::OK,
        Json(json!({
            "meeting_id": meeting_id,
            "message": "Upload successful. Processing started."
        })),
    )
}

/// GET /meetings — all meetings, newest first, with summary counts.
pub async fn meetings_list_get(
    State(state): State<AppState>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.storage.list_meetings() {
        Ok(meetings) => {
            let rows: Vec<serde_json::Value> = meetings.iter().map(summary_json).collect();
            (StatusCode::OK, Json(json!(rows)))
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Store: {}", e) })),
        ),
    }
}

/// GET /meetings/{id} — full detail including transcript; 404 if absent.
pub async fn meeting_detail_get(
    State(state): State<AppState>,
    Path(meeting_id): Path<String>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.storage.get_meeting(&meeting_id) {
        Ok(Some(m)) => (StatusCode::OK, Json(detail_json(&m))),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Meeting not found" })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Store: {}", e) })),
        ),
    }
}

fn summary_json(m: &Meeting) -> serde_json::Value {
    json!({
        "id": m.id,
        "filename": m.filename,
        "title": m.title,
        "duration_secs": m.duration_secs,
        "participants": m.participants,
        "processed": m.processed,
        "created_at": iso_timestamp(m.created_at_ms),
        "action_items_count": m.action_items.len(),
        "decisions_count": m.decisions.len(),
    })
}

fn detail_json(m: &Meeting) -> serde_json::Value {
    json!({
        "id": m.id,
        "filename": m.filename,
        "title": m.title,
        "duration_secs": m.duration_secs,
        "transcript": m.transcript,
        "participants": m.participants,
        "action_items": m.action_items,
        "decisions": m.decisions,
        "key_topics": m.key_topics,
        "processed": m.processed,
        "created_at": iso_timestamp(m.created_at_ms),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_extension_validation() {
        assert!(is_allowed_extension(&extension_of_filename("standup.MP4")));
        assert!(is_allowed_extension(&extension_of_filename("a/b/call.m4a")));
        assert!(!is_allowed_extension(&extension_of_filename("notes.txt")));
        assert!(!is_allowed_extension(&extension_of_filename("no_extension")));
        assert!(!is_allowed_extension(&extension_of_filename("")));
    }

    #[test]
    fn summary_counts_come_from_inline_cache() {
        let mut m = Meeting::queued("x".into(), "f.wav".into(), 0);
        m.action_items = vec![Default::default(), Default::default()];
        m.decisions = vec![Default::default()];
        let v = summary_json(&m);
        assert_eq!(v["action_items_count"], 2);
        assert_eq!(v["decisions_count"], 1);
        assert_eq!(v["processed"], false);
    }

    #[test]
    fn detail_reports_empty_derived_fields_for_queued_meeting() {
        let m = Meeting::queued("x".into(), "f.wav".into(), 0);
        let v = detail_json(&m);
        assert!(v["transcript"].is_null());
        assert_eq!(v["participants"], json!([]));
        assert_eq!(v["key_topics"], json!([]));
    }
}
