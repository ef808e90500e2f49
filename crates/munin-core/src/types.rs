//! Domain records for meetings and their derived insight.
//!
//! A `Meeting` is one submitted recording and its processing lifecycle. The
//! inline `action_items` list is a denormalized cache of whatever the
//! extractor produced; the queryable per-item rows live in `action_items`
//! table form as `ActionItemRow`.

use serde::{Deserialize, Serialize};

/// One submitted recording and its processing record.
///
/// `processed` is true iff the full pipeline committed. A meeting that failed
/// mid-pipeline keeps `processed = false` and all derived fields at their
/// last committed value (empty, unless a previous run committed them).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    /// Opaque unique id (UUIDv4), assigned at upload, immutable.
    pub id: String,
    /// Original upload filename.
    pub filename: String,
    pub title: Option<String>,
    /// Recording length in seconds, when known.
    pub duration_secs: Option<i64>,
    /// Full transcript; absent until transcription commits.
    pub transcript: Option<String>,
    pub participants: Vec<String>,
    /// Denormalized cache of the extracted action items.
    pub action_items: Vec<ActionItemDraft>,
    pub decisions: Vec<Decision>,
    pub key_topics: Vec<String>,
    pub processed: bool,
    pub created_at_ms: i64,
}

impl Meeting {
    /// Fresh queued record: derived fields empty, not yet processed.
    pub fn queued(id: String, filename: String, created_at_ms: i64) -> Self {
        Self {
            id,
            filename,
            title: None,
            duration_secs: None,
            transcript: None,
            participants: Vec::new(),
            action_items: Vec::new(),
            decisions: Vec::new(),
            key_topics: Vec::new(),
            processed: false,
            created_at_ms,
        }
    }
}

/// Action item as extracted from the model, before persistence.
///
/// Deserialization is deliberately lenient: any missing or null field falls
/// back to its default so one sloppy record does not sink the whole array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionItemDraft {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub priority: Priority,
}

/// Persisted action-item child record (`action_items` table).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionItemRow {
    pub id: String,
    pub meeting_id: String,
    pub description: String,
    pub assignee: Option<String>,
    pub due_date: Option<String>,
    pub priority: Priority,
    pub completed: bool,
    pub created_at_ms: i64,
}

/// A decision captured from the transcript, with optional context/impact.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Decision {
    #[serde(default)]
    pub decision: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub impact: Option<String>,
}

/// Action-item priority. Unknown strings from the model degrade to `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "PriorityWire")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Lenient parse: anything unrecognized is `Medium`.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Priority::High,
            "low" => Priority::Low,
            _ => Priority::Medium,
        }
    }
}

// Wire shape tolerating null / non-string / unknown priority values.
#[derive(Deserialize)]
#[serde(untagged)]
enum PriorityWire {
    Text(String),
    Other(serde_json::Value),
}

impl From<PriorityWire> for Priority {
    fn from(w: PriorityWire) -> Self {
        match w {
            PriorityWire::Text(s) => Priority::parse_lenient(&s),
            PriorityWire::Other(_) => Priority::Medium,
        }
    }
}

/// One semantic search match, traceable to its source meeting via payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub meeting_id: String,
    /// Chunk text that matched.
    pub content: String,
    pub chunk_index: usize,
    pub score: f32,
}
