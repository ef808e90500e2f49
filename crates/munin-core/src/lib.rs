//! # Munin Core — shared contracts for the meeting intelligence pipeline
//!
//! Types, configuration, and the three capability traits the orchestrator is
//! built against: `SpeechTranscriber`, `TextGenerator`, `EmbeddingIndex`.
//! Production backends (whisper.cpp server, Ollama) live in `bridge`; the
//! insight extractor with its prompt contracts lives in `insight`.

pub mod bridge;
pub mod config;
pub mod error;
pub mod insight;
pub mod prompts;
pub mod traits;
pub mod types;

pub use bridge::{OllamaBridge, WhisperBridge};
pub use config::MuninConfig;
pub use error::BridgeError;
pub use insight::InsightExtractor;
pub use traits::{ChunkMetadata, EmbeddingIndex, SpeechTranscriber, TextGenerator};
pub use types::{ActionItemDraft, ActionItemRow, Decision, Meeting, Priority, SearchHit};
