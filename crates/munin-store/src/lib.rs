//! # Munin Store — meetings and action items over SQLite
//!
//! Single source of truth for processing state. Opens a fresh connection per
//! call, so every orchestration attempt gets its own session independent of
//! the request that queued it.

pub mod storage;

pub use storage::MeetingStorage;
