//! Pipeline errors. Every variant terminates the owning meeting's
//! orchestration with a `Failed` state; none reach the uploader.

use munin_core::error::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("meeting {0} not found in store")]
    MissingMeeting(String),

    #[error("transcription failed: {0}")]
    Transcription(#[source] BridgeError),

    #[error("no transcript generated")]
    EmptyTranscript,

    #[error("indexing failed: {0}")]
    Index(#[source] BridgeError),

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
