//! Bridge-level errors shared by the model backends.

use thiserror::Error;

/// Failure talking to a black-box model backend (STT, LLM, or vector index).
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("malformed backend response: {0}")]
    Malformed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
