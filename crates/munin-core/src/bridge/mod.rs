//! Production bridges to the black-box model services.

pub mod ollama;
pub mod whisper;

pub use ollama::OllamaBridge;
pub use whisper::WhisperBridge;
