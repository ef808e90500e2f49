//! Munin configuration loaded from the environment (`.env` via the binary).
//!
//! Every knob has a code default so a bare checkout runs against local
//! backends (Ollama on 11434, whisper.cpp server on 8090, Qdrant on 6333).
//! Change behavior without code edits.

use std::path::PathBuf;

/// Upload extensions the gateway accepts (lowercase, with dot).
pub const ALLOWED_EXTENSIONS: &[&str] =
    &[".mp3", ".wav", ".mp4", ".avi", ".mov", ".m4a", ".flac"];

/// Container extensions that require audio extraction before transcription.
pub const VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".avi", ".mov"];

/// True if `ext` (".mp4" form, any case) is accepted for upload.
pub fn is_allowed_extension(ext: &str) -> bool {
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str())
}

/// True if `ext` (".mp4" form, any case) is a video container.
pub fn is_video_extension(ext: &str) -> bool {
    let ext = ext.to_ascii_lowercase();
    VIDEO_EXTENSIONS.contains(&ext.as_str())
}

/// Runtime configuration for the platform.
///
/// | Env | Default | Description |
/// |-----|---------|-------------|
/// | MUNIN_DB_PATH | ./data/munin.sqlite | Meetings + action items store. |
/// | MUNIN_UPLOAD_DIR | ./data/uploads | Raw uploads, namespaced by meeting id. |
/// | MUNIN_PROCESSED_DIR | ./data/processed | Normalized audio artifacts. |
/// | MUNIN_BIND_ADDR | 0.0.0.0:8000 | Gateway listen address. |
/// | OLLAMA_BASE_URL | http://localhost:11434 | Text-generation backend. |
/// | OLLAMA_MODEL | llama3.2 | Generation model for insight extraction. |
/// | OLLAMA_EMBED_MODEL | nomic-embed-text | Embedding model for indexing. |
/// | WHISPER_SERVER_URL | http://localhost:8090 | whisper.cpp server. |
/// | QDRANT_URL | http://localhost:6333 | Vector index backend. |
/// | MUNIN_COLLECTION | meetings | Qdrant collection name. |
/// | MUNIN_CHUNK_WORDS | 1000 | Chunk window in words (stride = half). |
/// | FFMPEG_BIN | ffmpeg | Audio extraction tool. |
#[derive(Debug, Clone)]
pub struct MuninConfig {
    pub db_path: PathBuf,
    pub upload_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub bind_addr: String,
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub ollama_embed_model: String,
    pub whisper_server_url: String,
    pub qdrant_url: String,
    pub collection: String,
    pub chunk_words: usize,
    pub ffmpeg_bin: String,
}

impl Default for MuninConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./data/munin.sqlite"),
            upload_dir: PathBuf::from("./data/uploads"),
            processed_dir: PathBuf::from("./data/processed"),
            bind_addr: "0.0.0.0:8000".to_string(),
            ollama_base_url: "http://localhost:11434".to_string(),
            ollama_model: "llama3.2".to_string(),
            ollama_embed_model: "nomic-embed-text".to_string(),
            whisper_server_url: "http://localhost:8090".to_string(),
            qdrant_url: "http://localhost:6333".to_string(),
            collection: "meetings".to_string(),
            chunk_words: 1000,
            ffmpeg_bin: "ffmpeg".to_string(),
        }
    }
}

impl MuninConfig {
    /// Load from environment. Unset or invalid values fall back to defaults.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            db_path: env_path("MUNIN_DB_PATH", d.db_path),
            upload_dir: env_path("MUNIN_UPLOAD_DIR", d.upload_dir),
            processed_dir: env_path("MUNIN_PROCESSED_DIR", d.processed_dir),
            bind_addr: env_string("MUNIN_BIND_ADDR", d.bind_addr),
            ollama_base_url: env_string("OLLAMA_BASE_URL", d.ollama_base_url),
            ollama_model: env_string("OLLAMA_MODEL", d.ollama_model),
            ollama_embed_model: env_string("OLLAMA_EMBED_MODEL", d.ollama_embed_model),
            whisper_server_url: env_string("WHISPER_SERVER_URL", d.whisper_server_url),
            qdrant_url: env_string("QDRANT_URL", d.qdrant_url),
            collection: env_string("MUNIN_COLLECTION", d.collection),
            chunk_words: env_usize("MUNIN_CHUNK_WORDS", d.chunk_words),
            ffmpeg_bin: env_string("FFMPEG_BIN", d.ffmpeg_bin),
        }
    }
}

fn env_string(key: &str, default: String) -> String {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => default,
    }
}

fn env_path(key: &str, default: PathBuf) -> PathBuf {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => default,
    }
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .filter(|&n| n > 1)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_sets() {
        assert!(is_allowed_extension(".mp3"));
        assert!(is_allowed_extension(".MP4"));
        assert!(!is_allowed_extension(".txt"));
        assert!(!is_allowed_extension(""));
        assert!(is_video_extension(".mov"));
        assert!(!is_video_extension(".wav"));
    }

    #[test]
    fn defaults_are_sane() {
        let c = MuninConfig::default();
        assert_eq!(c.chunk_words, 1000);
        assert_eq!(c.collection, "meetings");
    }
}
