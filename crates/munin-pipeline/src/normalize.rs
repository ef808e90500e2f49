//! Media normalization: arbitrary upload → mono 16kHz PCM WAV.
//!
//! Video containers go through ffmpeg. If the tool is missing or fails, the
//! raw bytes are copied to the target instead — downstream transcription may
//! degrade, but the pipeline keeps moving. That fallback is logged loudly,
//! never silent. Audio inputs pass through untouched.

use std::io;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{info, warn};

/// Extracts a canonical audio artifact from an uploaded media file.
pub struct MediaNormalizer {
    ffmpeg_bin: String,
}

impl MediaNormalizer {
    /// `ffmpeg_bin` is the conversion tool to invoke (usually just "ffmpeg").
    pub fn new(ffmpeg_bin: &str) -> Self {
        Self {
            ffmpeg_bin: ffmpeg_bin.to_string(),
        }
    }

    /// Produce an audio artifact for `input` at `target`, returning the path
    /// to transcribe. Audio inputs are returned unchanged with no copy; the
    /// original upload is never mutated.
    pub async fn normalize(&self, input: &Path, target: &Path) -> io::Result<PathBuf> {
        let ext = extension_of(input);
        if !munin_core::config::is_video_extension(&ext) {
            return Ok(input.to_path_buf());
        }

        match self.extract_audio(input, target).await {
            Ok(()) => {
                info!("normalize: extracted audio {} -> {}", input.display(), target.display());
                Ok(target.to_path_buf())
            }
            Err(e) => {
                warn!(
                    "normalize: {} failed ({}); falling back to raw copy of {}",
                    self.ffmpeg_bin,
                    e,
                    input.display()
                );
                tokio::fs::copy(input, target).await?;
                Ok(target.to_path_buf())
            }
        }
    }

    async fn extract_audio(&self, input: &Path, target: &Path) -> io::Result<()> {
        let status = Command::new(&self.ffmpeg_bin)
            .arg("-i")
            .arg(input)
            .args(["-vn", "-acodec", "pcm_s16le", "-ar", "16000", "-ac", "1"])
            .arg(target)
            .arg("-y")
            .status()
            .await?;
        if status.success() {
            Ok(())
        } else {
            Err(io::Error::other(format!("{} exited with {}", self.ffmpeg_bin, status)))
        }
    }
}

/// Lowercased extension with leading dot, or empty string.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_ascii_lowercase()))
        .unwrap_or_default()
}
