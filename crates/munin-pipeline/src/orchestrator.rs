//! The pipeline orchestrator: one meeting, strict stage order, two terminal
//! states.
//!
//! `Queued -> Normalizing -> Transcribing -> Extracting -> Indexing ->
//! Committed`, with `Failed` reachable from any non-terminal stage.
//! Normalization is skipped for audio uploads. The four insight extractions
//! fan out concurrently and all settle before indexing. Insight and the
//! transcript are committed to the record only after indexing succeeds
//! (index-then-persist), so a meeting that fails at indexing keeps an empty
//! record. No retries, no cancellation, no cross-meeting ordering.

use crate::error::PipelineError;
use crate::normalize::{extension_of, MediaNormalizer};
use munin_core::insight::InsightExtractor;
use munin_core::traits::{ChunkMetadata, EmbeddingIndex, SpeechTranscriber, TextGenerator};
use munin_store::MeetingStorage;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// Processing stages of one meeting. `Committed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Queued,
    Normalizing,
    Transcribing,
    Extracting,
    Indexing,
    Committed,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Queued => "queued",
            Stage::Normalizing => "normalizing",
            Stage::Transcribing => "transcribing",
            Stage::Extracting => "extracting",
            Stage::Indexing => "indexing",
            Stage::Committed => "committed",
            Stage::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Coordinates the black-box services, the store, and the filesystem for one
/// meeting at a time. All collaborators are injected; no ambient singletons.
pub struct Orchestrator {
    transcriber: Arc<dyn SpeechTranscriber>,
    insight: InsightExtractor,
    index: Arc<dyn EmbeddingIndex>,
    storage: Arc<MeetingStorage>,
    normalizer: MediaNormalizer,
    processed_dir: PathBuf,
}

impl Orchestrator {
    pub fn new(
        transcriber: Arc<dyn SpeechTranscriber>,
        generator: Arc<dyn TextGenerator>,
        index: Arc<dyn EmbeddingIndex>,
        storage: Arc<MeetingStorage>,
        normalizer: MediaNormalizer,
        processed_dir: PathBuf,
    ) -> Self {
        Self {
            transcriber,
            insight: InsightExtractor::new(generator),
            index,
            storage,
            normalizer,
            processed_dir,
        }
    }

    /// Run one meeting to a terminal state. Errors are recorded as `Failed`
    /// on the meeting row and never returned; the uploader already received
    /// its acceptance response.
    pub async fn process(&self, meeting_id: &str, upload_path: &Path) {
        info!("pipeline: meeting {} starting from {}", meeting_id, Stage::Queued);
        match self.run_pipeline(meeting_id, upload_path).await {
            Ok(()) => {
                info!("pipeline: meeting {} reached {}", meeting_id, Stage::Committed);
            }
            Err(e) => {
                error!("pipeline: meeting {} reached {}: {}", meeting_id, Stage::Failed, e);
                if let Err(e) = self.storage.mark_failed(meeting_id) {
                    error!("pipeline: meeting {} failed-state write failed: {}", meeting_id, e);
                }
            }
        }
    }

    async fn run_pipeline(
        &self,
        meeting_id: &str,
        upload_path: &Path,
    ) -> Result<(), PipelineError> {
        let mut meeting = self
            .storage
            .get_meeting(meeting_id)?
            .ok_or_else(|| PipelineError::MissingMeeting(meeting_id.to_string()))?;

        // Normalizing: only video containers go through the extractor; audio
        // uploads are transcribed in place.
        let ext = extension_of(Path::new(&meeting.filename));
        let mut temp_audio: Option<PathBuf> = None;
        let audio_path = if munin_core::config::is_video_extension(&ext) {
            info!("pipeline: meeting {} {}", meeting_id, Stage::Normalizing);
            let target = self.processed_dir.join(format!("{}.wav", meeting_id));
            let out = self.normalizer.normalize(upload_path, &target).await?;
            if out != upload_path {
                temp_audio = Some(out.clone());
            }
            out
        } else {
            upload_path.to_path_buf()
        };

        info!("pipeline: meeting {} {}", meeting_id, Stage::Transcribing);
        let transcript = self
            .transcriber
            .transcribe(&audio_path)
            .await
            .map_err(PipelineError::Transcription)?;
        let transcript = transcript.trim().to_string();
        if transcript.is_empty() {
            return Err(PipelineError::EmptyTranscript);
        }
        info!(
            "pipeline: meeting {} transcript ready ({} chars)",
            meeting_id,
            transcript.len()
        );

        // Extracting: four independent calls, fan-out/fan-in. Each degrades
        // to empty on its own; none can fail the stage.
        info!("pipeline: meeting {} {}", meeting_id, Stage::Extracting);
        let (action_items, decisions, participants, key_topics) = tokio::join!(
            self.insight.extract_action_items(&transcript),
            self.insight.extract_decisions(&transcript),
            self.insight.identify_participants(&transcript),
            self.insight.extract_key_topics(&transcript),
        );

        // Indexing before persisting: a meeting that fails here keeps an
        // empty record, and stray index entries are dropped at query time.
        info!("pipeline: meeting {} {}", meeting_id, Stage::Indexing);
        self.index
            .add_meeting(
                meeting_id,
                &transcript,
                ChunkMetadata {
                    filename: meeting.filename.clone(),
                    participants: participants.clone(),
                    key_topics: key_topics.clone(),
                },
            )
            .await
            .map_err(PipelineError::Index)?;

        meeting.transcript = Some(transcript);
        meeting.participants = participants;
        meeting.action_items = action_items;
        meeting.decisions = decisions;
        meeting.key_topics = key_topics;
        meeting.processed = true;
        self.storage.commit_processed(&meeting)?;

        // Intermediate artifacts are only guaranteed to be removed on the
        // success path; failure-path cleanup is best-effort by design.
        if let Some(p) = temp_audio {
            let _ = tokio::fs::remove_file(&p).await;
        }
        Ok(())
    }
}
