//! # Munin Pipeline — upload to committed record
//!
//! Drives one meeting's artifact through normalization → transcription →
//! insight extraction → indexing → commit, with a two-terminal state model:
//! `Committed` on full success, `Failed` on any stage error. Failures are
//! recorded, never propagated to the uploader (who already got an acceptance
//! response).

pub mod error;
pub mod normalize;
pub mod orchestrator;
pub mod scheduler;

pub use error::PipelineError;
pub use normalize::MediaNormalizer;
pub use orchestrator::{Orchestrator, Stage};
pub use scheduler::{Scheduler, TokioScheduler};
