//! # Munin Index — semantic search over transcript chunks
//!
//! Splits a transcript into overlapping word windows and stores each chunk's
//! embedding in Qdrant, payload-keyed by `{meeting_id}_chunk_{index}` so a
//! hit re-hydrates to its source meeting without a second lookup. Embeddings
//! come from Ollama.

pub mod chunk;
pub mod qdrant;

pub use chunk::chunk_transcript;
pub use qdrant::QdrantIndex;
