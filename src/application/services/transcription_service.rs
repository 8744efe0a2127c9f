use std::io::Write;

use tempfile::NamedTempFile;
use tokio::sync::Mutex;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::domain::AudioChunk;

/// Chunks staged below this size are treated as silence and never invoked
/// against the model. Calibrated to be shorter than any real spoken
/// utterance the recorder produces.
pub const MIN_CHUNK_BYTES: u64 = 6000;

/// Stages uploaded chunks and runs them through the single shared
/// speech-to-text engine. The engine is not safe for concurrent invocation,
/// so the service owns it together with an explicit gate: at most one
/// inference executes process-wide at any instant. The gate is held only
/// around the model call, never around staging or cleanup.
pub struct TranscriptionService<E>
where
    E: TranscriptionEngine,
{
    engine: E,
    inference_gate: Mutex<()>,
    min_chunk_bytes: u64,
}

impl<E> TranscriptionService<E>
where
    E: TranscriptionEngine,
{
    pub fn new(engine: E) -> Self {
        Self::with_min_chunk_bytes(engine, MIN_CHUNK_BYTES)
    }

    pub fn with_min_chunk_bytes(engine: E, min_chunk_bytes: u64) -> Self {
        Self {
            engine,
            inference_gate: Mutex::new(()),
            min_chunk_bytes,
        }
    }

    /// Stage the chunk to a temporary file, run inference, and return the
    /// trimmed transcript. An empty string is a valid result (silence).
    /// The staged file is removed on every exit path by the guard's drop.
    pub async fn transcribe_chunk(&self, chunk: &AudioChunk) -> Result<String, TranscribeChunkError> {
        let staged = stage_chunk(chunk).map_err(TranscribeChunkError::Staging)?;

        let staged_bytes = staged
            .as_file()
            .metadata()
            .map_err(TranscribeChunkError::Staging)?
            .len();

        tracing::debug!(
            bytes = staged_bytes,
            format = ?chunk.format,
            "Audio chunk staged"
        );

        if staged_bytes < self.min_chunk_bytes {
            tracing::debug!(
                bytes = staged_bytes,
                min_bytes = self.min_chunk_bytes,
                "Chunk below minimum viable size, returning empty transcript"
            );
            return Ok(String::new());
        }

        let text = {
            let _gate = self.inference_gate.lock().await;
            self.engine.transcribe(staged.path()).await?
        };

        let text = text.trim().to_string();
        tracing::info!(chars = text.len(), "Chunk transcription completed");

        Ok(text)
    }
}

fn stage_chunk(chunk: &AudioChunk) -> std::io::Result<NamedTempFile> {
    let mut staged = tempfile::Builder::new()
        .prefix("chunk-")
        .suffix(chunk.format.suffix())
        .tempfile()?;
    staged.write_all(&chunk.data)?;
    staged.as_file().sync_all()?;
    Ok(staged)
}

#[derive(Debug, thiserror::Error)]
pub enum TranscribeChunkError {
    #[error("staging failed: {0}")]
    Staging(#[source] std::io::Error),
    #[error(transparent)]
    Inference(#[from] TranscriptionError),
}
