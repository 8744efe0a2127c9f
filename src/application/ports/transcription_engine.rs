use std::path::Path;

use async_trait::async_trait;

/// Opaque speech-to-text function over a staged audio file. Implementations
/// are not required to be safe for concurrent invocation; serialization is
/// the caller's responsibility.
#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    async fn transcribe(&self, audio_path: &Path) -> Result<String, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("audio read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("audio decoding failed: {0}")]
    DecodingFailed(String),
    #[error("transcription failed: {0}")]
    TranscriptionFailed(String),
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
}
