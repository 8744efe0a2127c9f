mod persistence_service;
mod transcription_service;

pub use persistence_service::{PersistOutcome, PersistenceService};
pub use transcription_service::{TranscribeChunkError, TranscriptionService, MIN_CHUNK_BYTES};
