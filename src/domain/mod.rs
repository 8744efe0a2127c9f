mod audio_chunk;
mod notes_filename;
mod treatment_document;

pub use audio_chunk::{AudioChunk, ChunkFormat};
pub use notes_filename::NotesFilename;
pub use treatment_document::{EmptyTranscription, TreatmentDocument};
