mod notes_store;
mod token_provider;
mod transcription_engine;

pub use notes_store::{
    FallbackIoError, LocalNotesStore, RemoteNotesStore, RemoteReceipt, RemoteStoreError,
};
pub use token_provider::{AuthError, BearerToken, TokenProvider};
pub use transcription_engine::{TranscriptionEngine, TranscriptionError};
