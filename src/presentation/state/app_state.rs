use std::sync::Arc;

use crate::application::ports::{LocalNotesStore, RemoteNotesStore, TranscriptionEngine};
use crate::application::services::{PersistenceService, TranscriptionService};

pub struct AppState<E, R, L>
where
    E: TranscriptionEngine,
    R: RemoteNotesStore,
    L: LocalNotesStore,
{
    pub transcription: Arc<TranscriptionService<E>>,
    pub persistence: Arc<PersistenceService<R, L>>,
}

impl<E, R, L> Clone for AppState<E, R, L>
where
    E: TranscriptionEngine,
    R: RemoteNotesStore,
    L: LocalNotesStore,
{
    fn clone(&self) -> Self {
        Self {
            transcription: Arc::clone(&self.transcription),
            persistence: Arc::clone(&self.persistence),
        }
    }
}
