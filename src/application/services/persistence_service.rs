use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;

use crate::application::ports::{
    FallbackIoError, LocalNotesStore, RemoteNotesStore, RemoteReceipt,
};
use crate::domain::{NotesFilename, TreatmentDocument};

/// Persists a treatment document: the remote store end-to-end first, the
/// local fallback on any remote failure. The outward contract is that
/// persistence never fails visibly unless the fallback write itself fails.
pub struct PersistenceService<R, L>
where
    R: RemoteNotesStore,
    L: LocalNotesStore,
{
    remote: Arc<R>,
    fallback: Arc<L>,
}

/// Which provider served the request. Fallback selection is an explicit
/// decision on the remote attempt's result, visible to the caller.
#[derive(Debug)]
pub enum PersistOutcome {
    Remote(RemoteReceipt),
    Local {
        filename: String,
        directory: PathBuf,
        note: String,
    },
}

impl<R, L> PersistenceService<R, L>
where
    R: RemoteNotesStore,
    L: LocalNotesStore,
{
    pub fn new(remote: Arc<R>, fallback: Arc<L>) -> Self {
        Self { remote, fallback }
    }

    pub async fn persist(
        &self,
        document: &TreatmentDocument,
    ) -> Result<PersistOutcome, FallbackIoError> {
        let filename = NotesFilename::for_timestamp(Utc::now());

        match self.remote.upload(&filename, document).await {
            Ok(receipt) => {
                tracing::info!(
                    folder = %receipt.folder,
                    name = %receipt.name,
                    "Treatment notes uploaded to remote store"
                );
                Ok(PersistOutcome::Remote(receipt))
            }
            Err(reason) => {
                tracing::warn!(error = %reason, "Remote upload failed, falling back to local storage");
                let written = self.fallback.write(&filename, document).await?;
                let directory = written
                    .parent()
                    .map(PathBuf::from)
                    .unwrap_or_default();
                tracing::info!(path = %written.display(), "Treatment notes written to local fallback");
                Ok(PersistOutcome::Local {
                    filename: filename.to_string(),
                    directory,
                    note: format!("Graph upload failed: {}", reason),
                })
            }
        }
    }
}
