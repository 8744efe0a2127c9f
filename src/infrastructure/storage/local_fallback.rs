use std::path::PathBuf;

use object_store::local::LocalFileSystem;
use object_store::path::Path as StorePath;
use object_store::{ObjectStore, PutPayload};

use crate::application::ports::{FallbackIoError, LocalNotesStore};
use crate::domain::{NotesFilename, TreatmentDocument};

/// Filesystem store of last resort. Documents land as indented JSON under
/// the output directory, which is created on demand so a fresh deployment
/// can fall back without any setup.
pub struct LocalFallbackStore {
    base_dir: PathBuf,
}

impl LocalFallbackStore {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }
}

#[async_trait::async_trait]
impl LocalNotesStore for LocalFallbackStore {
    async fn write(
        &self,
        filename: &NotesFilename,
        document: &TreatmentDocument,
    ) -> Result<PathBuf, FallbackIoError> {
        std::fs::create_dir_all(&self.base_dir)?;
        let store = LocalFileSystem::new_with_prefix(&self.base_dir)?;

        let body = serde_json::to_vec_pretty(document)?;
        let store_path = StorePath::from(filename.as_str());
        store.put(&store_path, PutPayload::from(body)).await?;

        Ok(self.base_dir.join(filename.as_str()))
    }
}
