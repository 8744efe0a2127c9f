use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::{NotesFilename, TreatmentDocument};

use super::AuthError;

/// Where a remote upload landed. Field names mirror the drive item the
/// document store returns.
#[derive(Debug, Clone)]
pub struct RemoteReceipt {
    pub folder: String,
    pub name: String,
    pub id: String,
    pub web_url: Option<String>,
    pub path: String,
}

#[async_trait]
pub trait RemoteNotesStore: Send + Sync {
    /// Authenticate, make sure the target folder exists, and upload the
    /// document under the given name.
    async fn upload(
        &self,
        filename: &NotesFilename,
        document: &TreatmentDocument,
    ) -> Result<RemoteReceipt, RemoteStoreError>;
}

#[async_trait]
pub trait LocalNotesStore: Send + Sync {
    /// Write the document to local storage, creating the output directory
    /// if it does not exist yet. Returns the path written.
    async fn write(
        &self,
        filename: &NotesFilename,
        document: &TreatmentDocument,
    ) -> Result<PathBuf, FallbackIoError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RemoteStoreError {
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),
    #[error("folder fetch failed: status {status}: {body}")]
    FolderFetch { status: u16, body: String },
    #[error("folder create failed: status {status}: {body}")]
    FolderCreate { status: u16, body: String },
    #[error("upload failed: status {status}: {body}")]
    Upload { status: u16, body: String },
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum FallbackIoError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store error: {0}")]
    Store(#[from] object_store::Error),
    #[error("serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}
