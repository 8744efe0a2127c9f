use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::application::ports::{
    BearerToken, RemoteNotesStore, RemoteReceipt, RemoteStoreError, TokenProvider,
};
use crate::domain::{NotesFilename, TreatmentDocument};

const DEFAULT_GRAPH_BASE: &str = "https://graph.microsoft.com/v1.0";

/// Scopes the drive client needs from the token broker.
pub const GRAPH_SCOPES: &[&str] = &["Files.ReadWrite", "User.Read"];

/// Thin client over the Microsoft Graph drive API: get-or-create a folder
/// under the drive root and upload JSON documents into it.
pub struct GraphDriveClient<T>
where
    T: TokenProvider,
{
    client: reqwest::Client,
    base_url: String,
    folder: String,
    tokens: Arc<T>,
}

#[derive(Deserialize)]
struct DriveItem {
    name: Option<String>,
    id: Option<String>,
    #[serde(rename = "webUrl")]
    web_url: Option<String>,
}

impl<T> GraphDriveClient<T>
where
    T: TokenProvider,
{
    pub fn new(tokens: Arc<T>, folder: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_GRAPH_BASE, tokens, folder)
    }

    /// Base URL override so tests can point the client at an in-process
    /// Graph stub.
    pub fn with_base_url(
        base_url: &str,
        tokens: Arc<T>,
        folder: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            folder: folder.into(),
            tokens,
        }
    }

    /// Get-or-create the target folder. A create request for a folder that
    /// appeared meanwhile is resolved by the service's `rename` conflict
    /// behavior, never by overwriting.
    async fn ensure_folder(&self, token: &BearerToken) -> Result<(), RemoteStoreError> {
        let url = format!("{}/me/drive/root:/{}", self.base_url, self.folder);
        let response = self
            .client
            .get(&url)
            .bearer_auth(token.secret())
            .send()
            .await?;

        match response.status().as_u16() {
            200 => return Ok(()),
            404 => {}
            status => {
                let body = response.text().await.unwrap_or_default();
                return Err(RemoteStoreError::FolderFetch { status, body });
            }
        }

        tracing::debug!(folder = %self.folder, "Folder missing, creating it");

        let create_url = format!("{}/me/drive/root/children", self.base_url);
        let payload = json!({
            "name": self.folder,
            "folder": {},
            "@microsoft.graph.conflictBehavior": "rename",
        });
        let response = self
            .client
            .post(&create_url)
            .bearer_auth(token.secret())
            .json(&payload)
            .send()
            .await?;

        match response.status().as_u16() {
            200 | 201 => Ok(()),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(RemoteStoreError::FolderCreate { status, body })
            }
        }
    }

    async fn put_document(
        &self,
        token: &BearerToken,
        filename: &NotesFilename,
        body: &[u8],
    ) -> Result<reqwest::Response, RemoteStoreError> {
        let url = format!(
            "{}/me/drive/root:/{}/{}:/content",
            self.base_url, self.folder, filename
        );
        let response = self
            .client
            .put(&url)
            .bearer_auth(token.secret())
            .header("Content-Type", "application/json")
            .body(body.to_vec())
            .send()
            .await?;
        Ok(response)
    }

    fn receipt_from(&self, item: DriveItem, filename: &NotesFilename) -> RemoteReceipt {
        let name = item.name.unwrap_or_else(|| filename.to_string());
        RemoteReceipt {
            path: format!("/{}/{}", self.folder, name),
            folder: self.folder.clone(),
            id: item.id.unwrap_or_default(),
            web_url: item.web_url,
            name,
        }
    }
}

#[async_trait]
impl<T> RemoteNotesStore for GraphDriveClient<T>
where
    T: TokenProvider,
{
    async fn upload(
        &self,
        filename: &NotesFilename,
        document: &TreatmentDocument,
    ) -> Result<RemoteReceipt, RemoteStoreError> {
        let token = self.tokens.acquire(GRAPH_SCOPES).await?;
        self.ensure_folder(&token).await?;

        let body = serde_json::to_vec_pretty(document)?;
        let response = self.put_document(&token, filename, &body).await?;

        let response = match response.status().as_u16() {
            200 | 201 => response,
            // the folder can vanish between ensure and upload; self-heal
            // once, then surface whatever the retry returns
            404 => {
                tracing::debug!(folder = %self.folder, "Upload hit 404, re-ensuring folder and retrying once");
                self.ensure_folder(&token).await?;
                let retry = self.put_document(&token, filename, &body).await?;
                match retry.status().as_u16() {
                    200 | 201 => retry,
                    status => {
                        let body = retry.text().await.unwrap_or_default();
                        return Err(RemoteStoreError::Upload { status, body });
                    }
                }
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                return Err(RemoteStoreError::Upload { status, body });
            }
        };

        let item: DriveItem = response.json().await?;
        Ok(self.receipt_from(item, filename))
    }
}
