use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::application::ports::{LocalNotesStore, RemoteNotesStore, TranscriptionEngine};
use crate::application::services::PersistOutcome;
use crate::domain::TreatmentDocument;
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct SaveNotesRequest {
    #[serde(default)]
    pub transcription: Option<String>,
    #[serde(rename = "treatmentNotes", default)]
    pub treatment_notes: Option<serde_json::Value>,
}

#[derive(Serialize)]
pub struct RemoteSaveResponse {
    pub ok: bool,
    pub provider: &'static str,
    pub folder: String,
    pub name: String,
    pub id: String,
    #[serde(rename = "webUrl")]
    pub web_url: Option<String>,
    pub path: String,
}

#[derive(Serialize)]
pub struct LocalSaveResponse {
    pub ok: bool,
    pub provider: &'static str,
    pub filename: String,
    #[serde(rename = "where")]
    pub location: String,
    pub note: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state, request))]
pub async fn save_notes_handler<E, R, L>(
    State(state): State<AppState<E, R, L>>,
    Json(request): Json<SaveNotesRequest>,
) -> impl IntoResponse
where
    E: TranscriptionEngine + 'static,
    R: RemoteNotesStore + 'static,
    L: LocalNotesStore + 'static,
{
    let transcription = request.transcription.unwrap_or_default();

    let document = match TreatmentDocument::new(&transcription, request.treatment_notes) {
        Ok(d) => d,
        Err(_) => {
            tracing::warn!("Save request without transcription");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Missing 'transcription'".to_string(),
                }),
            )
                .into_response();
        }
    };

    match state.persistence.persist(&document).await {
        Ok(PersistOutcome::Remote(receipt)) => (
            StatusCode::OK,
            Json(RemoteSaveResponse {
                ok: true,
                provider: "onedrive",
                folder: receipt.folder,
                name: receipt.name,
                id: receipt.id,
                web_url: receipt.web_url,
                path: receipt.path,
            }),
        )
            .into_response(),
        Ok(PersistOutcome::Local {
            filename,
            directory,
            note,
        }) => (
            StatusCode::OK,
            Json(LocalSaveResponse {
                ok: true,
                provider: "local",
                filename,
                location: format!("{}/", directory.display()),
                note,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Local fallback write failed, persistence exhausted");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("persistence failed: {}", e),
                }),
            )
                .into_response()
        }
    }
}
