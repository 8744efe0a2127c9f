use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::application::ports::{LocalNotesStore, RemoteNotesStore, TranscriptionEngine};
use crate::application::services::TranscribeChunkError;
use crate::domain::{AudioChunk, ChunkFormat};
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct TranscriptResponse {
    pub transcript: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state, multipart))]
pub async fn live_transcribe_handler<E, R, L>(
    State(state): State<AppState<E, R, L>>,
    mut multipart: Multipart,
) -> impl IntoResponse
where
    E: TranscriptionEngine + 'static,
    R: RemoteNotesStore + 'static,
    L: LocalNotesStore + 'static,
{
    let mut upload = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some("file") {
                    continue;
                }
                let format = ChunkFormat::from_mime(field.content_type().unwrap_or(""));
                match field.bytes().await {
                    Ok(data) => {
                        upload = Some(AudioChunk::new(data, format));
                        break;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to read chunk bytes");
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(ErrorResponse {
                                error: format!("Failed to read file: {}", e),
                            }),
                        )
                            .into_response();
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Failed to read multipart: {}", e),
                    }),
                )
                    .into_response();
            }
        }
    }

    let Some(chunk) = upload else {
        tracing::warn!("Transcribe request with no file part");
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "No file uploaded".to_string(),
            }),
        )
            .into_response();
    };

    tracing::debug!(bytes = chunk.len(), format = ?chunk.format, "Audio chunk received");

    match state.transcription.transcribe_chunk(&chunk).await {
        Ok(transcript) => {
            (StatusCode::OK, Json(TranscriptResponse { transcript })).into_response()
        }
        Err(TranscribeChunkError::Staging(e)) => {
            tracing::error!(error = %e, "Chunk staging failed");
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("staging failed: {}", e),
                }),
            )
                .into_response()
        }
        Err(TranscribeChunkError::Inference(e)) => {
            tracing::error!(error = %e, "Chunk transcription failed");
            // 200 on purpose: one bad chunk must not abort a live session
            (
                StatusCode::OK,
                Json(ErrorResponse {
                    error: format!("transcribe failed: {}", e),
                }),
            )
                .into_response()
        }
    }
}
