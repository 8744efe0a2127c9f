use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::application::ports::{LocalNotesStore, RemoteNotesStore, TranscriptionEngine};
use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    health_handler, live_transcribe_handler, save_notes_handler,
};
use crate::presentation::state::AppState;

pub fn create_router<E, R, L>(state: AppState<E, R, L>) -> Router
where
    E: TranscriptionEngine + 'static,
    R: RemoteNotesStore + 'static,
    L: LocalNotesStore + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/live-transcribe", post(live_transcribe_handler::<E, R, L>))
        .route("/api/save-to-onedrive", post(save_notes_handler::<E, R, L>))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
