use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{TimeZone, Utc};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use chairside::application::ports::{
    AuthError, BearerToken, RemoteNotesStore, RemoteStoreError, TokenProvider,
};
use chairside::domain::{NotesFilename, TreatmentDocument};
use chairside::infrastructure::graph::GraphDriveClient;

struct StaticTokens;

#[async_trait]
impl TokenProvider for StaticTokens {
    async fn acquire(&self, _scopes: &[&str]) -> Result<BearerToken, AuthError> {
        Ok(BearerToken::new("test-token"))
    }
}

struct DeniedTokens;

#[async_trait]
impl TokenProvider for DeniedTokens {
    async fn acquire(&self, _scopes: &[&str]) -> Result<BearerToken, AuthError> {
        Err(AuthError::NoCachedAccount)
    }
}

#[derive(Default)]
struct GraphCalls {
    folder_fetches: AtomicUsize,
    folder_creates: AtomicUsize,
    uploads: AtomicUsize,
}

/// Scripted Graph stub. `fetch_codes` and `upload_codes` are consumed one
/// status per call; the last entry repeats once a script runs dry.
fn mock_graph_app(
    calls: Arc<GraphCalls>,
    fetch_codes: Vec<u16>,
    upload_codes: Vec<u16>,
) -> Router {
    let fetch_calls = Arc::clone(&calls);
    let create_calls = Arc::clone(&calls);
    let upload_calls = Arc::clone(&calls);

    Router::new()
        .route(
            "/me/drive/root:/notes",
            get(move || {
                let calls = Arc::clone(&fetch_calls);
                let codes = fetch_codes.clone();
                async move {
                    let n = calls.folder_fetches.fetch_add(1, Ordering::SeqCst);
                    let status = *codes.get(n).or(codes.last()).unwrap();
                    if status == 200 {
                        (StatusCode::OK, Json(json!({"name": "notes", "id": "folder-1"})))
                            .into_response()
                    } else {
                        (
                            StatusCode::from_u16(status).unwrap(),
                            Json(json!({"error": {"code": "itemNotFound"}})),
                        )
                            .into_response()
                    }
                }
            }),
        )
        .route(
            "/me/drive/root/children",
            post(move || {
                let calls = Arc::clone(&create_calls);
                async move {
                    calls.folder_creates.fetch_add(1, Ordering::SeqCst);
                    (StatusCode::CREATED, Json(json!({"name": "notes", "id": "folder-1"})))
                        .into_response()
                }
            }),
        )
        .route(
            "/me/drive/root:/notes/{file}/content",
            put(move || {
                let calls = Arc::clone(&upload_calls);
                let codes = upload_codes.clone();
                async move {
                    let n = calls.uploads.fetch_add(1, Ordering::SeqCst);
                    let status = *codes.get(n).or(codes.last()).unwrap();
                    if status == 200 || status == 201 {
                        (
                            StatusCode::from_u16(status).unwrap(),
                            Json(json!({
                                "name": "treatment-notes-test.json",
                                "id": "item-9",
                                "webUrl": "https://drive.example/item-9",
                            })),
                        )
                            .into_response()
                    } else {
                        (
                            StatusCode::from_u16(status).unwrap(),
                            Json(json!({"error": {"code": "itemNotFound"}})),
                        )
                            .into_response()
                    }
                }
            }),
        )
}

async fn start_mock_graph_server(app: Router) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, shutdown_tx)
}

fn test_filename() -> NotesFilename {
    NotesFilename::for_timestamp(Utc.with_ymd_and_hms(2026, 8, 7, 10, 0, 0).unwrap())
}

fn test_document() -> TreatmentDocument {
    TreatmentDocument::new("crown prep on 14", None).unwrap()
}

#[tokio::test]
async fn given_existing_folder_when_uploading_then_receipt_without_create() {
    let calls = Arc::new(GraphCalls::default());
    let app = mock_graph_app(Arc::clone(&calls), vec![200], vec![201]);
    let (base_url, shutdown_tx) = start_mock_graph_server(app).await;

    let client = GraphDriveClient::with_base_url(&base_url, Arc::new(StaticTokens), "notes");
    let receipt = client
        .upload(&test_filename(), &test_document())
        .await
        .unwrap();

    assert_eq!(receipt.folder, "notes");
    assert_eq!(receipt.name, "treatment-notes-test.json");
    assert_eq!(receipt.id, "item-9");
    assert_eq!(receipt.path, "/notes/treatment-notes-test.json");
    assert_eq!(calls.folder_creates.load(Ordering::SeqCst), 0);
    assert_eq!(calls.uploads.load(Ordering::SeqCst), 1);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_missing_folder_when_uploading_then_folder_is_created_first() {
    let calls = Arc::new(GraphCalls::default());
    let app = mock_graph_app(Arc::clone(&calls), vec![404, 200], vec![201]);
    let (base_url, shutdown_tx) = start_mock_graph_server(app).await;

    let client = GraphDriveClient::with_base_url(&base_url, Arc::new(StaticTokens), "notes");
    client
        .upload(&test_filename(), &test_document())
        .await
        .unwrap();

    assert_eq!(calls.folder_creates.load(Ordering::SeqCst), 1);
    assert_eq!(calls.uploads.load(Ordering::SeqCst), 1);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_upload_404_after_missing_folder_then_single_retry_succeeds() {
    // ensure sees 404 then 200; upload sees 404 then 201: the self-heal
    // path must run exactly once and succeed
    let calls = Arc::new(GraphCalls::default());
    let app = mock_graph_app(Arc::clone(&calls), vec![404, 200], vec![404, 201]);
    let (base_url, shutdown_tx) = start_mock_graph_server(app).await;

    let client = GraphDriveClient::with_base_url(&base_url, Arc::new(StaticTokens), "notes");
    let receipt = client
        .upload(&test_filename(), &test_document())
        .await
        .unwrap();

    assert_eq!(receipt.id, "item-9");
    assert_eq!(calls.folder_fetches.load(Ordering::SeqCst), 2);
    assert_eq!(calls.folder_creates.load(Ordering::SeqCst), 1);
    assert_eq!(calls.uploads.load(Ordering::SeqCst), 2);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_persistent_upload_404_then_error_after_exactly_one_retry() {
    let calls = Arc::new(GraphCalls::default());
    let app = mock_graph_app(Arc::clone(&calls), vec![200], vec![404, 404]);
    let (base_url, shutdown_tx) = start_mock_graph_server(app).await;

    let client = GraphDriveClient::with_base_url(&base_url, Arc::new(StaticTokens), "notes");
    let result = client.upload(&test_filename(), &test_document()).await;

    assert!(matches!(
        result,
        Err(RemoteStoreError::Upload { status: 404, .. })
    ));
    assert_eq!(calls.uploads.load(Ordering::SeqCst), 2);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_unexpected_folder_status_then_fetch_error_with_status() {
    let calls = Arc::new(GraphCalls::default());
    let app = mock_graph_app(Arc::clone(&calls), vec![500], vec![201]);
    let (base_url, shutdown_tx) = start_mock_graph_server(app).await;

    let client = GraphDriveClient::with_base_url(&base_url, Arc::new(StaticTokens), "notes");
    let result = client.upload(&test_filename(), &test_document()).await;

    assert!(matches!(
        result,
        Err(RemoteStoreError::FolderFetch { status: 500, .. })
    ));
    assert_eq!(calls.uploads.load(Ordering::SeqCst), 0);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_denied_token_when_uploading_then_auth_error_without_requests() {
    let calls = Arc::new(GraphCalls::default());
    let app = mock_graph_app(Arc::clone(&calls), vec![200], vec![201]);
    let (base_url, shutdown_tx) = start_mock_graph_server(app).await;

    let client = GraphDriveClient::with_base_url(&base_url, Arc::new(DeniedTokens), "notes");
    let result = client.upload(&test_filename(), &test_document()).await;

    assert!(matches!(result, Err(RemoteStoreError::Auth(_))));
    assert_eq!(calls.folder_fetches.load(Ordering::SeqCst), 0);
    assert_eq!(calls.uploads.load(Ordering::SeqCst), 0);
    shutdown_tx.send(()).ok();
}
