use chrono::{TimeZone, Utc};
use serde_json::json;

use chairside::application::ports::LocalNotesStore;
use chairside::domain::{NotesFilename, TreatmentDocument};
use chairside::infrastructure::storage::LocalFallbackStore;

fn test_filename() -> NotesFilename {
    NotesFilename::for_timestamp(Utc.with_ymd_and_hms(2026, 8, 7, 9, 15, 0).unwrap())
}

#[tokio::test]
async fn given_missing_directory_when_writing_then_it_is_created_on_demand() {
    let dir = tempfile::TempDir::new().unwrap();
    let base = dir.path().join("nested").join("local_out");
    let store = LocalFallbackStore::new(base.clone());

    let document = TreatmentDocument::new("note", None).unwrap();
    let written = store.write(&test_filename(), &document).await.unwrap();

    assert!(base.is_dir());
    assert_eq!(written, base.join(test_filename().as_str()));
    assert!(written.is_file());
}

#[tokio::test]
async fn given_document_when_writing_then_indented_json_round_trips() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = LocalFallbackStore::new(dir.path().to_path_buf());

    let document =
        TreatmentDocument::new("extraction of 38", Some(json!({"anesthetic": "lidocaine"})))
            .unwrap();
    let written = store.write(&test_filename(), &document).await.unwrap();

    let raw = std::fs::read_to_string(written).unwrap();
    assert!(raw.contains('\n'), "document should be written indented");

    let parsed: TreatmentDocument = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed, document);
}

#[tokio::test]
async fn given_existing_file_when_writing_same_name_then_latest_write_wins() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = LocalFallbackStore::new(dir.path().to_path_buf());

    let first = TreatmentDocument::new("first note", None).unwrap();
    let second = TreatmentDocument::new("second note", None).unwrap();
    store.write(&test_filename(), &first).await.unwrap();
    let written = store.write(&test_filename(), &second).await.unwrap();

    let parsed: TreatmentDocument =
        serde_json::from_str(&std::fs::read_to_string(written).unwrap()).unwrap();
    assert_eq!(parsed.transcription, "second note");
}
