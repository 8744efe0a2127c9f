use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A finished treatment note ready for persistence. Construction is the
/// validation gate: a document with an empty transcription cannot exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentDocument {
    pub transcription: String,
    #[serde(rename = "treatmentNotes")]
    pub treatment_notes: Option<serde_json::Value>,
    #[serde(rename = "generatedAt")]
    pub generated_at: String,
}

#[derive(Debug, thiserror::Error)]
#[error("transcription must not be empty")]
pub struct EmptyTranscription;

impl TreatmentDocument {
    pub fn new(
        transcription: &str,
        treatment_notes: Option<serde_json::Value>,
    ) -> Result<Self, EmptyTranscription> {
        let transcription = transcription.trim();
        if transcription.is_empty() {
            return Err(EmptyTranscription);
        }
        Ok(Self {
            transcription: transcription.to_string(),
            treatment_notes,
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        })
    }
}
