use std::fmt;

use chrono::{DateTime, Utc};

/// Timestamped document name, second precision. Two persists within the
/// same second produce the same name and the later write wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesFilename(String);

impl NotesFilename {
    pub fn for_timestamp(at: DateTime<Utc>) -> Self {
        Self(format!(
            "treatment-notes-{}.json",
            at.format("%Y%m%dT%H%M%SZ")
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotesFilename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
