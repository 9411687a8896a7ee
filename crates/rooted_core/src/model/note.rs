//! Note collaborator contract.
//!
//! # Responsibility
//! - Define the read-only view of notes the reminder scheduler depends on.
//! - Ship an in-memory implementation for tests and single-note FFI calls.
//!
//! # Invariants
//! - Note storage itself lives outside this crate; core only ever reads
//!   summaries through [`NoteDirectory`].
//!
//! # See also
//! - docs/architecture/data-model.md

use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Opaque note identifier owned by the external note store.
pub type NoteId = String;

/// Minimal note view needed for reminder scheduling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSummary {
    /// Stable external note id.
    pub id: NoteId,
    /// Display title, used verbatim in notification titles.
    pub title: String,
    /// Note creation time in epoch milliseconds.
    pub created_at: i64,
}

/// Failure reported by a note directory lookup.
#[derive(Debug)]
pub enum NoteDirectoryError {
    /// The backing note store could not be consulted.
    Unavailable(String),
}

impl Display for NoteDirectoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(detail) => write!(f, "note directory unavailable: {detail}"),
        }
    }
}

impl Error for NoteDirectoryError {}

/// Read-only lookup into the external note store.
///
/// `Ok(None)` means the note does not exist; `Err` means the store itself
/// could not answer.
pub trait NoteDirectory: Send + Sync {
    fn note_summary(&self, note_id: &str) -> Result<Option<NoteSummary>, NoteDirectoryError>;
}

/// Fixed in-memory note directory.
///
/// Used by tests and by FFI entry points where the shell passes the one
/// note it is operating on.
#[derive(Debug, Default)]
pub struct StaticNoteDirectory {
    notes: HashMap<NoteId, NoteSummary>,
}

impl StaticNoteDirectory {
    /// Builds a directory over the given summaries.
    pub fn new(notes: impl IntoIterator<Item = NoteSummary>) -> Self {
        Self {
            notes: notes
                .into_iter()
                .map(|summary| (summary.id.clone(), summary))
                .collect(),
        }
    }
}

impl NoteDirectory for StaticNoteDirectory {
    fn note_summary(&self, note_id: &str) -> Result<Option<NoteSummary>, NoteDirectoryError> {
        Ok(self.notes.get(note_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::{NoteDirectory, NoteSummary, StaticNoteDirectory};

    #[test]
    fn static_directory_returns_known_notes_only() {
        let directory = StaticNoteDirectory::new([NoteSummary {
            id: "note-1".to_string(),
            title: "Morning study".to_string(),
            created_at: 1_700_000_000_000,
        }]);

        let found = directory
            .note_summary("note-1")
            .expect("lookup succeeds")
            .expect("note exists");
        assert_eq!(found.title, "Morning study");

        assert!(directory
            .note_summary("missing")
            .expect("lookup succeeds")
            .is_none());
    }
}
