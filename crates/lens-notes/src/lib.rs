mod json;
mod memory;

pub use json::JsonNoteStore;
pub use memory::MemoryNoteStore;

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use lens_types::{NewNote, Note};

/// Reading note persistence
#[async_trait::async_trait]
pub trait NoteStore: Send + Sync {
    /// Store a note, returning its generated id
    async fn insert(&self, note: NewNote) -> Result<i64>;

    /// Every note, newest first
    async fn list_all(&self) -> Result<Vec<Note>>;
}

/// Save an original/translated pair stamped with the current time
pub async fn save_translation(
    store: &dyn NoteStore,
    original: &str,
    translated: &str,
) -> Result<Note> {
    let note = NewNote {
        original_text: original.to_string(),
        translated_text: translated.to_string(),
        timestamp: now_millis(),
    };

    let id = store.insert(note.clone()).await?;
    Ok(note.with_id(id))
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

/// Timestamp descending; same-millisecond notes keep insertion recency
pub(crate) fn sort_newest_first(notes: &mut [Note]) {
    notes.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
}

pub(crate) fn next_id(notes: &[Note]) -> i64 {
    notes.iter().map(|n| n.id).max().unwrap_or(0) + 1
}
