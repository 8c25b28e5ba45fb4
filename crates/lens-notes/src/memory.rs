use anyhow::Result;
use async_trait::async_trait;
use lens_types::{NewNote, Note};
use tokio::sync::RwLock;

use crate::{NoteStore, next_id, sort_newest_first};

/// Volatile store, for tests and runs without a notes file
#[derive(Default)]
pub struct MemoryNoteStore {
    notes: RwLock<Vec<Note>>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn insert(&self, note: NewNote) -> Result<i64> {
        let mut notes = self.notes.write().await;
        let id = next_id(&notes);
        notes.push(note.with_id(id));
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<Note>> {
        let mut notes = self.notes.read().await.clone();
        sort_newest_first(&mut notes);
        Ok(notes)
    }
}
