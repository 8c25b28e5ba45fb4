use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use lens_types::{NewNote, Note};
use tokio::sync::Mutex;

use crate::{NoteStore, next_id, sort_newest_first};

/// Notes kept in a single JSON file, rewritten on every insert
pub struct JsonNoteStore {
    path: PathBuf,
    notes: Mutex<Vec<Note>>,
}

impl JsonNoteStore {
    /// Open the store at `path`; a missing file is an empty store
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let notes = match tokio::fs::read_to_string(&path).await {
            Ok(data) if data.trim().is_empty() => Vec::new(),
            Ok(data) => serde_json::from_str(&data)
                .with_context(|| format!("Failed to parse notes file {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No notes file at {}, starting empty", path.display());
                Vec::new()
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        tracing::info!("Loaded {} notes from {}", notes.len(), path.display());

        Ok(Self {
            path,
            notes: Mutex::new(notes),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, notes: &[Note]) -> Result<()> {
        let data = serde_json::to_vec_pretty(notes)?;

        // write then rename so a crash never leaves a half-written file
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, data)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        Ok(())
    }
}

#[async_trait]
impl NoteStore for JsonNoteStore {
    async fn insert(&self, note: NewNote) -> Result<i64> {
        let mut notes = self.notes.lock().await;
        let id = next_id(&notes);
        notes.push(note.with_id(id));

        if let Err(e) = self.persist(&notes).await {
            notes.pop();
            return Err(e);
        }

        tracing::debug!("Stored note {id}");
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<Note>> {
        let mut notes = self.notes.lock().await.clone();
        sort_newest_first(&mut notes);
        Ok(notes)
    }
}
