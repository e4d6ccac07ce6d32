/// Session persistence: saves/restores cursor states per document across restarts.
///
/// Each document key maps to a bincode-encoded list of `CursorSnapshot`s in a
/// redb table. The primary cursor is always the first entry.
use std::path::Path;

use anyhow::{Context, Result};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::{Deserialize, Serialize};

/// Cursor table: document key → bincode(`Vec<CursorSnapshot>`).
const SESSION_CURSORS: TableDefinition<&str, &[u8]> = TableDefinition::new("session_cursors");

/// A 1-based line/column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PositionSnapshot {
    pub line: usize,
    pub column: usize,
}

/// A start/end pair of positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RangeSnapshot {
    pub start: PositionSnapshot,
    pub end: PositionSnapshot,
}

/// Saved state of one cursor in both coordinate spaces.
///
/// Mirrors the core crate's saved cursor state but is independently
/// serializable without depending on the core crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CursorSnapshot {
    /// Anchor range in model space.
    pub selection_start: RangeSnapshot,
    /// Anchor range in view space.
    pub view_selection_start: RangeSnapshot,
    /// Active position in model space.
    pub position: PositionSnapshot,
    /// Active position in view space.
    pub view_position: PositionSnapshot,
    pub leftover_visible_columns: isize,
    pub selection_start_leftover_visible_columns: isize,
}

/// Persistence layer for cursor sessions, backed by redb.
pub struct SessionStore {
    db: Database,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish()
    }
}

impl SessionStore {
    /// Opens or creates the session database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create session directory: {}", parent.display())
                })?;
            }
        }
        let db = Database::create(path)
            .with_context(|| format!("Failed to open session database: {}", path.display()))?;

        // Ensure the table exists
        let write_txn = db
            .begin_write()
            .context("Failed to begin initial session write transaction")?;
        {
            let _ = write_txn
                .open_table(SESSION_CURSORS)
                .context("Failed to create session_cursors table")?;
        }
        write_txn
            .commit()
            .context("Failed to commit initial session transaction")?;

        Ok(Self { db })
    }

    /// Saves the cursors of one document, replacing any previous entry.
    pub fn save_cursors(&self, doc_key: &str, cursors: &[CursorSnapshot]) -> Result<()> {
        let bytes = bincode::serialize(cursors).context("Failed to serialize cursor snapshots")?;

        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;
        {
            let mut table = write_txn
                .open_table(SESSION_CURSORS)
                .context("Failed to open session_cursors table")?;
            table
                .insert(doc_key, bytes.as_slice())
                .context("Failed to insert cursor snapshots")?;
        }
        write_txn
            .commit()
            .context("Failed to commit cursor snapshots")?;
        tracing::debug!("Saved {} cursor(s) for '{doc_key}'", cursors.len());
        Ok(())
    }

    /// Loads the cursors of one document, or `None` if nothing was saved.
    pub fn load_cursors(&self, doc_key: &str) -> Result<Option<Vec<CursorSnapshot>>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;
        let table = read_txn
            .open_table(SESSION_CURSORS)
            .context("Failed to open session_cursors table")?;

        match table
            .get(doc_key)
            .context("Failed to read cursor snapshots")?
        {
            Some(guard) => {
                let cursors: Vec<CursorSnapshot> = bincode::deserialize(guard.value())
                    .context("Failed to deserialize cursor snapshots")?;
                Ok(Some(cursors))
            }
            None => Ok(None),
        }
    }

    /// Deletes the saved cursors of one document.
    pub fn delete_cursors(&self, doc_key: &str) -> Result<()> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;
        {
            let mut table = write_txn
                .open_table(SESSION_CURSORS)
                .context("Failed to open session_cursors table")?;
            let _ = table.remove(doc_key);
        }
        write_txn
            .commit()
            .context("Failed to commit cursor deletion")?;
        Ok(())
    }

    /// Returns the keys of all documents with saved cursors.
    pub fn document_keys(&self) -> Result<Vec<String>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;
        let table = read_txn
            .open_table(SESSION_CURSORS)
            .context("Failed to open session_cursors table")?;

        let keys = table
            .iter()
            .context("Failed to iterate session_cursors")?
            .filter_map(|entry| entry.ok().map(|(k, _)| k.value().to_string()))
            .collect();
        Ok(keys)
    }
}
