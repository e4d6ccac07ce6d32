/// Bridges saved cursor states to the persisted session snapshots.
use anyhow::Result;
use caret_config::{CursorSnapshot, PositionSnapshot, RangeSnapshot, SessionStore};

use crate::context::CursorContext;
use crate::cursor::Cursor;
use crate::position::{Position, Range};
use crate::state::SavedCursorState;

fn position_snapshot(position: Position) -> PositionSnapshot {
    PositionSnapshot {
        line: position.line,
        column: position.column,
    }
}

fn range_snapshot(range: Range) -> RangeSnapshot {
    RangeSnapshot {
        start: position_snapshot(range.start()),
        end: position_snapshot(range.end()),
    }
}

fn position_from(snapshot: PositionSnapshot) -> Position {
    Position::new(snapshot.line, snapshot.column)
}

fn range_from(snapshot: RangeSnapshot) -> Range {
    Range::from_positions(position_from(snapshot.start), position_from(snapshot.end))
}

pub fn to_snapshot(saved: &SavedCursorState) -> CursorSnapshot {
    CursorSnapshot {
        selection_start: range_snapshot(saved.selection_start),
        view_selection_start: range_snapshot(saved.view_selection_start),
        position: position_snapshot(saved.position),
        view_position: position_snapshot(saved.view_position),
        leftover_visible_columns: saved.leftover_visible_columns,
        selection_start_leftover_visible_columns: saved.selection_start_leftover_visible_columns,
    }
}

pub fn from_snapshot(snapshot: &CursorSnapshot) -> SavedCursorState {
    SavedCursorState {
        selection_start: range_from(snapshot.selection_start),
        view_selection_start: range_from(snapshot.view_selection_start),
        position: position_from(snapshot.position),
        view_position: position_from(snapshot.view_position),
        leftover_visible_columns: snapshot.leftover_visible_columns,
        selection_start_leftover_visible_columns: snapshot.selection_start_leftover_visible_columns,
    }
}

/// Saves the cursors of one document. The primary cursor goes first.
///
/// # Errors
///
/// Returns an error if the session database cannot be written.
pub fn save_cursors(store: &SessionStore, doc_key: &str, cursors: &[Cursor]) -> Result<()> {
    let snapshots: Vec<CursorSnapshot> = cursors
        .iter()
        .map(|cursor| to_snapshot(&cursor.save_state()))
        .collect();
    store.save_cursors(doc_key, &snapshots)
}

/// Restores the saved cursors of one document as new cursors.
///
/// Saved states are re-validated against the current text, so a document
/// that shrank since the save still yields valid cursors. Returns an empty
/// list when nothing was saved.
///
/// # Errors
///
/// Returns an error if the session database cannot be read or a cursor
/// cannot be restored. No cursor is left behind in that case.
pub fn restore_cursors(
    store: &SessionStore,
    doc_key: &str,
    ctx: &mut CursorContext<'_>,
) -> Result<Vec<Cursor>> {
    let Some(snapshots) = store.load_cursors(doc_key)? else {
        tracing::debug!("No saved cursors for '{doc_key}'");
        return Ok(Vec::new());
    };

    let cursors = build_cursors(ctx, &snapshots, |cursor, ctx, snapshot| {
        cursor.restore_state(ctx, &from_snapshot(snapshot))
    })?;
    tracing::info!("Restored {} cursor(s) for '{doc_key}'", cursors.len());
    Ok(cursors)
}

/// Creates one cursor per item. If `init` fails, every cursor created so
/// far is disposed before the error is returned.
fn build_cursors<T, F>(ctx: &mut CursorContext<'_>, items: &[T], mut init: F) -> Result<Vec<Cursor>>
where
    F: FnMut(&mut Cursor, &mut CursorContext<'_>, &T) -> Result<bool>,
{
    let mut cursors = Vec::with_capacity(items.len());
    for item in items {
        let mut cursor = Cursor::new(ctx);
        let result = init(&mut cursor, ctx, item);
        cursors.push(cursor);
        if let Err(err) = result {
            for cursor in cursors {
                if let Err(dispose_err) = cursor.dispose(ctx) {
                    tracing::warn!("Failed to dispose a partly restored cursor: {dispose_err:#}");
                }
            }
            return Err(err);
        }
    }
    Ok(cursors)
}
