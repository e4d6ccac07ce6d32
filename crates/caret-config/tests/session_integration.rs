use caret_config::session::{CursorSnapshot, PositionSnapshot, RangeSnapshot, SessionStore};

fn snapshot(anchor: (usize, usize), position: (usize, usize)) -> CursorSnapshot {
    let anchor = PositionSnapshot {
        line: anchor.0,
        column: anchor.1,
    };
    let position = PositionSnapshot {
        line: position.0,
        column: position.1,
    };
    let range = RangeSnapshot {
        start: anchor,
        end: anchor,
    };
    CursorSnapshot {
        selection_start: range,
        view_selection_start: range,
        position,
        view_position: position,
        leftover_visible_columns: 0,
        selection_start_leftover_visible_columns: 0,
    }
}

#[test]
fn test_session_store_cursors_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("session.redb");

    let store = SessionStore::open(&db_path).unwrap();
    store
        .save_cursors("main.rs", &[snapshot((1, 1), (1, 5)), snapshot((3, 2), (3, 2))])
        .unwrap();
    drop(store);

    let store2 = SessionStore::open(&db_path).unwrap();
    let loaded = store2.load_cursors("main.rs").unwrap().unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].position, PositionSnapshot { line: 1, column: 5 });
    assert_eq!(loaded[1].selection_start.start, PositionSnapshot { line: 3, column: 2 });
}

#[test]
fn test_session_store_overwrite_cursors() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("session.redb");
    let store = SessionStore::open(&db_path).unwrap();

    store
        .save_cursors("doc", &[snapshot((1, 1), (1, 1)), snapshot((2, 1), (2, 1))])
        .unwrap();
    store.save_cursors("doc", &[snapshot((9, 3), (9, 4))]).unwrap();

    let loaded = store.load_cursors("doc").unwrap().unwrap();
    assert_eq!(loaded, vec![snapshot((9, 3), (9, 4))]);
}

#[test]
fn test_session_store_documents_are_independent() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("session.redb");
    let store = SessionStore::open(&db_path).unwrap();

    store.save_cursors("a", &[snapshot((1, 1), (1, 2))]).unwrap();
    store.save_cursors("b", &[snapshot((5, 1), (5, 2))]).unwrap();
    store.delete_cursors("a").unwrap();

    assert!(store.load_cursors("a").unwrap().is_none());
    assert_eq!(store.load_cursors("b").unwrap().unwrap().len(), 1);
}

#[test]
fn test_session_store_delete_nonexistent_is_ok() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("session.redb");
    let store = SessionStore::open(&db_path).unwrap();

    store.delete_cursors("nonexistent").unwrap();
}

#[test]
fn test_session_store_empty_cursor_list() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("session.redb");
    let store = SessionStore::open(&db_path).unwrap();

    store.save_cursors("empty", &[]).unwrap();
    assert_eq!(store.load_cursors("empty").unwrap().unwrap(), Vec::new());
}
