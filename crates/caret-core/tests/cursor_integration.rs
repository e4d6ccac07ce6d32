// Integration tests for cursor state management.
//
// These tests drive whole cursors through the command library and the
// editor state, the way an editor front end would.

use caret_core::commands::{self, CursorMoveArgs, MoveDirection};
use caret_core::{
    CoordinatesConverter, Cursor, EditorState, FoldRange, LineModel, ModelState,
    PartialCursorState, Position, Range, Selection, SelectionDirection, TextModel, ViewOptions,
    ViewState,
};

fn pos(line: usize, column: usize) -> Position {
    Position::new(line, column)
}

fn caret_at(editor: &mut EditorState, line: usize, column: usize) -> Cursor {
    let mut ctx = editor.context();
    let mut cursor = Cursor::new(&mut ctx);
    cursor
        .set_state(&mut ctx, Some(ModelState::collapsed(pos(line, column))), None, false)
        .unwrap();
    cursor
}

fn apply(editor: &mut EditorState, cursor: &mut Cursor, state: PartialCursorState) {
    let mut ctx = editor.context();
    cursor.commit(&mut ctx, state).unwrap();
}

// ── Coordinate mapping ─────────────────────────────────────────────────

#[test]
fn test_model_view_round_trip_with_wrapping_and_folds() {
    let text = "short\na line that wraps more than once\nhidden\nhidden too\n\tindented tail";
    let mut editor = EditorState::new(
        TextModel::from(text),
        ViewOptions {
            wrapping_column: Some(8),
            folds: vec![FoldRange::new(2, 4)],
        },
        Default::default(),
    );
    let ctx = editor.context();
    let model = ctx.model();
    let view = ctx.view_model();

    for line in [1, 2, 5] {
        for column in 1..=model.line_max_column(line) {
            let position = pos(line, column);
            let view_position = view.model_to_view_position(position);
            assert_eq!(view.view_to_model_position(view_position), position, "at {position}");
        }
    }
}

// ── Vertical movement ──────────────────────────────────────────────────

#[test]
fn test_leftover_columns_survive_short_line() {
    let mut editor = EditorState::from_text("a long line here\nab\na long line here");
    let mut cursor = caret_at(&mut editor, 1, 10);
    let down = CursorMoveArgs::new(MoveDirection::Down);

    let result = commands::move_cursors(&editor.context(), &[cursor.state()], &down);
    apply(&mut editor, &mut cursor, result[0]);
    assert_eq!(cursor.model_state().position(), pos(2, 3));
    assert_eq!(cursor.model_state().leftover_visible_columns(), 7);

    let result = commands::move_cursors(&editor.context(), &[cursor.state()], &down);
    apply(&mut editor, &mut cursor, result[0]);
    assert_eq!(cursor.model_state().position(), pos(3, 10));
    assert_eq!(cursor.model_state().leftover_visible_columns(), 0);

    // And back up through the short line to where it started.
    let up = CursorMoveArgs::new(MoveDirection::Up).value(2);
    let result = commands::move_cursors(&editor.context(), &[cursor.state()], &up);
    apply(&mut editor, &mut cursor, result[0]);
    assert_eq!(cursor.model_state().position(), pos(1, 10));
}

// ── Selections ─────────────────────────────────────────────────────────

#[test]
fn test_cancel_then_word_select_keeps_spaces_in_sync() {
    let mut editor = EditorState::from_text("one two three");
    let mut cursor = caret_at(&mut editor, 1, 1);

    let backwards = ModelState::new(Range::collapsed(pos(1, 12)), 0, pos(1, 3), 0);
    apply(&mut editor, &mut cursor, PartialCursorState::Model(backwards));
    assert_eq!(cursor.direction(), SelectionDirection::Rtl);
    assert_eq!(cursor.view_state().selection().direction(), SelectionDirection::Rtl);

    let result = commands::cancel_selection(&cursor.state());
    apply(&mut editor, &mut cursor, result);
    assert!(!cursor.model_state().has_selection());
    assert_eq!(cursor.model_state().position(), pos(1, 3));

    let result = commands::word(&editor.context(), &cursor.state(), false, pos(1, 6));
    apply(&mut editor, &mut cursor, result);
    assert_eq!(cursor.model_state().selection(), Selection::new(pos(1, 5), pos(1, 8)));

    // Dragging left keeps "two" selected and flips the direction.
    let result = commands::word(&editor.context(), &cursor.state(), true, pos(1, 2));
    apply(&mut editor, &mut cursor, result);
    assert_eq!(cursor.model_state().selection(), Selection::new(pos(1, 8), pos(1, 1)));
    assert_eq!(cursor.direction(), SelectionDirection::Rtl);
    assert_eq!(cursor.view_state().selection(), Selection::new(pos(1, 8), pos(1, 1)));
}

#[test]
fn test_select_all_toggles_with_editable_range() {
    let mut editor = EditorState::from_text("one\ntwo\nthree");
    editor.set_editable_range(Some(Range::new(2, 1, 2, 4)));
    let mut cursor = caret_at(&mut editor, 2, 2);

    let result = commands::select_all(&editor.context(), &cursor.state());
    apply(&mut editor, &mut cursor, result);
    assert_eq!(cursor.model_state().selection(), Selection::new(pos(2, 1), pos(2, 4)));

    let result = commands::select_all(&editor.context(), &cursor.state());
    apply(&mut editor, &mut cursor, result);
    assert_eq!(cursor.model_state().selection(), Selection::new(pos(1, 1), pos(3, 6)));

    let result = commands::select_all(&editor.context(), &cursor.state());
    apply(&mut editor, &mut cursor, result);
    assert_eq!(cursor.model_state().selection(), Selection::new(pos(2, 1), pos(2, 4)));
}

#[test]
fn test_line_selection_drag_returns_to_original_line() {
    let text = (1..=8).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
    let mut editor = EditorState::from_text(&text);
    let mut cursor = caret_at(&mut editor, 1, 1);

    let result = commands::line(&editor.context(), &cursor.state(), false, pos(5, 3), None);
    apply(&mut editor, &mut cursor, result);
    let original = cursor.model_state().selection();
    assert_eq!(original, Selection::new(pos(5, 1), pos(6, 1)));

    let result = commands::line(&editor.context(), &cursor.state(), true, pos(3, 2), None);
    apply(&mut editor, &mut cursor, result);
    assert_eq!(cursor.model_state().selection(), Selection::new(pos(6, 1), pos(3, 1)));

    let result = commands::line(&editor.context(), &cursor.state(), true, pos(7, 2), None);
    apply(&mut editor, &mut cursor, result);
    assert_eq!(cursor.model_state().selection(), Selection::new(pos(5, 1), pos(8, 1)));

    let result = commands::line(&editor.context(), &cursor.state(), true, pos(5, 4), None);
    apply(&mut editor, &mut cursor, result);
    assert_eq!(cursor.model_state().selection(), original);
}

// ── Edits ──────────────────────────────────────────────────────────────

#[test]
fn test_selection_follows_insert_before_it() {
    let mut editor = EditorState::from_text("first\nabcdefghij\nlast");
    let mut cursor = caret_at(&mut editor, 1, 1);
    let forward = ModelState::new(Range::collapsed(pos(2, 3)), 0, pos(2, 7), 0);
    apply(&mut editor, &mut cursor, PartialCursorState::Model(forward));

    editor.apply_edit(Range::collapsed(pos(2, 1)), "1234").unwrap();

    let mut ctx = editor.context();
    let recovered = cursor.begin_recover_selection_from_markers(&ctx).unwrap();
    assert_eq!(recovered, Selection::new(pos(2, 7), pos(2, 11)));
    cursor.end_recover_selection_from_markers(&mut ctx, recovered).unwrap();
    assert_eq!(cursor.direction(), SelectionDirection::Ltr);
    assert_eq!(cursor.model_state().selection(), recovered);
}

#[test]
fn test_edit_inside_wrapped_line_refreshes_view_state() {
    let mut editor = EditorState::new(
        TextModel::from("abcdefgh"),
        ViewOptions {
            wrapping_column: Some(4),
            folds: Vec::new(),
        },
        Default::default(),
    );
    let mut cursor = caret_at(&mut editor, 1, 7);
    assert_eq!(cursor.view_state().position(), pos(2, 3));

    editor.apply_edit(Range::new(1, 1, 1, 5), "").unwrap();
    let mut ctx = editor.context();
    let recovered = cursor.begin_recover_selection_from_markers(&ctx).unwrap();
    cursor.end_recover_selection_from_markers(&mut ctx, recovered).unwrap();
    assert_eq!(cursor.model_state().position(), pos(1, 3));
    assert_eq!(cursor.view_state().position(), pos(1, 3));
}

// ── Viewport ───────────────────────────────────────────────────────────

#[test]
fn test_cursor_outside_viewport_is_pulled_in() {
    let text = (1..=40).map(|i| format!("    item {i}")).collect::<Vec<_>>().join("\n");
    let mut editor = EditorState::from_text(&text);
    editor.set_viewport(10, 11);
    let mut cursor = caret_at(&mut editor, 1, 1);

    let args = CursorMoveArgs::new(MoveDirection::ViewportIfOutside);
    let result = commands::move_cursors(&editor.context(), &[cursor.state()], &args);
    apply(&mut editor, &mut cursor, result[0]);
    assert_eq!(cursor.model_state().position(), pos(10, 5));
    assert_eq!(*cursor.view_state(), ViewState::collapsed(pos(10, 5)));
}

// ── Multiple cursors ───────────────────────────────────────────────────

#[test]
fn test_add_cursor_down_then_move_all() {
    let mut editor = EditorState::from_text("alpha\nbravo\ncharlie");
    let cursor = caret_at(&mut editor, 1, 2);

    let states = commands::add_cursor_down(&editor.context(), &[cursor.state()], true);
    let mut cursors = vec![cursor];
    cursors.push(caret_at(&mut editor, 1, 1));
    for (cursor, state) in cursors.iter_mut().zip(states) {
        apply(&mut editor, cursor, state);
    }
    assert_eq!(cursors[1].model_state().position(), pos(2, 2));

    let states: Vec<_> = cursors.iter().map(Cursor::state).collect();
    let args = CursorMoveArgs::new(MoveDirection::Right).value(2);
    let moved = commands::move_cursors(&editor.context(), &states, &args);
    for (cursor, state) in cursors.iter_mut().zip(moved) {
        apply(&mut editor, cursor, state);
    }
    assert_eq!(cursors[0].model_state().position(), pos(1, 4));
    assert_eq!(cursors[1].model_state().position(), pos(2, 4));
}
