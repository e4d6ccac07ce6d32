//! Single-step cursor movement in either coordinate space.
//!
//! Every function here is pure: it reads lines through [`LineModel`] and
//! returns a new state without touching the document.

use crate::columns::{column_from_visible_column_in, visible_column_in};
use crate::context::CursorConfig;
use crate::lines::LineModel;
use crate::position::Position;
use crate::state::{SingleCursorState, Space};

/// A destination with the visible columns the cursor could not reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
    pub line: usize,
    pub column: usize,
    pub leftover_visible_columns: isize,
}

impl CursorPosition {
    pub fn new(line: usize, column: usize, leftover_visible_columns: isize) -> Self {
        Self {
            line,
            column,
            leftover_visible_columns,
        }
    }
}

// ── Horizontal ──────────────────────────────────────────────────────

/// One column to the left, continuing at the end of the previous line.
pub fn left<M: LineModel + ?Sized>(model: &M, line: usize, column: usize) -> CursorPosition {
    let min = model.line_min_column(line);
    if column > min {
        CursorPosition::new(line, column - 1, 0)
    } else if line > 1 {
        CursorPosition::new(line - 1, model.line_max_column(line - 1), 0)
    } else {
        CursorPosition::new(line, min, 0)
    }
}

/// One column to the right, continuing at the start of the next line.
pub fn right<M: LineModel + ?Sized>(model: &M, line: usize, column: usize) -> CursorPosition {
    let max = model.line_max_column(line);
    if column < max {
        CursorPosition::new(line, column + 1, 0)
    } else if line < model.line_count() {
        CursorPosition::new(line + 1, model.line_min_column(line + 1), 0)
    } else {
        CursorPosition::new(line, max, 0)
    }
}

pub fn move_left<S: Space, M: LineModel + ?Sized>(
    model: &M,
    cursor: &SingleCursorState<S>,
    in_selection_mode: bool,
    columns: usize,
) -> SingleCursorState<S> {
    let (line, column) = if cursor.has_selection() && !in_selection_mode {
        // Collapse to the start of the selection.
        let start = cursor.selection().start();
        (start.line, start.column)
    } else {
        let position = cursor.position();
        let target = left(model, position.line, (position.column + 1).saturating_sub(columns));
        (target.line, target.column)
    };
    cursor.move_to(in_selection_mode, line, column, 0)
}

pub fn move_right<S: Space, M: LineModel + ?Sized>(
    model: &M,
    cursor: &SingleCursorState<S>,
    in_selection_mode: bool,
    columns: usize,
) -> SingleCursorState<S> {
    let (line, column) = if cursor.has_selection() && !in_selection_mode {
        let end = cursor.selection().end();
        (end.line, end.column)
    } else {
        let position = cursor.position();
        let column = position.column.saturating_add(columns).saturating_sub(1);
        let target = right(model, position.line, column);
        (target.line, target.column)
    };
    cursor.move_to(in_selection_mode, line, column, 0)
}

// ── Vertical ────────────────────────────────────────────────────────

/// Moves `count` lines down, keeping the visible column when possible.
pub fn down<M: LineModel + ?Sized>(
    config: &CursorConfig,
    model: &M,
    line: usize,
    column: usize,
    leftover_visible_columns: isize,
    count: usize,
    allow_move_on_last_line: bool,
) -> CursorPosition {
    let current_visible =
        visible_column_in(model, line, column, config.tab_size) as isize + leftover_visible_columns;
    let line_count = model.line_count();
    let target_line = line.saturating_add(count);

    let (line, column) = if target_line > line_count {
        let column = if allow_move_on_last_line {
            model.line_max_column(line_count)
        } else {
            column.min(model.line_max_column(line_count))
        };
        (line_count, column)
    } else {
        (
            target_line,
            column_from_visible_column_in(model, target_line, current_visible, config.tab_size),
        )
    };

    let leftover =
        current_visible - visible_column_in(model, line, column, config.tab_size) as isize;
    CursorPosition::new(line, column, leftover)
}

/// Moves `count` lines up, keeping the visible column when possible.
pub fn up<M: LineModel + ?Sized>(
    config: &CursorConfig,
    model: &M,
    line: usize,
    column: usize,
    leftover_visible_columns: isize,
    count: usize,
    allow_move_on_first_line: bool,
) -> CursorPosition {
    let current_visible =
        visible_column_in(model, line, column, config.tab_size) as isize + leftover_visible_columns;

    let (line, column) = if count >= line {
        let column = if allow_move_on_first_line {
            model.line_min_column(1)
        } else {
            column.min(model.line_max_column(1))
        };
        (1, column)
    } else {
        let target_line = line - count;
        (
            target_line,
            column_from_visible_column_in(model, target_line, current_visible, config.tab_size),
        )
    };

    let leftover =
        current_visible - visible_column_in(model, line, column, config.tab_size) as isize;
    CursorPosition::new(line, column, leftover)
}

pub fn move_down<S: Space, M: LineModel + ?Sized>(
    config: &CursorConfig,
    model: &M,
    cursor: &SingleCursorState<S>,
    in_selection_mode: bool,
    lines: usize,
) -> SingleCursorState<S> {
    let (line, column) = if cursor.has_selection() && !in_selection_mode {
        // Continue from the end of the selection.
        let end = cursor.selection().end();
        (end.line, end.column)
    } else {
        (cursor.position().line, cursor.position().column)
    };
    let target = down(
        config,
        model,
        line,
        column,
        cursor.leftover_visible_columns(),
        lines,
        true,
    );
    cursor.move_to(in_selection_mode, target.line, target.column, target.leftover_visible_columns)
}

pub fn move_up<S: Space, M: LineModel + ?Sized>(
    config: &CursorConfig,
    model: &M,
    cursor: &SingleCursorState<S>,
    in_selection_mode: bool,
    lines: usize,
) -> SingleCursorState<S> {
    let (line, column) = if cursor.has_selection() && !in_selection_mode {
        let start = cursor.selection().start();
        (start.line, start.column)
    } else {
        (cursor.position().line, cursor.position().column)
    };
    let target = up(
        config,
        model,
        line,
        column,
        cursor.leftover_visible_columns(),
        lines,
        true,
    );
    cursor.move_to(in_selection_mode, target.line, target.column, target.leftover_visible_columns)
}

/// Shifts the whole cursor (anchor and position) one line down.
pub fn translate_down<S: Space, M: LineModel + ?Sized>(
    config: &CursorConfig,
    model: &M,
    cursor: &SingleCursorState<S>,
) -> SingleCursorState<S> {
    let selection = cursor.selection();
    let anchor = down(
        config,
        model,
        selection.anchor.line,
        selection.anchor.column,
        cursor.selection_start_leftover_visible_columns(),
        1,
        false,
    );
    let head = down(
        config,
        model,
        selection.head.line,
        selection.head.column,
        cursor.leftover_visible_columns(),
        1,
        false,
    );
    translated(anchor, head)
}

/// Shifts the whole cursor (anchor and position) one line up.
pub fn translate_up<S: Space, M: LineModel + ?Sized>(
    config: &CursorConfig,
    model: &M,
    cursor: &SingleCursorState<S>,
) -> SingleCursorState<S> {
    let selection = cursor.selection();
    let anchor = up(
        config,
        model,
        selection.anchor.line,
        selection.anchor.column,
        cursor.selection_start_leftover_visible_columns(),
        1,
        false,
    );
    let head = up(
        config,
        model,
        selection.head.line,
        selection.head.column,
        cursor.leftover_visible_columns(),
        1,
        false,
    );
    translated(anchor, head)
}

fn translated<S: Space>(anchor: CursorPosition, head: CursorPosition) -> SingleCursorState<S> {
    SingleCursorState::new(
        crate::position::Range::collapsed(Position::new(anchor.line, anchor.column)),
        anchor.leftover_visible_columns,
        Position::new(head.line, head.column),
        head.leftover_visible_columns,
    )
}

// ── Line and buffer edges ───────────────────────────────────────────

/// Home: toggles between the first non-whitespace column and the min column.
pub fn move_to_beginning_of_line<S: Space, M: LineModel + ?Sized>(
    model: &M,
    cursor: &SingleCursorState<S>,
    in_selection_mode: bool,
) -> SingleCursorState<S> {
    let line = cursor.position().line;
    let min = model.line_min_column(line);
    let first = model.line_first_non_whitespace_column(line).unwrap_or(min);
    let column = if cursor.position().column == first { min } else { first };
    cursor.move_to(in_selection_mode, line, column, 0)
}

pub fn move_to_end_of_line<S: Space, M: LineModel + ?Sized>(
    model: &M,
    cursor: &SingleCursorState<S>,
    in_selection_mode: bool,
) -> SingleCursorState<S> {
    let line = cursor.position().line;
    cursor.move_to(in_selection_mode, line, model.line_max_column(line), 0)
}

pub fn move_to_beginning_of_buffer<S: Space, M: LineModel + ?Sized>(
    model: &M,
    cursor: &SingleCursorState<S>,
    in_selection_mode: bool,
) -> SingleCursorState<S> {
    cursor.move_to(in_selection_mode, 1, model.line_min_column(1), 0)
}

pub fn move_to_end_of_buffer<S: Space, M: LineModel + ?Sized>(
    model: &M,
    cursor: &SingleCursorState<S>,
    in_selection_mode: bool,
) -> SingleCursorState<S> {
    let last = model.line_count();
    cursor.move_to(in_selection_mode, last, model.line_max_column(last), 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::testing::Lines;
    use crate::position::Range;
    use crate::state::ModelState;

    fn pos(line: usize, column: usize) -> Position {
        Position::new(line, column)
    }

    fn config() -> CursorConfig {
        CursorConfig::default()
    }

    // ── Horizontal ──────────────────────────────────────────────────

    #[test]
    fn test_left_wraps_to_previous_line() {
        let lines = Lines::new(&["abc", "de"]);
        assert_eq!(left(&lines, 2, 1), CursorPosition::new(1, 4, 0));
        assert_eq!(left(&lines, 1, 1), CursorPosition::new(1, 1, 0));
    }

    #[test]
    fn test_right_wraps_to_next_line() {
        let lines = Lines::new(&["abc", "de"]);
        assert_eq!(right(&lines, 1, 4), CursorPosition::new(2, 1, 0));
        assert_eq!(right(&lines, 2, 3), CursorPosition::new(2, 3, 0));
    }

    #[test]
    fn test_move_left_collapses_selection() {
        let lines = Lines::new(&["hello world"]);
        let cursor = ModelState::new(Range::collapsed(pos(1, 3)), 0, pos(1, 8), 0);
        let moved = move_left(&lines, &cursor, false, 1);
        assert_eq!(moved, ModelState::collapsed(pos(1, 3)));

        let extended = move_left(&lines, &cursor, true, 2);
        assert_eq!(extended.selection_start(), Range::collapsed(pos(1, 3)));
        assert_eq!(extended.position(), pos(1, 6));
    }

    #[test]
    fn test_move_right_by_many_columns() {
        let lines = Lines::new(&["hello", "world"]);
        let cursor = ModelState::collapsed(pos(1, 2));
        assert_eq!(move_right(&lines, &cursor, false, 3).position(), pos(1, 5));
        // Overshooting the end continues on the next line.
        assert_eq!(move_right(&lines, &cursor, false, 9).position(), pos(2, 1));
        // Zero columns stays put.
        assert_eq!(move_right(&lines, &cursor, false, 0).position(), pos(1, 2));
        assert_eq!(move_left(&lines, &cursor, false, 0).position(), pos(1, 2));
    }

    // ── Vertical ────────────────────────────────────────────────────

    #[test]
    fn test_down_keeps_leftover_over_short_line() {
        let lines = Lines::new(&["long line here", "ab", "another long one"]);
        let first = down(&config(), &lines, 1, 10, 0, 1, true);
        assert_eq!(first, CursorPosition::new(2, 3, 7));
        let second = down(
            &config(),
            &lines,
            first.line,
            first.column,
            first.leftover_visible_columns,
            1,
            true,
        );
        assert_eq!(second, CursorPosition::new(3, 10, 0));
    }

    #[test]
    fn test_down_past_last_line() {
        let lines = Lines::new(&["abc", "defgh"]);
        // Jumping to the end remembers how far left the caret came from.
        assert_eq!(down(&config(), &lines, 2, 2, 0, 1, true), CursorPosition::new(2, 6, -4));
        assert_eq!(down(&config(), &lines, 2, 2, 0, 1, false), CursorPosition::new(2, 2, 0));
    }

    #[test]
    fn test_up_past_first_line() {
        let lines = Lines::new(&["abc", "defgh"]);
        assert_eq!(up(&config(), &lines, 1, 3, 0, 1, true), CursorPosition::new(1, 1, 2));
        assert_eq!(up(&config(), &lines, 1, 3, 0, 1, false), CursorPosition::new(1, 3, 0));
        assert_eq!(up(&config(), &lines, 2, 5, 0, 5, true), CursorPosition::new(1, 1, 4));
    }

    #[test]
    fn test_vertical_move_through_tabs() {
        let lines = Lines::new(&["\tx", "abcdef"]);
        // 'x' sits at visible column 4.
        let moved = down(&config(), &lines, 1, 2, 0, 1, true);
        assert_eq!(moved, CursorPosition::new(2, 5, 0));
        let back = up(&config(), &lines, 2, 3, 0, 1, true);
        assert_eq!(back, CursorPosition::new(1, 1, 2));
    }

    #[test]
    fn test_move_down_from_selection_end() {
        let lines = Lines::new(&["aaaa", "bbbb", "cccc"]);
        let cursor = ModelState::new(Range::collapsed(pos(2, 3)), 0, pos(1, 2), 0);
        let moved = move_down(&config(), &lines, &cursor, false, 1);
        assert_eq!(moved, ModelState::collapsed(pos(3, 3)));
    }

    #[test]
    fn test_translate_moves_anchor_and_position() {
        let lines = Lines::new(&["abcdef", "abcdef", "abcdef"]);
        let cursor = ModelState::new(Range::collapsed(pos(1, 2)), 0, pos(1, 5), 0);
        let moved = translate_down(&config(), &lines, &cursor);
        assert_eq!(moved.selection_start(), Range::collapsed(pos(2, 2)));
        assert_eq!(moved.position(), pos(2, 5));

        let back = translate_up(&config(), &lines, &moved);
        assert_eq!(back.selection_start(), Range::collapsed(pos(1, 2)));
        // On the first line, translating up keeps the column.
        let stuck = translate_up(&config(), &lines, &back);
        assert_eq!(stuck.position(), pos(1, 5));
    }

    // ── Edges ───────────────────────────────────────────────────────

    #[test]
    fn test_home_toggles() {
        let lines = Lines::new(&["    indented"]);
        let cursor = ModelState::collapsed(pos(1, 9));
        let first = move_to_beginning_of_line(&lines, &cursor, false);
        assert_eq!(first.position(), pos(1, 5));
        let second = move_to_beginning_of_line(&lines, &first, false);
        assert_eq!(second.position(), pos(1, 1));
        let third = move_to_beginning_of_line(&lines, &second, false);
        assert_eq!(third.position(), pos(1, 5));
    }

    #[test]
    fn test_buffer_edges() {
        let lines = Lines::new(&["one", "two", "three"]);
        let cursor = ModelState::collapsed(pos(2, 2));
        assert_eq!(move_to_end_of_buffer(&lines, &cursor, false).position(), pos(3, 6));
        let selected = move_to_beginning_of_buffer(&lines, &cursor, true);
        assert_eq!(selected.selection_start(), Range::collapsed(pos(2, 2)));
        assert_eq!(selected.position(), pos(1, 1));
        assert_eq!(move_to_end_of_line(&lines, &cursor, false).position(), pos(2, 4));
    }
}
