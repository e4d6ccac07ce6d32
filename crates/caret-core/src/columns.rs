//! Conversions between char columns and visible columns.
//!
//! A visible column is the on-screen cell index (0-based) after tab expansion.
//! Every char other than a tab occupies one cell.

use crate::lines::LineModel;

/// Returns the visible column of the tab stop following `visible_column`.
pub fn next_render_tab_stop(visible_column: usize, tab_size: usize) -> usize {
    let tab_size = tab_size.max(1);
    visible_column + tab_size - visible_column % tab_size
}

/// Returns the visible column at which the char at `column` (1-based) starts.
pub fn visible_column_from_column(line_content: &str, column: usize, tab_size: usize) -> usize {
    let end = column.saturating_sub(1);
    let mut result = 0;
    for ch in line_content.chars().take(end) {
        if ch == '\t' {
            result = next_render_tab_stop(result, tab_size);
        } else {
            result += 1;
        }
    }
    result
}

/// Returns the column whose visible column is nearest to `visible_column`.
///
/// Ties go to the left column. Values past the end of the line map to the
/// max column; values at or before zero map to column 1.
pub fn column_from_visible_column(
    line_content: &str,
    visible_column: isize,
    tab_size: usize,
) -> usize {
    if visible_column <= 0 {
        return 1;
    }
    let target = visible_column as usize;
    let mut before = 0;
    let mut count = 0;
    for (idx, ch) in line_content.chars().enumerate() {
        let after = if ch == '\t' {
            next_render_tab_stop(before, tab_size)
        } else {
            before + 1
        };
        if after >= target {
            let prev_delta = target - before;
            let after_delta = after - target;
            return if after_delta < prev_delta { idx + 2 } else { idx + 1 };
        }
        before = after;
        count = idx + 1;
    }
    count + 1
}

/// Like [`column_from_visible_column`] but reads the line from `model` and
/// clamps the result to the line's column bounds.
pub fn column_from_visible_column_in<M: LineModel + ?Sized>(
    model: &M,
    line: usize,
    visible_column: isize,
    tab_size: usize,
) -> usize {
    let column = column_from_visible_column(&model.line_content(line), visible_column, tab_size);
    column.clamp(model.line_min_column(line), model.line_max_column(line))
}

/// Visible column of `column` on `line` of `model`.
pub fn visible_column_in<M: LineModel + ?Sized>(
    model: &M,
    line: usize,
    column: usize,
    tab_size: usize,
) -> usize {
    visible_column_from_column(&model.line_content(line), column, tab_size)
}
