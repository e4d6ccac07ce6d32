/// Line-oriented read access shared by the model and the view.
use crate::position::Position;

/// Returns true for the chars that count as indentation and trailing blanks.
pub fn is_blank(ch: char) -> bool {
    ch == ' ' || ch == '\t'
}

/// Read-only access to a sequence of 1-based lines with 1-based columns.
///
/// Implemented by the text model (model space) and the view model (view space),
/// so movement primitives work in either coordinate space.
pub trait LineModel {
    fn line_count(&self) -> usize;

    /// Text of a line without its line ending. Out-of-range lines read as empty.
    fn line_content(&self, line: usize) -> String;

    fn line_min_column(&self, line: usize) -> usize;

    fn line_max_column(&self, line: usize) -> usize;

    /// Column of the first char that is not a space or tab, or `None` for a blank line.
    fn line_first_non_whitespace_column(&self, line: usize) -> Option<usize> {
        let content = self.line_content(line);
        content
            .chars()
            .position(|ch| !is_blank(ch))
            .map(|idx| idx + self.line_min_column(line))
    }

    /// Column just after the last char that is not a space or tab, or `None` for a blank line.
    fn line_last_non_whitespace_column(&self, line: usize) -> Option<usize> {
        let content = self.line_content(line);
        let trimmed = content.trim_end_matches(is_blank);
        if trimmed.is_empty() {
            return None;
        }
        Some(trimmed.chars().count() + self.line_min_column(line))
    }

    /// Clamps a position to the nearest valid one.
    fn normalize_position(&self, position: Position) -> Position {
        let line = position.line.clamp(1, self.line_count().max(1));
        let column = position
            .column
            .clamp(self.line_min_column(line), self.line_max_column(line));
        Position::new(line, column)
    }
}
