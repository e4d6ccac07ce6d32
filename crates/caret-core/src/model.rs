/// The text model: buffer contents, tracked markers, and the editable range.
///
/// Markers are positions that follow edits. A cursor keeps two of them so its
/// selection can be recovered after text changes made elsewhere.
use anyhow::{Context, Result};
use slotmap::{new_key_type, SlotMap};

use crate::buffer::TextBuffer;
use crate::lines::LineModel;
use crate::position::{Position, Range};

new_key_type! {
    /// Handle to a position tracked by a [`TextModel`].
    pub struct MarkerId;
}

#[derive(Debug, Clone, Copy)]
struct Marker {
    position: Position,
    /// When text is inserted exactly at the marker, stay before it.
    stick_to_previous: bool,
}

/// Text plus the markers and editable range that live alongside it.
#[derive(Debug, Clone, Default)]
pub struct TextModel {
    buffer: TextBuffer,
    markers: SlotMap<MarkerId, Marker>,
    editable_range: Option<Range>,
    version: u64,
}

impl From<&str> for TextModel {
    fn from(text: &str) -> Self {
        Self {
            buffer: TextBuffer::from(text),
            ..Self::default()
        }
    }
}

impl TextModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Incremented on every edit.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Clamps a position into the document.
    pub fn validate_position(&self, position: Position) -> Position {
        self.normalize_position(position)
    }

    /// Clamps both ends of a range into the document.
    pub fn validate_range(&self, range: Range) -> Range {
        Range::from_positions(
            self.validate_position(range.start()),
            self.validate_position(range.end()),
        )
    }

    /// Range covering the whole document.
    pub fn full_range(&self) -> Range {
        let last = self.line_count();
        Range::new(1, 1, last, self.line_max_column(last))
    }

    /// Char offset of a (validated) position.
    pub fn offset_at(&self, position: Position) -> usize {
        let position = self.validate_position(position);
        self.buffer
            .line_to_char(position.line - 1)
            .map(|start| start + position.column - 1)
            .unwrap_or(0)
    }

    /// Position of a char offset, clamped to the document end.
    pub fn position_at(&self, offset: usize) -> Position {
        let offset = offset.min(self.buffer.len_chars());
        let line_idx = self.buffer.char_to_line(offset).unwrap_or(0);
        let line_start = self.buffer.line_to_char(line_idx).unwrap_or(0);
        self.validate_position(Position::new(line_idx + 1, offset - line_start + 1))
    }

    // ── Editable range ──────────────────────────────────────────────

    /// The sub-range the user may edit; the whole document when unset.
    pub fn editable_range(&self) -> Range {
        match self.editable_range {
            Some(range) => self.validate_range(range),
            None => self.full_range(),
        }
    }

    pub fn has_editable_range(&self) -> bool {
        self.editable_range.is_some()
    }

    pub fn set_editable_range(&mut self, range: Option<Range>) {
        self.editable_range = range.map(|r| self.validate_range(r));
    }

    // ── Edits ───────────────────────────────────────────────────────

    /// Replaces `range` with `text` and moves every marker to follow the edit.
    ///
    /// Returns the range now covered by `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying buffer rejects the edit.
    pub fn apply_edit(&mut self, range: Range, text: &str) -> Result<Range> {
        let range = self.validate_range(range);
        let start = self.offset_at(range.start());
        let end = self.offset_at(range.end());
        self.buffer
            .replace(start, end, text)
            .with_context(|| format!("Failed to apply edit at {range}"))?;

        let new_end = self.position_at(start + text.chars().count());
        for marker in self.markers.values_mut() {
            marker.position =
                shift_marker(marker.position, marker.stick_to_previous, range, new_end);
        }
        if let Some(editable) = self.editable_range {
            self.editable_range = Some(Range::from_positions(
                shift_marker(editable.start(), true, range, new_end),
                shift_marker(editable.end(), false, range, new_end),
            ));
        }
        self.version += 1;
        tracing::trace!("Applied edit {range} -> {new_end} ({} markers)", self.markers.len());
        Ok(Range::from_positions(range.start(), new_end))
    }

    // ── Markers ─────────────────────────────────────────────────────

    /// Starts tracking `position` and returns its handle.
    pub fn add_marker(&mut self, position: Position, stick_to_previous: bool) -> MarkerId {
        let position = self.validate_position(position);
        self.markers.insert(Marker {
            position,
            stick_to_previous,
        })
    }

    /// Moves a marker to `position`.
    ///
    /// # Errors
    ///
    /// Returns an error if the marker was removed.
    pub fn change_marker(&mut self, id: MarkerId, position: Position) -> Result<()> {
        let position = self.validate_position(position);
        let marker = self.marker_mut(id)?;
        marker.position = position;
        Ok(())
    }

    /// Changes how a marker reacts to text inserted exactly at it.
    ///
    /// # Errors
    ///
    /// Returns an error if the marker was removed.
    pub fn change_marker_stickiness(
        &mut self,
        id: MarkerId,
        stick_to_previous: bool,
    ) -> Result<()> {
        self.marker_mut(id)?.stick_to_previous = stick_to_previous;
        Ok(())
    }

    /// Current position of a marker.
    ///
    /// # Errors
    ///
    /// Returns an error if the marker was removed.
    pub fn marker_position(&self, id: MarkerId) -> Result<Position> {
        self.markers
            .get(id)
            .map(|m| m.position)
            .with_context(|| format!("Unknown marker {id:?}"))
    }

    /// Stops tracking a marker.
    ///
    /// # Errors
    ///
    /// Returns an error if the marker was already removed.
    pub fn remove_marker(&mut self, id: MarkerId) -> Result<()> {
        self.markers
            .remove(id)
            .map(|_| ())
            .with_context(|| format!("Unknown marker {id:?}"))
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    fn marker_mut(&mut self, id: MarkerId) -> Result<&mut Marker> {
        self.markers
            .get_mut(id)
            .with_context(|| format!("Unknown marker {id:?}"))
    }
}

/// Where a tracked position ends up after `edit` was replaced by text ending at `new_end`.
fn shift_marker(
    pos: Position,
    stick_to_previous: bool,
    edit: Range,
    new_end: Position,
) -> Position {
    let (start, end) = (edit.start(), edit.end());
    if pos < start {
        return pos;
    }
    if pos > end {
        if pos.line == end.line {
            return Position::new(new_end.line, new_end.column + pos.column - end.column);
        }
        return Position::new(pos.line - end.line + new_end.line, pos.column);
    }
    if edit.is_empty() || (pos != start && pos != end) {
        return if stick_to_previous { start } else { new_end };
    }
    if pos == end {
        new_end
    } else {
        start
    }
}

impl LineModel for TextModel {
    fn line_count(&self) -> usize {
        self.buffer.len_lines()
    }

    fn line_content(&self, line: usize) -> String {
        line.checked_sub(1)
            .and_then(|idx| self.buffer.line_text(idx).ok())
            .unwrap_or_default()
    }

    fn line_min_column(&self, _line: usize) -> usize {
        1
    }

    fn line_max_column(&self, line: usize) -> usize {
        line.checked_sub(1)
            .and_then(|idx| self.buffer.line_len_chars(idx).ok())
            .unwrap_or(0)
            + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(line: usize, column: usize) -> Position {
        Position::new(line, column)
    }

    // ── Coordinates ─────────────────────────────────────────────────

    #[test]
    fn test_validate_position_clamps() {
        let model = TextModel::from("abc\nde");
        assert_eq!(model.validate_position(pos(0, 0)), pos(1, 1));
        assert_eq!(model.validate_position(pos(1, 10)), pos(1, 4));
        assert_eq!(model.validate_position(pos(7, 1)), pos(2, 1));
    }

    #[test]
    fn test_offset_round_trip() {
        let model = TextModel::from("abc\nde\n");
        assert_eq!(model.offset_at(pos(2, 2)), 5);
        assert_eq!(model.position_at(5), pos(2, 2));
        assert_eq!(model.position_at(100), pos(3, 1));
    }

    #[test]
    fn test_lone_line_breaks_give_one_caret_stop_per_offset() {
        for text in ["ab\rcd", "ab\u{0C}cd"] {
            let model = TextModel::from(text);
            assert_eq!(model.line_count(), 2);
            assert_eq!(model.line_content(1), "ab");
            assert_eq!(model.line_max_column(1), 3);
            assert_eq!(model.validate_position(pos(1, 4)), pos(1, 3));
            assert_eq!(model.offset_at(pos(1, 3)), 2);
            assert_eq!(model.position_at(2), pos(1, 3));
            assert_eq!(model.offset_at(pos(2, 1)), 3);
            assert_eq!(model.position_at(3), pos(2, 1));
        }
    }

    #[test]
    fn test_full_range() {
        let model = TextModel::from("abc\nde");
        assert_eq!(model.full_range(), Range::new(1, 1, 2, 3));
    }

    #[test]
    fn test_editable_range_defaults_to_document() {
        let mut model = TextModel::from("abc\nde");
        assert!(!model.has_editable_range());
        assert_eq!(model.editable_range(), model.full_range());
        model.set_editable_range(Some(Range::new(1, 2, 9, 9)));
        assert_eq!(model.editable_range(), Range::new(1, 2, 2, 3));
    }

    // ── Markers ─────────────────────────────────────────────────────

    #[test]
    fn test_marker_lifecycle() {
        let mut model = TextModel::from("hello");
        let id = model.add_marker(pos(1, 3), true);
        assert_eq!(model.marker_count(), 1);
        model.change_marker(id, pos(1, 5)).unwrap();
        assert_eq!(model.marker_position(id).unwrap(), pos(1, 5));
        model.remove_marker(id).unwrap();
        assert_eq!(model.marker_count(), 0);
        assert!(model.marker_position(id).is_err());
        assert!(model.remove_marker(id).is_err());
    }

    #[test]
    fn test_marker_shifts_after_insert_before_it() {
        let mut model = TextModel::from("line one\nabcdefgh");
        let start = model.add_marker(pos(2, 3), true);
        let end = model.add_marker(pos(2, 7), false);
        model.apply_edit(Range::collapsed(pos(2, 1)), "1234").unwrap();
        assert_eq!(model.marker_position(start).unwrap(), pos(2, 7));
        assert_eq!(model.marker_position(end).unwrap(), pos(2, 11));
    }

    #[test]
    fn test_marker_before_edit_is_untouched() {
        let mut model = TextModel::from("abcdef");
        let id = model.add_marker(pos(1, 2), false);
        model.apply_edit(Range::new(1, 4, 1, 6), "").unwrap();
        assert_eq!(model.marker_position(id).unwrap(), pos(1, 2));
    }

    #[test]
    fn test_stickiness_on_insert_at_marker() {
        let mut model = TextModel::from("abcdef");
        let sticky = model.add_marker(pos(1, 3), true);
        let loose = model.add_marker(pos(1, 3), false);
        model.apply_edit(Range::collapsed(pos(1, 3)), "XY").unwrap();
        assert_eq!(model.marker_position(sticky).unwrap(), pos(1, 3));
        assert_eq!(model.marker_position(loose).unwrap(), pos(1, 5));

        model.change_marker_stickiness(sticky, false).unwrap();
        model.apply_edit(Range::collapsed(pos(1, 3)), "Z").unwrap();
        assert_eq!(model.marker_position(sticky).unwrap(), pos(1, 4));
    }

    #[test]
    fn test_marker_inside_deleted_range() {
        let mut model = TextModel::from("abcdefgh");
        let sticky = model.add_marker(pos(1, 4), true);
        let loose = model.add_marker(pos(1, 4), false);
        model.apply_edit(Range::new(1, 2, 1, 6), "xyz").unwrap();
        assert_eq!(model.marker_position(sticky).unwrap(), pos(1, 2));
        assert_eq!(model.marker_position(loose).unwrap(), pos(1, 5));
    }

    #[test]
    fn test_marker_on_later_line_follows_line_delta() {
        let mut model = TextModel::from("a\nb\nc");
        let id = model.add_marker(pos(3, 2), true);
        model.apply_edit(Range::collapsed(pos(1, 2)), "\n\n").unwrap();
        assert_eq!(model.marker_position(id).unwrap(), pos(5, 2));
        model.apply_edit(Range::new(1, 2, 4, 1), "").unwrap();
        assert_eq!(model.marker_position(id).unwrap(), pos(2, 2));
    }

    #[test]
    fn test_multiline_insert_moves_same_line_marker() {
        let mut model = TextModel::from("abcdef");
        let id = model.add_marker(pos(1, 5), false);
        let inserted = model.apply_edit(Range::collapsed(pos(1, 3)), "1\n22").unwrap();
        assert_eq!(inserted, Range::new(1, 3, 2, 3));
        assert_eq!(model.text(), "ab1\n22cdef");
        assert_eq!(model.marker_position(id).unwrap(), pos(2, 5));
    }

    #[test]
    fn test_edit_bumps_version() {
        let mut model = TextModel::from("x");
        assert_eq!(model.version(), 0);
        model.apply_edit(Range::collapsed(pos(1, 1)), "y").unwrap();
        assert_eq!(model.version(), 1);
    }

    // ── Lines ───────────────────────────────────────────────────────

    #[test]
    fn test_line_model_impl() {
        let model = TextModel::from("  foo\r\n\tbar  \n");
        assert_eq!(model.line_count(), 3);
        assert_eq!(model.line_content(1), "  foo");
        assert_eq!(model.line_max_column(1), 6);
        assert_eq!(model.line_first_non_whitespace_column(2), Some(2));
        assert_eq!(model.line_last_non_whitespace_column(2), Some(5));
        assert_eq!(model.line_content(3), "");
        assert_eq!(model.line_content(0), "");
    }
}
