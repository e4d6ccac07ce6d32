//! View-space projection of the text model.
//!
//! Lines longer than the wrapping column are split into several view lines,
//! and folded regions hide model lines from the view entirely. The layout is
//! precomputed once per model version and must be rebuilt after edits.

use crate::lines::LineModel;
use crate::model::TextModel;
use crate::position::{Position, Range};

/// A folded region. The start line stays visible; the lines after it up to
/// and including `end_line` are hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldRange {
    pub start_line: usize,
    pub end_line: usize,
}

impl FoldRange {
    pub fn new(start_line: usize, end_line: usize) -> Self {
        Self {
            start_line,
            end_line,
        }
    }

    /// Returns true if `line` is hidden by this fold.
    pub fn hides(&self, line: usize) -> bool {
        line > self.start_line && line <= self.end_line
    }
}

/// How model lines are projected into view lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewOptions {
    /// Hard wrap after this many chars. `None` disables wrapping.
    pub wrapping_column: Option<usize>,
    pub folds: Vec<FoldRange>,
}

/// The block of view lines currently shown on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// First shown view line (1-based).
    pub first_line: usize,
    /// Number of view lines shown.
    pub height: usize,
}

/// Precomputed mapping between model lines and view lines.
#[derive(Debug, Clone)]
pub struct ViewLayout {
    /// Number of view lines per model line (0 when folded away).
    view_lines_per_model: Vec<usize>,
    /// `view_offset[i]` = sum of `view_lines_per_model[0..i]`.
    view_offset: Vec<usize>,
    total_view_lines: usize,
    wrap_at: Option<usize>,
    viewport: Option<Viewport>,
}

impl ViewLayout {
    /// Builds the layout for the current contents of `model`.
    pub fn build(model: &TextModel, options: &ViewOptions) -> Self {
        let total_lines = model.line_count();
        let wrap_at = options.wrapping_column.filter(|w| *w > 0);
        let mut view_lines_per_model = Vec::with_capacity(total_lines);
        let mut view_offset = Vec::with_capacity(total_lines);
        let mut cumulative = 0usize;

        for line in 1..=total_lines {
            view_offset.push(cumulative);
            let hidden = options.folds.iter().any(|fold| fold.hides(line));
            let count = if hidden {
                0
            } else {
                let len = model.line_max_column(line) - 1;
                match wrap_at {
                    Some(w) if len > 0 => len.div_ceil(w),
                    _ => 1,
                }
            };
            view_lines_per_model.push(count);
            cumulative += count;
        }

        tracing::debug!(
            "Built view layout: {total_lines} model lines -> {cumulative} view lines \
             (wrap: {wrap_at:?}, folds: {})",
            options.folds.len()
        );

        Self {
            view_lines_per_model,
            view_offset,
            total_view_lines: cumulative.max(1),
            wrap_at,
            viewport: None,
        }
    }

    pub fn view_line_count(&self) -> usize {
        self.total_view_lines
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Sets the block of view lines shown on screen.
    pub fn set_viewport(&mut self, first_line: usize, height: usize) {
        self.viewport = Some(Viewport {
            first_line: first_line.max(1),
            height: height.max(1),
        });
    }

    pub fn with_viewport(mut self, first_line: usize, height: usize) -> Self {
        self.set_viewport(first_line, height);
        self
    }

    /// Converts a view line (1-based) into (model line index, wrap segment).
    fn locate(&self, view_line: usize) -> (usize, usize) {
        let idx = view_line.clamp(1, self.total_view_lines) - 1;
        let model_idx = self
            .view_offset
            .partition_point(|&offset| offset <= idx)
            .saturating_sub(1);
        let segment = idx.saturating_sub(self.view_offset.get(model_idx).copied().unwrap_or(0));
        (model_idx, segment)
    }

    fn segment_count(&self, model_idx: usize) -> usize {
        self.view_lines_per_model.get(model_idx).copied().unwrap_or(0)
    }

    /// Char offsets [start, end) of a wrap segment within a line of `len` chars.
    fn segment_bounds(&self, model_idx: usize, segment: usize, len: usize) -> (usize, usize) {
        match self.wrap_at {
            Some(w) => {
                let start = (segment * w).min(len);
                let end = if segment + 1 >= self.segment_count(model_idx) {
                    len
                } else {
                    ((segment + 1) * w).min(len)
                };
                (start, end)
            }
            None => (0, len),
        }
    }
}

/// Converts positions and ranges between model space and view space.
pub trait CoordinatesConverter {
    fn model_to_view_position(&self, model_position: Position) -> Position;

    fn view_to_model_position(&self, view_position: Position) -> Position;

    fn model_to_view_range(&self, model_range: Range) -> Range {
        Range::from_positions(
            self.model_to_view_position(model_range.start()),
            self.model_to_view_position(model_range.end()),
        )
    }

    fn view_to_model_range(&self, view_range: Range) -> Range {
        Range::from_positions(
            self.view_to_model_position(view_range.start()),
            self.view_to_model_position(view_range.end()),
        )
    }

    /// Keeps `view_position` if it still maps to `expected_model_position`,
    /// otherwise recomputes it from the model position.
    fn validate_view_position(
        &self,
        view_position: Position,
        expected_model_position: Position,
    ) -> Position;

    fn validate_view_range(&self, view_range: Range, expected_model_range: Range) -> Range {
        Range::from_positions(
            self.validate_view_position(view_range.start(), expected_model_range.start()),
            self.validate_view_position(view_range.end(), expected_model_range.end()),
        )
    }
}

/// The text model seen through a [`ViewLayout`].
#[derive(Debug, Clone, Copy)]
pub struct ViewModel<'a> {
    model: &'a TextModel,
    layout: &'a ViewLayout,
}

impl<'a> ViewModel<'a> {
    pub fn new(model: &'a TextModel, layout: &'a ViewLayout) -> Self {
        Self { model, layout }
    }

    pub fn layout(&self) -> &ViewLayout {
        self.layout
    }

    /// View range fully shown in the viewport; the whole view when no viewport is set.
    pub fn completely_visible_view_range(&self) -> Range {
        let count = self.line_count();
        let (first, last) = match self.layout.viewport {
            Some(vp) => {
                let first = vp.first_line.clamp(1, count);
                (first, first.saturating_add(vp.height - 1).min(count))
            }
            None => (1, count),
        };
        Range::new(first, self.line_min_column(first), last, self.line_max_column(last))
    }

    /// Model range behind [`Self::completely_visible_view_range`].
    pub fn completely_visible_model_range(&self) -> Range {
        self.view_to_model_range(self.completely_visible_view_range())
    }

    pub fn is_last_line_visible(&self) -> bool {
        self.completely_visible_view_range().end().line >= self.line_count()
    }

    fn line_len(&self, model_idx: usize) -> usize {
        self.model.line_max_column(model_idx + 1) - 1
    }
}

impl LineModel for ViewModel<'_> {
    fn line_count(&self) -> usize {
        self.layout.total_view_lines
    }

    fn line_content(&self, line: usize) -> String {
        if line == 0 || line > self.line_count() {
            return String::new();
        }
        let (model_idx, segment) = self.layout.locate(line);
        let content = self.model.line_content(model_idx + 1);
        let len = content.chars().count();
        let (start, end) = self.layout.segment_bounds(model_idx, segment, len);
        content.chars().skip(start).take(end - start).collect()
    }

    fn line_min_column(&self, _line: usize) -> usize {
        1
    }

    fn line_max_column(&self, line: usize) -> usize {
        if line == 0 || line > self.line_count() {
            return 1;
        }
        let (model_idx, segment) = self.layout.locate(line);
        let (start, end) = self
            .layout
            .segment_bounds(model_idx, segment, self.line_len(model_idx));
        end - start + 1
    }
}

impl CoordinatesConverter for ViewModel<'_> {
    fn model_to_view_position(&self, model_position: Position) -> Position {
        let position = self.model.validate_position(model_position);
        let model_idx = position.line - 1;
        let layout = self.layout;

        if model_idx >= layout.view_lines_per_model.len() {
            let last = self.line_count();
            return Position::new(last, self.line_max_column(last));
        }

        if layout.segment_count(model_idx) == 0 {
            // Folded away: land at the end of the nearest visible line above,
            // or the start of the one below.
            if let Some(prev) = (0..model_idx).rev().find(|&i| layout.segment_count(i) > 0) {
                let view_line = layout.view_offset[prev] + layout.segment_count(prev);
                return Position::new(view_line, self.line_max_column(view_line));
            }
            let view_line = (layout.view_offset[model_idx] + 1).min(self.line_count());
            return Position::new(view_line, 1);
        }

        let offset = position.column - 1;
        let segment = match layout.wrap_at {
            Some(w) => (offset / w).min(layout.segment_count(model_idx) - 1),
            None => 0,
        };
        let len = self.line_len(model_idx);
        let (start, _) = layout.segment_bounds(model_idx, segment, len);
        Position::new(
            layout.view_offset[model_idx] + segment + 1,
            offset - start + 1,
        )
    }

    fn view_to_model_position(&self, view_position: Position) -> Position {
        let view = self.normalize_position(view_position);
        let (model_idx, segment) = self.layout.locate(view.line);
        let (start, _) = self
            .layout
            .segment_bounds(model_idx, segment, self.line_len(model_idx));
        self.model
            .validate_position(Position::new(model_idx + 1, start + view.column))
    }

    fn validate_view_position(
        &self,
        view_position: Position,
        expected_model_position: Position,
    ) -> Position {
        let view = self.normalize_position(view_position);
        if self.view_to_model_position(view) == expected_model_position {
            view
        } else {
            self.model_to_view_position(expected_model_position)
        }
    }
}
