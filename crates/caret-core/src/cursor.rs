/// A single cursor: its state in both coordinate spaces plus the two markers
/// that carry its selection through document edits.
use anyhow::{Context, Result};

use crate::context::CursorContext;
use crate::lines::LineModel;
use crate::model::{MarkerId, TextModel};
use crate::position::{Position, Range, Selection, SelectionDirection};
use crate::state::{CursorState, ModelState, PartialCursorState, SavedCursorState, ViewState};
use crate::view::{CoordinatesConverter, ViewModel};

/// One cursor owned by the outer cursor collection.
///
/// The model and view states are always consistent with each other. The
/// selection start marker sticks to the previous char and the end marker does
/// not, so text typed at an empty selection ends up before the end marker.
#[derive(Debug)]
pub struct Cursor {
    model_state: ModelState,
    view_state: ViewState,
    start_marker: MarkerId,
    end_marker: MarkerId,
}

impl Cursor {
    /// Creates a caret at the start of the document.
    pub fn new(ctx: &mut CursorContext<'_>) -> Self {
        let origin = Position::default();
        let model = ctx.model_mut();
        let start_marker = model.add_marker(origin, true);
        let end_marker = model.add_marker(origin, false);
        Self {
            model_state: ModelState::collapsed(origin),
            view_state: ViewState::collapsed(origin),
            start_marker,
            end_marker,
        }
    }

    pub fn model_state(&self) -> &ModelState {
        &self.model_state
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view_state
    }

    pub fn state(&self) -> CursorState {
        CursorState::new(self.model_state, self.view_state)
    }

    /// Direction of the current model selection.
    pub fn direction(&self) -> SelectionDirection {
        self.model_state.selection().direction()
    }

    /// Validates and commits a new state.
    ///
    /// Missing spaces are derived from the given ones. Returns `Ok(false)`
    /// without touching anything when the validated state equals the current one.
    ///
    /// # Errors
    ///
    /// Returns an error if one of this cursor's markers is missing from the model.
    pub fn set_state(
        &mut self,
        ctx: &mut CursorContext<'_>,
        model_state: Option<ModelState>,
        view_state: Option<ViewState>,
        clamp_to_editable_range: bool,
    ) -> Result<bool> {
        let Some((model_state, view_state)) =
            resolve_state(ctx, model_state, view_state, clamp_to_editable_range)
        else {
            return Ok(false);
        };

        if model_state == self.model_state && view_state == self.view_state {
            return Ok(false);
        }

        self.model_state = model_state;
        self.view_state = view_state;
        self.place_markers(ctx.model_mut())?;
        Ok(true)
    }

    /// Applies a command result.
    ///
    /// # Errors
    ///
    /// Returns an error if one of this cursor's markers is missing from the model.
    pub fn commit(
        &mut self,
        ctx: &mut CursorContext<'_>,
        state: PartialCursorState,
    ) -> Result<bool> {
        self.set_state(ctx, state.model_state(), state.view_state(), false)
    }

    /// Re-validates the current state, e.g. after the layout changed.
    ///
    /// # Errors
    ///
    /// Returns an error if one of this cursor's markers is missing from the model.
    pub fn ensure_valid_state(&mut self, ctx: &mut CursorContext<'_>) -> Result<bool> {
        self.set_state(ctx, Some(self.model_state), Some(self.view_state), false)
    }

    pub fn save_state(&self) -> SavedCursorState {
        SavedCursorState::from(&self.state())
    }

    /// # Errors
    ///
    /// Returns an error if one of this cursor's markers is missing from the model.
    pub fn restore_state(
        &mut self,
        ctx: &mut CursorContext<'_>,
        saved: &SavedCursorState,
    ) -> Result<bool> {
        self.set_state(ctx, Some(saved.model_state()), Some(saved.view_state()), false)
    }

    /// Reads the selection back from the markers after the document changed.
    ///
    /// The pre-edit direction is kept. A caret stays a caret: if text was
    /// typed at it, the result collapses to the end of the inserted text.
    ///
    /// # Errors
    ///
    /// Returns an error if one of this cursor's markers is missing from the model.
    pub fn begin_recover_selection_from_markers(
        &self,
        ctx: &CursorContext<'_>,
    ) -> Result<Selection> {
        let model = ctx.model();
        let start = model
            .marker_position(self.start_marker)
            .context("Selection start marker is gone")?;
        let end = model
            .marker_position(self.end_marker)
            .context("Selection end marker is gone")?;
        let range = Range::from_positions(start, end);

        let previous = self.model_state.selection();
        let recovered = if previous.is_empty() && !range.is_empty() {
            Selection::caret(range.end())
        } else {
            Selection::from_range(range, previous.direction())
        };
        tracing::debug!("Recovered selection {recovered} (was {previous})");
        Ok(recovered)
    }

    /// Commits a recovered (and possibly adjusted) selection.
    ///
    /// # Errors
    ///
    /// Returns an error if one of this cursor's markers is missing from the model.
    pub fn end_recover_selection_from_markers(
        &mut self,
        ctx: &mut CursorContext<'_>,
        selection: Selection,
    ) -> Result<bool> {
        let model_state = ModelState::new(Range::collapsed(selection.anchor), 0, selection.head, 0);
        self.set_state(ctx, Some(model_state), None, false)
    }

    /// Releases both markers.
    ///
    /// # Errors
    ///
    /// Returns an error if a marker was already removed from the model.
    pub fn dispose(self, ctx: &mut CursorContext<'_>) -> Result<()> {
        let model = ctx.model_mut();
        model.remove_marker(self.start_marker)?;
        model.remove_marker(self.end_marker)?;
        Ok(())
    }

    fn place_markers(&self, model: &mut TextModel) -> Result<()> {
        let selection = self.model_state.selection();
        model.change_marker(self.start_marker, selection.start())?;
        model.change_marker_stickiness(self.start_marker, true)?;
        model.change_marker(self.end_marker, selection.end())?;
        model.change_marker_stickiness(self.end_marker, false)?;
        Ok(())
    }
}

/// Validates whatever was given and derives the missing space.
fn resolve_state(
    ctx: &CursorContext<'_>,
    model_state: Option<ModelState>,
    view_state: Option<ViewState>,
    clamp_to_editable_range: bool,
) -> Option<(ModelState, ViewState)> {
    let view_model = ctx.view_model();
    let model = ctx.model();
    let view_state = view_state.map(|state| normalize_view_state(&view_model, &state));

    let mut model_state = match (model_state, view_state) {
        (Some(state), _) => validate_model_state(model, &state),
        (None, Some(view)) => ModelState::new(
            model.validate_range(view_model.view_to_model_range(view.selection_start())),
            view.selection_start_leftover_visible_columns(),
            model.validate_position(view_model.view_to_model_position(view.position())),
            view.leftover_visible_columns(),
        ),
        (None, None) => return None,
    };

    if clamp_to_editable_range && model.has_editable_range() {
        model_state = clamp_model_state(&model.editable_range(), &model_state);
    }

    let view_state = match view_state {
        None => ViewState::new(
            view_model.model_to_view_range(model_state.selection_start()),
            model_state.selection_start_leftover_visible_columns(),
            view_model.model_to_view_position(model_state.position()),
            model_state.leftover_visible_columns(),
        ),
        Some(view) => ViewState::new(
            view_model.validate_view_range(view.selection_start(), model_state.selection_start()),
            model_state.selection_start_leftover_visible_columns(),
            view_model.validate_view_position(view.position(), model_state.position()),
            model_state.leftover_visible_columns(),
        ),
    };

    Some((model_state, view_state))
}

/// Snaps a view state into the view. Columns lost to snapping move into the
/// leftover so vertical movement still aims for the original column.
fn normalize_view_state(view_model: &ViewModel<'_>, state: &ViewState) -> ViewState {
    let position = state.position();
    let start = state.selection_start().start();
    let end = state.selection_start().end();
    let valid_position = view_model.normalize_position(position);
    let valid_start = view_model.normalize_position(start);
    let valid_end = view_model.normalize_position(end);

    if position == valid_position && start == valid_start && end == valid_end {
        return *state;
    }
    ViewState::new(
        Range::from_positions(valid_start, valid_end),
        state.selection_start_leftover_visible_columns() + column_delta(start, valid_start),
        valid_position,
        state.leftover_visible_columns() + column_delta(position, valid_position),
    )
}

fn column_delta(original: Position, valid: Position) -> isize {
    original.column as isize - valid.column as isize
}

/// Clamps a model state into the document. Leftover columns survive only
/// for coordinates that were already valid.
fn validate_model_state(model: &TextModel, state: &ModelState) -> ModelState {
    let selection_start = model.validate_range(state.selection_start());
    let position = model.validate_position(state.position());
    ModelState::new(
        selection_start,
        if selection_start == state.selection_start() {
            state.selection_start_leftover_visible_columns()
        } else {
            0
        },
        position,
        if position == state.position() {
            state.leftover_visible_columns()
        } else {
            0
        },
    )
}

fn clamp_into(range: &Range, position: Position) -> Position {
    position.clamp(range.start(), range.end())
}

/// Keeps both the anchor range and the position inside `editable`.
fn clamp_model_state(editable: &Range, state: &ModelState) -> ModelState {
    let anchor = state.selection_start();
    let selection_start = Range::from_positions(
        clamp_into(editable, anchor.start()),
        clamp_into(editable, anchor.end()),
    );
    let position = clamp_into(editable, state.position());
    ModelState::new(
        selection_start,
        if selection_start == anchor {
            state.selection_start_leftover_visible_columns()
        } else {
            0
        },
        position,
        if position == state.position() {
            state.leftover_visible_columns()
        } else {
            0
        },
    )
}

impl From<&Cursor> for SavedCursorState {
    fn from(cursor: &Cursor) -> Self {
        cursor.save_state()
    }
}
