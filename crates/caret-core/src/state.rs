//! Per-cursor state in model and view coordinates.
//!
//! A cursor is described twice: once in model space (the raw text) and once
//! in view space (after wrapping and folding). Both descriptions share one
//! type, tagged with the space it lives in, so the two cannot be mixed up.

use std::fmt::Debug;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::position::{Position, Range, Selection};

/// Marker trait for a coordinate space.
pub trait Space: Debug + Clone + Copy + PartialEq + Eq + Default + 'static {}

/// Model space: positions in the text model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Model;

impl Space for Model {}

/// View space: positions after wrapping and folding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct View;

impl Space for View {}

/// The selection state of one cursor in one coordinate space.
///
/// The anchor is a range rather than a point: after a word or line selection
/// the whole word or line stays selected while the selection is extended in
/// either direction. `leftover_visible_columns` remembers how far the cursor
/// wanted to be to the right of where it ended up, so vertical movement
/// keeps its column across shorter lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SingleCursorState<S: Space> {
    selection_start: Range,
    selection_start_leftover_visible_columns: isize,
    position: Position,
    leftover_visible_columns: isize,
    selection: Selection,
    space: PhantomData<S>,
}

pub type ModelState = SingleCursorState<Model>;
pub type ViewState = SingleCursorState<View>;

impl<S: Space> SingleCursorState<S> {
    pub fn new(
        selection_start: Range,
        selection_start_leftover_visible_columns: isize,
        position: Position,
        leftover_visible_columns: isize,
    ) -> Self {
        Self {
            selection_start,
            selection_start_leftover_visible_columns,
            position,
            leftover_visible_columns,
            selection: compute_selection(selection_start, position),
            space: PhantomData,
        }
    }

    /// A caret with no selection at `position`.
    pub fn collapsed(position: Position) -> Self {
        Self::new(Range::collapsed(position), 0, position, 0)
    }

    /// The anchor range.
    pub fn selection_start(&self) -> Range {
        self.selection_start
    }

    pub fn selection_start_leftover_visible_columns(&self) -> isize {
        self.selection_start_leftover_visible_columns
    }

    /// The active end (where the caret is drawn).
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn leftover_visible_columns(&self) -> isize {
        self.leftover_visible_columns
    }

    /// The selection derived from the anchor range and the position.
    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty() || !self.selection_start.is_empty()
    }

    /// Moves the position. When `in_selection_mode` the anchor stays put,
    /// otherwise the anchor collapses onto the new position.
    pub fn move_to(
        &self,
        in_selection_mode: bool,
        line: usize,
        column: usize,
        leftover_visible_columns: isize,
    ) -> Self {
        let position = Position::new(line, column);
        if in_selection_mode {
            Self::new(
                self.selection_start,
                self.selection_start_leftover_visible_columns,
                position,
                leftover_visible_columns,
            )
        } else {
            Self::new(
                Range::collapsed(position),
                leftover_visible_columns,
                position,
                leftover_visible_columns,
            )
        }
    }
}

fn compute_selection(selection_start: Range, position: Position) -> Selection {
    if selection_start.is_empty() || !position.is_before_or_equal(&selection_start.start()) {
        Selection::new(selection_start.start(), position)
    } else {
        Selection::new(selection_start.end(), position)
    }
}

/// A cursor's state in both spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorState {
    pub model: ModelState,
    pub view: ViewState,
}

impl CursorState {
    pub fn new(model: ModelState, view: ViewState) -> Self {
        Self { model, view }
    }
}

/// The result of a cursor command: a new state in one space or both.
///
/// The space left out is derived from the other when the state is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartialCursorState {
    Model(ModelState),
    View(ViewState),
    Both(CursorState),
}

impl PartialCursorState {
    pub fn model_state(&self) -> Option<ModelState> {
        match self {
            Self::Model(model) => Some(*model),
            Self::Both(state) => Some(state.model),
            Self::View(_) => None,
        }
    }

    pub fn view_state(&self) -> Option<ViewState> {
        match self {
            Self::View(view) => Some(*view),
            Self::Both(state) => Some(state.view),
            Self::Model(_) => None,
        }
    }
}

impl From<CursorState> for PartialCursorState {
    fn from(state: CursorState) -> Self {
        Self::Both(state)
    }
}

/// A flat, serializable copy of a cursor's state in both spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCursorState {
    pub selection_start: Range,
    pub view_selection_start: Range,
    pub position: Position,
    pub view_position: Position,
    pub leftover_visible_columns: isize,
    pub selection_start_leftover_visible_columns: isize,
}

impl SavedCursorState {
    pub fn model_state(&self) -> ModelState {
        ModelState::new(
            self.selection_start,
            self.selection_start_leftover_visible_columns,
            self.position,
            self.leftover_visible_columns,
        )
    }

    pub fn view_state(&self) -> ViewState {
        ViewState::new(
            self.view_selection_start,
            self.selection_start_leftover_visible_columns,
            self.view_position,
            self.leftover_visible_columns,
        )
    }
}

impl From<&CursorState> for SavedCursorState {
    fn from(state: &CursorState) -> Self {
        Self {
            selection_start: state.model.selection_start(),
            view_selection_start: state.view.selection_start(),
            position: state.model.position(),
            view_position: state.view.position(),
            leftover_visible_columns: state.model.leftover_visible_columns(),
            selection_start_leftover_visible_columns: state
                .model
                .selection_start_leftover_visible_columns(),
        }
    }
}
