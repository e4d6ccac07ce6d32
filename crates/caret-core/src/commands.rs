//! Stateless multi-cursor commands.
//!
//! Each command reads the current cursor states and the context, and returns
//! the next state for every cursor without mutating anything. The caller
//! commits the results into its [`Cursor`](crate::cursor::Cursor)s.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::context::CursorContext;
use crate::lines::LineModel;
use crate::movement;
use crate::position::{Position, Range};
use crate::state::{CursorState, ModelState, PartialCursorState, ViewState};
use crate::view::CoordinatesConverter;
use crate::word::{self, WordNavigation};

// ── Arguments ───────────────────────────────────────────────────────

/// Where a move goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveDirection {
    #[serde(rename = "left")]
    Left,
    #[serde(rename = "right")]
    Right,
    #[serde(rename = "up")]
    Up,
    #[serde(rename = "down")]
    Down,
    #[serde(rename = "wrappedLineStart")]
    WrappedLineStart,
    #[serde(rename = "wrappedLineFirstNonWhitespaceCharacter")]
    WrappedLineFirstNonWhitespace,
    #[serde(rename = "wrappedLineColumnCenter")]
    WrappedLineCenter,
    #[serde(rename = "wrappedLineEnd")]
    WrappedLineEnd,
    #[serde(rename = "wrappedLineLastNonWhitespaceCharacter")]
    WrappedLineLastNonWhitespace,
    #[serde(rename = "viewPortTop")]
    ViewportTop,
    #[serde(rename = "viewPortBottom")]
    ViewportBottom,
    #[serde(rename = "viewPortCenter")]
    ViewportCenter,
    #[serde(rename = "viewPortIfOutside")]
    ViewportIfOutside,
}

/// Granularity of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MoveUnit {
    #[default]
    #[serde(skip)]
    None,
    #[serde(rename = "line")]
    ModelLine,
    #[serde(rename = "wrappedLine")]
    WrappedLine,
    #[serde(rename = "character")]
    Character,
    #[serde(rename = "halfLine")]
    HalfLine,
}

fn parse_tag<T: for<'de> Deserialize<'de>>(tag: &str) -> Result<T, serde_json::Error> {
    serde_json::from_value(serde_json::Value::String(tag.to_string()))
}

impl FromStr for MoveDirection {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_tag(s)
    }
}

impl FromStr for MoveUnit {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_tag(s)
    }
}

/// A validated move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorMoveArgs {
    pub direction: MoveDirection,
    pub unit: MoveUnit,
    pub select: bool,
    pub value: usize,
    /// Multiply vertical moves by the configured page size.
    pub is_paged: bool,
}

impl CursorMoveArgs {
    pub fn new(direction: MoveDirection) -> Self {
        Self {
            direction,
            unit: MoveUnit::None,
            select: false,
            value: 1,
            is_paged: false,
        }
    }

    pub fn by(mut self, unit: MoveUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn select(mut self, select: bool) -> Self {
        self.select = select;
        self
    }

    pub fn value(mut self, value: usize) -> Self {
        self.value = value.max(1);
        self
    }

    pub fn paged(mut self, is_paged: bool) -> Self {
        self.is_paged = is_paged;
        self
    }
}

/// A move request as it arrives from a key binding or script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawMoveArgs {
    pub to: Option<String>,
    pub by: Option<String>,
    pub value: Option<usize>,
    pub select: Option<bool>,
    pub paged: Option<bool>,
}

/// Validates a raw move request. `None` means the request is not a cursor
/// move this library handles (no target, or an unknown one).
///
/// An unknown unit falls back to [`MoveUnit::None`].
pub fn parse_move_args(raw: &RawMoveArgs) -> Option<CursorMoveArgs> {
    let direction = raw.to.as_deref()?.parse::<MoveDirection>().ok()?;
    let unit = raw
        .by
        .as_deref()
        .and_then(|by| by.parse::<MoveUnit>().ok())
        .unwrap_or_default();
    Some(CursorMoveArgs {
        direction,
        unit,
        select: raw.select.unwrap_or(false),
        value: raw.value.filter(|v| *v > 0).unwrap_or(1),
        is_paged: raw.paged.unwrap_or(false),
    })
}

/// Parses and runs a raw move request.
///
/// Returns `None` when the request is not handled here, which is different
/// from a handled move that happens to change nothing.
pub fn dispatch_move(
    ctx: &CursorContext<'_>,
    cursors: &[CursorState],
    raw: &RawMoveArgs,
) -> Option<Vec<PartialCursorState>> {
    match parse_move_args(raw) {
        Some(args) => Some(move_cursors(ctx, cursors, &args)),
        None => {
            tracing::debug!("Move request not handled: {raw:?}");
            None
        }
    }
}

// ── Move dispatcher ─────────────────────────────────────────────────

/// Runs a move for every cursor. Viewport-relative jumps only move the
/// primary (first) cursor and return a single state.
pub fn move_cursors(
    ctx: &CursorContext<'_>,
    cursors: &[CursorState],
    args: &CursorMoveArgs,
) -> Vec<PartialCursorState> {
    let select = args.select;
    let value = args.value.max(1);
    tracing::debug!(
        "Moving {} cursor(s) {:?} by {:?} x{value}",
        cursors.len(),
        args.direction,
        args.unit
    );

    match args.direction {
        MoveDirection::Left => match args.unit {
            MoveUnit::HalfLine => move_half_line_left(ctx, cursors, select),
            _ => move_left(ctx, cursors, select, value),
        },
        MoveDirection::Right => match args.unit {
            MoveUnit::HalfLine => move_half_line_right(ctx, cursors, select),
            _ => move_right(ctx, cursors, select, value),
        },
        MoveDirection::Up | MoveDirection::Down => {
            let lines = if args.is_paged {
                value.saturating_mul(ctx.config().page_size)
            } else {
                value
            };
            let up = args.direction == MoveDirection::Up;
            match (args.unit, up) {
                (MoveUnit::WrappedLine, true) => move_up(ctx, cursors, select, lines),
                (MoveUnit::WrappedLine, false) => move_down(ctx, cursors, select, lines),
                (_, true) => move_up_by_model_lines(ctx, cursors, select, lines),
                (_, false) => move_down_by_model_lines(ctx, cursors, select, lines),
            }
        }
        MoveDirection::WrappedLineStart => {
            move_on_view_line(ctx, cursors, select, |view, line| view.line_min_column(line))
        }
        MoveDirection::WrappedLineFirstNonWhitespace => {
            move_on_view_line(ctx, cursors, select, |view, line| {
                view.line_first_non_whitespace_column(line)
                    .unwrap_or_else(|| view.line_min_column(line))
            })
        }
        MoveDirection::WrappedLineCenter => move_on_view_line(ctx, cursors, select, |view, line| {
            (view.line_min_column(line) + view.line_max_column(line)).div_ceil(2)
        }),
        MoveDirection::WrappedLineEnd => {
            move_on_view_line(ctx, cursors, select, |view, line| view.line_max_column(line))
        }
        MoveDirection::WrappedLineLastNonWhitespace => {
            move_on_view_line(ctx, cursors, select, |view, line| {
                view.line_last_non_whitespace_column(line)
                    .unwrap_or_else(|| view.line_min_column(line))
            })
        }
        MoveDirection::ViewportTop => {
            let visible = ctx.visible_range();
            let line = first_line_in_range(ctx, &visible, value);
            move_primary_to_model_line(ctx, cursors, select, line)
        }
        MoveDirection::ViewportBottom => {
            let visible = ctx.visible_range();
            let line = last_line_in_range(ctx, &visible, value);
            move_primary_to_model_line(ctx, cursors, select, line)
        }
        MoveDirection::ViewportCenter => {
            let visible = ctx.visible_range();
            let line = (visible.start().line + visible.end().line).div_ceil(2);
            move_primary_to_model_line(ctx, cursors, select, line)
        }
        MoveDirection::ViewportIfOutside => ensure_in_viewport(ctx, cursors, select),
    }
}

/// First line of `range` counting only completely covered lines, offset by `count - 1`.
fn first_line_in_range(ctx: &CursorContext<'_>, range: &Range, count: usize) -> usize {
    let start_line = covered_start_line(ctx, range);
    range.end().line.min(start_line.saturating_add(count - 1))
}

/// Last line of `range`, moved up by `count - 1` but never above its first covered line.
fn last_line_in_range(ctx: &CursorContext<'_>, range: &Range, count: usize) -> usize {
    let start_line = covered_start_line(ctx, range);
    start_line.max((range.end().line + 1).saturating_sub(count))
}

fn covered_start_line(ctx: &CursorContext<'_>, range: &Range) -> usize {
    let start = range.start();
    if start.column != ctx.model().line_min_column(start.line) {
        start.line + 1
    } else {
        start.line
    }
}

fn move_primary_to_model_line(
    ctx: &CursorContext<'_>,
    cursors: &[CursorState],
    in_selection_mode: bool,
    line: usize,
) -> Vec<PartialCursorState> {
    let Some(primary) = cursors.first() else {
        return Vec::new();
    };
    let model = ctx.model();
    let column = model
        .line_first_non_whitespace_column(line)
        .unwrap_or_else(|| model.line_min_column(line));
    vec![PartialCursorState::Model(
        primary.model.move_to(in_selection_mode, line, column, 0),
    )]
}

/// Moves cursors that left the viewport back into it. Cursors already inside
/// are returned unchanged.
pub fn ensure_in_viewport(
    ctx: &CursorContext<'_>,
    cursors: &[CursorState],
    in_selection_mode: bool,
) -> Vec<PartialCursorState> {
    let visible = ctx.visible_view_range();
    let view = ctx.view_model();
    let top = visible.start().line;
    // Keep one line of margin at the bottom edge.
    let bottom = visible.end().line.saturating_sub(1).max(top);

    cursors
        .iter()
        .map(|cursor| {
            let line = cursor.view.position().line;
            if (top..=bottom).contains(&line) {
                return PartialCursorState::Both(*cursor);
            }
            let line = line.clamp(top, bottom);
            let column = view
                .line_first_non_whitespace_column(line)
                .unwrap_or_else(|| view.line_min_column(line));
            PartialCursorState::View(cursor.view.move_to(in_selection_mode, line, column, 0))
        })
        .collect()
}

// ── Horizontal ──────────────────────────────────────────────────────

pub fn move_left(
    ctx: &CursorContext<'_>,
    cursors: &[CursorState],
    in_selection_mode: bool,
    columns: usize,
) -> Vec<PartialCursorState> {
    let view = ctx.view_model();
    let has_multiple_cursors = cursors.len() > 1;

    cursors
        .iter()
        .map(|cursor| {
            let skip_wrapping_point_stop = has_multiple_cursors || !cursor.view.has_selection();
            let current = cursor.view.position();
            let mut moved = movement::move_left(&view, &cursor.view, in_selection_mode, columns);

            if skip_wrapping_point_stop
                && columns == 1
                && current.column == view.line_min_column(current.line)
                && moved.position().line != current.line
            {
                // Two view positions share one model position at a wrap point.
                let model_position = view.view_to_model_position(moved.position());
                if model_position.line == cursor.model.position().line {
                    moved = movement::move_left(&view, &moved, in_selection_mode, 1);
                }
            }
            PartialCursorState::View(moved)
        })
        .collect()
}

pub fn move_right(
    ctx: &CursorContext<'_>,
    cursors: &[CursorState],
    in_selection_mode: bool,
    columns: usize,
) -> Vec<PartialCursorState> {
    let view = ctx.view_model();
    let has_multiple_cursors = cursors.len() > 1;

    cursors
        .iter()
        .map(|cursor| {
            let skip_wrapping_point_stop = has_multiple_cursors || !cursor.view.has_selection();
            let current = cursor.view.position();
            let mut moved = movement::move_right(&view, &cursor.view, in_selection_mode, columns);

            if skip_wrapping_point_stop
                && columns == 1
                && current.column == view.line_max_column(current.line)
                && moved.position().line != current.line
            {
                let model_position = view.view_to_model_position(moved.position());
                if model_position.line == cursor.model.position().line {
                    moved = movement::move_right(&view, &moved, in_selection_mode, 1);
                }
            }
            PartialCursorState::View(moved)
        })
        .collect()
}

fn half_line(ctx: &CursorContext<'_>, cursor: &CursorState) -> usize {
    let line = cursor.view.position().line;
    ctx.view_model().line_content(line).chars().count().div_ceil(2)
}

pub fn move_half_line_left(
    ctx: &CursorContext<'_>,
    cursors: &[CursorState],
    in_selection_mode: bool,
) -> Vec<PartialCursorState> {
    let view = ctx.view_model();
    cursors
        .iter()
        .map(|cursor| {
            let columns = half_line(ctx, cursor);
            PartialCursorState::View(movement::move_left(
                &view,
                &cursor.view,
                in_selection_mode,
                columns,
            ))
        })
        .collect()
}

pub fn move_half_line_right(
    ctx: &CursorContext<'_>,
    cursors: &[CursorState],
    in_selection_mode: bool,
) -> Vec<PartialCursorState> {
    let view = ctx.view_model();
    cursors
        .iter()
        .map(|cursor| {
            let columns = half_line(ctx, cursor);
            PartialCursorState::View(movement::move_right(
                &view,
                &cursor.view,
                in_selection_mode,
                columns,
            ))
        })
        .collect()
}

// ── Vertical ────────────────────────────────────────────────────────

/// Moves up by view (wrapped) lines.
pub fn move_up(
    ctx: &CursorContext<'_>,
    cursors: &[CursorState],
    in_selection_mode: bool,
    lines: usize,
) -> Vec<PartialCursorState> {
    let view = ctx.view_model();
    cursors
        .iter()
        .map(|cursor| {
            PartialCursorState::View(movement::move_up(
                ctx.config(),
                &view,
                &cursor.view,
                in_selection_mode,
                lines,
            ))
        })
        .collect()
}

/// Moves down by view (wrapped) lines.
pub fn move_down(
    ctx: &CursorContext<'_>,
    cursors: &[CursorState],
    in_selection_mode: bool,
    lines: usize,
) -> Vec<PartialCursorState> {
    let view = ctx.view_model();
    cursors
        .iter()
        .map(|cursor| {
            PartialCursorState::View(movement::move_down(
                ctx.config(),
                &view,
                &cursor.view,
                in_selection_mode,
                lines,
            ))
        })
        .collect()
}

pub fn move_up_by_model_lines(
    ctx: &CursorContext<'_>,
    cursors: &[CursorState],
    in_selection_mode: bool,
    lines: usize,
) -> Vec<PartialCursorState> {
    cursors
        .iter()
        .map(|cursor| {
            PartialCursorState::Model(movement::move_up(
                ctx.config(),
                ctx.model(),
                &cursor.model,
                in_selection_mode,
                lines,
            ))
        })
        .collect()
}

pub fn move_down_by_model_lines(
    ctx: &CursorContext<'_>,
    cursors: &[CursorState],
    in_selection_mode: bool,
    lines: usize,
) -> Vec<PartialCursorState> {
    cursors
        .iter()
        .map(|cursor| {
            PartialCursorState::Model(movement::move_down(
                ctx.config(),
                ctx.model(),
                &cursor.model,
                in_selection_mode,
                lines,
            ))
        })
        .collect()
}

fn move_on_view_line<F>(
    ctx: &CursorContext<'_>,
    cursors: &[CursorState],
    in_selection_mode: bool,
    column_of: F,
) -> Vec<PartialCursorState>
where
    F: Fn(&crate::view::ViewModel<'_>, usize) -> usize,
{
    let view = ctx.view_model();
    cursors
        .iter()
        .map(|cursor| {
            let line = cursor.view.position().line;
            let column = column_of(&view, line);
            PartialCursorState::View(cursor.view.move_to(in_selection_mode, line, column, 0))
        })
        .collect()
}

// ── Lines and buffer ────────────────────────────────────────────────

/// Home. On a continuation line of a wrapped line, goes to the view line
/// start first; otherwise toggles on the model line.
pub fn move_to_beginning_of_line(
    ctx: &CursorContext<'_>,
    cursors: &[CursorState],
    in_selection_mode: bool,
) -> Vec<PartialCursorState> {
    let view = ctx.view_model();
    cursors
        .iter()
        .map(|cursor| {
            let view_position = cursor.view.position();
            let is_first_view_line = view_position.column == cursor.model.position().column;
            let first_non_blank = view.line_first_non_whitespace_column(view_position.line);
            let is_at_first_non_blank = Some(view_position.column) == first_non_blank;
            if !is_first_view_line && !is_at_first_non_blank {
                PartialCursorState::View(movement::move_to_beginning_of_line(
                    &view,
                    &cursor.view,
                    in_selection_mode,
                ))
            } else {
                PartialCursorState::Model(movement::move_to_beginning_of_line(
                    ctx.model(),
                    &cursor.model,
                    in_selection_mode,
                ))
            }
        })
        .collect()
}

/// End. Goes to the view line end first, then to the model line end.
pub fn move_to_end_of_line(
    ctx: &CursorContext<'_>,
    cursors: &[CursorState],
    in_selection_mode: bool,
) -> Vec<PartialCursorState> {
    let view = ctx.view_model();
    let model = ctx.model();
    cursors
        .iter()
        .map(|cursor| {
            let view_position = cursor.view.position();
            let view_max = view.line_max_column(view_position.line);
            let model_position = cursor.model.position();
            let model_max = model.line_max_column(model_position.line);
            let is_end_of_view_line = view_position.column == view_max;
            let is_last_view_line = view_max.saturating_sub(view_position.column)
                == model_max.saturating_sub(model_position.column);
            if is_end_of_view_line || is_last_view_line {
                PartialCursorState::Model(movement::move_to_end_of_line(
                    model,
                    &cursor.model,
                    in_selection_mode,
                ))
            } else {
                PartialCursorState::View(movement::move_to_end_of_line(
                    &view,
                    &cursor.view,
                    in_selection_mode,
                ))
            }
        })
        .collect()
}

pub fn move_to_beginning_of_buffer(
    ctx: &CursorContext<'_>,
    cursors: &[CursorState],
    in_selection_mode: bool,
) -> Vec<PartialCursorState> {
    cursors
        .iter()
        .map(|cursor| {
            PartialCursorState::Model(movement::move_to_beginning_of_buffer(
                ctx.model(),
                &cursor.model,
                in_selection_mode,
            ))
        })
        .collect()
}

pub fn move_to_end_of_buffer(
    ctx: &CursorContext<'_>,
    cursors: &[CursorState],
    in_selection_mode: bool,
) -> Vec<PartialCursorState> {
    cursors
        .iter()
        .map(|cursor| {
            PartialCursorState::Model(movement::move_to_end_of_buffer(
                ctx.model(),
                &cursor.model,
                in_selection_mode,
            ))
        })
        .collect()
}

// ── Words ───────────────────────────────────────────────────────────

pub fn move_word_left(
    ctx: &CursorContext<'_>,
    cursors: &[CursorState],
    in_selection_mode: bool,
    navigation: WordNavigation,
) -> Vec<PartialCursorState> {
    let classifier = &ctx.config().word_classifier;
    cursors
        .iter()
        .map(|cursor| {
            let target =
                word::move_word_left(classifier, ctx.model(), cursor.model.position(), navigation);
            PartialCursorState::Model(cursor.model.move_to(
                in_selection_mode,
                target.line,
                target.column,
                0,
            ))
        })
        .collect()
}

pub fn move_word_right(
    ctx: &CursorContext<'_>,
    cursors: &[CursorState],
    in_selection_mode: bool,
    navigation: WordNavigation,
) -> Vec<PartialCursorState> {
    let classifier = &ctx.config().word_classifier;
    cursors
        .iter()
        .map(|cursor| {
            let target =
                word::move_word_right(classifier, ctx.model(), cursor.model.position(), navigation);
            PartialCursorState::Model(cursor.model.move_to(
                in_selection_mode,
                target.line,
                target.column,
                0,
            ))
        })
        .collect()
}

/// Word selection (double click, then drag) at a model position.
pub fn word(
    ctx: &CursorContext<'_>,
    cursor: &CursorState,
    in_selection_mode: bool,
    position: Position,
) -> PartialCursorState {
    let position = ctx.model().validate_position(position);
    PartialCursorState::Model(word::word(
        &ctx.config().word_classifier,
        ctx.model(),
        &cursor.model,
        in_selection_mode,
        position,
    ))
}

// ── Single-cursor placement ─────────────────────────────────────────

/// The view position for `position`, preferring `view_position` when it
/// still maps to it.
fn resolve_view_position(
    ctx: &CursorContext<'_>,
    position: Position,
    view_position: Option<Position>,
) -> Position {
    match view_position {
        Some(view) => ctx.validate_view_position(view, position),
        None => ctx.to_view_position(position),
    }
}

/// Places the cursor at a model position (e.g. a mouse click).
pub fn move_to(
    ctx: &CursorContext<'_>,
    cursor: &CursorState,
    in_selection_mode: bool,
    position: Position,
    view_position: Option<Position>,
) -> PartialCursorState {
    let position = ctx.model().validate_position(position);
    let view = resolve_view_position(ctx, position, view_position);
    PartialCursorState::View(cursor.view.move_to(in_selection_mode, view.line, view.column, 0))
}

/// Collapses the selection onto the cursor position.
pub fn cancel_selection(cursor: &CursorState) -> PartialCursorState {
    if !cursor.model.has_selection() {
        return PartialCursorState::Both(*cursor);
    }
    PartialCursorState::View(ViewState::collapsed(cursor.view.position()))
}

/// Line selection (click in the gutter, then drag).
///
/// The first call selects the clicked line. While dragging, the selection
/// grows by whole lines away from the line where it started, and returning
/// to that line restores the original one-line selection.
pub fn line(
    ctx: &CursorContext<'_>,
    cursor: &CursorState,
    in_selection_mode: bool,
    position: Position,
    view_position: Option<Position>,
) -> PartialCursorState {
    let model = ctx.model();
    let position = model.validate_position(position);
    let view_position = resolve_view_position(ctx, position, view_position);

    if !in_selection_mode || !cursor.model.has_selection() {
        let line_count = model.line_count();
        let (end_line, end_column) = if position.line + 1 > line_count {
            (line_count, model.line_max_column(line_count))
        } else {
            (position.line + 1, 1)
        };
        return PartialCursorState::Model(ModelState::new(
            Range::new(position.line, 1, end_line, end_column),
            0,
            Position::new(end_line, end_column),
            0,
        ));
    }

    let has_selection = cursor.model.has_selection();
    let entering_line = cursor.model.selection_start().start().line;
    if position.line < entering_line {
        PartialCursorState::View(cursor.view.move_to(has_selection, view_position.line, 1, 0))
    } else if position.line > entering_line {
        let view = ctx.view_model();
        let line_count = view.line_count();
        let (line, column) = if view_position.line + 1 > line_count {
            (line_count, view.line_max_column(line_count))
        } else {
            (view_position.line + 1, 1)
        };
        PartialCursorState::View(cursor.view.move_to(has_selection, line, column, 0))
    } else {
        let end = cursor.model.selection_start().end();
        PartialCursorState::Model(cursor.model.move_to(has_selection, end.line, end.column, 0))
    }
}

/// Grows each selection to whole lines, or by one more line if it already is.
pub fn expand_line_selection(
    ctx: &CursorContext<'_>,
    cursors: &[CursorState],
) -> Vec<PartialCursorState> {
    let model = ctx.model();
    let line_count = model.line_count();
    cursors
        .iter()
        .map(|cursor| {
            let selection = cursor.model.selection();
            let start_line = selection.start().line;
            let end_line = selection.end().line;
            let (end_line, end_column) = if end_line == line_count {
                (line_count, model.line_max_column(line_count))
            } else {
                (end_line + 1, 1)
            };
            PartialCursorState::Model(ModelState::new(
                Range::new(start_line, 1, start_line, 1),
                0,
                Position::new(end_line, end_column),
                0,
            ))
        })
        .collect()
}

/// Selects everything. With an editable range, toggles between that range
/// and the whole document.
pub fn select_all(ctx: &CursorContext<'_>, cursor: &CursorState) -> PartialCursorState {
    let model = ctx.model();
    let full = model.full_range();
    let target = if model.has_editable_range() && ctx.config().select_all_toggles_editable_range {
        let editable = model.editable_range();
        if cursor.model.selection().to_range() == editable {
            full
        } else {
            editable
        }
    } else {
        full
    };
    PartialCursorState::Model(ModelState::new(
        Range::collapsed(target.start()),
        0,
        target.end(),
        0,
    ))
}

// ── Multi-cursor fan-out ────────────────────────────────────────────

/// Every cursor plus a copy one line above. Duplicates are left to the caller.
pub fn add_cursor_up(
    ctx: &CursorContext<'_>,
    cursors: &[CursorState],
    use_logical_line: bool,
) -> Vec<PartialCursorState> {
    let view = ctx.view_model();
    cursors
        .iter()
        .flat_map(|cursor| {
            let copy = if use_logical_line {
                PartialCursorState::Model(movement::translate_up(
                    ctx.config(),
                    ctx.model(),
                    &cursor.model,
                ))
            } else {
                PartialCursorState::View(movement::translate_up(ctx.config(), &view, &cursor.view))
            };
            [PartialCursorState::Both(*cursor), copy]
        })
        .collect()
}

/// Every cursor plus a copy one line below. Duplicates are left to the caller.
pub fn add_cursor_down(
    ctx: &CursorContext<'_>,
    cursors: &[CursorState],
    use_logical_line: bool,
) -> Vec<PartialCursorState> {
    let view = ctx.view_model();
    cursors
        .iter()
        .flat_map(|cursor| {
            let copy = if use_logical_line {
                PartialCursorState::Model(movement::translate_down(
                    ctx.config(),
                    ctx.model(),
                    &cursor.model,
                ))
            } else {
                PartialCursorState::View(movement::translate_down(
                    ctx.config(),
                    &view,
                    &cursor.view,
                ))
            };
            [PartialCursorState::Both(*cursor), copy]
        })
        .collect()
}
