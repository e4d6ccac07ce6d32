//! Cursor commands given on the command line as JSON objects.
use anyhow::{Context, Result};
use caret_core::commands::{self, RawMoveArgs};
use caret_core::{
    Cursor, CursorContext, CursorState, EditorState, PartialCursorState, Position, Selection,
    WordNavigation,
};
use serde::Deserialize;

/// One scripted command, tagged by its `command` field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum ScriptCommand {
    /// `{"command": "cursorMove", "to": "down", "by": "wrappedLine", "value": 2}`
    CursorMove(RawMoveArgs),
    WordLeft {
        #[serde(default)]
        select: bool,
        /// Stop at word ends instead of word starts.
        #[serde(default)]
        end: bool,
    },
    WordRight {
        #[serde(default)]
        select: bool,
        #[serde(default)]
        end: bool,
    },
    Home {
        #[serde(default)]
        select: bool,
    },
    End {
        #[serde(default)]
        select: bool,
    },
    Top {
        #[serde(default)]
        select: bool,
    },
    Bottom {
        #[serde(default)]
        select: bool,
    },
    MoveTo {
        line: usize,
        column: usize,
        #[serde(default)]
        select: bool,
    },
    Word {
        line: usize,
        column: usize,
        #[serde(default)]
        select: bool,
    },
    Line {
        line: usize,
        column: usize,
        #[serde(default)]
        select: bool,
    },
    ExpandLineSelection,
    SelectAll,
    CancelSelection,
    AddCursorUp {
        #[serde(default)]
        logical: bool,
    },
    AddCursorDown {
        #[serde(default)]
        logical: bool,
    },
    /// Replaces the primary selection with `text`.
    Type { text: String },
}

pub fn parse(json: &str) -> Result<ScriptCommand> {
    serde_json::from_str(json).with_context(|| format!("Invalid command: {json}"))
}

fn navigation(end: bool) -> WordNavigation {
    if end {
        WordNavigation::WordEnd
    } else {
        WordNavigation::WordStart
    }
}

/// Computes the next cursor states. Commands that act on the primary cursor
/// return a single state.
fn run(
    ctx: &CursorContext<'_>,
    cursors: &[CursorState],
    command: &ScriptCommand,
) -> Result<Vec<PartialCursorState>> {
    let primary = cursors.first().context("There is no cursor to run the command on")?;
    let results = match command {
        ScriptCommand::CursorMove(raw) => commands::dispatch_move(ctx, cursors, raw)
            .with_context(|| format!("Unknown cursor move: {raw:?}"))?,
        ScriptCommand::WordLeft { select, end } => {
            commands::move_word_left(ctx, cursors, *select, navigation(*end))
        }
        ScriptCommand::WordRight { select, end } => {
            commands::move_word_right(ctx, cursors, *select, navigation(*end))
        }
        ScriptCommand::Home { select } => {
            commands::move_to_beginning_of_line(ctx, cursors, *select)
        }
        ScriptCommand::End { select } => commands::move_to_end_of_line(ctx, cursors, *select),
        ScriptCommand::Top { select } => {
            commands::move_to_beginning_of_buffer(ctx, cursors, *select)
        }
        ScriptCommand::Bottom { select } => commands::move_to_end_of_buffer(ctx, cursors, *select),
        ScriptCommand::MoveTo { line, column, select } => {
            vec![commands::move_to(ctx, primary, *select, Position::new(*line, *column), None)]
        }
        ScriptCommand::Word { line, column, select } => {
            vec![commands::word(ctx, primary, *select, Position::new(*line, *column))]
        }
        ScriptCommand::Line { line, column, select } => {
            vec![commands::line(ctx, primary, *select, Position::new(*line, *column), None)]
        }
        ScriptCommand::ExpandLineSelection => commands::expand_line_selection(ctx, cursors),
        ScriptCommand::SelectAll => vec![commands::select_all(ctx, primary)],
        ScriptCommand::CancelSelection => cursors.iter().map(commands::cancel_selection).collect(),
        ScriptCommand::AddCursorUp { logical } => commands::add_cursor_up(ctx, cursors, *logical),
        ScriptCommand::AddCursorDown { logical } => {
            commands::add_cursor_down(ctx, cursors, *logical)
        }
        ScriptCommand::Type { .. } => anyhow::bail!("Typing is not a cursor command"),
    };
    Ok(results)
}

/// Commits command results into the cursors. Extra results become new cursors.
pub fn apply_results(
    ctx: &mut CursorContext<'_>,
    cursors: &mut Vec<Cursor>,
    results: Vec<PartialCursorState>,
) -> Result<()> {
    while cursors.len() < results.len() {
        cursors.push(Cursor::new(ctx));
    }
    let mut changed = 0;
    for (cursor, state) in cursors.iter_mut().zip(results) {
        if cursor.commit(ctx, state)? {
            changed += 1;
        }
    }
    tracing::debug!("{changed} of {} cursor(s) changed", cursors.len());
    Ok(())
}

/// Runs one command against the editor and its cursors.
pub fn execute(
    editor: &mut EditorState,
    cursors: &mut Vec<Cursor>,
    command: &ScriptCommand,
) -> Result<()> {
    tracing::debug!("Executing {command:?}");
    if let ScriptCommand::Type { text } = command {
        return type_text(editor, cursors, text);
    }

    let mut ctx = editor.context();
    let states: Vec<CursorState> = cursors.iter().map(Cursor::state).collect();
    let results = run(&ctx, &states, command)?;
    apply_results(&mut ctx, cursors, results)
}

fn type_text(editor: &mut EditorState, cursors: &mut [Cursor], text: &str) -> Result<()> {
    let primary = cursors.first().context("There is no cursor to type at")?;
    let range = primary.model_state().selection().to_range();
    let inserted = editor.apply_edit(range, text)?;

    let mut ctx = editor.context();
    for (index, cursor) in cursors.iter_mut().enumerate() {
        let recovered = cursor.begin_recover_selection_from_markers(&ctx)?;
        // The primary ends up after the typed text.
        let selection = if index == 0 {
            Selection::caret(inserted.end())
        } else {
            recovered
        };
        cursor.end_recover_selection_from_markers(&mut ctx, selection)?;
    }
    Ok(())
}
