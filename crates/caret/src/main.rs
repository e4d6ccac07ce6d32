use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use caret_config::{EditorConfig, SessionStore};
use caret_core::{
    Cursor, CursorConfig, EditorState, FoldRange, LineModel, ModelState, Position, Range,
    TextModel, ViewOptions,
};
use clap::Parser;

mod script;

/// Runs multi-cursor commands over a text file and prints the resulting cursors.
#[derive(Parser, Debug)]
#[command(name = "caret", version, about)]
struct Cli {
    /// File to load.
    file: PathBuf,

    /// Config file to use instead of the one in the platform config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Wrap lines after this many chars.
    #[arg(long)]
    wrap: Option<usize>,

    /// Fold lines, as START:END. The start line stays visible.
    #[arg(long = "fold", value_name = "START:END", value_parser = parse_pair)]
    folds: Vec<(usize, usize)>,

    /// Visible view lines, as FIRST:HEIGHT.
    #[arg(long, value_name = "FIRST:HEIGHT", value_parser = parse_pair)]
    viewport: Option<(usize, usize)>,

    /// Restrict cursors to a block of lines, as FIRST:LAST.
    #[arg(long, value_name = "FIRST:LAST", value_parser = parse_pair)]
    editable: Option<(usize, usize)>,

    /// Place a cursor, as LINE:COL. The first one is the primary cursor.
    #[arg(long = "cursor", value_name = "LINE:COL", value_parser = parse_pair)]
    cursors: Vec<(usize, usize)>,

    /// Run a JSON command, e.g. '{"command":"cursorMove","to":"down"}'.
    #[arg(long = "cmd", value_name = "JSON")]
    commands: Vec<String>,

    /// Session database to restore cursors from and save them to.
    #[arg(long)]
    session: Option<PathBuf>,
}

fn parse_pair(s: &str) -> Result<(usize, usize), String> {
    let (a, b) = s
        .split_once(':')
        .ok_or_else(|| format!("expected two numbers separated by ':', got '{s}'"))?;
    let a = a.trim().parse().map_err(|e| format!("invalid number '{a}': {e}"))?;
    let b = b.trim().parse().map_err(|e| format!("invalid number '{b}': {e}"))?;
    Ok((a, b))
}

/// Session key for a file: its canonical path when it can be resolved.
fn document_key(path: &Path) -> String {
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

fn editable_lines(model: &TextModel, first: usize, last: usize) -> Range {
    let last = last.clamp(1, model.line_count());
    model.validate_range(Range::new(first, 1, last, model.line_max_column(last)))
}

/// Cursors given on the command line, else the saved session, else one caret at the start.
fn initial_cursors(
    editor: &mut EditorState,
    positions: &[(usize, usize)],
    store: Option<&SessionStore>,
    doc_key: &str,
) -> Result<Vec<Cursor>> {
    let mut ctx = editor.context();
    if positions.is_empty() {
        if let Some(store) = store {
            let restored = caret_core::session::restore_cursors(store, doc_key, &mut ctx)?;
            if !restored.is_empty() {
                return Ok(restored);
            }
        }
    }

    let positions = if positions.is_empty() { &[(1, 1)][..] } else { positions };
    let mut cursors = Vec::with_capacity(positions.len());
    for &(line, column) in positions {
        let mut cursor = Cursor::new(&mut ctx);
        cursor.set_state(
            &mut ctx,
            Some(ModelState::collapsed(Position::new(line, column))),
            None,
            true,
        )?;
        cursors.push(cursor);
    }
    Ok(cursors)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(EditorConfig::config_path);
    let config = EditorConfig::load_or_create(&config_path);

    let text = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("Failed to read {}", cli.file.display()))?;
    tracing::info!("Loaded {} ({} bytes)", cli.file.display(), text.len());

    let options = ViewOptions {
        wrapping_column: cli.wrap.or(config.wrapping_column),
        folds: cli
            .folds
            .iter()
            .map(|&(start, end)| FoldRange::new(start, end))
            .collect(),
    };
    let mut editor = EditorState::new(
        TextModel::from(text.as_str()),
        options,
        CursorConfig::from(&config),
    );
    let (first_line, height) = cli.viewport.unwrap_or((1, config.viewport_height));
    editor.set_viewport(first_line, height);
    if let Some((first, last)) = cli.editable {
        let range = editable_lines(editor.model(), first, last);
        editor.set_editable_range(Some(range));
    }

    let doc_key = document_key(&cli.file);
    let store = cli.session.as_deref().map(SessionStore::open).transpose()?;
    let mut cursors = initial_cursors(&mut editor, &cli.cursors, store.as_ref(), &doc_key)?;

    for json in &cli.commands {
        let command = script::parse(json)?;
        script::execute(&mut editor, &mut cursors, &command)?;
    }

    for cursor in &cursors {
        println!("{}", serde_json::to_string(&cursor.save_state())?);
    }

    if let Some(store) = &store {
        caret_core::session::save_cursors(store, &doc_key, &cursors)?;
        tracing::info!("Saved {} cursor(s) for {doc_key}", cursors.len());
    }

    Ok(())
}
