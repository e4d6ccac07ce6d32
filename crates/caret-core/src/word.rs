//! Word boundaries on a single line, word navigation, and word selection.
//!
//! Offsets in [`WordInfo`] are 0-based char indices into the line; positions
//! are 1-based as everywhere else.

use std::collections::HashSet;

use crate::lines::{is_blank, LineModel};
use crate::position::{Position, Range};
use crate::state::ModelState;

/// How a char takes part in word boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordCharClass {
    Regular,
    Whitespace,
    Separator,
}

/// Classifies chars using a configurable set of separators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordClassifier {
    separators: HashSet<char>,
}

impl WordClassifier {
    pub fn new(separators: &str) -> Self {
        Self {
            separators: separators.chars().filter(|c| !is_blank(*c)).collect(),
        }
    }

    pub fn classify(&self, ch: char) -> WordCharClass {
        if is_blank(ch) {
            WordCharClass::Whitespace
        } else if self.separators.contains(&ch) {
            WordCharClass::Separator
        } else {
            WordCharClass::Regular
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordKind {
    /// A run of regular chars.
    Regular,
    /// A run of separator chars.
    Separator,
}

/// Where word navigation stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordNavigation {
    WordStart,
    WordEnd,
}

/// A word found on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordInfo {
    pub start: usize,
    /// Exclusive.
    pub end: usize,
    pub kind: WordKind,
    /// Class of the char that stopped the scan.
    pub next_char_class: WordCharClass,
}

fn ends_word(kind: WordKind, class: WordCharClass) -> bool {
    match class {
        WordCharClass::Whitespace => true,
        WordCharClass::Separator => kind == WordKind::Regular,
        WordCharClass::Regular => kind == WordKind::Separator,
    }
}

fn find_end_of_word(
    chars: &[char],
    classifier: &WordClassifier,
    kind: WordKind,
    start: usize,
) -> usize {
    (start..chars.len())
        .find(|&idx| ends_word(kind, classifier.classify(chars[idx])))
        .unwrap_or(chars.len())
}

fn find_start_of_word(
    chars: &[char],
    classifier: &WordClassifier,
    kind: WordKind,
    from: usize,
) -> usize {
    (0..=from.min(chars.len().saturating_sub(1)))
        .rev()
        .find(|&idx| ends_word(kind, classifier.classify(chars[idx])))
        .map(|idx| idx + 1)
        .unwrap_or(0)
}

/// Class a char contributes to a word, or `None` for whitespace.
fn word_kind(class: WordCharClass) -> Option<WordKind> {
    match class {
        WordCharClass::Regular => Some(WordKind::Regular),
        WordCharClass::Separator => Some(WordKind::Separator),
        WordCharClass::Whitespace => None,
    }
}

/// Finds the word ending at or before `position` on its line.
pub fn find_previous_word_on_line<M: LineModel + ?Sized>(
    classifier: &WordClassifier,
    model: &M,
    position: Position,
) -> Option<WordInfo> {
    let chars: Vec<char> = model.line_content(position.line).chars().collect();
    let upper = position.column.saturating_sub(1).min(chars.len());
    let mut current: Option<WordKind> = None;

    for idx in (0..upper).rev() {
        let class = classifier.classify(chars[idx]);
        if let Some(kind) = current {
            if ends_word(kind, class) {
                return Some(WordInfo {
                    start: idx + 1,
                    end: find_end_of_word(&chars, classifier, kind, idx + 1),
                    kind,
                    next_char_class: class,
                });
            }
        }
        if let Some(kind) = word_kind(class) {
            current = Some(kind);
        }
    }

    current.map(|kind| WordInfo {
        start: 0,
        end: find_end_of_word(&chars, classifier, kind, 0),
        kind,
        next_char_class: WordCharClass::Whitespace,
    })
}

/// Finds the word starting at or after `position` on its line.
pub fn find_next_word_on_line<M: LineModel + ?Sized>(
    classifier: &WordClassifier,
    model: &M,
    position: Position,
) -> Option<WordInfo> {
    let chars: Vec<char> = model.line_content(position.line).chars().collect();
    let mut current: Option<WordKind> = None;

    for idx in position.column.saturating_sub(1)..chars.len() {
        let class = classifier.classify(chars[idx]);
        if let Some(kind) = current {
            if ends_word(kind, class) {
                return Some(WordInfo {
                    start: find_start_of_word(&chars, classifier, kind, idx - 1),
                    end: idx,
                    kind,
                    next_char_class: class,
                });
            }
        }
        if let Some(kind) = word_kind(class) {
            current = Some(kind);
        }
    }

    current.map(|kind| WordInfo {
        start: find_start_of_word(&chars, classifier, kind, chars.len() - 1),
        end: chars.len(),
        kind,
        next_char_class: WordCharClass::Whitespace,
    })
}

/// A lone separator directly attached to a regular word (the `.` in `a.b`).
fn is_glued_separator(word: &WordInfo) -> bool {
    word.kind == WordKind::Separator
        && word.end - word.start == 1
        && word.next_char_class == WordCharClass::Regular
}

/// Position reached by one word step to the left.
pub fn move_word_left<M: LineModel + ?Sized>(
    classifier: &WordClassifier,
    model: &M,
    position: Position,
    navigation: WordNavigation,
) -> Position {
    let mut line = position.line;
    let mut column = position.column;
    if column == 1 && line > 1 {
        line -= 1;
        column = model.line_max_column(line);
    }

    let mut prev = find_previous_word_on_line(classifier, model, Position::new(line, column));
    match navigation {
        WordNavigation::WordStart => {
            if let Some(word) = prev.filter(is_glued_separator) {
                let word_start = Position::new(line, word.start + 1);
                prev = find_previous_word_on_line(classifier, model, word_start);
            }
            column = prev.map(|w| w.start + 1).unwrap_or(1);
        }
        WordNavigation::WordEnd => {
            if let Some(word) = prev.filter(|w| column <= w.end + 1) {
                let word_start = Position::new(line, word.start + 1);
                prev = find_previous_word_on_line(classifier, model, word_start);
            }
            column = prev.map(|w| w.end + 1).unwrap_or(1);
        }
    }
    Position::new(line, column)
}

/// Position reached by one word step to the right.
pub fn move_word_right<M: LineModel + ?Sized>(
    classifier: &WordClassifier,
    model: &M,
    position: Position,
    navigation: WordNavigation,
) -> Position {
    let mut line = position.line;
    let mut column = position.column;
    if column == model.line_max_column(line) && line < model.line_count() {
        line += 1;
        column = 1;
    }

    let mut next = find_next_word_on_line(classifier, model, Position::new(line, column));
    match navigation {
        WordNavigation::WordEnd => {
            if let Some(word) = next.filter(is_glued_separator) {
                next = find_next_word_on_line(classifier, model, Position::new(line, word.end + 1));
            }
            column = next
                .map(|w| w.end + 1)
                .unwrap_or_else(|| model.line_max_column(line));
        }
        WordNavigation::WordStart => {
            if let Some(word) = next.filter(|w| column >= w.start + 1) {
                next = find_next_word_on_line(classifier, model, Position::new(line, word.end + 1));
            }
            column = next
                .map(|w| w.start + 1)
                .unwrap_or_else(|| model.line_max_column(line));
        }
    }
    Position::new(line, column)
}

fn touches(word: Option<WordInfo>, offset: usize) -> Option<WordInfo> {
    word.filter(|w| w.kind == WordKind::Regular && w.start <= offset && offset <= w.end)
}

fn strictly_inside(word: Option<WordInfo>, offset: usize) -> Option<WordInfo> {
    word.filter(|w| w.kind == WordKind::Regular && w.start < offset && offset < w.end)
}

/// Word selection at `position`.
///
/// Entering (not extending) selects the word touching the position, or the
/// gap between the neighbouring words. Extending keeps the original word
/// selected and grows word by word towards `position`.
pub fn word<M: LineModel + ?Sized>(
    classifier: &WordClassifier,
    model: &M,
    cursor: &ModelState,
    in_selection_mode: bool,
    position: Position,
) -> ModelState {
    let prev = find_previous_word_on_line(classifier, model, position);
    let next = find_next_word_on_line(classifier, model, position);
    let offset = position.column.saturating_sub(1);
    let line = position.line;

    if !in_selection_mode {
        let touching = touches(prev, offset).or_else(|| touches(next, offset));
        let (start, end) = if let Some(w) = touching {
            (w.start + 1, w.end + 1)
        } else {
            (
                prev.map(|w| w.end + 1).unwrap_or(1),
                next.map(|w| w.start + 1)
                    .unwrap_or_else(|| model.line_max_column(line)),
            )
        };
        return ModelState::new(Range::new(line, start, line, end), 0, Position::new(line, end), 0);
    }

    let inside = strictly_inside(prev, offset).or_else(|| strictly_inside(next, offset));
    let (start, end) = match inside {
        Some(w) => (w.start + 1, w.end + 1),
        None => (position.column, position.column),
    };

    let anchor = cursor.selection_start();
    let column = if anchor.contains_position(position) {
        anchor.end().column
    } else if position.is_before_or_equal(&anchor.start()) {
        if anchor.contains_position(Position::new(line, start)) {
            anchor.end().column
        } else {
            start
        }
    } else if anchor.contains_position(Position::new(line, end)) {
        anchor.start().column
    } else {
        end
    };

    cursor.move_to(cursor.has_selection(), line, column, 0)
}
