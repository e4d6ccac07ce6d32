/// Positions, ranges, and selections shared by the model and view coordinate spaces.
use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A position in the text as a 1-based line and a 1-based column.
///
/// Columns count chars; column 1 is before the first char of the line and
/// the line's max column is after its last char.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Returns true if `self` comes strictly before `other`.
    pub fn is_before(&self, other: &Position) -> bool {
        self < other
    }

    /// Returns true if `self` comes before `other` or is equal to it.
    pub fn is_before_or_equal(&self, other: &Position) -> bool {
        self <= other
    }
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then(self.column.cmp(&other.column))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A range between two positions. The start never comes after the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Range {
    start: Position,
    end: Position,
}

impl Range {
    /// Creates a range from line/column pairs, swapping the ends if needed.
    pub fn new(start_line: usize, start_column: usize, end_line: usize, end_column: usize) -> Self {
        Self::from_positions(
            Position::new(start_line, start_column),
            Position::new(end_line, end_column),
        )
    }

    /// Creates the range spanning two positions given in any order.
    pub fn from_positions(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Creates an empty range at `position`.
    pub fn collapsed(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if `position` lies inside the range, edges included.
    pub fn contains_position(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }

    /// Returns the smallest range covering both ranges.
    pub fn plus_range(&self, other: &Range) -> Range {
        Range {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} .. {}]", self.start, self.end)
    }
}

/// The direction in which a selection was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionDirection {
    /// The anchor is at the start, the head at the end.
    Ltr,
    /// The anchor is at the end, the head at the start.
    Rtl,
}

/// A selection with a fixed anchor and a moving head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    /// The end that stays put while the selection is extended.
    pub anchor: Position,
    /// The end where the caret is drawn.
    pub head: Position,
}

impl Selection {
    pub fn new(anchor: Position, head: Position) -> Self {
        Self { anchor, head }
    }

    /// Creates an empty selection (a caret) at `position`.
    pub fn caret(position: Position) -> Self {
        Self::new(position, position)
    }

    /// Creates a selection covering `range` in the given direction.
    pub fn from_range(range: Range, direction: SelectionDirection) -> Self {
        match direction {
            SelectionDirection::Ltr => Self::new(range.start(), range.end()),
            SelectionDirection::Rtl => Self::new(range.end(), range.start()),
        }
    }

    /// Returns the start (min) position of the selection.
    pub fn start(&self) -> Position {
        self.anchor.min(self.head)
    }

    /// Returns the end (max) position of the selection.
    pub fn end(&self) -> Position {
        self.anchor.max(self.head)
    }

    /// Returns true if this selection is empty (anchor == head).
    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    pub fn direction(&self) -> SelectionDirection {
        if self.anchor <= self.head {
            SelectionDirection::Ltr
        } else {
            SelectionDirection::Rtl
        }
    }

    pub fn to_range(&self) -> Range {
        Range::from_positions(self.anchor, self.head)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.anchor, self.head)
    }
}
