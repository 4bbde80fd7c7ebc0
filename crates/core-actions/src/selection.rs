//! Visual selections and their position-independent encoding.
//!
//! A live `VisualSelection` names absolute buffer coordinates. When a visual
//! command is stored for repeat it keeps only the selection's shape
//! (`StoredSelection`), and replay re-anchors that shape at the caret. For any
//! selection that fits its buffer, decoding the encoding at the selection's own
//! caret yields the selection back.

use core_state::RegisterShape;
use core_text::{Buffer, ColumnSpan, Position, Span};
use tracing::trace;

/// Character-wise selection: start position, lines covered, and the char
/// length of the last line's covered part (measured from `start` when the
/// span is a single line).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterSpan {
    pub start: Position,
    pub line_count: usize,
    pub last_line_length: usize,
}

impl CharacterSpan {
    pub fn new(start: Position, line_count: usize, last_line_length: usize) -> Self {
        Self {
            start,
            line_count: line_count.max(1),
            last_line_length,
        }
    }

    /// Describe the absolute span `span` of `buffer`.
    pub fn from_span(buffer: &Buffer, span: Span) -> Self {
        let start = buffer.position(span.start);
        let end = buffer.position(span.end);
        if end.line == start.line {
            Self::new(start, 1, end.column - start.column)
        } else {
            Self::new(start, end.line - start.line + 1, end.column)
        }
    }

    pub fn last_line(&self) -> usize {
        self.start.line.saturating_add(self.line_count.saturating_sub(1))
    }

    pub fn is_multi_line(&self) -> bool {
        self.line_count > 1
    }

    /// Absolute span covered, with lengths clamped to what each line holds.
    pub fn span(&self, buffer: &Buffer) -> Span {
        let start = buffer.offset(self.start);
        if self.line_count == 1 {
            let room = buffer
                .line_len_including_break(self.start.line)
                .saturating_sub(self.start.column);
            return Span::new(start, start + self.last_line_length.min(room));
        }
        let last = self.last_line().min(buffer.last_line());
        let end = buffer.line_start(last)
            + self
                .last_line_length
                .min(buffer.line_len_including_break(last));
        Span::new(start, end.max(start))
    }
}

/// Whole lines `start_line .. start_line + count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start_line: usize,
    pub count: usize,
}

impl LineRange {
    pub fn new(start_line: usize, count: usize) -> Self {
        Self {
            start_line,
            count: count.max(1),
        }
    }

    /// Inclusive range `first..=last` (order-insensitive).
    pub fn inclusive(a: usize, b: usize) -> Self {
        let (first, last) = if a <= b { (a, b) } else { (b, a) };
        Self::new(first, last - first + 1)
    }

    pub fn last_line(&self) -> usize {
        self.start_line.saturating_add(self.count.saturating_sub(1))
    }

    pub fn lines(&self) -> std::ops::RangeInclusive<usize> {
        self.start_line..=self.last_line()
    }

    /// The same range with its end clipped to the buffer.
    pub fn clipped(&self, buffer: &Buffer) -> LineRange {
        let start = self.start_line.min(buffer.last_line());
        let last = self.last_line().min(buffer.last_line());
        LineRange::inclusive(start, last)
    }
}

/// Rectangular selection. `caret_offset` is the caret's column distance from
/// the left edge (the caret is always on the top row).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSelection {
    pub top_left: Position,
    pub width: usize,
    pub height: usize,
    pub caret_offset: usize,
}

impl BlockSelection {
    pub fn new(top_left: Position, width: usize, height: usize) -> Self {
        Self {
            top_left,
            width,
            height: height.max(1),
            caret_offset: 0,
        }
    }

    pub fn with_caret_offset(mut self, caret_offset: usize) -> Self {
        self.caret_offset = caret_offset;
        self
    }

    pub fn rows(&self) -> Vec<ColumnSpan> {
        let left = self.top_left.column;
        (0..self.height)
            .map(|i| ColumnSpan::new(self.top_left.line + i, left, left.saturating_add(self.width)))
            .collect()
    }

    pub fn line_range(&self) -> LineRange {
        LineRange::new(self.top_left.line, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualSelection {
    Character(CharacterSpan),
    Line(LineRange),
    Block(BlockSelection),
}

impl VisualSelection {
    /// Caret position the selection is anchored on.
    pub fn caret(&self) -> Position {
        match self {
            VisualSelection::Character(cs) => cs.start,
            VisualSelection::Line(range) => Position::new(range.start_line, 0),
            VisualSelection::Block(b) => {
                Position::new(b.top_left.line, b.top_left.column.saturating_add(b.caret_offset))
            }
        }
    }

    /// Every line the selection touches.
    pub fn line_range(&self) -> LineRange {
        match self {
            VisualSelection::Character(cs) => LineRange::new(cs.start.line, cs.line_count),
            VisualSelection::Line(range) => *range,
            VisualSelection::Block(b) => b.line_range(),
        }
    }

    pub fn register_shape(&self) -> RegisterShape {
        match self {
            VisualSelection::Character(_) => RegisterShape::CharacterWise,
            VisualSelection::Line(_) => RegisterShape::LineWise,
            VisualSelection::Block(_) => RegisterShape::BlockWise,
        }
    }

    /// True when the selection covers at least one line and every line it
    /// names exists in `buffer`.
    pub fn fits(&self, buffer: &Buffer) -> bool {
        let covers_lines = match self {
            VisualSelection::Character(cs) => cs.line_count > 0,
            VisualSelection::Line(range) => range.count > 0,
            VisualSelection::Block(b) => b.height > 0,
        };
        covers_lines
            && self.line_range().last_line() < buffer.line_count()
            && match self {
                VisualSelection::Character(cs) => {
                    cs.start.column <= buffer.line_len_including_break(cs.start.line)
                }
                _ => true,
            }
    }
}

/// Shape of a selection, detached from any position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredSelection {
    Character {
        line_count: usize,
        last_line_length: usize,
    },
    Line {
        count: usize,
    },
    Block {
        column_offset: usize,
        width: usize,
        height: usize,
    },
}

impl StoredSelection {
    pub fn encode(selection: &VisualSelection) -> Self {
        let stored = match selection {
            VisualSelection::Character(cs) => StoredSelection::Character {
                line_count: cs.line_count,
                last_line_length: cs.last_line_length,
            },
            VisualSelection::Line(range) => StoredSelection::Line { count: range.count },
            VisualSelection::Block(b) => StoredSelection::Block {
                column_offset: b.caret_offset,
                width: b.width,
                height: b.height,
            },
        };
        trace!(target: "actions.codec", ?stored, "selection_encoded");
        stored
    }

    /// Re-anchor at `caret`, clipping line counts and lengths to `buffer`.
    pub fn decode(&self, caret: Position, buffer: &Buffer) -> VisualSelection {
        let line = caret.line.min(buffer.last_line());
        let available = buffer.line_count() - line;
        let decoded = match *self {
            StoredSelection::Character {
                line_count,
                last_line_length,
            } => {
                let column = caret.column.min(buffer.line_len_including_break(line));
                let count = line_count.max(1).min(available);
                let last = line + count - 1;
                let length = if count < line_count {
                    buffer.line_len_including_break(last)
                } else if count == 1 {
                    last_line_length
                        .min(buffer.line_len_including_break(line).saturating_sub(column))
                } else {
                    last_line_length.min(buffer.line_len_including_break(last))
                };
                VisualSelection::Character(CharacterSpan::new(
                    Position::new(line, column),
                    count,
                    length,
                ))
            }
            StoredSelection::Line { count } => {
                VisualSelection::Line(LineRange::new(line, count.max(1).min(available)))
            }
            StoredSelection::Block {
                column_offset,
                width,
                height,
            } => {
                let left = caret.column.saturating_sub(column_offset);
                VisualSelection::Block(
                    BlockSelection::new(
                        Position::new(line, left),
                        width,
                        height.max(1).min(available),
                    )
                    .with_caret_offset(caret.column - left),
                )
            }
        };
        trace!(target: "actions.codec", line = caret.line, column = caret.column, ?decoded, "selection_decoded");
        decoded
    }
}

/// Selection argument of a visual command: live, or stored for replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionArg {
    Live(VisualSelection),
    Stored(StoredSelection),
}

impl From<VisualSelection> for SelectionArg {
    fn from(sel: VisualSelection) -> Self {
        SelectionArg::Live(sel)
    }
}
