//! Char-offset ranges used by selections, motions and register capture.

use crate::{Buffer, Position};

/// Half-open range `[start, end)` of absolute char offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Construct a span normalizing ordering so that start <= end.
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Span between two buffer positions (ordered).
    pub fn between(buffer: &Buffer, a: Position, b: Position) -> Self {
        Self::new(buffer.offset(a), buffer.offset(b))
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    /// True when the span lies entirely inside the buffer.
    pub fn fits(&self, buffer: &Buffer) -> bool {
        self.end <= buffer.len_chars()
    }
}

/// Columns `[start_column, end_column)` on a single line; one row of a block selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnSpan {
    pub line: usize,
    pub start_column: usize,
    pub end_column: usize,
}

impl ColumnSpan {
    pub fn new(line: usize, start_column: usize, end_column: usize) -> Self {
        Self {
            line,
            start_column,
            end_column: end_column.max(start_column),
        }
    }

    pub fn width(&self) -> usize {
        self.end_column - self.start_column
    }

    /// Clip the columns to the line's actual content, yielding the absolute span
    /// that really exists (possibly empty when the line is shorter than the block).
    pub fn clipped(&self, buffer: &Buffer) -> Span {
        let len = buffer.line_len(self.line);
        let start = buffer.line_start(self.line);
        Span::new(
            start + self.start_column.min(len),
            start + self.end_column.min(len),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_orders_endpoints() {
        let s = Span::new(7, 2);
        assert_eq!(s, Span { start: 2, end: 7 });
        assert_eq!(s.len(), 5);
        assert!(s.contains(2));
        assert!(!s.contains(7));
    }

    #[test]
    fn column_span_clips_short_lines() {
        let b = Buffer::from_lines("t", &["abcdef", "ab", ""]).unwrap();
        assert_eq!(ColumnSpan::new(0, 1, 4).clipped(&b), Span::new(1, 4));
        assert_eq!(ColumnSpan::new(1, 1, 4).clipped(&b), Span::new(8, 9));
        assert!(ColumnSpan::new(2, 1, 4).clipped(&b).is_empty());
    }
}
