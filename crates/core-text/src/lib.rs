//! Rope-based text buffer abstraction.
//!
//! Positions are expressed as (line, column) where `column` counts `char`s
//! from the start of the line. Absolute locations are char offsets into the
//! rope; `Span` wraps a half-open offset range. The buffer stores LF line
//! breaks only; CRLF / CR input is normalized on construction.
//!
//! Every mutation bumps `version`, giving callers a cheap snapshot identity
//! to detect when a previously captured selection no longer matches the text.

use anyhow::Result;
use ropey::Rope;

pub mod caret;
pub mod span;

pub use span::{ColumnSpan, Span};

/// Line terminator written by every line-oriented edit.
pub const LINE_BREAK: &str = "\n";

/// A text buffer backed by a `ropey::Rope`.
#[derive(Clone)]
pub struct Buffer {
    rope: Rope,
    pub name: String,
    version: u64,
}

/// A position inside a buffer expressed as (line index, char column within that line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
    pub fn origin() -> Self {
        Self { line: 0, column: 0 }
    }
    pub fn clamp_to<F>(&mut self, line_count: usize, mut line_len_fn: F)
    where
        F: FnMut(usize) -> usize,
    {
        if line_count == 0 {
            self.line = 0;
            self.column = 0;
            return;
        }
        if self.line >= line_count {
            self.line = line_count - 1;
        }
        let max_len = line_len_fn(self.line);
        if self.column > max_len {
            self.column = max_len;
        }
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("name", &self.name)
            .field("lines", &self.line_count())
            .field("version", &self.version)
            .finish()
    }
}

impl Buffer {
    /// Construct a buffer from an in-memory string slice.
    pub fn from_str(name: impl Into<String>, content: &str) -> Result<Self> {
        let name = name.into();
        let normalized = if content.contains('\r') {
            content.replace("\r\n", LINE_BREAK).replace('\r', LINE_BREAK)
        } else {
            content.to_string()
        };
        Ok(Self {
            rope: Rope::from_str(&normalized),
            name,
            version: 0,
        })
    }

    /// Construct a buffer whose lines are `lines` joined by `LINE_BREAK` (no trailing break).
    pub fn from_lines(name: impl Into<String>, lines: &[&str]) -> Result<Self> {
        Self::from_str(name, &lines.join(LINE_BREAK))
    }

    /// Monotonic edit counter; changes whenever the text changes.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Total number of lines in the buffer (always >= 1).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Index of the last line.
    pub fn last_line(&self) -> usize {
        self.line_count().saturating_sub(1)
    }

    /// Total number of chars in the buffer.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Return the requested line as an owned `String` (including trailing newline if present).
    pub fn line(&self, idx: usize) -> Option<String> {
        if idx < self.rope.len_lines() {
            Some(self.rope.line(idx).to_string())
        } else {
            None
        }
    }

    /// Line content without its terminator.
    pub fn line_text(&self, idx: usize) -> Option<String> {
        self.line(idx).map(|mut s| {
            if s.ends_with('\n') {
                s.pop();
            }
            s
        })
    }

    /// Char length of a line, excluding any line break.
    pub fn line_len(&self, idx: usize) -> usize {
        if idx >= self.rope.len_lines() {
            return 0;
        }
        let line = self.rope.line(idx);
        let len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    /// Char length of a line including its line break (if it has one).
    pub fn line_len_including_break(&self, idx: usize) -> usize {
        if idx >= self.rope.len_lines() {
            return 0;
        }
        self.rope.line(idx).len_chars()
    }

    /// True when `idx` is followed by a line break.
    pub fn has_line_break(&self, idx: usize) -> bool {
        self.line_len_including_break(idx) > self.line_len(idx)
    }

    /// Absolute char offset of the first char of line `idx` (clamped to buffer end).
    pub fn line_start(&self, idx: usize) -> usize {
        if idx >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(idx)
    }

    /// Absolute char offset just past the last content char of line `idx`.
    pub fn line_end(&self, idx: usize) -> usize {
        self.line_start(idx) + self.line_len(idx)
    }

    /// Absolute char offset just past the line break of line `idx`.
    pub fn line_end_including_break(&self, idx: usize) -> usize {
        self.line_start(idx) + self.line_len_including_break(idx)
    }

    /// Column of the first non-blank char on the line (line length for blank lines).
    pub fn first_non_blank(&self, idx: usize) -> usize {
        match self.line_text(idx) {
            Some(text) => text
                .chars()
                .position(|c| c != ' ' && c != '\t')
                .unwrap_or(text.chars().count()),
            None => 0,
        }
    }

    /// Convert a position into an absolute char offset. Columns past the line end clamp.
    pub fn offset(&self, pos: Position) -> usize {
        let line = pos.line.min(self.last_line());
        self.line_start(line) + pos.column.min(self.line_len_including_break(line))
    }

    /// Convert an absolute char offset into a position (clamped to buffer end).
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        Position {
            line,
            column: offset - self.rope.line_to_char(line),
        }
    }

    /// Chars of the range `[start,end)` (clamped).
    pub fn slice(&self, span: Span) -> String {
        let total = self.rope.len_chars();
        let s = span.start.min(total);
        let e = span.end.min(total);
        if s >= e {
            return String::new();
        }
        self.rope.slice(s..e).to_string()
    }

    /// Remove the char range (clamped) returning the removed text.
    pub fn remove(&mut self, span: Span) -> String {
        let removed = self.slice(span);
        if removed.is_empty() {
            return removed;
        }
        let s = span.start.min(self.rope.len_chars());
        self.rope.remove(s..s + removed.chars().count());
        self.version += 1;
        removed
    }

    /// Insert `text` at char offset `at` (clamped to buffer end).
    pub fn insert(&mut self, at: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let at = at.min(self.rope.len_chars());
        self.rope.insert(at, text);
        self.version += 1;
    }

    /// Replace the char range with `text`, returning the removed text.
    pub fn replace(&mut self, span: Span, text: &str) -> String {
        let removed = self.remove(span);
        self.insert(span.start, text);
        removed
    }

    /// Full text of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Every line without its terminator (convenient for assertions).
    pub fn lines(&self) -> Vec<String> {
        (0..self.line_count())
            .filter_map(|i| self.line_text(i))
            .collect()
    }

    /// True when `pos` names an existing line and a column inside (or at the end of) it.
    pub fn contains_position(&self, pos: Position) -> bool {
        pos.line < self.line_count() && pos.column <= self.line_len(pos.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn create_buffer_and_read_line() {
        let b = Buffer::from_str("test", "hello\nworld").unwrap();
        assert_eq!(b.line_count(), 2);
        assert_eq!(b.line(0).unwrap(), "hello\n");
        assert_eq!(b.line(1).unwrap(), "world");
        assert_eq!(b.line_len(0), 5);
        assert_eq!(b.line_len_including_break(0), 6);
        assert!(!b.has_line_break(1));
    }

    #[test]
    fn crlf_is_normalized() {
        let b = Buffer::from_str("t", "a\r\nb\rc").unwrap();
        assert_eq!(b.lines(), vec!["a", "b", "c"]);
    }

    #[test]
    fn offsets_round_trip_positions() {
        let b = Buffer::from_lines("t", &["dog", "cat", "bear"]).unwrap();
        let pos = Position::new(2, 1);
        let off = b.offset(pos);
        assert_eq!(off, 9);
        assert_eq!(b.position(off), pos);
        assert_eq!(b.line_start(1), 4);
        assert_eq!(b.line_end(1), 7);
        assert_eq!(b.line_end_including_break(1), 8);
    }

    #[test]
    fn multibyte_columns_count_chars() {
        let b = Buffer::from_str("t", "café ok").unwrap();
        assert_eq!(b.line_len(0), 7);
        assert_eq!(b.slice(Span::new(0, 4)), "café");
    }

    #[test]
    fn remove_insert_replace_bump_version() {
        let mut b = Buffer::from_str("t", "hello world").unwrap();
        let v0 = b.version();
        assert_eq!(b.remove(Span::new(0, 6)), "hello ");
        assert_eq!(b.text(), "world");
        b.insert(0, "big ");
        assert_eq!(b.text(), "big world");
        assert_eq!(b.replace(Span::new(0, 3), "small"), "big");
        assert_eq!(b.text(), "small world");
        assert!(b.version() > v0);
    }

    #[test]
    fn empty_edits_keep_version() {
        let mut b = Buffer::from_str("t", "abc").unwrap();
        let v = b.version();
        b.insert(1, "");
        assert_eq!(b.remove(Span::new(2, 2)), "");
        assert_eq!(b.version(), v);
    }

    #[test]
    fn first_non_blank_skips_indent() {
        let b = Buffer::from_lines("t", &["   foo", "\tbar", "    "]).unwrap();
        assert_eq!(b.first_non_blank(0), 3);
        assert_eq!(b.first_non_blank(1), 1);
        assert_eq!(b.first_non_blank(2), 4);
    }

    #[test]
    fn position_clamp() {
        let b = Buffer::from_str("test", "Hello\nWorld").unwrap();
        let mut pos = Position::new(10, 999);
        pos.clamp_to(b.line_count(), |l| b.line_len(l));
        assert_eq!(pos, Position::new(1, 5));
    }
}
