//! Caret normalization helpers.
//!
//! These operate purely on a `Buffer` + `Position` pair and are free of global editor state.

use crate::{Buffer, Position};

/// How far past the end of a line the caret may rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VirtualEdit {
    /// Normal-mode semantics: the caret sits on a real character (last column at most).
    #[default]
    None,
    /// The caret may rest one column past the last character.
    OneMore,
    /// Any column is accepted; only the line is clamped.
    All,
}

/// Clamp `pos` to an existing line and to the column range allowed by `mode`.
/// Empty lines always clamp to column 0 unless `mode` is `All`.
pub fn clamp_position(buf: &Buffer, pos: &mut Position, mode: VirtualEdit) {
    if pos.line >= buf.line_count() {
        pos.line = buf.last_line();
    }
    let len = buf.line_len(pos.line);
    let max = match mode {
        VirtualEdit::None => len.saturating_sub(1),
        VirtualEdit::OneMore => len,
        VirtualEdit::All => return,
    };
    if pos.column > max {
        pos.column = max;
    }
}

/// Position of the first non-blank char on `line`.
pub fn first_non_blank(buf: &Buffer, line: usize) -> Position {
    let line = line.min(buf.last_line());
    Position::new(line, buf.first_non_blank(line))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_normal_mode_rests_on_last_char() {
        let b = Buffer::from_lines("t", &["abc", ""]).unwrap();
        let mut p = Position::new(0, 3);
        clamp_position(&b, &mut p, VirtualEdit::None);
        assert_eq!(p, Position::new(0, 2));
        let mut p = Position::new(1, 4);
        clamp_position(&b, &mut p, VirtualEdit::None);
        assert_eq!(p, Position::new(1, 0));
    }

    #[test]
    fn clamp_onemore_allows_end_of_line() {
        let b = Buffer::from_lines("t", &["abc"]).unwrap();
        let mut p = Position::new(3, 9);
        clamp_position(&b, &mut p, VirtualEdit::OneMore);
        assert_eq!(p, Position::new(0, 3));
    }

    #[test]
    fn clamp_all_keeps_column() {
        let b = Buffer::from_lines("t", &["abc"]).unwrap();
        let mut p = Position::new(0, 9);
        clamp_position(&b, &mut p, VirtualEdit::All);
        assert_eq!(p, Position::new(0, 9));
    }
}
