//! Property tests for the stored-selection encoding.

use core_actions::{
    BlockSelection, CharacterSpan, LineRange, StoredSelection, VisualSelection,
};
use core_text::{Buffer, Position, Span};
use proptest::prelude::*;

fn buffer_lines() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-c ]{0,8}", 1..6)
}

fn build(lines: &[String]) -> Buffer {
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    Buffer::from_lines("prop", &refs).unwrap()
}

proptest! {
    // Character selections built from any in-buffer span decode back to themselves.
    #[test]
    fn character_round_trip(lines in buffer_lines(), a in 0usize..64, b in 0usize..64) {
        let buffer = build(&lines);
        let len = buffer.len_chars();
        let span = Span::new(a.min(len), b.min(len));
        let sel = VisualSelection::Character(CharacterSpan::from_span(&buffer, span));
        let stored = StoredSelection::encode(&sel);
        prop_assert_eq!(stored.decode(sel.caret(), &buffer), sel);
        if let VisualSelection::Character(cs) = sel {
            prop_assert_eq!(cs.span(&buffer), span);
        }
    }

    #[test]
    fn line_round_trip(lines in buffer_lines(), start in 0usize..6, count in 1usize..6) {
        let buffer = build(&lines);
        let start = start.min(buffer.last_line());
        let count = count.min(buffer.line_count() - start);
        let sel = VisualSelection::Line(LineRange::new(start, count));
        let stored = StoredSelection::encode(&sel);
        prop_assert_eq!(stored.decode(sel.caret(), &buffer), sel);
    }

    #[test]
    fn block_round_trip(
        lines in buffer_lines(),
        top in 0usize..6,
        left in 0usize..12,
        width in 0usize..6,
        height in 1usize..6,
        offset in 0usize..6,
    ) {
        let buffer = build(&lines);
        let top = top.min(buffer.last_line());
        let height = height.min(buffer.line_count() - top);
        let sel = VisualSelection::Block(
            BlockSelection::new(Position::new(top, left), width, height).with_caret_offset(offset),
        );
        let stored = StoredSelection::encode(&sel);
        prop_assert_eq!(stored.decode(sel.caret(), &buffer), sel);
    }

    // Decoding at an arbitrary caret never names text outside the buffer.
    #[test]
    fn decode_stays_inside_buffer(
        lines in buffer_lines(),
        line in 0usize..8,
        column in 0usize..12,
        line_count in 1usize..8,
        last_line_length in 0usize..12,
    ) {
        let buffer = build(&lines);
        let stored = StoredSelection::Character { line_count, last_line_length };
        let sel = stored.decode(Position::new(line, column), &buffer);
        prop_assert!(sel.fits(&buffer));
        if let VisualSelection::Character(cs) = sel {
            prop_assert!(cs.span(&buffer).fits(&buffer));
        }
        let lines_sel = StoredSelection::Line { count: line_count }.decode(Position::new(line, column), &buffer);
        prop_assert!(lines_sel.fits(&buffer));
    }
}
