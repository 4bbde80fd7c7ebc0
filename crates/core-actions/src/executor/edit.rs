//! Caret-anchored edits: replace, delete, case change, join.

use super::Executor;
use crate::command::{CaseKind, CommandResult, JoinKind};
use crate::selection::LineRange;
use core_state::{EditorState, Register, RegisterName};
use core_text::{LINE_BREAK, Position, Span};
use tracing::trace;

/// `r{c}` with a count: every replaced char becomes `c`. A line break replaces
/// the whole range with a single break.
pub(super) fn replace_char(ex: &mut Executor<'_>, c: char, count: usize) -> CommandResult {
    let caret = ex.state.caret;
    let remaining = ex.state.buffer.line_len(caret.line).saturating_sub(caret.column);
    if count > remaining {
        trace!(target: "actions.exec", op = "replace_char", count, remaining, "count_exceeds_line");
        ex.beep();
        return CommandResult::completed();
    }
    ex.transaction("replace char", |ex| {
        let start = ex.state.buffer.offset(caret);
        let span = Span::new(start, start + count);
        if c == '\n' {
            ex.state.buffer_mut().replace(span, LINE_BREAK);
            ex.state.note_lines_changed(caret.line + 1, 0, 1);
            ex.state.set_caret(Position::new(caret.line + 1, 0));
        } else {
            let text: String = std::iter::repeat_n(c, count).collect();
            ex.state.buffer_mut().replace(span, &text);
            ex.state.set_caret(Position::new(caret.line, caret.column + count - 1));
        }
    });
    trace!(target: "actions.exec", op = "replace_char", line = caret.line, column = caret.column, count, "edit");
    CommandResult::completed()
}

/// `x`: delete up to `count` chars at the caret, never crossing the line break.
pub(super) fn delete_char_at_caret(
    ex: &mut Executor<'_>,
    count: usize,
    register: Option<RegisterName>,
) -> CommandResult {
    let caret = ex.state.caret;
    let remaining = ex.state.buffer.line_len(caret.line).saturating_sub(caret.column);
    let n = count.min(remaining);
    if n == 0 {
        return CommandResult::completed();
    }
    ex.transaction("delete char at caret", |ex| {
        let start = ex.state.buffer.offset(caret);
        let removed = ex.state.buffer_mut().remove(Span::new(start, start + n));
        ex.write_deleted(register, Register::character_wise(removed));
        ex.state.set_caret(caret);
    });
    trace!(target: "actions.exec", op = "delete_char_at_caret", line = caret.line, column = caret.column, n, "edit");
    CommandResult::completed()
}

/// `X`: delete up to `count` chars left of the caret within the line.
pub(super) fn delete_char_before_caret(
    ex: &mut Executor<'_>,
    count: usize,
    register: Option<RegisterName>,
) -> CommandResult {
    let caret = ex.state.caret;
    // A caret past the line end (virtual edit) deletes from the line end.
    let column = caret.column.min(ex.state.buffer.line_len(caret.line));
    let n = count.min(column);
    if n == 0 {
        return CommandResult::completed();
    }
    ex.transaction("delete char before caret", |ex| {
        let end = ex.state.buffer.line_start(caret.line) + column;
        let removed = ex.state.buffer_mut().remove(Span::new(end - n, end));
        ex.write_deleted(register, Register::character_wise(removed));
        ex.state.set_caret(Position::new(caret.line, column - n));
    });
    trace!(target: "actions.exec", op = "delete_char_before_caret", line = caret.line, column = caret.column, n, "edit");
    CommandResult::completed()
}

/// Remove whole lines of `range`, returning their text with one break per line.
/// Removing the tail of the buffer also removes the break preceding it.
pub(super) fn remove_lines(state: &mut EditorState, range: LineRange) -> String {
    let range = range.clipped(&state.buffer);
    let (first, last) = (range.start_line, range.last_line());
    let mut value = String::new();
    for line in range.lines() {
        value.push_str(&state.buffer.line_text(line).unwrap_or_default());
        value.push_str(LINE_BREAK);
    }
    let buffer = &state.buffer;
    let span = if buffer.has_line_break(last) {
        Span::new(buffer.line_start(first), buffer.line_end_including_break(last))
    } else if first > 0 {
        Span::new(buffer.line_end(first - 1), buffer.line_end(last))
    } else {
        Span::new(0, buffer.line_end(last))
    };
    state.buffer_mut().remove(span);
    state.note_lines_changed(first, range.count, 0);
    let line = first.min(state.buffer.last_line());
    state.set_caret(Position::new(line, 0));
    value
}

/// `dd`: delete `count` lines from the caret line (clipped to the buffer).
pub(super) fn delete_lines(
    ex: &mut Executor<'_>,
    count: usize,
    register: Option<RegisterName>,
) -> CommandResult {
    let first = ex.state.caret.line;
    let range = LineRange::new(first, count).clipped(&ex.state.buffer);
    ex.transaction("delete lines", |ex| {
        let value = remove_lines(ex.state, range);
        ex.write_deleted(register, Register::line_wise(value));
    });
    trace!(target: "actions.exec", op = "delete_lines", first, count = range.count, "edit");
    CommandResult::completed()
}

fn transform(text: &str, kind: CaseKind) -> String {
    text.chars().map(|c| kind.apply(c)).collect()
}

/// `~`: change case of up to `count` chars and step past them.
pub(super) fn change_case_point(ex: &mut Executor<'_>, kind: CaseKind, count: usize) -> CommandResult {
    let caret = ex.state.caret;
    let remaining = ex.state.buffer.line_len(caret.line).saturating_sub(caret.column);
    let n = count.min(remaining);
    if n == 0 {
        return CommandResult::completed();
    }
    ex.transaction("change case", |ex| {
        let start = ex.state.buffer.offset(caret);
        let span = Span::new(start, start + n);
        let text = transform(&ex.state.buffer.slice(span), kind);
        ex.state.buffer_mut().replace(span, &text);
        ex.state.set_caret(Position::new(caret.line, caret.column + n));
    });
    ex.ops.clamp_virtual_edit(ex.state);
    trace!(target: "actions.exec", op = "change_case_point", ?kind, line = caret.line, column = caret.column, n, "edit");
    CommandResult::completed()
}

/// `g~~` family: change case of the whole caret line.
pub(super) fn change_case_line(ex: &mut Executor<'_>, kind: CaseKind) -> CommandResult {
    let line = ex.state.caret.line;
    ex.transaction("change case line", |ex| {
        let span = Span::new(ex.state.buffer.line_start(line), ex.state.buffer.line_end(line));
        let text = transform(&ex.state.buffer.slice(span), kind);
        ex.state.buffer_mut().replace(span, &text);
        let column = ex.state.buffer.first_non_blank(line);
        ex.state.set_caret(Position::new(line, column));
    });
    trace!(target: "actions.exec", op = "change_case_line", ?kind, line, "edit");
    CommandResult::completed()
}

/// `J` / `gJ`: join `count` lines (at least two) starting at the caret line.
pub(super) fn join_lines(ex: &mut Executor<'_>, kind: JoinKind, count: Option<usize>) -> CommandResult {
    let first = ex.state.caret.line;
    let range = LineRange::new(first, count.unwrap_or(2).max(2));
    if range.last_line() > ex.state.buffer.last_line() {
        trace!(target: "actions.exec", op = "join_lines", first, count = range.count, "range_past_end");
        ex.beep();
        return CommandResult::completed();
    }
    ex.transaction("join lines", |ex| {
        let column = ex.ops.join_lines(ex.state, range, kind);
        ex.state.set_caret(Position::new(first, column));
    });
    trace!(target: "actions.exec", op = "join_lines", ?kind, first, count = range.count, "edit");
    CommandResult::completed()
}
