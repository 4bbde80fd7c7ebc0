use super::Executor;
use crate::command::{CommandError, CommandResult, MotionArg, MotionResult};
use core_state::{Register, RegisterName};
use core_text::{Buffer, LINE_BREAK, Position, Span};
use tracing::trace;

/// `c{motion}`: delete the motion's text into a register and leave the caret
/// where insertion should begin. The caller enters insert mode.
pub(super) fn change_motion(
    ex: &mut Executor<'_>,
    arg: &MotionArg,
    register: Option<RegisterName>,
) -> CommandResult {
    let motion = match arg {
        MotionArg::Resolved(m) => *m,
        MotionArg::Stored(stored) => stored.resolve(ex.state.caret, &ex.state.buffer),
    };
    if !motion.span.fits(&ex.state.buffer) {
        return CommandError::InvalidMotion {
            start: motion.span.start,
            end: motion.span.end,
            len: ex.state.buffer.len_chars(),
        }
        .into();
    }
    if motion.is_line_wise() {
        change_lines(ex, &motion, register);
    } else {
        let span = change_span(&ex.state.buffer, &motion);
        ex.transaction("change motion", |ex| {
            let removed = ex.state.buffer_mut().remove(span);
            let breaks = removed.matches(LINE_BREAK).count();
            let start = ex.state.buffer.position(span.start);
            ex.state.note_lines_changed(start.line + 1, breaks, 0);
            ex.write_deleted(register, Register::character_wise(removed));
            ex.state.set_caret(start);
        });
        trace!(target: "actions.exec", op = "change_motion", start = span.start, end = span.end, "edit");
    }
    CommandResult::completed()
}

/// `cw` does not swallow the whitespace after the word unless the span is
/// nothing but whitespace.
fn change_span(buffer: &Buffer, motion: &MotionResult) -> Span {
    let span = motion.span;
    if !(motion.is_forward && motion.is_any_word) {
        return span;
    }
    let text = buffer.slice(span);
    let trailing = text.chars().rev().take_while(|c| c.is_whitespace()).count();
    if trailing == span.len() {
        span
    } else {
        Span::new(span.start, span.end - trailing)
    }
}

/// Line-wise change: capture the covered lines and leave one empty line in their place.
fn change_lines(ex: &mut Executor<'_>, motion: &MotionResult, register: Option<RegisterName>) {
    let buffer = &ex.state.buffer;
    let first = buffer.position(motion.span.start).line;
    let last = buffer
        .position(motion.span.end.max(motion.span.start + 1) - 1)
        .line
        .max(first);
    let mut value = String::new();
    for line in first..=last {
        value.push_str(&buffer.line_text(line).unwrap_or_default());
        value.push_str(LINE_BREAK);
    }
    let span = Span::new(buffer.line_start(first), buffer.line_end(last));
    ex.transaction("change lines", |ex| {
        ex.state.buffer_mut().remove(span);
        ex.state.note_lines_changed(first + 1, last - first, 0);
        ex.write_deleted(register, Register::line_wise(value));
        ex.state.set_caret(Position::new(first, 0));
    });
    trace!(target: "actions.exec", op = "change_lines", first, last, "edit");
}
