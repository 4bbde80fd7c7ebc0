//! Commands operating on a visual selection (live or replayed from storage).

use super::{Executor, edit};
use crate::command::{CommandError, CommandResult, repeat_fits};
use crate::selection::{SelectionArg, VisualSelection};
use core_state::{Register, RegisterName, RegisterShape};
use core_text::{LINE_BREAK, Position, Span, caret};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Shift {
    Left,
    Right,
}

fn resolve(ex: &Executor<'_>, arg: &SelectionArg) -> Result<VisualSelection, CommandError> {
    match arg {
        SelectionArg::Live(sel) if sel.fits(&ex.state.buffer) => Ok(*sel),
        SelectionArg::Live(sel) => Err(CommandError::InvalidSelection(format!(
            "{:?} in a buffer of {} lines",
            sel,
            ex.state.buffer.line_count()
        ))),
        SelectionArg::Stored(stored) => Ok(stored.decode(ex.state.caret, &ex.state.buffer)),
    }
}

pub(super) fn shift(ex: &mut Executor<'_>, arg: &SelectionArg, count: usize, dir: Shift) -> CommandResult {
    let selection = match resolve(ex, arg) {
        Ok(sel) => sel,
        Err(e) => return e.into(),
    };
    if !repeat_fits(1, count) {
        trace!(target: "actions.exec", op = "shift_selection", count, "count_too_large");
        ex.beep();
        return CommandResult::completed();
    }
    ex.transaction("shift selection", |ex| match selection {
        VisualSelection::Block(block) => {
            let rows = block.rows();
            match dir {
                Shift::Left => ex.ops.shift_block_left(ex.state, &rows, count),
                Shift::Right => ex.ops.shift_block_right(ex.state, &rows, count),
            }
            ex.state.set_caret(block.top_left);
        }
        other => {
            let range = other.line_range();
            match dir {
                Shift::Left => ex.ops.shift_lines_left(ex.state, range, count),
                Shift::Right => ex.ops.shift_lines_right(ex.state, range, count),
            }
            ex.state.caret = caret::first_non_blank(&ex.state.buffer, range.start_line);
        }
    });
    trace!(target: "actions.exec", op = "shift_selection", ?dir, count, "edit");
    CommandResult::completed()
}

/// Visual `p`: replace the selection with `count` copies of the register.
/// The replaced text goes to the unnamed register afterwards.
pub(super) fn put_over_selection(
    ex: &mut Executor<'_>,
    arg: &SelectionArg,
    move_caret_after_text: bool,
    count: usize,
    register: Option<RegisterName>,
) -> CommandResult {
    let selection = match resolve(ex, arg) {
        Ok(sel) => sel,
        Err(e) => return e.into(),
    };
    let source = ex
        .state
        .registers
        .get_or_empty(register.unwrap_or(RegisterName::Unnamed));
    if source.is_empty() {
        trace!(target: "actions.exec", op = "put_over_selection", "register_empty");
        ex.beep();
        return CommandResult::completed();
    }
    // One extra byte per copy covers the break a line-wise unit gains.
    if !repeat_fits(source.value.len() + 1, count) {
        trace!(target: "actions.exec", op = "put_over_selection", count, "count_too_large");
        ex.beep();
        return CommandResult::completed();
    }
    ex.transaction("put over selection", |ex| {
        let replaced = match selection {
            VisualSelection::Character(cs) => {
                let span = cs.span(&ex.state.buffer);
                let text = source.value.repeat(count);
                let removed = ex.state.buffer_mut().replace(span, &text);
                ex.state.note_lines_changed(
                    cs.start.line + 1,
                    removed.matches(LINE_BREAK).count(),
                    text.matches(LINE_BREAK).count(),
                );
                let caret_at = if move_caret_after_text {
                    span.start + text.chars().count()
                } else {
                    span.start
                };
                ex.state.caret = ex.state.buffer.position(caret_at);
                Register::character_wise(removed)
            }
            VisualSelection::Line(range) => {
                let range = range.clipped(&ex.state.buffer);
                let (first, last) = (range.start_line, range.last_line());
                let mut removed = String::new();
                for line in range.lines() {
                    removed.push_str(&ex.state.buffer.line_text(line).unwrap_or_default());
                    removed.push_str(LINE_BREAK);
                }
                let mut unit = source.value.clone();
                if !unit.ends_with(LINE_BREAK) {
                    unit.push_str(LINE_BREAK);
                }
                let blob = unit.repeat(count);
                let body = blob.strip_suffix(LINE_BREAK).unwrap_or(&blob);
                let inserted = body.matches(LINE_BREAK).count() + 1;
                let span = Span::new(
                    ex.state.buffer.line_start(first),
                    ex.state.buffer.line_end(last),
                );
                ex.state.buffer_mut().replace(span, body);
                ex.state.note_lines_changed(first, range.count, inserted);
                let line = if move_caret_after_text {
                    (first + inserted).min(ex.state.buffer.last_line())
                } else {
                    first
                };
                ex.state.caret = Position::new(line, 0);
                Register::line_wise(removed)
            }
            VisualSelection::Block(block) => {
                let pieces = source.rows();
                let mut removed_rows = Vec::with_capacity(block.height);
                for (i, row) in block.rows().iter().enumerate() {
                    if row.line >= ex.state.buffer.line_count() {
                        break;
                    }
                    let piece = if pieces.len() == 1 {
                        pieces[0]
                    } else {
                        pieces.get(i).copied().unwrap_or("")
                    };
                    let mut text = piece.repeat(count);
                    let len = ex.state.buffer.line_len(row.line);
                    if len < row.start_column && !text.is_empty() {
                        text.insert_str(0, &" ".repeat(row.start_column - len));
                    }
                    let span = row.clipped(&ex.state.buffer);
                    removed_rows.push(ex.state.buffer_mut().replace(span, &text));
                }
                ex.state.caret = block.top_left;
                Register::block_wise(removed_rows.join(LINE_BREAK))
            }
        };
        ex.write_deleted(None, replaced);
    });
    trace!(target: "actions.exec", op = "put_over_selection", shape = ?selection.register_shape(), count, move_caret_after_text, "edit");
    CommandResult::completed()
}

/// Visual `D` / `X`: delete every line the selection touches; for a block,
/// only the block's columns on each row. Both record line-wise text.
pub(super) fn delete_line_selection(
    ex: &mut Executor<'_>,
    arg: &SelectionArg,
    register: Option<RegisterName>,
) -> CommandResult {
    let selection = match resolve(ex, arg) {
        Ok(sel) => sel,
        Err(e) => return e.into(),
    };
    ex.transaction("delete line selection", |ex| {
        let value = match selection {
            VisualSelection::Block(block) => {
                let mut value = String::new();
                for row in block.rows() {
                    if row.line >= ex.state.buffer.line_count() {
                        break;
                    }
                    let span = row.clipped(&ex.state.buffer);
                    value.push_str(&ex.state.buffer_mut().remove(span));
                    value.push_str(LINE_BREAK);
                }
                ex.state.set_caret(block.top_left);
                value
            }
            other => edit::remove_lines(ex.state, other.line_range()),
        };
        ex.write_deleted(register, Register::new(value, RegisterShape::LineWise));
    });
    ex.ops.clamp_virtual_edit(ex.state);
    trace!(target: "actions.exec", op = "delete_line_selection", shape = ?selection.register_shape(), "edit");
    CommandResult::completed()
}
