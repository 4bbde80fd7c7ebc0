//! Default `Operations` implementation driven by `core_config::Config`.
//!
//! Indentation honors `shift_width` / `tab_stop` / `expand_tab`; joins follow
//! the `J` / `gJ` whitespace rules; marks live in `EditorState::marks`.

use crate::command::{JoinKind, MAX_REPEATED_TEXT, repeat_fits};
use crate::ports::{OperationResult, Operations};
use crate::selection::LineRange;
use core_config::{Config, VirtualEditSetting};
use core_state::{EditorState, MarkId};
use core_text::caret::{self, VirtualEdit};
use core_text::{ColumnSpan, LINE_BREAK, Position, Span};
use tracing::{debug, trace};

pub struct HostOperations {
    config: Config,
    beeps: usize,
}

impl Default for HostOperations {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl HostOperations {
    pub fn new(config: Config) -> Self {
        Self { config, beeps: 0 }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of times the bell rang.
    pub fn beep_count(&self) -> usize {
        self.beeps
    }

    fn virtual_edit(&self) -> VirtualEdit {
        match self.config.virtual_edit() {
            VirtualEditSetting::None => VirtualEdit::None,
            VirtualEditSetting::OneMore => VirtualEdit::OneMore,
            VirtualEditSetting::All => VirtualEdit::All,
        }
    }

    /// Columns a shift of `count` steps moves, or `None` when that is too wide.
    fn shift_columns(&self, count: usize) -> Option<usize> {
        let columns = self.config.shift_width().checked_mul(count)?;
        (columns <= MAX_REPEATED_TEXT).then_some(columns)
    }

    /// Whitespace spanning `columns` display columns.
    fn indent_text(&self, columns: usize) -> String {
        if self.config.expand_tab() {
            return " ".repeat(columns);
        }
        let tab_stop = self.config.tab_stop();
        let mut out = "\t".repeat(columns / tab_stop);
        out.push_str(&" ".repeat(columns % tab_stop));
        out
    }

    fn indent_at(&self, state: &mut EditorState, line: usize, column: usize, columns: usize) {
        let text = self.indent_text(columns);
        let at = state.buffer.line_start(line) + column;
        state.buffer_mut().insert(at, &text);
    }

    /// Remove up to `columns` display columns of blanks starting at `column`.
    fn outdent_at(&self, state: &mut EditorState, line: usize, column: usize, columns: usize) {
        let Some(text) = state.buffer.line_text(line) else {
            return;
        };
        let tab_stop = self.config.tab_stop();
        let mut budget = columns;
        let mut removed = 0;
        for c in text.chars().skip(column) {
            if budget == 0 {
                break;
            }
            match c {
                ' ' => budget -= 1,
                '\t' => budget = budget.saturating_sub(tab_stop),
                _ => break,
            }
            removed += 1;
        }
        if removed > 0 {
            let start = state.buffer.line_start(line) + column;
            state.buffer_mut().remove(Span::new(start, start + removed));
        }
    }
}

impl Operations for HostOperations {
    fn beep(&mut self) {
        self.beeps += 1;
        debug!(target: "actions.host", beeps = self.beeps, "beep");
    }

    fn begin_transaction(&mut self, state: &mut EditorState, label: &'static str) {
        state.begin_transaction(label);
    }

    fn end_transaction(&mut self, state: &mut EditorState) {
        state.end_transaction();
    }

    fn insert_text(&mut self, state: &mut EditorState, text: &str, count: usize) {
        let count = count.max(1);
        if !repeat_fits(text.len(), count) {
            debug!(target: "actions.host", len = text.len(), count, "insert_too_large");
            return;
        }
        let text = text.repeat(count);
        if text.is_empty() {
            return;
        }
        let at = state.buffer.offset(state.caret);
        let line = state.caret.line;
        state.buffer_mut().insert(at, &text);
        let breaks = text.matches(LINE_BREAK).count();
        state.note_lines_changed(line + 1, 0, breaks);
        let end = state.buffer.position(at + text.chars().count() - 1);
        state.set_caret(end);
        trace!(target: "actions.host", op = "insert_text", len = text.len(), breaks, "edit");
    }

    fn join_lines(&mut self, state: &mut EditorState, range: LineRange, kind: JoinKind) -> usize {
        let range = range.clipped(&state.buffer);
        let mut joined = state.buffer.line_text(range.start_line).unwrap_or_default();
        let mut boundary = joined.chars().count();
        for line in range.start_line + 1..=range.last_line() {
            let next = state.buffer.line_text(line).unwrap_or_default();
            boundary = joined.chars().count();
            match kind {
                JoinKind::KeepEmptySpaces => joined.push_str(&next),
                JoinKind::RemoveEmptySpaces => {
                    let trimmed = next.trim_start_matches([' ', '\t']);
                    let separate = !joined.is_empty()
                        && !joined.ends_with([' ', '\t'])
                        && !trimmed.is_empty()
                        && !trimmed.starts_with(')');
                    if separate {
                        joined.push(' ');
                    }
                    joined.push_str(trimmed);
                }
            }
        }
        let span = Span::new(
            state.buffer.line_start(range.start_line),
            state.buffer.line_end(range.last_line()),
        );
        state.buffer_mut().replace(span, &joined);
        state.note_lines_changed(range.start_line + 1, range.count - 1, 0);
        trace!(target: "actions.host", op = "join_lines", first = range.start_line, count = range.count, ?kind, boundary, "edit");
        boundary
    }

    fn shift_lines_left(&mut self, state: &mut EditorState, range: LineRange, count: usize) {
        let Some(columns) = self.shift_columns(count) else {
            debug!(target: "actions.host", op = "shift_lines_left", count, "shift_too_wide");
            return;
        };
        for line in range.clipped(&state.buffer).lines() {
            self.outdent_at(state, line, 0, columns);
        }
        trace!(target: "actions.host", op = "shift_lines_left", first = range.start_line, count = range.count, columns, "edit");
    }

    fn shift_lines_right(&mut self, state: &mut EditorState, range: LineRange, count: usize) {
        let Some(columns) = self.shift_columns(count) else {
            debug!(target: "actions.host", op = "shift_lines_right", count, "shift_too_wide");
            return;
        };
        for line in range.clipped(&state.buffer).lines() {
            // Blank lines stay empty.
            if state.buffer.line_len(line) > 0 {
                self.indent_at(state, line, 0, columns);
            }
        }
        trace!(target: "actions.host", op = "shift_lines_right", first = range.start_line, count = range.count, columns, "edit");
    }

    fn shift_block_left(&mut self, state: &mut EditorState, rows: &[ColumnSpan], count: usize) {
        let Some(columns) = self.shift_columns(count) else {
            debug!(target: "actions.host", op = "shift_block_left", count, "shift_too_wide");
            return;
        };
        for row in rows {
            if row.line < state.buffer.line_count()
                && state.buffer.line_len(row.line) > row.start_column
            {
                self.outdent_at(state, row.line, row.start_column, columns);
            }
        }
        trace!(target: "actions.host", op = "shift_block_left", rows = rows.len(), columns, "edit");
    }

    fn shift_block_right(&mut self, state: &mut EditorState, rows: &[ColumnSpan], count: usize) {
        let Some(columns) = self.shift_columns(count) else {
            debug!(target: "actions.host", op = "shift_block_right", count, "shift_too_wide");
            return;
        };
        for row in rows {
            if row.line < state.buffer.line_count()
                && state.buffer.line_len(row.line) > row.start_column
            {
                self.indent_at(state, row.line, row.start_column, columns);
            }
        }
        trace!(target: "actions.host", op = "shift_block_right", rows = rows.len(), columns, "edit");
    }

    fn set_mark(&mut self, state: &mut EditorState, mark: char) -> OperationResult {
        match MarkId::from_char(mark) {
            Ok(id) => {
                state.marks.set(id, state.caret);
                OperationResult::Succeeded
            }
            Err(e) => OperationResult::Failed(e.to_string()),
        }
    }

    fn jump_to_mark(&mut self, state: &mut EditorState, mark: char) -> OperationResult {
        let Ok(id) = MarkId::from_char(mark) else {
            return OperationResult::Failed("E78: Unknown mark".to_string());
        };
        let Some(target) = state.marks.get(id) else {
            return OperationResult::Failed("E20: Mark not set".to_string());
        };
        if target.line >= state.buffer.line_count() {
            return OperationResult::Failed("E19: Mark has invalid line number".to_string());
        }
        let from = state.caret;
        state.marks.set(MarkId::LastJump, from);
        let mut to = target;
        caret::clamp_position(&state.buffer, &mut to, self.virtual_edit());
        state.caret = to;
        trace!(target: "actions.host", op = "jump_to_mark", mark = %id, line = to.line, column = to.column, "jump");
        OperationResult::Succeeded
    }

    fn clamp_virtual_edit(&mut self, state: &mut EditorState) {
        let mut pos: Position = state.caret;
        caret::clamp_position(&state.buffer, &mut pos, self.virtual_edit());
        state.caret = pos;
    }

    fn beep_on_jump_failure(&self) -> bool {
        self.config.beep_on_jump_failure()
    }
}
