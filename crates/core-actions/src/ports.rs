//! Collaborator interfaces the executor calls out to.
//!
//! The executor owns command semantics (counts, clipping, register policy,
//! caret placement). Formatting-sensitive edits (indentation, joins, text
//! insertion), mark bookkeeping, undo grouping and the bell are delegated to an
//! `Operations` implementation so hosts can substitute their own. Errors that
//! should reach the user go through a `StatusSink`.

use crate::command::JoinKind;
use crate::selection::LineRange;
use core_state::EditorState;
use core_text::ColumnSpan;

/// Outcome reported by a fallible collaborator operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResult {
    Succeeded,
    Failed(String),
}

impl OperationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, OperationResult::Succeeded)
    }
}

pub trait Operations {
    /// Audible/visual bell.
    fn beep(&mut self);

    /// Open an undo scope. Scopes nest; only the outermost produces an undo unit.
    fn begin_transaction(&mut self, state: &mut EditorState, label: &'static str);
    fn end_transaction(&mut self, state: &mut EditorState);

    /// Insert `text` `count` times at the caret.
    fn insert_text(&mut self, state: &mut EditorState, text: &str, count: usize);

    /// Join every line of `range` into its first line. Returns the column of
    /// the last join boundary in the resulting line.
    fn join_lines(&mut self, state: &mut EditorState, range: LineRange, kind: JoinKind) -> usize;

    fn shift_lines_left(&mut self, state: &mut EditorState, range: LineRange, count: usize);
    fn shift_lines_right(&mut self, state: &mut EditorState, range: LineRange, count: usize);
    fn shift_block_left(&mut self, state: &mut EditorState, rows: &[ColumnSpan], count: usize);
    fn shift_block_right(&mut self, state: &mut EditorState, rows: &[ColumnSpan], count: usize);

    /// Store the caret under mark `mark`.
    fn set_mark(&mut self, state: &mut EditorState, mark: char) -> OperationResult;
    /// Move the caret to mark `mark`.
    fn jump_to_mark(&mut self, state: &mut EditorState, mark: char) -> OperationResult;

    /// Pull the caret back inside the line according to the virtual-edit setting.
    fn clamp_virtual_edit(&mut self, state: &mut EditorState);

    /// Whether a failed mark jump should also ring the bell.
    fn beep_on_jump_failure(&self) -> bool {
        false
    }
}

/// Receiver for user-facing status and error messages.
pub trait StatusSink {
    fn on_error(&mut self, message: &str);

    fn on_status(&mut self, _message: &str) {}
}

impl StatusSink for Vec<String> {
    fn on_error(&mut self, message: &str) {
        self.push(message.to_string());
    }
}
