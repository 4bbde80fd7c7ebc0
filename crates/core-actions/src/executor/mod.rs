//! Command execution.
//!
//! `Executor::execute` dispatches one `Command` against the editor state and
//! returns a `CommandResult`. Handlers live in sibling modules grouped by
//! concern (`edit`, `motion`, `visual`, `marks`); repeat handling is in
//! `repeat`. Every buffer-changing handler runs inside one undo transaction
//! opened through the `Operations` port, so a command is one undo unit.
//!
//! Failure policy: out-of-range counts and empty registers beep and return
//! `Completed` without touching the buffer; spans or selections that do not
//! fit the buffer return `CommandResult::Error`.

mod edit;
mod marks;
mod motion;
mod repeat;
mod visual;

pub use repeat::RECURSIVE_REPEAT_MESSAGE;

use crate::command::{Command, CommandFlags, CommandResult, InvocationData, StoredCommand};
use crate::ports::{Operations, StatusSink};
use crate::session::CommandSession;
use core_state::{EditorState, Register, RegisterName, RegisterShape};
use tracing::{debug, trace};

pub struct Executor<'a> {
    pub(crate) state: &'a mut EditorState,
    pub(crate) session: &'a mut CommandSession,
    pub(crate) ops: &'a mut dyn Operations,
    pub(crate) status: &'a mut dyn StatusSink,
    repeating: bool,
}

impl<'a> Executor<'a> {
    pub fn new(
        state: &'a mut EditorState,
        session: &'a mut CommandSession,
        ops: &'a mut dyn Operations,
        status: &'a mut dyn StatusSink,
    ) -> Self {
        Self {
            state,
            session,
            ops,
            status,
            repeating: false,
        }
    }

    pub fn state(&self) -> &EditorState {
        &*self.state
    }

    pub fn state_mut(&mut self) -> &mut EditorState {
        &mut *self.state
    }

    pub fn session(&self) -> &CommandSession {
        &*self.session
    }

    /// True while a repeat is replaying a stored command.
    pub fn is_repeating(&self) -> bool {
        self.repeating
    }

    /// Execute `command` once. Does not touch the last-command slot.
    pub fn execute(&mut self, command: &Command, data: InvocationData) -> CommandResult {
        let count = data.count_or_default();
        let register = data.register;
        let caret = self.state.caret;
        debug!(target: "actions.exec", op = command.name(), count, line = caret.line, column = caret.column, repeating = self.repeating, "execute");
        let result = match command {
            Command::ReplaceChar(c) => edit::replace_char(self, *c, count),
            Command::ChangeMotion(arg) => motion::change_motion(self, arg, register),
            Command::DeleteCharacterAtCaret => edit::delete_char_at_caret(self, count, register),
            Command::DeleteCharacterBeforeCaret => {
                edit::delete_char_before_caret(self, count, register)
            }
            Command::DeleteLines => edit::delete_lines(self, count, register),
            Command::ChangeCaseCaretPoint(kind) => edit::change_case_point(self, *kind, count),
            Command::ChangeCaseCaretLine(kind) => edit::change_case_line(self, *kind),
            Command::JoinLines(kind) => edit::join_lines(self, *kind, data.count),
            Command::ShiftLinesLeftVisual(arg) => visual::shift(self, arg, count, visual::Shift::Left),
            Command::ShiftLinesRightVisual(arg) => {
                visual::shift(self, arg, count, visual::Shift::Right)
            }
            Command::PutOverSelection {
                selection,
                move_caret_after_text,
            } => visual::put_over_selection(self, selection, *move_caret_after_text, count, register),
            Command::DeleteLineSelection(arg) => visual::delete_line_selection(self, arg, register),
            Command::SetMarkToCaret(mark) => marks::set_mark(self, *mark),
            Command::JumpToMark(mark) => marks::jump_to_mark(self, *mark),
            Command::Ping(ping) => {
                let ping = ping.clone();
                ping.invoke(self, data)
            }
        };
        if let CommandResult::Error(e) = &result {
            debug!(target: "actions.exec", op = command.name(), error = %e, "execute_failed");
        }
        result
    }

    /// Execute `command` as a fresh (non-repeat) invocation and, when it
    /// completes with `REPEATABLE`, record it for repeat.
    pub fn run(&mut self, command: &Command, data: InvocationData, flags: CommandFlags) -> CommandResult {
        let stored = (flags.contains(CommandFlags::REPEATABLE) && !self.repeating)
            .then(|| command.detached(&self.state.buffer));
        let result = self.execute(command, data);
        if self.repeating || !result.is_completed() {
            return result;
        }
        match stored {
            Some(cmd) => {
                trace!(target: "actions.repeat", op = command.name(), ?flags, "last_command_stored");
                self.session.store(StoredCommand::Simple(cmd, data, flags));
            }
            None => self.session.break_link(),
        }
        result
    }

    /// Record text typed in insert mode so repeat can replay it.
    pub fn record_text_insertion(&mut self, text: impl Into<String>) {
        if self.repeating {
            return;
        }
        let text = text.into();
        trace!(target: "actions.repeat", len = text.len(), "text_insertion_stored");
        self.session.store(StoredCommand::TextInsertion(text));
    }

    pub(crate) fn beep(&mut self) {
        self.ops.beep();
    }

    /// Run `f` inside one undo transaction.
    pub(crate) fn transaction<R>(&mut self, label: &'static str, f: impl FnOnce(&mut Self) -> R) -> R {
        self.ops.begin_transaction(self.state, label);
        let result = f(self);
        self.ops.end_transaction(self.state);
        result
    }

    /// Store deleted or replaced text.
    ///
    /// Blackhole discards. An explicit register receives the text and the
    /// unnamed register mirrors it. Without one, multi-line and line-wise text
    /// rotates into `"1`, smaller deletes go to `"-`, and the unnamed register
    /// holds the text either way.
    pub(crate) fn write_deleted(&mut self, target: Option<RegisterName>, register: Register) {
        let registers = &mut self.state.registers;
        match target {
            Some(RegisterName::Blackhole) => {
                trace!(target: "actions.exec", "register_write_discarded");
            }
            Some(RegisterName::Unnamed) | None => {
                if register.shape == RegisterShape::LineWise || register.value.contains('\n') {
                    registers.rotate_numbered(register.clone());
                } else {
                    registers.set(RegisterName::SmallDelete, register.clone());
                }
                registers.set(RegisterName::Unnamed, register);
            }
            Some(name) => {
                registers.set(name, register.clone());
                registers.set(RegisterName::Unnamed, register);
            }
        }
    }
}
