use super::Executor;
use crate::command::CommandResult;
use crate::ports::OperationResult;
use tracing::debug;

/// `m{c}`. A rejected mark rings the bell and reports the error.
pub(super) fn set_mark(ex: &mut Executor<'_>, mark: char) -> CommandResult {
    match ex.ops.set_mark(ex.state, mark) {
        OperationResult::Succeeded => {}
        OperationResult::Failed(message) => {
            debug!(target: "actions.exec", op = "set_mark", %mark, %message, "mark_rejected");
            ex.beep();
            ex.status.on_error(&message);
        }
    }
    CommandResult::completed()
}

/// `` `{c} ``. Failures are reported; the bell only rings when the host asks for it.
pub(super) fn jump_to_mark(ex: &mut Executor<'_>, mark: char) -> CommandResult {
    match ex.ops.jump_to_mark(ex.state, mark) {
        OperationResult::Succeeded => {}
        OperationResult::Failed(message) => {
            debug!(target: "actions.exec", op = "jump_to_mark", %mark, %message, "jump_failed");
            if ex.ops.beep_on_jump_failure() {
                ex.beep();
            }
            ex.status.on_error(&message);
        }
    }
    CommandResult::completed()
}
