//! Repeat (`.`) engine.
//!
//! Replays the session's last command. Only the first part of a linked entry
//! sees the new count/register; later parts keep their original data. A
//! repeat issued while one is already running is refused with a message
//! instead of recursing.

use super::Executor;
use crate::command::{CommandResult, InvocationData, StoredCommand, repeat_fits};
use tracing::{debug, warn};

pub const RECURSIVE_REPEAT_MESSAGE: &str = "Recursive repeat detected";

impl Executor<'_> {
    /// Replay the last repeatable command with `data` overriding its stored
    /// count and register. The last-command slot is left as it was.
    pub fn repeat_last_command(&mut self, data: InvocationData) {
        if self.repeating {
            warn!(target: "actions.repeat", "recursive_repeat");
            self.beep();
            self.status.on_error(RECURSIVE_REPEAT_MESSAGE);
            return;
        }
        let Some(stored) = self.session.last_command().cloned() else {
            debug!(target: "actions.repeat", "nothing_to_repeat");
            self.beep();
            return;
        };
        self.repeating = true;
        let result = self.replay(&stored, data);
        self.repeating = false;
        debug!(target: "actions.repeat", completed = result.is_completed(), count = ?data.count, "repeat_done");
    }

    fn replay(&mut self, stored: &StoredCommand, data: InvocationData) -> CommandResult {
        match stored {
            StoredCommand::Simple(command, original, _) => {
                self.execute(command, original.override_with(data))
            }
            StoredCommand::TextInsertion(text) => {
                let count = data.count_or_default();
                if !repeat_fits(text.len(), count) {
                    debug!(target: "actions.repeat", len = text.len(), count, "insertion_too_large");
                    self.beep();
                    return CommandResult::completed();
                }
                self.transaction("repeat insert", |ex| ex.ops.insert_text(ex.state, text, count));
                CommandResult::completed()
            }
            StoredCommand::Linked(first, second) => {
                let result = self.replay(first, data);
                if result.is_error() {
                    return result;
                }
                CommandResult::chained(self.replay(second, InvocationData::default()))
            }
        }
    }
}
