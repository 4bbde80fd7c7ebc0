use crate::command::{CommandFlags, StoredCommand};
use tracing::trace;

/// Session-scoped repeat state: the last repeatable command.
///
/// Replaced only after a repeatable command completes outside a repeat. A
/// command flagged `LINK_WITH_NEXT` leaves a pending link so the next stored
/// entry (typically the text insertion that ends a change) is chained onto it.
#[derive(Debug, Default, Clone)]
pub struct CommandSession {
    last_command: Option<StoredCommand>,
    link_pending: bool,
}

impl CommandSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_command(&self) -> Option<&StoredCommand> {
        self.last_command.as_ref()
    }

    pub fn set_last_command(&mut self, command: Option<StoredCommand>) {
        self.link_pending = command
            .as_ref()
            .is_some_and(|c| c.flags().contains(CommandFlags::LINK_WITH_NEXT));
        self.last_command = command;
    }

    pub fn is_link_pending(&self) -> bool {
        self.link_pending
    }

    /// Record `command`, chaining it onto the previous entry when a link is pending.
    pub fn store(&mut self, command: StoredCommand) {
        let stored = match self.last_command.take() {
            Some(prev) if self.link_pending => {
                trace!(target: "actions.repeat", "last_command_linked");
                StoredCommand::link(prev, command)
            }
            _ => command,
        };
        self.link_pending = stored.flags().contains(CommandFlags::LINK_WITH_NEXT);
        self.last_command = Some(stored);
    }

    /// Drop a pending link without touching the stored command.
    pub fn break_link(&mut self) {
        self.link_pending = false;
    }

    pub fn clear(&mut self) {
        self.last_command = None;
        self.link_pending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Command, InvocationData};

    fn simple(flags: CommandFlags) -> StoredCommand {
        StoredCommand::Simple(Command::DeleteLines, InvocationData::default(), flags)
    }

    #[test]
    fn link_with_next_chains_following_entry() {
        let mut session = CommandSession::new();
        session.store(simple(CommandFlags::REPEATABLE | CommandFlags::LINK_WITH_NEXT));
        assert!(session.is_link_pending());
        session.store(StoredCommand::TextInsertion("abc".into()));
        assert!(matches!(
            session.last_command(),
            Some(StoredCommand::Linked(_, second)) if **second == StoredCommand::TextInsertion("abc".into())
        ));
        assert!(!session.is_link_pending());
    }

    #[test]
    fn broken_link_replaces_entry() {
        let mut session = CommandSession::new();
        session.store(simple(CommandFlags::REPEATABLE | CommandFlags::LINK_WITH_NEXT));
        session.break_link();
        session.store(StoredCommand::TextInsertion("x".into()));
        assert_eq!(
            session.last_command(),
            Some(&StoredCommand::TextInsertion("x".into()))
        );
    }
}
