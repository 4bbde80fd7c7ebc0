//! Command execution core.
//!
//! A host (mode layer, key translator) resolves user input into a `Command`
//! plus `InvocationData` and hands it to an `Executor` built over the
//! editor state, the session's repeat slot, an `Operations` implementation
//! and a `StatusSink`:
//!
//! ```ignore
//! let mut exec = Executor::new(&mut state, &mut session, &mut ops, &mut status);
//! exec.run(&Command::DeleteLines, InvocationData::with_count(2), CommandFlags::REPEATABLE);
//! exec.repeat_last_command(InvocationData::default());
//! ```
//!
//! `HostOperations` is the stock `Operations` implementation, configured by
//! `core_config::Config`.

pub mod command;
pub mod executor;
pub mod host;
pub mod ports;
pub mod selection;
pub mod session;

pub use command::{
    CaseKind, Command, CommandError, CommandFlags, CommandResult, InvocationData, JoinKind,
    MAX_REPEATED_TEXT, MotionArg, MotionExtent, MotionKind, MotionResult, OperationKind, PingData,
    StoredCommand, StoredMotion, repeat_fits,
};
pub use executor::{Executor, RECURSIVE_REPEAT_MESSAGE};
pub use host::HostOperations;
pub use ports::{OperationResult, Operations, StatusSink};
pub use selection::{
    BlockSelection, CharacterSpan, LineRange, SelectionArg, StoredSelection, VisualSelection,
};
pub use session::CommandSession;
