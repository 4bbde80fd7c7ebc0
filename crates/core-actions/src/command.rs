//! Command data model.
//!
//! `Command` is the executable unit handed to the `Executor`; it carries only
//! what its handler needs; count and register arrive separately in
//! `InvocationData` so a repeat can override them. `StoredCommand` is what the
//! repeat slot retains. Position-dependent arguments (visual selections,
//! resolved motion spans) are stored in their position-independent form so a
//! replay re-anchors them at the caret.

use crate::executor::Executor;
use crate::selection::{SelectionArg, StoredSelection};
use core_state::RegisterName;
use core_text::{Buffer, Position, Span};
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Per-invocation override context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InvocationData {
    /// Explicit count; `None` means "command default" (1).
    pub count: Option<usize>,
    pub register: Option<RegisterName>,
}

impl InvocationData {
    pub fn new(count: Option<usize>, register: Option<RegisterName>) -> Self {
        Self {
            count: count.filter(|c| *c > 0),
            register,
        }
    }

    pub fn with_count(count: usize) -> Self {
        Self::new(Some(count), None)
    }

    pub fn with_register(register: RegisterName) -> Self {
        Self::new(None, Some(register))
    }

    /// Count to apply, defaulting to 1.
    pub fn count_or_default(&self) -> usize {
        self.count.unwrap_or(1)
    }

    /// Fields supplied by `newer` win; absent ones keep `self`'s values.
    pub fn override_with(&self, newer: InvocationData) -> InvocationData {
        InvocationData {
            count: newer.count.or(self.count),
            register: newer.register.or(self.register),
        }
    }
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct CommandFlags: u8 {
        /// Successful execution replaces the last-command slot.
        const REPEATABLE     = 0b0000_0001;
        /// The next repeatable command (or text insertion) is linked onto this one.
        const LINK_WITH_NEXT = 0b0000_0010;
    }
}

/// Upper bound, in bytes, on text a counted put, insertion or shift produces.
pub const MAX_REPEATED_TEXT: usize = 1 << 20;

/// Whether `count` copies of `unit_len` bytes stay within `MAX_REPEATED_TEXT`.
pub fn repeat_fits(unit_len: usize, count: usize) -> bool {
    unit_len
        .checked_mul(count)
        .is_some_and(|total| total <= MAX_REPEATED_TEXT)
}

/// Case transform applied by the change-case commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseKind {
    UpperCase,
    LowerCase,
    Rot13,
    ToggleCase,
}

impl CaseKind {
    pub fn apply(self, c: char) -> char {
        match self {
            CaseKind::UpperCase => single_char(c.to_uppercase(), c),
            CaseKind::LowerCase => single_char(c.to_lowercase(), c),
            CaseKind::ToggleCase => {
                if c.is_uppercase() {
                    single_char(c.to_lowercase(), c)
                } else if c.is_lowercase() {
                    single_char(c.to_uppercase(), c)
                } else {
                    c
                }
            }
            CaseKind::Rot13 => match c {
                'a'..='z' => (((c as u8 - b'a') + 13) % 26 + b'a') as char,
                'A'..='Z' => (((c as u8 - b'A') + 13) % 26 + b'A') as char,
                _ => c,
            },
        }
    }
}

// Case mappings that expand to several chars (e.g. 'ß' -> "SS") keep the original.
fn single_char(mut mapped: impl Iterator<Item = char>, original: char) -> char {
    match (mapped.next(), mapped.next()) {
        (Some(c), None) => c,
        _ => original,
    }
}

/// Whitespace policy at each join point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    /// `J`: drop the next line's indentation and separate with one space.
    RemoveEmptySpaces,
    /// `gJ`: concatenate verbatim.
    KeepEmptySpaces,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionKind {
    CharacterWiseExclusive,
    CharacterWiseInclusive,
    LineWise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    CharacterWise,
    LineWise,
}

/// A motion already resolved by the motion layer into a concrete span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionResult {
    pub span: Span,
    pub is_forward: bool,
    pub is_any_word: bool,
    pub motion_kind: MotionKind,
    pub operation_kind: OperationKind,
}

impl MotionResult {
    pub fn is_line_wise(&self) -> bool {
        self.operation_kind == OperationKind::LineWise || self.motion_kind == MotionKind::LineWise
    }
}

/// Size of a resolved motion, detached from where it was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionExtent {
    Chars(usize),
    Lines(usize),
}

/// Position-independent form of a `MotionResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredMotion {
    pub extent: MotionExtent,
    pub is_forward: bool,
    pub is_any_word: bool,
    pub motion_kind: MotionKind,
    pub operation_kind: OperationKind,
}

impl StoredMotion {
    pub fn from_resolved(motion: &MotionResult, buffer: &Buffer) -> Self {
        let extent = if motion.is_line_wise() {
            let first = buffer.position(motion.span.start).line;
            let last = buffer.position(motion.span.end.max(motion.span.start + 1) - 1).line;
            MotionExtent::Lines(last.saturating_sub(first) + 1)
        } else {
            MotionExtent::Chars(motion.span.len())
        };
        Self {
            extent,
            is_forward: motion.is_forward,
            is_any_word: motion.is_any_word,
            motion_kind: motion.motion_kind,
            operation_kind: motion.operation_kind,
        }
    }

    /// Re-anchor at `caret`: forward motions start there, backward motions end there.
    pub fn resolve(&self, caret: Position, buffer: &Buffer) -> MotionResult {
        let anchor = buffer.offset(caret);
        let span = match self.extent {
            MotionExtent::Lines(n) => {
                let first = caret.line.min(buffer.last_line());
                let last = (first + n.max(1) - 1).min(buffer.last_line());
                Span::new(buffer.line_start(first), buffer.line_end(last))
            }
            MotionExtent::Chars(n) if self.is_forward => {
                Span::new(anchor, (anchor + n).min(buffer.len_chars()))
            }
            MotionExtent::Chars(n) => Span::new(anchor.saturating_sub(n), anchor),
        };
        MotionResult {
            span,
            is_forward: self.is_forward,
            is_any_word: self.is_any_word,
            motion_kind: self.motion_kind,
            operation_kind: self.operation_kind,
        }
    }
}

/// Motion argument of a change command: live (absolute span) or stored for replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionArg {
    Resolved(MotionResult),
    Stored(StoredMotion),
}

impl From<MotionResult> for MotionArg {
    fn from(m: MotionResult) -> Self {
        MotionArg::Resolved(m)
    }
}

type PingFn = dyn Fn(&mut Executor<'_>, InvocationData) -> CommandResult;

/// Test hook command: runs an arbitrary callback against the executor.
#[derive(Clone)]
pub struct PingData(Rc<PingFn>);

impl PingData {
    pub fn new(f: impl Fn(&mut Executor<'_>, InvocationData) -> CommandResult + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub(crate) fn invoke(&self, executor: &mut Executor<'_>, data: InvocationData) -> CommandResult {
        (self.0)(executor, data)
    }
}

impl PartialEq for PingData {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for PingData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PingData(..)")
    }
}

/// Executable editing command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `r{char}`
    ReplaceChar(char),
    /// `c{motion}`
    ChangeMotion(MotionArg),
    /// `x`
    DeleteCharacterAtCaret,
    /// `X`
    DeleteCharacterBeforeCaret,
    /// `dd`
    DeleteLines,
    /// `~` / `g~l` family
    ChangeCaseCaretPoint(CaseKind),
    /// `g~~` / `gUU` / `guu` / `g??`
    ChangeCaseCaretLine(CaseKind),
    /// `J` / `gJ`
    JoinLines(JoinKind),
    /// visual `<`
    ShiftLinesLeftVisual(SelectionArg),
    /// visual `>`
    ShiftLinesRightVisual(SelectionArg),
    /// visual `p` / `gp`
    PutOverSelection {
        selection: SelectionArg,
        move_caret_after_text: bool,
    },
    /// visual `D` / `X`
    DeleteLineSelection(SelectionArg),
    /// `m{mark}`
    SetMarkToCaret(char),
    /// `` `{mark} ``
    JumpToMark(char),
    Ping(PingData),
}

impl Command {
    /// Short label used for tracing and undo transaction names.
    pub fn name(&self) -> &'static str {
        match self {
            Command::ReplaceChar(_) => "replace char",
            Command::ChangeMotion(_) => "change motion",
            Command::DeleteCharacterAtCaret => "delete char at caret",
            Command::DeleteCharacterBeforeCaret => "delete char before caret",
            Command::DeleteLines => "delete lines",
            Command::ChangeCaseCaretPoint(_) => "change case point",
            Command::ChangeCaseCaretLine(_) => "change case line",
            Command::JoinLines(_) => "join lines",
            Command::ShiftLinesLeftVisual(_) => "shift left",
            Command::ShiftLinesRightVisual(_) => "shift right",
            Command::PutOverSelection { .. } => "put over selection",
            Command::DeleteLineSelection(_) => "delete line selection",
            Command::SetMarkToCaret(_) => "set mark",
            Command::JumpToMark(_) => "jump to mark",
            Command::Ping(_) => "ping",
        }
    }

    /// Copy of this command with every position-dependent argument converted
    /// to its stored form, suitable for the repeat slot.
    pub fn detached(&self, buffer: &Buffer) -> Command {
        let store = |arg: &SelectionArg| match arg {
            SelectionArg::Live(sel) => SelectionArg::Stored(StoredSelection::encode(sel)),
            SelectionArg::Stored(s) => SelectionArg::Stored(*s),
        };
        match self {
            Command::ChangeMotion(MotionArg::Resolved(m)) => {
                Command::ChangeMotion(MotionArg::Stored(StoredMotion::from_resolved(m, buffer)))
            }
            Command::ShiftLinesLeftVisual(arg) => Command::ShiftLinesLeftVisual(store(arg)),
            Command::ShiftLinesRightVisual(arg) => Command::ShiftLinesRightVisual(store(arg)),
            Command::PutOverSelection {
                selection,
                move_caret_after_text,
            } => Command::PutOverSelection {
                selection: store(selection),
                move_caret_after_text: *move_caret_after_text,
            },
            Command::DeleteLineSelection(arg) => Command::DeleteLineSelection(store(arg)),
            other => other.clone(),
        }
    }
}

/// Entry retained for repeat. Never mutated once stored.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredCommand {
    Simple(Command, InvocationData, CommandFlags),
    Linked(Box<StoredCommand>, Box<StoredCommand>),
    TextInsertion(String),
}

impl StoredCommand {
    pub fn link(first: StoredCommand, second: StoredCommand) -> StoredCommand {
        StoredCommand::Linked(Box::new(first), Box::new(second))
    }

    /// Flags of the most recent part (the second half of a link).
    pub fn flags(&self) -> CommandFlags {
        match self {
            StoredCommand::Simple(_, _, flags) => *flags,
            StoredCommand::Linked(_, second) => second.flags(),
            StoredCommand::TextInsertion(_) => CommandFlags::REPEATABLE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("motion span {start}..{end} is outside the buffer ({len} chars)")]
    InvalidMotion { start: usize, end: usize, len: usize },
    #[error("selection does not fit the buffer: {0}")]
    InvalidSelection(String),
}

/// Outcome of executing a command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// Finished (possibly as a no-op + beep); may wrap the result of a chained command.
    Completed(Option<Box<CommandResult>>),
    Error(CommandError),
}

impl CommandResult {
    pub fn completed() -> Self {
        CommandResult::Completed(None)
    }

    pub fn chained(inner: CommandResult) -> Self {
        CommandResult::Completed(Some(Box::new(inner)))
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, CommandResult::Completed(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CommandResult::Error(_))
    }
}

impl From<CommandError> for CommandResult {
    fn from(e: CommandError) -> Self {
        CommandResult::Error(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rot13_wraps_and_preserves_case() {
        let out: String = "Hello, World! xyz"
            .chars()
            .map(|c| CaseKind::Rot13.apply(c))
            .collect();
        assert_eq!(out, "Uryyb, Jbeyq! klm");
    }

    #[test]
    fn toggle_case_passes_non_alpha() {
        let out: String = "aB1-ç".chars().map(|c| CaseKind::ToggleCase.apply(c)).collect();
        assert_eq!(out, "Ab1-Ç");
    }

    #[test]
    fn multi_char_case_mapping_keeps_original() {
        assert_eq!(CaseKind::UpperCase.apply('ß'), 'ß');
        assert_eq!(CaseKind::UpperCase.apply('q'), 'Q');
    }

    #[test]
    fn override_keeps_absent_fields() {
        let orig = InvocationData::new(Some(3), Some(RegisterName::Named('a')));
        let merged = orig.override_with(InvocationData::with_count(5));
        assert_eq!(merged.count, Some(5));
        assert_eq!(merged.register, Some(RegisterName::Named('a')));
        assert_eq!(orig.override_with(InvocationData::default()), orig);
    }

    #[test]
    fn zero_count_means_default() {
        assert_eq!(InvocationData::with_count(0).count, None);
        assert_eq!(InvocationData::default().count_or_default(), 1);
    }

    #[test]
    fn stored_motion_reanchors_forward_and_backward() {
        let buffer = Buffer::from_str("t", "one two three").unwrap();
        let fwd = MotionResult {
            span: Span::new(0, 4),
            is_forward: true,
            is_any_word: true,
            motion_kind: MotionKind::CharacterWiseExclusive,
            operation_kind: OperationKind::CharacterWise,
        };
        let stored = StoredMotion::from_resolved(&fwd, &buffer);
        assert_eq!(stored.extent, MotionExtent::Chars(4));
        assert_eq!(
            stored.resolve(Position::new(0, 4), &buffer).span,
            Span::new(4, 8)
        );
        let back = MotionResult {
            is_forward: false,
            ..fwd
        };
        let stored = StoredMotion::from_resolved(&back, &buffer);
        assert_eq!(
            stored.resolve(Position::new(0, 2), &buffer).span,
            Span::new(0, 2)
        );
    }

    #[test]
    fn linked_flags_follow_second_part() {
        let first = StoredCommand::Simple(
            Command::DeleteLines,
            InvocationData::default(),
            CommandFlags::REPEATABLE | CommandFlags::LINK_WITH_NEXT,
        );
        let linked = StoredCommand::link(first, StoredCommand::TextInsertion("x".into()));
        assert_eq!(linked.flags(), CommandFlags::REPEATABLE);
    }
}
