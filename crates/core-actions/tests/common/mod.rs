#![allow(dead_code)] // Shared across many integration tests; each test binary uses a subset of helpers.

use core_actions::{
    Command, CommandFlags, CommandResult, CommandSession, Executor, HostOperations, InvocationData,
    JoinKind, LineRange, OperationResult, Operations,
};
use core_config::Config;
use core_state::{EditorState, Register, RegisterName};
use core_text::{Buffer, ColumnSpan, Position};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// `HostOperations` wrapper that records every port call.
pub struct RecordingOperations {
    inner: HostOperations,
    pub beeps: usize,
    pub calls: Vec<String>,
    pub open_transactions: usize,
    pub transactions: usize,
}

impl RecordingOperations {
    pub fn new(config: Config) -> Self {
        Self {
            inner: HostOperations::new(config),
            beeps: 0,
            calls: Vec::new(),
            open_transactions: 0,
            transactions: 0,
        }
    }
}

impl Operations for RecordingOperations {
    fn beep(&mut self) {
        self.beeps += 1;
        self.calls.push("beep".into());
        self.inner.beep();
    }

    fn begin_transaction(&mut self, state: &mut EditorState, label: &'static str) {
        self.open_transactions += 1;
        self.transactions += 1;
        self.inner.begin_transaction(state, label);
    }

    fn end_transaction(&mut self, state: &mut EditorState) {
        self.open_transactions -= 1;
        self.inner.end_transaction(state);
    }

    fn insert_text(&mut self, state: &mut EditorState, text: &str, count: usize) {
        self.calls.push(format!("insert_text({text:?}, {count})"));
        self.inner.insert_text(state, text, count);
    }

    fn join_lines(&mut self, state: &mut EditorState, range: LineRange, kind: JoinKind) -> usize {
        self.calls
            .push(format!("join_lines({}, {})", range.start_line, range.count));
        self.inner.join_lines(state, range, kind)
    }

    fn shift_lines_left(&mut self, state: &mut EditorState, range: LineRange, count: usize) {
        self.calls
            .push(format!("shift_lines_left({}, {}, {count})", range.start_line, range.count));
        self.inner.shift_lines_left(state, range, count);
    }

    fn shift_lines_right(&mut self, state: &mut EditorState, range: LineRange, count: usize) {
        self.calls
            .push(format!("shift_lines_right({}, {}, {count})", range.start_line, range.count));
        self.inner.shift_lines_right(state, range, count);
    }

    fn shift_block_left(&mut self, state: &mut EditorState, rows: &[ColumnSpan], count: usize) {
        self.calls
            .push(format!("shift_block_left({} rows, {count})", rows.len()));
        self.inner.shift_block_left(state, rows, count);
    }

    fn shift_block_right(&mut self, state: &mut EditorState, rows: &[ColumnSpan], count: usize) {
        self.calls
            .push(format!("shift_block_right({} rows, {count})", rows.len()));
        self.inner.shift_block_right(state, rows, count);
    }

    fn set_mark(&mut self, state: &mut EditorState, mark: char) -> OperationResult {
        self.calls.push(format!("set_mark({mark})"));
        self.inner.set_mark(state, mark)
    }

    fn jump_to_mark(&mut self, state: &mut EditorState, mark: char) -> OperationResult {
        self.calls.push(format!("jump_to_mark({mark})"));
        self.inner.jump_to_mark(state, mark)
    }

    fn clamp_virtual_edit(&mut self, state: &mut EditorState) {
        self.calls.push("clamp_virtual_edit".into());
        self.inner.clamp_virtual_edit(state);
    }

    fn beep_on_jump_failure(&self) -> bool {
        self.inner.beep_on_jump_failure()
    }
}

/// Owns everything an `Executor` borrows.
pub struct Harness {
    pub state: EditorState,
    pub session: CommandSession,
    pub ops: RecordingOperations,
    pub status: Vec<String>,
}

impl Harness {
    pub fn new(lines: &[&str]) -> Self {
        Self::with_config(lines, Config::default())
    }

    pub fn with_config(lines: &[&str], config: Config) -> Self {
        init_tracing();
        let buffer = Buffer::from_lines("test", lines).unwrap();
        Self {
            state: EditorState::new(buffer),
            session: CommandSession::new(),
            ops: RecordingOperations::new(config),
            status: Vec::new(),
        }
    }

    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.state.caret = Position::new(line, column);
        self
    }

    pub fn executor(&mut self) -> Executor<'_> {
        Executor::new(
            &mut self.state,
            &mut self.session,
            &mut self.ops,
            &mut self.status,
        )
    }

    pub fn execute(&mut self, command: Command, data: InvocationData) -> CommandResult {
        let result = self.executor().execute(&command, data);
        assert_eq!(self.ops.open_transactions, 0, "unbalanced transaction");
        result
    }

    pub fn run(&mut self, command: Command, data: InvocationData) -> CommandResult {
        self.run_with(command, data, CommandFlags::REPEATABLE)
    }

    pub fn run_with(
        &mut self,
        command: Command,
        data: InvocationData,
        flags: CommandFlags,
    ) -> CommandResult {
        let result = self.executor().run(&command, data, flags);
        assert_eq!(self.ops.open_transactions, 0, "unbalanced transaction");
        result
    }

    pub fn repeat(&mut self, data: InvocationData) {
        self.executor().repeat_last_command(data);
        assert_eq!(self.ops.open_transactions, 0, "unbalanced transaction");
    }

    pub fn lines(&self) -> Vec<String> {
        self.state.buffer.lines()
    }

    pub fn caret(&self) -> Position {
        self.state.caret
    }

    pub fn register(&self, name: RegisterName) -> Register {
        self.state.registers.get_or_empty(name)
    }

    pub fn unnamed(&self) -> String {
        self.register(RegisterName::Unnamed).value
    }
}

pub fn count(n: usize) -> InvocationData {
    InvocationData::with_count(n)
}

pub fn none() -> InvocationData {
    InvocationData::default()
}

pub fn named(c: char) -> RegisterName {
    RegisterName::from_char(c).unwrap()
}
