//! Editor state: the live buffer and caret, registers, marks and undo history.
//!
//! This crate is storage only. Editing policy (what a delete writes where, how
//! counts clip) lives in `core-actions`; the types here just hold the results
//! and keep them consistent:
//! - `RegisterStore` overwrites slots wholesale and never merges.
//! - `MarkMap` follows line insertions/deletions reported through
//!   `EditorState::note_lines_changed`.
//! - `UndoEngine` groups everything between the outermost
//!   `begin_transaction` / `end_transaction` pair into one undo unit.

use core_text::{Buffer, Position};

pub mod marks;
pub mod registers;
pub mod undo;

pub use marks::{MarkId, MarkIdError, MarkMap};
pub use registers::{Register, RegisterName, RegisterNameError, RegisterShape, RegisterStore};
use undo::UndoEngine;
pub use undo::UNDO_HISTORY_MAX;

/// Top-level editing state for a single buffer.
pub struct EditorState {
    pub buffer: Buffer,
    pub caret: Position,
    pub registers: RegisterStore,
    pub marks: MarkMap,
    pub dirty: bool,
    undo: UndoEngine,
}

impl EditorState {
    /// Create a new state with the caret at the origin.
    pub fn new(buffer: Buffer) -> Self {
        Self {
            buffer,
            caret: Position::origin(),
            registers: RegisterStore::new(),
            marks: MarkMap::new(),
            dirty: false,
            undo: UndoEngine::new(),
        }
    }

    pub fn with_caret(mut self, caret: Position) -> Self {
        self.caret = caret;
        self
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Mutable accessor for the buffer. Marks the state dirty.
    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.dirty = true;
        &mut self.buffer
    }

    pub fn caret(&self) -> Position {
        self.caret
    }

    /// Move the caret, clamping to an existing line and at most the line length.
    pub fn set_caret(&mut self, pos: Position) {
        let mut pos = pos;
        let buffer = &self.buffer;
        pos.clamp_to(buffer.line_count(), |l| buffer.line_len(l));
        self.caret = pos;
    }

    /// Open (or deepen) an undo transaction.
    pub fn begin_transaction(&mut self, label: &'static str) {
        self.undo.begin_transaction(label, self.caret, &self.buffer);
    }

    /// Close the innermost undo transaction.
    pub fn end_transaction(&mut self) {
        self.undo.end_transaction(&self.buffer);
    }

    /// Restore the snapshot preceding the latest transaction. Returns true if restored.
    pub fn undo(&mut self) -> bool {
        self.undo.undo(&mut self.caret, &mut self.buffer)
    }

    /// Redo previously undone snapshot. Returns true if applied.
    pub fn redo(&mut self) -> bool {
        self.undo.redo(&mut self.caret, &mut self.buffer)
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.undo_depth()
    }
    pub fn redo_depth(&self) -> usize {
        self.undo.redo_depth()
    }
    pub fn transaction_depth(&self) -> usize {
        self.undo.transaction_depth()
    }

    /// Report a line-level edit so marks keep pointing at the same text.
    pub fn note_lines_changed(&mut self, first_line: usize, removed: usize, inserted: usize) {
        self.marks.adjust_for_lines(first_line, removed, inserted);
    }
}
