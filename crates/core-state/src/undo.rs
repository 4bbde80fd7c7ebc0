use core_text::{Buffer, Position};
use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;
use tracing::trace;

/// Maximum number of snapshots retained in undo history.
pub const UNDO_HISTORY_MAX: usize = 200;

/// A full-state snapshot for undo/redo (coarse clone of the rope).
#[derive(Clone)]
pub struct EditSnapshot {
    /// Transaction label (e.g. "delete lines") for diagnostics.
    pub label: &'static str,
    pub buffer: Buffer,
    pub position: Position,
    /// Content hash of the buffer at snapshot capture.
    pub hash: u64,
}

/// Snapshot-based undo history with nestable transactions.
///
/// `begin_transaction` captures the pre-edit state only at the outermost
/// level; nested begins just deepen the scope. When the outermost scope ends
/// and the buffer hash is unchanged the captured snapshot is discarded, so
/// no-op commands (beeps, clipped counts) leave no undo entry.
pub struct UndoEngine {
    undo_stack: Vec<EditSnapshot>,
    redo_stack: Vec<EditSnapshot>,
    depth: usize,
}

impl Default for UndoEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoEngine {
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            depth: 0,
        }
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }
    pub fn transaction_depth(&self) -> usize {
        self.depth
    }

    pub fn begin_transaction(&mut self, label: &'static str, cursor: Position, buffer: &Buffer) {
        self.depth += 1;
        if self.depth > 1 {
            trace!(target: "state.undo", label, depth = self.depth, "transaction_nested");
            return;
        }
        let snap = EditSnapshot {
            label,
            buffer: buffer.clone(),
            position: cursor,
            hash: buffer_hash(buffer),
        };
        self.undo_stack.push(snap);
        trace!(target: "state.undo", label, undo_depth = self.undo_stack.len(), "transaction_begin");
        if self.undo_stack.len() > UNDO_HISTORY_MAX {
            let _ = self.undo_stack.remove(0);
            trace!(target: "state.undo", "undo_stack_trimmed");
        }
    }

    pub fn end_transaction(&mut self, buffer: &Buffer) {
        if self.depth == 0 {
            trace!(target: "state.undo", "transaction_end_without_begin");
            return;
        }
        self.depth -= 1;
        if self.depth > 0 {
            return;
        }
        let unchanged = self
            .undo_stack
            .last()
            .is_some_and(|last| last.hash == buffer_hash(buffer));
        if unchanged {
            let dropped = self.undo_stack.pop();
            trace!(target: "state.undo", label = dropped.map(|s| s.label), "transaction_noop_dropped");
        } else {
            self.redo_stack.clear();
            trace!(target: "state.undo", undo_depth = self.undo_stack.len(), "transaction_commit");
        }
    }

    pub fn undo(&mut self, cursor: &mut Position, buffer: &mut Buffer) -> bool {
        if let Some(last) = self.undo_stack.pop() {
            trace!(target: "state.undo", label = last.label, undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "undo_pop");
            let current = EditSnapshot {
                label: last.label,
                buffer: buffer.clone(),
                position: *cursor,
                hash: buffer_hash(buffer),
            };
            self.redo_stack.push(current);
            *buffer = last.buffer;
            *cursor = last.position;
            true
        } else {
            false
        }
    }

    pub fn redo(&mut self, cursor: &mut Position, buffer: &mut Buffer) -> bool {
        if let Some(next) = self.redo_stack.pop() {
            trace!(target: "state.undo", label = next.label, redo_depth = self.redo_stack.len(), undo_depth = self.undo_stack.len(), "redo_pop");
            let current = EditSnapshot {
                label: next.label,
                buffer: buffer.clone(),
                position: *cursor,
                hash: buffer_hash(buffer),
            };
            self.undo_stack.push(current);
            *buffer = next.buffer;
            *cursor = next.position;
            true
        } else {
            false
        }
    }
}

fn buffer_hash(buf: &Buffer) -> u64 {
    let mut h = DefaultHasher::new();
    for i in 0..buf.line_count() {
        if let Some(l) = buf.line(i) {
            h.write(l.as_bytes());
        }
    }
    h.finish()
}
