//! Named buffer positions that follow line insertions and deletions.

use core_text::Position;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkId {
    /// `a`–`z`
    Local(char),
    /// `A`–`Z`
    Global(char),
    /// `'` / `` ` ``: position before the latest jump.
    LastJump,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("E191: Argument must be a letter or forward/backward quote ('{0}')")]
pub struct MarkIdError(pub char);

impl MarkId {
    pub fn from_char(c: char) -> Result<Self, MarkIdError> {
        match c {
            'a'..='z' => Ok(Self::Local(c)),
            'A'..='Z' => Ok(Self::Global(c)),
            '\'' | '`' => Ok(Self::LastJump),
            other => Err(MarkIdError(other)),
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Local(c) | Self::Global(c) => c,
            Self::LastJump => '\'',
        }
    }
}

impl fmt::Display for MarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}", self.as_char())
    }
}

#[derive(Debug, Default, Clone)]
pub struct MarkMap {
    marks: HashMap<MarkId, Position>,
}

impl MarkMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, id: MarkId, pos: Position) {
        trace!(target: "state.marks", mark = %id, line = pos.line, column = pos.column, "mark_set");
        self.marks.insert(id, pos);
    }

    pub fn get(&self, id: MarkId) -> Option<Position> {
        self.marks.get(&id).copied()
    }

    pub fn remove(&mut self, id: MarkId) -> Option<Position> {
        self.marks.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Track a line-level edit: `removed` lines starting at `first_line` were
    /// replaced by `inserted` lines. Marks on removed lines that no longer
    /// exist are dropped; marks below the edit shift by the line delta.
    pub fn adjust_for_lines(&mut self, first_line: usize, removed: usize, inserted: usize) {
        if removed == inserted {
            return;
        }
        let survivors = removed.min(inserted);
        self.marks.retain(|id, pos| {
            if pos.line < first_line + survivors {
                return true;
            }
            if pos.line < first_line + removed {
                trace!(target: "state.marks", mark = %id, line = pos.line, "mark_deleted_with_line");
                return false;
            }
            pos.line = pos.line + inserted - removed;
            true
        });
    }
}
