//! Register storage.
//!
//! Registers are named slots holding transferred text plus its shape. The store
//! itself is pure storage: every write overwrites the slot wholesale. Which
//! slots an edit touches (unnamed mirroring, numbered rotation, the blackhole
//! register) is decided by the command executor.

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::trace;

/// Shape of register contents, governing how the text is re-inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RegisterShape {
    #[default]
    CharacterWise,
    LineWise,
    BlockWise,
}

/// Register identifiers. Uppercase letters name the same slot as lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterName {
    /// `"`: receives every delete/change unless the blackhole is targeted.
    Unnamed,
    /// `a`–`z`
    Named(char),
    /// `0`–`9`
    Numbered(u8),
    /// `-`: deletes smaller than a line.
    SmallDelete,
    /// `_`: writes are discarded, reads are empty.
    Blackhole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid register name '{0}'")]
pub struct RegisterNameError(pub char);

impl RegisterName {
    /// Highest numbered register retained by rotation.
    pub const NUMBERED_MAX: u8 = 9;

    pub fn from_char(c: char) -> Result<Self, RegisterNameError> {
        match c {
            '"' => Ok(Self::Unnamed),
            '-' => Ok(Self::SmallDelete),
            '_' => Ok(Self::Blackhole),
            'a'..='z' => Ok(Self::Named(c)),
            'A'..='Z' => Ok(Self::Named(c.to_ascii_lowercase())),
            '0'..='9' => Ok(Self::Numbered(c as u8 - b'0')),
            other => Err(RegisterNameError(other)),
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Unnamed => '"',
            Self::Named(c) => c,
            Self::Numbered(n) => (b'0' + n) as char,
            Self::SmallDelete => '-',
            Self::Blackhole => '_',
        }
    }
}

impl TryFrom<char> for RegisterName {
    type Error = RegisterNameError;
    fn try_from(c: char) -> Result<Self, Self::Error> {
        Self::from_char(c)
    }
}

impl fmt::Display for RegisterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}", self.as_char())
    }
}

/// Register contents: text plus shape.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Register {
    pub value: String,
    pub shape: RegisterShape,
}

impl Register {
    pub fn new(value: impl Into<String>, shape: RegisterShape) -> Self {
        Self {
            value: value.into(),
            shape,
        }
    }

    pub fn character_wise(value: impl Into<String>) -> Self {
        Self::new(value, RegisterShape::CharacterWise)
    }

    pub fn line_wise(value: impl Into<String>) -> Self {
        Self::new(value, RegisterShape::LineWise)
    }

    pub fn block_wise(value: impl Into<String>) -> Self {
        Self::new(value, RegisterShape::BlockWise)
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// The value split into rows. A single trailing line break (as stored by
    /// line-wise captures) does not produce an extra empty row.
    pub fn rows(&self) -> Vec<&str> {
        let body = self.value.strip_suffix('\n').unwrap_or(&self.value);
        body.split('\n').collect()
    }
}

/// Keyed register slots.
#[derive(Debug, Default, Clone)]
pub struct RegisterStore {
    slots: HashMap<RegisterName, Register>,
    writes: u64,
}

impl RegisterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents of `name`, if it was ever written. The blackhole never holds text.
    pub fn get(&self, name: RegisterName) -> Option<&Register> {
        if name == RegisterName::Blackhole {
            return None;
        }
        self.slots.get(&name)
    }

    /// Value of `name` or an empty character-wise register.
    pub fn get_or_empty(&self, name: RegisterName) -> Register {
        self.get(name).cloned().unwrap_or_default()
    }

    /// Overwrite the slot.
    pub fn set(&mut self, name: RegisterName, register: Register) {
        trace!(target: "state.registers", register = %name, shape = ?register.shape, len = register.value.len(), "register_write");
        self.writes += 1;
        self.slots.insert(name, register);
    }

    /// Shift `1..=8` into `2..=9` (dropping `9`) and store `register` in `1`.
    pub fn rotate_numbered(&mut self, register: Register) {
        for n in (1..RegisterName::NUMBERED_MAX).rev() {
            if let Some(prev) = self.slots.remove(&RegisterName::Numbered(n)) {
                self.slots.insert(RegisterName::Numbered(n + 1), prev);
            }
        }
        trace!(target: "state.registers", "numbered_rotated");
        self.set(RegisterName::Numbered(1), register);
    }

    pub fn clear(&mut self, name: RegisterName) {
        self.slots.remove(&name);
    }

    /// Number of writes since creation (diagnostics).
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    /// Snapshot of non-empty named registers (a-z), sorted by name.
    pub fn named_snapshot(&self) -> Vec<(char, &Register)> {
        let mut out: Vec<_> = self
            .slots
            .iter()
            .filter_map(|(name, reg)| match name {
                RegisterName::Named(c) if !reg.is_empty() => Some((*c, reg)),
                _ => None,
            })
            .collect();
        out.sort_by_key(|(c, _)| *c);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_and_fold_uppercase() {
        assert_eq!(RegisterName::from_char('a'), Ok(RegisterName::Named('a')));
        assert_eq!(RegisterName::from_char('A'), Ok(RegisterName::Named('a')));
        assert_eq!(RegisterName::from_char('3'), Ok(RegisterName::Numbered(3)));
        assert_eq!(RegisterName::from_char('"'), Ok(RegisterName::Unnamed));
        assert_eq!(RegisterName::from_char('_'), Ok(RegisterName::Blackhole));
        assert_eq!(RegisterName::from_char('!'), Err(RegisterNameError('!')));
        assert_eq!(RegisterName::Numbered(7).as_char(), '7');
    }

    #[test]
    fn set_overwrites_never_merges() {
        let mut store = RegisterStore::new();
        store.set(RegisterName::Named('a'), Register::line_wise("foo\n"));
        store.set(RegisterName::Named('a'), Register::character_wise("bar"));
        let reg = store.get(RegisterName::Named('a')).unwrap();
        assert_eq!(reg.value, "bar");
        assert_eq!(reg.shape, RegisterShape::CharacterWise);
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn blackhole_reads_empty() {
        let mut store = RegisterStore::new();
        store.set(RegisterName::Blackhole, Register::character_wise("gone"));
        assert!(store.get(RegisterName::Blackhole).is_none());
        assert!(store.get_or_empty(RegisterName::Blackhole).is_empty());
    }

    #[test]
    fn numbered_rotation_drops_oldest() {
        let mut store = RegisterStore::new();
        for i in 0..12 {
            store.rotate_numbered(Register::line_wise(format!("d{i}\n")));
        }
        assert_eq!(store.get(RegisterName::Numbered(1)).unwrap().value, "d11\n");
        assert_eq!(store.get(RegisterName::Numbered(9)).unwrap().value, "d3\n");
        assert!(store.get(RegisterName::Numbered(0)).is_none());
    }

    #[test]
    fn rows_ignore_single_trailing_break() {
        assert_eq!(Register::line_wise("foo\nbar\n").rows(), vec!["foo", "bar"]);
        assert_eq!(Register::block_wise("ab\ncd").rows(), vec!["ab", "cd"]);
        assert_eq!(Register::character_wise("x").rows(), vec!["x"]);
    }

    #[test]
    fn named_snapshot_filters_empty() {
        let mut store = RegisterStore::new();
        store.set(RegisterName::Named('d'), Register::character_wise("delta"));
        store.set(RegisterName::Named('b'), Register::character_wise("beta"));
        store.set(RegisterName::Named('c'), Register::character_wise(""));
        let snap: Vec<_> = store
            .named_snapshot()
            .into_iter()
            .map(|(c, r)| (c, r.value.as_str()))
            .collect();
        assert_eq!(snap, vec![('b', "beta"), ('d', "delta")]);
    }
}
