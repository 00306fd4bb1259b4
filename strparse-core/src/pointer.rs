//! Cursor positions within a [`CharStream`](crate::CharStream).

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A position in the character stream.
///
/// `offset` is the identity: two pointers are equal iff their offsets are
/// equal, and ordering is by offset alone. `line` and `column` are derived
/// from the characters the pointer has stepped over.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pointer {
    /// Absolute character offset from the start of the stream.
    pub offset: u64,
    /// Zero-based line number.
    pub line: u32,
    /// Zero-based column within the line.
    pub column: u32,
}

impl Pointer {
    /// The position of the first character.
    pub const START: Pointer = Pointer { offset: 0, line: 0, column: 0 };

    /// Create a pointer from its parts.
    #[inline]
    pub const fn new(offset: u64, line: u32, column: u32) -> Self {
        Self { offset, line, column }
    }

    /// The pointer one character further on, after stepping over `ch`.
    ///
    /// `prev` is the character before `ch`, needed to count `\r\n` as a
    /// single line break.
    #[inline]
    pub fn step(self, ch: char, prev: Option<char>) -> Self {
        let (line, column) = match ch {
            '\r' => (self.line + 1, 0),
            '\n' if prev == Some('\r') => (self.line, 0),
            '\n' => (self.line + 1, 0),
            _ => (self.line, self.column + 1),
        };
        Self { offset: self.offset + 1, line, column }
    }

    /// Number of characters between `earlier` and this pointer.
    #[inline]
    pub fn distance_from(self, earlier: Pointer) -> u64 {
        self.offset.saturating_sub(earlier.offset)
    }
}

impl Default for Pointer {
    fn default() -> Self {
        Self::START
    }
}

impl PartialEq for Pointer {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset
    }
}

impl Eq for Pointer {}

impl PartialOrd for Pointer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pointer {
    fn cmp(&self, other: &Self) -> Ordering {
        self.offset.cmp(&other.offset)
    }
}

impl Hash for Pointer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.offset.hash(state);
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}:{}]", self.offset, self.line, self.column)
    }
}
