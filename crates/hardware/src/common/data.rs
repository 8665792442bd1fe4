//! Memory Access Types.
//!
//! This module defines the classification of trace events used throughout the simulator.
//! These types are used for the following:
//! 1. **Trace Parsing:** Mapping the `R`/`W` direction character of a trace record.
//! 2. **Dirty Tracking:** Writes mark the touched cache line dirty.
//! 3. **Statistics Tracking:** Counting reads and writes separately.

use serde::{Deserialize, Serialize};

/// Direction of a memory access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessType {
    /// Data read (load). Leaves the dirty bit of the line untouched.
    Read,

    /// Data write (store). Marks the line dirty, on hit and on fill alike.
    Write,
}

impl AccessType {
    /// Maps a trace direction character to an access type.
    ///
    /// Only the upper-case `R` and `W` characters used by trace files are accepted.
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'R' => Some(Self::Read),
            'W' => Some(Self::Write),
            _ => None,
        }
    }

    /// Returns the trace direction character for this access type.
    pub const fn as_char(self) -> char {
        match self {
            Self::Read => 'R',
            Self::Write => 'W',
        }
    }

    /// Returns `true` for [`AccessType::Write`].
    #[inline(always)]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }
}
