//! Trace Loading.
//!
//! This module reads memory traces. It performs:
//! 1. **Record parsing:** One event per line, `<R|W> 0x<hex address>`.
//! 2. **Streaming:** Lazily yields records from any buffered reader, numbering lines for errors.
//! 3. **Recovery:** Lenient readers skip malformed lines with a warning instead of stopping.

use std::io::BufRead;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::common::{AccessType, TraceError};

/// One parsed trace event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRecord {
    /// Read or write.
    pub access: AccessType,
    /// Address as it appears in the trace (virtual when VIPT is enabled).
    pub addr: u64,
}

impl TraceRecord {
    /// Creates a read of `addr`.
    pub const fn read(addr: u64) -> Self {
        Self {
            access: AccessType::Read,
            addr,
        }
    }

    /// Creates a write of `addr`.
    pub const fn write(addr: u64) -> Self {
        Self {
            access: AccessType::Write,
            addr,
        }
    }
}

/// Parses one trace line. Blank lines yield `Ok(None)`.
///
/// The `0x` prefix on the address is optional.
///
/// ```
/// use cachesim_core::sim::trace::{parse_line, TraceRecord};
///
/// assert_eq!(parse_line("W 0x7ffd1a", 1).unwrap(), Some(TraceRecord::write(0x7ffd1a)));
/// assert_eq!(parse_line("   ", 2).unwrap(), None);
/// assert!(parse_line("X 0x10", 3).is_err());
/// ```
pub fn parse_line(text: &str, line: usize) -> Result<Option<TraceRecord>, TraceError> {
    let mut fields = text.split_whitespace();
    let Some(direction) = fields.next() else {
        return Ok(None);
    };
    let (Some(address), None) = (fields.next(), fields.next()) else {
        return Err(TraceError::Malformed {
            line,
            text: text.trim().to_owned(),
        });
    };

    let mut chars = direction.chars();
    let access = match (chars.next(), chars.next()) {
        (Some(c), None) => AccessType::from_char(c),
        _ => None,
    }
    .ok_or_else(|| TraceError::Direction {
        line,
        direction: direction.to_owned(),
    })?;

    let digits = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .unwrap_or(address);
    let addr = u64::from_str_radix(digits, 16).map_err(|_| TraceError::Address {
        line,
        address: address.to_owned(),
    })?;

    Ok(Some(TraceRecord { access, addr }))
}

/// Streams records from `reader`, stopping at nothing: each line yields its own result.
pub fn read_trace<R: BufRead>(reader: R) -> impl Iterator<Item = Result<TraceRecord, TraceError>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(i, line)| match line {
            Ok(text) => parse_line(&text, i + 1).transpose(),
            Err(e) => Some(Err(TraceError::Io(e))),
        })
}

/// Reads a whole trace.
///
/// In strict mode the first malformed record is returned as an error. Otherwise
/// malformed records are logged and skipped; I/O errors always abort.
pub fn load_trace<R: BufRead>(reader: R, strict: bool) -> Result<Vec<TraceRecord>, TraceError> {
    let mut records = Vec::new();
    for item in read_trace(reader) {
        match item {
            Ok(record) => records.push(record),
            Err(e @ TraceError::Io(_)) => return Err(e),
            Err(e) if strict => return Err(e),
            Err(e) => warn!("skipping record: {e}"),
        }
    }
    Ok(records)
}
