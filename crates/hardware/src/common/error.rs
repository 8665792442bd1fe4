//! Error definitions.
//!
//! The simulation engine itself cannot fail once it has been built from a legal
//! configuration. Errors only arise at its boundary:
//! 1. **Configuration:** Geometry that is out of range or not addressable.
//! 2. **Trace Input:** Unreadable files and malformed `<R|W> 0x<hex>` records.
//! 3. **Serialization:** JSON configuration files that fail to parse.

use thiserror::Error;

/// A configuration rejected by [`SimConfig::validate`](crate::config::SimConfig::validate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Block size outside `4 <= B <= 7`.
    #[error("Invalid configuration! The block size must be reasonable: 4 <= B <= 7 (B = {b})")]
    BlockSize {
        /// Offending log2 block size.
        b: u32,
    },

    /// Cache size outside `9 <= C <= 18`.
    #[error("Invalid configuration! The cache size must be reasonable: 9 <= C <= 18 (C = {c})")]
    CacheSize {
        /// Offending log2 cache size.
        c: u32,
    },

    /// Blocks per set times block size exceeds the cache size.
    #[error("Invalid configuration! The cache must hold at least one set: B + S <= C (C = {c}, B = {b}, S = {s})")]
    Geometry {
        /// log2 cache size.
        c: u32,
        /// log2 block size.
        b: u32,
        /// log2 associativity.
        s: u32,
    },

    /// Page size outside `9 <= P <= min(14, C)`.
    #[error("Invalid configuration! The page size must be reasonable: 9 <= P <= min(14, C) (P = {p}, C = {c})")]
    PageSize {
        /// Offending log2 page size.
        p: u32,
        /// log2 cache size.
        c: u32,
    },

    /// More TLB entries than cache sets.
    #[error("Invalid configuration! The TLB must have a reasonable number of entries: 0 <= T <= C - B - S (T = {t}, limit = {limit})")]
    TlbEntries {
        /// Offending log2 TLB entry count.
        t: u32,
        /// `C - B - S` for the legalized geometry.
        limit: u32,
    },

    /// Physical page count outside `P <= M <= 20`.
    #[error("Invalid configuration! Do not simulate too few/many pages in memory: P <= M <= 20 (M = {m}, P = {p})")]
    PhysicalPages {
        /// Offending log2 page count.
        m: u32,
        /// log2 page size.
        p: u32,
    },

    /// Simulated physical memory larger than 4 GiB.
    #[error("Invalid configuration! Do not simulate too much memory (4GB): 0 <= M <= 32 - P (M = {m}, P = {p})")]
    MemorySize {
        /// log2 page count.
        m: u32,
        /// log2 page size.
        p: u32,
    },
}

/// A trace that could not be read or parsed.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The underlying reader failed.
    #[error("failed to read trace: {0}")]
    Io(#[from] std::io::Error),

    /// The record does not have the `<R|W> <address>` shape.
    #[error("line {line}: malformed trace record {text:?}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// The offending line, trimmed.
        text: String,
    },

    /// The direction field is not `R` or `W`.
    #[error("line {line}: unknown access direction {direction:?}")]
    Direction {
        /// 1-based line number.
        line: usize,
        /// The offending direction token.
        direction: String,
    },

    /// The address field is not a hexadecimal 64-bit value.
    #[error("line {line}: invalid address {address:?}")]
    Address {
        /// 1-based line number.
        line: usize,
        /// The offending address token.
        address: String,
    },
}

/// Any error surfaced at the simulator boundary.
#[derive(Debug, Error)]
pub enum SimError {
    /// Rejected configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Unreadable or malformed trace.
    #[error(transparent)]
    Trace(#[from] TraceError),

    /// Configuration file that is not valid JSON for [`SimConfig`](crate::config::SimConfig).
    #[error("invalid configuration file: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file that could not be opened.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed to open.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },
}
