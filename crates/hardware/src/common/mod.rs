//! Common utilities and types used throughout the memory hierarchy simulator.
//!
//! This module provides fundamental building blocks that are shared across all components
//! of the simulator. It includes:
//! 1. **Address Types:** Strong types for virtual and physical addresses plus the field decoder.
//! 2. **Constants:** Timing model constants for the average-access-time formula.
//! 3. **Memory Access:** The read/write direction of a trace event.
//! 4. **Error Handling:** Configuration, trace and boundary error types.
//! 5. **Recency Lists:** The arena-backed LRU list shared by cache sets and translation stores.

/// Address type definitions and the address decoder.
pub mod addr;

/// Timing model constants.
pub mod constants;

/// Memory access type definitions.
pub mod data;

/// Error types.
pub mod error;

/// Arena-backed LRU list.
pub mod lru;

pub use addr::{AddressDecoder, PhysAddr, VirtAddr};
pub use data::AccessType;
pub use error::{ConfigError, SimError, TraceError};
pub use lru::LruList;
