//! Trace-driven memory hierarchy simulator library.
//!
//! This crate models a single-level cache fronted by optional virtual memory, with the following:
//! 1. **Cache:** A physically tagged set-associative L1 with true LRU replacement and dirty tracking.
//! 2. **Translation:** A fully associative TLB backed by a hardware inverted page table (HWIVPT);
//!    page faults reclaim the least recently used frame and flush the cache.
//! 3. **Configuration:** The (C, B, S) taxonomy plus page, TLB and memory sizes, with VIPT legalization.
//! 4. **Simulation:** Trace parsing, per-access replay, and design-space sweeps.
//! 5. **Statistics:** Hit/miss ratios, writebacks and the average access time model.

/// Common types and constants (addresses, access types, errors, LRU lists).
pub mod common;
/// Simulator configuration (defaults, legalization, validation).
pub mod config;
/// Simulated hardware (L1 cache, MMU with TLB and HWIVPT).
pub mod core;
/// Simulation engine, trace loading and sweeps.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `SimConfig::default()` or deserialize from JSON.
pub use crate::config::SimConfig;
/// Simulation engine; construct with `Simulator::new` from a legalized configuration.
pub use crate::sim::Simulator;
/// Counters and derived metrics filled in by the simulator.
pub use crate::stats::SimStats;
