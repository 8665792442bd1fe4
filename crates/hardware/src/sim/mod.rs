//! Simulation driver.
//!
//! Provides the engine that replays a trace through the memory hierarchy,
//! trace parsing, and the design-space sweep built on top of both.

/// Simulation engine (setup, per-access replay, finish).
pub mod simulator;

/// Design-space sweep over cache and VM geometries.
pub mod sweep;

/// Trace record parsing and loading.
pub mod trace;

pub use simulator::Simulator;
pub use trace::TraceRecord;
