//! Simulated memory hierarchy.
//!
//! This module contains the hardware structures modeled by the simulator. The
//! orchestration of one access through them lives in [`crate::sim::Simulator`].

/// Hardware units (L1 cache, MMU).
pub mod units;

pub use self::units::cache::SetAssociativeCache;
pub use self::units::mmu::Mmu;
