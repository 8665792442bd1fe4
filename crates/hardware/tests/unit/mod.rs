//! # Unit Components
//!
//! Organizes the unit tests by the part of the simulator they exercise.



/// L1 cache and MMU units.
pub mod core;


/// Statistics counters, ratios and the average access time model.
pub mod stats_verification;
