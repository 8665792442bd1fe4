//! Hardware units of the memory hierarchy.
//!
//! This module contains the simulated structures that hold state between
//! accesses: the L1 cache and the memory management unit with its TLB and
//! hardware inverted page table.

/// Physically tagged set-associative L1 cache with LRU replacement.
pub mod cache;

/// Memory Management Unit with TLB and hardware inverted page table.
pub mod mmu;
