//! Timing model constants.
//!
//! All latencies are expressed in abstract time units. The values define the
//! average-access-time model used when statistics are finalized:
//! 1. **L1:** Hit time is `L1_ARRAY_LOOKUP_TIME_CONST + L1_TAG_COMPARE_TIME_CONST + S * L1_TAG_COMPARE_TIME_PER_S`.
//! 2. **DRAM:** Every L1 miss pays `DRAM_ACCESS_PENALTY`.
//! 3. **HWIVPT:** A TLB miss that hits the inverted page table pays
//!    `(1 + HW_IVPT_ACCESS_TIME_PER_M * M) * DRAM_ACCESS_PENALTY`.

/// Penalty for servicing an L1 miss from main memory.
pub const DRAM_ACCESS_PENALTY: f64 = 100.0;

/// Fixed cost of reading one set out of the L1 data/tag arrays.
pub const L1_ARRAY_LOOKUP_TIME_CONST: f64 = 1.0;

/// Fixed cost of the L1 tag comparison.
pub const L1_TAG_COMPARE_TIME_CONST: f64 = 1.0;

/// Additional tag comparison cost per doubling of associativity.
pub const L1_TAG_COMPARE_TIME_PER_S: f64 = 0.2;

/// TLB lookup time. Overlaps with the L1 array lookup in a VIPT design.
pub const TLB_HIT_TIME: f64 = 1.0;

/// HWIVPT search cost per doubling of the number of physical pages.
pub const HW_IVPT_ACCESS_TIME_PER_M: f64 = 0.01;

/// Width of a trace address in bits.
pub const ADDRESS_BITS: u32 = 64;
