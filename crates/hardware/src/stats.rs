//! Simulation statistics collection and reporting.
//!
//! This module tracks the performance metrics of a trace replay. It provides:
//! 1. **Running counters:** Reads/writes and accesses, hits and misses for L1, TLB and HWIVPT.
//! 2. **Writebacks:** Dirty evictions caused by set conflicts, kept apart from dirty lines
//!    discarded by page-fault flushes.
//! 3. **Cost counters:** L1 array lookups and tag comparisons.
//! 4. **Derived metrics:** Hit/miss ratios and the average access time (AAT), computed once by
//!    [`SimStats::finalize`].

use std::io::{self, Write};

use serde::Serialize;

use crate::common::AccessType;
use crate::common::constants::{
    DRAM_ACCESS_PENALTY, HW_IVPT_ACCESS_TIME_PER_M, L1_ARRAY_LOOKUP_TIME_CONST,
    L1_TAG_COMPARE_TIME_CONST, L1_TAG_COMPARE_TIME_PER_S, TLB_HIT_TIME,
};
use crate::config::SimConfig;
use crate::core::units::cache::CacheAccess;
use crate::core::units::mmu::TranslationPath;

/// Simulation statistics structure.
///
/// Counters accumulate during [`Simulator::access`](crate::sim::Simulator::access);
/// ratio and time fields stay zero until [`SimStats::finalize`] runs.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SimStats {
    /// Read requests.
    pub reads: u64,
    /// Write requests.
    pub writes: u64,

    /// Total attempts to use L1.
    pub accesses_l1: u64,
    /// Times an array lookup populated the set buffer.
    pub array_lookups_l1: u64,
    /// Tag comparisons performed (every way, on every access).
    pub tag_compares_l1: u64,
    /// Tag matches.
    pub hits_l1: u64,
    /// Tag mismatches, including every access that page faulted.
    pub misses_l1: u64,
    /// Dirty lines evicted by set conflicts.
    pub writebacks_l1: u64,
    /// `hits_l1 / accesses_l1`.
    pub hit_ratio_l1: f64,
    /// `misses_l1 / accesses_l1`.
    pub miss_ratio_l1: f64,

    /// TLB lookups.
    pub accesses_tlb: u64,
    /// TLB hits.
    pub hits_tlb: u64,
    /// TLB misses (translation faults).
    pub misses_tlb: u64,
    /// `hits_tlb / accesses_tlb`.
    pub hit_ratio_tlb: f64,
    /// `misses_tlb / accesses_tlb`.
    pub miss_ratio_tlb: f64,

    /// HWIVPT lookups (one per TLB miss).
    pub accesses_hw_ivpt: u64,
    /// HWIVPT hits, including lookups resolved by binding a free frame.
    pub hits_hw_ivpt: u64,
    /// HWIVPT misses (page faults).
    pub misses_hw_ivpt: u64,
    /// `hits_hw_ivpt / accesses_hw_ivpt`.
    pub hit_ratio_hw_ivpt: f64,
    /// `misses_hw_ivpt / accesses_hw_ivpt`.
    pub miss_ratio_hw_ivpt: f64,

    /// Free frames bound to a page on first touch (no flush needed).
    pub frame_allocations: u64,
    /// Whole-cache flushes triggered by page faults.
    pub cache_flushes: u64,
    /// Dirty lines discarded by those flushes.
    pub cache_flush_writebacks: u64,

    /// Average access time of the whole hierarchy.
    pub avg_access_time: f64,
}

/// `num / den`, or zero when `den` is zero.
pub fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Tag comparison time for `2^s` ways.
pub fn tag_compare_time(s: u32) -> f64 {
    L1_TAG_COMPARE_TIME_CONST + f64::from(s) * L1_TAG_COMPARE_TIME_PER_S
}

/// L1 hit time: array lookup followed by tag comparison.
pub fn l1_hit_time(s: u32) -> f64 {
    L1_ARRAY_LOOKUP_TIME_CONST + tag_compare_time(s)
}

/// Cost of a TLB miss that is served by the HWIVPT.
pub fn hw_ivpt_penalty(m: u32) -> f64 {
    (1.0 + HW_IVPT_ACCESS_TIME_PER_M * f64::from(m)) * DRAM_ACCESS_PENALTY
}

impl SimStats {
    /// Counts a trace event by direction.
    pub const fn record_access(&mut self, access: AccessType) {
        match access {
            AccessType::Read => self.reads += 1,
            AccessType::Write => self.writes += 1,
        }
    }

    /// Counts one translation by the level that resolved it.
    pub const fn record_translation(&mut self, path: TranslationPath) {
        self.accesses_tlb += 1;
        match path {
            TranslationPath::TlbHit => self.hits_tlb += 1,
            TranslationPath::PageTableHit => {
                self.misses_tlb += 1;
                self.accesses_hw_ivpt += 1;
                self.hits_hw_ivpt += 1;
            }
            TranslationPath::FrameAllocated => {
                self.misses_tlb += 1;
                self.accesses_hw_ivpt += 1;
                self.hits_hw_ivpt += 1;
                self.frame_allocations += 1;
            }
            TranslationPath::PageFault { flushed_dirty } => {
                self.misses_tlb += 1;
                self.accesses_hw_ivpt += 1;
                self.misses_hw_ivpt += 1;
                self.cache_flushes += 1;
                self.cache_flush_writebacks += flushed_dirty;
            }
        }
    }

    /// Counts one L1 access against a cache with `ways` ways.
    pub const fn record_l1(&mut self, outcome: CacheAccess, ways: usize) {
        self.accesses_l1 += 1;
        self.array_lookups_l1 += 1;
        self.tag_compares_l1 += ways as u64;
        if outcome.hit {
            self.hits_l1 += 1;
        } else {
            self.misses_l1 += 1;
        }
        if outcome.writeback {
            self.writebacks_l1 += 1;
        }
    }

    /// Computes every ratio and the average access time.
    ///
    /// Without virtual memory, `AAT = HT + MR_L1 * DRAM`.
    ///
    /// With virtual memory, the array lookup overlaps the TLB lookup and every
    /// access pays the longer of the two. Tag comparison follows a successful
    /// translation: directly after a TLB hit, or after the HWIVPT penalty when
    /// the TLB misses and the HWIVPT hits. A page fault adds nothing to the hit
    /// time; it is already an L1 miss and pays DRAM through `MR_L1`.
    pub fn finalize(&mut self, config: &SimConfig) {
        self.hit_ratio_l1 = ratio(self.hits_l1, self.accesses_l1);
        self.miss_ratio_l1 = ratio(self.misses_l1, self.accesses_l1);
        self.hit_ratio_tlb = ratio(self.hits_tlb, self.accesses_tlb);
        self.miss_ratio_tlb = ratio(self.misses_tlb, self.accesses_tlb);
        self.hit_ratio_hw_ivpt = ratio(self.hits_hw_ivpt, self.accesses_hw_ivpt);
        self.miss_ratio_hw_ivpt = ratio(self.misses_hw_ivpt, self.accesses_hw_ivpt);

        let tag_compare = tag_compare_time(config.s);
        let hit_time = if config.vipt {
            L1_ARRAY_LOOKUP_TIME_CONST.max(TLB_HIT_TIME)
                + self.hit_ratio_tlb * tag_compare
                + self.miss_ratio_tlb
                    * self.hit_ratio_hw_ivpt
                    * (hw_ivpt_penalty(config.m) + tag_compare)
        } else {
            l1_hit_time(config.s)
        };
        self.avg_access_time = hit_time + self.miss_ratio_l1 * DRAM_ACCESS_PENALTY;
    }

    /// Writes the statistics report.
    ///
    /// The HWIVPT and TLB blocks are only written when `config.vipt` is set.
    pub fn write_report<W: Write>(&self, out: &mut W, config: &SimConfig) -> io::Result<()> {
        writeln!(out, "Cache Statistics")?;
        writeln!(out, "----------------")?;
        writeln!(out, "Reads: {}", self.reads)?;
        writeln!(out, "Writes: {}", self.writes)?;
        writeln!(out)?;
        if config.vipt {
            writeln!(out, "HWIVPT accesses: {}", self.accesses_hw_ivpt)?;
            writeln!(out, "HWIVPT hits: {}", self.hits_hw_ivpt)?;
            writeln!(out, "HWIVPT misses (Page Faults): {}", self.misses_hw_ivpt)?;
            writeln!(out, "HWIVPT hit ratio: {:.3}", self.hit_ratio_hw_ivpt)?;
            writeln!(out, "HWIVPT miss ratio: {:.3}", self.miss_ratio_hw_ivpt)?;
            writeln!(
                out,
                "L1 writebacks due to OS cache flush: {}",
                self.cache_flush_writebacks
            )?;
            writeln!(out)?;

            writeln!(out, "TLB accesses: {}", self.accesses_tlb)?;
            writeln!(out, "TLB hits: {}", self.hits_tlb)?;
            writeln!(out, "TLB misses (Translation Faults): {}", self.misses_tlb)?;
            writeln!(out, "TLB hit ratio: {:.3}", self.hit_ratio_tlb)?;
            writeln!(out, "TLB miss ratio: {:.3}", self.miss_ratio_tlb)?;
            writeln!(out)?;
        }
        writeln!(out, "L1 accesses: {}", self.accesses_l1)?;
        writeln!(out, "L1 hits: {}", self.hits_l1)?;
        writeln!(out, "L1 misses: {}", self.misses_l1)?;
        writeln!(out, "L1 hit ratio: {:.3}", self.hit_ratio_l1)?;
        writeln!(out, "L1 miss ratio: {:.3}", self.miss_ratio_l1)?;
        writeln!(
            out,
            "L1 writebacks due user level conflicts: {}",
            self.writebacks_l1
        )?;
        writeln!(out, "L1 average access time (AAT): {:.3}", self.avg_access_time)?;
        writeln!(out)
    }

    /// Prints the statistics report to stdout.
    pub fn print(&self, config: &SimConfig) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.write_report(&mut lock, config)
    }
}
