//! SimStats unit tests.
//!
//! Verifies counter recording, derived ratios, the average access time model
//! and the report format.

use cachesim_core::common::AccessType;
use cachesim_core::config::SimConfig;
use cachesim_core::core::units::cache::CacheAccess;
use cachesim_core::core::units::mmu::TranslationPath;
use cachesim_core::stats::{SimStats, hw_ivpt_penalty, l1_hit_time, ratio, tag_compare_time};
use pretty_assertions::assert_eq;

use crate::common::{physical, reads, run, vipt};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn default_stats_all_zero() {
    let stats = SimStats::default();
    assert_eq!(stats.reads, 0);
    assert_eq!(stats.writes, 0);
    assert_eq!(stats.accesses_l1, 0);
    assert_eq!(stats.hits_l1, 0);
    assert_eq!(stats.misses_l1, 0);
    assert_eq!(stats.writebacks_l1, 0);
    assert_eq!(stats.accesses_tlb, 0);
    assert_eq!(stats.accesses_hw_ivpt, 0);
    assert_eq!(stats.cache_flushes, 0);
    assert_eq!(stats.avg_access_time, 0.0);
}

// ══════════════════════════════════════════════════════════
// Recording
// ══════════════════════════════════════════════════════════

#[test]
fn record_l1_counts_every_way() {
    let mut stats = SimStats::default();
    stats.record_l1(
        CacheAccess {
            hit: false,
            writeback: true,
        },
        8,
    );
    stats.record_l1(
        CacheAccess {
            hit: true,
            writeback: false,
        },
        8,
    );
    assert_eq!(stats.accesses_l1, 2);
    assert_eq!(stats.array_lookups_l1, 2);
    assert_eq!(stats.tag_compares_l1, 16);
    assert_eq!(stats.hits_l1, 1);
    assert_eq!(stats.misses_l1, 1);
    assert_eq!(stats.writebacks_l1, 1);
}

#[test]
fn record_access_splits_reads_and_writes() {
    let mut stats = SimStats::default();
    stats.record_access(AccessType::Read);
    stats.record_access(AccessType::Write);
    stats.record_access(AccessType::Write);
    assert_eq!((stats.reads, stats.writes), (1, 2));
}

#[test]
fn record_translation_by_path() {
    let mut stats = SimStats::default();
    stats.record_translation(TranslationPath::TlbHit);
    stats.record_translation(TranslationPath::PageTableHit);
    stats.record_translation(TranslationPath::FrameAllocated);
    stats.record_translation(TranslationPath::PageFault { flushed_dirty: 3 });

    assert_eq!(stats.accesses_tlb, 4);
    assert_eq!(stats.hits_tlb, 1);
    assert_eq!(stats.misses_tlb, 3);
    assert_eq!(stats.accesses_hw_ivpt, 3);
    assert_eq!(stats.hits_hw_ivpt, 2);
    assert_eq!(stats.misses_hw_ivpt, 1);
    assert_eq!(stats.frame_allocations, 1);
    assert_eq!(stats.cache_flushes, 1);
    assert_eq!(stats.cache_flush_writebacks, 3);
}

// ══════════════════════════════════════════════════════════
// Timing model
// ══════════════════════════════════════════════════════════

#[test]
fn timing_helpers() {
    assert_eq!(ratio(1, 4), 0.25);
    assert_eq!(ratio(5, 0), 0.0);
    assert!(close(tag_compare_time(0), 1.0));
    assert!(close(tag_compare_time(3), 1.6));
    assert!(close(l1_hit_time(2), 2.4));
    assert!(close(hw_ivpt_penalty(10), 110.0));
    assert!(close(hw_ivpt_penalty(20), 120.0));
}

#[test]
fn physical_aat_is_hit_time_plus_miss_penalty() {
    let mut stats = SimStats {
        accesses_l1: 10,
        hits_l1: 7,
        misses_l1: 3,
        ..SimStats::default()
    };
    stats.finalize(&physical(12, 6, 1));
    assert!(close(stats.hit_ratio_l1, 0.7));
    assert!(close(stats.miss_ratio_l1, 0.3));
    // HT = 1 + (1 + 0.2), plus 0.3 * 100.
    assert!(close(stats.avg_access_time, 2.2 + 30.0));
}

#[test]
fn vipt_aat_weights_translation_paths() {
    // C=12, P=10 legalizes to S=2; M=10.
    let config = vipt(12, 6, 10, 3, 10);
    let stats = run(&config, &reads(&[0x0, 0x0]));

    assert!(close(stats.hit_ratio_tlb, 0.5));
    assert!(close(stats.hit_ratio_hw_ivpt, 1.0));
    assert!(close(stats.miss_ratio_l1, 0.5));
    // 1 + 0.5 * 1.4 + 0.5 * 1.0 * (110 + 1.4) + 0.5 * 100
    assert!(close(stats.avg_access_time, 107.4));
}

#[test]
fn all_tlb_hits_cost_overlapped_lookup_plus_compare() {
    let mut stats = SimStats {
        accesses_l1: 4,
        hits_l1: 4,
        accesses_tlb: 4,
        hits_tlb: 4,
        ..SimStats::default()
    };
    stats.finalize(&vipt(12, 6, 10, 3, 10));
    assert!(close(stats.avg_access_time, 1.0 + 1.4));
}

#[test]
fn finalize_is_repeatable() {
    let config = SimConfig::default();
    let mut stats = run(&config, &reads(&[0x0, 0x40, 0x0]));
    let first = stats.clone();
    stats.finalize(&config);
    assert_eq!(stats, first);
}

// ══════════════════════════════════════════════════════════
// Report
// ══════════════════════════════════════════════════════════

#[test]
fn physical_report_format() {
    let config = physical(10, 4, 0);
    let stats = run(&config, &reads(&[0x0, 0x0, 0x400]));
    let mut out = Vec::new();
    stats.write_report(&mut out, &config).unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Cache Statistics\n\
         ----------------\n\
         Reads: 3\n\
         Writes: 0\n\
         \n\
         L1 accesses: 3\n\
         L1 hits: 1\n\
         L1 misses: 2\n\
         L1 hit ratio: 0.333\n\
         L1 miss ratio: 0.667\n\
         L1 writebacks due user level conflicts: 0\n\
         L1 average access time (AAT): 68.667\n\
         \n"
    );
}

#[test]
fn vipt_report_includes_translation_blocks() {
    let config = vipt(12, 6, 10, 3, 10);
    let stats = run(&config, &reads(&[0x0, 0x0]));
    let mut out = Vec::new();
    stats.write_report(&mut out, &config).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("HWIVPT accesses: 1\n"));
    assert!(text.contains("HWIVPT misses (Page Faults): 0\n"));
    assert!(text.contains("L1 writebacks due to OS cache flush: 0\n"));
    assert!(text.contains("TLB hits: 1\n"));
    assert!(text.contains("TLB miss ratio: 0.500\n"));
    assert!(text.contains("L1 average access time (AAT): 107.400\n"));
}

#[test]
fn stats_serialize_to_json() {
    let stats = run(&SimConfig::default(), &reads(&[0x0]));
    let value = serde_json::to_value(&stats).unwrap();
    assert_eq!(value["accesses_l1"].as_u64(), Some(1));
    assert_eq!(value["misses_l1"].as_u64(), Some(1));
    assert!(value.get("avg_access_time").is_some());
}
