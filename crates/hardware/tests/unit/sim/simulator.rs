//! Simulator End-to-End Tests.
//!
//! Each test replays a short trace and checks the counters it must produce.

use cachesim_core::config::{SimConfig, TlbParentPolicy};
use cachesim_core::sim::TraceRecord;
use cachesim_core::{SimStats, Simulator};
use pretty_assertions::assert_eq;

use crate::common::{Harness, physical, reads, run, vipt};

// ══════════════════════════════════════════════════════════
// 1. Physically addressed cache
// ══════════════════════════════════════════════════════════

#[test]
fn direct_mapped_conflict_example() {
    // 1 KiB direct mapped with 16-byte blocks: 0x400 lands in set 0 with a new tag.
    let config = physical(10, 4, 0);
    let stats = run(&config, &reads(&[0x0, 0x0, 0x400]));

    assert_eq!(stats.reads, 3);
    assert_eq!(stats.writes, 0);
    assert_eq!(stats.accesses_l1, 3);
    assert_eq!(stats.hits_l1, 1);
    assert_eq!(stats.misses_l1, 2);
    assert_eq!(stats.array_lookups_l1, 3);
    assert_eq!(stats.tag_compares_l1, 3);
    assert_eq!(stats.writebacks_l1, 0);
    assert_eq!(stats.accesses_tlb, 0);
    assert!((stats.avg_access_time - (2.0 + 200.0 / 3.0)).abs() < 1e-9);
}

#[test]
fn conflict_evicts_previous_block() {
    let mut h = Harness::new(&physical(10, 4, 0));
    h.read(0x0);
    h.read(0x400);
    assert!(!h.sim.cache().contains(0, 0));
    assert!(h.sim.cache().contains(0, 1));
}

#[test]
fn lru_eviction_writes_back_dirty_block() {
    // Four ways, tag above bit 8: 0x000..0x400 all map to set 0.
    let config = physical(10, 4, 2);
    let trace = [
        TraceRecord::write(0x000),
        TraceRecord::read(0x100),
        TraceRecord::read(0x200),
        TraceRecord::read(0x300),
        TraceRecord::read(0x400),
    ];
    let stats = run(&config, &trace);

    assert_eq!(stats.writes, 1);
    assert_eq!(stats.reads, 4);
    assert_eq!(stats.misses_l1, 5);
    assert_eq!(stats.writebacks_l1, 1);
    assert_eq!(stats.tag_compares_l1, 5 * 4);
}

#[test]
fn recently_used_block_survives_eviction() {
    let mut h = Harness::new(&physical(10, 4, 1));
    h.read(0x000);
    h.read(0x200);
    h.read(0x000);
    h.read(0x400);
    h.read(0x000);
    let stats = h.finish();
    assert_eq!(stats.hits_l1, 2);
    assert_eq!(stats.misses_l1, 3);
}

#[test]
fn writeback_only_for_dirty_victims() {
    let mut h = Harness::new(&physical(10, 4, 0));
    h.read(0x0);
    h.read(0x400);
    h.write(0x800);
    h.read(0xC00);
    let stats = h.finish();
    assert_eq!(stats.writebacks_l1, 1);
}

#[test]
fn physical_simulator_has_no_translation_state() {
    let sim = Simulator::new(&SimConfig::default());
    assert!(sim.tlb().is_none());
    assert!(sim.hwivpt().is_none());
    assert_eq!(sim.cache().num_sets(), 64);
    assert_eq!(sim.config(), &SimConfig::default());
}

#[test]
fn empty_trace_yields_zero_ratios() {
    let stats = run(&SimConfig::default(), &[]);
    assert_eq!(stats.accesses_l1, 0);
    assert_eq!(stats.hit_ratio_l1, 0.0);
    assert_eq!(stats.miss_ratio_l1, 0.0);
    // Only the hit time remains.
    assert!((stats.avg_access_time - 2.0).abs() < 1e-9);
}

// ══════════════════════════════════════════════════════════
// 2. Virtual memory
// ══════════════════════════════════════════════════════════

#[test]
fn immediate_reaccess_hits_tlb_and_cache() {
    let mut h = Harness::new(&vipt(12, 6, 10, 3, 10));
    h.write(0x1234);
    h.write(0x1234);
    let stats = h.finish();

    assert_eq!(stats.accesses_tlb, 2);
    assert_eq!(stats.hits_tlb, 1);
    assert_eq!(stats.hits_l1, 1);
    assert_eq!(stats.misses_hw_ivpt, 0);
}

#[test]
fn vipt_simulator_sizes_translation_state() {
    let sim = Simulator::new(&vipt(12, 6, 10, 3, 10));
    assert_eq!(sim.tlb().map(|t| t.capacity()), Some(8));
    assert_eq!(sim.hwivpt().map(|t| t.capacity()), Some(1024));
    // Legalized to four ways.
    assert_eq!(sim.cache().ways(), 4);
}

#[test]
fn fault_after_every_frame_is_bound_flushes_cache() {
    // Four frames. Each page writes a block in its own set so nothing conflicts.
    let config = vipt(10, 4, 9, 1, 2);
    let mut h = Harness::new(&config);
    for page in 0..4u64 {
        h.write((page << 9) | (page << 4));
    }
    assert_eq!(h.stats.cache_flushes, 0);
    assert_eq!(h.sim.cache().resident_lines(), 4);

    h.read((4 << 9) | (4 << 4));
    assert_eq!(h.sim.cache().resident_lines(), 1);
    let stats = h.finish();

    assert_eq!(stats.frame_allocations, 4);
    assert_eq!(stats.misses_hw_ivpt, 1);
    assert_eq!(stats.cache_flushes, 1);
    assert_eq!(stats.cache_flush_writebacks, 4);
    assert_eq!(stats.writebacks_l1, 0);
    assert_eq!(stats.misses_tlb, 5);
    assert_eq!(stats.accesses_hw_ivpt, 5);
    assert_eq!(stats.misses_l1, 5);
}

#[test]
fn faulting_access_always_misses() {
    // One frame shared by two pages: every page switch faults.
    let config = vipt(10, 4, 9, 0, 0);
    let stats = run(&config, &reads(&[0x000, 0x000, 0x200, 0x000]));
    assert_eq!(stats.misses_hw_ivpt, 2);
    assert_eq!(stats.hits_l1, 1);
    assert_eq!(stats.misses_l1, 3);
}

fn stale_parent_stats(policy: TlbParentPolicy) -> SimStats {
    // Four TLB entries outlive two frames.
    let config = SimConfig {
        tlb_parent: policy,
        ..vipt(10, 4, 9, 2, 1)
    };
    run(&config, &reads(&[0x000, 0x200, 0x400, 0x000]))
}

#[test]
fn stale_parent_revalidated() {
    let stats = stale_parent_stats(TlbParentPolicy::Revalidate);
    assert_eq!(stats.hits_tlb, 0);
    assert_eq!(stats.misses_tlb, 4);
    assert_eq!(stats.misses_hw_ivpt, 2);
    assert_eq!(stats.cache_flushes, 2);
    assert_eq!(stats.hits_l1, 0);
}

#[test]
fn stale_parent_trusted() {
    let stats = stale_parent_stats(TlbParentPolicy::Trust);
    assert_eq!(stats.hits_tlb, 1);
    assert_eq!(stats.misses_hw_ivpt, 1);
    assert_eq!(stats.cache_flushes, 1);
    // Page 0 aliases the frame page 2 just filled.
    assert_eq!(stats.hits_l1, 1);
}

#[test]
fn replay_with_tracing_enabled() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();

    let stats = run(&vipt(10, 4, 9, 0, 0), &reads(&[0x0, 0x200, 0x0]));
    assert_eq!(stats.accesses_l1, 3);
}
