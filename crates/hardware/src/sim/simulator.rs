//! Simulator: owns the L1 cache and, with virtual memory, the MMU.
//!
//! One [`Simulator::access`] runs a trace event to completion: translation
//! (possibly a page fault and cache flush), then the L1 lookup with its fill and
//! eviction, then the counter updates. Nothing is shared between simulators.

use tracing::{debug, info, trace};

use crate::common::{AccessType, AddressDecoder, PhysAddr, VirtAddr};
use crate::config::SimConfig;
use crate::core::units::cache::SetAssociativeCache;
use crate::core::units::mmu::tlb::TranslationStore;
use crate::core::units::mmu::{Mmu, TranslationPath};
use crate::sim::trace::TraceRecord;
use crate::stats::SimStats;

/// Top-level simulation engine.
#[derive(Clone, Debug)]
pub struct Simulator {
    config: SimConfig,
    decoder: AddressDecoder,
    cache: SetAssociativeCache,
    mmu: Option<Mmu>,
}

impl Simulator {
    /// Allocates all state for `config`.
    ///
    /// `config` must already be legalized and validated; no checks are repeated here.
    pub fn new(config: &SimConfig) -> Self {
        debug_assert!(config.is_legal(), "configuration must be legalized first");

        let decoder = AddressDecoder::new(config);
        let cache = SetAssociativeCache::new(config.num_sets(), config.num_ways());
        let mmu = config.vipt.then(|| Mmu::new(config));

        debug!(
            sets = cache.num_sets(),
            ways = cache.ways(),
            block_bytes = 1u64 << config.b,
            index_bits = decoder.index_bits(),
            tag_shift = decoder.tag_shift(),
            vipt = config.vipt,
            "simulator setup"
        );
        if let Some(mmu) = &mmu {
            debug!(
                tlb_entries = mmu.tlb.capacity(),
                hwivpt_entries = mmu.hwivpt.capacity(),
                page_bytes = 1u64 << config.p,
                "virtual memory enabled"
            );
        }

        Self {
            config: *config,
            decoder,
            cache,
            mmu,
        }
    }

    /// Simulates one trace event.
    pub fn access(&mut self, access: AccessType, addr: u64, stats: &mut SimStats) {
        stats.record_access(access);

        let vaddr = VirtAddr::new(addr);
        let (paddr, faulted) = match self.mmu.as_mut() {
            Some(mmu) => {
                let translated = mmu.translate(vaddr, &self.decoder, &mut self.cache);
                stats.record_translation(translated.path);
                (
                    translated.paddr,
                    matches!(translated.path, TranslationPath::PageFault { .. }),
                )
            }
            None => (PhysAddr::new(addr), false),
        };

        let index = self.decoder.index(vaddr.val());
        let tag = self.decoder.tag(paddr);
        let outcome = self.cache.access(index, tag, access.is_write());
        debug_assert!(!(faulted && outcome.hit), "a page fault leaves the cache empty");
        stats.record_l1(outcome, self.cache.ways());

        trace!(
            op = %access.as_char(),
            addr = format_args!("{addr:#x}"),
            paddr = format_args!("{:#x}", paddr.val()),
            index,
            tag,
            hit = outcome.hit,
            "l1 access"
        );
    }

    /// Computes the derived statistics and releases the engine.
    pub fn finish(self, stats: &mut SimStats) {
        stats.finalize(&self.config);
        info!(
            accesses = stats.accesses_l1,
            hit_ratio_l1 = stats.hit_ratio_l1,
            aat = stats.avg_access_time,
            "simulation finished"
        );
    }

    /// Replays `trace` on a fresh simulator and returns the finalized statistics.
    pub fn run<'a, I>(config: &SimConfig, trace: I) -> SimStats
    where
        I: IntoIterator<Item = &'a TraceRecord>,
    {
        let mut sim = Self::new(config);
        let mut stats = SimStats::default();
        for record in trace {
            sim.access(record.access, record.addr, &mut stats);
        }
        sim.finish(&mut stats);
        stats
    }

    /// The configuration this simulator was built with.
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// The address decoder derived from the configuration.
    pub const fn decoder(&self) -> &AddressDecoder {
        &self.decoder
    }

    /// The L1 cache.
    pub const fn cache(&self) -> &SetAssociativeCache {
        &self.cache
    }

    /// The TLB, when virtual memory is enabled.
    pub fn tlb(&self) -> Option<&TranslationStore> {
        self.mmu.as_ref().map(|mmu| &mmu.tlb)
    }

    /// The HWIVPT, when virtual memory is enabled.
    pub fn hwivpt(&self) -> Option<&TranslationStore> {
        self.mmu.as_ref().map(|mmu| &mmu.hwivpt)
    }
}
