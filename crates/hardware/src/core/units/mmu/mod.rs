//! Memory Management Unit (MMU).
//!
//! This module implements the two-stage virtual-to-physical translation used
//! when the cache is virtually indexed and physically tagged:
//! 1. **TLB:** A small fully associative LRU store, checked first.
//! 2. **HWIVPT:** The hardware inverted page table, one entry per physical frame,
//!    consulted on a TLB miss. A hit refills the TLB.
//! 3. **Frame Allocation:** A miss in both while a frame is still unbound binds
//!    that frame to the page. The frame has never been used, so the cache holds
//!    nothing tagged with it.
//! 4. **Page Fault:** A miss in both once every frame is bound reuses the LRU
//!    frame of the HWIVPT for the new page. Because the physically tagged cache
//!    may still hold lines tagged with that frame, the whole cache is flushed first.

/// Fixed-capacity translation store used for both the TLB and the HWIVPT.
pub mod tlb;

use tracing::{debug, trace};

use crate::common::{AddressDecoder, PhysAddr, VirtAddr};
use crate::config::{SimConfig, TlbParentPolicy};
use crate::core::units::cache::SetAssociativeCache;

use self::tlb::TranslationStore;

/// Which level resolved a translation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TranslationPath {
    /// The TLB held the mapping.
    TlbHit,
    /// The TLB missed and the HWIVPT held the mapping.
    PageTableHit,
    /// Both missed and an unbound frame was assigned to the page.
    FrameAllocated,
    /// Both missed; a frame was reclaimed and the cache flushed.
    PageFault {
        /// Dirty lines discarded by the flush.
        flushed_dirty: u64,
    },
}

/// Outcome of [`Mmu::translate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Translated {
    /// Resolved physical address.
    pub paddr: PhysAddr,
    /// Level that produced the mapping.
    pub path: TranslationPath,
}

/// Translation coordinator owning the TLB and the HWIVPT.
#[derive(Clone, Debug)]
pub struct Mmu {
    /// Translation lookaside buffer, `2^t` entries.
    pub tlb: TranslationStore,
    /// Hardware inverted page table, `2^m` entries (one per physical frame).
    pub hwivpt: TranslationStore,
    parent_policy: TlbParentPolicy,
}

impl Mmu {
    /// Creates an MMU sized for `config`, with every entry invalid.
    pub fn new(config: &SimConfig) -> Self {
        Self {
            tlb: TranslationStore::new(config.tlb_entries()),
            hwivpt: TranslationStore::new(config.phys_pages()),
            parent_policy: config.tlb_parent,
        }
    }

    /// Translates `vaddr`, flushing `cache` if a page fault reclaims a frame.
    pub fn translate(
        &mut self,
        vaddr: VirtAddr,
        decoder: &AddressDecoder,
        cache: &mut SetAssociativeCache,
    ) -> Translated {
        let Some(vpn) = decoder.vpn(vaddr) else {
            return Translated {
                paddr: PhysAddr(vaddr.val()),
                path: TranslationPath::TlbHit,
            };
        };

        if let Some(pfn) = self.tlb_hit(vpn) {
            trace!(vpn, pfn, "tlb hit");
            return Translated {
                paddr: decoder.compose(pfn, vaddr),
                path: TranslationPath::TlbHit,
            };
        }

        let (parent, pfn, path) = match self.hwivpt.lookup(vpn) {
            Some(slot) => {
                self.hwivpt.touch(slot);
                let pfn = self.hwivpt.get(slot).map_or(0, |e| e.pfn);
                trace!(vpn, pfn, "hwivpt hit");
                (slot, pfn, TranslationPath::PageTableHit)
            }
            None if self.hwivpt.has_free_frame() => {
                let (slot, pfn) = self.hwivpt.install_frame(vpn).unwrap_or((0, 0));
                trace!(vpn, pfn, "frame allocated");
                (slot, pfn, TranslationPath::FrameAllocated)
            }
            None => {
                let flushed_dirty = cache.flush();
                let (slot, pfn) = self.hwivpt.install_frame(vpn).unwrap_or((0, 0));
                debug!(vpn, pfn, flushed_dirty, "page fault, cache flushed");
                (slot, pfn, TranslationPath::PageFault { flushed_dirty })
            }
        };

        let _ = self.tlb.install(vpn, pfn, Some(parent));
        Translated {
            paddr: decoder.compose(pfn, vaddr),
            path,
        }
    }

    /// Looks `vpn` up in the TLB and, on a hit, refreshes both the TLB entry and
    /// the HWIVPT entry it mirrors.
    fn tlb_hit(&mut self, vpn: u64) -> Option<u64> {
        let slot = self.tlb.lookup(vpn)?;
        let entry = *self.tlb.get(slot)?;

        if let Some(parent) = entry.parent {
            let current = self.hwivpt.get(parent).copied();
            let stale = !current
                .is_some_and(|p| p.valid && p.vpn == entry.vpn && p.pfn == entry.pfn);
            if stale && self.parent_policy == TlbParentPolicy::Revalidate {
                trace!(vpn, parent, "stale tlb entry dropped");
                self.tlb.invalidate(slot);
                return None;
            }
            self.hwivpt.touch(parent);
        }

        self.tlb.touch(slot);
        Some(entry.pfn)
    }
}
