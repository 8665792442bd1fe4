//! Fully associative translation stores.
//!
//! The same structure backs both the Translation Lookaside Buffer and the
//! hardware inverted page table (HWIVPT). A store holds a fixed number of
//! pre-allocated entries in LRU order. Entries are never freed: installing a new
//! mapping overwrites the LRU entry in place and moves it to the MRU position,
//! so the store always holds exactly its capacity.
//!
//! Every slot of the HWIVPT stands for one physical frame. Slot `i` is created
//! with frame number `i`, and that frame number is kept when the slot is reused
//! for another page.

use crate::common::LruList;

/// A virtual-to-physical mapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Translation {
    /// Virtual page number (the search key).
    pub vpn: u64,
    /// Physical frame number.
    pub pfn: u64,
    /// The entry holds a live mapping.
    pub valid: bool,
    /// For TLB entries: the HWIVPT slot this entry was filled from.
    pub parent: Option<usize>,
}

/// Fixed-capacity fully associative LRU store of translations.
#[derive(Clone, Debug)]
pub struct TranslationStore {
    entries: LruList<Translation>,
    capacity: usize,
}

impl TranslationStore {
    /// Creates a store with `capacity` invalid entries.
    ///
    /// Slot `i` starts with frame number `i`. Slot 0 is the LRU entry, so an empty
    /// store hands out frames in ascending order.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut entries = LruList::with_capacity(capacity);
        for frame in 0..capacity {
            let slot = entries.push_front(Translation {
                pfn: frame as u64,
                ..Translation::default()
            });
            debug_assert_eq!(slot, frame);
        }
        Self { entries, capacity }
    }

    /// Number of entries the store was built with.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries currently held. Always equal to [`TranslationStore::capacity`].
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; a store is never empty.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds the valid entry mapping `vpn` without touching recency.
    pub fn lookup(&self, vpn: u64) -> Option<usize> {
        self.entries.position(|e| e.valid && e.vpn == vpn)
    }

    /// Returns the entry in `slot`.
    pub fn get(&self, slot: usize) -> Option<&Translation> {
        self.entries.get(slot)
    }

    /// Moves `slot` to the MRU position.
    pub fn touch(&mut self, slot: usize) {
        self.entries.move_to_front(slot);
    }

    /// Returns `true` while some entry is still invalid.
    ///
    /// Invalid entries always sit behind every valid one, so only the LRU entry is checked.
    pub fn has_free_frame(&self) -> bool {
        self.lru_slot()
            .and_then(|slot| self.entries.get(slot))
            .is_some_and(|e| !e.valid)
    }

    /// Slot that the next install will overwrite.
    pub fn lru_slot(&self) -> Option<usize> {
        self.entries.back()
    }

    /// Overwrites the LRU entry with `vpn -> pfn`, moves it to MRU and returns its slot.
    pub fn install(&mut self, vpn: u64, pfn: u64, parent: Option<usize>) -> Option<usize> {
        let slot = self.entries.back()?;
        if let Some(entry) = self.entries.get_mut(slot) {
            *entry = Translation {
                vpn,
                pfn,
                valid: true,
                parent,
            };
        }
        self.entries.move_to_front(slot);
        Some(slot)
    }

    /// Reuses the LRU entry's physical frame for `vpn`.
    ///
    /// Returns the slot and the frame number. The previous mapping of that frame,
    /// if any, is overwritten.
    pub fn install_frame(&mut self, vpn: u64) -> Option<(usize, u64)> {
        let slot = self.entries.back()?;
        let pfn = self.entries.get(slot)?.pfn;
        let _ = self.install(vpn, pfn, None)?;
        Some((slot, pfn))
    }

    /// Marks `slot` invalid and makes it the next entry to be reused.
    pub fn invalidate(&mut self, slot: usize) {
        if let Some(entry) = self.entries.get_mut(slot) {
            entry.valid = false;
            entry.parent = None;
        }
        self.entries.move_to_back(slot);
    }

    /// Iterates `(slot, entry)` pairs from MRU to LRU.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Translation)> + '_ {
        self.entries.iter()
    }
}
