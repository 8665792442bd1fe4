//! Set-Associative Cache Simulator.
//!
//! This module implements the physically tagged L1 model: an array of sets, each
//! holding at most `2^s` lines in LRU order. Only address metadata is modeled:
//! a line is a tag and a dirty bit, and residency is the presence of the line in
//! its set. It models:
//! 1. **Lookup:** Tag match against every resident line of the indexed set.
//! 2. **Fill:** Misses install the line at the MRU position.
//! 3. **Eviction:** Overflowing a set discards its LRU line, reporting a writeback if dirty.
//! 4. **Flush:** Discarding every line at once, counting dirty lines.

use tracing::trace;

use crate::common::LruList;

/// A resident cache line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheLine {
    /// Physical tag (`addr[c-s ..]`).
    pub tag: u64,
    /// Written since it was filled.
    pub dirty: bool,
}

/// Result of a single cache access.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheAccess {
    /// The tag was resident in the indexed set.
    pub hit: bool,
    /// The access evicted a dirty line that must be written back.
    pub writeback: bool,
}

/// Physically tagged set-associative cache with true LRU replacement.
#[derive(Clone, Debug)]
pub struct SetAssociativeCache {
    sets: Vec<LruList<CacheLine>>,
    ways: usize,
}

impl SetAssociativeCache {
    /// Creates an empty cache of `num_sets` sets with `ways` lines each.
    ///
    /// Each set reserves one spare slot: the incoming line is inserted before the
    /// victim is evicted, so a set briefly holds `ways + 1` lines.
    pub fn new(num_sets: usize, ways: usize) -> Self {
        let ways = ways.max(1);
        let sets = (0..num_sets.max(1))
            .map(|_| LruList::with_capacity(ways + 1))
            .collect();
        Self { sets, ways }
    }

    /// Associativity (lines per set).
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Number of sets.
    pub const fn num_sets(&self) -> usize {
        self.sets.len()
    }

    /// Accesses the line with `tag` in set `index`.
    ///
    /// On a hit the line moves to MRU; on a miss a clean line is installed at MRU.
    /// A write marks the line dirty in either case. If the set then holds more than
    /// `ways` lines, its LRU line is evicted.
    ///
    /// # Panics
    ///
    /// Panics if `index >= num_sets()`. Indices produced by the
    /// [`AddressDecoder`](crate::common::AddressDecoder) for the same configuration are always in range.
    pub fn access(&mut self, index: usize, tag: u64, is_write: bool) -> CacheAccess {
        let ways = self.ways;
        let set = &mut self.sets[index];

        let (slot, hit) = match set.position(|line| line.tag == tag) {
            Some(slot) => {
                set.move_to_front(slot);
                (slot, true)
            }
            None => (set.push_front(CacheLine { tag, dirty: false }), false),
        };

        if is_write {
            if let Some(line) = set.get_mut(slot) {
                line.dirty = true;
            }
        }

        let mut writeback = false;
        if set.len() > ways {
            if let Some(victim) = set.pop_back() {
                trace!(index, tag = victim.tag, dirty = victim.dirty, "evict");
                writeback = victim.dirty;
            }
        }

        CacheAccess { hit, writeback }
    }

    /// Returns `true` if `tag` is resident in set `index`.
    pub fn contains(&self, index: usize, tag: u64) -> bool {
        self.sets
            .get(index)
            .is_some_and(|set| set.position(|line| line.tag == tag).is_some())
    }

    /// Lines of set `index`, from MRU to LRU.
    pub fn lines(&self, index: usize) -> impl Iterator<Item = &CacheLine> + '_ {
        self.sets
            .get(index)
            .into_iter()
            .flat_map(|set| set.iter().map(|(_, line)| line))
    }

    /// Number of lines resident in set `index`.
    pub fn occupancy(&self, index: usize) -> usize {
        self.sets.get(index).map_or(0, LruList::len)
    }

    /// Total number of resident lines.
    pub fn resident_lines(&self) -> usize {
        self.sets.iter().map(LruList::len).sum()
    }

    /// Discards every line and returns how many of them were dirty.
    pub fn flush(&mut self) -> u64 {
        let mut dirty = 0;
        for set in &mut self.sets {
            dirty += set.iter().filter(|(_, line)| line.dirty).count() as u64;
            set.clear();
        }
        dirty
    }
}
