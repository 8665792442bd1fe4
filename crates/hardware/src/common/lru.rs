//! Arena-backed recency list.
//!
//! Both the cache sets and the translation stores keep their entries in
//! most-recently-used order. [`LruList`] stores the entries in a slot arena and
//! threads a doubly-linked list of slot indices through them, so that:
//! 1. **Touch:** Moving an entry to the MRU position is O(1).
//! 2. **Evict:** Removing the LRU entry is O(1).
//! 3. **Stable Handles:** A slot index stays valid until that slot is removed, which lets
//!    other structures refer to an entry by index instead of by pointer.
//!
//! Removed slots are recycled through a free list, so a list that never grows beyond
//! its initial capacity never reallocates.

const NIL: usize = usize::MAX;

#[derive(Clone, Copy, Debug)]
struct Link {
    prev: usize,
    next: usize,
}

impl Default for Link {
    fn default() -> Self {
        Self {
            prev: NIL,
            next: NIL,
        }
    }
}

/// Recency-ordered list with O(1) move-to-front and pop-back.
#[derive(Clone, Debug)]
pub struct LruList<T> {
    values: Vec<Option<T>>,
    links: Vec<Link>,
    free: Vec<usize>,
    head: usize,
    tail: usize,
    len: usize,
}

impl<T> Default for LruList<T> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<T> LruList<T> {
    /// Creates an empty list with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            links: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: NIL,
            tail: NIL,
            len: 0,
        }
    }

    /// Number of entries currently in the list.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list holds no entries.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slot of the most recently used entry.
    #[inline]
    pub const fn front(&self) -> Option<usize> {
        if self.head == NIL { None } else { Some(self.head) }
    }

    /// Slot of the least recently used entry.
    #[inline]
    pub const fn back(&self) -> Option<usize> {
        if self.tail == NIL { None } else { Some(self.tail) }
    }

    /// Returns the entry stored in `slot`, if occupied.
    #[inline]
    pub fn get(&self, slot: usize) -> Option<&T> {
        self.values.get(slot)?.as_ref()
    }

    /// Returns the entry stored in `slot` mutably, if occupied.
    #[inline]
    pub fn get_mut(&mut self, slot: usize) -> Option<&mut T> {
        self.values.get_mut(slot)?.as_mut()
    }

    /// Inserts `value` at the MRU position and returns its slot.
    pub fn push_front(&mut self, value: T) -> usize {
        let slot = if let Some(slot) = self.free.pop() {
            self.values[slot] = Some(value);
            slot
        } else {
            self.values.push(Some(value));
            self.links.push(Link::default());
            self.values.len() - 1
        };
        self.link_front(slot);
        self.len += 1;
        slot
    }

    /// Removes and returns the LRU entry.
    pub fn pop_back(&mut self) -> Option<T> {
        let slot = self.back()?;
        self.remove(slot)
    }

    /// Removes the entry in `slot`, releasing the slot for reuse.
    pub fn remove(&mut self, slot: usize) -> Option<T> {
        let value = self.values.get_mut(slot)?.take()?;
        self.unlink(slot);
        self.free.push(slot);
        self.len -= 1;
        Some(value)
    }

    /// Moves an occupied slot to the MRU position.
    pub fn move_to_front(&mut self, slot: usize) {
        if self.get(slot).is_none() || self.head == slot {
            return;
        }
        self.unlink(slot);
        self.link_front(slot);
    }

    /// Moves an occupied slot to the LRU position, making it the next eviction victim.
    pub fn move_to_back(&mut self, slot: usize) {
        if self.get(slot).is_none() || self.tail == slot {
            return;
        }
        self.unlink(slot);
        self.link_back(slot);
    }

    /// Finds the first slot, in MRU-to-LRU order, whose entry satisfies `pred`.
    pub fn position<F>(&self, mut pred: F) -> Option<usize>
    where
        F: FnMut(&T) -> bool,
    {
        self.iter().find(|(_, v)| pred(v)).map(|(slot, _)| slot)
    }

    /// Iterates `(slot, entry)` pairs from MRU to LRU.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    /// Drops every entry. Slots are kept allocated for reuse.
    pub fn clear(&mut self) {
        self.free.clear();
        for (slot, value) in self.values.iter_mut().enumerate() {
            *value = None;
            self.links[slot] = Link::default();
            self.free.push(slot);
        }
        self.head = NIL;
        self.tail = NIL;
        self.len = 0;
    }

    fn unlink(&mut self, slot: usize) {
        let Link { prev, next } = self.links[slot];
        if prev == NIL {
            self.head = next;
        } else {
            self.links[prev].next = next;
        }
        if next == NIL {
            self.tail = prev;
        } else {
            self.links[next].prev = prev;
        }
        self.links[slot] = Link::default();
    }

    fn link_front(&mut self, slot: usize) {
        let old_head = self.head;
        self.links[slot] = Link {
            prev: NIL,
            next: old_head,
        };
        if old_head == NIL {
            self.tail = slot;
        } else {
            self.links[old_head].prev = slot;
        }
        self.head = slot;
    }

    fn link_back(&mut self, slot: usize) {
        let old_tail = self.tail;
        self.links[slot] = Link {
            prev: old_tail,
            next: NIL,
        };
        if old_tail == NIL {
            self.head = slot;
        } else {
            self.links[old_tail].next = slot;
        }
        self.tail = slot;
    }
}

/// MRU-to-LRU iterator over an [`LruList`].
#[derive(Debug)]
pub struct Iter<'a, T> {
    list: &'a LruList<T>,
    cursor: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (usize, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == NIL {
            return None;
        }
        let slot = self.cursor;
        self.cursor = self.list.links[slot].next;
        self.list.get(slot).map(|v| (slot, v))
    }
}
