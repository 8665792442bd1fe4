//! Physical and Virtual Address types and the address decoder.
//!
//! This module defines strong types for physical and virtual addresses to prevent
//! accidental mixing of address spaces. It provides the following:
//! 1. **Type Safety:** Distinguishes between virtual and physical address spaces at compile time.
//! 2. **Field Extraction:** [`AddressDecoder`] splits an address into block offset, set index,
//!    physical tag and virtual page number using masks derived once from the configuration.
//! 3. **Address Rewriting:** Composes a physical address from a frame number and the page
//!    offset of a virtual address.

use crate::common::constants::ADDRESS_BITS;
use crate::config::SimConfig;

/// A virtual address, as it appears in the trace when virtual memory is enabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtAddr(pub u64);

/// A physical address, either taken directly from the trace or produced by translation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhysAddr(pub u64);

impl VirtAddr {
    /// Creates a new virtual address from a raw 64-bit value.
    #[inline(always)]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub const fn val(&self) -> u64 {
        self.0
    }
}

impl PhysAddr {
    /// Creates a new physical address from a raw 64-bit value.
    #[inline(always)]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub const fn val(&self) -> u64 {
        self.0
    }
}

/// Returns a mask with the low `bits` bits set.
#[inline(always)]
const fn low_mask(bits: u32) -> u64 {
    if bits >= ADDRESS_BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Shifts right, yielding zero once every bit has been shifted out.
#[inline(always)]
const fn shr(value: u64, bits: u32) -> u64 {
    if bits >= ADDRESS_BITS { 0 } else { value >> bits }
}

/// Pure bit-field extraction for a legalized configuration.
///
/// Field layout, low bits first:
///
/// ```text
///  63                c-s            b            0
///  +------------------+-------------+------------+
///  |       tag        |    index    |   offset   |
///  +------------------+-------------+------------+
///  63                        p                   0
///  +--------------------------+------------------+
///  |           vpn            |   page offset    |
///  +--------------------------+------------------+
/// ```
///
/// In a legal VIPT configuration `c - s <= p`, so the index lies entirely inside the
/// page offset and is identical for the virtual and the translated address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressDecoder {
    offset_bits: u32,
    index_bits: u32,
    tag_shift: u32,
    page_bits: Option<u32>,
}

impl AddressDecoder {
    /// Derives the field masks from a legalized configuration.
    ///
    /// `page_bits` is only recorded when virtual memory is enabled; physical-only
    /// configurations never compute a VPN.
    pub const fn new(config: &SimConfig) -> Self {
        let tag_shift = config.c.saturating_sub(config.s);
        Self {
            offset_bits: config.b,
            index_bits: tag_shift.saturating_sub(config.b),
            tag_shift,
            page_bits: if config.vipt { Some(config.p) } else { None },
        }
    }

    /// Byte offset within the cache block: `addr[0 .. b)`.
    #[inline(always)]
    pub const fn offset(&self, addr: u64) -> u64 {
        addr & low_mask(self.offset_bits)
    }

    /// Set index: `addr[b .. c-s)`.
    #[inline(always)]
    pub const fn index(&self, addr: u64) -> usize {
        (shr(addr, self.offset_bits) & low_mask(self.index_bits)) as usize
    }

    /// Physical tag: `addr[c-s .. 64)`.
    #[inline(always)]
    pub const fn tag(&self, addr: PhysAddr) -> u64 {
        shr(addr.0, self.tag_shift)
    }

    /// Virtual page number `addr[p .. 64)`, or `None` when virtual memory is disabled.
    #[inline(always)]
    pub const fn vpn(&self, addr: VirtAddr) -> Option<u64> {
        match self.page_bits {
            Some(p) => Some(shr(addr.0, p)),
            None => None,
        }
    }

    /// Builds the physical address for `vaddr` once it is mapped to frame `pfn`.
    ///
    /// Without virtual memory the address is passed through unchanged.
    #[inline(always)]
    pub const fn compose(&self, pfn: u64, vaddr: VirtAddr) -> PhysAddr {
        match self.page_bits {
            Some(p) if p < ADDRESS_BITS => PhysAddr((pfn << p) | (vaddr.0 & low_mask(p))),
            Some(_) => PhysAddr(vaddr.0),
            None => PhysAddr(vaddr.0),
        }
    }

    /// Number of set-index bits (`c - b - s`).
    pub const fn index_bits(&self) -> u32 {
        self.index_bits
    }

    /// Bit position of the least significant tag bit (`c - s`).
    pub const fn tag_shift(&self) -> u32 {
        self.tag_shift
    }
}
