//! Configuration system for the memory hierarchy simulator.
//!
//! This module defines the configuration structure used to parameterize the
//! simulator. It provides:
//! 1. **Defaults:** Baseline geometry (4 KiB direct-mapped cache with 64-byte blocks, 1 KiB pages).
//! 2. **Legalization:** Raising associativity so that a VIPT cache indexes only with page-offset bits.
//! 3. **Validation:** Range checks on every parameter before the engine is built.
//! 4. **Reporting:** The human-readable `(C,B,S)` settings block.
//!
//! All sizes use the (C, B, S) cache taxonomy: each field is the base-2 logarithm
//! of the quantity it names. Configuration is supplied via JSON or command-line
//! flags, or use `SimConfig::default()`.

use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::error::{ConfigError, SimError};

/// Default configuration constants for the simulator.
mod defaults {
    /// log2 cache size (4 KiB).
    pub const C: u32 = 12;

    /// log2 associativity (direct mapped if possible).
    pub const S: u32 = 0;

    /// log2 block size (64-byte blocks).
    pub const B: u32 = 6;

    /// log2 page size (1 KiB pages).
    pub const P: u32 = 10;

    /// log2 TLB entries (8 entries).
    pub const T: u32 = 3;

    /// log2 physical pages, which is also the HWIVPT entry count (1024 pages).
    pub const M: u32 = 10;
}

/// Smallest legal log2 block size.
pub const MIN_B: u32 = 4;
/// Largest legal log2 block size.
pub const MAX_B: u32 = 7;
/// Smallest legal log2 cache size.
pub const MIN_C: u32 = 9;
/// Largest legal log2 cache size.
pub const MAX_C: u32 = 18;
/// Smallest legal log2 page size.
pub const MIN_P: u32 = 9;
/// Largest legal log2 page size.
pub const MAX_P: u32 = 14;
/// Largest legal log2 physical page count.
pub const MAX_M: u32 = 20;
/// Largest simulated physical memory, as log2 bytes.
pub const MAX_PHYS_MEM_BITS: u32 = 32;

/// How a TLB hit treats the HWIVPT entry it was filled from.
///
/// A TLB entry remembers the HWIVPT slot it mirrors. When that slot is later
/// reused for another page after a page fault, the TLB entry is not notified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum TlbParentPolicy {
    /// Check the parent slot on every TLB hit. If it no longer maps the same page,
    /// the TLB entry is invalidated and the access proceeds as a TLB miss.
    #[default]
    Revalidate,
    /// Follow the parent link unconditionally, refreshing whichever page now
    /// occupies that HWIVPT slot.
    Trust,
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::SimConfig;
///
/// let config = SimConfig { c: 10, b: 4, ..SimConfig::default() };
/// assert_eq!(config.num_sets(), 64);
/// assert_eq!(config.num_ways(), 1);
/// ```
///
/// Deserializing from JSON; omitted fields take their defaults:
///
/// ```
/// use cachesim_core::config::{SimConfig, TlbParentPolicy};
///
/// let config: SimConfig = serde_json::from_str(r#"{ "c": 14, "vipt": true, "t": 5 }"#).unwrap();
/// assert_eq!(config.c, 14);
/// assert_eq!(config.b, 6);
/// assert_eq!(config.tlb_parent, TlbParentPolicy::Revalidate);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimConfig {
    /// log2 of the total L1 size in bytes.
    #[serde(default = "SimConfig::default_c")]
    pub c: u32,

    /// log2 of the L1 block size in bytes.
    #[serde(default = "SimConfig::default_b")]
    pub b: u32,

    /// log2 of the number of ways per set. Adjusted by [`SimConfig::legalize`] for VIPT.
    #[serde(default = "SimConfig::default_s")]
    pub s: u32,

    /// Trace addresses are virtual and the cache is virtually indexed, physically tagged.
    #[serde(default)]
    pub vipt: bool,

    /// log2 of the page size in bytes.
    #[serde(default = "SimConfig::default_p")]
    pub p: u32,

    /// log2 of the number of TLB entries.
    #[serde(default = "SimConfig::default_t")]
    pub t: u32,

    /// log2 of the number of physical pages (HWIVPT entries).
    #[serde(default = "SimConfig::default_m")]
    pub m: u32,

    /// Handling of stale TLB-to-HWIVPT links.
    #[serde(default)]
    pub tlb_parent: TlbParentPolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            c: defaults::C,
            b: defaults::B,
            s: defaults::S,
            vipt: false,
            p: defaults::P,
            t: defaults::T,
            m: defaults::M,
            tlb_parent: TlbParentPolicy::default(),
        }
    }
}

impl SimConfig {
    const fn default_c() -> u32 {
        defaults::C
    }

    const fn default_b() -> u32 {
        defaults::B
    }

    const fn default_s() -> u32 {
        defaults::S
    }

    const fn default_p() -> u32 {
        defaults::P
    }

    const fn default_t() -> u32 {
        defaults::T
    }

    const fn default_m() -> u32 {
        defaults::M
    }

    /// Loads a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, SimError> {
        let text = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Returns the configuration with `s` raised so that a VIPT cache is addressable.
    ///
    /// A VIPT cache selects the set with virtual address bits before translation
    /// finishes, so every bit below the tag (`c - s` bits) must come from the page
    /// offset. When `c - s > p`, `s` becomes `c - p`. Physically addressed
    /// configurations, and already-legal ones, are returned unchanged.
    #[must_use]
    pub const fn legalize(&self) -> Self {
        let mut out = *self;
        if self.vipt && self.c.saturating_sub(self.s) > self.p {
            out.s = self.c - self.p;
        }
        out
    }

    /// Returns `true` if [`SimConfig::legalize`] would leave this configuration unchanged.
    pub const fn is_legal(&self) -> bool {
        !self.vipt || self.c.saturating_sub(self.s) <= self.p
    }

    /// Checks every parameter range. Run on the legalized configuration.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.b < MIN_B || self.b > MAX_B {
            return Err(ConfigError::BlockSize { b: self.b });
        }
        if self.c < MIN_C || self.c > MAX_C {
            return Err(ConfigError::CacheSize { c: self.c });
        }
        if self.b.saturating_add(self.s) > self.c {
            return Err(ConfigError::Geometry {
                c: self.c,
                b: self.b,
                s: self.s,
            });
        }
        if self.vipt {
            if self.p < MIN_P || self.p > MAX_P || self.p > self.c {
                return Err(ConfigError::PageSize {
                    p: self.p,
                    c: self.c,
                });
            }
            let limit = self.c - self.b - self.s;
            if self.t > limit {
                return Err(ConfigError::TlbEntries { t: self.t, limit });
            }
            if self.m < self.p || self.m > MAX_M {
                return Err(ConfigError::PhysicalPages {
                    m: self.m,
                    p: self.p,
                });
            }
            if self.m + self.p > MAX_PHYS_MEM_BITS {
                return Err(ConfigError::MemorySize {
                    m: self.m,
                    p: self.p,
                });
            }
        }
        Ok(())
    }

    /// Number of ways per set, `2^s`.
    pub const fn num_ways(&self) -> usize {
        1 << self.s
    }

    /// Number of sets, `2^(c - b - s)`.
    pub const fn num_sets(&self) -> usize {
        1 << self.c.saturating_sub(self.b).saturating_sub(self.s)
    }

    /// Number of TLB entries, `2^t`.
    pub const fn tlb_entries(&self) -> usize {
        1 << self.t
    }

    /// Number of physical pages and HWIVPT entries, `2^m`.
    pub const fn phys_pages(&self) -> usize {
        1 << self.m
    }

    /// Writes the settings block.
    ///
    /// With `associativity_known == false` a VIPT configuration prints `S` as `x`,
    /// as it does before legalization has chosen it.
    pub fn write_settings<W: Write>(&self, out: &mut W, associativity_known: bool) -> io::Result<()> {
        if self.vipt && !associativity_known {
            writeln!(out, "(C,B,S): ({},{},x)", self.c, self.b)?;
        } else {
            writeln!(out, "(C,B,S): ({},{},{})", self.c, self.b, self.s)?;
        }
        if self.vipt {
            writeln!(out, "Assume Virtual Addresses")?;
            writeln!(out, "\tlog2(Page Size): {}", self.p)?;
            writeln!(out, "\tlog2(TLB entries): {}", self.t)?;
            writeln!(out, "\tlog2(Physical Pages in Memory): {}", self.m)?;
        } else {
            writeln!(out, "Assume Physical Addresses")?;
        }
        Ok(())
    }
}
