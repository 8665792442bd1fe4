//! Design-space exploration.
//!
//! Replays one trace over many cache/VM geometries and ranks them by average
//! access time. Candidate configurations are legalized and validated first;
//! combinations that legalize to the same geometry are simulated once.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use serde::Serialize;
use tracing::debug;

use crate::config::SimConfig;
use crate::sim::Simulator;
use crate::sim::trace::TraceRecord;
use crate::stats::SimStats;

/// Parameter ranges to enumerate. Every range is inclusive and in log2 units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SweepSpace {
    /// Cache sizes.
    pub c: RangeInclusive<u32>,
    /// Block sizes.
    pub b: RangeInclusive<u32>,
    /// Associativities.
    pub s: RangeInclusive<u32>,
    /// Enumerate VIPT configurations (with `p`, `t`, `m`) instead of physical ones.
    pub vipt: bool,
    /// Page sizes (VIPT only).
    pub p: RangeInclusive<u32>,
    /// TLB sizes (VIPT only).
    pub t: RangeInclusive<u32>,
    /// Physical page counts (VIPT only).
    pub m: RangeInclusive<u32>,
}

impl Default for SweepSpace {
    fn default() -> Self {
        Self {
            c: 9..=15,
            b: 4..=7,
            s: 0..=4,
            vipt: false,
            p: 9..=14,
            t: 0..=6,
            m: 10..=12,
        }
    }
}

/// One simulated point of the sweep.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SweepResult {
    /// Legalized configuration.
    pub config: SimConfig,
    /// Finalized statistics.
    pub stats: SimStats,
}

/// Lists every distinct legal configuration in `space`, in enumeration order.
///
/// Physical sweeps ignore the `p`, `t` and `m` ranges and keep `base`'s values.
pub fn enumerate(space: &SweepSpace, base: &SimConfig) -> Vec<SimConfig> {
    let vm_points: Vec<(u32, u32, u32)> = if space.vipt {
        space
            .p
            .clone()
            .flat_map(move |p| {
                space
                    .t
                    .clone()
                    .flat_map(move |t| space.m.clone().map(move |m| (p, t, m)))
            })
            .collect()
    } else {
        vec![(base.p, base.t, base.m)]
    };

    let mut seen = HashSet::new();
    let mut configs = Vec::new();
    for c in space.c.clone() {
        for b in space.b.clone() {
            for s in space.s.clone() {
                for &(p, t, m) in &vm_points {
                    let candidate = SimConfig {
                        c,
                        b,
                        s,
                        vipt: space.vipt,
                        p,
                        t,
                        m,
                        tlb_parent: base.tlb_parent,
                    }
                    .legalize();
                    if candidate.validate().is_ok() && seen.insert(candidate) {
                        configs.push(candidate);
                    }
                }
            }
        }
    }
    debug!(count = configs.len(), "sweep space enumerated");
    configs
}

/// Simulates `trace` under every configuration and sorts by ascending AAT.
///
/// Ties keep enumeration order.
pub fn run(trace: &[TraceRecord], configs: &[SimConfig]) -> Vec<SweepResult> {
    let mut results: Vec<SweepResult> = configs
        .iter()
        .map(|config| SweepResult {
            config: *config,
            stats: Simulator::run(config, trace),
        })
        .collect();
    results.sort_by(|a, b| a.stats.avg_access_time.total_cmp(&b.stats.avg_access_time));
    results
}
