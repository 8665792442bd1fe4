//! Memory hierarchy simulator CLI.
//!
//! This binary drives the simulation engine. It performs:
//! 1. **Run:** Replay one trace (file or stdin) under one configuration and print the statistics report.
//! 2. **Sweep:** Replay one trace under every legal configuration in a range and rank them by AAT.
//!
//! Configuration starts from the built-in defaults or a JSON file, and single
//! parameters are overridden with the classic `-c -b -s -p -t -m -v` flags.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cachesim_core::common::SimError;
use cachesim_core::config::{SimConfig, TlbParentPolicy};
use cachesim_core::sim::sweep::{self, SweepSpace};
use cachesim_core::sim::trace::{self, TraceRecord};
use cachesim_core::sim::Simulator;

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    version,
    about = "Trace-driven L1 cache / TLB / inverted page table simulator",
    long_about = "Replay a memory trace of `<R|W> 0x<hex>` records through a set-associative L1 cache, optionally virtually indexed and physically tagged behind a TLB and hardware inverted page table.\n\nExamples:\n  cachesim run -c 12 -b 6 -s 2 < traces/gcc.trace\n  cachesim run -v -p 12 -t 4 -m 14 --trace traces/mcf.trace\n  cachesim sweep --vipt --top 10 --trace traces/leela.trace"
)]
struct Cli {
    /// Log filter when RUST_LOG is unset (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Simulate one configuration.
    Run(RunArgs),
    /// Simulate every legal configuration in a range and rank by AAT.
    Sweep(SweepArgs),
}

/// Trace source shared by both subcommands.
#[derive(Args, Debug)]
struct TraceArgs {
    /// Trace file; reads stdin when omitted.
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Skip malformed records instead of failing.
    #[arg(long)]
    lenient: bool,
}

/// Geometry overrides, applied on top of the defaults or `--config`.
#[derive(Args, Debug, Default)]
struct GeometryArgs {
    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Total size for L1 in bytes is 2^C.
    #[arg(short = 'c')]
    c: Option<u32>,

    /// Size of each block for L1 in bytes is 2^B.
    #[arg(short = 'b')]
    b: Option<u32>,

    /// Number of blocks (ways) per set for L1 is 2^S.
    #[arg(short = 's')]
    s: Option<u32>,

    /// Enable virtual memory (VIPT cache).
    #[arg(short = 'v', long = "vipt")]
    vipt: bool,

    /// Total size in bytes for a page is 2^P.
    #[arg(short = 'p')]
    p: Option<u32>,

    /// Number of entries in the TLB is 2^T.
    #[arg(short = 't')]
    t: Option<u32>,

    /// Number of pages in memory is 2^M (same as entries in the HWIVPT).
    #[arg(short = 'm')]
    m: Option<u32>,

    /// Follow TLB-to-HWIVPT links without checking that the HWIVPT slot still maps the page.
    #[arg(long)]
    trust_tlb_parent: bool,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    geometry: GeometryArgs,

    #[command(flatten)]
    input: TraceArgs,

    /// Print the statistics as JSON instead of the text report.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct SweepArgs {
    #[command(flatten)]
    input: TraceArgs,

    /// Sweep VIPT configurations (page, TLB and memory sizes too).
    #[arg(short = 'v', long = "vipt")]
    vipt: bool,

    /// Number of best configurations to print.
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Print the ranked results as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let result = match cli.command {
        Commands::Run(args) => cmd_run(&args),
        Commands::Sweep(args) => cmd_sweep(&args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[!] {e}");
            ExitCode::FAILURE
        }
    }
}

/// Installs the stderr log subscriber; `RUST_LOG` takes precedence over `--log-level`.
fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Builds the configuration: JSON file or defaults, then flag overrides.
fn build_config(args: &GeometryArgs) -> Result<SimConfig, SimError> {
    let mut config = match &args.config {
        Some(path) => SimConfig::from_json_file(path)?,
        None => SimConfig::default(),
    };
    if let Some(c) = args.c {
        config.c = c;
    }
    if let Some(b) = args.b {
        config.b = b;
    }
    if let Some(s) = args.s {
        config.s = s;
    }
    if args.vipt {
        config.vipt = true;
    }
    if let Some(p) = args.p {
        config.p = p;
    }
    if let Some(t) = args.t {
        config.t = t;
    }
    if let Some(m) = args.m {
        config.m = m;
    }
    if args.trust_tlb_parent {
        config.tlb_parent = TlbParentPolicy::Trust;
    }
    Ok(config)
}

/// Reads the whole trace from `--trace` or stdin.
fn load_records(args: &TraceArgs) -> Result<Vec<TraceRecord>, SimError> {
    let strict = !args.lenient;
    let records = match &args.trace {
        Some(path) => {
            let file = File::open(path).map_err(|source| SimError::Io {
                path: path.display().to_string(),
                source,
            })?;
            trace::load_trace(BufReader::new(file), strict)?
        }
        None => trace::load_trace(io::stdin().lock(), strict)?,
    };
    info!(records = records.len(), "trace loaded");
    Ok(records)
}

fn io_error(e: io::Error) -> SimError {
    SimError::Io {
        path: "<stdout>".to_owned(),
        source: e,
    }
}

/// Runs a single configuration and prints settings and statistics.
fn cmd_run(args: &RunArgs) -> Result<(), SimError> {
    let initial = build_config(&args.geometry)?;
    let config = initial.legalize();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if !args.json {
        write_settings(&mut out, &initial, &config).map_err(io_error)?;
    }

    config.validate()?;
    let records = load_records(&args.input)?;
    let stats = Simulator::run(&config, &records);

    if args.json {
        serde_json::to_writer_pretty(&mut out, &stats).map_err(|e| io_error(e.into()))?;
        writeln!(out).map_err(io_error)?;
    } else {
        stats.write_report(&mut out, &config).map_err(io_error)?;
    }
    Ok(())
}

/// Writes the initial settings block and, for VIPT, the legalized one.
fn write_settings<W: Write>(out: &mut W, initial: &SimConfig, legal: &SimConfig) -> io::Result<()> {
    if initial.vipt {
        write!(out, "Initial ")?;
    }
    writeln!(out, "Cache Settings")?;
    writeln!(out, "--------------")?;
    initial.write_settings(out, false)?;
    writeln!(out)?;

    if initial.vipt {
        writeln!(out, "\nLegalized Cache Settings")?;
        writeln!(out, "--------------")?;
        legal.write_settings(out, true)?;
        writeln!(out)?;
    }
    Ok(())
}

/// Sweeps the default space and prints the best configurations.
fn cmd_sweep(args: &SweepArgs) -> Result<(), SimError> {
    let records = load_records(&args.input)?;
    let space = SweepSpace {
        vipt: args.vipt,
        ..SweepSpace::default()
    };
    let configs = sweep::enumerate(&space, &SimConfig::default());
    info!(configs = configs.len(), "sweeping");
    let results = sweep::run(&records, &configs);
    let best = &results[..args.top.min(results.len())];

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, best).map_err(|e| io_error(e.into()))?;
        writeln!(out).map_err(io_error)?;
        return Ok(());
    }

    writeln!(out, "Top {} of {} configurations", best.len(), results.len()).map_err(io_error)?;
    for (rank, result) in best.iter().enumerate() {
        let c = &result.config;
        let line = if c.vipt {
            writeln!(
                out,
                "{:>3}. AAT {:>8.3}  C={} B={} S={} P={} T={} M={}",
                rank + 1,
                result.stats.avg_access_time,
                c.c,
                c.b,
                c.s,
                c.p,
                c.t,
                c.m
            )
        } else {
            writeln!(
                out,
                "{:>3}. AAT {:>8.3}  C={} B={} S={}",
                rank + 1,
                result.stats.avg_access_time,
                c.c,
                c.b,
                c.s
            )
        };
        line.map_err(io_error)?;
    }
    Ok(())
}
