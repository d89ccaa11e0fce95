use std::{fmt::Write, path::PathBuf, time::Instant};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use vm::{
    simulation::{Policy, SimulationConfig, Simulator, Strictness},
    stats::{CostModel, RunStatistics},
    trace::TraceFile,
};

#[derive(Parser)]
#[command(author, version, about = "Replays a memory reference trace against page replacement policies")]
struct Cli {
    /// Trace file, one `<hex-address> <R|W>` reference per line
    trace: PathBuf,

    /// Physical frame counts to simulate
    #[arg(short, long, value_delimiter = ',', default_values_t = [10, 50, 100])]
    frames: Vec<usize>,

    /// Replacement policies to simulate (fifo, lru, lfu, clock, opt)
    #[arg(short, long, value_delimiter = ',', default_values_t = Policy::ALL)]
    policies: Vec<Policy>,

    /// Fail on the first malformed trace line instead of skipping it
    #[arg(long)]
    strict: bool,

    /// Memory access time in nanoseconds
    #[arg(long, default_value_t = CostModel::DEFAULT_MEMORY_ACCESS_TIME)]
    memory_access_time: f64,

    /// Page fault service time in nanoseconds
    #[arg(long, default_value_t = CostModel::DEFAULT_PAGE_FAULT_SERVICE_TIME)]
    fault_service_time: f64,
}

impl Cli {
    fn config(&self) -> SimulationConfig {
        SimulationConfig {
            frame_counts: self.frames.clone(),
            policies: self.policies.clone(),
            cost_model: CostModel {
                memory_access_time: self.memory_access_time,
                page_fault_service_time: self.fault_service_time,
            },
            strictness: if self.strict { Strictness::Strict } else { Strictness::Lenient },
        }
    }
}

const HOTTEST_PAGES: usize = 5;

fn run_report(stats: &RunStatistics) -> Result<String> {
    let mut out = String::new();

    writeln!(out, "{} frames, policy {}", stats.frame_count, stats.policy)?;
    writeln!(out, "  Accesses:     {} ({} R / {} W)", stats.total_accesses, stats.reads, stats.writes)?;
    writeln!(out, "  Hits:         {} ({:.2}%)", stats.hits, stats.hit_rate() * 100.0)?;
    writeln!(out, "  Page faults:  {} ({:.2}%)", stats.page_faults, stats.fault_rate() * 100.0)?;
    writeln!(out, "  Replacements: {}", stats.replacements)?;
    writeln!(out, "  Disk writes:  {}", stats.disk_writes)?;
    writeln!(out, "  Unique pages: {}", stats.unique_pages_touched())?;

    let hottest = stats.hottest_pages(HOTTEST_PAGES);
    if !hottest.is_empty() {
        let pages: Vec<String> = hottest
            .iter()
            .map(|(page, count)| format!("{:#x} ({})", page, count))
            .collect();
        writeln!(out, "  Hottest:      {}", pages.join(", "))?;
    }

    writeln!(out, "  EAT:          {:.2} ns", stats.eat())?;
    writeln!(out, "  Elapsed:      {:.2?}", stats.elapsed)?;

    if !stats.prescan.is_zero() {
        writeln!(out, "  OPT pre-scan: {:.2?}", stats.prescan)?;
    }

    Ok(out)
}

fn print_summary(results: &[RunStatistics]) {
    println!("\nSUMMARY");
    println!("{}", "=".repeat(84));
    println!(
        "{:>6} | {:<6} | {:>11} | {:>12} | {:>11} | {:>14} | {:>9}",
        "Frames", "Policy", "Page faults", "Replacements", "Disk writes", "EAT (ns)", "Time (s)"
    );
    println!("{}", "-".repeat(84));

    for stats in results {
        println!(
            "{:>6} | {:<6} | {:>11} | {:>12} | {:>11} | {:>14.2} | {:>9.2}",
            stats.frame_count,
            stats.policy,
            stats.page_faults,
            stats.replacements,
            stats.disk_writes,
            stats.eat(),
            (stats.elapsed + stats.prescan).as_secs_f64()
        );
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let trace = TraceFile::new(&cli.trace);

    let mut simulator = Simulator::new(trace, cli.config())
        .with_context(|| format!("Cannot simulate trace {}", cli.trace.display()))?;

    println!("Processing {} ({} lines)", cli.trace.display(), simulator.line_count());

    info!(
        "trace-sim: {} frame counts x {} policies",
        cli.frames.len(),
        cli.policies.len()
    );

    let start = Instant::now();
    let results = simulator.run_all().context("Simulation failed")?;

    info!("trace-sim: {} runs finished in {:.2?}", results.len(), start.elapsed());

    for stats in &results {
        println!("\n{}", run_report(stats)?.trim_end());
    }

    print_summary(&results);

    Ok(())
}
