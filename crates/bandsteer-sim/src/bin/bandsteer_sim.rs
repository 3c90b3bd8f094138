//! # Band Steering Simulator
//!
//! Runs a scenario file through the band-steering engine and reports every
//! BSS transition request it would have sent.
//!
//! ## Usage
//!
//! ```bash
//! # Log requests as they happen
//! bandsteer-sim --scenario scenarios/dual_band.toml
//!
//! # Override seed and length, print a JSON report
//! bandsteer-sim --scenario scenarios/tri_band.toml --seed 9 --ticks 600 --json
//!
//! # Per-station detail
//! RUST_LOG=bandsteer=debug bandsteer-sim --scenario scenarios/dual_band.toml
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use bandsteer_sim::{Scenario, Simulation};

#[derive(Parser, Debug)]
#[command(name = "bandsteer-sim", about = "Simulate 802.11v band steering decisions")]
struct Args {
    /// Scenario TOML file.
    #[arg(short, long)]
    scenario: PathBuf,

    /// Override the scenario's tick count.
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Override the scenario's RNG seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Print the full report as JSON on stdout.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    // ── Logging ─────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let args = Args::parse();

    // ── Scenario ────────────────────────────────────────────────
    let input = std::fs::read_to_string(&args.scenario)
        .with_context(|| format!("reading {}", args.scenario.display()))?;
    let mut scenario = Scenario::from_toml_str(&input)
        .with_context(|| format!("loading {}", args.scenario.display()))?;
    if let Some(ticks) = args.ticks {
        scenario.ticks = ticks;
    }
    if let Some(seed) = args.seed {
        scenario.seed = seed;
    }

    tracing::info!(
        scenario = %args.scenario.display(),
        seed = scenario.seed,
        ticks = scenario.ticks,
        nodes = scenario.nodes.len(),
        stations = scenario.walks.len(),
        steering_interval_ms = scenario.config.steering_interval,
        tick_interval_ms = scenario.config.tick_interval,
        "bandsteer-sim starting"
    );

    // ── Run ─────────────────────────────────────────────────────
    let report = Simulation::new(scenario).run()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for sent in &report.requests {
            println!(
                "t={:>7}ms {} via {}: imminent={} timer={} validity={}",
                sent.now_ms,
                sent.request.station,
                sent.node_name,
                sent.request.disassoc_imminent,
                sent.request.disassoc_timer,
                sent.request.validity_period,
            );
        }
        for node in &report.nodes {
            println!("{} ({}): {} stations", node.name, node.band, node.stations.len());
        }
    }

    Ok(())
}
