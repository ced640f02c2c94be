//! Breadboard - Circuit Analyzer
//!
//! Loads a board snapshot, runs one analysis pass, and prints the result.
//!
//! # Usage
//!
//! ```bash
//! breadboard board.json
//! breadboard board.json --json
//! ```

use std::path::PathBuf;

use clap::Parser;
use breadboard_core::{
    error::Result,
    snapshot,
    CircuitStatus,
};

/// Breadboard circuit analyzer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the board snapshot file (.json)
    #[arg(value_name = "SNAPSHOT_FILE")]
    snapshot_file: PathBuf,

    /// Emit the analysis record as JSON instead of a report
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut board = snapshot::load(&args.snapshot_file)?;
    let analysis = board.analyze();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!("Status:     {} ({})", analysis.status, analysis.status_detail);
    println!("Type:       {}", analysis.circuit_type);
    println!(
        "Active:     {}/{} components, {}/{} wires",
        analysis.active_component_count,
        analysis.component_count,
        analysis.active_wire_count,
        analysis.wire_count
    );
    println!("Voltage:    {:.3} V", analysis.total_voltage);
    println!("Current:    {:.4} A", analysis.total_current);
    println!("Resistance: {:.2} Ω", analysis.total_resistance);
    println!("Power:      {:.3} W", analysis.total_power);
    println!("Path:       {}", analysis.path_description);

    if analysis.status == CircuitStatus::Closed {
        println!();
        println!("Components:");
        for component in board.components() {
            if !component.active {
                continue;
            }
            println!(
                "  {:<14} {:>8.4} A {:>8.3} V {:>8.3} W",
                component.code_label,
                component.metrics.current,
                component.metrics.voltage,
                component.metrics.power
            );
        }
    }

    if !analysis.issues.is_empty() {
        println!();
        println!("Issues:");
        for issue in &analysis.issues {
            println!("  - {issue}");
        }
    }

    Ok(())
}
