use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use lan_sweep_rs::neighbor::ArpResolver;
use lan_sweep_rs::probe::PingProber;
use lan_sweep_rs::range::HostRange;
use lan_sweep_rs::sweep::{self, DEFAULT_BATCH_SIZE};
use lan_sweep_rs::types::SweepSummary;
use lan_sweep_rs::vendors::VendorDb;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;

/// lan-sweep-rs — Async LAN host discovery sweep with MAC vendor attribution.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "lan-sweep-rs",
    version,
    about = "Async LAN host discovery sweep with MAC vendor attribution.",
    long_about = None
)]
struct Cli {
    /// Target network in CIDR notation (e.g., 192.168.1.0/24). Prefix defaults to /24.
    cidr: String,

    /// Path to the vendor prefix table (nmap-mac-prefixes format).
    #[arg(long, default_value = "oui.txt")]
    oui: PathBuf,

    /// Hosts probed concurrently per batch.
    #[arg(long = "batch-size", default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Write the sweep summary as pretty JSON to this path (optional).
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Two-phase startup: parse the range and load the vendor table to
    // completion before any scanning. Either failure is fatal here, and only
    // here — helpers report errors, main decides to exit.
    let range = HostRange::parse(&cli.cidr)
        .with_context(|| format!("invalid CIDR argument: {}", cli.cidr))?;
    let vendors = Arc::new(VendorDb::load_from_path(&cli.oui)?);
    if vendors.is_empty() {
        eprintln!(
            "Warning: vendor table {} has no entries; all vendors will be Unknown",
            cli.oui.display()
        );
    }

    println!("Scanning {} addresses in {}...", range.host_count(), range);
    println!("IP Address\tMAC Address\t\tManufacturer");

    let (tx, mut rx) = mpsc::unbounded_channel::<lan_sweep_rs::types::ScanResult>();
    let printer = tokio::spawn(async move {
        while let Some(entry) = rx.recv().await {
            println!("{}\t{}\t{}", entry.ip, entry.mac, entry.vendor);
        }
    });

    let summary = sweep::run_sweep(
        &range,
        Arc::new(PingProber),
        Arc::new(ArpResolver::native()),
        vendors,
        cli.batch_size,
        tx,
    )
    .await?;

    printer.await?;
    println!(
        "\nHosts up: {} (probed: {})",
        summary.hosts_up, summary.probed
    );

    if let Some(path) = cli.output.as_deref() {
        if let Err(e) = write_summary_json(path, &summary) {
            eprintln!("Failed to write JSON to {}: {}", path.display(), e);
        } else {
            println!("Wrote JSON summary to {}", path.display());
        }
    }

    Ok(())
}

fn write_summary_json(path: &std::path::Path, summary: &SweepSummary) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, summary)?;
    Ok(())
}
