use crate::neighbor::Resolver;
use crate::probe::Prober;
use crate::range::HostRange;
use crate::types::{ScanResult, SweepSummary};
use crate::vendors::VendorDb;
use ::time::{format_description::well_known, OffsetDateTime};
use anyhow::Result;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinSet;

/// Default per-batch concurrency cap. Each probe/resolve pair spawns external
/// OS processes, so the cap also bounds child-process and fd usage.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Sweep the range: probe every usable host with bounded concurrency,
/// resolve reachable hosts' hardware addresses, attribute the vendor, and
/// emit one `ScanResult` per reachable host on `results_tx` as it completes.
///
/// Hosts are processed in fixed-size batches; all probes of one batch run
/// concurrently and the batch is awaited jointly before the next begins, so
/// at most `batch_size` tasks are ever in flight. Results within a batch
/// arrive in completion order. A single host's probe or resolve failure is
/// isolated to that host and never aborts the sweep.
pub async fn run_sweep(
    range: &HostRange,
    prober: Arc<dyn Prober>,
    resolver: Arc<dyn Resolver>,
    vendors: Arc<VendorDb>,
    batch_size: usize,
    results_tx: UnboundedSender<ScanResult>,
) -> Result<SweepSummary> {
    let batch_size = batch_size.max(1);
    let mut summary = SweepSummary::default();

    let mut batch: Vec<Ipv4Addr> = Vec::with_capacity(batch_size);
    for ip in range.hosts() {
        batch.push(ip);
        if batch.len() == batch_size {
            run_batch(&batch, &prober, &resolver, &vendors, &results_tx, &mut summary).await;
            batch.clear();
        }
    }
    if !batch.is_empty() {
        run_batch(&batch, &prober, &resolver, &vendors, &results_tx, &mut summary).await;
    }

    Ok(summary)
}

async fn run_batch(
    batch: &[Ipv4Addr],
    prober: &Arc<dyn Prober>,
    resolver: &Arc<dyn Resolver>,
    vendors: &Arc<VendorDb>,
    results_tx: &UnboundedSender<ScanResult>,
    summary: &mut SweepSummary,
) {
    let mut set = JoinSet::new();
    for &ip in batch {
        let prober = prober.clone();
        let resolver = resolver.clone();
        let vendors = vendors.clone();
        let tx = results_tx.clone();

        set.spawn(async move {
            if !prober.is_up(ip).await {
                return None;
            }
            // Still inside this batch's concurrent window: resolve and
            // attribute immediately while the neighbor entry is fresh.
            let mac = resolver.resolve(ip).await;
            let vendor = vendors.lookup(&mac).to_string();
            let entry = ScanResult {
                ip,
                mac,
                vendor,
                timestamp: now_rfc3339(),
            };
            // The receiver may already be gone; the entry still counts.
            let _ = tx.send(entry.clone());
            Some(entry)
        });
    }

    while let Some(joined) = set.join_next().await {
        summary.probed += 1;
        // A panicked task counts as probed but yields no entry.
        if let Ok(Some(entry)) = joined {
            summary.hosts_up += 1;
            summary.entries.push(entry);
        }
    }
}

fn now_rfc3339() -> String {
    let now = OffsetDateTime::now_utc();
    now.format(&well_known::Rfc3339)
        .unwrap_or_else(|_| String::from("1970-01-01T00:00:00Z"))
}
