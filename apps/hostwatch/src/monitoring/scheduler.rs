use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use super::checker::Prober;
use super::types::{ProbeOutcome, ProbeResult};
use crate::chat::ChatError;
use crate::notifier::Notifier;
use crate::registry::Registry;
use crate::targets::TargetSet;

/// Pause between the end of one sweep and the start of the next.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Probes every registered host in order, then waits, forever.
pub struct CheckLoop {
    registry: Arc<Registry>,
    prober: Arc<dyn Prober>,
    notifier: Notifier,
    interval: Duration,
    sweeps: AtomicU64,
}

impl CheckLoop {
    pub fn new(registry: Arc<Registry>, prober: Arc<dyn Prober>, notifier: Notifier) -> Self {
        Self { registry, prober, notifier, interval: SWEEP_INTERVAL, sweeps: AtomicU64::new(0) }
    }

    /// Run a single sweep: probe each host sequentially and notify its
    /// channel of the outcome.
    ///
    /// A failed probe is reported and the sweep moves on; only a delivery
    /// error from the notifier stops it.
    pub async fn sweep(&self) -> Result<Vec<ProbeResult>, ChatError> {
        let sweep = self.sweeps.fetch_add(1, Ordering::Relaxed) + 1;
        let mut results = Vec::with_capacity(self.registry.len());

        for entry in self.registry.iter() {
            let outcome = self.prober.probe(&entry.address).await;
            match &outcome {
                ProbeOutcome::Success { round_trip_ms } => {
                    info!(sweep, host = %entry.id, address = %entry.address, round_trip_ms, "Host reachable");
                }
                ProbeOutcome::Failure { status } => {
                    warn!(sweep, host = %entry.id, address = %entry.address, %status, "Host unreachable");
                }
            }

            let result = ProbeResult::new(entry, outcome);
            self.notifier.notify(&result.message(), TargetSet::only(entry.id)).await?;
            results.push(result);
        }

        Ok(results)
    }

    /// Sweep, wait [`SWEEP_INTERVAL`], repeat until `shutdown` resolves.
    ///
    /// The wait starts after the sweep finishes, so probe latency pushes every
    /// following sweep back.
    pub async fn run<F>(&self, shutdown: F) -> Result<(), ChatError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping check loop");
                    return Ok(());
                }
                cycle = self.cycle() => cycle?,
            }
        }
    }

    async fn cycle(&self) -> Result<(), ChatError> {
        self.sweep().await?;
        sleep(self.interval).await;
        Ok(())
    }
}
