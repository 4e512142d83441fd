//! `lifeline watch` — Run the heartbeat loop.

use super::{CycleSetup, SourceArgs};
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

pub async fn run(source: SourceArgs, cycles: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let setup = CycleSetup::load(source)?;
    let period = Duration::from_secs(setup.config.heartbeat.interval_seconds);

    info!(
        interval_secs = period.as_secs(),
        account = setup.account.as_deref().unwrap_or("none"),
        "Heartbeat started"
    );

    heartbeat(&setup, period, cycles, ctrl_c()).await;
    Ok(())
}

/// Resolves on Ctrl-C. If the handler cannot be installed, never resolves.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Cannot listen for Ctrl-C; stop the heartbeat with --cycles");
        std::future::pending::<()>().await;
    }
}

/// Run cycles every `period` until `cycles` are done or `shutdown` resolves.
///
/// `shutdown` is polled for the whole run, including while a cycle is being
/// assembled, so a signal is never dropped between ticks. A cycle that
/// overruns its period delays the next tick instead of triggering catch-up
/// cycles. Returns the number of completed cycles.
pub(crate) async fn heartbeat<F>(setup: &CycleSetup, period: Duration, cycles: Option<u64>, shutdown: F) -> u64
where
    F: Future<Output = ()>,
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let mut completed = 0u64;
    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = &mut shutdown => {
                info!(completed, "Heartbeat stopped by signal");
                break;
            }
        }

        let ctx = tokio::select! {
            ctx = setup.next_cycle() => ctx,
            _ = &mut shutdown => {
                info!(completed, "Heartbeat stopped by signal, cycle in progress abandoned");
                break;
            }
        };

        let summary = ctx.summary();
        info!(
            cycle_id = %summary.cycle_id,
            currency_balance = summary.currency_balance,
            credit_balance = summary.credit_balance,
            tier = %summary.survival_tier,
            low_compute = ctx.is_low_compute(),
            "Heartbeat tick"
        );

        completed += 1;
        if cycles.is_some_and(|limit| completed >= limit) {
            info!(completed, "Heartbeat finished requested cycles");
            break;
        }
    }

    completed
}
