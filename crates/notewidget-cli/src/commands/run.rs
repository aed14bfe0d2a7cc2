use std::path::Path;

use notewidget_core::schedule::{PeriodicRegistration, ScheduleRegistry, WIDGET_SYNC_KEY};
use notewidget_core::SyncTrigger;
use tokio::time::{interval, MissedTickBehavior};

use crate::commands::common::{open_worker, print_report};
use crate::error::CliError;

/// Play the host's periodic facility: one pass per interval until Ctrl-C.
///
/// A pass that keeps failing after its retries is logged and the loop waits
/// for the next tick.
pub async fn run_periodic(data_dir: &Path) -> Result<(), CliError> {
    let (worker, config) = open_worker(data_dir).await?;

    let mut registry = ScheduleRegistry::new();
    let registration =
        PeriodicRegistration::new(WIDGET_SYNC_KEY, config.sync_interval_minutes())?;
    let period = registration.interval;
    let outcome = registry.register_periodic(registration);
    tracing::info!(
        key = WIDGET_SYNC_KEY,
        minutes = config.sync_interval_minutes(),
        ?outcome,
        "Registered periodic widget sync"
    );

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match worker.run_pass_with_retry(SyncTrigger::Periodic, &config.retry).await {
                    Ok(report) => print_report(&report, false)?,
                    Err(error) => {
                        tracing::error!("Periodic sync pass failed, waiting for next tick: {}", error);
                    }
                }
            }
            result = tokio::signal::ctrl_c() => {
                result?;
                registry.cancel(WIDGET_SYNC_KEY);
                tracing::info!("Stopping periodic widget sync");
                return Ok(());
            }
        }
    }
}
