use std::path::Path;

use notewidget_core::sync::WakeSignal;
use notewidget_core::SyncTrigger;

use crate::commands::common::{open_worker, print_report};
use crate::error::CliError;

pub async fn run_wake(payload: &str, data_dir: &Path) -> Result<(), CliError> {
    let signal = WakeSignal::parse(payload)?;
    if !signal.is_relevant() {
        tracing::debug!(event = %signal.event, "Ignoring unrelated wake-up");
        println!("Ignored wake-up event '{}'", signal.event);
        return Ok(());
    }

    let (worker, config) = open_worker(data_dir).await?;
    let report = worker
        .run_pass_with_retry(SyncTrigger::Wake(signal), &config.retry)
        .await?;
    print_report(&report, false)
}
