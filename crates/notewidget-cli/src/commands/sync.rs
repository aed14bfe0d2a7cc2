use std::path::Path;

use notewidget_core::SyncTrigger;

use crate::commands::common::{open_worker, print_report};
use crate::error::CliError;

pub async fn run_sync(data_dir: &Path, as_json: bool) -> Result<(), CliError> {
    let (worker, config) = open_worker(data_dir).await?;
    let report = worker
        .run_pass_with_retry(SyncTrigger::OnDemand, &config.retry)
        .await?;
    print_report(&report, as_json)
}
