use std::env;
use std::path::{Path, PathBuf};

use chrono::DateTime;
use notewidget_core::config::WorkerConfig;
use notewidget_core::db::Database;
use notewidget_core::fetch::HttpDocumentFetcher;
use notewidget_core::publish::PublishReport;
use notewidget_core::render::ViewModelRenderer;
use notewidget_core::sync::StreamOutcome;
use notewidget_core::{
    InstanceId, NotificationEvent, PassReport, PassStatus, SyncState, SyncWorker, WidgetViewModel,
};
use serde::Serialize;

use crate::error::CliError;
use crate::host::{FileSurfaceHost, JournalNotificationSink};

pub const ENV_DATA_DIR: &str = "NOTEWIDGET_DATA_DIR";
const DATABASE_FILE: &str = "sync.db";

pub type CliWorker = SyncWorker<HttpDocumentFetcher, FileSurfaceHost, JournalNotificationSink>;

#[derive(Debug, Serialize)]
pub struct PassReportItem {
    pub trigger: String,
    pub status: &'static str,
    pub widget: String,
    pub updates: String,
    pub notification: Option<NotificationEvent>,
    pub view_model: Option<WidgetViewModel>,
    pub delivered: Vec<InstanceId>,
    pub failed: Vec<String>,
    pub state: SyncState,
}

pub fn resolve_data_dir(cli_data_dir: Option<PathBuf>) -> Result<PathBuf, CliError> {
    cli_data_dir
        .or_else(|| env::var_os(ENV_DATA_DIR).map(PathBuf::from))
        .or_else(default_data_dir)
        .ok_or(CliError::NoDataDir)
}

pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("notewidget"))
}

pub async fn open_database(data_dir: &Path) -> Result<Database, CliError> {
    Ok(Database::open(data_dir.join(DATABASE_FILE)).await?)
}

/// Wire a worker against the remote from the environment and the
/// filesystem host under `data_dir`.
pub async fn open_worker(data_dir: &Path) -> Result<(CliWorker, WorkerConfig), CliError> {
    let config = WorkerConfig::from_env()?;
    let db = open_database(data_dir).await?;
    let fetcher = HttpDocumentFetcher::new(&config.remote)?;
    let worker = SyncWorker::new(
        db,
        fetcher,
        ViewModelRenderer::new(config.theme),
        FileSurfaceHost::new(data_dir),
        JournalNotificationSink::new(data_dir),
    );
    Ok((worker, config))
}

pub const fn status_label(status: PassStatus) -> &'static str {
    match status {
        PassStatus::Success => "success",
        PassStatus::PartialSuccess => "partial",
        PassStatus::Skipped => "skipped",
    }
}

pub fn describe_outcome(outcome: &StreamOutcome) -> String {
    match outcome {
        StreamOutcome::Applied { timestamp } => format!("applied {timestamp}"),
        StreamOutcome::Skipped { fetched, stored } => {
            format!("unchanged (fetched {fetched}, stored {stored})")
        }
        StreamOutcome::FetchFailed(error) => format!("fetch failed: {error}"),
        StreamOutcome::NotificationFailed(error) => format!("notification failed: {error}"),
        StreamOutcome::NotRun => "not run".to_string(),
    }
}

pub fn report_to_item(report: &PassReport) -> PassReportItem {
    PassReportItem {
        trigger: report.trigger.to_string(),
        status: status_label(report.status()),
        widget: describe_outcome(&report.widget),
        updates: describe_outcome(&report.updates),
        notification: report.notification.clone(),
        view_model: report.view_model.clone(),
        delivered: report.publish.delivered.clone(),
        failed: publish_failures(&report.publish),
        state: report.state,
    }
}

fn publish_failures(publish: &PublishReport) -> Vec<String> {
    publish.failed.iter().map(ToString::to_string).collect()
}

pub fn format_report_lines(report: &PassReport) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Sync pass ({}): {}",
            report.trigger,
            status_label(report.status())
        ),
        format!("  widget:  {}", describe_outcome(&report.widget)),
        format!("  updates: {}", describe_outcome(&report.updates)),
    ];
    if let Some(event) = &report.notification {
        lines.push(format!("  notified: {}", event.body));
    }
    if report.view_model.is_some() {
        lines.push(format!(
            "  published to {} instance(s), {} failed",
            report.publish.delivered.len(),
            report.publish.failed.len()
        ));
    }
    lines
}

/// Stored timestamps are epoch milliseconds; zero means nothing applied yet.
pub fn format_timestamp(timestamp: i64) -> String {
    if timestamp <= 0 {
        return "never".to_string();
    }
    DateTime::from_timestamp_millis(timestamp).map_or_else(
        || timestamp.to_string(),
        |datetime| format!("{timestamp} ({})", datetime.to_rfc3339()),
    )
}

pub fn print_report(report: &PassReport, as_json: bool) -> Result<(), CliError> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(&report_to_item(report))?);
    } else {
        for line in format_report_lines(report) {
            println!("{line}");
        }
    }
    Ok(())
}
