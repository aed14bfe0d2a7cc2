use std::path::Path;

use notewidget_core::db::{FreshnessStore, LibSqlFreshnessStore, LibSqlViewCache, ViewCache};
use notewidget_core::{InstanceId, NotificationEvent, SyncState, WidgetViewModel};
use serde::Serialize;

use crate::commands::common::{format_timestamp, open_database};
use crate::error::CliError;
use crate::host::{FileSurfaceHost, JournalNotificationSink};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateItem {
    pub state: SyncState,
    pub cached_view_model: Option<WidgetViewModel>,
    pub instances: Vec<InstanceId>,
    pub last_notification: Option<NotificationEvent>,
}

pub async fn load_state(data_dir: &Path) -> Result<StateItem, CliError> {
    let db = open_database(data_dir).await?;
    let state = LibSqlFreshnessStore::new(db.connection()).load().await?;
    let cached_view_model = LibSqlViewCache::new(db.connection()).load().await?;
    let instances = FileSurfaceHost::new(data_dir)
        .load_instances()?
        .into_iter()
        .collect();
    let last_notification = JournalNotificationSink::new(data_dir).read_events()?.pop();
    Ok(StateItem {
        state,
        cached_view_model,
        instances,
        last_notification,
    })
}

pub fn format_state_lines(item: &StateItem) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Last widget update:  {}",
            format_timestamp(item.state.last_widget_timestamp)
        ),
        format!(
            "Last updates notice: {}",
            format_timestamp(item.state.last_updates_timestamp)
        ),
    ];
    match &item.cached_view_model {
        Some(model) => {
            lines.push(format!("Cached text: {}", model.text));
            if let Some(uri) = &model.image_uri {
                lines.push(format!("Cached image: {uri}"));
            }
        }
        None => lines.push("Cached text: (none)".to_string()),
    }
    lines.push(format!("Instances: {}", item.instances.len()));
    if let Some(event) = &item.last_notification {
        lines.push(format!("Last notification: {}", event.body));
    }
    lines
}

pub async fn run_state(data_dir: &Path, as_json: bool) -> Result<(), CliError> {
    let item = load_state(data_dir).await?;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&item)?);
    } else {
        for line in format_state_lines(&item) {
            println!("{line}");
        }
    }
    Ok(())
}
