//! Filesystem-backed stand-ins for the platform facilities.
//!
//! Layout under the data directory:
//! - `instances.json`: sorted array of active instance ids
//! - `surfaces/<id>.json`: last view model handed to each instance
//! - `notifications.jsonl`: one posted notification event per line

use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use notewidget_core::host::{NotificationSink, SurfaceHost};
use notewidget_core::{InstanceId, NotificationError, NotificationEvent, PublishError, WidgetViewModel};

use crate::error::CliError;

const INSTANCES_FILE: &str = "instances.json";
const SURFACES_DIR: &str = "surfaces";
const NOTIFICATIONS_FILE: &str = "notifications.jsonl";

/// Surface host that keeps each instance's render as a JSON file.
#[derive(Debug, Clone)]
pub struct FileSurfaceHost {
    root: PathBuf,
}

impl FileSurfaceHost {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn surface_path(&self, instance: InstanceId) -> PathBuf {
        self.root
            .join(SURFACES_DIR)
            .join(format!("{}.json", instance.get()))
    }

    pub fn load_instances(&self) -> Result<BTreeSet<InstanceId>, CliError> {
        let path = self.root.join(INSTANCES_FILE);
        match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeSet::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(BTreeSet::new()),
            Err(error) => Err(error.into()),
        }
    }

    /// Returns `false` when the instance was already placed.
    pub fn add_instance(&self, instance: InstanceId) -> Result<bool, CliError> {
        let mut instances = self.load_instances()?;
        if !instances.insert(instance) {
            return Ok(false);
        }
        self.save_instances(&instances)?;
        Ok(true)
    }

    /// Removes the instance and its rendered surface. Returns `false` when it
    /// was not placed.
    pub fn remove_instance(&self, instance: InstanceId) -> Result<bool, CliError> {
        let mut instances = self.load_instances()?;
        if !instances.remove(&instance) {
            return Ok(false);
        }
        self.save_instances(&instances)?;
        match fs::remove_file(self.surface_path(instance)) {
            Ok(()) => {}
            Err(error) if error.kind() == io::ErrorKind::NotFound => {}
            Err(error) => return Err(error.into()),
        }
        Ok(true)
    }

    /// Last view model rendered into `instance`, if any.
    pub fn read_surface(&self, instance: InstanceId) -> Result<Option<WidgetViewModel>, CliError> {
        match fs::read_to_string(self.surface_path(instance)) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn save_instances(&self, instances: &BTreeSet<InstanceId>) -> Result<(), CliError> {
        let raw = serde_json::to_string_pretty(instances)?;
        write_atomically(&self.root.join(INSTANCES_FILE), raw.as_bytes())?;
        Ok(())
    }
}

impl SurfaceHost for FileSurfaceHost {
    async fn list_active_instance_ids(&self) -> BTreeSet<InstanceId> {
        match self.load_instances() {
            Ok(instances) => instances,
            Err(error) => {
                tracing::warn!("Could not read widget instances, publishing to none: {}", error);
                BTreeSet::new()
            }
        }
    }

    async fn render(
        &self,
        instance: InstanceId,
        view_model: &WidgetViewModel,
    ) -> Result<(), PublishError> {
        let raw = serde_json::to_vec_pretty(view_model)
            .map_err(|error| PublishError::new(instance, error.to_string()))?;
        write_atomically(&self.surface_path(instance), &raw)
            .map_err(|error| PublishError::new(instance, error.to_string()))
    }
}

/// Writes through a sibling temp file so a reader never sees a half-written
/// surface.
fn write_atomically(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)
}

/// Notification sink that prints each event and appends it to a journal.
#[derive(Debug, Clone)]
pub struct JournalNotificationSink {
    path: PathBuf,
}

impl JournalNotificationSink {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            path: root.as_ref().join(NOTIFICATIONS_FILE),
        }
    }

    pub fn read_events(&self) -> Result<Vec<NotificationEvent>, CliError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        };
        raw.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(CliError::from))
            .collect()
    }

    fn append(&self, event: &NotificationEvent) -> Result<(), CliError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let line = serde_json::to_string(event)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}

impl NotificationSink for JournalNotificationSink {
    async fn post(&self, event: &NotificationEvent) -> Result<(), NotificationError> {
        self.append(event)
            .map_err(|error| NotificationError::new(event.channel_id.clone(), error.to_string()))?;
        println!("[{}] {}", event.title, event.body);
        Ok(())
    }
}
