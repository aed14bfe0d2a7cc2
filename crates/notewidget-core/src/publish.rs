//! Fan-out of one rendered view model to every surface instance

use std::collections::BTreeSet;

use crate::error::PublishError;
use crate::host::SurfaceHost;
use crate::models::{InstanceId, WidgetViewModel};

/// Outcome of a publish step. Failures are per instance and never fatal.
#[derive(Debug, Default)]
pub struct PublishReport {
    pub delivered: Vec<InstanceId>,
    pub failed: Vec<PublishError>,
}

impl PublishReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Pushes the same view model to every instance in one pass.
pub struct SurfacePublisher<S> {
    host: S,
}

impl<S: SurfaceHost> SurfacePublisher<S> {
    pub const fn new(host: S) -> Self {
        Self { host }
    }

    pub const fn host(&self) -> &S {
        &self.host
    }

    /// Publish to every instance the host currently knows about.
    pub async fn publish_all(&self, view_model: &WidgetViewModel) -> PublishReport {
        let instances = self.host.list_active_instance_ids().await;
        self.publish(view_model, &instances).await
    }

    /// Publish to the given instances; a failing instance is logged and the
    /// rest still get the render.
    pub async fn publish(
        &self,
        view_model: &WidgetViewModel,
        instances: &BTreeSet<InstanceId>,
    ) -> PublishReport {
        let mut report = PublishReport::default();
        if instances.is_empty() {
            tracing::debug!("No active widget instances to publish to");
            return report;
        }

        for &instance in instances {
            match self.host.render(instance, view_model).await {
                Ok(()) => report.delivered.push(instance),
                Err(error) => {
                    tracing::warn!("Failed to publish widget: {}", error);
                    report.failed.push(error);
                }
            }
        }

        tracing::debug!(
            delivered = report.delivered.len(),
            failed = report.failed.len(),
            "Published widget view model"
        );
        report
    }
}
