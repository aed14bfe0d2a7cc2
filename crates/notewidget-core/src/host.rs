//! Contracts the core consumes from its host platform.
//!
//! The core hands these traits finished values (a view model, a notification
//! event) and never decides how a platform paints or posts them.

use std::collections::BTreeSet;

use crate::error::{NotificationError, PublishError};
use crate::models::{InstanceId, NotificationEvent, WidgetViewModel};

/// The widget surface host. Repaints on its own schedule.
#[allow(async_fn_in_trait)]
pub trait SurfaceHost {
    /// Instances currently placed by the user.
    async fn list_active_instance_ids(&self) -> BTreeSet<InstanceId>;

    /// Hand one instance its new view model.
    async fn render(
        &self,
        instance: InstanceId,
        view_model: &WidgetViewModel,
    ) -> Result<(), PublishError>;
}

/// Platform facility that shows user-visible notifications.
#[allow(async_fn_in_trait)]
pub trait NotificationSink {
    async fn post(&self, event: &NotificationEvent) -> Result<(), NotificationError>;
}
