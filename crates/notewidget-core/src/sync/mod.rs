//! Background sync worker.
//!
//! One pass: fetch `widget` and `updates` concurrently, decide freshness per
//! stream against the stored timestamps, post a notification for a newer
//! `updates` document, render the widget (falling back to the cached view
//! model when the fetch failed), publish to every instance, and only then
//! persist timestamps. Passes never overlap, within a worker or across
//! workers sharing one database file: a trigger that arrives while a pass is
//! running is dropped and reported as [`PassStatus::Skipped`].

mod report;
mod trigger;


use std::time::Duration;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::db::{
    Database, FreshnessStore, LibSqlFreshnessStore, LibSqlPassLease, LibSqlViewCache, PassLease,
    ViewCache,
};
use crate::decide::{decide, Decision};
use crate::error::{FetchError, Result};
use crate::fetch::DocumentFetcher;
use crate::host::{NotificationSink, SurfaceHost};
use crate::models::{
    InstanceId, RemoteDocument, StreamId, SyncState, UpdatesDocument, WidgetDocument,
    WidgetViewModel,
};
use crate::notify::NotificationDispatcher;
use crate::publish::SurfacePublisher;
use crate::render::{RenderSource, ViewModelRenderer};
use crate::schedule::RetryPolicy;

pub use report::{PassReport, PassStatus, StreamOutcome};
pub use trigger::{SyncTrigger, WakeEvent, WakeSignal};

/// How long a pass may hold the database lease before another worker may
/// take it over.
pub const DEFAULT_PASS_LEASE_TTL: Duration = Duration::from_secs(5 * 60);

/// Drives sync passes against one freshness state.
pub struct SyncWorker<F, S, N> {
    db: Database,
    fetcher: F,
    renderer: ViewModelRenderer,
    publisher: SurfacePublisher<S>,
    dispatcher: NotificationDispatcher<N>,
    pass_lock: Mutex<()>,
    lease_holder: String,
    lease_ttl: Duration,
}

impl<F, S, N> SyncWorker<F, S, N>
where
    F: DocumentFetcher,
    S: SurfaceHost,
    N: NotificationSink,
{
    pub fn new(db: Database, fetcher: F, renderer: ViewModelRenderer, host: S, sink: N) -> Self {
        Self {
            db,
            fetcher,
            renderer,
            publisher: SurfacePublisher::new(host),
            dispatcher: NotificationDispatcher::new(sink),
            pass_lock: Mutex::new(()),
            lease_holder: Uuid::now_v7().to_string(),
            lease_ttl: DEFAULT_PASS_LEASE_TTL,
        }
    }

    /// Override how long a pass may hold the database lease. Should exceed
    /// the longest pass, fetch timeouts included.
    #[must_use]
    pub fn with_lease_ttl(mut self, ttl: Duration) -> Self {
        self.lease_ttl = ttl;
        self
    }

    pub const fn surface_host(&self) -> &S {
        self.publisher.host()
    }

    pub const fn notification_sink(&self) -> &N {
        self.dispatcher.sink()
    }

    /// Current persisted freshness state.
    pub async fn state(&self) -> Result<SyncState> {
        Ok(LibSqlFreshnessStore::new(self.db.connection())
            .load()
            .await?)
    }

    /// Last view model saved as fallback content.
    pub async fn cached_view_model(&self) -> Result<Option<WidgetViewModel>> {
        Ok(LibSqlViewCache::new(self.db.connection()).load().await?)
    }

    /// A new surface instance appeared; give it fresh content right away.
    pub async fn on_instance_added(&self, instance: InstanceId) -> Result<PassReport> {
        self.run_pass(SyncTrigger::InstanceAdded(instance)).await
    }

    /// Run one pass.
    ///
    /// `Err` is only returned for persistence failures; the caller should
    /// retry later under its own policy. Fetch, publish and notification
    /// failures are recorded in the report.
    pub async fn run_pass(&self, trigger: SyncTrigger) -> Result<PassReport> {
        let Ok(_guard) = self.pass_lock.try_lock() else {
            tracing::info!(%trigger, "Sync pass already in flight, dropping trigger");
            return Ok(PassReport::skipped(trigger));
        };

        let lease = LibSqlPassLease::new(self.db.connection());
        if !lease.try_acquire(&self.lease_holder, self.lease_ttl).await? {
            tracing::info!(%trigger, "Another worker holds the sync lease, dropping trigger");
            return Ok(PassReport::skipped(trigger));
        }

        let result = self.run_leased_pass(trigger).await;
        if let Err(error) = lease.release(&self.lease_holder).await {
            tracing::warn!("Failed to release sync lease, it will expire: {}", error);
        }
        result
    }

    async fn run_leased_pass(&self, trigger: SyncTrigger) -> Result<PassReport> {
        tracing::info!(%trigger, "Starting sync pass");

        let freshness = LibSqlFreshnessStore::new(self.db.connection());
        let cache = LibSqlViewCache::new(self.db.connection());
        let stored = freshness.load().await?;

        let (widget, updates) = tokio::join!(self.fetch_widget(), self.fetch_updates());

        let widget_decision = widget.as_ref().ok().map(|document| {
            decide(
                StreamId::Widget,
                document.timestamp,
                stored.last_widget_timestamp,
            )
        });

        // Updates: notify first; the timestamp is only persisted below, once
        // both streams have been decided.
        let mut notification = None;
        let updates_outcome = match updates {
            Ok(document) => {
                let decision = decide(
                    StreamId::Updates,
                    document.timestamp,
                    stored.last_updates_timestamp,
                );
                match self.dispatcher.maybe_notify(decision, &document).await {
                    Ok(Some(event)) => {
                        let timestamp = event.dedup_timestamp;
                        notification = Some(event);
                        StreamOutcome::Applied { timestamp }
                    }
                    Ok(None) => StreamOutcome::Skipped {
                        fetched: document.timestamp,
                        stored: stored.last_updates_timestamp,
                    },
                    Err(error) => {
                        tracing::warn!("Update notification rejected, will retry: {}", error);
                        StreamOutcome::NotificationFailed(error)
                    }
                }
            }
            Err(error) => {
                tracing::warn!("Updates fetch failed: {}", error);
                StreamOutcome::FetchFailed(error)
            }
        };

        // Widget: a successful fetch is authoritative for rendering whatever
        // its timestamp; only persisting the timestamp is gated on Apply.
        let cached = match cache.load().await {
            Ok(cached) => cached,
            Err(error) => {
                tracing::warn!("Ignoring unreadable widget cache: {}", error);
                None
            }
        };
        let render_source = match &widget {
            Ok(document) => RenderSource::Fetched(document),
            Err(_) => RenderSource::Fallback(cached.as_ref()),
        };
        let rendered_from_fetch = matches!(render_source, RenderSource::Fetched(_));
        let view_model = self.renderer.render(render_source);

        let publish = self.publisher.publish_all(&view_model).await;

        // The cache must match what was just published before any timestamp
        // write can fail.
        if rendered_from_fetch && cached.as_ref() != Some(&view_model) {
            cache.save(&view_model).await?;
        }

        // Timestamps only after both decisions are known.
        let widget_outcome = match (widget, widget_decision) {
            (Ok(document), Some(Decision::Apply)) => {
                freshness.advance(StreamId::Widget, document.timestamp).await?;
                tracing::info!(timestamp = document.timestamp, "Applied widget content");
                StreamOutcome::Applied {
                    timestamp: document.timestamp,
                }
            }
            (Ok(document), _) => StreamOutcome::Skipped {
                fetched: document.timestamp,
                stored: stored.last_widget_timestamp,
            },
            (Err(error), _) => {
                tracing::warn!("Widget fetch failed, showing cached content: {}", error);
                StreamOutcome::FetchFailed(error)
            }
        };
        if let Some(event) = &notification {
            freshness
                .advance(StreamId::Updates, event.dedup_timestamp)
                .await?;
        }
        let state = freshness.load().await?;
        let report = PassReport {
            trigger,
            widget: widget_outcome,
            updates: updates_outcome,
            notification,
            view_model: Some(view_model),
            publish,
            state,
        };
        tracing::info!(status = ?report.status(), "Sync pass finished");
        Ok(report)
    }

    /// Run a pass and, if it fails, retry with backoff until `policy` gives up.
    ///
    /// Returns the last error once attempts are exhausted.
    pub async fn run_pass_with_retry(
        &self,
        trigger: SyncTrigger,
        policy: &RetryPolicy,
    ) -> Result<PassReport> {
        let mut attempt = 0;
        loop {
            match self.run_pass(trigger.clone()).await {
                Ok(report) => return Ok(report),
                Err(error) => {
                    let Some(delay) = policy.delay_for(attempt) else {
                        tracing::error!("Sync pass failed, giving up: {}", error);
                        return Err(error);
                    };
                    tracing::warn!(
                        attempt = attempt + 1,
                        delay = ?delay,
                        "Sync pass failed, retrying: {}",
                        error
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn fetch_widget(&self) -> std::result::Result<WidgetDocument, FetchError> {
        match self.fetcher.fetch(StreamId::Widget).await? {
            RemoteDocument::Widget(document) => Ok(document),
            RemoteDocument::Updates(_) => Err(mismatched(StreamId::Widget)),
        }
    }

    async fn fetch_updates(&self) -> std::result::Result<UpdatesDocument, FetchError> {
        match self.fetcher.fetch(StreamId::Updates).await? {
            RemoteDocument::Updates(document) => Ok(document),
            RemoteDocument::Widget(_) => Err(mismatched(StreamId::Updates)),
        }
    }
}

fn mismatched(stream: StreamId) -> FetchError {
    FetchError::Malformed {
        stream,
        reason: "fetcher returned a document of the other stream".to_string(),
    }
}
