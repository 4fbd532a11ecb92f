#[cfg(test)]
#[path = "dispatcher_test.rs"]
mod tests;

use async_trait::async_trait;
use eyre::{Context, Result};

use super::sse::{SseError, SseEvent, SseHandler};
use crate::config::ListenerConfig;
use crate::models::{ArcEventTx, Event, EventKind, InboundEvent, NoticeMessage, StreamStatus};
use crate::tasks::ArcRefresher;
use crate::{info_notice, success_notice};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Ignored(String),
    Handled {
        kind: EventKind,
        notified: bool,
        refresh_scheduled: bool,
    },
}

/// Dispatcher turns update stream messages into notices and task list
/// refreshes.
pub struct Dispatcher {
    event_tx: ArcEventTx,
    refresher: Option<ArcRefresher>,
    config: ListenerConfig,
}

impl Dispatcher {
    pub fn new(event_tx: ArcEventTx) -> Self {
        Self {
            event_tx,
            refresher: None,
            config: ListenerConfig::default(),
        }
    }

    pub fn with_refresher(mut self, refresher: Option<ArcRefresher>) -> Self {
        self.refresher = refresher;
        self
    }

    pub fn with_config(mut self, config: ListenerConfig) -> Self {
        self.config = config;
        self
    }

    pub async fn dispatch(&self, payload: &str) -> Result<Dispatch> {
        let event = InboundEvent::parse(payload)
            .wrap_err(format!("parsing update payload: {}", payload))?;
        log::debug!("Received update: {:?}", event);

        let kind = event.kind();
        if !kind.is_recognized() {
            log::debug!("Ignoring update of type {:?}", event.event_type);
            return Ok(Dispatch::Ignored(event.event_type));
        }

        let notified = self.config.should_notify(&event.event_type);
        if notified {
            self.event_tx
                .send(Event::Notice(notice_for(&kind, &event)))
                .await?;
        }

        let refresh_scheduled = self.schedule_refresh(&kind);

        Ok(Dispatch::Handled {
            kind,
            notified,
            refresh_scheduled,
        })
    }

    /// schedule_refresh reloads the task list in the background so a slow
    /// task server never holds up the next update.
    fn schedule_refresh(&self, kind: &EventKind) -> bool {
        let Some(refresher) = self.refresher.clone() else {
            return false;
        };

        let kind = kind.clone();
        tokio::spawn(async move {
            if let Err(err) = refresher.refresh().await {
                log::error!("Failed to refresh tasks after {}: {:?}", kind, err);
            }
        });
        true
    }

    async fn send_status(&self, status: StreamStatus) {
        self.event_tx
            .send(Event::StreamStatus(status))
            .await
            .unwrap_or_else(|err| {
                log::error!("Failed to send stream status: {}", err);
            });
    }
}

#[async_trait]
impl SseHandler for Dispatcher {
    async fn on_connecting(&self) {
        self.send_status(StreamStatus::Connecting).await;
    }

    async fn on_open(&self) {
        self.send_status(StreamStatus::Connected).await;
    }

    async fn on_message(&self, event: SseEvent) {
        if let Err(err) = self.dispatch(&event.data).await {
            log::error!("Failed to handle update: {:?}", err);
        }
    }

    async fn on_error(&self, err: &SseError) {
        log::error!("Update stream error: {}", err);
        self.send_status(StreamStatus::Disconnected).await;
    }

    async fn on_close(&self) {
        self.send_status(StreamStatus::Disconnected).await;
    }
}

fn notice_for(kind: &EventKind, event: &InboundEvent) -> NoticeMessage {
    match kind {
        EventKind::NewTask => match event.title() {
            Some(title) => success_notice!(format!("New task: {}", title)),
            None => success_notice!("New task added"),
        },
        EventKind::TaskCompleted => match event.task_id() {
            Some(id) => success_notice!(format!("Task #{} completed", id)),
            None => success_notice!("Task completed"),
        },
        EventKind::Other(name) => info_notice!(format!("Update: {}", name)),
    }
}
