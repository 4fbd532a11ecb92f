pub mod dispatcher;
pub mod sse;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

pub use dispatcher::{Dispatch, Dispatcher};
pub use sse::{EventSource, SseError, SseEvent, SseHandler, SseParser};

use std::sync::Arc;

use eyre::Result;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::{Configuration, ListenerConfig, ServerConfig};
use crate::models::ArcEventTx;
use crate::tasks::ArcRefresher;

/// Listener follows the task server's update stream in the background.
pub struct Listener {
    enabled: bool,
    server: ServerConfig,
    config: ListenerConfig,
    event_tx: ArcEventTx,
    refresher: Option<ArcRefresher>,
}

impl Listener {
    pub fn new(config: &Configuration, event_tx: ArcEventTx) -> Self {
        Self {
            enabled: config.ui.tasks_panel,
            server: config.server.clone(),
            config: config.listener.clone(),
            event_tx,
            refresher: None,
        }
    }

    pub fn with_refresher(mut self, refresher: Option<ArcRefresher>) -> Self {
        self.refresher = refresher;
        self
    }

    /// spawn opens the update stream. Live updates only feed the tasks
    /// panel, so nothing is started when the panel is off.
    pub fn spawn(self, cancel_token: CancellationToken) -> Option<JoinHandle<Result<()>>> {
        if !self.enabled {
            log::info!("Tasks panel is disabled, not subscribing to updates");
            return None;
        }

        let source = EventSource::from(&self.server);
        let dispatcher = Dispatcher::new(self.event_tx)
            .with_refresher(self.refresher)
            .with_config(self.config);

        log::debug!("Starting update listener on {}", source.url());
        Some(tokio::spawn(source.run(Arc::new(dispatcher), cancel_token)))
    }
}
