#[cfg(test)]
#[path = "refresher_test.rs"]
mod tests;

use async_trait::async_trait;
use eyre::{Context, Result};

use super::{ArcTaskLoader, Refresher};
use crate::models::{ArcEventTx, Event};

/// TaskListRefresher reloads the task list through an optional loader and
/// hands the result to the UI. Without a loader, refreshing does nothing.
pub struct TaskListRefresher {
    loader: Option<ArcTaskLoader>,
    event_tx: ArcEventTx,
}

impl TaskListRefresher {
    pub fn new(loader: Option<ArcTaskLoader>, event_tx: ArcEventTx) -> Self {
        Self { loader, event_tx }
    }

    pub fn has_loader(&self) -> bool {
        self.loader.is_some()
    }
}

#[async_trait]
impl Refresher for TaskListRefresher {
    async fn refresh(&self) -> Result<()> {
        let Some(loader) = self.loader.as_ref() else {
            log::debug!("No task loader configured, skipping refresh");
            return Ok(());
        };

        let tasks = loader.list_tasks().await.wrap_err("loading tasks")?;
        log::debug!("Loaded {} tasks", tasks.len());
        self.event_tx.send(Event::TasksLoaded(tasks)).await?;
        Ok(())
    }
}
