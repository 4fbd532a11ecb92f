pub mod client;
pub mod refresher;

pub use client::{TaskApiError, TaskClient};
pub use refresher::TaskListRefresher;

#[cfg(test)]
use mockall::automock;

use crate::models::Task;
use async_trait::async_trait;
use eyre::Result;
use std::sync::Arc;

/// TaskLoader fetches and updates tasks on the task server.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TaskLoader {
    async fn list_tasks(&self) -> Result<Vec<Task>>;
    async fn complete_task(&self, id: u64) -> Result<()>;
}

pub type ArcTaskLoader = Arc<dyn TaskLoader + Send + Sync>;

/// Refresher is the entry point used to reload the task list, both by the
/// update listener and by the UI.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Refresher {
    async fn refresh(&self) -> Result<()>;
}

pub type ArcRefresher = Arc<dyn Refresher + Send + Sync>;
