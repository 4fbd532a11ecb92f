#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

use std::fmt::Display;
use std::time;

use async_trait::async_trait;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::TaskLoader;
use crate::config::{ServerConfig, user_agent};
use crate::models::Task;

pub struct TaskClient {
    endpoint: String,
    tasks_path: String,
    complete_task_path: String,
    timeout: Option<time::Duration>,
    http: reqwest::Client,
}

#[async_trait]
impl TaskLoader for TaskClient {
    async fn list_tasks(&self) -> Result<Vec<Task>> {
        let mut req = self
            .http
            .get(format!("{}{}", self.endpoint, self.tasks_path))
            .header("User-Agent", user_agent());

        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }

        let res = req.send().await.wrap_err("listing tasks")?;
        if !res.status().is_success() {
            return Err(TaskApiError::from_response(res).await.into());
        }

        let mut tasks = res
            .json::<Vec<Task>>()
            .await
            .wrap_err("parsing task list response")?;

        // Pending first, newest id first within each group
        tasks.sort_by(|a, b| a.completed.cmp(&b.completed).then(b.id.cmp(&a.id)));
        Ok(tasks)
    }

    async fn complete_task(&self, id: u64) -> Result<()> {
        let mut req = self
            .http
            .post(format!(
                "{}{}/{}",
                self.endpoint, self.complete_task_path, id
            ))
            .header("User-Agent", user_agent());

        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }

        let res = req
            .send()
            .await
            .wrap_err(format!("completing task {}", id))?;
        if !res.status().is_success() {
            return Err(TaskApiError::from_response(res).await.into());
        }

        let status = res
            .json::<StatusResponse>()
            .await
            .wrap_err("parsing complete task response")?;
        if status.status != "success" {
            eyre::bail!("server refused to complete task {}: {}", id, status.status);
        }
        Ok(())
    }
}

impl From<&ServerConfig> for TaskClient {
    fn from(value: &ServerConfig) -> Self {
        let mut client = TaskClient::default()
            .with_endpoint(&value.endpoint)
            .with_tasks_path(&value.tasks_path)
            .with_complete_task_path(&value.complete_task_path);

        if let Some(timeout) = value.timeout() {
            client = client.with_timeout(timeout);
        }
        client
    }
}

impl TaskClient {
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    pub fn with_tasks_path(mut self, path: &str) -> Self {
        self.tasks_path = path.to_string();
        self
    }

    pub fn with_complete_task_path(mut self, path: &str) -> Self {
        self.complete_task_path = path.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: time::Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Option<time::Duration> {
        self.timeout
    }
}

impl Default for TaskClient {
    fn default() -> Self {
        let server = ServerConfig::default();
        Self {
            endpoint: server.endpoint,
            tasks_path: server.tasks_path,
            complete_task_path: server.complete_task_path,
            timeout: None,
            http: reqwest::Client::new(),
        }
    }
}

#[derive(Default, Debug, Serialize, Deserialize)]
struct StatusResponse {
    status: String,
}

#[derive(Default, Error, Debug)]
pub struct TaskApiError {
    pub http_code: u16,
    pub message: String,
}

impl TaskApiError {
    async fn from_response(res: reqwest::Response) -> Self {
        let http_code = res.status().as_u16();
        let message = res.text().await.unwrap_or_default();
        log::error!("Task server error response ({}): {}", http_code, message);
        Self { http_code, message }
    }
}

impl Display for TaskApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "task server error ({}): {}", self.http_code, self.message)
    }
}
