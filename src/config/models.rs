use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::constants::*;
use super::defaults::*;

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Configuration {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub listener: ListenerConfig,

    #[serde(default)]
    pub notice: NoticeConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct GeneralConfig {
    #[serde(default)]
    pub verbose: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogConfig {
    #[serde(default = "log_level")]
    pub level: Option<String>,

    #[serde(default)]
    pub filters: Option<Vec<LogFilter>>,

    #[serde(default)]
    pub file: LogFile,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogFilter {
    #[serde(default)]
    pub module: Option<String>,

    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogFile {
    #[serde(default = "log_file_path")]
    pub path: String,

    #[serde(default)]
    pub append: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ServerConfig {
    #[serde(default = "server_endpoint")]
    pub endpoint: String,

    #[serde(default = "updates_path")]
    pub updates_path: String,

    #[serde(default = "tasks_path")]
    pub tasks_path: String,

    #[serde(default = "complete_task_path")]
    pub complete_task_path: String,

    #[serde(default)]
    pub timeout_secs: Option<u16>,

    #[serde(default = "default_true")]
    pub reconnect: bool,

    #[serde(default = "retry_ms")]
    pub retry_ms: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ListenerConfig {
    /// Whether an event type produces a notice. Types missing from the map
    /// are notified.
    #[serde(default = "notify_on")]
    pub notify_on: HashMap<String, bool>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct NoticeConfig {
    #[serde(default = "notice_duration_ms")]
    pub duration_ms: u64,

    #[serde(default = "notice_fade_ms")]
    pub fade_ms: u64,

    #[serde(default = "notice_width_percent")]
    pub width_percent: u16,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub tasks_panel: bool,
}

impl ServerConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(|secs| Duration::from_secs(secs as u64))
    }

    pub fn updates_url(&self) -> String {
        format!("{}{}", self.endpoint.trim_end_matches('/'), self.updates_path)
    }
}

impl ListenerConfig {
    pub fn should_notify(&self, event_type: &str) -> bool {
        self.notify_on.get(event_type).copied().unwrap_or(true)
    }
}

impl NoticeConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Some("info".to_string()),
            file: LogFile::default(),
            filters: None,
        }
    }
}

impl Default for LogFile {
    fn default() -> Self {
        Self {
            path: LOG_FILE_PATH.to_string(),
            append: false,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            endpoint: SERVER_ENDPOINT.to_string(),
            updates_path: UPDATES_PATH.to_string(),
            tasks_path: TASKS_PATH.to_string(),
            complete_task_path: COMPLETE_TASK_PATH.to_string(),
            timeout_secs: None,
            reconnect: true,
            retry_ms: RETRY_MS,
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            notify_on: notify_on(),
        }
    }
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            duration_ms: NOTICE_DURATION_MS,
            fade_ms: NOTICE_FADE_MS,
            width_percent: NOTICE_WIDTH_PERCENT,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { tasks_panel: true }
    }
}
