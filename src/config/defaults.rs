use std::collections::HashMap;

use super::constants::*;
use crate::models::EventKind;

pub(crate) fn log_level() -> Option<String> {
    Some("info".to_string())
}

pub(crate) fn log_file_path() -> String {
    LOG_FILE_PATH.to_string()
}

pub(crate) fn server_endpoint() -> String {
    SERVER_ENDPOINT.to_string()
}

pub(crate) fn updates_path() -> String {
    UPDATES_PATH.to_string()
}

pub(crate) fn tasks_path() -> String {
    TASKS_PATH.to_string()
}

pub(crate) fn complete_task_path() -> String {
    COMPLETE_TASK_PATH.to_string()
}

pub(crate) fn retry_ms() -> u64 {
    RETRY_MS
}

pub(crate) fn notice_duration_ms() -> u64 {
    NOTICE_DURATION_MS
}

pub(crate) fn notice_fade_ms() -> u64 {
    NOTICE_FADE_MS
}

pub(crate) fn notice_width_percent() -> u16 {
    NOTICE_WIDTH_PERCENT
}

pub(crate) fn notify_on() -> HashMap<String, bool> {
    HashMap::from([
        (EventKind::NewTask.to_string(), true),
        (EventKind::TaskCompleted.to_string(), true),
    ])
}

pub(crate) fn default_true() -> bool {
    true
}
