use std::time::Duration;

/// How long a notice stays fully visible when the message does not set its own duration
pub const NOTICE_DURATION_MS: u64 = 3000;

/// Fade-out time between a notice expiring and being removed
pub const NOTICE_FADE_MS: u64 = 500;

/// Percentage of the screen width used by the notice area
pub const NOTICE_WIDTH_PERCENT: u16 = 30;

pub const SERVER_ENDPOINT: &str = "http://127.0.0.1:5000";

pub const UPDATES_PATH: &str = "/updates";

pub const TASKS_PATH: &str = "/get_tasks";

pub const COMPLETE_TASK_PATH: &str = "/complete_task";

/// Delay before the event stream reconnects, unless the server sends `retry:`
pub const RETRY_MS: u64 = 3000;

pub const LOG_FILE_PATH: &str = "/tmp/taskwatch.log";

pub const FRAME_DURATION: Duration = Duration::from_millis(1000 / 30);
