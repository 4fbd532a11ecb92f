#[cfg(test)]
#[path = "sse_test.rs"]
mod tests;

use std::sync::Arc;
use std::time;

use async_trait::async_trait;
use eyre::Result;
use futures::TryStreamExt;
use thiserror::Error;
use tokio::io::AsyncBufReadExt;
use tokio_util::io::StreamReader;
use tokio_util::sync::CancellationToken;

use crate::config::{ServerConfig, user_agent};

const DEFAULT_EVENT: &str = "message";

/// SseEvent is one dispatched server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    pub event: String,
    pub data: String,
    pub id: Option<String>,
}

#[derive(Debug, Error)]
pub enum SseError {
    #[error("connecting to event stream: {0}")]
    Request(#[from] reqwest::Error),

    #[error("event stream answered with status {0}")]
    BadStatus(u16),

    #[error("reading event stream: {0}")]
    Stream(#[from] std::io::Error),
}

/// SseHandler receives the lifecycle and messages of an [`EventSource`].
#[async_trait]
pub trait SseHandler {
    async fn on_connecting(&self) {}
    async fn on_open(&self) {}
    async fn on_message(&self, event: SseEvent);
    async fn on_error(&self, err: &SseError);
    async fn on_close(&self) {}
}

pub type ArcSseHandler = Arc<dyn SseHandler + Send + Sync>;

/// SseParser turns `text/event-stream` lines into events.
#[derive(Debug, Default)]
pub struct SseParser {
    data: Vec<String>,
    event: Option<String>,
    last_event_id: Option<String>,
    retry: Option<time::Duration>,
}

impl SseParser {
    /// feed_line consumes one line without its terminator and returns an
    /// event when the line is the blank line that closes one.
    pub fn feed_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.flush();
        }

        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "data" => self.data.push(value.to_string()),
            "event" => self.event = Some(value.to_string()),
            "id" => {
                if !value.contains('\0') {
                    self.last_event_id = Some(value.to_string());
                }
            }
            "retry" => {
                if let Ok(ms) = value.parse::<u64>() {
                    self.retry = Some(time::Duration::from_millis(ms));
                }
            }
            _ => log::trace!("Ignoring unknown event stream field: {}", field),
        }
        None
    }

    /// take_retry returns the reconnection delay announced by the server, once.
    pub fn take_retry(&mut self) -> Option<time::Duration> {
        self.retry.take()
    }

    pub fn last_event_id(&self) -> Option<&str> {
        self.last_event_id.as_deref()
    }

    fn flush(&mut self) -> Option<SseEvent> {
        let event = self.event.take();
        if self.data.is_empty() {
            return None;
        }

        let data = std::mem::take(&mut self.data).join("\n");
        Some(SseEvent {
            event: event
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| DEFAULT_EVENT.to_string()),
            data,
            id: self.last_event_id.clone(),
        })
    }
}

/// EventSource holds one subscription to a server-sent event endpoint and
/// reconnects after the announced delay when the stream ends.
pub struct EventSource {
    url: String,
    reconnect: bool,
    retry: time::Duration,
    last_event_id: Option<String>,
    http: reqwest::Client,
}

impl From<&ServerConfig> for EventSource {
    fn from(value: &ServerConfig) -> Self {
        EventSource::new(value.updates_url())
            .with_reconnect(value.reconnect)
            .with_retry(time::Duration::from_millis(value.retry_ms))
    }
}

impl EventSource {
    pub fn new(url: impl Into<String>) -> Self {
        let server = ServerConfig::default();
        Self {
            url: url.into(),
            reconnect: server.reconnect,
            retry: time::Duration::from_millis(server.retry_ms),
            last_event_id: None,
            http: reqwest::Client::new(),
        }
    }

    pub fn with_reconnect(mut self, reconnect: bool) -> Self {
        self.reconnect = reconnect;
        self
    }

    pub fn with_retry(mut self, retry: time::Duration) -> Self {
        self.retry = retry;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn retry(&self) -> time::Duration {
        self.retry
    }

    pub fn last_event_id(&self) -> Option<&str> {
        self.last_event_id.as_deref()
    }

    /// run keeps the subscription alive until the token is cancelled, or
    /// until the first disconnect when reconnection is disabled.
    pub async fn run(
        mut self,
        handler: ArcSseHandler,
        cancel_token: CancellationToken,
    ) -> Result<()> {
        loop {
            handler.on_connecting().await;

            let result = tokio::select! {
                _ = cancel_token.cancelled() => {
                    log::debug!("Event stream cancelled");
                    return Ok(());
                }
                result = self.connect(handler.as_ref()) => result,
            };

            match result {
                Ok(()) => {
                    log::info!("Event stream {} closed by server", self.url);
                    handler.on_close().await;
                }
                Err(err) => handler.on_error(&err).await,
            }

            if !self.reconnect {
                return Ok(());
            }

            log::debug!("Reconnecting to {} in {:?}", self.url, self.retry);
            tokio::select! {
                _ = cancel_token.cancelled() => {
                    log::debug!("Event stream cancelled");
                    return Ok(());
                }
                _ = tokio::time::sleep(self.retry) => {}
            }
        }
    }

    async fn connect(
        &mut self,
        handler: &(dyn SseHandler + Send + Sync),
    ) -> Result<(), SseError> {
        let mut req = self
            .http
            .get(&self.url)
            .header("Accept", "text/event-stream")
            .header("Cache-Control", "no-cache")
            .header("User-Agent", user_agent());

        if let Some(id) = &self.last_event_id {
            req = req.header("Last-Event-ID", id);
        }

        let res = req.send().await?;
        if !res.status().is_success() {
            return Err(SseError::BadStatus(res.status().as_u16()));
        }

        log::info!("Subscribed to {}", self.url);
        handler.on_open().await;

        let stream = res.bytes_stream().map_err(|e| {
            let err_msg = e.to_string();
            return std::io::Error::new(std::io::ErrorKind::Interrupted, err_msg);
        });

        // Split on raw bytes so a line with invalid UTF-8 is decoded lossily
        // instead of failing the whole stream.
        let mut segments = StreamReader::new(stream).split(b'\n');
        let mut parser = SseParser {
            last_event_id: self.last_event_id.clone(),
            ..Default::default()
        };

        while let Some(segment) = segments.next_segment().await? {
            let line = String::from_utf8_lossy(&segment);
            let line = line.strip_suffix('\r').unwrap_or(&line);
            log::trace!("event stream line: {}", line);
            let event = parser.feed_line(line);

            if let Some(retry) = parser.take_retry() {
                self.retry = retry;
            }
            if let Some(id) = parser.last_event_id() {
                self.last_event_id = Some(id.to_string());
            }

            let Some(event) = event else {
                continue;
            };

            if event.event != DEFAULT_EVENT {
                log::debug!("Skipping named event {:?}", event.event);
                continue;
            }
            handler.on_message(event).await;
        }
        Ok(())
    }
}
