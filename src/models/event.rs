use std::sync::Arc;

use tokio::sync::mpsc;

use super::{NoticeMessage, Task};

#[derive(Debug)]
pub enum Event {
    Notice(NoticeMessage),

    TasksLoaded(Vec<Task>),
    StreamStatus(StreamStatus),

    KeyboardChar(char),
    KeyboardEsc,
    KeyboardEnter,
    KeyboardCtrlC,

    Quit,

    UiTick,
    UiScrollUp,
    UiScrollDown,
    UiScrollPageUp,
    UiScrollPageDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamStatus {
    #[default]
    Disabled,
    Connecting,
    Connected,
    Disconnected,
}

#[async_trait::async_trait]
pub trait EventTx {
    async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>>;
}

impl StreamStatus {
    pub fn label(&self) -> &'static str {
        match self {
            StreamStatus::Disabled => "off",
            StreamStatus::Connecting => "connecting",
            StreamStatus::Connected => "live",
            StreamStatus::Disconnected => "offline",
        }
    }
}

#[async_trait::async_trait]
impl EventTx for mpsc::Sender<Event> {
    async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>> {
        self.send(event).await
    }
}

#[async_trait::async_trait]
impl EventTx for mpsc::UnboundedSender<Event> {
    async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>> {
        self.send(event)
    }
}

pub type ArcEventTx = Arc<dyn EventTx + Send + Sync>;
