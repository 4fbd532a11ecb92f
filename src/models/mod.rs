pub mod action;
pub mod event;
pub mod inbound;
pub mod notice;
pub mod task;

pub use notice::*;
pub use task::Task;

pub use action::*;
pub use event::{ArcEventTx, Event, EventTx, StreamStatus};
pub use inbound::{EventKind, InboundEvent};
