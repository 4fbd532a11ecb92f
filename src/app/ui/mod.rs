pub mod notice;
pub mod tasks;
pub mod utils;

pub use notice::{Clock, ManualClock, Notice, SystemClock, ToastId, ToastPhase};
pub use tasks::TasksScreen;
