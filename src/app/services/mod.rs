pub mod action;
pub mod events;

#[cfg(test)]
#[path = "services_test.rs"]
mod tests;

pub use action::ActionService;
pub use events::EventService;
