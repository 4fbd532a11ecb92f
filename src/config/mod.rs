pub mod constants;
pub(crate) mod defaults;
pub mod models;
pub mod utils;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

pub use models::*;
pub use utils::*;

use eyre::Result;

pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_SHA: &str = match option_env!("GIT_SHA") {
    Some(v) => v,
    None => "unknown",
};

pub fn user_agent() -> String {
    format!("{}/{}", APP_NAME, VERSION)
}

pub fn version() -> String {
    format!("{} version: {} {}", APP_NAME, VERSION, GIT_SHA)
}

#[cfg(not(test))]
static CONFIG: std::sync::OnceLock<Configuration> = std::sync::OnceLock::new();

// Tests run in parallel, so each test thread swaps in its own configuration.
#[cfg(test)]
thread_local! {
    static TEST_CONFIG: std::cell::RefCell<&'static Configuration> =
        std::cell::RefCell::new(Box::leak(Box::new(Configuration::default())));
}

impl Configuration {
    /// instance returns the process-wide configuration set by [`Configuration::init`].
    #[cfg(not(test))]
    pub fn instance() -> &'static Configuration {
        CONFIG.get().expect("Config not initialized")
    }

    #[cfg(not(test))]
    pub fn init(config: Configuration) -> Result<()> {
        CONFIG
            .set(config)
            .map_err(|_| eyre::eyre!("Config already initialized"))
    }

    #[cfg(test)]
    pub fn instance() -> &'static Configuration {
        TEST_CONFIG.with(|config| *config.borrow())
    }

    #[cfg(test)]
    pub fn init(config: Configuration) -> Result<()> {
        TEST_CONFIG.with(|test_config| {
            *test_config.borrow_mut() = Box::leak(Box::new(config));
        });
        Ok(())
    }
}

/// verbose prints to stderr when `general.verbose` is on.
#[macro_export]
macro_rules! verbose {
    ($($arg:tt)*) => {
        if $crate::config::Configuration::instance().general.verbose {
            eprintln!($($arg)*);
        }
    };
    () => {};
}

pub use verbose;
