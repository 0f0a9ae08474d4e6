//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system
///
/// `RUST_LOG` takes precedence; `default_filter` (e.g. `"info"` or
/// `"scene_engine=debug"`) applies when it is unset.
pub fn init(default_filter: &str) {
    builder(default_filter).init();
}

/// Initialize the logging system, tolerating an already-installed logger
pub fn try_init(default_filter: &str) -> Result<(), log::SetLoggerError> {
    builder(default_filter).try_init()
}

fn builder(default_filter: &str) -> env_logger::Builder {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
}
