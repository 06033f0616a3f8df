//! Structured logging for the Worley arena generator.
//!
//! Installs a `tracing` subscriber with console output and, in debug builds,
//! a JSON log file. The level comes from `RUST_LOG` when set, otherwise from
//! the config's `debug.log_level`.

use arena_config::Config;
use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config sets a level.
pub const DEFAULT_FILTER: &str = "info";

/// Name of the JSON log file written in debug builds.
pub const LOG_FILE_NAME: &str = "arena.log";

/// Filter string for a config: its `log_level`, or [`DEFAULT_FILTER`].
pub fn filter_string(config: Option<&Config>) -> String {
    config
        .map(|c| c.debug.log_level.trim())
        .filter(|level| !level.is_empty())
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

/// Initialize the tracing subscriber.
///
/// Sets up:
/// - console output with uptime, target, thread name and level
/// - a JSON file `<log_dir>/arena.log` when `debug_build` is set
/// - filtering from `RUST_LOG`, falling back to the config log level
///
/// # Examples
///
/// ```no_run
/// use arena_log::init_logging;
/// use arena_config::Config;
///
/// let config = Config::default();
/// init_logging(None, false, Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let filter_str = filter_string(config);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    // Worker threads are named, so thread names are worth showing.
    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE_NAME))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        tracing::debug!(filter = %filter_str, dir = %log_dir.display(), "logging to file");
        return;
    }

    subscriber.init();
    tracing::debug!(filter = %filter_str, "logging initialized");
}

/// An `EnvFilter` built from [`DEFAULT_FILTER`].
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}
