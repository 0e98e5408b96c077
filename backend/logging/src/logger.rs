//! Structured Logger
//!
//! Wraps `tracing` with a console layer on stderr (stdout carries the
//! rendered menus), an optional JSON file layer and env-based level control.

use std::path::Path;

use inline_menu_config::MenuConfig;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "inline-menu.log";

/// `RUST_LOG` if set, otherwise `level`.
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Initialize the global logger.
///
/// With `log_dir` set, NDJSON is additionally written to
/// `<log_dir>/inline-menu.log.YYYY-MM-DD`. A second call is a no-op.
pub fn init_logger(log_dir: Option<&Path>, level: &str) {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(true);

    let file_layer = log_dir.map(|dir| {
        let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
        fmt::layer().json().with_writer(file_appender).with_ansi(false)
    });

    let _ = tracing_subscriber::registry()
        .with(build_filter(level))
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

/// Initialize from the `logging` section of the config.
pub fn init_from_config(config: &MenuConfig) {
    init_logger(config.log_dir().map(Path::new), config.log_level());
}
