// Logging System for Roost
//
// Unified logging setup for the runtime, built on the `tracing` ecosystem.
// Every thread of the core is named (`roost-worker-3`, `roost-timer`, ...), so
// enabling thread names in the output tells you which loop produced a line.
//
// # Usage Examples
//
// ```rust
// use roost::logging;
//
// // INFO level, human-readable output on stderr
// logging::init_default();
//
// // Or pick the level and format yourself
// let config = logging::LogConfig {
//     level: tracing::Level::DEBUG,
//     json_format: false,
//     ..Default::default()
// };
// logging::init(config);
// ```
//
// Per-target levels can also be set through `RUST_LOG`, e.g.
// `RUST_LOG=roost::thread=debug`.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::{Mutex, Once};

use tracing::{Level, Subscriber};
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

/// Configuration for the roost logging system
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level to display
    pub level: Level,
    /// Whether to use JSON format for logs
    pub json_format: bool,
    /// Whether to include file and line information
    pub show_file_line: bool,
    /// Whether to include thread name/id
    pub show_thread_info: bool,
    /// Whether to include timestamps
    pub show_time: bool,
    /// Target filter expressions (format: "target=level,target2=level2,...")
    pub target_filters: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json_format: false,
            show_file_line: false,
            show_thread_info: true,
            show_time: true,
            target_filters: None,
        }
    }
}

// Initialization guard to ensure we only initialize once
static INIT: Once = Once::new();

fn build_filter(config: &LogConfig) -> EnvFilter {
    let mut env_filter =
        EnvFilter::from_default_env().add_directive(LevelFilter::from_level(config.level).into());

    if let Some(filters) = &config.target_filters {
        for filter in filters.split(',') {
            if let Ok(directive) = filter.trim().parse() {
                env_filter = env_filter.add_directive(directive);
            }
        }
    }
    env_filter
}

/// Initialize the logging system with the given configuration
///
/// Installs the global subscriber. Safe to call more than once; only the first
/// call (of this function or any other `init_*`) takes effect.
pub fn init(config: LogConfig) {
    INIT.call_once(|| {
        let registry = tracing_subscriber::registry().with(build_filter(&config));

        if config.json_format {
            let layer = fmt::layer()
                .json()
                .flatten_event(true)
                .with_writer(io::stderr)
                .with_thread_names(config.show_thread_info);
            set_global_subscriber(registry.with(layer));
            return;
        }

        let layer = fmt::layer()
            .with_writer(io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
            .with_file(config.show_file_line)
            .with_line_number(config.show_file_line)
            .with_thread_names(config.show_thread_info)
            .with_thread_ids(config.show_thread_info);

        if config.show_time {
            set_global_subscriber(registry.with(layer));
        } else {
            set_global_subscriber(registry.with(layer.without_time()));
        }
    });
}

/// Initialize logging with both stderr and file output
///
/// The file is opened in append mode and created if missing. File output is
/// always plain text with thread names and source locations.
pub fn init_with_file(config: LogConfig, log_file: impl AsRef<Path>) -> io::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;

    INIT.call_once(move || {
        let console_layer = fmt::layer()
            .with_writer(io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
            .with_thread_names(config.show_thread_info);

        let file_layer = fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .with_file(true)
            .with_line_number(true)
            .with_thread_names(true);

        let subscriber = tracing_subscriber::registry()
            .with(build_filter(&config))
            .with(console_layer)
            .with(file_layer);

        set_global_subscriber(subscriber);
    });

    Ok(())
}

// Helper function to set the global subscriber
fn set_global_subscriber<S>(subscriber: S)
where
    S: Subscriber + Send + Sync + 'static,
{
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Error setting global tracing subscriber: {}", err);
    }
}

/// INFO level, human-readable output.
pub fn init_default() {
    init(LogConfig::default());
}

/// DEBUG level with source locations, and loop start/stop events from the core.
pub fn init_development() {
    init(LogConfig {
        level: Level::DEBUG,
        json_format: false,
        show_file_line: true,
        show_thread_info: true,
        show_time: true,
        target_filters: Some("roost=debug,roost::thread=debug".to_string()),
    });
}

/// JSON lines at INFO level for log aggregators.
pub fn init_production() {
    init(LogConfig {
        level: Level::INFO,
        json_format: true,
        show_file_line: false,
        show_thread_info: true,
        show_time: true,
        target_filters: None,
    });
}

/// Warnings and errors only, compact, for tests.
pub fn init_test() {
    init(LogConfig {
        level: Level::WARN,
        json_format: false,
        show_file_line: true,
        show_thread_info: true,
        show_time: false,
        target_filters: None,
    });
}
