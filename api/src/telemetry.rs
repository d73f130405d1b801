//! Tracing subscriber setup

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use mw_shared::{LogFormat, LoggingConfig};

/// Install the global subscriber described by `config`
///
/// `RUST_LOG` overrides the configured level. Calling this twice is a no-op.
pub fn init_tracing(config: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let fmt = tracing_subscriber::fmt::layer()
        .with_ansi(config.colored)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    let fmt = match config.format {
        LogFormat::Json => fmt.json().flatten_event(true).boxed(),
        LogFormat::Pretty => fmt.pretty().boxed(),
        LogFormat::Compact => fmt.compact().boxed(),
    };

    let _ = tracing_subscriber::registry()
        .with(fmt)
        .with(env_filter)
        .try_init();
}
