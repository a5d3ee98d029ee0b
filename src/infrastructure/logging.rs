use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::{LogFormat, LoggingConfig};

/// Per-crate directives appended to the configured level
///
/// sqlx logs every statement at info; only slow or failing ones are kept.
const QUIET_DEPENDENCIES: [&str; 2] = ["sqlx=warn", "hyper=warn"];

/// Filter used when `RUST_LOG` is not set
fn default_filter(level: &str) -> String {
    std::iter::once(level)
        .chain(QUIET_DEPENDENCIES)
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(&config.level)));

    let span_events = FmtSpan::CLOSE;

    match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_span_events(span_events))
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty().with_target(true).with_span_events(span_events))
            .init(),
    }

    tracing::info!(
        level = %config.level,
        format = ?config.format,
        "Logging initialized"
    );
}
