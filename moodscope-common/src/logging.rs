//! Tracing setup for moodscope services.
//!
//! Output is either human-readable or one JSON object per event. HTTP client
//! and TLS internals are pinned to `warn` so request logs stay readable at
//! `debug`.

use std::fmt;
use std::str::FromStr;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::ObservabilityConfig;

/// Header carrying a caller-supplied trace ID.
pub const TRACE_ID_HEADER: &str = "X-Trace-Id";

/// Library targets always filtered to `warn`.
pub const NOISY_MODULES: &[&str] = &[
    "hyper",
    "hyper_util",
    "reqwest",
    "h2",
    "rustls",
    "tokio_util",
    "tower_http",
];

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
        })
    }
}

fn filter_directives(log_level: &str, excluded_targets: &[String]) -> String {
    NOISY_MODULES
        .iter()
        .copied()
        .chain(excluded_targets.iter().map(String::as_str))
        .fold(log_level.to_ascii_lowercase(), |mut acc, target| {
            acc.push(',');
            acc.push_str(target);
            acc.push_str("=warn");
            acc
        })
}

/// Install the global subscriber described by `config`.
///
/// `RUST_LOG`, when set, replaces the computed filter. Calling this twice is
/// harmless; the second call keeps the first subscriber.
pub fn init_logging(config: &ObservabilityConfig) {
    let format: LogFormat = config.log_format.parse().unwrap_or_default();
    let directives = filter_directives(&config.log_level, &config.excluded_targets);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directives));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_span_events(FmtSpan::CLOSE)
                    .with_current_span(true)
                    .with_target(true),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init(),
    };

    if installed.is_ok() {
        tracing::info!(
            log_level = %config.log_level,
            log_format = %format,
            "Logging initialized"
        );
    }
}

/// Fresh UUIDv4 trace ID.
pub fn generate_trace_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Reuse an inbound trace ID or mint a new one.
pub fn trace_id_from_headers(headers: &http::HeaderMap) -> String {
    headers
        .get(TRACE_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map_or_else(generate_trace_id, String::from)
}

/// `info` span for one inbound request, tagged with its trace ID.
///
/// ```ignore
/// let span = request_span!("analyze", trace_id, username = %username);
/// handle(request).instrument(span).await
/// ```
#[macro_export]
macro_rules! request_span {
    ($name:expr, $trace_id:expr) => {
        tracing::info_span!($name, trace_id = %$trace_id)
    };
    ($name:expr, $trace_id:expr, $($field:tt)*) => {
        tracing::info_span!($name, trace_id = %$trace_id, $($field)*)
    };
}
