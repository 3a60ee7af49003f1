//! Logging initialization using `tracing` and `tracing-subscriber`.
//!
//! - [`EnvFilter`] from `RUST_LOG` selects what is logged,
//! - [`LogFormat`] from `MBTSERVE_FORMAT` selects how it is printed.

use std::str::FromStr;

use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

/// Crates whose log level follows the `mbtserve=` directive unless set explicitly.
const MIRRORED_CRATES: [&str; 2] = ["mbtserve_core", "mbtiles"];

/// Log output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Emit human-readable, single-line logs.
    Full,

    /// A variant of the full-format, optimized for short line lengths (release default).
    Compact,

    /// A very bare format without timestamps, spans, targets or ANSI colors.
    Bare,

    /// Excessively pretty, multi-line logs for local development (debug default).
    Pretty,

    /// Output newline-delimited (structured) JSON logs.
    Json,
}

impl LogFormat {
    /// Initialize logging according to the selected format.
    pub fn init(self, env_filter: EnvFilter) {
        let dispatch = match self {
            Self::Full => tracing_subscriber::fmt()
                .with_span_events(FmtSpan::NONE)
                .with_env_filter(env_filter)
                .finish()
                .into(),
            Self::Compact => tracing_subscriber::fmt()
                .compact()
                .with_span_events(FmtSpan::NONE)
                .with_env_filter(env_filter)
                .finish()
                .into(),
            Self::Pretty => tracing_subscriber::fmt()
                .pretty()
                .with_env_filter(env_filter)
                .finish()
                .into(),
            Self::Bare => tracing_subscriber::fmt()
                .compact()
                .with_span_events(FmtSpan::NONE)
                .without_time()
                .with_target(false)
                .with_ansi(false)
                .with_env_filter(env_filter)
                .finish()
                .into(),
            Self::Json => tracing_subscriber::fmt()
                .json()
                .with_span_events(FmtSpan::NONE)
                .with_env_filter(env_filter)
                .finish()
                .into(),
        };
        // `SubscriberInitExt::init()` would also install its own `LogTracer`, clashing with `init_log_bridge`
        tracing::dispatcher::set_global_default(dispatch)
            .expect("failed to set global default subscriber");
    }
}

impl Default for LogFormat {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Compact
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "compact" => Ok(Self::Compact),
            "pretty" | "verbose" => Ok(Self::Pretty),
            "bare" => Ok(Self::Bare),
            "json" | "jsonl" => Ok(Self::Json),
            _ => Err(format!(
                "Invalid log format '{s}'. Valid options: json, full, compact, bare or pretty"
            )),
        }
    }
}

/// Bridge `log` records (actix-web's request logger, sqlx) into `tracing`.
fn init_log_bridge(env_filter: &EnvFilter) {
    let mut log_builder = tracing_log::LogTracer::builder()
        .with_interest_cache(tracing_log::InterestCacheConfig::default());
    if let Some(Some(max_level)) = env_filter.max_level_hint().map(LevelFilter::into_level) {
        let max_level = match max_level {
            Level::TRACE => log::LevelFilter::Trace,
            Level::DEBUG => log::LevelFilter::Debug,
            Level::INFO => log::LevelFilter::Info,
            Level::WARN => log::LevelFilter::Warn,
            Level::ERROR => log::LevelFilter::Error,
        };
        log_builder = log_builder.with_max_level(max_level);
    }
    log_builder
        .init()
        .expect("failed to initialize log -> tracing bridge: LogTracer already set");
}

/// Initialize the global tracing subscriber for the given filter and format.
///
/// An invalid filter falls back to `debug`, an invalid or missing format to [`LogFormat::default`].
pub fn init_tracing(filter: &str, format: Option<String>) {
    let env_filter = EnvFilter::from_str(filter).unwrap_or_else(|_| {
        eprintln!("Warning: Invalid filter string '{filter}' passed, using the 'debug' filter instead");
        EnvFilter::new("debug")
    });

    let log_format = format
        .and_then(|s| {
            s.parse::<LogFormat>()
                .map_err(|e| {
                    eprintln!("Warning: {e}");
                    eprintln!(
                        "Falling back to default format ({:?})",
                        LogFormat::default()
                    );
                })
                .ok()
        })
        .unwrap_or_default();

    init_log_bridge(&env_filter);
    log_format.init(env_filter);
}

/// Build the log filter from the `RUST_LOG` value.
///
/// Without `RUST_LOG`, all mbtserve crates log at `info`. If `RUST_LOG` sets a
/// level for `mbtserve=`, the tile resolver and archive crates get the same
/// level unless they are listed explicitly.
#[must_use]
pub fn log_filter(rust_log: Option<String>) -> String {
    let Some(mut rust_log) = rust_log else {
        let mut filter = "mbtserve=info".to_string();
        for name in MIRRORED_CRATES {
            filter.push_str(&format!(",{name}=info"));
        }
        return filter;
    };
    let Some(level) = rust_log
        .split(',')
        .find_map(|s| s.strip_prefix("mbtserve="))
        .map(str::to_string)
    else {
        return rust_log;
    };
    for name in MIRRORED_CRATES {
        if !rust_log.split(',').any(|s| s.starts_with(&format!("{name}="))) {
            rust_log.push_str(&format!(",{name}={level}"));
        }
    }
    rust_log
}
