//! Logging initialization for dolphin-send.
//!
//! The default `compact` format prints one terse line per event to stdout,
//! prefixed only with the local wall-clock time:
//!
//! ```text
//! 14:02:11  INFO log watcher started and waiting for lines path=/srv/minecraft/logs/latest.log offset=4096
//! ```
//!
//! The configured level (or `--debug`) applies to the dolphin crates only;
//! HTTP client internals stay at `warn`. `RUST_LOG`, when set, replaces the
//! whole filter.

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use dolphin_core::config::GeneralConfig;

/// Time-only prefix for the compact format.
const TIME_FORMAT: &str = "%H:%M:%S";

/// Level applied to everything outside the dolphin crates.
const DEPENDENCY_LEVEL: &str = "warn";

/// Tracing targets that follow the configured level.
const DOLPHIN_TARGETS: &[&str] = &[
    "dolphin_core",
    "dolphin_log_watcher",
    "dolphin_daemon",
    "dolphin_send",
];

/// Build the `EnvFilter` directive string used when `RUST_LOG` is unset.
///
/// `debug` is the `--debug` flag and wins over `general.log_level`.
pub fn filter_directives(config: &GeneralConfig, debug: bool) -> String {
    let level = if debug { "debug" } else { config.log_level.as_str() };

    let mut directives = DEPENDENCY_LEVEL.to_owned();
    for target in DOLPHIN_TARGETS {
        directives.push(',');
        directives.push_str(target);
        directives.push('=');
        directives.push_str(level);
    }
    directives
}

/// Initialize the global tracing subscriber.
///
/// Must be called exactly once, before any tracing macros are used.
///
/// # Formats
///
/// * `"compact"` - `HH:MM:SS LEVEL message fields` (default)
/// * `"pretty"` - Multi-line human-readable output with targets
/// * `"json"` - Machine-parseable JSON lines
pub fn init_tracing(config: &GeneralConfig, debug: bool) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(filter_directives(config, debug))
            .map_err(|e| anyhow::anyhow!("invalid log level '{}': {}", config.log_level, e))?,
    };

    match config.log_format.as_str() {
        "compact" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .compact()
                        .with_target(false)
                        .with_timer(ChronoLocal::new(TIME_FORMAT.to_owned())),
                )
                .try_init()
                .map_err(|e| {
                    anyhow::anyhow!("failed to initialize compact tracing subscriber: {}", e)
                })?;
        }
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()
                .map_err(|e| {
                    anyhow::anyhow!("failed to initialize JSON tracing subscriber: {}", e)
                })?;
        }
        "pretty" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init()
                .map_err(|e| {
                    anyhow::anyhow!("failed to initialize pretty tracing subscriber: {}", e)
                })?;
        }
        _ => {
            return Err(anyhow::anyhow!(
                "unknown log format '{}', expected 'compact', 'json' or 'pretty'",
                config.log_format
            ));
        }
    }

    Ok(())
}
