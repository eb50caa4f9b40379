//! Logging setup for canopy.
//!
//! Components log through the `tracing` macros; this module only installs a
//! subscriber when asked to. The subscriber is controlled by:
//!
//! - `CANOPY_DEBUG=true|1|yes` - Enable debug logging
//! - `CANOPY_LOG_LEVEL=trace|debug|info|warn|error` - Set a specific level
//! - `CANOPY_LOG_FORMAT=json|pretty|compact` - Output format (default: json)
//!
//! ```rust,no_run
//! use canopy_query::logging;
//!
//! // Call once at startup; later calls are no-ops.
//! logging::init();
//! ```
//!
//! Within the crate, builds and store dispatches are logged like this:
//!
//! ```rust,ignore
//! debug!(parent_node_id, offset, limit, "Dispatching item query");
//! trace!(entries = nested.len(), "Merged nested filter entries");
//! warn!(filter = %name, "Raw filter value has no matching definition");
//! ```

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Check if debug logging is enabled via `CANOPY_DEBUG`.
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var("CANOPY_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Get the configured log level from `CANOPY_LOG_LEVEL`.
///
/// Defaults to "debug" when `CANOPY_DEBUG` is enabled, otherwise "warn".
pub fn get_log_level() -> &'static str {
    let fallback = if is_debug_enabled() { "debug" } else { "warn" };
    env::var("CANOPY_LOG_LEVEL")
        .ok()
        .and_then(|level| normalize_level(&level))
        .unwrap_or(fallback)
}

/// Get the configured log format from `CANOPY_LOG_FORMAT`.
pub fn get_log_format() -> &'static str {
    env::var("CANOPY_LOG_FORMAT")
        .map(|f| match f.to_lowercase().as_str() {
            "pretty" => "pretty",
            "compact" => "compact",
            _ => "json",
        })
        .unwrap_or("json")
}

fn normalize_level(level: &str) -> Option<&'static str> {
    let level = level.to_lowercase();
    LEVELS.iter().copied().find(|l| *l == level)
}

/// Initialize logging from the environment.
///
/// Does nothing unless `CANOPY_DEBUG` or `CANOPY_LOG_LEVEL` is set.
pub fn init() {
    if !is_debug_enabled() && env::var("CANOPY_LOG_LEVEL").is_err() {
        return;
    }
    install(get_log_level());
}

/// Initialize logging with an explicit level, ignoring `CANOPY_LOG_LEVEL`.
///
/// Unknown levels fall back to "warn".
pub fn init_with_level(level: &str) {
    install(normalize_level(level).unwrap_or("warn"));
}

fn install(level: &'static str) {
    INIT.call_once(|| {
        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let filter = EnvFilter::try_new(format!("canopy={},canopy_query={}", level, level))
                .unwrap_or_else(|_| EnvFilter::new("warn"));

            match get_log_format() {
                "json" => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().json())
                        .init();
                }
                "compact" => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().compact())
                        .init();
                }
                _ => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().pretty())
                        .init();
                }
            }

            tracing::info!(level, format = get_log_format(), "canopy logging initialized");
        }

        #[cfg(not(feature = "tracing-subscriber"))]
        {
            // Callers install their own subscriber.
            let _ = level;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_level() {
        assert_eq!(normalize_level("DEBUG"), Some("debug"));
        assert_eq!(normalize_level("Trace"), Some("trace"));
        assert_eq!(normalize_level("verbose"), None);
    }

    #[test]
    fn test_log_format_is_known() {
        assert!(matches!(get_log_format(), "json" | "pretty" | "compact"));
    }

    #[test]
    fn test_log_level_is_known() {
        assert!(LEVELS.contains(&get_log_level()));
    }
}
