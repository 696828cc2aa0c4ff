//! Logger initialization.
//!
//! All components log through the `log` facade with per-component targets
//! (`ipc_bridge::adapter`, `ipc_bridge::router`, ...). This installs
//! `env_logger` as the backend, honouring `RUST_LOG` first.

use env_logger::Env;

use crate::config::BridgeSettings;

/// Filter used when neither `RUST_LOG` nor settings provide one.
pub const DEFAULT_FILTER: &str = "warn";

/// Install `env_logger` as the global logger.
///
/// Returns `true` if this call installed the logger, `false` if one was
/// already set (by an earlier call or by the host).
pub fn init_logging(default_filter: Option<&str>) -> bool {
    let env = Env::default().default_filter_or(default_filter.unwrap_or(DEFAULT_FILTER));
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init()
        .is_ok()
}

/// Install the logger using the filter configured in `settings`.
pub fn init_logging_from(settings: &BridgeSettings) -> bool {
    init_logging(settings.log_filter.as_deref())
}
