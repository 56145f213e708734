//! Logger setup for hosts that do not install their own `log` backend.

use crate::config::LogLevel;

/// Install an `env_logger` backend filtered at `level`.
///
/// Only the first call installs a logger; later calls just adjust the
/// maximum level. Returns whether this call installed the backend.
pub fn init_logging(level: LogLevel) -> bool {
    let filter = level.to_level_filter();
    let installed = env_logger::Builder::new()
        .filter_level(filter)
        .format_timestamp_millis()
        .try_init()
        .is_ok();
    log::set_max_level(filter);
    if installed {
        log::debug!("Logging initialized at {}", level.name());
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_noop() {
        let _ = init_logging(LogLevel::Debug);
        assert!(!init_logging(LogLevel::Warn));
        assert_eq!(log::max_level(), log::LevelFilter::Warn);
    }
}
