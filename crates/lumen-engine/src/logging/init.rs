use std::sync::Once;

use log::LevelFilter;

/// Logger configuration.
///
/// `filter` follows the `env_logger` filter syntax (e.g. "warn" or
/// "lumen_engine=debug"). When unset, `RUST_LOG` is consulted before falling
/// back to `default_level`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter: Option<String>,
    pub default_level: LevelFilter,
    pub write_style: env_logger::WriteStyle,
    /// Route output through the test harness capture.
    pub is_test: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            default_level: LevelFilter::Info,
            write_style: env_logger::WriteStyle::Auto,
            is_test: false,
        }
    }
}

impl LoggingConfig {
    /// Debug output for this crate only, everything else at `warn`.
    pub fn verbose() -> Self {
        Self {
            filter: Some("warn,lumen_engine=debug".to_owned()),
            ..Self::default()
        }
    }

    /// Resolves the filter string that will be handed to `env_logger`.
    fn resolve_filter(&self, env: Option<String>) -> String {
        self.filter
            .clone()
            .or(env)
            .unwrap_or_else(|| self.default_level.to_string().to_lowercase())
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Idempotent. A logger installed by someone else is left in place.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = config.resolve_filter(std::env::var("RUST_LOG").ok());

        let mut builder = env_logger::Builder::new();
        builder
            .parse_filters(&filter)
            .write_style(config.write_style)
            .is_test(config.is_test);

        if builder.try_init().is_ok() {
            log::debug!("logging initialized ({filter})");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins_over_env() {
        let config = LoggingConfig { filter: Some("error".into()), ..LoggingConfig::default() };
        assert_eq!(config.resolve_filter(Some("trace".into())), "error");
    }

    #[test]
    fn env_filter_used_when_unset() {
        let config = LoggingConfig::default();
        assert_eq!(config.resolve_filter(Some("lumen_engine=trace".into())), "lumen_engine=trace");
    }

    #[test]
    fn default_level_is_last_resort() {
        let config = LoggingConfig { default_level: LevelFilter::Warn, ..LoggingConfig::default() };
        assert_eq!(config.resolve_filter(None), "warn");
    }

    #[test]
    fn init_twice_is_harmless() {
        init_logging(LoggingConfig { is_test: true, ..LoggingConfig::default() });
        init_logging(LoggingConfig::verbose());
    }
}
