use std::sync::Once;

/// Filter applied when neither the config nor `RUST_LOG` names one.
///
/// wgpu and naga report every adapter probe and pipeline at info.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger configuration.
///
/// `env_filter` uses `env_logger` directives ("warn", "glint_engine=debug,wgpu=warn").
/// When set it wins over `RUST_LOG`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            env_filter: Some(filter.into()),
            ..Self::default()
        }
    }

    /// Picks the active directives: explicit filter, then `rust_log`, then
    /// [`DEFAULT_FILTER`]. Blank values count as unset.
    pub fn resolve_filter<'a>(&'a self, rust_log: Option<&'a str>) -> &'a str {
        let set = |v: &&str| !v.trim().is_empty();
        self.env_filter
            .as_deref()
            .filter(set)
            .or(rust_log.filter(set))
            .unwrap_or(DEFAULT_FILTER)
    }

    fn builder(&self, rust_log: Option<&str>) -> env_logger::Builder {
        let mut builder = env_logger::Builder::new();
        builder.parse_filters(self.resolve_filter(rust_log));
        builder.write_style(self.write_style);
        builder
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let rust_log = std::env::var("RUST_LOG").ok();
        config.builder(rust_log.as_deref()).init();
        log::debug!("logger ready ({})", config.resolve_filter(rust_log.as_deref()));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, Log, Metadata};

    fn enabled(logger: &env_logger::Logger, target: &str, level: Level) -> bool {
        logger.enabled(&Metadata::builder().target(target).level(level).build())
    }

    #[test]
    fn explicit_filter_beats_rust_log() {
        let config = LoggingConfig::with_filter("debug");
        assert_eq!(config.resolve_filter(Some("error")), "debug");

        let logger = config.builder(Some("error")).build();
        assert!(enabled(&logger, "glint_demos", Level::Debug));
    }

    #[test]
    fn rust_log_used_without_explicit_filter() {
        let config = LoggingConfig::default();
        assert_eq!(config.resolve_filter(Some("warn")), "warn");

        let logger = config.builder(Some("warn")).build();
        assert!(enabled(&logger, "glint_demos", Level::Warn));
        assert!(!enabled(&logger, "glint_demos", Level::Info));
    }

    #[test]
    fn default_quiets_wgpu() {
        let config = LoggingConfig::default();
        assert_eq!(config.resolve_filter(None), DEFAULT_FILTER);

        let logger = config.builder(None).build();
        assert!(enabled(&logger, "glint_engine", Level::Info));
        assert!(!enabled(&logger, "glint_engine", Level::Debug));
        assert!(!enabled(&logger, "wgpu_core", Level::Info));
        assert!(enabled(&logger, "wgpu_hal", Level::Warn));
        assert!(!enabled(&logger, "naga", Level::Info));
    }

    #[test]
    fn blank_values_fall_through() {
        let config = LoggingConfig::with_filter("  ");
        assert_eq!(config.resolve_filter(Some("")), DEFAULT_FILTER);
        assert_eq!(config.resolve_filter(Some("trace")), "trace");
    }
}
