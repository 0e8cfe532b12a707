use std::sync::Once;

/// Facade backend configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "scry_engine=debug,scry_engine::expressions=trace").
///
/// `write_style` controls ANSI coloring behavior.
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

static INIT: Once = Once::new();

/// Installs `env_logger` behind the `log` facade once.
///
/// Subsequent calls are ignored. Only relevant for handles still bound to
/// [`FacadeBackend`](super::FacadeBackend); hosts that patch the loggers
/// usually skip this. If the host already installed a `log` implementation,
/// that one is kept.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.write_style(config.write_style);

        if builder.try_init().is_err() {
            log::debug!("a global logger is already installed; keeping it");
            return;
        }

        log::debug!("logging initialized");
    });
}
