use std::fmt;
use std::sync::Arc;

use super::LogLevel;

/// The sink a [`Logger`](super::Logger) handle delegates to.
///
/// Embedding applications implement this to route the toolkit's messages
/// into their own pipeline.
pub trait LogBackend: Send + Sync {
    fn log(&self, level: LogLevel, args: fmt::Arguments<'_>);

    /// Whether a message at `level` would be emitted at all.
    fn enabled(&self, _level: LogLevel) -> bool {
        true
    }
}

/// Produces a backend for a logger name.
pub type BackendFactory = Arc<dyn Fn(&str) -> Arc<dyn LogBackend> + Send + Sync>;

// ── FacadeBackend ─────────────────────────────────────────────────────────

/// Default backend: forwards to the `log` facade using the logger name as
/// the record target, so `RUST_LOG=scry_engine::nodes=debug` style filters
/// apply per handle.
#[derive(Debug, Clone)]
pub struct FacadeBackend {
    target: String,
}

impl FacadeBackend {
    pub fn new(target: impl Into<String>) -> Self {
        Self { target: target.into() }
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

impl LogBackend for FacadeBackend {
    fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        let level: log::Level = level.into();
        log::log!(target: &self.target, level, "{}", args);
    }

    fn enabled(&self, level: LogLevel) -> bool {
        let level: log::Level = level.into();
        log::log_enabled!(target: &self.target, level)
    }
}

/// Factory used until the first [`patch_loggers`](super::patch_loggers) call.
pub fn default_factory() -> BackendFactory {
    Arc::new(|name: &str| Arc::new(FacadeBackend::new(name)) as Arc<dyn LogBackend>)
}

// ── PrefixBackend ─────────────────────────────────────────────────────────

/// Adapter prepending `"{prefix}: "` to each message before handing it to
/// an inner backend.
///
/// ```rust
/// use std::sync::Arc;
/// use scry_engine::logging::{patch_loggers, FacadeBackend, LogBackend, PrefixBackend};
///
/// patch_loggers(Arc::new(|name: &str| {
///     let inner = Arc::new(FacadeBackend::new(format!("host.plugins.{name}")));
///     Arc::new(PrefixBackend::new(name, inner)) as Arc<dyn LogBackend>
/// }));
/// ```
pub struct PrefixBackend {
    prefix: String,
    inner: Arc<dyn LogBackend>,
}

impl PrefixBackend {
    pub fn new(prefix: impl Into<String>, inner: Arc<dyn LogBackend>) -> Self {
        Self { prefix: prefix.into(), inner }
    }
}

impl LogBackend for PrefixBackend {
    fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        self.inner.log(level, format_args!("{}: {}", self.prefix, args));
    }

    fn enabled(&self, level: LogLevel) -> bool {
        self.inner.enabled(level)
    }
}


#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::testing::*;
    use super::*;

    #[test]
    fn prefix_backend_prepends() {
        let sink = Arc::new(Mutex::new(Vec::new()));
        let inner = Arc::new(Recording { name: "inner".into(), sink: Arc::clone(&sink) });
        let backend = PrefixBackend::new("scry", inner);
        backend.log(LogLevel::Warning, format_args!("found {} issues", 3));
        assert_eq!(
            sink.lock().as_slice(),
            &[("inner".to_string(), LogLevel::Warning, "scry: found 3 issues".to_string())]
        );
    }

    #[test]
    fn facade_backend_keeps_target() {
        assert_eq!(FacadeBackend::new("scry_engine::nodes").target(), "scry_engine::nodes");
    }
}
