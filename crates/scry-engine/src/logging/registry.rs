use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use parking_lot::{Mutex, RwLock};

use super::backend::{default_factory, BackendFactory, LogBackend};
use super::LogLevel;

// ── Logger ────────────────────────────────────────────────────────────────

/// A named logger handle.
///
/// Handles are usually acquired once (e.g. in a `static`) long before the
/// embedding application configures logging, so the delegate backend is
/// swappable behind a lock and every call goes through whichever backend
/// is current.
pub struct Logger {
    name: String,
    delegate: RwLock<Arc<dyn LogBackend>>,
}

impl Logger {
    fn new(name: &str, factory: &BackendFactory) -> Self {
        Self {
            name: name.to_string(),
            delegate: RwLock::new(factory(name)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The backend this handle currently forwards to.
    pub fn delegate(&self) -> Arc<dyn LogBackend> {
        Arc::clone(&self.delegate.read())
    }

    fn rebind(&self, backend: Arc<dyn LogBackend>) {
        *self.delegate.write() = backend;
    }

    /// Forward one message to the current backend.
    ///
    /// The lock is released before the backend runs, so a backend may itself
    /// log through other handles.
    pub fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        let backend = self.delegate();
        if backend.enabled(level) {
            backend.log(level, args);
        }
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        self.delegate().enabled(level)
    }

    pub fn trace(&self, args: fmt::Arguments<'_>) { self.log(LogLevel::Trace, args) }
    pub fn debug(&self, args: fmt::Arguments<'_>) { self.log(LogLevel::Debug, args) }
    pub fn info(&self, args: fmt::Arguments<'_>) { self.log(LogLevel::Info, args) }
    pub fn success(&self, args: fmt::Arguments<'_>) { self.log(LogLevel::Success, args) }
    pub fn warning(&self, args: fmt::Arguments<'_>) { self.log(LogLevel::Warning, args) }
    pub fn error(&self, args: fmt::Arguments<'_>) { self.log(LogLevel::Error, args) }
    pub fn critical(&self, args: fmt::Arguments<'_>) { self.log(LogLevel::Critical, args) }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").field("name", &self.name).finish_non_exhaustive()
    }
}

// ── LoggerRegistry ────────────────────────────────────────────────────────

struct RegistryState {
    factory: BackendFactory,
    /// Handles in registration order.
    loggers: Vec<Arc<Logger>>,
    by_name: HashMap<String, usize>,
}

/// Name → handle registry with a replaceable backend factory.
///
/// Starts empty with [`FacadeBackend`](super::FacadeBackend) as the factory.
/// Handles are never removed.
///
/// A single mutex covers the factory and the handle table. [`get`](Self::get)
/// holds it across lookup and insertion, and [`patch`](Self::patch) holds it
/// across the factory swap and the rebinding of every existing handle, so no
/// handle can keep an old backend once `patch` has returned.
pub struct LoggerRegistry {
    state: Mutex<RegistryState>,
}

impl LoggerRegistry {
    pub fn new() -> Self {
        Self::with_factory(default_factory())
    }

    pub fn with_factory(factory: BackendFactory) -> Self {
        Self {
            state: Mutex::new(RegistryState {
                factory,
                loggers: Vec::new(),
                by_name: HashMap::new(),
            }),
        }
    }

    /// Return the handle for `name`, creating it with the current factory on
    /// first request.
    pub fn get(&self, name: &str) -> Arc<Logger> {
        let mut state = self.state.lock();
        if let Some(&idx) = state.by_name.get(name) {
            return Arc::clone(&state.loggers[idx]);
        }
        let logger = Arc::new(Logger::new(name, &state.factory));
        let idx = state.loggers.len();
        state.loggers.push(Arc::clone(&logger));
        state.by_name.insert(name.to_string(), idx);
        logger
    }

    /// Install `factory` for future handles and rebind every existing handle
    /// to `factory(handle_name)` immediately.
    ///
    /// `factory` runs with the registry locked and must not call back into
    /// this registry.
    pub fn patch(&self, factory: BackendFactory) {
        let mut state = self.state.lock();
        for logger in &state.loggers {
            logger.rebind(factory(&logger.name));
        }
        state.factory = factory;
    }

    pub fn len(&self) -> usize {
        self.state.lock().loggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.state.lock().loggers.iter().map(|l| l.name.clone()).collect()
    }
}

impl Default for LoggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ── Process-wide registry ─────────────────────────────────────────────────

static REGISTRY: LazyLock<LoggerRegistry> = LazyLock::new(LoggerRegistry::new);

/// The process-wide registry behind [`get_logger`] and [`patch_loggers`].
pub fn global_registry() -> &'static LoggerRegistry {
    &REGISTRY
}

/// Get the process-wide logger handle for `name`.
///
/// Toolkit modules call this with `module_path!()`.
pub fn get_logger(name: &str) -> Arc<Logger> {
    REGISTRY.get(name)
}

/// Redirect every toolkit logger, past and future, through `factory`.
///
/// ```rust
/// use std::sync::Arc;
/// use scry_engine::logging::{get_logger, patch_loggers, FacadeBackend, LogBackend};
///
/// let early = get_logger("host::early");
/// patch_loggers(Arc::new(|name: &str| {
///     Arc::new(FacadeBackend::new(format!("host.{name}"))) as Arc<dyn LogBackend>
/// }));
/// early.info(format_args!("routed through the host"));
/// ```
pub fn patch_loggers(factory: BackendFactory) {
    REGISTRY.patch(factory);
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::super::backend::testing::*;
    use super::*;

    fn sink() -> Arc<Mutex<Vec<Record>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn rec(name: &str, level: LogLevel, msg: &str) -> Record {
        (name.to_string(), level, msg.to_string())
    }

    // ── identity ──────────────────────────────────────────────────────────

    #[test]
    fn same_name_same_handle() {
        let registry = LoggerRegistry::new();
        let a = registry.get("scry.loader");
        let b = registry.get("scry.loader");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn distinct_names_distinct_handles() {
        let registry = LoggerRegistry::new();
        let a = registry.get("a");
        let b = registry.get("b");
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(registry.names(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn new_registry_is_empty() {
        assert!(LoggerRegistry::new().is_empty());
    }

    // ── delegation ────────────────────────────────────────────────────────

    #[test]
    fn handle_forwards_leveled_calls() {
        let out = sink();
        let registry = LoggerRegistry::with_factory(recording_factory("f", &out));
        let logger = registry.get("n");
        logger.debug(format_args!("one"));
        logger.success(format_args!("two {}", 2));
        logger.critical(format_args!("three"));
        assert_eq!(*out.lock(), vec![
            rec("f:n", LogLevel::Debug, "one"),
            rec("f:n", LogLevel::Success, "two 2"),
            rec("f:n", LogLevel::Critical, "three"),
        ]);
    }

    // ── patching ──────────────────────────────────────────────────────────

    #[test]
    fn patch_rebinds_existing_handles() {
        let out = sink();
        let registry = LoggerRegistry::with_factory(recording_factory("old", &out));
        let a = registry.get("a");
        let b = registry.get("b");

        registry.patch(recording_factory("new", &out));
        a.info(format_args!("x"));
        b.warning(format_args!("y"));

        assert_eq!(*out.lock(), vec![
            rec("new:a", LogLevel::Info, "x"),
            rec("new:b", LogLevel::Warning, "y"),
        ]);
    }

    #[test]
    fn patch_applies_to_later_handles() {
        let out = sink();
        let registry = LoggerRegistry::new();
        registry.patch(recording_factory("p", &out));
        registry.get("fresh").error(format_args!("boom"));
        assert_eq!(*out.lock(), vec![rec("p:fresh", LogLevel::Error, "boom")]);
    }

    #[test]
    fn patch_is_eager() {
        let calls = Arc::new(Mutex::new(Vec::<String>::new()));
        let registry = LoggerRegistry::new();
        registry.get("a");
        registry.get("b");

        let seen = Arc::clone(&calls);
        registry.patch(Arc::new(move |name: &str| {
            seen.lock().push(name.to_string());
            Arc::new(crate::logging::FacadeBackend::new(name)) as Arc<dyn LogBackend>
        }));

        assert_eq!(*calls.lock(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn disabled_levels_are_dropped() {
        struct WarnOnly(Arc<Mutex<Vec<Record>>>);
        impl LogBackend for WarnOnly {
            fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
                self.0.lock().push(("w".into(), level, args.to_string()));
            }
            fn enabled(&self, level: LogLevel) -> bool {
                level >= LogLevel::Warning
            }
        }

        let out = sink();
        let inner = Arc::clone(&out);
        let registry = LoggerRegistry::with_factory(Arc::new(move |_: &str| {
            Arc::new(WarnOnly(Arc::clone(&inner))) as Arc<dyn LogBackend>
        }));
        let logger = registry.get("n");
        logger.info(format_args!("hidden"));
        logger.warning(format_args!("shown"));
        assert!(!logger.enabled(LogLevel::Debug));
        assert_eq!(*out.lock(), vec![rec("w", LogLevel::Warning, "shown")]);
    }

    #[test]
    fn concurrent_get_and_patch_leave_no_stale_backend() {
        let out = sink();
        let registry = Arc::new(LoggerRegistry::with_factory(recording_factory("old", &out)));

        let workers: Vec<_> = (0..4)
            .map(|t| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for i in 0..50 {
                        registry.get(&format!("t{t}.{i}"));
                    }
                })
            })
            .collect();
        registry.patch(recording_factory("new", &out));
        for w in workers {
            w.join().unwrap();
        }

        // Every handle was either rebound by the patch or created after it.
        for name in registry.names() {
            registry.get(&name).info(format_args!("ping"));
        }
        assert!(out.lock().iter().all(|(backend, _, _)| backend.starts_with("new:")));
        assert_eq!(registry.len(), 200);
    }

    // ── process-wide registry ─────────────────────────────────────────────

    #[test]
    fn global_get_is_identity_stable() {
        let a = get_logger("scry_engine::tests::global_identity");
        let b = get_logger("scry_engine::tests::global_identity");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&a, &global_registry().get("scry_engine::tests::global_identity")));
    }

    #[test]
    fn global_patch_rebinds_and_applies_forward() {
        let out = sink();
        let before = get_logger("scry_engine::tests::before_patch");

        patch_loggers(recording_factory("host", &out));
        before.info(format_args!("early"));
        get_logger("scry_engine::tests::after_patch").info(format_args!("late"));

        // Other tests may log through the global registry concurrently.
        let records = out.lock().clone();
        assert!(records.contains(&rec("host:scry_engine::tests::before_patch", LogLevel::Info, "early")));
        assert!(records.contains(&rec("host:scry_engine::tests::after_patch", LogLevel::Info, "late")));
    }
}
