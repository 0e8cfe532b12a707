//! Logger indirection.
//!
//! Toolkit modules never talk to a logging backend directly. They hold a
//! named [`Logger`] handle obtained from [`get_logger`], and every handle
//! forwards to a [`LogBackend`] built by the current [`BackendFactory`].
//!
//! By default that backend is the `log` facade ([`FacadeBackend`]), which
//! [`init_logging`] wires to `env_logger`. An embedding application can
//! instead call [`patch_loggers`] with its own factory; handles that were
//! already handed out are rebound on the spot.

mod backend;
mod init;
mod level;
mod registry;

pub use backend::{default_factory, BackendFactory, FacadeBackend, LogBackend, PrefixBackend};
pub use init::{init_logging, LoggingConfig};
pub use level::{LogLevel, UnknownLevel};
pub use registry::{get_logger, patch_loggers, global_registry, Logger, LoggerRegistry};
