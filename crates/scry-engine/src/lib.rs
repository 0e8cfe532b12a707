//! scry engine crate.
//!
//! Owns the pieces of the toolkit that sit above raw syntax: logger
//! indirection, enclosing scopes, expression resolution, and node helpers.

pub mod logging;
pub mod scope;
pub mod expressions;
pub mod nodes;

pub use logging::{get_logger, patch_loggers};
pub use nodes::get_call_keyword_arguments;
