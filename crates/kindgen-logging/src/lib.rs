//! kindgen-logging - Tracing subscriber setup
//!
//! This crate provides:
//! - [`LogLevel`] as accepted by configuration files and the CLI
//! - [`init_logging`] to install a stderr fmt subscriber with an `EnvFilter`

mod init;
mod level;

pub use init::{LOG_ENV, env_filter, init_logging};
pub use level::{LogLevel, ParseLogLevelError};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{LogLevel, init_logging};
}
