//! Logging setup.
//!
//! The engine itself only talks to the `log` facade; this module installs the
//! `env_logger` backend for binaries and tests that want output.

mod init;

pub use init::{LoggingConfig, init_logging};
