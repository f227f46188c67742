//! Logging for processes hosting sequenced executors.
//!
//! [`logger_init`] installs one global `tracing` subscriber. Worker threads are named after
//! their executor and every worker event is recorded inside a `worker{executor=..}` span,
//! so both the thread name and the span identify which executor logged a line.

mod config;
pub use config::LoggerConfig;

mod error;
pub use error::LoggerError;

mod format;
pub use format::LoggerFormat;

mod init;
pub use init::logger_init;
