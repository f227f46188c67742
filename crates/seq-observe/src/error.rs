use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("unknown log format {0:?}, expected text, json or journald")]
    InvalidFormat(String),

    #[error("invalid log filter {directives:?}: {reason}")]
    InvalidFilter { directives: String, reason: String },

    #[error("a global logger is already installed")]
    AlreadyInitialized,

    #[error("journald logging is not available in this build")]
    JournaldUnavailable,

    #[error("failed to install logger: {0}")]
    Install(String),
}
