use std::io::IsTerminal;

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use crate::{error::LoggerError, format::LoggerFormat};

/// Target of the executor crate, used for the `executor_level` override.
const EXECUTOR_TARGET: &str = "seq_core";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// `EnvFilter` directives for the whole process, e.g. `info` or `warn,my_app=debug`.
    pub level: String,
    /// Level for executor internals (task queued/run, resizes), appended to `level`.
    pub executor_level: Option<String>,
    pub with_targets: bool,
    /// Print the emitting thread's name; worker threads carry their executor's name.
    pub thread_names: bool,
    /// Log when worker spans open and close, i.e. when workers start and stop.
    pub worker_spans: bool,
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::Text,
            level: "info".to_string(),
            executor_level: None,
            with_targets: true,
            thread_names: true,
            worker_spans: false,
            use_color: std::io::stdout().is_terminal(),
        }
    }
}

impl LoggerConfig {
    /// Filter directives after applying `executor_level`.
    pub fn directives(&self) -> String {
        let mut parts: Vec<String> = self
            .level
            .split(',')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .collect();
        if let Some(level) = self.executor_level.as_deref().map(str::trim)
            && !level.is_empty()
        {
            parts.push(format!("{EXECUTOR_TARGET}={level}"));
        }
        parts.join(",")
    }

    pub(crate) fn env_filter(&self) -> Result<EnvFilter, LoggerError> {
        let directives = self.directives();
        EnvFilter::try_new(&directives).map_err(|e| LoggerError::InvalidFilter {
            directives,
            reason: e.to_string(),
        })
    }
}
