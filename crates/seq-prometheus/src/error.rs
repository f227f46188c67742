use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
    #[error("metrics already registered for executor: {0}")]
    Duplicate(String),
    #[error("no metrics registered for executor: {0}")]
    UnknownExecutor(String),
}
