use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, time::OffsetTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::{config::LoggerConfig, error::LoggerError, format::LoggerFormat};

/// Install the global `tracing` subscriber described by `cfg`.
///
/// Fails with [`LoggerError::AlreadyInitialized`] if any global subscriber is already set.
pub fn logger_init(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    if tracing::dispatcher::has_been_set() {
        return Err(LoggerError::AlreadyInitialized);
    }
    let filter = cfg.env_filter()?;

    match cfg.format {
        LoggerFormat::Text => {
            let layer = fmt::layer()
                .with_ansi(cfg.use_color)
                .with_target(cfg.with_targets)
                .with_thread_names(cfg.thread_names)
                .with_span_events(span_events(cfg))
                .with_timer(local_timer());
            install(tracing_subscriber::registry().with(filter).with(layer))
        }
        LoggerFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .with_target(cfg.with_targets)
                .with_thread_names(cfg.thread_names)
                .with_span_events(span_events(cfg))
                .with_timer(local_timer());
            install(tracing_subscriber::registry().with(filter).with(layer))
        }
        #[cfg(all(target_os = "linux", feature = "journald"))]
        LoggerFormat::Journald => {
            let layer = tracing_journald::layer()
                .map_err(|e| LoggerError::Install(format!("journald: {e}")))?;
            install(tracing_subscriber::registry().with(filter).with(layer))
        }
        #[cfg(not(all(target_os = "linux", feature = "journald")))]
        LoggerFormat::Journald => Err(LoggerError::JournaldUnavailable),
    }
}

fn span_events(cfg: &LoggerConfig) -> FmtSpan {
    if cfg.worker_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    }
}

fn local_timer() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

fn install<S>(subscriber: S) -> Result<(), LoggerError>
where
    S: Subscriber + Send + Sync + 'static,
{
    subscriber.try_init().map_err(|e| {
        if tracing::dispatcher::has_been_set() {
            LoggerError::AlreadyInitialized
        } else {
            LoggerError::Install(e.to_string())
        }
    })
}
