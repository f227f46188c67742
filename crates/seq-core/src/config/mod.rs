use std::time::Duration;

use serde::Deserialize;

use crate::error::ExecutorError;

/// Construction parameters for a [`SequencedExecutor`](crate::SequencedExecutor).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExecutorConfig {
    /// Diagnostic tag; also the worker thread name.
    pub name: String,
    /// Requested queue capacity, rounded up to a power of two.
    pub task_limit: u32,
    /// Queue length at or below which blocked producers are woken.
    ///
    /// `None` means half of `task_limit`.
    /// A value at or above `task_limit` wakes producers on every removal.
    pub low_watermark: Option<u32>,
    /// How long the idle worker sleeps before re-checking its state.
    ///
    /// `None` parks until the next submission.
    pub idle_timeout_ms: Option<u64>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            name: "sequenced".to_string(),
            task_limit: 1000,
            low_watermark: None,
            idle_timeout_ms: None,
        }
    }
}

impl ExecutorConfig {
    pub fn new(name: impl Into<String>, task_limit: u32) -> Self {
        Self {
            name: name.into(),
            task_limit,
            ..Default::default()
        }
    }

    #[inline]
    pub fn with_low_watermark(mut self, low_watermark: u32) -> Self {
        self.low_watermark = Some(low_watermark);
        self
    }

    #[inline]
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn validate(&self) -> Result<(), ExecutorError> {
        if self.name.trim().is_empty() {
            return Err(ExecutorError::InvalidConfig("name must not be empty".into()));
        }
        if self.name.contains('\0') {
            return Err(ExecutorError::InvalidConfig("name must not contain NUL".into()));
        }
        Ok(())
    }

    /// Fraction of capacity used as the producer wake-up threshold.
    pub fn watermark_ratio(&self) -> f64 {
        let limit = self.task_limit.max(1);
        let watermark = self.low_watermark.unwrap_or(limit / 2);
        if watermark < limit {
            f64::from(watermark) / f64::from(limit)
        } else {
            1.0
        }
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout_ms.map(Duration::from_millis)
    }
}

/// Producer wake-up threshold for a queue of `capacity` slots.
#[inline]
pub(crate) fn watermark_for(capacity: u32, ratio: f64) -> u32 {
    ((f64::from(capacity) * ratio) as u32).min(capacity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_watermark_is_half() {
        let cfg = ExecutorConfig::new("exec", 10);
        assert_eq!(cfg.watermark_ratio(), 0.5);
        assert_eq!(watermark_for(16, cfg.watermark_ratio()), 8);
    }

    #[test]
    fn explicit_watermark_scales_with_capacity() {
        let cfg = ExecutorConfig::new("exec", 20).with_low_watermark(10);
        let ratio = cfg.watermark_ratio();
        assert_eq!(watermark_for(32, ratio), 16);
        assert_eq!(watermark_for(64, ratio), 32);
        assert_eq!(watermark_for(8, ratio), 4);
    }

    #[test]
    fn oversized_watermark_wakes_on_every_removal() {
        let cfg = ExecutorConfig::new("exec", 4).with_low_watermark(100);
        assert_eq!(cfg.watermark_ratio(), 1.0);
        assert_eq!(watermark_for(4, cfg.watermark_ratio()), 4);
    }

    #[test]
    fn zero_limit_does_not_divide_by_zero() {
        let cfg = ExecutorConfig::new("exec", 0);
        assert_eq!(cfg.watermark_ratio(), 0.0);
        assert_eq!(watermark_for(1, cfg.watermark_ratio()), 0);
    }

    #[test]
    fn idle_timeout_roundtrips_millis() {
        let cfg = ExecutorConfig::new("exec", 20).with_idle_timeout(Duration::from_millis(10));
        assert_eq!(cfg.idle_timeout(), Some(Duration::from_millis(10)));
        assert_eq!(ExecutorConfig::default().idle_timeout(), None);
    }

    #[test]
    fn empty_name_is_rejected() {
        let cfg = ExecutorConfig::new("  ", 10);
        assert!(matches!(cfg.validate(), Err(ExecutorError::InvalidConfig(_))));

        let cfg = ExecutorConfig::new("bad\0name", 10);
        assert!(matches!(cfg.validate(), Err(ExecutorError::InvalidConfig(_))));
        assert!(ExecutorConfig::new("feed", 10).validate().is_ok());
    }

    #[test]
    fn deserializes_with_defaults() {
        let cfg: ExecutorConfig =
            serde_json::from_str(r#"{"name":"feed","taskLimit":20,"idleTimeoutMs":10}"#).unwrap();
        assert_eq!(cfg.name, "feed");
        assert_eq!(cfg.task_limit, 20);
        assert_eq!(cfg.low_watermark, None);
        assert_eq!(cfg.idle_timeout(), Some(Duration::from_millis(10)));

        let cfg: ExecutorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, ExecutorConfig::default());
    }
}
