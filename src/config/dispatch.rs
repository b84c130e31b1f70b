//! Dispatch configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Per-call time budget for command dispatch
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    /// Deadline applied when the caller does not ask for one
    #[serde(default = "default_timeout_ms")]
    pub default_timeout_ms: u64,

    /// Upper bound for caller-requested deadlines
    #[serde(default = "max_timeout_ms")]
    pub max_timeout_ms: u64,
}

impl DispatchConfig {
    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    /// The timeout to apply for a caller-requested value, in milliseconds.
    ///
    /// `None` and zero fall back to the default; anything above the
    /// maximum is clamped.
    pub fn effective_timeout(&self, requested_ms: Option<u64>) -> Duration {
        match requested_ms {
            Some(ms) if ms > 0 => Duration::from_millis(ms.min(self.max_timeout_ms)),
            _ => self.default_timeout(),
        }
    }

    /// Validate dispatch configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.default_timeout_ms == 0 || self.max_timeout_ms == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.default_timeout_ms > self.max_timeout_ms {
            return Err(ValidationError::DefaultTimeoutExceedsMax {
                default_ms: self.default_timeout_ms,
                max_ms: self.max_timeout_ms,
            });
        }
        Ok(())
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: default_timeout_ms(),
            max_timeout_ms: max_timeout_ms(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn max_timeout_ms() -> u64 {
    30_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = DispatchConfig::default();
        assert_eq!(config.default_timeout(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn requested_timeout_is_clamped() {
        let config = DispatchConfig::default();

        assert_eq!(config.effective_timeout(None), Duration::from_secs(5));
        assert_eq!(config.effective_timeout(Some(0)), Duration::from_secs(5));
        assert_eq!(config.effective_timeout(Some(250)), Duration::from_millis(250));
        assert_eq!(config.effective_timeout(Some(120_000)), Duration::from_secs(30));
    }

    #[test]
    fn zero_timeouts_are_rejected() {
        let config = DispatchConfig {
            default_timeout_ms: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ValidationError::InvalidTimeout)));
    }

    #[test]
    fn default_above_max_is_rejected() {
        let config = DispatchConfig {
            default_timeout_ms: 60_000,
            max_timeout_ms: 30_000,
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::DefaultTimeoutExceedsMax { .. })
        ));
    }
}
