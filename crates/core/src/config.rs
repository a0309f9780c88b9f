//! Dispatcher configuration.

use std::time::Duration;

use crate::error::{DispatchError, Result};
use crate::types::DEFAULT_INKEY_TIMEOUT_MS;

/// Environment variable overriding the key-read timeout, in milliseconds.
pub const INKEY_TIMEOUT_ENV: &str = "KEYCMD_INKEY_TIMEOUT_MS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Bounded wait for each key read. Also the worst-case latency of `stop`.
    pub inkey_timeout: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            inkey_timeout: Duration::from_millis(DEFAULT_INKEY_TIMEOUT_MS),
        }
    }
}

impl DispatchConfig {
    pub fn with_inkey_timeout(mut self, timeout: Duration) -> Self {
        self.inkey_timeout = timeout;
        self
    }

    /// Create from environment variables.
    ///
    /// Unset or blank variables keep their defaults; malformed values are
    /// rejected rather than silently replaced.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`DispatchConfig::from_env`], with a custom variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(raw) = lookup(INKEY_TIMEOUT_ENV) {
            if !raw.trim().is_empty() {
                config.inkey_timeout = parse_timeout_ms(INKEY_TIMEOUT_ENV, &raw)?;
            }
        }
        Ok(config)
    }
}

/// Parse a positive whole number of milliseconds.
///
/// `key` names the setting in the error message (env var or CLI flag).
pub fn parse_timeout_ms(key: &str, raw: &str) -> Result<Duration> {
    let invalid = |reason| DispatchError::InvalidConfig {
        key: key.to_string(),
        value: raw.to_string(),
        reason,
    };

    let ms: u64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid("expected a whole number of milliseconds"))?;
    if ms == 0 {
        return Err(invalid("must be greater than zero"));
    }
    Ok(Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        assert_eq!(
            DispatchConfig::default().inkey_timeout,
            Duration::from_millis(200)
        );
    }

    #[test]
    fn test_lookup_overrides_timeout() {
        let config = DispatchConfig::from_lookup(|key| {
            (key == INKEY_TIMEOUT_ENV).then(|| " 50 ".to_string())
        })
        .unwrap();
        assert_eq!(config.inkey_timeout, Duration::from_millis(50));
    }

    #[test]
    fn test_blank_or_missing_keeps_default() {
        let unset = DispatchConfig::from_lookup(|_| None).unwrap();
        let blank = DispatchConfig::from_lookup(|_| Some("  ".to_string())).unwrap();
        assert_eq!(unset, DispatchConfig::default());
        assert_eq!(blank, DispatchConfig::default());
    }

    #[test]
    fn test_malformed_timeout_fails_fast() {
        let err = DispatchConfig::from_lookup(|_| Some("fast".to_string())).unwrap_err();
        match err {
            DispatchError::InvalidConfig { key, value, .. } => {
                assert_eq!(key, INKEY_TIMEOUT_ENV);
                assert_eq!(value, "fast");
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(matches!(
            parse_timeout_ms("--timeout-ms", "0"),
            Err(DispatchError::InvalidConfig { .. })
        ));
        assert!(parse_timeout_ms("--timeout-ms", "-5").is_err());
    }

    #[test]
    fn test_error_message_names_the_setting() {
        let err = parse_timeout_ms("--timeout-ms", "0").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid --timeout-ms value \"0\": must be greater than zero"
        );
    }
}
