//! Configuration of the recovery protocol.

use std::time::Duration;

use crate::Publisher;
use crate::resolver::DEFAULT_LOOKUP_TIMEOUT;

/// Node-level settings for recovering pinned chunks.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct RecoveryConfig {
    /// Publisher of the content-scoped fallback feeds.
    pub fallback_publisher: Option<Publisher>,
    /// Upper bound on a single recovery feed lookup.
    #[cfg_attr(feature = "serde", serde(with = "millis"))]
    pub lookup_timeout: Duration,
}

impl RecoveryConfig {
    /// Sets the fallback publisher.
    #[must_use]
    pub fn with_fallback_publisher(mut self, publisher: impl Into<Publisher>) -> Self {
        self.fallback_publisher = Some(publisher.into());
        self
    }

    /// Sets the lookup timeout.
    #[must_use]
    pub const fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            fallback_publisher: None,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }
}

#[cfg(feature = "serde")]
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RecoveryConfig::default();
        assert_eq!(config.lookup_timeout, Duration::from_millis(100));
        assert!(config.fallback_publisher.is_none());
    }

    #[test]
    fn test_builder() {
        let config = RecoveryConfig::default()
            .with_fallback_publisher("02aa")
            .with_lookup_timeout(Duration::from_secs(1));
        assert_eq!(config.fallback_publisher, Some(Publisher::new("02aa")));
        assert_eq!(config.lookup_timeout, Duration::from_secs(1));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde() {
        let config: RecoveryConfig =
            serde_json::from_str(r#"{"fallback-publisher": "02aa", "lookup-timeout": 250}"#)
                .unwrap();
        assert_eq!(config.fallback_publisher, Some(Publisher::new("02aa")));
        assert_eq!(config.lookup_timeout, Duration::from_millis(250));

        let defaulted: RecoveryConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(defaulted, RecoveryConfig::default());
    }
}
