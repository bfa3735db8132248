//! Configuration for the classifier and its tool-choice selector (§4.I).

use crate::tool_choice::ToolChoiceConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for the language-model classifier. `validate()` collects every
/// offending field instead of failing on the first one, so misconfiguration
/// is reported in full.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub temperature: f32,
    pub max_tokens: u32,
    #[serde(with = "duration_millis")]
    pub timeout: Duration,
    pub max_retries: u32,
    #[serde(with = "duration_millis")]
    pub retry_backoff: Duration,
    #[serde(with = "duration_millis")]
    pub cache_ttl: Duration,
    pub cache_max_size: usize,
    pub confidence_threshold: f64,
    pub fallback_to_pattern: bool,
    /// Upper bound on concurrent model calls. `0` disables the cap.
    pub max_concurrent: usize,
    pub tool_choice: ToolChoiceConfig,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            max_tokens: 256,
            timeout: Duration::from_secs(5),
            max_retries: 2,
            retry_backoff: Duration::from_millis(100),
            cache_ttl: Duration::from_secs(600),
            cache_max_size: 1000,
            confidence_threshold: 0.7,
            fallback_to_pattern: true,
            max_concurrent: 10,
            tool_choice: ToolChoiceConfig::default(),
        }
    }
}

impl ClassifierConfig {
    /// Validate every field, returning `Configuration` with every offending
    /// field named, not just the first.
    pub fn validate(&self) -> Result<(), crate::error::ClassifierError> {
        let mut errors = Vec::new();

        if !(0.0..=1.0).contains(&self.temperature) {
            errors.push(format!("temperature must be within [0.0, 1.0], got {}", self.temperature));
        }
        if self.max_tokens == 0 {
            errors.push("max_tokens must be greater than zero".to_string());
        }
        if self.timeout.is_zero() {
            errors.push("timeout must be greater than zero".to_string());
        }
        if self.cache_max_size == 0 {
            errors.push("cache_max_size must be greater than zero".to_string());
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            errors.push(format!(
                "confidence_threshold must be within [0.0, 1.0], got {}",
                self.confidence_threshold
            ));
        }
        if !(0.0..=1.0).contains(&self.tool_choice.force_threshold) {
            errors.push(format!(
                "tool_choice.force_threshold must be within [0.0, 1.0], got {}",
                self.tool_choice.force_threshold
            ));
        }
        if !(0.0..=1.0).contains(&self.tool_choice.require_threshold) {
            errors.push(format!(
                "tool_choice.require_threshold must be within [0.0, 1.0], got {}",
                self.tool_choice.require_threshold
            ));
        }
        if self.tool_choice.require_threshold > self.tool_choice.force_threshold {
            errors.push("tool_choice.require_threshold must not exceed force_threshold".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(crate::error::ClassifierError::Configuration(errors))
        }
    }

    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_cache_max_size(mut self, size: usize) -> Self {
        self.cache_max_size = size;
        self
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ClassifierConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_collects_every_offending_field() {
        let config = ClassifierConfig {
            temperature: 5.0,
            max_tokens: 0,
            confidence_threshold: 2.0,
            ..ClassifierConfig::default()
        };
        let err = config.validate().unwrap_err();
        match err {
            crate::error::ClassifierError::Configuration(messages) => {
                assert_eq!(messages.len(), 3);
            }
            other => panic!("expected Configuration error, got {other:?}"),
        }
    }

    #[test]
    fn max_concurrent_zero_disables_cap_and_is_valid() {
        let config = ClassifierConfig {
            max_concurrent: 0,
            ..ClassifierConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn temperature_above_one_is_rejected() {
        let config = ClassifierConfig {
            temperature: 1.5,
            ..ClassifierConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn builder_methods_override_defaults() {
        let config = ClassifierConfig::default()
            .with_confidence_threshold(0.9)
            .with_max_retries(5)
            .with_cache_max_size(50);
        assert_eq!(config.confidence_threshold, 0.9);
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.cache_max_size, 50);
    }
}
