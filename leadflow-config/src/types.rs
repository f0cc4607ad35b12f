//! Strongly typed pipeline configuration

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default directory the file backend writes to, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = ".leadflow";

/// How persistence calls simulate a network round trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LatencySetting {
    /// Per-operation delays between 200 and 800 ms
    #[default]
    Nominal,
    /// The same delay for every call
    Fixed { ms: u64 },
    /// A uniformly random delay in `min_ms..=max_ms`
    Random { min_ms: u64, max_ms: u64 },
    /// No delay at all
    None,
}

/// Settings consumed when building a pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding the persisted collections
    pub data_dir: PathBuf,
    /// Simulated latency for persistence calls
    pub latency: LatencySetting,
    /// Actor stamped on audit log entries
    pub actor: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            latency: LatencySetting::default(),
            actor: None,
        }
    }
}

impl PipelineConfig {
    /// Reject values that would leave the engine unusable
    pub fn validate(&self) -> ConfigResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::validation("data_dir must not be empty"));
        }
        if let LatencySetting::Random { min_ms, max_ms } = self.latency {
            if min_ms > max_ms {
                return Err(ConfigError::validation(format!(
                    "latency range is empty: {min_ms} > {max_ms}"
                )));
            }
        }
        if let Some(actor) = &self.actor {
            if actor.trim().is_empty() {
                return Err(ConfigError::validation("actor must not be blank"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.data_dir, PathBuf::from(".leadflow"));
        assert_eq!(config.latency, LatencySetting::Nominal);
        assert!(config.actor.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_latency_setting_serde() {
        let fixed: LatencySetting = serde_json::from_str(r#"{"fixed": {"ms": 50}}"#).unwrap();
        assert_eq!(fixed, LatencySetting::Fixed { ms: 50 });

        let none: LatencySetting = serde_json::from_str(r#""none""#).unwrap();
        assert_eq!(none, LatencySetting::None);
    }

    #[test]
    fn test_inverted_random_range_rejected() {
        let config = PipelineConfig {
            latency: LatencySetting::Random {
                min_ms: 800,
                max_ms: 200,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_actor_rejected() {
        let config = PipelineConfig {
            actor: Some("  ".into()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError { .. })
        ));
    }
}
