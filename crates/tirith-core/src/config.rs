// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use crate::error::{ConfigError, ConfigResult};
use crate::navigator::TransitionTiming;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_PATH_ENV: &str = "TIRITH_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TirithConfig {
    pub seed: u64,
    pub catalog: Option<PathBuf>,
    pub timing: TimingConfig,
    pub storage: StorageConfig,
    pub insight: InsightConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub exit_delay_ms: u64,
    pub settle_delay_ms: u64,
    pub explode_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    pub endpoint: String,
    pub fast_model: String,
    pub deep_model: String,
    pub thinking_budget: u32,
    pub timeout_seconds: u64,
    /// Environment variables searched, in order, for the API key.
    pub api_key_env: Vec<String>,
}

impl Default for TirithConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            catalog: None,
            timing: TimingConfig::default(),
            storage: StorageConfig::default(),
            insight: InsightConfig::default(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            exit_delay_ms: 300,
            settle_delay_ms: 50,
            explode_delay_ms: 450,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".tirith/storage.json"),
        }
    }
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            fast_model: "gemini-2.5-flash-lite-latest".to_string(),
            deep_model: "gemini-3-pro-preview".to_string(),
            thinking_budget: 1024,
            timeout_seconds: 60,
            api_key_env: vec!["API_KEY".to_string(), "GEMINI_API_KEY".to_string()],
        }
    }
}

impl TimingConfig {
    pub fn to_timing(&self) -> TransitionTiming {
        TransitionTiming {
            exit_delay: Duration::from_millis(self.exit_delay_ms),
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            explode_delay: Duration::from_millis(self.explode_delay_ms),
        }
    }
}

impl InsightConfig {
    pub fn api_key(&self) -> Option<String> {
        self.api_key_env
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|value| !value.trim().is_empty())
    }
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl TirithConfig {
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: TirithConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::ConfigFileError {
                path: path.as_ref().display().to_string(),
                source,
            })?;
        Self::from_toml_str(&content)
    }
    /// Explicit path, then `TIRITH_CONFIG`, then defaults.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = path {
            return Self::from_toml_file(path);
        }
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(env_path) if !env_path.is_empty() => Self::from_toml_file(env_path),
            _ => Ok(Self::default()),
        }
    }
    pub fn validate(&self) -> ConfigResult<()> {
        if self.insight.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "insight.timeout_seconds".to_string(),
                value: "0".to_string(),
            });
        }
        for (field, value) in [
            ("insight.fast_model", &self.insight.fast_model),
            ("insight.deep_model", &self.insight.deep_model),
            ("insight.endpoint", &self.insight.endpoint),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingRequiredConfig {
                    field: field.to_string(),
                });
            }
        }
        if self.storage.path.as_os_str().is_empty() {
            return Err(ConfigError::MissingRequiredConfig {
                field: "storage.path".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = TirithConfig::from_toml_str(
            r#"
seed = 9

[timing]
explode_delay_ms = 0

[insight]
deep_model = "gemini-2.5-pro"
"#,
        )
        .unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.timing.exit_delay_ms, 300);
        assert_eq!(config.timing.to_timing().explode_delay, Duration::ZERO);
        assert_eq!(config.insight.deep_model, "gemini-2.5-pro");
        assert_eq!(config.insight.fast_model, "gemini-2.5-flash-lite-latest");
    }

    #[test]
    fn test_validation_rejects_zero_timeout_and_blank_model() {
        assert!(matches!(
            TirithConfig::from_toml_str("[insight]\ntimeout_seconds = 0\n"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            TirithConfig::from_toml_str("[insight]\nfast_model = \"  \"\n"),
            Err(ConfigError::MissingRequiredConfig { .. })
        ));
    }

    #[test]
    fn test_default_timing_matches_navigator_default() {
        assert_eq!(
            TimingConfig::default().to_timing(),
            TransitionTiming::default()
        );
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = TirithConfig::from_toml_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::ConfigFileError { .. }));
    }
}
