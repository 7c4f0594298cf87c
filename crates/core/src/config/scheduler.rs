// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler configuration
//!
//! Loaded from TOML, e.g.
//!
//! ```toml
//! min_period = "20ms"
//! thread_name = "effects"
//! effect_budget = 500
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Tuning knobs of a scheduler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Lower bound on the time between two ticks of the update loop
    #[serde(with = "humantime_serde")]
    pub min_period: Duration,
    /// Name of the update loop thread
    pub thread_name: String,
    /// Maximum deferred effects applied after one operation
    pub effect_budget: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_period: Duration::from_millis(10),
            thread_name: "ranger-scheduler".to_string(),
            effect_budget: 10_000,
        }
    }
}

impl SchedulerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_period(mut self, period: Duration) -> Self {
        self.min_period = period;
        self
    }

    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    pub fn with_effect_budget(mut self, budget: usize) -> Self {
        self.effect_budget = budget;
        self
    }

    /// Parse and validate a TOML document; absent keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thread_name.trim().is_empty() {
            return Err(ConfigError::Invalid("thread_name must not be empty".into()));
        }
        if self.effect_budget == 0 {
            return Err(ConfigError::Invalid("effect_budget must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
