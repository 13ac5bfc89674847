//! Engine configuration.
//!
//! ```toml
//! # abort swaps that cross more initialized ticks than this
//! max_crossed_ticks = 64
//! # collect the per-step fee breakdown in `SwapResult::steps`
//! record_steps = true
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Ceiling on initialized ticks crossed by a single swap. `None` leaves
    /// swaps unbounded.
    pub max_crossed_ticks: Option<u32>,
    pub record_steps: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_crossed_ticks: None,
            record_steps: true,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn with_max_crossed_ticks(mut self, limit: u32) -> Self {
        self.max_crossed_ticks = Some(limit);
        self
    }
}
