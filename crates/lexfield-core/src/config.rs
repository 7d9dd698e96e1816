//! Field configuration and its defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FieldError, Result};

/// Rounds before a settle observation reads the engine: one microtask plus two frames.
pub const DEFAULT_SETTLE_ROUNDS: u32 = 3;

/// Ceiling on how long a coalesced emit may wait for idle time.
pub const DEFAULT_EMIT_TIMEOUT_MS: u64 = 500;

/// Per-field synchronisation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldConfig {
    /// Scheduling rounds to wait after an apply before capturing the settled state.
    ///
    /// Engines whose post-load transforms span more rounds than this will leak
    /// normalisation noise out as user edits.
    pub settle_rounds: u32,
    /// Maximum delay for a coalesced emit, in milliseconds.
    pub emit_timeout_ms: u64,
    /// Whether the host offers idle-time scheduling. When false every emit is synchronous.
    pub idle_scheduling: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            settle_rounds: DEFAULT_SETTLE_ROUNDS,
            emit_timeout_ms: DEFAULT_EMIT_TIMEOUT_MS,
            idle_scheduling: true,
        }
    }
}

impl FieldConfig {
    /// Parse a config from JSON, filling missing keys with defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.settle_rounds == 0 {
            return Err(FieldError::Config(
                "settleRounds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn emit_timeout(&self) -> Duration {
        Duration::from_millis(self.emit_timeout_ms)
    }
}
