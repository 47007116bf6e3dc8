use gymui_core::Fallback;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Per-environment settings. Every field is optional in JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Width of the simulated screen in pixels. Actions in `[-1, 1]` are
    /// mapped onto `0..screen_width`.
    pub screen_width: u32,
    pub screen_height: u32,
    /// Episode length. `0` never ends an episode.
    pub max_steps: u64,
    /// Routing for clicks that hit nothing.
    pub fallback: Fallback,
    /// Attach the per-index state layout to every `StepInfo`.
    pub export_states_info: bool,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            screen_width: 800,
            screen_height: 600,
            max_steps: 0,
            fallback: Fallback::None,
            export_states_info: false,
        }
    }
}

impl EnvConfig {
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
