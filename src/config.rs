//! Astrocyte Configuration - JSON description of how to construct a model
//!
//! ```json
//! {
//!   "knobs": { "sr_to_ip3_weight": 30 },
//!   "targets": { "sic_amplitude": 40.0, "sic_window": 300.0 }
//! }
//! ```
//!
//! | knobs | targets | Mode |
//! |-------|---------|------|
//! | - | - | `Raw(defaults)` |
//! | set | - | `Raw(knobs)` |
//! | - | set | `Calibrated(targets)` |
//! | set | set | `Mixed(knobs, targets)` |
//!
//! Missing knob fields fall back to the hardware defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AstroError, Result};
use crate::params::{ConstructionMode, RawKnobs, Targets};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AstrocyteConfig {
    pub knobs: Option<RawKnobs>,
    pub targets: Option<Targets>,
}

impl AstrocyteConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| AstroError::Config(e.to_string()))
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        log::debug!("Read astrocyte config from {}", path.display());
        serde_json::from_str(&text)
            .map_err(|e| AstroError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| AstroError::Config(e.to_string()))
    }

    /// Overlay `targets` onto whatever targets the config already carries
    pub fn merge_targets(&mut self, targets: Targets) {
        let current = self.targets.get_or_insert_with(Targets::default);
        if targets.ip3_sensitivity.is_some() {
            current.ip3_sensitivity = targets.ip3_sensitivity;
        }
        if targets.sic_amplitude.is_some() {
            current.sic_amplitude = targets.sic_amplitude;
        }
        if targets.sic_window.is_some() {
            current.sic_window = targets.sic_window;
        }
    }

    /// An empty `targets` object counts as no targets
    pub fn into_mode(self) -> ConstructionMode {
        let targets = self.targets.filter(|t| !t.is_empty());
        match (self.knobs, targets) {
            (knobs, None) => ConstructionMode::Raw(knobs.unwrap_or_default()),
            (None, Some(targets)) => ConstructionMode::Calibrated(targets),
            (Some(knobs), Some(targets)) => ConstructionMode::Mixed(knobs, targets),
        }
    }
}
