//! Physiological Targets - validated intents that override raw knobs

use serde::{Deserialize, Serialize};

use crate::error::{AstroError, Result};

/// IP3 sensitivity range (ms between integrator spikes)
pub const IP3_SENSITIVITY_RANGE: (i64, i64) = (1, 100);
/// SIC amplitude range (max spike generator rate, Hz)
pub const SIC_AMPLITUDE_RANGE: (f64, f64) = (0.0, 356.0);
/// SIC window range (spike generator firing window, ms)
pub const SIC_WINDOW_RANGE: (f64, f64) = (0.0, 608.0);

/// Which target a write addresses
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    Ip3Sensitivity,
    SicAmplitude,
    SicWindow,
}

impl TargetKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ip3Sensitivity => "ip3_sensitivity",
            Self::SicAmplitude => "sic_amplitude",
            Self::SicWindow => "sic_window",
        }
    }

    /// Inclusive bounds
    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::Ip3Sensitivity => (
                IP3_SENSITIVITY_RANGE.0 as f64,
                IP3_SENSITIVITY_RANGE.1 as f64,
            ),
            Self::SicAmplitude => SIC_AMPLITUDE_RANGE,
            Self::SicWindow => SIC_WINDOW_RANGE,
        }
    }
}

/// A single target write
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ParameterTarget {
    /// Integrator spike gap in ms
    Ip3Sensitivity(i64),
    /// Spike generator max firing rate in Hz
    SicAmplitude(f64),
    /// Spike generator firing window in ms
    SicWindow(f64),
}

impl ParameterTarget {
    pub fn kind(&self) -> TargetKind {
        match self {
            Self::Ip3Sensitivity(_) => TargetKind::Ip3Sensitivity,
            Self::SicAmplitude(_) => TargetKind::SicAmplitude,
            Self::SicWindow(_) => TargetKind::SicWindow,
        }
    }

    pub fn value(&self) -> f64 {
        match *self {
            Self::Ip3Sensitivity(v) => v as f64,
            Self::SicAmplitude(v) | Self::SicWindow(v) => v,
        }
    }
}

/// Check a target against its documented range. Pure; touches no state.
pub fn validate(target: &ParameterTarget) -> Result<()> {
    let kind = target.kind();
    let (min, max) = kind.range();
    let value = target.value();

    // NaN fails both comparisons, so test for membership rather than exclusion
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(AstroError::Validation {
            field: kind.name(),
            value,
            min,
            max,
        })
    }
}

/// Cached target values; `None` means "not requested"
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Targets {
    pub ip3_sensitivity: Option<i64>,
    pub sic_amplitude: Option<f64>,
    pub sic_window: Option<f64>,
}

impl Targets {
    pub fn is_empty(&self) -> bool {
        self.ip3_sensitivity.is_none() && self.sic_amplitude.is_none() && self.sic_window.is_none()
    }

    /// Present targets in application order
    pub fn writes(&self) -> Vec<ParameterTarget> {
        let mut writes = Vec::with_capacity(3);
        if let Some(v) = self.ip3_sensitivity {
            writes.push(ParameterTarget::Ip3Sensitivity(v));
        }
        if let Some(v) = self.sic_amplitude {
            writes.push(ParameterTarget::SicAmplitude(v));
        }
        if let Some(v) = self.sic_window {
            writes.push(ParameterTarget::SicWindow(v));
        }
        writes
    }

    pub(crate) fn record(&mut self, target: ParameterTarget) {
        match target {
            ParameterTarget::Ip3Sensitivity(v) => self.ip3_sensitivity = Some(v),
            ParameterTarget::SicAmplitude(v) => self.sic_amplitude = Some(v),
            ParameterTarget::SicWindow(v) => self.sic_window = Some(v),
        }
    }

    /// (amplitude, window) once both are known
    pub fn sic_pair(&self) -> Option<(f64, f64)> {
        Some((self.sic_amplitude?, self.sic_window?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(target: ParameterTarget) -> bool {
        matches!(validate(&target), Err(AstroError::Validation { .. }))
    }

    #[test]
    fn test_ip3_sensitivity_bounds() {
        assert!(validate(&ParameterTarget::Ip3Sensitivity(1)).is_ok());
        assert!(validate(&ParameterTarget::Ip3Sensitivity(100)).is_ok());
        assert!(rejected(ParameterTarget::Ip3Sensitivity(0)));
        assert!(rejected(ParameterTarget::Ip3Sensitivity(101)));
        assert!(rejected(ParameterTarget::Ip3Sensitivity(-5)));
    }

    #[test]
    fn test_sic_amplitude_bounds() {
        assert!(validate(&ParameterTarget::SicAmplitude(0.0)).is_ok());
        assert!(validate(&ParameterTarget::SicAmplitude(356.0)).is_ok());
        assert!(rejected(ParameterTarget::SicAmplitude(357.0)));
        assert!(rejected(ParameterTarget::SicAmplitude(-0.5)));
        assert!(rejected(ParameterTarget::SicAmplitude(f64::NAN)));
    }

    #[test]
    fn test_sic_window_bounds() {
        assert!(validate(&ParameterTarget::SicWindow(0.0)).is_ok());
        assert!(validate(&ParameterTarget::SicWindow(608.0)).is_ok());
        assert!(rejected(ParameterTarget::SicWindow(609.0)));
    }

    #[test]
    fn test_validation_error_names_field() {
        let err = validate(&ParameterTarget::SicWindow(609.0)).unwrap_err();
        assert!(err.to_string().contains("sic_window"));
    }

    #[test]
    fn test_writes_order() {
        let targets = Targets {
            ip3_sensitivity: Some(10),
            sic_amplitude: None,
            sic_window: Some(300.0),
        };
        assert_eq!(
            targets.writes(),
            vec![
                ParameterTarget::Ip3Sensitivity(10),
                ParameterTarget::SicWindow(300.0)
            ]
        );
        assert_eq!(targets.sic_pair(), None);
    }
}
