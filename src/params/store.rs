//! Parameter Store - raw knobs plus the targets they are derived from
//!
//! Every target write goes through [`ParameterStore::update_target`]:
//! validate, derive a complete new [`DerivedKnobs`] snapshot, then commit it
//! with a single assignment. A failed write leaves the store untouched.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{validate, ParameterTarget, RawKnobs, Targets};
use crate::calibration::{search, CalibrationMatch, CalibrationTable};
use crate::error::{AstroError, Result};

/// How an astrocyte is configured at construction
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ConstructionMode {
    /// Hardware knobs only
    Raw(RawKnobs),
    /// Targets over default knobs
    Calibrated(Targets),
    /// Targets over caller-supplied knobs
    Mixed(RawKnobs, Targets),
}

impl Default for ConstructionMode {
    fn default() -> Self {
        Self::Raw(RawKnobs::default())
    }
}

impl ConstructionMode {
    fn split(self) -> Result<(RawKnobs, Targets)> {
        match self {
            Self::Raw(knobs) => Ok((knobs, Targets::default())),
            Self::Calibrated(targets) => {
                if targets.is_empty() {
                    return Err(AstroError::Config(
                        "calibrated construction needs at least one target".to_string(),
                    ));
                }
                Ok((RawKnobs::default(), targets))
            }
            Self::Mixed(knobs, targets) => Ok((knobs, targets)),
        }
    }
}

/// Complete, consistent configuration snapshot
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DerivedKnobs {
    pub knobs: RawKnobs,
    pub targets: Targets,
    /// Row chosen by the last SIC calibration, if any
    pub calibration: Option<CalibrationMatch>,
}

/// Holder of all astrocyte knobs
#[derive(Clone, Debug)]
pub struct ParameterStore {
    table: Arc<CalibrationTable>,
    current: DerivedKnobs,
    sealed: bool,
}

impl ParameterStore {
    /// Build a store, applying targets over the knobs in the order
    /// ip3 sensitivity, SIC amplitude, SIC window.
    pub fn new(table: Arc<CalibrationTable>, mode: ConstructionMode) -> Result<Self> {
        let (knobs, targets) = mode.split()?;

        let mut store = Self {
            table,
            current: DerivedKnobs {
                knobs,
                targets: Targets::default(),
                calibration: None,
            },
            sealed: false,
        };

        for target in targets.writes() {
            store.update_target(target)?;
        }

        Ok(store)
    }

    /// Store with default knobs and no targets
    pub fn with_defaults(table: Arc<CalibrationTable>) -> Self {
        Self {
            table,
            current: DerivedKnobs {
                knobs: RawKnobs::default(),
                targets: Targets::default(),
                calibration: None,
            },
            sealed: false,
        }
    }

    /// Apply one target write and return the resulting snapshot
    pub fn update_target(&mut self, target: ParameterTarget) -> Result<DerivedKnobs> {
        if self.sealed {
            return Err(AstroError::Sealed);
        }
        validate(&target)?;

        let next = self.derive(target);
        self.current = next;
        Ok(next)
    }

    fn derive(&self, target: ParameterTarget) -> DerivedKnobs {
        let mut next = self.current;
        next.targets.record(target);

        match target {
            ParameterTarget::Ip3Sensitivity(v) => {
                next.knobs.sr_to_ip3_weight = v as i32;
            }
            ParameterTarget::SicAmplitude(_) | ParameterTarget::SicWindow(_) => {
                if let Some((amplitude, window)) = next.targets.sic_pair() {
                    let hit = search(&self.table, amplitude, window);
                    next.knobs.ip3_to_sic_weight = hit.weight_hw();
                    next.knobs.sic_generator.current_decay = hit.decay_hw();
                    next.calibration = Some(hit);
                    log::debug!(
                        "SIC target ({} Hz, {} ms) -> weight {} decay {}",
                        amplitude,
                        window,
                        next.knobs.ip3_to_sic_weight,
                        next.knobs.sic_generator.current_decay
                    );
                }
            }
        }

        next
    }

    pub fn set_ip3_sensitivity(&mut self, ms: i64) -> Result<DerivedKnobs> {
        self.update_target(ParameterTarget::Ip3Sensitivity(ms))
    }

    pub fn set_sic_amplitude(&mut self, hz: f64) -> Result<DerivedKnobs> {
        self.update_target(ParameterTarget::SicAmplitude(hz))
    }

    pub fn set_sic_window(&mut self, ms: f64) -> Result<DerivedKnobs> {
        self.update_target(ParameterTarget::SicWindow(ms))
    }

    pub fn knobs(&self) -> &RawKnobs {
        &self.current.knobs
    }

    pub fn targets(&self) -> &Targets {
        &self.current.targets
    }

    pub fn snapshot(&self) -> DerivedKnobs {
        self.current
    }

    pub fn ip3_sensitivity(&self) -> Option<i64> {
        self.current.targets.ip3_sensitivity
    }

    pub fn sic_amplitude(&self) -> Option<f64> {
        self.current.targets.sic_amplitude
    }

    pub fn sic_window(&self) -> Option<f64> {
        self.current.targets.sic_window
    }

    pub fn table(&self) -> &Arc<CalibrationTable> {
        &self.table
    }

    /// Refuse further target writes
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::CalibrationEntry;
    use crate::params::{HomeostasisSpec, StageKnobs};

    fn table() -> Arc<CalibrationTable> {
        Arc::new(
            CalibrationTable::from_entries(vec![
                CalibrationEntry::new(10.0, 0.5, 5.0, 50.0),
                CalibrationEntry::new(20.0, 0.25, 30.0, 250.0),
                CalibrationEntry::new(30.0, 0.125, 80.0, 500.0),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn test_ip3_sensitivity_maps_to_weight() {
        let mut store = ParameterStore::with_defaults(table());
        let derived = store.set_ip3_sensitivity(37).unwrap();

        assert_eq!(derived.knobs.sr_to_ip3_weight, 37);
        assert_eq!(store.ip3_sensitivity(), Some(37));
        assert_eq!(store.knobs().sr_to_ip3_weight, 37);
    }

    #[test]
    fn test_single_sic_target_does_not_calibrate() {
        let mut store = ParameterStore::with_defaults(table());
        let before = *store.knobs();

        store.set_sic_amplitude(30.0).unwrap();
        assert_eq!(*store.knobs(), before);
        assert_eq!(store.sic_amplitude(), Some(30.0));
        assert!(store.snapshot().calibration.is_none());
    }

    #[test]
    fn test_sic_pair_calibrates() {
        let mut store = ParameterStore::with_defaults(table());
        store.set_sic_amplitude(30.0).unwrap();
        let derived = store.set_sic_window(250.0).unwrap();

        assert_eq!(derived.knobs.ip3_to_sic_weight, 20);
        assert_eq!(derived.knobs.sic_generator.current_decay, 1024);
        assert_eq!(derived.calibration.map(|c| c.index), Some(1));
    }

    #[test]
    fn test_sic_order_independent() {
        let mut a = ParameterStore::with_defaults(table());
        a.set_sic_amplitude(70.0).unwrap();
        a.set_sic_window(400.0).unwrap();

        let mut b = ParameterStore::with_defaults(table());
        b.set_sic_window(400.0).unwrap();
        b.set_sic_amplitude(70.0).unwrap();

        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_reset_same_value_idempotent() {
        let mut store = ParameterStore::with_defaults(table());
        store.set_ip3_sensitivity(12).unwrap();
        store.set_sic_amplitude(70.0).unwrap();
        store.set_sic_window(400.0).unwrap();
        let before = store.snapshot();

        store.set_sic_window(400.0).unwrap();
        store.set_ip3_sensitivity(12).unwrap();
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_failed_write_leaves_store_untouched() {
        let mut store = ParameterStore::with_defaults(table());
        store.set_sic_amplitude(30.0).unwrap();
        store.set_sic_window(250.0).unwrap();
        let before = store.snapshot();

        assert!(matches!(
            store.set_sic_window(609.0),
            Err(AstroError::Validation { .. })
        ));
        assert!(store.set_ip3_sensitivity(0).is_err());
        assert!(store.set_sic_amplitude(357.0).is_err());
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_raw_mode_preserves_knobs() {
        let knobs = RawKnobs {
            spike_receiver: StageKnobs::new(123, 7, 8),
            receiver_homeostasis: HomeostasisSpec {
                enabled: true,
                gain: 3,
                ..HomeostasisSpec::default()
            },
            sr_to_ip3_weight: 55,
            ip3_to_sic_weight: 66,
            ..RawKnobs::default()
        };
        let store = ParameterStore::new(table(), ConstructionMode::Raw(knobs)).unwrap();

        assert_eq!(*store.knobs(), knobs);
        assert!(store.targets().is_empty());
    }

    #[test]
    fn test_mixed_mode_targets_override_knobs() {
        let knobs = RawKnobs {
            sr_to_ip3_weight: 55,
            ip3_to_sic_weight: 66,
            ..RawKnobs::default()
        };
        let targets = Targets {
            ip3_sensitivity: Some(9),
            sic_amplitude: Some(5.0),
            sic_window: Some(50.0),
        };
        let store = ParameterStore::new(table(), ConstructionMode::Mixed(knobs, targets)).unwrap();

        assert_eq!(store.knobs().sr_to_ip3_weight, 9);
        assert_eq!(store.knobs().ip3_to_sic_weight, 10);
        assert_eq!(store.knobs().sic_generator.current_decay, 2048);
        assert_eq!(store.knobs().spike_generator, knobs.spike_generator);
    }

    #[test]
    fn test_calibrated_mode_validates_targets() {
        let targets = Targets {
            sic_amplitude: Some(400.0),
            ..Targets::default()
        };
        let result = ParameterStore::new(table(), ConstructionMode::Calibrated(targets));
        assert!(matches!(result, Err(AstroError::Validation { .. })));

        let empty = ParameterStore::new(table(), ConstructionMode::Calibrated(Targets::default()));
        assert!(matches!(empty, Err(AstroError::Config(_))));
    }

    #[test]
    fn test_sealed_store_rejects_writes() {
        let mut store = ParameterStore::with_defaults(table());
        store.seal();
        assert!(matches!(store.set_ip3_sensitivity(10), Err(AstroError::Sealed)));
        assert_eq!(store.ip3_sensitivity(), None);
    }
}
