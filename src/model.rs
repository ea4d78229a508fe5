//! Astrocyte Model - parameters, pipeline and substrate bindings in one place
//!
//! Lifecycle:
//!
//! 1. **Configure**: construct from a [`ConstructionMode`], adjust targets.
//! 2. **Realize**: the first bind or probe materializes the pipeline in the
//!    host substrate. From here on the model is sealed and target writes fail
//!    with `AstroError::Sealed`.
//! 3. **Monitor**: probes can be attached at any time after realization.
//!
//! The model keeps substrate handles, not the substrate. Always pass the same
//! substrate the model was first realized into.
//!
//! ```ignore
//! use std::sync::Arc;
//! use astroglia::{AstrocyteModel, CalibrationTable, ConstructionMode, Targets};
//!
//! let table = Arc::new(CalibrationTable::load("data/sic_calibration.csv")?);
//! let targets = Targets { sic_amplitude: Some(40.0), sic_window: Some(300.0), ..Default::default() };
//! let mut astro = AstrocyteModel::new(table, ConstructionMode::Calibrated(targets))?;
//!
//! astro.connect_input(&mut net, pre_neurons, 10)?;
//! astro.connect_output(&mut net, post_neurons, 10)?;
//! let spikes = astro.probe(&mut net, SpikeGeneratorProbe::Spike)?;
//! ```

use std::sync::Arc;

use crate::calibration::CalibrationTable;
use crate::error::Result;
use crate::params::{ConstructionMode, DerivedKnobs, ParameterStore, ParameterTarget};
use crate::pipeline::{CompartmentPipeline, RealizedPipeline};
use crate::probe::{self, ProbeOutput, Selector};
use crate::substrate::{ConnectionHandle, HostSubstrate};

/// One astrocyte
#[derive(Clone, Debug)]
pub struct AstrocyteModel {
    store: ParameterStore,
    realized: Option<RealizedPipeline>,
    pub(crate) input_link: Option<ConnectionHandle>,
    pub(crate) output_link: Option<ConnectionHandle>,
}

impl AstrocyteModel {
    pub fn new(table: Arc<CalibrationTable>, mode: ConstructionMode) -> Result<Self> {
        Ok(Self::from_store(ParameterStore::new(table, mode)?))
    }

    /// Model with default knobs and no targets
    pub fn with_defaults(table: Arc<CalibrationTable>) -> Self {
        Self::from_store(ParameterStore::with_defaults(table))
    }

    pub fn from_store(store: ParameterStore) -> Self {
        Self {
            store,
            realized: None,
            input_link: None,
            output_link: None,
        }
    }

    /// Apply one target write (fails once realized)
    pub fn update_target(&mut self, target: ParameterTarget) -> Result<DerivedKnobs> {
        self.store.update_target(target)
    }

    pub fn set_ip3_sensitivity(&mut self, ms: i64) -> Result<DerivedKnobs> {
        self.store.set_ip3_sensitivity(ms)
    }

    pub fn set_sic_amplitude(&mut self, hz: f64) -> Result<DerivedKnobs> {
        self.store.set_sic_amplitude(hz)
    }

    pub fn set_sic_window(&mut self, ms: f64) -> Result<DerivedKnobs> {
        self.store.set_sic_window(ms)
    }

    pub fn store(&self) -> &ParameterStore {
        &self.store
    }

    /// Structural description for the current knobs
    pub fn pipeline(&self) -> CompartmentPipeline {
        CompartmentPipeline::from_knobs(self.store.knobs())
    }

    /// Materialize the pipeline if that has not happened yet, and seal.
    pub fn realize<S: HostSubstrate + ?Sized>(&mut self, substrate: &mut S) -> Result<RealizedPipeline> {
        if let Some(realized) = self.realized {
            return Ok(realized);
        }

        let realized = self.pipeline().realize(substrate)?;
        self.store.seal();
        self.realized = Some(realized);
        Ok(realized)
    }

    pub fn realized(&self) -> Option<&RealizedPipeline> {
        self.realized.as_ref()
    }

    pub fn is_sealed(&self) -> bool {
        self.store.is_sealed()
    }

    /// Attach probes. Codes are checked before the pipeline is realized, so an
    /// invalid selector never seals the model.
    pub fn probe<S: HostSubstrate + ?Sized>(
        &mut self,
        substrate: &mut S,
        selector: impl Into<Selector>,
    ) -> Result<ProbeOutput> {
        let selector = selector.into();
        selector.ids()?;

        let realized = self.realize(substrate)?;
        probe::attach(substrate, &realized, &selector)
    }

    /// Input connection established by the last `connect_input`
    pub fn input_link(&self) -> Option<ConnectionHandle> {
        self.input_link
    }

    /// Output connection established by the last `connect_output`
    pub fn output_link(&self) -> Option<ConnectionHandle> {
        self.output_link
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::CalibrationEntry;
    use crate::error::AstroError;
    use crate::probe::{SicGeneratorProbe, SpikeGeneratorProbe};
    use crate::substrate::{Endpoint, ProbeRecord, RecordingSubstrate, SignalKind};

    fn table() -> Arc<CalibrationTable> {
        Arc::new(
            CalibrationTable::from_entries(vec![
                CalibrationEntry::new(10.0, 0.5, 5.0, 50.0),
                CalibrationEntry::new(20.0, 0.25, 30.0, 250.0),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn test_realize_once_and_seal() {
        let mut astro = AstrocyteModel::with_defaults(table());
        let mut net = RecordingSubstrate::new();

        let first = astro.realize(&mut net).unwrap();
        let second = astro.realize(&mut net).unwrap();
        assert_eq!(first, second);
        assert_eq!(net.compartments.len(), 4);
        assert!(astro.is_sealed());
        assert!(matches!(astro.set_sic_window(100.0), Err(AstroError::Sealed)));
    }

    #[test]
    fn test_targets_reach_realized_specs() {
        let mut astro = AstrocyteModel::with_defaults(table());
        astro.set_ip3_sensitivity(50).unwrap();
        astro.set_sic_amplitude(30.0).unwrap();
        astro.set_sic_window(250.0).unwrap();

        let mut net = RecordingSubstrate::new();
        let realized = astro.realize(&mut net).unwrap();

        assert_eq!(net.connection(realized.sr_to_ip3).unwrap().link.weight, 50);
        assert_eq!(net.connection(realized.ip3_to_sic).unwrap().link.weight, 20);
        assert_eq!(net.compartment(realized.sic_generator).unwrap().current_decay, 1024);
    }

    #[test]
    fn test_probe_single_and_batch() {
        let mut astro = AstrocyteModel::with_defaults(table());
        let mut net = RecordingSubstrate::new();

        let one = astro.probe(&mut net, SicGeneratorProbe::Voltage).unwrap();
        let realized = *astro.realized().unwrap();
        let handle = match one {
            ProbeOutput::One(h) => h,
            other => panic!("expected single probe, got {:?}", other),
        };
        assert_eq!(
            net.probe_record(handle),
            Some(&ProbeRecord {
                target: Endpoint::Compartment(realized.sic_generator),
                kind: SignalKind::Voltage,
            })
        );

        let many = astro.probe(&mut net, vec![11i64, 3, 5]).unwrap().into_vec();
        assert_eq!(many.len(), 3);
        let kinds: Vec<_> = many
            .iter()
            .map(|h| net.probe_record(*h).unwrap().kind)
            .collect();
        assert_eq!(kinds, vec![SignalKind::Spike, SignalKind::Spike, SignalKind::Voltage]);
        assert_eq!(
            net.probe_record(many[0]).unwrap().target,
            Endpoint::Group(realized.spike_generator)
        );
    }

    #[test]
    fn test_invalid_batch_creates_nothing() {
        let mut astro = AstrocyteModel::with_defaults(table());
        let mut net = RecordingSubstrate::new();

        let result = astro.probe(&mut net, vec![1i64, 2, 12]);
        assert!(matches!(result, Err(AstroError::InvalidSelector(12))));
        assert!(net.probes.is_empty());
        assert!(!astro.is_sealed());

        astro.realize(&mut net).unwrap();
        assert!(astro.probe(&mut net, 0i64).is_err());
        assert!(net.probes.is_empty());
        assert!(astro
            .probe(&mut net, SpikeGeneratorProbe::Spike)
            .is_ok());
    }
}
