//! Feedforward NAN - a neuron-astrocyte network built from weighted masks
//!
//! ```text
//!   spike source (pre) ──random mask──▶ post neurons
//!          │                                 ▲
//!          └──▶ astrocyte ───────────────────┘
//! ```
//!
//! The presynaptic population replays Poisson spike trains. Every pre unit
//! drives the astrocyte, and the astrocyte drives every post unit.

use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::analysis::poisson_spike_times;
use crate::calibration::CalibrationTable;
use crate::error::{AstroError, Result};
use crate::matrix::{ConnectionMatrix, MatrixArg};
use crate::model::AstrocyteModel;
use crate::params::{CompartmentSpec, ConstructionMode, LinkSpec, StageKnobs};
use crate::probe::{ProbeOutput, Selector};
use crate::substrate::{ConnectionHandle, GroupHandle, HostSubstrate, ProbeHandle, SignalKind};
use crate::topology::{DEFAULT_INPUT_WEIGHT, DEFAULT_OUTPUT_WEIGHT};

/// Network layout and population settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedforwardNanConfig {
    /// Presynaptic units
    pub pre_count: usize,
    /// Postsynaptic neurons
    pub post_count: usize,
    /// Mean presynaptic firing rate (Hz)
    pub pre_rate_hz: f64,
    /// Weight of each present pre→post connection
    pub pre_post_weight: i32,
    /// Probability that a given pre→post connection exists
    pub connection_probability: f64,
    pub post_v_th_mant: i32,
    pub post_current_decay: i32,
    pub post_voltage_decay: i32,
    /// Length of the generated spike trains (ms)
    pub sim_time_ms: usize,
    pub astrocyte_input_weight: i32,
    pub astrocyte_output_weight: i32,
    pub astrocyte: ConstructionMode,
}

impl Default for FeedforwardNanConfig {
    fn default() -> Self {
        Self {
            pre_count: 50,
            post_count: 50,
            pre_rate_hz: 10.0,
            pre_post_weight: 10,
            connection_probability: 0.1,
            post_v_th_mant: 100,
            post_current_decay: 409,
            post_voltage_decay: 1024,
            sim_time_ms: 30_000,
            astrocyte_input_weight: DEFAULT_INPUT_WEIGHT,
            astrocyte_output_weight: DEFAULT_OUTPUT_WEIGHT,
            astrocyte: ConstructionMode::default(),
        }
    }
}

impl FeedforwardNanConfig {
    fn check(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.connection_probability) {
            return Err(AstroError::Config(format!(
                "connection_probability {} outside [0, 1]",
                self.connection_probability
            )));
        }
        if self.pre_rate_hz.is_nan() || self.pre_rate_hz < 0.0 {
            return Err(AstroError::Config(format!(
                "pre_rate_hz {} must be non-negative",
                self.pre_rate_hz
            )));
        }
        Ok(())
    }

    pub fn post_spec(&self) -> CompartmentSpec {
        CompartmentSpec::spiking(StageKnobs::new(
            self.post_v_th_mant,
            self.post_current_decay,
            self.post_voltage_decay,
        ))
    }
}

/// A built network
#[derive(Clone, Debug)]
pub struct FeedforwardNan {
    pub config: FeedforwardNanConfig,
    /// Spike times replayed by each presynaptic unit
    pub spike_times: Vec<Vec<u32>>,
    pub pre_neurons: GroupHandle,
    pub post_neurons: GroupHandle,
    /// 0/1 mask of shape `(post, pre)`
    pub pre_post_mask: ConnectionMatrix,
    pub pre_to_post: ConnectionHandle,
    pub astrocyte: AstrocyteModel,
}

impl FeedforwardNan {
    /// Build the network into `substrate`.
    ///
    /// Creation order: spike source, post group, astrocyte pipeline (on the
    /// input bind), pre→post link, astrocyte input, astrocyte output.
    pub fn build<S, R>(
        substrate: &mut S,
        table: Arc<CalibrationTable>,
        config: FeedforwardNanConfig,
        rng: &mut R,
    ) -> Result<Self>
    where
        S: HostSubstrate + ?Sized,
        R: Rng + ?Sized,
    {
        config.check()?;

        let spike_times =
            poisson_spike_times(rng, config.pre_count, config.sim_time_ms, config.pre_rate_hz);
        let pre_neurons = substrate.create_spike_source(&spike_times)?;
        let post_neurons = substrate.create_group(config.post_count, &config.post_spec())?;

        let mut astrocyte = AstrocyteModel::new(table, config.astrocyte.clone())?;
        astrocyte.realize(substrate)?;

        let pre_post_mask = random_mask(
            rng,
            config.post_count,
            config.pre_count,
            config.connection_probability,
        );
        let pre_to_post = substrate.connect(
            pre_neurons.into(),
            post_neurons.into(),
            &LinkSpec::matrix_weighted(),
            Some(&pre_post_mask),
            Some(&pre_post_mask.scaled(config.pre_post_weight)),
        )?;

        astrocyte.connect_input_with(
            substrate,
            pre_neurons,
            config.pre_count,
            MatrixArg::Scalar(1),
            MatrixArg::Scalar(config.astrocyte_input_weight),
        )?;
        astrocyte.connect_output_with(
            substrate,
            post_neurons,
            config.post_count,
            MatrixArg::Scalar(1),
            MatrixArg::Scalar(config.astrocyte_output_weight),
        )?;

        log::info!(
            "Built feedforward NAN: {} pre, {} post, {} pre→post links",
            config.pre_count,
            config.post_count,
            pre_post_mask.count_nonzero()
        );

        Ok(Self {
            config,
            spike_times,
            pre_neurons,
            post_neurons,
            pre_post_mask,
            pre_to_post,
            astrocyte,
        })
    }

    /// Probe the post population and the astrocyte in one call.
    ///
    /// Astrocyte codes are checked first, so an invalid selector leaves no
    /// post probes behind either.
    pub fn probe<S: HostSubstrate + ?Sized>(
        &mut self,
        substrate: &mut S,
        post_signals: &[SignalKind],
        astro: impl Into<Selector>,
    ) -> Result<(Vec<ProbeHandle>, ProbeOutput)> {
        let astro = astro.into();
        astro.ids()?;

        let post = post_signals
            .iter()
            .map(|&kind| substrate.probe(self.post_neurons.into(), kind))
            .collect::<Result<Vec<_>>>()?;
        let astro = self.astrocyte.probe(substrate, astro)?;
        Ok((post, astro))
    }
}

fn random_mask<R: Rng + ?Sized>(rng: &mut R, rows: usize, cols: usize, p: f64) -> ConnectionMatrix {
    let mut mask = ConnectionMatrix::filled(rows, cols, 0);
    mask.data_mut()
        .iter_mut()
        .for_each(|v| *v = (rng.gen::<f64>() < p) as i32);
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::CalibrationEntry;
    use crate::probe::SicGeneratorProbe;
    use crate::substrate::{Endpoint, GroupRecord, RecordingSubstrate};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn table() -> Arc<CalibrationTable> {
        Arc::new(
            CalibrationTable::from_entries(vec![CalibrationEntry::new(20.0, 0.25, 30.0, 250.0)])
                .unwrap(),
        )
    }

    fn small() -> FeedforwardNanConfig {
        FeedforwardNanConfig {
            pre_count: 6,
            post_count: 4,
            connection_probability: 0.5,
            sim_time_ms: 1000,
            ..Default::default()
        }
    }

    #[test]
    fn test_build_layout() {
        let mut net = RecordingSubstrate::new();
        let mut rng = StdRng::seed_from_u64(7);
        let nan = FeedforwardNan::build(&mut net, table(), small(), &mut rng).unwrap();

        assert_eq!(nan.spike_times.len(), 6);
        assert!(matches!(
            net.group(nan.pre_neurons),
            Some(GroupRecord::SpikeSource(trains)) if trains.len() == 6
        ));
        assert_eq!(net.group(nan.post_neurons).unwrap().size(), 4);
        // 4 post neurons + 4 astrocyte stages
        assert_eq!(net.compartments.len(), 8);

        let record = net.connection(nan.pre_to_post).unwrap();
        assert_eq!(record.src, Endpoint::Group(nan.pre_neurons));
        assert_eq!(record.mask.as_ref().unwrap().shape(), (4, 6));
        assert_eq!(record.mask.as_ref(), Some(&nan.pre_post_mask));
        assert_eq!(record.weight.as_ref(), Some(&nan.pre_post_mask.scaled(10)));
        assert!(record.mask.as_ref().unwrap().data().iter().all(|&v| v == 0 || v == 1));

        let input = net.connection(nan.astrocyte.input_link().unwrap()).unwrap();
        assert_eq!(input.weight.as_ref().unwrap().shape(), (1, 6));
        let output = net.connection(nan.astrocyte.output_link().unwrap()).unwrap();
        assert_eq!(output.weight.as_ref().unwrap().data(), &[30; 4]);
    }

    #[test]
    fn test_connection_probability_extremes() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(random_mask(&mut rng, 3, 3, 0.0).count_nonzero(), 0);
        assert_eq!(random_mask(&mut rng, 3, 3, 1.0).count_nonzero(), 9);
    }

    #[test]
    fn test_rejects_bad_probability() {
        let mut net = RecordingSubstrate::new();
        let mut rng = StdRng::seed_from_u64(0);
        let config = FeedforwardNanConfig {
            connection_probability: 1.5,
            ..small()
        };
        let result = FeedforwardNan::build(&mut net, table(), config, &mut rng);
        assert!(matches!(result, Err(AstroError::Config(_))));
        assert!(net.groups.is_empty());
    }

    #[test]
    fn test_probe_post_and_astrocyte() {
        let mut net = RecordingSubstrate::new();
        let mut rng = StdRng::seed_from_u64(3);
        let mut nan = FeedforwardNan::build(&mut net, table(), small(), &mut rng).unwrap();

        let (post, astro) = nan
            .probe(&mut net, &[SignalKind::Spike], SicGeneratorProbe::Current)
            .unwrap();
        assert_eq!(post.len(), 1);
        assert_eq!(net.probe_record(post[0]).unwrap().target, Endpoint::Group(nan.post_neurons));
        assert!(matches!(astro, ProbeOutput::One(_)));

        let before = net.probes.len();
        assert!(nan.probe(&mut net, &[SignalKind::Voltage], 42i64).is_err());
        assert_eq!(net.probes.len(), before);
    }

    #[test]
    fn test_config_json_defaults() {
        let config: FeedforwardNanConfig =
            serde_json::from_str(r#"{ "pre_count": 8, "connection_probability": 0.2 }"#).unwrap();
        assert_eq!(config.pre_count, 8);
        assert_eq!(config.post_count, 50);
        assert_eq!(config.sim_time_ms, 30_000);
        assert_eq!(config.astrocyte, ConstructionMode::default());
    }
}
