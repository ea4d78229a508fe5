//! Compartment Pipeline - the four-stage astrocyte signal path
//!
//! ```text
//! input ──► spike receiver ──► IP3 integrator ──► SIC generator ┐
//!                                                               │ push
//!                                   output ◄── spike generator ◄┘ pop/add
//! ```
//!
//! Stage roles are fixed:
//!
//! | Stage | Behaviour |
//! |-------|-----------|
//! | spike receiver | spiking, optional homeostasis |
//! | IP3 integrator | slow spiking (high threshold, long voltage memory) |
//! | SIC generator | non-spiking, passes voltage above threshold upward |
//! | spike generator | adds the pushed SIC voltage, fires on its own threshold |

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::params::{
    CompartmentSpec, JoinOperation, LinkSpec, RawKnobs, StackMode, ThresholdMode,
};
use crate::substrate::{
    CompartmentHandle, ConnectionHandle, Endpoint, GroupHandle, HostSubstrate,
};

/// The four pipeline stages
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    SpikeReceiver,
    Ip3Integrator,
    SicGenerator,
    SpikeGenerator,
}

impl Stage {
    /// Stages in signal-flow order, which is also creation order
    pub const ALL: [Stage; 4] = [
        Stage::SpikeReceiver,
        Stage::Ip3Integrator,
        Stage::SicGenerator,
        Stage::SpikeGenerator,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::SpikeReceiver => "spike_receiver",
            Self::Ip3Integrator => "ip3_integrator",
            Self::SicGenerator => "sic_generator",
            Self::SpikeGenerator => "spike_generator",
        }
    }
}

/// Structural description built from knobs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompartmentPipeline {
    pub spike_receiver: CompartmentSpec,
    pub ip3_integrator: CompartmentSpec,
    pub sic_generator: CompartmentSpec,
    pub spike_generator: CompartmentSpec,
    /// Spike receiver → IP3 integrator
    pub sr_to_ip3: LinkSpec,
    /// IP3 integrator → SIC generator
    pub ip3_to_sic: LinkSpec,
}

impl CompartmentPipeline {
    pub fn from_knobs(knobs: &RawKnobs) -> Self {
        let spike_receiver = CompartmentSpec::spiking(knobs.spike_receiver)
            .with_homeostasis(knobs.receiver_homeostasis);

        let ip3_integrator = CompartmentSpec::spiking(knobs.ip3_integrator);

        let sic_generator = CompartmentSpec {
            threshold_mode: ThresholdMode::NoSpikePassVoltageAboveThreshold,
            stack_out: StackMode::Push,
            ..CompartmentSpec::spiking(knobs.sic_generator)
        };

        let spike_generator = CompartmentSpec {
            join: JoinOperation::Add,
            stack_in: StackMode::PopA,
            ..CompartmentSpec::spiking(knobs.spike_generator)
        };

        Self {
            spike_receiver,
            ip3_integrator,
            sic_generator,
            spike_generator,
            sr_to_ip3: LinkSpec::mixed(knobs.sr_to_ip3_weight),
            ip3_to_sic: LinkSpec::mixed(knobs.ip3_to_sic_weight),
        }
    }

    pub fn stage(&self, stage: Stage) -> &CompartmentSpec {
        match stage {
            Stage::SpikeReceiver => &self.spike_receiver,
            Stage::Ip3Integrator => &self.ip3_integrator,
            Stage::SicGenerator => &self.sic_generator,
            Stage::SpikeGenerator => &self.spike_generator,
        }
    }

    /// Materialize the pipeline.
    ///
    /// Creation order is fixed: receiver, integrator, receiver→integrator,
    /// SIC generator, spike generator, its group-of-one, integrator→SIC.
    /// The SIC generator must be created directly before the spike generator
    /// so the push/pop stack pairs them.
    pub fn realize<S: HostSubstrate + ?Sized>(&self, substrate: &mut S) -> Result<RealizedPipeline> {
        let spike_receiver = substrate.create_compartment(&self.spike_receiver)?;
        let ip3_integrator = substrate.create_compartment(&self.ip3_integrator)?;
        let sr_to_ip3 = substrate.connect(
            spike_receiver.into(),
            ip3_integrator.into(),
            &self.sr_to_ip3,
            None,
            None,
        )?;

        let sic_generator = substrate.create_compartment(&self.sic_generator)?;
        let spike_generator_unit = substrate.create_compartment(&self.spike_generator)?;
        let spike_generator = substrate.create_compartment_group(&[spike_generator_unit])?;
        let ip3_to_sic = substrate.connect(
            ip3_integrator.into(),
            sic_generator.into(),
            &self.ip3_to_sic,
            None,
            None,
        )?;

        log::info!(
            "Realized astrocyte pipeline (sr→ip3 weight {}, ip3→sic weight {})",
            self.sr_to_ip3.weight,
            self.ip3_to_sic.weight
        );

        Ok(RealizedPipeline {
            spike_receiver,
            ip3_integrator,
            sic_generator,
            spike_generator_unit,
            spike_generator,
            sr_to_ip3,
            ip3_to_sic,
        })
    }
}

/// Handles of a pipeline living in a substrate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealizedPipeline {
    pub spike_receiver: CompartmentHandle,
    pub ip3_integrator: CompartmentHandle,
    pub sic_generator: CompartmentHandle,
    pub spike_generator_unit: CompartmentHandle,
    /// Group-of-one around `spike_generator_unit`
    pub spike_generator: GroupHandle,
    pub sr_to_ip3: ConnectionHandle,
    pub ip3_to_sic: ConnectionHandle,
}

impl RealizedPipeline {
    /// Endpoint used for probing and binding a stage
    pub fn endpoint(&self, stage: Stage) -> Endpoint {
        match stage {
            Stage::SpikeReceiver => self.spike_receiver.into(),
            Stage::Ip3Integrator => self.ip3_integrator.into(),
            Stage::SicGenerator => self.sic_generator.into(),
            Stage::SpikeGenerator => self.spike_generator.into(),
        }
    }
}
