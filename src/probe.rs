//! Probe Selectors - closed vocabulary of astrocyte signals
//!
//! Each stage has its own identifier enum; codes are unique across all four,
//! so a bare integer is enough to name a (stage, signal) pair:
//!
//! | Code | Stage | Signal |
//! |------|-------|--------|
//! | 1-3 | spike receiver | current, voltage, spike |
//! | 4-6 | IP3 integrator | current, voltage, spike |
//! | 7-8 | SIC generator | current, voltage |
//! | 9-11 | spike generator | current, voltage, spike |

use serde::{Deserialize, Serialize};

use crate::error::{AstroError, Result};
use crate::pipeline::{RealizedPipeline, Stage};
use crate::substrate::{HostSubstrate, ProbeHandle, SignalKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SpikeReceiverProbe {
    Current = 1,
    Voltage = 2,
    Spike = 3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Ip3IntegratorProbe {
    Current = 4,
    Voltage = 5,
    Spike = 6,
}

/// The SIC generator never spikes, so it has no spike probe
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SicGeneratorProbe {
    Current = 7,
    Voltage = 8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SpikeGeneratorProbe {
    Current = 9,
    Voltage = 10,
    Spike = 11,
}

/// Any probe identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProbeId {
    SpikeReceiver(SpikeReceiverProbe),
    Ip3Integrator(Ip3IntegratorProbe),
    SicGenerator(SicGeneratorProbe),
    SpikeGenerator(SpikeGeneratorProbe),
}

impl ProbeId {
    /// Resolve a numeric code; anything outside 1..=11 is rejected
    pub fn from_code(code: i64) -> Result<Self> {
        let id = match code {
            1 => Self::SpikeReceiver(SpikeReceiverProbe::Current),
            2 => Self::SpikeReceiver(SpikeReceiverProbe::Voltage),
            3 => Self::SpikeReceiver(SpikeReceiverProbe::Spike),
            4 => Self::Ip3Integrator(Ip3IntegratorProbe::Current),
            5 => Self::Ip3Integrator(Ip3IntegratorProbe::Voltage),
            6 => Self::Ip3Integrator(Ip3IntegratorProbe::Spike),
            7 => Self::SicGenerator(SicGeneratorProbe::Current),
            8 => Self::SicGenerator(SicGeneratorProbe::Voltage),
            9 => Self::SpikeGenerator(SpikeGeneratorProbe::Current),
            10 => Self::SpikeGenerator(SpikeGeneratorProbe::Voltage),
            11 => Self::SpikeGenerator(SpikeGeneratorProbe::Spike),
            _ => return Err(AstroError::InvalidSelector(code)),
        };
        Ok(id)
    }

    pub fn code(&self) -> i64 {
        match *self {
            Self::SpikeReceiver(p) => p as i64,
            Self::Ip3Integrator(p) => p as i64,
            Self::SicGenerator(p) => p as i64,
            Self::SpikeGenerator(p) => p as i64,
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            Self::SpikeReceiver(_) => Stage::SpikeReceiver,
            Self::Ip3Integrator(_) => Stage::Ip3Integrator,
            Self::SicGenerator(_) => Stage::SicGenerator,
            Self::SpikeGenerator(_) => Stage::SpikeGenerator,
        }
    }

    pub fn signal(&self) -> SignalKind {
        match self {
            Self::SpikeReceiver(SpikeReceiverProbe::Current)
            | Self::Ip3Integrator(Ip3IntegratorProbe::Current)
            | Self::SicGenerator(SicGeneratorProbe::Current)
            | Self::SpikeGenerator(SpikeGeneratorProbe::Current) => SignalKind::Current,
            Self::SpikeReceiver(SpikeReceiverProbe::Voltage)
            | Self::Ip3Integrator(Ip3IntegratorProbe::Voltage)
            | Self::SicGenerator(SicGeneratorProbe::Voltage)
            | Self::SpikeGenerator(SpikeGeneratorProbe::Voltage) => SignalKind::Voltage,
            Self::SpikeReceiver(SpikeReceiverProbe::Spike)
            | Self::Ip3Integrator(Ip3IntegratorProbe::Spike)
            | Self::SpikeGenerator(SpikeGeneratorProbe::Spike) => SignalKind::Spike,
        }
    }
}

impl From<SpikeReceiverProbe> for ProbeId {
    fn from(p: SpikeReceiverProbe) -> Self {
        Self::SpikeReceiver(p)
    }
}

impl From<Ip3IntegratorProbe> for ProbeId {
    fn from(p: Ip3IntegratorProbe) -> Self {
        Self::Ip3Integrator(p)
    }
}

impl From<SicGeneratorProbe> for ProbeId {
    fn from(p: SicGeneratorProbe) -> Self {
        Self::SicGenerator(p)
    }
}

impl From<SpikeGeneratorProbe> for ProbeId {
    fn from(p: SpikeGeneratorProbe) -> Self {
        Self::SpikeGenerator(p)
    }
}

/// One code or an ordered batch of codes
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selector {
    One(i64),
    Many(Vec<i64>),
}

impl From<i64> for Selector {
    fn from(code: i64) -> Self {
        Self::One(code)
    }
}

impl From<Vec<i64>> for Selector {
    fn from(codes: Vec<i64>) -> Self {
        Self::Many(codes)
    }
}

impl From<ProbeId> for Selector {
    fn from(id: ProbeId) -> Self {
        Self::One(id.code())
    }
}

impl From<Vec<ProbeId>> for Selector {
    fn from(ids: Vec<ProbeId>) -> Self {
        Self::Many(ids.iter().map(ProbeId::code).collect())
    }
}

impl From<SpikeReceiverProbe> for Selector {
    fn from(p: SpikeReceiverProbe) -> Self {
        Self::from(ProbeId::from(p))
    }
}

impl From<Ip3IntegratorProbe> for Selector {
    fn from(p: Ip3IntegratorProbe) -> Self {
        Self::from(ProbeId::from(p))
    }
}

impl From<SicGeneratorProbe> for Selector {
    fn from(p: SicGeneratorProbe) -> Self {
        Self::from(ProbeId::from(p))
    }
}

impl From<SpikeGeneratorProbe> for Selector {
    fn from(p: SpikeGeneratorProbe) -> Self {
        Self::from(ProbeId::from(p))
    }
}

impl Selector {
    /// Resolve every code, failing on the first one outside the vocabulary
    pub fn ids(&self) -> Result<Vec<ProbeId>> {
        match self {
            Self::One(code) => Ok(vec![ProbeId::from_code(*code)?]),
            Self::Many(codes) => codes.iter().map(|&c| ProbeId::from_code(c)).collect(),
        }
    }
}

/// Probe handles in selector shape
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProbeOutput {
    One(ProbeHandle),
    Many(Vec<ProbeHandle>),
}

impl ProbeOutput {
    /// Flatten to a list (a single handle becomes a one-element list)
    pub fn into_vec(self) -> Vec<ProbeHandle> {
        match self {
            Self::One(h) => vec![h],
            Self::Many(hs) => hs,
        }
    }
}

/// Attach probes for `selector` to a realized pipeline.
///
/// Every code is resolved before any probe is created; the first invalid
/// code fails the call and the substrate is left without new probes.
pub fn attach<S: HostSubstrate + ?Sized>(
    substrate: &mut S,
    pipeline: &RealizedPipeline,
    selector: &Selector,
) -> Result<ProbeOutput> {
    let ids = selector.ids()?;
    let handles = ids
        .into_iter()
        .map(|id| attach_one(substrate, pipeline, id))
        .collect::<Result<Vec<_>>>()?;

    match selector {
        Selector::One(_) => Ok(ProbeOutput::One(handles[0])),
        Selector::Many(_) => Ok(ProbeOutput::Many(handles)),
    }
}

fn attach_one<S: HostSubstrate + ?Sized>(
    substrate: &mut S,
    pipeline: &RealizedPipeline,
    id: ProbeId,
) -> Result<ProbeHandle> {
    substrate.probe(pipeline.endpoint(id.stage()), id.signal())
}
