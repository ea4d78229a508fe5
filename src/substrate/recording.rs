//! Recording Substrate - in-memory substrate that logs every request
//!
//! Nothing is simulated. Each call is appended to a list and answered with the
//! index it landed at, which makes the exact sequence of requests easy to
//! inspect. An optional compartment capacity emulates resource exhaustion.

use serde::Serialize;

use super::{
    CompartmentHandle, ConnectionHandle, Endpoint, GroupHandle, HostSubstrate, ProbeHandle,
    SignalKind,
};
use crate::error::{AstroError, Result};
use crate::matrix::ConnectionMatrix;
use crate::params::{CompartmentSpec, LinkSpec};

/// What a group handle refers to
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum GroupRecord {
    Compartments(Vec<CompartmentHandle>),
    SpikeSource(Vec<Vec<u32>>),
}

impl GroupRecord {
    /// Number of units (compartments or spike ports)
    pub fn size(&self) -> usize {
        match self {
            Self::Compartments(members) => members.len(),
            Self::SpikeSource(trains) => trains.len(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConnectionRecord {
    pub src: Endpoint,
    pub dst: Endpoint,
    pub link: LinkSpec,
    pub mask: Option<ConnectionMatrix>,
    pub weight: Option<ConnectionMatrix>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ProbeRecord {
    pub target: Endpoint,
    pub kind: SignalKind,
}

/// Substrate that records requests instead of executing them
#[derive(Clone, Debug, Default, Serialize)]
pub struct RecordingSubstrate {
    pub compartments: Vec<CompartmentSpec>,
    pub groups: Vec<GroupRecord>,
    pub connections: Vec<ConnectionRecord>,
    pub probes: Vec<ProbeRecord>,
    #[serde(skip)]
    capacity: Option<usize>,
}

impl RecordingSubstrate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail compartment creation once `capacity` compartments exist
    pub fn with_capacity_limit(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    pub fn compartment(&self, handle: CompartmentHandle) -> Option<&CompartmentSpec> {
        self.compartments.get(handle.0)
    }

    pub fn group(&self, handle: GroupHandle) -> Option<&GroupRecord> {
        self.groups.get(handle.0)
    }

    pub fn connection(&self, handle: ConnectionHandle) -> Option<&ConnectionRecord> {
        self.connections.get(handle.0)
    }

    pub fn probe_record(&self, handle: ProbeHandle) -> Option<&ProbeRecord> {
        self.probes.get(handle.0)
    }

    fn check_endpoint(&self, endpoint: Endpoint) -> Result<()> {
        let known = match endpoint {
            Endpoint::Compartment(h) => h.0 < self.compartments.len(),
            Endpoint::Group(h) => h.0 < self.groups.len(),
        };
        if known {
            Ok(())
        } else {
            Err(AstroError::Substrate(format!("unknown endpoint {:?}", endpoint)))
        }
    }
}

impl HostSubstrate for RecordingSubstrate {
    fn create_compartment(&mut self, spec: &CompartmentSpec) -> Result<CompartmentHandle> {
        if let Some(cap) = self.capacity {
            if self.compartments.len() >= cap {
                return Err(AstroError::Substrate(format!(
                    "compartment capacity {} exhausted",
                    cap
                )));
            }
        }
        self.compartments.push(*spec);
        Ok(CompartmentHandle(self.compartments.len() - 1))
    }

    fn connect(
        &mut self,
        src: Endpoint,
        dst: Endpoint,
        link: &LinkSpec,
        mask: Option<&ConnectionMatrix>,
        weight: Option<&ConnectionMatrix>,
    ) -> Result<ConnectionHandle> {
        self.check_endpoint(src)?;
        self.check_endpoint(dst)?;
        self.connections.push(ConnectionRecord {
            src,
            dst,
            link: *link,
            mask: mask.cloned(),
            weight: weight.cloned(),
        });
        Ok(ConnectionHandle(self.connections.len() - 1))
    }

    fn probe(&mut self, target: Endpoint, kind: SignalKind) -> Result<ProbeHandle> {
        self.check_endpoint(target)?;
        self.probes.push(ProbeRecord { target, kind });
        Ok(ProbeHandle(self.probes.len() - 1))
    }

    fn create_compartment_group(&mut self, members: &[CompartmentHandle]) -> Result<GroupHandle> {
        for &m in members {
            self.check_endpoint(Endpoint::Compartment(m))?;
        }
        self.groups.push(GroupRecord::Compartments(members.to_vec()));
        Ok(GroupHandle(self.groups.len() - 1))
    }

    fn create_spike_source(&mut self, spike_times: &[Vec<u32>]) -> Result<GroupHandle> {
        self.groups.push(GroupRecord::SpikeSource(spike_times.to_vec()));
        Ok(GroupHandle(self.groups.len() - 1))
    }
}
