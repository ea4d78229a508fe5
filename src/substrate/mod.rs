//! # Host Substrate - the execution engine boundary
//!
//! The astrocyte never runs compartments itself. It describes compartments and
//! links, and asks a [`HostSubstrate`] to materialize them. Handles returned by
//! the substrate are opaque indices; only the substrate that issued them can
//! interpret them.
//!
//! The substrate is owned by the caller and borrowed mutably for each call.
//! Errors raised by the substrate are passed through unchanged.

use serde::{Deserialize, Serialize};

use crate::error::{AstroError, Result};
use crate::matrix::ConnectionMatrix;
use crate::params::{CompartmentSpec, LinkSpec};

mod recording;
pub use recording::{ConnectionRecord, GroupRecord, ProbeRecord, RecordingSubstrate};

/// Single compartment created by the substrate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompartmentHandle(pub usize);

/// Group of compartments (or a spike source process)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupHandle(pub usize);

/// Connection between two endpoints
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionHandle(pub usize);

/// Monitor attached to one signal of one endpoint
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProbeHandle(pub usize);

/// Anything a connection or probe can attach to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endpoint {
    Compartment(CompartmentHandle),
    Group(GroupHandle),
}

impl From<CompartmentHandle> for Endpoint {
    fn from(h: CompartmentHandle) -> Self {
        Self::Compartment(h)
    }
}

impl From<GroupHandle> for Endpoint {
    fn from(h: GroupHandle) -> Self {
        Self::Group(h)
    }
}

/// Observable compartment signal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    Current,
    Voltage,
    Spike,
}

/// Capability interface of a compartment-based network engine
pub trait HostSubstrate {
    /// Create one compartment
    fn create_compartment(&mut self, spec: &CompartmentSpec) -> Result<CompartmentHandle>;

    /// Connect `src` to `dst`. `mask` and `weight` are shaped `(dst, src)`
    /// for group links; `None` means a single unmasked link.
    fn connect(
        &mut self,
        src: Endpoint,
        dst: Endpoint,
        link: &LinkSpec,
        mask: Option<&ConnectionMatrix>,
        weight: Option<&ConnectionMatrix>,
    ) -> Result<ConnectionHandle>;

    /// Attach a monitor to one signal of `target`
    fn probe(&mut self, target: Endpoint, kind: SignalKind) -> Result<ProbeHandle>;

    /// Wrap existing compartments into a group
    fn create_compartment_group(&mut self, members: &[CompartmentHandle]) -> Result<GroupHandle>;

    /// Create `size` identical compartments as one group
    fn create_group(&mut self, size: usize, spec: &CompartmentSpec) -> Result<GroupHandle> {
        let members = (0..size)
            .map(|_| self.create_compartment(spec))
            .collect::<Result<Vec<_>>>()?;
        self.create_compartment_group(&members)
    }

    /// Create a process replaying fixed spike times, one train per port
    fn create_spike_source(&mut self, _spike_times: &[Vec<u32>]) -> Result<GroupHandle> {
        Err(AstroError::Substrate(
            "spike sources are not supported by this substrate".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Substrate that only provides the four core operations
    struct CoreOnly(RecordingSubstrate);

    impl HostSubstrate for CoreOnly {
        fn create_compartment(&mut self, spec: &CompartmentSpec) -> Result<CompartmentHandle> {
            self.0.create_compartment(spec)
        }

        fn connect(
            &mut self,
            src: Endpoint,
            dst: Endpoint,
            link: &LinkSpec,
            mask: Option<&ConnectionMatrix>,
            weight: Option<&ConnectionMatrix>,
        ) -> Result<ConnectionHandle> {
            self.0.connect(src, dst, link, mask, weight)
        }

        fn probe(&mut self, target: Endpoint, kind: SignalKind) -> Result<ProbeHandle> {
            self.0.probe(target, kind)
        }

        fn create_compartment_group(&mut self, members: &[CompartmentHandle]) -> Result<GroupHandle> {
            self.0.create_compartment_group(members)
        }
    }

    #[test]
    fn test_default_spike_source_unsupported() {
        let mut net = CoreOnly(RecordingSubstrate::new());
        let result = net.create_spike_source(&[vec![1, 5], vec![3]]);

        assert!(matches!(result, Err(AstroError::Substrate(msg)) if msg.contains("spike sources")));
        assert!(net.0.groups.is_empty());
    }
}
