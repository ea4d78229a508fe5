//! Topology Binding - wiring external groups into and out of the astrocyte
//!
//! | Link | Endpoints | Mask/weight shape | Default weight |
//! |------|-----------|-------------------|----------------|
//! | input | units → spike receiver | `(1, count)` | 10 |
//! | output | spike generator → units | `(count, 1)` | 30 |
//!
//! Shapes are checked before anything touches the substrate, so a rejected
//! call leaves no connection behind and does not realize the pipeline.

use crate::error::Result;
use crate::matrix::{ConnectionMatrix, MatrixArg};
use crate::model::AstrocyteModel;
use crate::params::LinkSpec;
use crate::substrate::{ConnectionHandle, Endpoint, GroupHandle, HostSubstrate};

/// Weight of each input unit onto the spike receiver
pub const DEFAULT_INPUT_WEIGHT: i32 = 10;

/// Weight of the spike generator onto each output unit
pub const DEFAULT_OUTPUT_WEIGHT: i32 = 30;

fn resolve(
    mask: MatrixArg,
    weight: MatrixArg,
    shape: (usize, usize),
) -> Result<(ConnectionMatrix, ConnectionMatrix)> {
    Ok((mask.into_mask(shape)?, weight.into_weights(shape)?))
}

impl AstrocyteModel {
    /// Fully connect `count` input units with the default weight
    pub fn connect_input<S: HostSubstrate + ?Sized>(
        &mut self,
        substrate: &mut S,
        units: GroupHandle,
        count: usize,
    ) -> Result<ConnectionHandle> {
        self.connect_input_with(
            substrate,
            units,
            count,
            MatrixArg::Scalar(1),
            MatrixArg::Scalar(DEFAULT_INPUT_WEIGHT),
        )
    }

    /// Connect `count` input units to the spike receiver.
    ///
    /// `mask` and `weight` must be `(1, count)` when given as matrices.
    /// Replaces any previously stored input link handle.
    pub fn connect_input_with<S: HostSubstrate + ?Sized>(
        &mut self,
        substrate: &mut S,
        units: GroupHandle,
        count: usize,
        mask: impl Into<MatrixArg>,
        weight: impl Into<MatrixArg>,
    ) -> Result<ConnectionHandle> {
        let (mask, weight) = resolve(mask.into(), weight.into(), (1, count))?;

        let realized = self.realize(substrate)?;
        let handle = substrate.connect(
            Endpoint::Group(units),
            Endpoint::Compartment(realized.spike_receiver),
            &LinkSpec::matrix_weighted(),
            Some(&mask),
            Some(&weight),
        )?;

        if let Some(previous) = self.input_link.replace(handle) {
            log::warn!("Input link {:?} replaced by {:?}", previous, handle);
        }
        log::info!(
            "Bound {} input units ({} active) to spike receiver",
            count,
            mask.count_nonzero()
        );
        Ok(handle)
    }

    /// Fully connect the spike generator to `count` output units with the
    /// default weight
    pub fn connect_output<S: HostSubstrate + ?Sized>(
        &mut self,
        substrate: &mut S,
        units: GroupHandle,
        count: usize,
    ) -> Result<ConnectionHandle> {
        self.connect_output_with(
            substrate,
            units,
            count,
            MatrixArg::Scalar(1),
            MatrixArg::Scalar(DEFAULT_OUTPUT_WEIGHT),
        )
    }

    /// Connect the spike generator to `count` output units.
    ///
    /// `mask` and `weight` must be `(count, 1)` when given as matrices.
    /// Replaces any previously stored output link handle.
    pub fn connect_output_with<S: HostSubstrate + ?Sized>(
        &mut self,
        substrate: &mut S,
        units: GroupHandle,
        count: usize,
        mask: impl Into<MatrixArg>,
        weight: impl Into<MatrixArg>,
    ) -> Result<ConnectionHandle> {
        let (mask, weight) = resolve(mask.into(), weight.into(), (count, 1))?;

        let realized = self.realize(substrate)?;
        let handle = substrate.connect(
            Endpoint::Group(realized.spike_generator),
            Endpoint::Group(units),
            &LinkSpec::matrix_weighted(),
            Some(&mask),
            Some(&weight),
        )?;

        if let Some(previous) = self.output_link.replace(handle) {
            log::warn!("Output link {:?} replaced by {:?}", previous, handle);
        }
        log::info!(
            "Bound spike generator to {} output units ({} active)",
            count,
            mask.count_nonzero()
        );
        Ok(handle)
    }
}
