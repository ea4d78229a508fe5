//! # Astroglia - Astrocyte Compartment Model
//!
//! A simplified astrocyte expressed as a four-stage compartment pipeline that
//! lives inside a larger compartment-based spiking network. The astrocyte
//! listens to a presynaptic population and, once enough activity has been
//! integrated, releases a slow inward current (SIC) that drives a burst onto a
//! postsynaptic population.
//!
//! ## Core Components
//!
//! - **Parameters**: raw hardware knobs, or physiological targets
//!   (IP3 sensitivity, SIC amplitude, SIC window) from which knobs are derived
//! - **Calibration**: nearest-row search over a precomputed lookup table
//! - **Pipeline**: receiver → IP3 integrator → SIC generator → spike generator
//! - **Topology**: masked, weighted links to external populations
//! - **Probes**: closed vocabulary of (stage, signal) monitors
//!
//! ## Design Principles
//!
//! - **No engine**: compartments are executed by a [`HostSubstrate`]; this
//!   crate only describes and wires them
//! - **Atomic writes**: a target write validates, derives and commits as one
//!   step, or changes nothing
//! - **Sealed once realized**: targets are frozen after the pipeline exists
//!   in a substrate
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use astroglia::{AstrocyteModel, CalibrationTable, RecordingSubstrate, SpikeGeneratorProbe};
//!
//! let table = Arc::new(CalibrationTable::load("data/sic_calibration.csv")?);
//! let mut astro = AstrocyteModel::with_defaults(table);
//! astro.set_sic_amplitude(40.0)?;
//! astro.set_sic_window(300.0)?;
//!
//! let mut net = RecordingSubstrate::new();
//! astro.connect_input(&mut net, pre_neurons, 50)?;
//! astro.connect_output(&mut net, post_neurons, 50)?;
//! let probe = astro.probe(&mut net, SpikeGeneratorProbe::Spike)?;
//! ```

// Calibration table and nearest-row search
pub mod calibration;
pub use calibration::{search, CalibrationEntry, CalibrationMatch, CalibrationTable};

// Raw knobs, targets and the parameter store
pub mod params;
pub use params::{
    CompartmentSpec, ConstructionMode, DerivedKnobs, LinkSpec, ParameterStore, ParameterTarget,
    RawKnobs, Targets,
};

// Masks and weights
pub mod matrix;
pub use matrix::{ConnectionMatrix, MatrixArg};

// Host substrate boundary
pub mod substrate;
pub use substrate::{
    CompartmentHandle, ConnectionHandle, Endpoint, GroupHandle, HostSubstrate, ProbeHandle,
    RecordingSubstrate, SignalKind,
};

// Four-stage pipeline
pub mod pipeline;
pub use pipeline::{CompartmentPipeline, RealizedPipeline, Stage};

// Probe vocabulary
pub mod probe;
pub use probe::{
    Ip3IntegratorProbe, ProbeId, ProbeOutput, Selector, SicGeneratorProbe, SpikeGeneratorProbe,
    SpikeReceiverProbe,
};

// The astrocyte itself, plus its input/output bindings
pub mod model;
pub use model::AstrocyteModel;
pub mod topology;
pub use topology::{DEFAULT_INPUT_WEIGHT, DEFAULT_OUTPUT_WEIGHT};

// Spike train helpers
pub mod analysis;
pub use analysis::FiringRate;

// Feedforward neuron-astrocyte network
pub mod nan;
pub use nan::{FeedforwardNan, FeedforwardNanConfig};

// JSON configuration
pub mod config;
pub use config::AstrocyteConfig;

// Error types
mod error;
pub use error::{AstroError, Result};
