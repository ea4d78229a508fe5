//! # Astrocyte Parameters
//!
//! Two layers of configuration:
//!
//! - **Raw knobs**: thresholds, 12-bit decays and link weights, exactly as the
//!   substrate consumes them.
//! - **Targets**: `ip3_sensitivity` (ms), `sic_amplitude` (Hz) and
//!   `sic_window` (ms). When present they are the source of truth and the
//!   dependent knobs are derived from them.
//!
//! | Target | Range | Derives |
//! |--------|-------|---------|
//! | ip3_sensitivity | 1..=100 | receiver→integrator weight (direct) |
//! | sic_amplitude + sic_window | 0..=356, 0..=608 | integrator→SIC weight, SIC current decay (calibration table) |

mod knobs;
pub use knobs::{
    CompartmentSpec, HomeostasisSpec, JoinOperation, LinkSpec, RawKnobs, StackMode, StageKnobs,
    ThresholdMode, SIGN_MODE_MIXED, WEIGHT_BITS,
};

mod targets;
pub use targets::{
    validate, ParameterTarget, TargetKind, Targets, IP3_SENSITIVITY_RANGE, SIC_AMPLITUDE_RANGE,
    SIC_WINDOW_RANGE,
};

mod store;
pub use store::{ConstructionMode, DerivedKnobs, ParameterStore};
