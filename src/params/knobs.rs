//! Raw Knobs - hardware-level compartment and link settings
//!
//! Decay values are 12-bit fixed point: 4096 keeps the full value each step,
//! 0 drops it immediately.

use serde::{Deserialize, Serialize};

/// Weight precision used by every astrocyte link
pub const WEIGHT_BITS: u8 = 8;

/// Sign mode for links carrying both excitatory and inhibitory weights
pub const SIGN_MODE_MIXED: u8 = 2;

/// What a compartment does when its voltage crosses threshold
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThresholdMode {
    /// Emit a spike and reset
    #[default]
    SpikeAndReset,
    /// Never spike; pass voltage above threshold to the parent compartment
    NoSpikePassVoltageAboveThreshold,
}

/// How a compartment combines its own input with a value popped from the stack
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinOperation {
    #[default]
    Skip,
    Add,
}

/// Compartment stack interaction (dendritic tree plumbing)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StackMode {
    #[default]
    Skip,
    /// Push this compartment's value for the next compartment
    Push,
    /// Pop one value into operand A
    PopA,
}

/// Activity-driven threshold adaptation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeostasisSpec {
    pub activity_impulse: i32,
    pub activity_time_constant: i32,
    pub min_activity: i32,
    pub max_activity: i32,
    pub gain: i32,
    pub enabled: bool,
}

impl Default for HomeostasisSpec {
    fn default() -> Self {
        Self {
            activity_impulse: 0,
            activity_time_constant: 0,
            min_activity: 0,
            max_activity: 127,
            gain: 0,
            enabled: false,
        }
    }
}

/// Threshold and decays of one stage
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageKnobs {
    /// Threshold mantissa. `None` leaves the substrate default in place.
    pub v_th_mant: Option<i32>,
    pub current_decay: i32,
    pub voltage_decay: i32,
}

impl StageKnobs {
    pub const fn new(v_th_mant: i32, current_decay: i32, voltage_decay: i32) -> Self {
        Self {
            v_th_mant: Some(v_th_mant),
            current_decay,
            voltage_decay,
        }
    }

    /// Stage without a threshold of its own
    pub const fn decays_only(current_decay: i32, voltage_decay: i32) -> Self {
        Self {
            v_th_mant: None,
            current_decay,
            voltage_decay,
        }
    }
}

/// Every low-level knob of the astrocyte
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawKnobs {
    pub spike_receiver: StageKnobs,
    pub receiver_homeostasis: HomeostasisSpec,
    pub ip3_integrator: StageKnobs,
    pub sic_generator: StageKnobs,
    pub spike_generator: StageKnobs,
    /// Spike receiver → IP3 integrator weight
    pub sr_to_ip3_weight: i32,
    /// IP3 integrator → SIC generator weight
    pub ip3_to_sic_weight: i32,
}

impl Default for RawKnobs {
    fn default() -> Self {
        Self {
            spike_receiver: StageKnobs::new(100, 409, 1024),
            receiver_homeostasis: HomeostasisSpec::default(),
            ip3_integrator: StageKnobs::new(15000, 4096, 1),
            sic_generator: StageKnobs::decays_only(40, 40),
            spike_generator: StageKnobs::new(5000, 409, 40),
            sr_to_ip3_weight: 20,
            ip3_to_sic_weight: 20,
        }
    }
}

/// Structural description of one compartment handed to the substrate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompartmentSpec {
    pub v_th_mant: Option<i32>,
    pub current_decay: i32,
    pub voltage_decay: i32,
    pub homeostasis: Option<HomeostasisSpec>,
    pub threshold_mode: ThresholdMode,
    pub join: JoinOperation,
    pub stack_in: StackMode,
    pub stack_out: StackMode,
}

impl CompartmentSpec {
    /// Plain spiking compartment
    pub fn spiking(knobs: StageKnobs) -> Self {
        Self {
            v_th_mant: knobs.v_th_mant,
            current_decay: knobs.current_decay,
            voltage_decay: knobs.voltage_decay,
            homeostasis: None,
            threshold_mode: ThresholdMode::SpikeAndReset,
            join: JoinOperation::Skip,
            stack_in: StackMode::Skip,
            stack_out: StackMode::Skip,
        }
    }

    pub fn with_homeostasis(mut self, homeostasis: HomeostasisSpec) -> Self {
        self.homeostasis = Some(homeostasis);
        self
    }
}

/// Directed connection settings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSpec {
    pub weight: i32,
    pub num_weight_bits: u8,
    pub sign_mode: u8,
}

impl LinkSpec {
    /// 8-bit mixed-sign link with the given weight
    pub fn mixed(weight: i32) -> Self {
        Self {
            weight,
            num_weight_bits: WEIGHT_BITS,
            sign_mode: SIGN_MODE_MIXED,
        }
    }

    /// 8-bit mixed-sign link whose per-entry weights come from a weight matrix
    pub fn matrix_weighted() -> Self {
        Self::mixed(0)
    }
}
