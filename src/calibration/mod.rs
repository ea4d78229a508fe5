//! # Calibration - SIC targets to hardware knobs
//!
//! A calibration table maps hardware settings of the integrator→SIC link
//! (weight, SIC current decay) to the behaviour they produce on the spike
//! generator (firing rate in Hz, firing window in ms). Searching the table
//! for the row nearest to a requested (rate, window) gives the closest
//! achievable hardware setting.
//!
//! ## Table Format
//!
//! ```text
//! # weight, decay_raw, firing_rate_hz, window_ms
//! 10, 0.010, 5.0, 50.0
//! 20, 0.020, 30.0, 250.0
//! ```
//!
//! The table is loaded once and shared read-only:
//!
//! ```ignore
//! use std::sync::Arc;
//! use astroglia::calibration::{CalibrationTable, search};
//!
//! let table = Arc::new(CalibrationTable::load("data/sic_calibration.csv")?);
//! let hit = search(&table, 30.0, 250.0);
//! println!("weight={} decay={}", hit.weight_hw(), hit.decay_hw());
//! ```

mod table;
pub use table::{CalibrationEntry, CalibrationTable};

mod search;
pub use search::{search, CalibrationMatch, CALIBRATION_SEED_ROW, DECAY_SCALE};
