//! Calibration Search - nearest row to a (rate, window) target
//!
//! The running best starts at [`CALIBRATION_SEED_ROW`], not row 0. Rows are
//! then scanned in table order with a strict `<`, so a row that only ties the
//! current best never replaces it. Both rules are part of the calibration
//! contract: changing either changes derived hardware parameters.

use super::{CalibrationEntry, CalibrationTable};

/// Row the running best is seeded from
pub const CALIBRATION_SEED_ROW: usize = 15;

/// Fixed-point scale for hardware decay values (2^12)
pub const DECAY_SCALE: f64 = 4096.0;

/// Result of a calibration search
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CalibrationMatch {
    /// Index of the selected row
    pub index: usize,
    /// Link weight as stored in the table
    pub weight: f64,
    /// Decay fraction as stored in the table
    pub decay_raw: f64,
    /// Squared distance of the selected row to the target
    pub cost: f64,
}

impl CalibrationMatch {
    fn from_entry(index: usize, entry: &CalibrationEntry, cost: f64) -> Self {
        Self {
            index,
            weight: entry.weight,
            decay_raw: entry.decay_raw,
            cost,
        }
    }

    /// Link weight in hardware units (truncated)
    pub fn weight_hw(&self) -> i32 {
        self.weight as i32
    }

    /// Current decay in hardware units: `decay_raw × 2^12`, truncated
    pub fn decay_hw(&self) -> i32 {
        (self.decay_raw * DECAY_SCALE) as i32
    }
}

/// Find the row closest to `(target_rate_hz, target_window_ms)`.
///
/// Tables shorter than the seed row are seeded from their last row.
pub fn search(
    table: &CalibrationTable,
    target_rate_hz: f64,
    target_window_ms: f64,
) -> CalibrationMatch {
    let rows = table.entries();
    let seed = CALIBRATION_SEED_ROW.min(rows.len() - 1);

    let mut best = seed;
    let mut best_cost = rows[seed].cost(target_rate_hz, target_window_ms);

    for (i, row) in rows.iter().enumerate() {
        let cost = row.cost(target_rate_hz, target_window_ms);
        if cost < best_cost {
            best = i;
            best_cost = cost;
        }
    }

    log::debug!(
        "Calibration ({} Hz, {} ms) -> row {} (cost {})",
        target_rate_hz,
        target_window_ms,
        best,
        best_cost
    );

    CalibrationMatch::from_entry(best, &rows[best], best_cost)
}
