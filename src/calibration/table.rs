//! Calibration Table - immutable rows loaded from a flat numeric file

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AstroError, Result};

/// Number of columns in every data row
const COLUMNS: usize = 4;

/// One calibration row
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationEntry {
    /// Integrator→SIC link weight
    pub weight: f64,
    /// SIC current decay as a fraction (hardware value is ×4096)
    pub decay_raw: f64,
    /// Measured spike generator firing rate (Hz)
    pub firing_rate_hz: f64,
    /// Measured spike generator firing window (ms)
    pub window_ms: f64,
}

impl CalibrationEntry {
    pub fn new(weight: f64, decay_raw: f64, firing_rate_hz: f64, window_ms: f64) -> Self {
        Self {
            weight,
            decay_raw,
            firing_rate_hz,
            window_ms,
        }
    }

    pub fn is_finite(&self) -> bool {
        [self.weight, self.decay_raw, self.firing_rate_hz, self.window_ms]
            .iter()
            .all(|v| v.is_finite())
    }

    /// Squared distance between this row's behaviour and a target
    pub fn cost(&self, target_rate_hz: f64, target_window_ms: f64) -> f64 {
        let d_rate = self.firing_rate_hz - target_rate_hz;
        let d_window = self.window_ms - target_window_ms;
        d_rate * d_rate + d_window * d_window
    }
}

/// Ordered, non-empty, read-only sequence of calibration rows.
///
/// Row order is significant: the search breaks ties by position.
#[derive(Clone, Debug, PartialEq)]
pub struct CalibrationTable {
    entries: Vec<CalibrationEntry>,
}

impl CalibrationTable {
    /// Load a table from disk.
    ///
    /// Any failure (missing file, bad cell, wrong column count, no rows) is
    /// reported as [`AstroError::MissingResource`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            AstroError::MissingResource(format!(
                "calibration table {}: {}",
                path.display(),
                e
            ))
        })?;
        let table = Self::parse(&text, &path.display().to_string())?;
        log::debug!(
            "Loaded calibration table {} ({} rows)",
            path.display(),
            table.len()
        );
        Ok(table)
    }

    /// Parse table text. `origin` names the source in error messages.
    pub fn parse(text: &str, origin: &str) -> Result<Self> {
        let mut entries = Vec::new();

        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let cells: Vec<&str> = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .collect();

            if cells.len() != COLUMNS {
                return Err(AstroError::MissingResource(format!(
                    "{} line {}: expected {} columns, found {}",
                    origin,
                    idx + 1,
                    COLUMNS,
                    cells.len()
                )));
            }

            let mut values = [0.0f64; COLUMNS];
            for (slot, cell) in values.iter_mut().zip(&cells) {
                *slot = cell.parse::<f64>().map_err(|_| {
                    AstroError::MissingResource(format!(
                        "{} line {}: '{}' is not a number",
                        origin,
                        idx + 1,
                        cell
                    ))
                })?;
                if !slot.is_finite() {
                    return Err(AstroError::MissingResource(format!(
                        "{} line {}: '{}' is not finite",
                        origin,
                        idx + 1,
                        cell
                    )));
                }
            }

            entries.push(CalibrationEntry::new(values[0], values[1], values[2], values[3]));
        }

        if entries.is_empty() {
            return Err(AstroError::MissingResource(format!(
                "{}: calibration table has no rows",
                origin
            )));
        }

        Ok(Self { entries })
    }

    /// Build a table from rows already in memory
    pub fn from_entries(entries: Vec<CalibrationEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(AstroError::MissingResource(
                "calibration table has no rows".to_string(),
            ));
        }
        if let Some(row) = entries.iter().position(|e| !e.is_finite()) {
            return Err(AstroError::MissingResource(format!(
                "calibration row {}: non-finite value",
                row
            )));
        }
        Ok(Self { entries })
    }

    /// Number of rows (never zero)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Never true for a constructed table
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CalibrationEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[CalibrationEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &CalibrationEntry> {
        self.entries.iter()
    }
}
