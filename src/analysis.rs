//! Spike Train Analysis - rates and conversions for probe data
//!
//! Spike rasters are one row per unit, one column per 1 ms timestep, with a
//! non-zero entry marking a spike. Spike times are per-unit lists of
//! timestep indices. All rows of a raster share one length; rate functions
//! reject ragged rasters with `ShapeMismatch`.

use rand::Rng;

use crate::error::{AstroError, Result};

/// Firing rates with their time axis
#[derive(Clone, Debug, PartialEq)]
pub struct FiringRate {
    /// One row per unit (Hz)
    pub rates: Vec<Vec<f64>>,
    /// Timestep each column is centred on
    pub time: Vec<usize>,
}

/// Raster → spike times
pub fn spikes_to_times(raster: &[Vec<u8>]) -> Vec<Vec<u32>> {
    raster
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .filter(|(_, &s)| s != 0)
                .map(|(t, _)| t as u32)
                .collect()
        })
        .collect()
}

/// Spike times → raster of `steps` columns. Times past the end are dropped.
pub fn times_to_spikes(times: &[Vec<u32>], steps: usize) -> Vec<Vec<u8>> {
    times
        .iter()
        .map(|train| {
            let mut row = vec![0u8; steps];
            for &t in train {
                if let Some(slot) = row.get_mut(t as usize) {
                    *slot = 1;
                }
            }
            row
        })
        .collect()
}

/// Common row length of a raster (0 for an empty raster)
pub fn raster_steps(raster: &[Vec<u8>]) -> Result<usize> {
    let steps = raster.first().map(|r| r.len()).unwrap_or(0);
    match raster.iter().find(|r| r.len() != steps) {
        Some(row) => Err(AstroError::ShapeMismatch {
            expected: (1, steps),
            actual: (1, row.len()),
        }),
        None => Ok(steps),
    }
}

/// Window actually used for a raster of `steps` columns: rasters shorter
/// than the window fall back to a quarter of their length.
pub fn effective_window(steps: usize, window: usize) -> usize {
    if steps < window {
        steps / 4
    } else {
        window
    }
}

/// Sliding-window firing rate.
///
/// Column `i` counts spikes in `[i, i + window)` and divides by the window in
/// seconds; it is plotted at `i + window / 2`. Produces `steps - window`
/// columns (none for an empty window).
pub fn firing_rate_window(raster: &[Vec<u8>], window: usize) -> Result<FiringRate> {
    let steps = raster_steps(raster)?;
    let window = effective_window(steps, window);
    if window == 0 {
        return Ok(FiringRate {
            rates: vec![Vec::new(); raster.len()],
            time: Vec::new(),
        });
    }

    let columns = steps - window;
    let seconds = window as f64 / 1000.0;

    let rates = raster
        .iter()
        .map(|row| {
            // running count over the window
            let mut count: u32 = row[..window].iter().map(|&s| (s != 0) as u32).sum();
            let mut out = Vec::with_capacity(columns);
            for i in 0..columns {
                out.push(count as f64 / seconds);
                count -= (row[i] != 0) as u32;
                count += (row[i + window] != 0) as u32;
            }
            out
        })
        .collect();

    Ok(FiringRate {
        rates,
        time: (0..columns).map(|i| i + window / 2).collect(),
    })
}

/// Inter-spike-interval firing rate.
///
/// Between consecutive spikes at `a` and `b` the rate is `1000 / (b - a)` Hz
/// over `[a, b)`; everything else is zero.
pub fn firing_rate_gap(raster: &[Vec<u8>]) -> Result<FiringRate> {
    let steps = raster_steps(raster)?;
    let times = spikes_to_times(raster);

    let rates = times
        .iter()
        .map(|train| {
            let mut out = vec![0.0; steps];
            for pair in train.windows(2) {
                let (a, b) = (pair[0] as usize, pair[1] as usize);
                let rate = 1000.0 / (b - a) as f64;
                out[a..b].iter_mut().for_each(|v| *v = rate);
            }
            out
        })
        .collect();

    Ok(FiringRate {
        rates,
        time: (0..steps).collect(),
    })
}

/// Independent Bernoulli spike trains at `rate_hz`, one draw per 1 ms step
pub fn poisson_spike_times<R: Rng + ?Sized>(
    rng: &mut R,
    units: usize,
    steps: usize,
    rate_hz: f64,
) -> Vec<Vec<u32>> {
    let p = rate_hz / 1000.0;
    (0..units)
        .map(|_| {
            (0..steps)
                .filter(|_| rng.gen::<f64>() < p)
                .map(|t| t as u32)
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_times_spikes_conversion() {
        let times = vec![vec![0, 3, 4], vec![], vec![9]];
        let raster = times_to_spikes(&times, 6);

        assert_eq!(raster[0], vec![1, 0, 0, 1, 1, 0]);
        assert_eq!(raster[2], vec![0; 6]);
        assert_eq!(spikes_to_times(&raster), vec![vec![0, 3, 4], vec![], vec![]]);
    }

    #[test]
    fn test_window_rate() {
        // one spike every 10 ms for 100 ms
        let raster = times_to_spikes(&[(0..100).step_by(10).collect()], 100);
        let fr = firing_rate_window(&raster, 20).unwrap();

        assert_eq!(fr.rates[0].len(), 80);
        assert_eq!(fr.time[0], 10);
        assert!(fr.rates[0].iter().all(|&r| (r - 100.0).abs() < 1e-9));
    }

    #[test]
    fn test_window_falls_back_for_short_raster() {
        assert_eq!(effective_window(100, 250), 25);
        assert_eq!(effective_window(1000, 250), 250);

        let fr = firing_rate_window(&[vec![1, 0, 1]], 250).unwrap();
        assert!(fr.rates[0].is_empty());
    }

    #[test]
    fn test_gap_rate() {
        let raster = times_to_spikes(&[vec![2, 6, 7]], 10);
        let fr = firing_rate_gap(&raster).unwrap();

        assert_eq!(fr.rates[0][..2], [0.0, 0.0]);
        assert_eq!(fr.rates[0][2..6], [250.0; 4]);
        assert_eq!(fr.rates[0][6], 1000.0);
        assert_eq!(fr.rates[0][7..], [0.0; 3]);
    }

    #[test]
    fn test_ragged_raster_rejected() {
        let ragged = vec![vec![0; 100], vec![1; 10]];
        assert!(matches!(
            firing_rate_window(&ragged, 20),
            Err(AstroError::ShapeMismatch {
                expected: (1, 100),
                actual: (1, 10)
            })
        ));

        let ragged = vec![vec![1, 0, 0, 0, 1], vec![1, 0, 0, 0, 0, 0, 0, 1]];
        assert!(matches!(
            firing_rate_gap(&ragged),
            Err(AstroError::ShapeMismatch { .. })
        ));

        assert_eq!(raster_steps(&[]).unwrap(), 0);
        assert!(firing_rate_gap(&[]).unwrap().rates.is_empty());
    }

    #[test]
    fn test_poisson_rate_and_bounds() {
        let mut rng = StdRng::seed_from_u64(0);
        let trains = poisson_spike_times(&mut rng, 4, 10_000, 10.0);

        assert_eq!(trains.len(), 4);
        for train in &trains {
            assert!(train.windows(2).all(|w| w[0] < w[1]));
            assert!(train.iter().all(|&t| t < 10_000));
            // expected 100 spikes; generous band
            assert!(train.len() > 50 && train.len() < 150, "{}", train.len());
        }

        assert!(poisson_spike_times(&mut rng, 2, 100, 0.0)
            .iter()
            .all(|t| t.is_empty()));
    }
}
