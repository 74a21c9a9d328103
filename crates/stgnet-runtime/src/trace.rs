//! Plot-ready views of recorded traces
//!
//! These helpers only reshape recorded data; they never touch a running
//! simulator and draw nothing themselves.

use crate::error::{Result, RuntimeError};

/// Height added to the potential sample preceding each spike (mV)
pub const SPIKE_MARKER_MV: f64 = 10.0;

/// Sample times `0, dt, 2dt, ...` for a trace of `steps` samples (ms)
pub fn time_axis(steps: usize, dt: f64) -> Vec<f64> {
    (0..steps).map(|k| k as f64 * dt).collect()
}

/// Copy of `v` with [`SPIKE_MARKER_MV`] added one sample before each spike.
///
/// A spike at `t` marks sample `floor(t / dt) - 1`; spikes mapping before the
/// first sample or past the last one are skipped.
pub fn mark_spikes(v: &[f64], spike_times: &[f64], dt: f64) -> Vec<f64> {
    let mut marked = v.to_vec();
    for &t in spike_times {
        let sample = (t / dt) as i64 - 1;
        if sample < 0 {
            continue;
        }
        if let Some(value) = marked.get_mut(sample as usize) {
            *value += SPIKE_MARKER_MV;
        }
    }
    marked
}

/// `(time, row)` points for the first `rows` binary spike trains.
///
/// Asking for more rows than there are trains draws all of them.
pub fn raster_points(time: &[f64], trains: &[Vec<bool>], rows: usize) -> Vec<(f64, usize)> {
    let rows = if rows > trains.len() {
        log::warn!(
            "Requested {} raster rows but only {} spike trains exist; drawing {}",
            rows,
            trains.len(),
            trains.len()
        );
        trains.len()
    } else {
        rows
    };

    trains
        .iter()
        .take(rows)
        .enumerate()
        .flat_map(|(row, train)| {
            time.iter()
                .zip(train)
                .filter(|&(_, &spike)| spike)
                .map(move |(&t, _)| (t, row))
        })
        .collect()
}

/// Pair two potential traces sample by sample for a phase-plane plot
pub fn phase_plane(first: &[f64], second: &[f64]) -> Result<Vec<(f64, f64)>> {
    if first.len() != second.len() {
        return Err(RuntimeError::dimension_mismatch(
            "phase plane trace length",
            first.len(),
            second.len(),
        ));
    }
    Ok(first.iter().copied().zip(second.iter().copied()).collect())
}
