//! Geometry helpers for the batched renderer.

use crate::state::MAX_GRID_POWER;

/// Upper bound on grid lines drawn for one view
pub const MAX_GRID_LINES: usize = 1000;

/// Deterministic stride for display downsampling: `max(1, n / cap)` once
/// `n` exceeds `cap`, otherwise 1.
pub fn downsample_stride(n: usize, cap: usize) -> usize {
    if cap == 0 || n <= cap {
        1
    } else {
        (n / cap).max(1)
    }
}

/// Every `step`-th element, starting with the first
pub fn take_stride<T: Copy>(items: &[T], step: usize) -> Vec<T> {
    if step <= 1 {
        return items.to_vec();
    }
    items.iter().step_by(step).copied().collect()
}

/// Consecutive-point segments of a polyline
pub fn polyline_segments(points: &[[f64; 2]]) -> Vec<[[f64; 2]; 2]> {
    points.windows(2).map(|w| [w[0], w[1]]).collect()
}

/// Per-segment colour value: the mean of the two endpoint values
pub fn segment_values(values: &[f32]) -> Vec<f32> {
    values.windows(2).map(|w| (w[0] + w[1]) * 0.5).collect()
}

/// Y positions of horizontal grid lines spaced `2^power` apart over the
/// vertical extent of the view. Power 0 disables the grid; powers above
/// [`MAX_GRID_POWER`] are clamped to it.
pub fn grid_positions(y_min: f64, y_max: f64, power: u32) -> Vec<f64> {
    if power == 0 || !y_min.is_finite() || !y_max.is_finite() || y_max < y_min {
        return Vec::new();
    }
    let spacing = 2f64.powi(power.min(MAX_GRID_POWER) as i32);
    let start = (y_min / spacing).floor() * spacing;
    let count = (((y_max - start) / spacing).ceil() as usize + 1).min(MAX_GRID_LINES);
    (0..count).map(|i| start + i as f64 * spacing).collect()
}
