//! Core shared types and constants.
//!
//! This module contains the identifiers, the view rectangle and the tuning
//! constants used throughout the culling and rendering pipeline.

use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Fraction of the view extent added on every side before culling
pub const CULL_MARGIN: f64 = 0.1;

/// Colour ranges narrower than this are treated as constant data
pub const COLOR_RANGE_EPSILON: f64 = 1e-9;

/// Normalized colour value used for constant (degenerate) colour data
pub const DEGENERATE_COLOR_VALUE: f32 = 0.5;

/// Maximum points drawn per plot before stride downsampling kicks in
pub const DEFAULT_MAX_DISPLAY_POINTS: usize = 100_000;

/// Default scatter marker size
pub const DEFAULT_POINT_SIZE: f32 = 2.0;

/// Default connecting line width
pub const DEFAULT_LINE_WIDTH: f32 = 1.0;

/// Opacity applied to scatter markers
pub const SCATTER_ALPHA: f32 = 0.8;

/// Opacity applied to batched line segments
pub const LINE_ALPHA: f32 = 0.6;

/// Axis rescale timer period in milliseconds
pub const TICK_INTERVAL_MS: u64 = 16;

/// Padding applied when fitting the view to freshly added raw data
pub const FIT_PADDING: f64 = 0.1;

/// Largest grid spacing exponent; `2^64` already exceeds any sane view
pub const MAX_GRID_POWER: u32 = 64;

/// Hover snaps to the nearest point only within this screen distance
pub const HOVER_SNAP_PX: f64 = 10.0;

// ============================================================================
// Identifiers
// ============================================================================

/// Stable index of a plot, assigned at creation and never reused
pub type PlotIndex = usize;

/// Monotonically increasing id of a registered group
pub type GroupId = usize;

/// Index of a registered source array
pub type ArrayIndex = usize;

// ============================================================================
// View rectangle
// ============================================================================

/// Axis-aligned rectangle in data coordinates
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewRect {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Default for ViewRect {
    fn default() -> Self {
        Self::new(0.0, 1.0, 0.0, 1.0)
    }
}

impl ViewRect {
    /// Create a rectangle from x and y limits
    pub const fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Horizontal extent
    #[inline]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Vertical extent
    #[inline]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Centre point
    pub fn center(&self) -> [f64; 2] {
        [
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        ]
    }

    /// Expand every side by `margin` times the extent on that axis.
    ///
    /// A zero (or inverted) extent contributes zero padding.
    pub fn padded(&self, margin: f64) -> Self {
        let pad_x = self.width().max(0.0) * margin;
        let pad_y = self.height().max(0.0) * margin;
        Self {
            x_min: self.x_min - pad_x,
            x_max: self.x_max + pad_x,
            y_min: self.y_min - pad_y,
            y_max: self.y_max + pad_y,
        }
    }

    /// Inclusive containment test on both axes
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }

    /// Rescale the extents around the centre by `1 / scale` per axis.
    ///
    /// Non-positive or non-finite scales leave that axis unchanged.
    pub fn scaled(&self, scale_x: f64, scale_y: f64) -> Self {
        let [cx, cy] = self.center();
        let half_w = if scale_x.is_finite() && scale_x > 0.0 {
            self.width() / scale_x / 2.0
        } else {
            self.width() / 2.0
        };
        let half_h = if scale_y.is_finite() && scale_y > 0.0 {
            self.height() / scale_y / 2.0
        } else {
            self.height() / 2.0
        };
        Self::new(cx - half_w, cx + half_w, cy - half_h, cy + half_h)
    }

    /// Bounding box of a point set, padded by `pad_ratio` of its extent.
    ///
    /// Returns `None` for an empty set. Zero-extent axes are widened by one
    /// unit on each side so the result always has a usable area.
    pub fn bounds_of(points: &[[f64; 2]], pad_ratio: f64) -> Option<Self> {
        let first = points.first()?;
        let mut rect = Self::new(first[0], first[0], first[1], first[1]);
        for &[x, y] in &points[1..] {
            rect.x_min = rect.x_min.min(x);
            rect.x_max = rect.x_max.max(x);
            rect.y_min = rect.y_min.min(y);
            rect.y_max = rect.y_max.max(y);
        }
        if rect.width() <= 0.0 {
            rect.x_min -= 1.0;
            rect.x_max += 1.0;
        }
        if rect.height() <= 0.0 {
            rect.y_min -= 1.0;
            rect.y_max += 1.0;
        }
        Some(rect.padded(pad_ratio))
    }
}

// ============================================================================
// Busy / loading state
// ============================================================================

/// Whether the pipeline is currently inside a rebuild
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum BusyState {
    /// No rebuild in progress
    #[default]
    Idle,
    /// A rebuild is running (contains the operation name)
    Busy(String),
}
