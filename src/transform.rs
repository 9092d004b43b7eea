//! Coordinate transforms applied to points before they are stored.
//!
//! The engine is a seam: the viewer only needs the four operations and a
//! parameter set it can serialize into array metadata and replay later for
//! freshly toggled fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// Which transform produced a parameter set
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformMode {
    #[default]
    Raw,
    Normalize,
    Center,
}

/// Affine per-axis parameters: `p' = (p - shift) * scale`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformParams {
    pub mode: TransformMode,
    pub shift_x: f64,
    pub shift_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Default for TransformParams {
    fn default() -> Self {
        Self::identity()
    }
}

impl TransformParams {
    pub const fn identity() -> Self {
        Self {
            mode: TransformMode::Raw,
            shift_x: 0.0,
            shift_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    #[inline]
    pub fn apply_point(&self, [x, y]: [f64; 2]) -> [f64; 2] {
        [
            (x - self.shift_x) * self.scale_x,
            (y - self.shift_y) * self.scale_y,
        ]
    }

    /// Serialize into a plain key/value map
    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Restore from a key/value map produced by [`TransformParams::to_map`]
    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        Ok(serde_json::from_value(Value::Object(map.clone()))?)
    }
}

/// The transform operations the viewer consumes
pub trait TransformEngine {
    /// Map the bounding box onto the unit square
    fn normalize(&self, points: &[[f64; 2]]) -> (Vec<[f64; 2]>, TransformParams);
    /// Move the mean to the origin
    fn center(&self, points: &[[f64; 2]]) -> (Vec<[f64; 2]>, TransformParams);
    /// Identity
    fn raw(&self, points: &[[f64; 2]]) -> (Vec<[f64; 2]>, TransformParams);
    /// Replay previously computed parameters
    fn apply(&self, points: &[[f64; 2]], params: &TransformParams) -> Vec<[f64; 2]>;
}

/// Default affine engine
#[derive(Clone, Copy, Debug, Default)]
pub struct AffineTransformEngine;

impl TransformEngine for AffineTransformEngine {
    fn normalize(&self, points: &[[f64; 2]]) -> (Vec<[f64; 2]>, TransformParams) {
        let Some((min, max)) = extents(points) else {
            return self.raw(points);
        };
        let scale = |lo: f64, hi: f64| {
            let span = hi - lo;
            if span > 0.0 && span.is_finite() {
                1.0 / span
            } else {
                1.0
            }
        };
        let params = TransformParams {
            mode: TransformMode::Normalize,
            shift_x: min[0],
            shift_y: min[1],
            scale_x: scale(min[0], max[0]),
            scale_y: scale(min[1], max[1]),
        };
        (self.apply(points, &params), params)
    }

    fn center(&self, points: &[[f64; 2]]) -> (Vec<[f64; 2]>, TransformParams) {
        if points.is_empty() {
            return self.raw(points);
        }
        let n = points.len() as f64;
        let (sum_x, sum_y) = points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p[0], sy + p[1]));
        let params = TransformParams {
            mode: TransformMode::Center,
            shift_x: sum_x / n,
            shift_y: sum_y / n,
            scale_x: 1.0,
            scale_y: 1.0,
        };
        (self.apply(points, &params), params)
    }

    fn raw(&self, points: &[[f64; 2]]) -> (Vec<[f64; 2]>, TransformParams) {
        (points.to_vec(), TransformParams::identity())
    }

    fn apply(&self, points: &[[f64; 2]], params: &TransformParams) -> Vec<[f64; 2]> {
        points.iter().map(|&p| params.apply_point(p)).collect()
    }
}

fn extents(points: &[[f64; 2]]) -> Option<([f64; 2], [f64; 2])> {
    let first = *points.first()?;
    Some(points.iter().fold((first, first), |(lo, hi), p| {
        (
            [lo[0].min(p[0]), lo[1].min(p[1])],
            [hi[0].max(p[0]), hi[1].max(p[1])],
        )
    }))
}
