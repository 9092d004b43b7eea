//! The display surface the renderer draws into.
//!
//! A surface owns retained primitives identified by opaque handles. Scatter
//! primitives come in two kinds (colour mapped and flat) that cannot be
//! converted into one another; line batches are immutable once created.

use crate::color::{Colormap, Rgba};
use crate::state::{PlotIndex, ViewRect};

/// Opaque reference to a retained primitive
pub type HandleId = u64;

/// Tag identifying which renderer created a primitive
pub type OwnerTag = u64;

/// Primitive kind of a scatter
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScatterKind {
    /// Per-point scalar values through a colormap
    Colored,
    /// One colour for every marker
    Flat,
}

/// How scatter markers are filled
#[derive(Clone, Debug, PartialEq)]
pub enum ScatterFill {
    Mapped { values: Vec<f32>, colormap: Colormap },
    Flat(Rgba),
}

impl ScatterFill {
    pub fn kind(&self) -> ScatterKind {
        match self {
            Self::Mapped { .. } => ScatterKind::Colored,
            Self::Flat(_) => ScatterKind::Flat,
        }
    }
}

/// Buffers of one scatter primitive
#[derive(Clone, Debug, PartialEq)]
pub struct ScatterData {
    /// Z order; lower values are drawn first
    pub order: PlotIndex,
    pub points: Vec<[f64; 2]>,
    pub fill: ScatterFill,
    pub size: f32,
    pub alpha: f32,
}

impl ScatterData {
    pub fn kind(&self) -> ScatterKind {
        self.fill.kind()
    }
}

/// Segment colouring of a line batch
#[derive(Clone, Debug, PartialEq)]
pub enum LineFill {
    /// One RGBA per segment
    Solid(Vec<Rgba>),
    /// One normalized value per segment through a single colormap
    Scalar { values: Vec<f32>, colormap: Colormap },
}

/// Many line segments drawn with one call
#[derive(Clone, Debug, PartialEq)]
pub struct LineBatch {
    pub segments: Vec<[[f64; 2]; 2]>,
    pub widths: Vec<f32>,
    pub fill: LineFill,
    pub alpha: f32,
}

impl LineBatch {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Aspect handling of the view
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AspectMode {
    /// One data unit is the same length on both axes
    #[default]
    Equal,
    /// Axes scale independently
    Auto,
}

/// Equal aspect unless a secondary axis is active
pub fn resolve_aspect(prefer_equal: bool, secondary_axis_active: bool) -> AspectMode {
    if prefer_equal && !secondary_axis_active {
        AspectMode::Equal
    } else {
        AspectMode::Auto
    }
}

/// Retained-mode drawing target
pub trait DrawSurface {
    fn create_scatter(&mut self, owner: OwnerTag, data: ScatterData) -> HandleId;

    /// Replace the buffers of an existing scatter of the same kind.
    /// Unknown handles and kind mismatches hand the buffers back.
    fn update_scatter(&mut self, handle: HandleId, data: ScatterData) -> Result<(), ScatterData>;

    fn set_visible(&mut self, handle: HandleId, visible: bool) -> bool;

    fn create_line_batch(&mut self, owner: OwnerTag, batch: LineBatch) -> HandleId;

    /// Remove any primitive. Returns `false` if the handle is unknown.
    fn remove(&mut self, handle: HandleId) -> bool;

    /// Every live primitive tagged with `owner`
    fn owned_by(&self, owner: OwnerTag) -> Vec<HandleId>;

    fn set_limits(&mut self, view: ViewRect);

    fn set_aspect(&mut self, aspect: AspectMode);

    /// Horizontal reference lines at the given y positions
    fn set_grid_lines(&mut self, ys: Vec<f64>, color: Rgba);
}
