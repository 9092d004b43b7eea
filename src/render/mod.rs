//! Batched geometry renderer.
//!
//! Turns the culled plot list into the fewest draw primitives:
//! - one persistent scatter per plot, updated in place across frames
//! - at most two line batches shared by every plot that draws lines
//!   (solid colours, and scalar values through one colormap)
//!
//! Scatter handles follow a small state machine per plot. A plot without a
//! slot has no primitive; the first frame with points creates one, later
//! frames update it, and an empty or hidden frame only hides it. Switching
//! between colour-mapped and flat markers needs a new primitive kind, so the
//! slot is recreated and the old handle becomes an orphan. Any primitive
//! tagged with this renderer's owner id that the frame did not claim is
//! removed at the end of the frame.

mod geometry;
pub mod scene;
pub mod surface;

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

pub use geometry::{
    downsample_stride, grid_positions, polyline_segments, segment_values, take_stride,
    MAX_GRID_LINES,
};
pub use scene::{Primitive, RetainedScene, SceneCounters, ScatterPrimitive};
pub use surface::{
    resolve_aspect, AspectMode, DrawSurface, HandleId, LineBatch, LineFill, OwnerTag,
    ScatterData, ScatterFill, ScatterKind,
};

use crate::color::{Colormap, Rgba};
use crate::cull::CulledPlot;
use crate::state::{
    PlotIndex, ViewRect, DEFAULT_MAX_DISPLAY_POINTS, LINE_ALPHA, SCATTER_ALPHA,
};

static NEXT_OWNER: AtomicU64 = AtomicU64::new(1);

/// Tunables for the renderer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderOptions {
    /// Per-plot point cap before stride downsampling
    pub max_display_points: usize,
    pub scatter_alpha: f32,
    pub line_alpha: f32,
    /// Horizontal grid spacing as a power of two; 0 disables the grid
    pub grid_power: u32,
    pub grid_color: Rgba,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_display_points: DEFAULT_MAX_DISPLAY_POINTS,
            scatter_alpha: SCATTER_ALPHA,
            line_alpha: LINE_ALPHA,
            grid_power: 0,
            grid_color: Rgba::GRAY,
        }
    }
}

/// What one frame did to the surface
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub plots: usize,
    pub points_drawn: usize,
    pub scatter_created: usize,
    pub scatter_updated: usize,
    /// Scatters replaced because they switched between mapped and flat
    pub scatter_recreated: usize,
    pub scatter_hidden: usize,
    pub orphans_removed: usize,
    pub solid_segments: usize,
    pub scalar_segments: usize,
    pub draw_calls: usize,
    /// The scalar line batch had contributors with different colormaps
    pub mixed_line_colormaps: bool,
}

/// Scatter primitive owned by one plot
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScatterSlot {
    pub handle: HandleId,
    pub kind: ScatterKind,
    pub shown: bool,
}

#[derive(Debug, Default)]
struct SolidBucket {
    segments: Vec<[[f64; 2]; 2]>,
    colors: Vec<Rgba>,
    widths: Vec<f32>,
}

impl SolidBucket {
    fn extend(&mut self, segments: Vec<[[f64; 2]; 2]>, color: Rgba, width: f32) {
        let n = segments.len();
        self.segments.extend(segments);
        self.colors.extend(std::iter::repeat(color).take(n));
        self.widths.extend(std::iter::repeat(width).take(n));
    }

    fn into_batch(self, alpha: f32) -> Option<LineBatch> {
        if self.segments.is_empty() {
            return None;
        }
        Some(LineBatch {
            segments: self.segments,
            widths: self.widths,
            fill: LineFill::Solid(self.colors),
            alpha,
        })
    }
}

#[derive(Debug, Default)]
struct ScalarBucket {
    segments: Vec<[[f64; 2]; 2]>,
    values: Vec<f32>,
    widths: Vec<f32>,
    colormap: Option<Colormap>,
    mixed: bool,
}

impl ScalarBucket {
    fn extend(
        &mut self,
        segments: Vec<[[f64; 2]; 2]>,
        values: Vec<f32>,
        colormap: Colormap,
        width: f32,
    ) {
        match self.colormap {
            None => self.colormap = Some(colormap),
            Some(first) if first != colormap => self.mixed = true,
            Some(_) => {}
        }
        let n = segments.len();
        self.segments.extend(segments);
        self.values.extend(values);
        self.widths.extend(std::iter::repeat(width).take(n));
    }

    fn into_batch(self, alpha: f32) -> Option<LineBatch> {
        let colormap = self.colormap?;
        if self.segments.is_empty() {
            return None;
        }
        Some(LineBatch {
            segments: self.segments,
            widths: self.widths,
            fill: LineFill::Scalar {
                values: self.values,
                colormap,
            },
            alpha,
        })
    }
}

#[derive(Debug)]
pub struct PlotRenderer {
    owner: OwnerTag,
    options: RenderOptions,
    slots: HashMap<PlotIndex, ScatterSlot>,
    solid_batch: Option<HandleId>,
    scalar_batch: Option<HandleId>,
}

impl Default for PlotRenderer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

impl PlotRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            owner: NEXT_OWNER.fetch_add(1, Ordering::Relaxed),
            options,
            slots: HashMap::new(),
            solid_batch: None,
            scalar_batch: None,
        }
    }

    /// Tag carried by every primitive this renderer creates
    pub fn owner(&self) -> OwnerTag {
        self.owner
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: RenderOptions) {
        self.options = options;
    }

    pub fn slot(&self, index: PlotIndex) -> Option<ScatterSlot> {
        self.slots.get(&index).copied()
    }

    /// Scatter handle of a plot, if one exists
    pub fn handle_of(&self, index: PlotIndex) -> Option<HandleId> {
        self.slots.get(&index).map(|s| s.handle)
    }

    /// Current `(solid, scalar)` line batch handles
    pub fn line_batches(&self) -> (Option<HandleId>, Option<HandleId>) {
        (self.solid_batch, self.scalar_batch)
    }

    /// Draw one frame
    pub fn render(
        &mut self,
        surface: &mut dyn DrawSurface,
        frame: &[CulledPlot],
        view: &ViewRect,
        aspect: AspectMode,
    ) -> FrameStats {
        let mut stats = FrameStats {
            plots: frame.len(),
            ..Default::default()
        };
        let mut claimed: HashSet<HandleId> = HashSet::with_capacity(frame.len() + 2);
        let mut next_slots = HashMap::with_capacity(self.slots.len());
        let mut solid = SolidBucket::default();
        let mut scalar = ScalarBucket::default();

        for culled in frame {
            let previous = self.slots.remove(&culled.index);
            if culled.removed {
                // Unclaimed, so the sweep below releases it
                continue;
            }

            if !culled.visible || culled.is_empty() {
                if let Some(mut slot) = previous {
                    if slot.shown {
                        surface.set_visible(slot.handle, false);
                        slot.shown = false;
                        stats.scatter_hidden += 1;
                    }
                    claimed.insert(slot.handle);
                    next_slots.insert(culled.index, slot);
                }
                continue;
            }

            let step = downsample_stride(culled.points.len(), self.options.max_display_points);
            let points = take_stride(&culled.points, step);
            let colors = culled
                .colors
                .as_deref()
                .filter(|c| !c.is_empty())
                .map(|c| take_stride(c, step));
            let style = &culled.style;

            if style.draw_lines && points.len() >= 2 {
                let segments = polyline_segments(&points);
                match (style.line_color, &colors) {
                    (Some(color), _) => solid.extend(segments, color, style.line_width),
                    (None, Some(values)) => scalar.extend(
                        segments,
                        segment_values(values),
                        style.colormap,
                        style.line_width,
                    ),
                    (None, None) => solid.extend(segments, Rgba::GRAY, style.line_width),
                }
            }

            let fill = match colors {
                Some(values) => ScatterFill::Mapped {
                    values,
                    colormap: style.colormap,
                },
                None => ScatterFill::Flat(style.marker_color),
            };
            let data = ScatterData {
                order: culled.index,
                points,
                fill,
                size: style.size,
                alpha: self.options.scatter_alpha,
            };
            stats.points_drawn += data.points.len();

            let slot = self.place_scatter(surface, previous, data, &mut stats);
            claimed.insert(slot.handle);
            next_slots.insert(culled.index, slot);
        }
        self.slots = next_slots;

        stats.mixed_line_colormaps = scalar.mixed;
        if scalar.mixed {
            tracing::warn!(
                "Scalar line batch mixes colormaps; using {}",
                scalar.colormap.unwrap_or_default()
            );
        }
        stats.solid_segments = solid.segments.len();
        stats.scalar_segments = scalar.segments.len();
        self.rebuild_line_batches(surface, solid, scalar);
        claimed.extend(self.solid_batch);
        claimed.extend(self.scalar_batch);

        for handle in surface.owned_by(self.owner) {
            if !claimed.contains(&handle) && surface.remove(handle) {
                stats.orphans_removed += 1;
            }
        }

        surface.set_limits(*view);
        surface.set_aspect(aspect);
        surface.set_grid_lines(
            grid_positions(view.y_min, view.y_max, self.options.grid_power),
            self.options.grid_color,
        );

        stats.draw_calls = self.slots.values().filter(|s| s.shown).count()
            + usize::from(self.solid_batch.is_some())
            + usize::from(self.scalar_batch.is_some());
        stats
    }

    /// Remove every primitive this renderer owns
    pub fn clear(&mut self, surface: &mut dyn DrawSurface) -> usize {
        self.slots.clear();
        self.solid_batch = None;
        self.scalar_batch = None;
        surface
            .owned_by(self.owner)
            .into_iter()
            .filter(|&h| surface.remove(h))
            .count()
    }

    fn place_scatter(
        &self,
        surface: &mut dyn DrawSurface,
        previous: Option<ScatterSlot>,
        data: ScatterData,
        stats: &mut FrameStats,
    ) -> ScatterSlot {
        let kind = data.kind();
        match previous {
            Some(slot) if slot.kind == kind => match surface.update_scatter(slot.handle, data) {
                Ok(()) => {
                    if !slot.shown {
                        surface.set_visible(slot.handle, true);
                    }
                    stats.scatter_updated += 1;
                    ScatterSlot {
                        shown: true,
                        ..slot
                    }
                }
                Err(data) => {
                    tracing::debug!("Scatter handle {} vanished, recreating", slot.handle);
                    self.create_scatter(surface, data, stats)
                }
            },
            Some(_) => {
                stats.scatter_recreated += 1;
                self.create_scatter(surface, data, stats)
            }
            None => self.create_scatter(surface, data, stats),
        }
    }

    fn create_scatter(
        &self,
        surface: &mut dyn DrawSurface,
        data: ScatterData,
        stats: &mut FrameStats,
    ) -> ScatterSlot {
        let kind = data.kind();
        let handle = surface.create_scatter(self.owner, data);
        stats.scatter_created += 1;
        ScatterSlot {
            handle,
            kind,
            shown: true,
        }
    }

    fn rebuild_line_batches(
        &mut self,
        surface: &mut dyn DrawSurface,
        solid: SolidBucket,
        scalar: ScalarBucket,
    ) {
        if let Some(handle) = self.solid_batch.take() {
            surface.remove(handle);
        }
        if let Some(handle) = self.scalar_batch.take() {
            surface.remove(handle);
        }
        let alpha = self.options.line_alpha;
        self.solid_batch = solid
            .into_batch(alpha)
            .map(|batch| surface.create_line_batch(self.owner, batch));
        self.scalar_batch = scalar
            .into_batch(alpha)
            .map(|batch| surface.create_line_batch(self.owner, batch));
    }
}
