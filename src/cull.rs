//! Per-frame viewport culling.
//!
//! A pure function of the view rectangle and the plot list. Each plot is
//! offset, masked against the padded view and has its colour values
//! normalized to `[0, 1]`. Plots are independent, so the work is spread
//! across the rayon pool; output order always matches input order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::group::ColorRange;
use crate::plot::{Placement, Plot, PlotStyle};
use crate::state::{PlotIndex, ViewRect, CULL_MARGIN, DEGENERATE_COLOR_VALUE};

/// Where a plot without a group range takes its colour extrema from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalRangePolicy {
    /// Extrema of the points inside the padded view, recomputed every frame.
    /// Colours shift slightly while panning.
    #[default]
    VisibleSubset,
    /// Extrema of the whole colour array, stable under panning
    FullData,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CullOptions {
    /// Fraction of the view extent added on every side
    pub margin: f64,
    pub local_range: LocalRangePolicy,
}

impl Default for CullOptions {
    fn default() -> Self {
        Self {
            margin: CULL_MARGIN,
            local_range: LocalRangePolicy::default(),
        }
    }
}

/// One plot after culling, in display coordinates
#[derive(Clone, Debug, PartialEq)]
pub struct CulledPlot {
    pub index: PlotIndex,
    /// False for hidden or removed plots, which carry no points
    pub visible: bool,
    /// Logically removed; the renderer releases its primitives
    pub removed: bool,
    /// Masked points with the plot offset applied
    pub points: Vec<[f64; 2]>,
    /// Masked colour values normalized to `[0, 1]`
    pub colors: Option<Vec<f32>>,
    pub style: PlotStyle,
}

impl CulledPlot {
    fn hidden(plot: &Plot) -> Self {
        Self {
            index: plot.index(),
            visible: false,
            removed: plot.is_removed(),
            points: Vec::new(),
            colors: None,
            style: plot.style().clone(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the scatter for this plot is colour mapped
    #[inline]
    pub fn is_color_mapped(&self) -> bool {
        self.colors.as_ref().is_some_and(|c| !c.is_empty())
    }
}

/// Inclusion mask of `points`, shifted by `placement`, against `rect`.
///
/// `rect` is used as is; pad it first with [`ViewRect::padded`].
pub fn cull_mask(points: &[[f64; 2]], placement: Placement, rect: &ViewRect) -> Vec<bool> {
    points
        .iter()
        .map(|&[x, y]| rect.contains(x + placement.offset_x, y + placement.offset_y))
        .collect()
}

/// Normalize `values` into `[0, 1]` against `range`.
///
/// Without a range (no finite values) every output is the midpoint.
pub fn normalize_colors(values: &[f64], range: Option<ColorRange>) -> Vec<f32> {
    match range {
        Some(range) => values.iter().map(|&v| range.normalize(v)).collect(),
        None => vec![DEGENERATE_COLOR_VALUE; values.len()],
    }
}

/// Cull a single plot against an already padded rectangle
pub fn cull_plot(plot: &Plot, padded: &ViewRect, local_range: LocalRangePolicy) -> CulledPlot {
    if !plot.is_visible() {
        return CulledPlot::hidden(plot);
    }

    let placement = plot.placement();
    let mask = cull_mask(plot.points(), placement, padded);

    let points: Vec<[f64; 2]> = plot
        .points()
        .iter()
        .zip(&mask)
        .filter(|(_, keep)| **keep)
        .map(|(&[x, y], _)| [x + placement.offset_x, y + placement.offset_y])
        .collect();

    let colors = plot.color_data().map(|data| {
        let masked: Vec<f64> = data
            .iter()
            .zip(&mask)
            .filter(|(_, keep)| **keep)
            .map(|(&v, _)| v)
            .collect();
        let range = match (plot.global_range(), local_range) {
            (Some(global), _) => Some(global),
            (None, LocalRangePolicy::VisibleSubset) => ColorRange::of(&masked),
            (None, LocalRangePolicy::FullData) => ColorRange::of(data),
        };
        normalize_colors(&masked, range)
    });

    CulledPlot {
        index: plot.index(),
        visible: true,
        removed: false,
        points,
        colors,
        style: plot.style().clone(),
    }
}

/// Cull every plot against `view`. One output per input plot, same order.
pub fn cull_frame(plots: &[Plot], view: &ViewRect, options: &CullOptions) -> Vec<CulledPlot> {
    let padded = view.padded(options.margin);
    plots
        .par_iter()
        .map(|plot| cull_plot(plot, &padded, options.local_range))
        .collect()
}

/// The drawn point closest to a cursor
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NearestPoint {
    pub index: PlotIndex,
    /// Position within the plot's stored points
    pub point_index: usize,
    /// Display coordinates with the plot offset applied
    pub position: [f64; 2],
    /// Raw colour value of the point, if the plot has colour data
    pub value: Option<f64>,
    /// Screen-space distance to the cursor
    pub distance_px: f64,
}

/// Find the drawn point nearest to `cursor` in screen space.
///
/// Candidates are the points that survive culling against `view` padded by
/// `margin`, so hidden plots and far off-screen points never match.
/// `px_per_unit` converts data units to pixels on each axis. On ties the
/// earlier plot wins.
pub fn nearest_point(
    plots: &[Plot],
    view: &ViewRect,
    margin: f64,
    cursor: [f64; 2],
    px_per_unit: [f64; 2],
) -> Option<NearestPoint> {
    let padded = view.padded(margin);
    plots
        .iter()
        .filter(|plot| plot.is_visible())
        .filter_map(|plot| nearest_in_plot(plot, &padded, cursor, px_per_unit))
        .fold(None, |best: Option<NearestPoint>, candidate| match best {
            Some(best) if best.distance_px <= candidate.distance_px => Some(best),
            _ => Some(candidate),
        })
}

fn nearest_in_plot(
    plot: &Plot,
    padded: &ViewRect,
    cursor: [f64; 2],
    [sx, sy]: [f64; 2],
) -> Option<NearestPoint> {
    let placement = plot.placement();
    let mask = cull_mask(plot.points(), placement, padded);
    plot.points()
        .iter()
        .zip(&mask)
        .enumerate()
        .filter(|(_, (_, keep))| **keep)
        .map(|(i, (&[x, y], _))| {
            let position = [x + placement.offset_x, y + placement.offset_y];
            let dx = (position[0] - cursor[0]) * sx;
            let dy = (position[1] - cursor[1]) * sy;
            NearestPoint {
                index: plot.index(),
                point_index: i,
                position,
                value: plot.color_data().and_then(|data| data.get(i).copied()),
                distance_px: dx.hypot(dy),
            }
        })
        .min_by(|a, b| a.distance_px.total_cmp(&b.distance_px))
}
