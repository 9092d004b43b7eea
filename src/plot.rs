//! The plot entity: one renderable set of 2D points with shared style.

use serde::{Deserialize, Serialize};

use crate::color::{Colormap, Rgba};
use crate::error::{Result, ViewerError};
use crate::group::ColorRange;
use crate::state::{PlotIndex, DEFAULT_LINE_WIDTH, DEFAULT_POINT_SIZE};

/// Visual style of a plot
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlotStyle {
    /// Scatter marker size
    pub size: f32,
    /// Colormap used for scalar colour data
    pub colormap: Colormap,
    /// Connect consecutive points with line segments
    pub draw_lines: bool,
    /// Explicit line colour, overriding colour mapping for lines
    pub line_color: Option<Rgba>,
    /// Line width for connecting segments
    pub line_width: f32,
    /// Flat marker colour used when the plot has no colour data
    pub marker_color: Rgba,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            size: DEFAULT_POINT_SIZE,
            colormap: Colormap::default(),
            draw_lines: false,
            line_color: None,
            line_width: DEFAULT_LINE_WIDTH,
            marker_color: Rgba::WHITE,
        }
    }
}

/// Offset added to every point at render time
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Placement {
    pub const fn new(offset_x: f64, offset_y: f64) -> Self {
        Self { offset_x, offset_y }
    }
}

/// Everything needed to create a plot
#[derive(Clone, Debug, Default)]
pub struct NewPlot {
    pub points: Vec<[f64; 2]>,
    pub color_data: Option<Vec<f64>>,
    pub style: PlotStyle,
    pub placement: Placement,
    pub visible: bool,
    pub name: Option<String>,
    /// Group-assigned colour range, applied at add time
    pub global_range: Option<ColorRange>,
    /// Shown in the array dropdown
    pub is_array_parent: bool,
}

impl NewPlot {
    /// A visible plot with default style
    pub fn new(points: Vec<[f64; 2]>) -> Self {
        Self {
            points,
            visible: true,
            ..Default::default()
        }
    }

    pub fn with_colors(mut self, color_data: Vec<f64>) -> Self {
        self.color_data = Some(color_data);
        self
    }

    pub fn with_style(mut self, style: PlotStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_global_range(mut self, range: ColorRange) -> Self {
        self.global_range = Some(range);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Check the point/colour length invariant
    pub fn validate(&self) -> Result<()> {
        if let Some(colors) = &self.color_data {
            if colors.len() != self.points.len() {
                return Err(ViewerError::LengthMismatch {
                    points: self.points.len(),
                    colors: colors.len(),
                });
            }
        }
        Ok(())
    }
}

/// A single plot entity.
///
/// Geometry is immutable after creation; style, placement, visibility and the
/// name are the mutable parts.
#[derive(Clone, Debug)]
pub struct Plot {
    index: PlotIndex,
    points: Vec<[f64; 2]>,
    color_data: Option<Vec<f64>>,
    pub(crate) style: PlotStyle,
    pub(crate) placement: Placement,
    pub(crate) visible: bool,
    pub(crate) removed: bool,
    pub(crate) name: Option<String>,
    pub(crate) global_range: Option<ColorRange>,
}

impl Plot {
    pub(crate) fn from_new(index: PlotIndex, new: NewPlot) -> Result<Self> {
        new.validate()?;
        Ok(Self {
            index,
            points: new.points,
            // An empty colour array carries no information
            color_data: new.color_data.filter(|c| !c.is_empty()),
            style: new.style,
            placement: new.placement,
            visible: new.visible,
            removed: false,
            name: new.name,
            global_range: new.global_range,
        })
    }

    #[inline]
    pub fn index(&self) -> PlotIndex {
        self.index
    }

    /// Stored points, without offsets applied
    #[inline]
    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    #[inline]
    pub fn color_data(&self) -> Option<&[f64]> {
        self.color_data.as_deref()
    }

    #[inline]
    pub fn has_color_data(&self) -> bool {
        self.color_data.is_some()
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn style(&self) -> &PlotStyle {
        &self.style
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Visible and not logically removed
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible && !self.removed
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Group-assigned colour range, if any
    pub fn global_range(&self) -> Option<ColorRange> {
        self.global_range
    }

    /// Display label: custom name or `Plot <n>`, with the point count
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("{} ({} pts)", name, format_count(self.points.len())),
            None => format!(
                "Plot {} ({} pts)",
                self.index + 1,
                format_count(self.points.len())
            ),
        }
    }

    /// Snapshot of the plot's mutable state
    pub fn info(&self) -> PlotInfo {
        PlotInfo {
            index: self.index,
            name: self.label(),
            point_count: self.points.len(),
            visible: self.is_visible(),
            size: self.style.size,
            colormap: self.style.colormap,
            has_color_data: self.has_color_data(),
            offset_x: self.placement.offset_x,
            offset_y: self.placement.offset_y,
            draw_lines: self.style.draw_lines,
        }
    }
}

/// Summary of a single plot for list displays
#[derive(Clone, Debug, PartialEq)]
pub struct PlotInfo {
    pub index: PlotIndex,
    pub name: String,
    pub point_count: usize,
    pub visible: bool,
    pub size: f32,
    pub colormap: Colormap,
    pub has_color_data: bool,
    pub offset_x: f64,
    pub offset_y: f64,
    pub draw_lines: bool,
}

/// Format an integer with thousands separators
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
