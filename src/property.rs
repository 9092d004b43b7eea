//! Mutable plot properties.
//!
//! A property is a typed name/value pair. Values are validated when the
//! property is constructed, so applying one to any number of plots can never
//! fail halfway through a batch.

use std::str::FromStr;

use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::color::{Colormap, Rgba};
use crate::error::{Result, ViewerError};
use crate::plot::Plot;

/// Names of the mutable style and placement fields
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum PropertyName {
    Size,
    Colormap,
    DrawLines,
    OffsetX,
    OffsetY,
    LineColor,
    LineWidth,
}

/// A validated property value
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlotProperty {
    Size(f32),
    Colormap(Colormap),
    DrawLines(bool),
    OffsetX(f64),
    OffsetY(f64),
    LineColor(Option<Rgba>),
    LineWidth(f32),
}

impl PlotProperty {
    /// Parse a property from its name and a textual value.
    ///
    /// Sizes and widths must be finite and non-negative, offsets finite.
    /// `line_color` accepts `none` to clear the override.
    pub fn parse(name: &str, value: &str) -> Result<Self> {
        let prop_name =
            PropertyName::from_str(name).map_err(|_| ViewerError::UnknownProperty(name.to_string()))?;
        let invalid = || ViewerError::invalid_property(name, value);
        let trimmed = value.trim();

        let property = match prop_name {
            PropertyName::Size => Self::Size(trimmed.parse().map_err(|_| invalid())?),
            PropertyName::LineWidth => Self::LineWidth(trimmed.parse().map_err(|_| invalid())?),
            PropertyName::OffsetX => Self::OffsetX(trimmed.parse().map_err(|_| invalid())?),
            PropertyName::OffsetY => Self::OffsetY(trimmed.parse().map_err(|_| invalid())?),
            PropertyName::Colormap => {
                Self::Colormap(Colormap::from_str(trimmed).map_err(|_| invalid())?)
            }
            PropertyName::DrawLines => Self::DrawLines(match trimmed.to_ascii_lowercase().as_str() {
                "true" | "1" | "on" | "yes" => true,
                "false" | "0" | "off" | "no" => false,
                _ => return Err(invalid()),
            }),
            PropertyName::LineColor => {
                if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
                    Self::LineColor(None)
                } else {
                    Self::LineColor(Some(Rgba::parse(trimmed).map_err(|_| invalid())?))
                }
            }
        };
        property.validate()?;
        Ok(property)
    }

    /// Reject values that would corrupt rendering
    pub fn validate(&self) -> Result<()> {
        let ok = match *self {
            Self::Size(v) | Self::LineWidth(v) => v.is_finite() && v >= 0.0,
            Self::OffsetX(v) | Self::OffsetY(v) => v.is_finite(),
            Self::Colormap(_) | Self::DrawLines(_) | Self::LineColor(_) => true,
        };
        if ok {
            Ok(())
        } else {
            Err(ViewerError::invalid_property(
                self.name().as_ref(),
                format!("{:?}", self),
            ))
        }
    }

    pub fn name(&self) -> PropertyName {
        match self {
            Self::Size(_) => PropertyName::Size,
            Self::Colormap(_) => PropertyName::Colormap,
            Self::DrawLines(_) => PropertyName::DrawLines,
            Self::OffsetX(_) => PropertyName::OffsetX,
            Self::OffsetY(_) => PropertyName::OffsetY,
            Self::LineColor(_) => PropertyName::LineColor,
            Self::LineWidth(_) => PropertyName::LineWidth,
        }
    }

    /// Write the value into `plot`, returning whether anything changed
    pub(crate) fn apply(&self, plot: &mut Plot) -> bool {
        fn assign<T: PartialEq>(slot: &mut T, value: T) -> bool {
            if *slot == value {
                false
            } else {
                *slot = value;
                true
            }
        }

        match *self {
            Self::Size(v) => assign(&mut plot.style.size, v),
            Self::Colormap(v) => assign(&mut plot.style.colormap, v),
            Self::DrawLines(v) => assign(&mut plot.style.draw_lines, v),
            Self::OffsetX(v) => assign(&mut plot.placement.offset_x, v),
            Self::OffsetY(v) => assign(&mut plot.placement.offset_y, v),
            Self::LineColor(v) => assign(&mut plot.style.line_color, v),
            Self::LineWidth(v) => assign(&mut plot.style.line_width, v),
        }
    }
}

/// A property value across the current selection
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue<T> {
    /// Every selected plot has this value
    Uniform(T),
    /// Selected plots disagree
    Mixed,
}

impl<T> PropertyValue<T> {
    pub fn uniform(&self) -> Option<&T> {
        match self {
            Self::Uniform(v) => Some(v),
            Self::Mixed => None,
        }
    }

    pub fn is_mixed(&self) -> bool {
        matches!(self, Self::Mixed)
    }
}

impl<T: PartialEq> PropertyValue<T> {
    fn merge(&mut self, other: &T) {
        if let Self::Uniform(current) = self {
            if current != other {
                *self = Self::Mixed;
            }
        }
    }
}

/// Property values of the selected plot or group
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionProperties {
    pub size: PropertyValue<f32>,
    pub colormap: PropertyValue<Colormap>,
    pub draw_lines: PropertyValue<bool>,
    pub offset_x: PropertyValue<f64>,
    pub offset_y: PropertyValue<f64>,
    pub visible: PropertyValue<bool>,
    pub has_color_data: PropertyValue<bool>,
    pub line_color: PropertyValue<Option<Rgba>>,
    pub line_width: PropertyValue<f32>,
}

impl SelectionProperties {
    /// Collect values over the given plots; `None` when there are none
    pub fn collect<'a>(plots: impl IntoIterator<Item = &'a Plot>) -> Option<Self> {
        let mut iter = plots.into_iter();
        let first = iter.next()?;
        let mut props = Self {
            size: PropertyValue::Uniform(first.style.size),
            colormap: PropertyValue::Uniform(first.style.colormap),
            draw_lines: PropertyValue::Uniform(first.style.draw_lines),
            offset_x: PropertyValue::Uniform(first.placement.offset_x),
            offset_y: PropertyValue::Uniform(first.placement.offset_y),
            visible: PropertyValue::Uniform(first.is_visible()),
            has_color_data: PropertyValue::Uniform(first.has_color_data()),
            line_color: PropertyValue::Uniform(first.style.line_color),
            line_width: PropertyValue::Uniform(first.style.line_width),
        };
        for plot in iter {
            props.size.merge(&plot.style.size);
            props.colormap.merge(&plot.style.colormap);
            props.draw_lines.merge(&plot.style.draw_lines);
            props.offset_x.merge(&plot.placement.offset_x);
            props.offset_y.merge(&plot.placement.offset_y);
            props.visible.merge(&plot.is_visible());
            props.has_color_data.merge(&plot.has_color_data());
            props.line_color.merge(&plot.style.line_color);
            props.line_width.merge(&plot.style.line_width);
        }
        Some(props)
    }
}
