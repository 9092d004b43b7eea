//! Structured arrays and the requests that turn their fields into plots.
//!
//! A structured array is a table of named `f64` columns. A plot takes one x
//! field, one y field and optionally a colour field. The registry remembers
//! which source array each plot came from so other fields of the same array
//! can be toggled on later with identical transform and style.

use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};

use crate::error::{Result, ViewerError};
use crate::group::ColorRange;
use crate::plot::{NewPlot, Placement, PlotStyle};
use crate::state::{ArrayIndex, PlotIndex};
use crate::transform::{TransformEngine, TransformParams};

/// Named columns of equal length
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StructuredArray {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl StructuredArray {
    /// Build from `(name, values)` columns. Rejects ragged or duplicate columns.
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Vec<f64>)>) -> Result<Self> {
        let mut array = Self::default();
        for (name, values) in columns {
            let name = name.into();
            if array.names.contains(&name) {
                return Err(ViewerError::DuplicateField(name));
            }
            if let Some(first) = array.columns.first() {
                if first.len() != values.len() {
                    return Err(ViewerError::RaggedColumns {
                        field: name,
                        expected: first.len(),
                        found: values.len(),
                    });
                }
            }
            array.names.push(name);
            array.columns.push(values);
        }
        Ok(array)
    }

    pub fn field_names(&self) -> &[String] {
        &self.names
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Values of a field
    pub fn field(&self, name: &str) -> Option<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn require(&self, role: &'static str, name: &str) -> Result<&[f64]> {
        self.field(name)
            .ok_or_else(|| ViewerError::field_not_found(role, name, &self.names))
    }
}

/// How the points of a new plot are transformed
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum TransformRequest {
    #[default]
    Raw,
    Normalize,
    Center,
    /// Replay parameters saved from an earlier plot
    Replay(TransformParams),
}

/// Everything needed to create a plot from a structured array
#[derive(Clone, Debug, PartialEq)]
pub struct PlotRequest {
    pub x_field: String,
    pub y_field: String,
    pub color_field: Option<String>,
    pub normalize: bool,
    pub center: bool,
    pub transform_params: Option<TransformParams>,
    pub style: PlotStyle,
    pub placement: Placement,
    pub visible: bool,
    pub name: Option<String>,
}

impl PlotRequest {
    pub fn new(x_field: impl Into<String>, y_field: impl Into<String>) -> Self {
        Self {
            x_field: x_field.into(),
            y_field: y_field.into(),
            color_field: None,
            normalize: false,
            center: false,
            transform_params: None,
            style: PlotStyle::default(),
            placement: Placement::default(),
            visible: true,
            name: None,
        }
    }

    pub fn color_field(mut self, field: impl Into<String>) -> Self {
        self.color_field = Some(field.into());
        self
    }

    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn center(mut self, center: bool) -> Self {
        self.center = center;
        self
    }

    pub fn transform_params(mut self, params: TransformParams) -> Self {
        self.transform_params = Some(params);
        self
    }

    pub fn style(mut self, style: PlotStyle) -> Self {
        self.style = style;
        self
    }

    pub fn offset(mut self, offset_x: f64, offset_y: f64) -> Self {
        self.placement = Placement::new(offset_x, offset_y);
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Resolve the transform flags; saved params win over the flags
    pub fn transform(&self) -> Result<TransformRequest> {
        if let Some(params) = self.transform_params {
            return Ok(TransformRequest::Replay(params));
        }
        match (self.normalize, self.center) {
            (true, true) => Err(ViewerError::ConflictingTransform),
            (true, false) => Ok(TransformRequest::Normalize),
            (false, true) => Ok(TransformRequest::Center),
            (false, false) => Ok(TransformRequest::Raw),
        }
    }

    /// Display name: explicit name or the y field
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.y_field)
    }
}

/// A validated, transformed plot ready to be stored
#[derive(Clone, Debug)]
pub struct ProcessedPlot {
    pub plot: NewPlot,
    pub transform_params: TransformParams,
    /// Extrema of the colour field, when one was requested
    pub color_range: Option<ColorRange>,
}

/// Validate a request against an array and produce plot data.
///
/// Every check runs before any data is extracted, so a failing request
/// leaves no trace.
pub fn process_request(
    array: &StructuredArray,
    request: &PlotRequest,
    engine: &dyn TransformEngine,
) -> Result<ProcessedPlot> {
    let transform = request.transform()?;
    if array.field_names().len() < 2 {
        return Err(ViewerError::TooFewFields {
            found: array.field_names().len(),
        });
    }
    let xs = array.require("X", &request.x_field)?;
    let ys = array.require("Y", &request.y_field)?;
    let colors = match &request.color_field {
        Some(field) => Some(array.require("Color", field)?),
        None => None,
    };

    let raw_points: Vec<[f64; 2]> = xs.iter().zip(ys).map(|(&x, &y)| [x, y]).collect();
    let (points, transform_params) = match transform {
        TransformRequest::Raw => engine.raw(&raw_points),
        TransformRequest::Normalize => engine.normalize(&raw_points),
        TransformRequest::Center => engine.center(&raw_points),
        TransformRequest::Replay(params) => (engine.apply(&raw_points, &params), params),
    };

    let color_data = colors.map(<[f64]>::to_vec);
    let color_range = color_data.as_deref().and_then(ColorRange::of);

    let plot = NewPlot {
        points,
        color_data,
        style: request.style.clone(),
        placement: request.placement,
        visible: request.visible,
        name: Some(request.display_name().to_string()),
        global_range: None,
        is_array_parent: true,
    };
    plot.validate()?;

    Ok(ProcessedPlot {
        plot,
        transform_params,
        color_range,
    })
}

/// A registered source array
#[derive(Clone, Debug)]
pub struct ArrayEntry {
    pub data: StructuredArray,
    pub x_field: String,
    pub name: String,
    /// Template used for fields toggled on later
    pub template: PlotRequest,
    /// Saved transform parameters as array metadata
    pub transform: Map<String, Value>,
    /// Colour range shared by every field plot of this array
    pub color_range: Option<ColorRange>,
}

/// Tracks arrays, their fields and the plots created for them
#[derive(Debug, Default)]
pub struct ArrayRegistry {
    arrays: BTreeMap<ArrayIndex, ArrayEntry>,
    /// array → field → plot (None when the field is not plotted)
    fields: HashMap<ArrayIndex, BTreeMap<String, Option<PlotIndex>>>,
    plot_to_field: HashMap<PlotIndex, (ArrayIndex, String)>,
    next_index: ArrayIndex,
}

impl ArrayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an array. Every field except x becomes toggleable.
    pub fn register(
        &mut self,
        data: StructuredArray,
        template: PlotRequest,
        transform: &TransformParams,
        color_range: Option<ColorRange>,
    ) -> ArrayIndex {
        let index = self.next_index;
        self.next_index += 1;

        let field_map = data
            .field_names()
            .iter()
            .filter(|f| **f != template.x_field)
            .map(|f| (f.clone(), None))
            .collect();
        self.fields.insert(index, field_map);

        let name = template
            .name
            .clone()
            .unwrap_or_else(|| format!("Array {}", index + 1));
        self.arrays.insert(
            index,
            ArrayEntry {
                x_field: template.x_field.clone(),
                data,
                name,
                template,
                transform: transform.to_map(),
                color_range,
            },
        );
        index
    }

    /// Record that `field` of `array` is drawn by `plot`
    pub fn register_field_plot(&mut self, array: ArrayIndex, field: &str, plot: PlotIndex) {
        if let Some(fields) = self.fields.get_mut(&array) {
            fields.insert(field.to_string(), Some(plot));
            self.plot_to_field.insert(plot, (array, field.to_string()));
        }
    }

    /// Mark a field as no longer plotted, returning its former plot
    pub fn unregister_field_plot(&mut self, array: ArrayIndex, field: &str) -> Option<PlotIndex> {
        let slot = self.fields.get_mut(&array)?.get_mut(field)?;
        let plot = slot.take()?;
        self.plot_to_field.remove(&plot);
        Some(plot)
    }

    pub fn get(&self, array: ArrayIndex) -> Option<&ArrayEntry> {
        self.arrays.get(&array)
    }

    /// Registered array indices in ascending order
    pub fn indices(&self) -> impl Iterator<Item = ArrayIndex> + '_ {
        self.arrays.keys().copied()
    }

    pub fn name(&self, array: ArrayIndex) -> Option<&str> {
        self.arrays.get(&array).map(|a| a.name.as_str())
    }

    /// All non-x field names of an array
    pub fn fields(&self, array: ArrayIndex) -> Vec<String> {
        self.fields
            .get(&array)
            .map(|f| f.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Fields that currently have a plot
    pub fn active_fields(&self, array: ArrayIndex) -> Vec<String> {
        self.fields
            .get(&array)
            .map(|f| {
                f.iter()
                    .filter(|(_, plot)| plot.is_some())
                    .map(|(name, _)| name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_field_active(&self, array: ArrayIndex, field: &str) -> bool {
        self.field_plot(array, field).is_some()
    }

    pub fn field_plot(&self, array: ArrayIndex, field: &str) -> Option<PlotIndex> {
        self.fields.get(&array)?.get(field).copied().flatten()
    }

    /// Source array and field of a plot
    pub fn field_of_plot(&self, plot: PlotIndex) -> Option<(ArrayIndex, &str)> {
        self.plot_to_field
            .get(&plot)
            .map(|(array, field)| (*array, field.as_str()))
    }

    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }
}
