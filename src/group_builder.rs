//! Deferred construction of a plot group.
//!
//! Members are validated and processed as they are added, so a bad member is
//! rejected before anything reaches the store. The shared colour range grows
//! as the union of member extrema and is applied to every member at
//! [`PlotGroupBuilder::finish`], followed by a single rebuild.

use std::collections::BTreeSet;

use crate::array::{PlotRequest, ProcessedPlot, StructuredArray};
use crate::error::{Result, ViewerError};
use crate::group::{ColorRange, ColorRangeAccumulator};
use crate::state::{GroupId, PlotIndex};
use crate::viewer::Viewer;

struct PendingMember {
    array: StructuredArray,
    request: PlotRequest,
    processed: ProcessedPlot,
}

#[must_use = "a plot group adds nothing until finish() is called"]
pub struct PlotGroupBuilder<'a> {
    viewer: &'a mut Viewer,
    color_field: String,
    name: Option<String>,
    fields: Option<BTreeSet<String>>,
    members: Vec<PendingMember>,
    range: ColorRangeAccumulator,
}

impl<'a> PlotGroupBuilder<'a> {
    pub(crate) fn new(viewer: &'a mut Viewer, color_field: String, name: Option<String>) -> Self {
        tracing::info!("Starting plot group with color field '{}'", color_field);
        Self {
            viewer,
            color_field,
            name,
            fields: None,
            members: Vec::new(),
            range: ColorRangeAccumulator::new(),
        }
    }

    /// Queue a member. The request's colour field defaults to the group's.
    ///
    /// Every member must have exactly the field set of the first one.
    pub fn add_plot(&mut self, array: StructuredArray, mut request: PlotRequest) -> Result<()> {
        let color_field = request
            .color_field
            .get_or_insert_with(|| self.color_field.clone())
            .clone();
        if !array.has_field(&color_field) {
            return Err(ViewerError::field_not_found(
                "Color",
                color_field,
                array.field_names(),
            ));
        }

        let current: BTreeSet<String> = array.field_names().iter().cloned().collect();
        if let Some(expected) = &self.fields {
            if *expected != current {
                return Err(ViewerError::FieldSetMismatch {
                    missing: expected.difference(&current).cloned().collect(),
                    extra: current.difference(expected).cloned().collect(),
                });
            }
        }

        let processed = self.viewer.process(&array, &request)?;
        if let Some(local) = processed.color_range {
            self.range.include_range(local);
            tracing::debug!(
                "Accumulated plot {}: {} (color range: [{:.3}, {:.3}])",
                self.members.len() + 1,
                request.display_name(),
                local.min,
                local.max
            );
        }

        self.fields.get_or_insert(current);
        self.members.push(PendingMember {
            array,
            request,
            processed,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Running union of the members' colour extrema
    pub fn color_range(&self) -> Option<ColorRange> {
        self.range.finish()
    }

    /// Add every member with the shared range, register the group and
    /// rebuild once. An empty builder adds nothing and returns `None`.
    pub fn finish(self) -> Result<Option<GroupId>> {
        if self.members.is_empty() {
            tracing::info!("No plots accumulated in plot group");
            return Ok(None);
        }

        let range = self.range.finish().unwrap_or_else(|| {
            tracing::debug!("Plot group has no finite color values, using a constant range");
            ColorRange::new(0.0, 0.0)
        });
        let viewer = self.viewer;
        let name = self
            .name
            .unwrap_or_else(|| format!("Group {}", viewer.manager().group_count() + 1));
        tracing::info!(
            "Finalizing plot group '{}': {} plots, color range [{:.3}, {:.3}]",
            name,
            self.members.len(),
            range.min,
            range.max
        );

        let mut indices: Vec<PlotIndex> = Vec::with_capacity(self.members.len());
        {
            let _scope = viewer.enter_busy("Adding plot group");
            for member in self.members {
                let (_, index) =
                    viewer.commit_plot(member.array, member.request, member.processed, Some(range))?;
                indices.push(index);
            }
        }

        let id = viewer
            .manager_mut()
            .register_group(name, &indices, self.color_field, range);
        viewer.refresh();
        Ok(Some(id))
    }
}
