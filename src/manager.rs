//! Plot manager: entity store, groups, selection and change notifications.
//!
//! Every mutating call emits at most one notification. Group-wide mutations
//! touch all members silently and then emit a single `PlotsChanged`, which
//! keeps a group of hundreds of plots down to one rebuild.

use std::sync::mpsc::Receiver;

use crate::error::Result;
use crate::events::{EventHub, PlotEvent};
use crate::group::{ColorRange, GroupRegistry, PlotGroup, Selection};
use crate::plot::{NewPlot, Plot, PlotInfo};
use crate::property::{PlotProperty, SelectionProperties};
use crate::state::{GroupId, PlotIndex};
use crate::store::PlotStore;

#[derive(Debug, Default)]
pub struct PlotManager {
    store: PlotStore,
    groups: GroupRegistry,
    selection: Selection,
    events: EventHub,
}

impl PlotManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive every notification emitted from now on
    pub fn subscribe(&mut self) -> Receiver<PlotEvent> {
        self.events.subscribe()
    }

    /// Forward a pipeline event to subscribers
    pub(crate) fn notify(&mut self, event: PlotEvent) {
        self.events.emit(event);
    }

    pub fn store(&self) -> &PlotStore {
        &self.store
    }

    pub fn plot_count(&self) -> usize {
        self.store.len()
    }

    pub fn get(&self, index: PlotIndex) -> Option<&Plot> {
        self.store.get(index)
    }

    pub fn all(&self) -> &[Plot] {
        self.store.all()
    }

    pub fn plot_info(&self, index: PlotIndex) -> Option<PlotInfo> {
        self.store.get(index).map(Plot::info)
    }

    pub fn labels(&self) -> &[String] {
        self.store.labels()
    }

    pub fn array_labels(&self) -> Vec<(PlotIndex, String)> {
        self.store.array_labels()
    }

    // ------------------------------------------------------------------
    // Entity operations
    // ------------------------------------------------------------------

    /// Add a plot. Shape errors are raised before anything is stored.
    pub fn add_plot(&mut self, new: NewPlot) -> Result<PlotIndex> {
        let points = new.points.len();
        let index = self.store.add(new)?;
        tracing::debug!("Added plot {} ({} points)", index, points);
        self.events.emit(PlotEvent::PlotAdded(index));
        Ok(index)
    }

    pub fn set_plot_property(&mut self, index: PlotIndex, property: PlotProperty) -> bool {
        if self.store.get(index).is_none() {
            tracing::debug!("Ignoring property change for unknown plot {}", index);
            return false;
        }
        if let Err(e) = property.validate() {
            tracing::debug!("Rejecting property for plot {}: {}", index, e);
            return false;
        }
        let changed = self.store.set_property(index, &property);
        if changed {
            self.events.emit(PlotEvent::PropertiesChanged(index));
        }
        changed
    }

    pub fn set_visibility(&mut self, index: PlotIndex, visible: bool) -> bool {
        let changed = self.store.set_visibility(index, visible);
        if changed {
            self.events
                .emit(PlotEvent::VisibilityChanged { index, visible });
        } else if self.store.get(index).is_none() {
            tracing::debug!("Ignoring visibility change for unknown plot {}", index);
        }
        changed
    }

    pub fn set_plot_name(&mut self, index: PlotIndex, name: impl Into<String>) -> bool {
        let changed = self.store.set_name(index, name);
        if changed {
            self.events.emit(PlotEvent::PropertiesChanged(index));
        }
        changed
    }

    pub fn plot_name(&self, index: PlotIndex) -> Option<&str> {
        self.store.get(index).and_then(Plot::name)
    }

    /// Logically remove a plot. Its index is never reused.
    pub fn remove_plot(&mut self, index: PlotIndex) -> bool {
        let removed = self.store.remove(index);
        if removed {
            self.events.emit(PlotEvent::PlotRemoved(index));
        }
        removed
    }

    pub fn global_range(&self, index: PlotIndex) -> Option<ColorRange> {
        self.store.get(index).and_then(Plot::global_range)
    }

    // ------------------------------------------------------------------
    // Groups
    // ------------------------------------------------------------------

    /// Register a group over existing plots.
    ///
    /// Plots are not touched here; the caller applies the range at add time.
    pub fn register_group(
        &mut self,
        name: impl Into<String>,
        members: &[PlotIndex],
        color_field: impl Into<String>,
        color_range: ColorRange,
    ) -> GroupId {
        let name = name.into();
        let id = self
            .groups
            .register(name.clone(), members, color_field, color_range);
        tracing::info!(
            "Registered plot group {}: '{}' with {} plots",
            id,
            name,
            members.len()
        );
        id
    }

    pub fn group(&self, id: GroupId) -> Option<&PlotGroup> {
        self.groups.get(id)
    }

    pub fn group_of(&self, index: PlotIndex) -> Option<GroupId> {
        self.groups.group_of(index)
    }

    pub fn groups(&self) -> impl Iterator<Item = &PlotGroup> {
        self.groups.all()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Apply a property to every member of a group with one notification.
    ///
    /// The property is validated once up front, so the member loop cannot
    /// fail partway. Returns whether any member changed.
    pub fn set_group_property(&mut self, id: GroupId, property: PlotProperty) -> bool {
        if let Err(e) = property.validate() {
            tracing::debug!("Rejecting property for group {}: {}", id, e);
            return false;
        }
        let Some(group) = self.groups.get(id) else {
            tracing::debug!("Ignoring property change for unknown group {}", id);
            return false;
        };

        let mut changed = false;
        for &index in &group.members {
            changed |= self.store.set_property(index, &property);
        }

        if changed {
            self.events.emit(PlotEvent::PlotsChanged);
        }
        changed
    }

    /// Show or hide every member of a group with one notification
    pub fn set_group_visibility(&mut self, id: GroupId, visible: bool) -> bool {
        let Some(group) = self.groups.get(id) else {
            return false;
        };

        let mut changed = false;
        for &index in &group.members {
            changed |= self.store.set_visibility(index, visible);
        }

        if changed {
            self.events.emit(PlotEvent::PlotsChanged);
        }
        changed
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn is_group_selected(&self) -> bool {
        matches!(self.selection, Selection::Group(_))
    }

    /// Select a group, clearing any single-plot selection
    pub fn select_group(&mut self, id: GroupId) -> bool {
        if self.groups.get(id).is_none() || self.selection == Selection::Group(id) {
            return false;
        }
        self.selection = Selection::Group(id);
        self.events.emit(PlotEvent::GroupSelectionChanged(id));
        true
    }

    /// Select a single plot, clearing any group selection
    pub fn select_plot(&mut self, index: PlotIndex) -> bool {
        if index >= self.store.len() || self.selection == Selection::Plot(index) {
            return false;
        }
        self.selection = Selection::Plot(index);
        self.events.emit(PlotEvent::SelectionChanged(index));
        true
    }

    /// Plot indices targeted by the selection
    pub fn selected_targets(&self) -> Vec<PlotIndex> {
        match self.selection {
            Selection::Group(id) => self
                .groups
                .get(id)
                .map(|g| g.members.clone())
                .unwrap_or_default(),
            Selection::Plot(index) if index < self.store.len() => vec![index],
            Selection::Plot(_) => Vec::new(),
        }
    }

    /// Property values of the selection, `Mixed` where members disagree
    pub fn selected_properties(&self) -> Option<SelectionProperties> {
        let targets = self.selected_targets();
        SelectionProperties::collect(targets.iter().filter_map(|&i| self.store.get(i)))
    }

    /// Apply a property to whatever is selected
    pub fn set_selected_property(&mut self, property: PlotProperty) -> bool {
        match self.selection {
            Selection::Group(id) => self.set_group_property(id, property),
            Selection::Plot(index) => self.set_plot_property(index, property),
        }
    }

    /// Show or hide whatever is selected
    pub fn set_selected_visibility(&mut self, visible: bool) -> bool {
        match self.selection {
            Selection::Group(id) => self.set_group_visibility(id, visible),
            Selection::Plot(index) => self.set_visibility(index, visible),
        }
    }
}
