//! Plot entity store.
//!
//! An arena of plots indexed by a stable integer. Removal is logical, so
//! indices held elsewhere (array registry, groups, UI lists) stay valid.

use std::cell::OnceCell;
use std::collections::BTreeSet;

use crate::error::Result;
use crate::plot::{NewPlot, Plot};
use crate::property::PlotProperty;
use crate::state::PlotIndex;

#[derive(Debug, Default)]
pub struct PlotStore {
    plots: Vec<Plot>,
    array_parents: BTreeSet<PlotIndex>,
    label_cache: OnceCell<Vec<String>>,
}

impl PlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plot. The index is the current count.
    pub fn add(&mut self, new: NewPlot) -> Result<PlotIndex> {
        let index = self.plots.len();
        let is_array_parent = new.is_array_parent;
        let plot = Plot::from_new(index, new)?;
        self.plots.push(plot);
        if is_array_parent {
            self.array_parents.insert(index);
        }
        self.invalidate_labels();
        Ok(index)
    }

    pub fn get(&self, index: PlotIndex) -> Option<&Plot> {
        self.plots.get(index)
    }

    /// All plots in index order (render z-order, first drawn first)
    pub fn all(&self) -> &[Plot] {
        &self.plots
    }

    /// Plots currently visible and not removed
    pub fn visible(&self) -> impl Iterator<Item = &Plot> {
        self.plots.iter().filter(|p| p.is_visible())
    }

    pub fn len(&self) -> usize {
        self.plots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plots.is_empty()
    }

    /// Apply a property. `false` if unchanged or the index is out of range.
    pub fn set_property(&mut self, index: PlotIndex, property: &PlotProperty) -> bool {
        match self.plots.get_mut(index) {
            Some(plot) if !plot.removed => property.apply(plot),
            _ => false,
        }
    }

    /// Set visibility. `false` if unchanged, removed or out of range.
    pub fn set_visibility(&mut self, index: PlotIndex, visible: bool) -> bool {
        match self.plots.get_mut(index) {
            Some(plot) if !plot.removed && plot.visible != visible => {
                plot.visible = visible;
                true
            }
            _ => false,
        }
    }

    pub fn set_name(&mut self, index: PlotIndex, name: impl Into<String>) -> bool {
        let Some(plot) = self.plots.get_mut(index) else {
            return false;
        };
        let name = name.into();
        if plot.name.as_deref() == Some(name.as_str()) {
            return false;
        }
        plot.name = Some(name);
        self.invalidate_labels();
        true
    }

    /// Permanently hide a plot; its index is never reused
    pub fn remove(&mut self, index: PlotIndex) -> bool {
        match self.plots.get_mut(index) {
            Some(plot) if !plot.removed => {
                plot.removed = true;
                plot.visible = false;
                self.array_parents.remove(&index);
                self.invalidate_labels();
                true
            }
            _ => false,
        }
    }

    pub fn is_array_parent(&self, index: PlotIndex) -> bool {
        self.array_parents.contains(&index)
    }

    /// Cached display labels, one per plot in index order
    pub fn labels(&self) -> &[String] {
        self.label_cache
            .get_or_init(|| self.plots.iter().map(Plot::label).collect())
    }

    /// Labels of plots marked as array parents, in index order
    pub fn array_labels(&self) -> Vec<(PlotIndex, String)> {
        self.array_parents
            .iter()
            .filter_map(|&i| self.plots.get(i))
            .map(|plot| {
                let label = match plot.name() {
                    Some(_) => plot.label(),
                    None => format!(
                        "Array {} ({} pts)",
                        plot.index() + 1,
                        crate::plot::format_count(plot.point_count())
                    ),
                };
                (plot.index(), label)
            })
            .collect()
    }

    fn invalidate_labels(&mut self) {
        self.label_cache = OnceCell::new();
    }
}
