//! Plot groups and shared colour ranges.
//!
//! A group is registered once, after its members exist, and is immutable in
//! membership and range afterwards. Member style stays independently mutable.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::state::{GroupId, PlotIndex, COLOR_RANGE_EPSILON, DEGENERATE_COLOR_VALUE};

/// Inclusive `(min, max)` range of scalar colour values
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorRange {
    pub min: f64,
    pub max: f64,
}

impl ColorRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Extrema of `values`, ignoring non-finite values. `None` if nothing
    /// finite remains.
    pub fn of(values: &[f64]) -> Option<Self> {
        values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<Self>, v| match acc {
                None => Some(Self::new(v, v)),
                Some(r) => Some(Self::new(r.min.min(v), r.max.max(v))),
            })
    }

    /// Smallest range covering both
    pub fn union(self, other: Self) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    #[inline]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Constant data: span at or below the epsilon
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.span() <= COLOR_RANGE_EPSILON
    }

    /// Map a value into `[0, 1]` relative to this range.
    ///
    /// Degenerate ranges and NaN map to the midpoint 0.5. Values outside
    /// the range, infinities included, clamp to the nearest end.
    #[inline]
    pub fn normalize(&self, value: f64) -> f32 {
        if self.is_degenerate() || value.is_nan() {
            return DEGENERATE_COLOR_VALUE;
        }
        ((value - self.min) / self.span()).clamp(0.0, 1.0) as f32
    }
}

/// Running union of member ranges while a group is being assembled
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColorRangeAccumulator {
    range: Option<ColorRange>,
}

impl ColorRangeAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a member's local extrema into the running range.
    /// Returns the member's own range.
    pub fn include(&mut self, values: &[f64]) -> Option<ColorRange> {
        let local = ColorRange::of(values)?;
        self.include_range(local);
        Some(local)
    }

    pub fn include_range(&mut self, local: ColorRange) {
        self.range = Some(match self.range {
            None => local,
            Some(current) => current.union(local),
        });
    }

    /// The finalized range, if any member contributed values
    pub fn finish(&self) -> Option<ColorRange> {
        self.range
    }
}

/// A registered group of plots sharing one colour scale
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlotGroup {
    pub id: GroupId,
    pub name: String,
    pub members: Vec<PlotIndex>,
    pub color_field: String,
    pub color_range: ColorRange,
}

/// Registry of groups with the reverse plot → group map
#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: BTreeMap<GroupId, PlotGroup>,
    plot_to_group: HashMap<PlotIndex, GroupId>,
    next_id: GroupId,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a group and return its id.
    ///
    /// A plot belongs to at most one group, so members are moved out of any
    /// group they were in before.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        members: &[PlotIndex],
        color_field: impl Into<String>,
        color_range: ColorRange,
    ) -> GroupId {
        let id = self.next_id;
        self.next_id += 1;

        for &plot in members {
            if let Some(previous) = self.plot_to_group.insert(plot, id) {
                if let Some(group) = self.groups.get_mut(&previous) {
                    group.members.retain(|&m| m != plot);
                }
            }
        }

        self.groups.insert(
            id,
            PlotGroup {
                id,
                name: name.into(),
                members: members.to_vec(),
                color_field: color_field.into(),
                color_range,
            },
        );
        id
    }

    pub fn get(&self, id: GroupId) -> Option<&PlotGroup> {
        self.groups.get(&id)
    }

    pub fn group_of(&self, plot: PlotIndex) -> Option<GroupId> {
        self.plot_to_group.get(&plot).copied()
    }

    /// All groups in id order
    pub fn all(&self) -> impl Iterator<Item = &PlotGroup> {
        self.groups.values()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// The active selection: one plot or one group, never both
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    Plot(PlotIndex),
    Group(GroupId),
}

impl Default for Selection {
    fn default() -> Self {
        Self::Plot(0)
    }
}
