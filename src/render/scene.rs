//! In-memory retained scene.
//!
//! Holds every primitive the renderer created until it is removed. The egui
//! shell paints it each frame and the tests inspect it directly.

use std::collections::BTreeMap;

use super::surface::{AspectMode, DrawSurface, HandleId, LineBatch, OwnerTag, ScatterData};
use crate::color::Rgba;
use crate::state::ViewRect;

#[derive(Clone, Debug, PartialEq)]
pub struct ScatterPrimitive {
    pub owner: OwnerTag,
    pub data: ScatterData,
    pub visible: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Scatter(ScatterPrimitive),
    Lines { owner: OwnerTag, batch: LineBatch },
}

impl Primitive {
    pub fn owner(&self) -> OwnerTag {
        match self {
            Self::Scatter(s) => s.owner,
            Self::Lines { owner, .. } => *owner,
        }
    }
}

/// Lifetime counters, useful for spotting handle churn
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SceneCounters {
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
}

#[derive(Debug)]
pub struct RetainedScene {
    primitives: BTreeMap<HandleId, Primitive>,
    next_handle: HandleId,
    limits: ViewRect,
    aspect: AspectMode,
    grid: Vec<f64>,
    grid_color: Rgba,
    counters: SceneCounters,
}

impl Default for RetainedScene {
    fn default() -> Self {
        Self {
            primitives: BTreeMap::new(),
            next_handle: 1,
            limits: ViewRect::default(),
            aspect: AspectMode::default(),
            grid: Vec::new(),
            grid_color: Rgba::GRAY,
            counters: SceneCounters::default(),
        }
    }
}

impl RetainedScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: HandleId) -> Option<&Primitive> {
        self.primitives.get(&handle)
    }

    pub fn scatter(&self, handle: HandleId) -> Option<&ScatterPrimitive> {
        match self.primitives.get(&handle) {
            Some(Primitive::Scatter(s)) => Some(s),
            _ => None,
        }
    }

    /// Visible scatters in draw order
    pub fn visible_scatters(&self) -> Vec<&ScatterPrimitive> {
        let mut scatters: Vec<&ScatterPrimitive> = self
            .primitives
            .values()
            .filter_map(|p| match p {
                Primitive::Scatter(s) if s.visible => Some(s),
                _ => None,
            })
            .collect();
        scatters.sort_by_key(|s| s.data.order);
        scatters
    }

    pub fn line_batches(&self) -> impl Iterator<Item = &LineBatch> {
        self.primitives.values().filter_map(|p| match p {
            Primitive::Lines { batch, .. } => Some(batch),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn limits(&self) -> ViewRect {
        self.limits
    }

    pub fn aspect(&self) -> AspectMode {
        self.aspect
    }

    pub fn grid_lines(&self) -> (&[f64], Rgba) {
        (&self.grid, self.grid_color)
    }

    pub fn counters(&self) -> SceneCounters {
        self.counters
    }

    fn insert(&mut self, primitive: Primitive) -> HandleId {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.primitives.insert(handle, primitive);
        self.counters.created += 1;
        handle
    }
}

impl DrawSurface for RetainedScene {
    fn create_scatter(&mut self, owner: OwnerTag, data: ScatterData) -> HandleId {
        self.insert(Primitive::Scatter(ScatterPrimitive {
            owner,
            data,
            visible: true,
        }))
    }

    fn update_scatter(&mut self, handle: HandleId, data: ScatterData) -> Result<(), ScatterData> {
        match self.primitives.get_mut(&handle) {
            Some(Primitive::Scatter(s)) if s.data.kind() == data.kind() => {
                s.data = data;
                self.counters.updated += 1;
                Ok(())
            }
            _ => Err(data),
        }
    }

    fn set_visible(&mut self, handle: HandleId, visible: bool) -> bool {
        match self.primitives.get_mut(&handle) {
            Some(Primitive::Scatter(s)) => {
                s.visible = visible;
                true
            }
            _ => false,
        }
    }

    fn create_line_batch(&mut self, owner: OwnerTag, batch: LineBatch) -> HandleId {
        self.insert(Primitive::Lines { owner, batch })
    }

    fn remove(&mut self, handle: HandleId) -> bool {
        let removed = self.primitives.remove(&handle).is_some();
        if removed {
            self.counters.removed += 1;
        }
        removed
    }

    fn owned_by(&self, owner: OwnerTag) -> Vec<HandleId> {
        self.primitives
            .iter()
            .filter(|(_, p)| p.owner() == owner)
            .map(|(&h, _)| h)
            .collect()
    }

    fn set_limits(&mut self, view: ViewRect) {
        self.limits = view;
    }

    fn set_aspect(&mut self, aspect: AspectMode) {
        self.aspect = aspect;
    }

    fn set_grid_lines(&mut self, ys: Vec<f64>, color: Rgba) {
        self.grid = ys;
        self.grid_color = color;
    }
}
