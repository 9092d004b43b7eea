//! The viewer: plot model, culling and rendering wired into one pipeline.
//!
//! Mutations go through the manager and queue notifications; [`Viewer::pump`]
//! drains them and rebuilds once. Every rebuild runs inside a busy scope, and
//! a rebuild requested while that scope (or any caller-held scope) is open is
//! deferred until [`Viewer::flush_deferred`].

use std::sync::mpsc::Receiver;

use crate::array::{process_request, ArrayRegistry, PlotRequest, ProcessedPlot, StructuredArray};
use crate::busy::{BusyGuard, BusyIndicator};
use crate::cull::{cull_frame, nearest_point, NearestPoint};
use crate::error::{Result, ViewerError};
use crate::events::PlotEvent;
use crate::group::ColorRange;
use crate::group_builder::PlotGroupBuilder;
use crate::manager::PlotManager;
use crate::plot::NewPlot;
use crate::render::{
    resolve_aspect, AspectMode, DrawSurface, FrameStats, PlotRenderer, RetainedScene,
};
use crate::settings::ViewerConfig;
use crate::state::{ArrayIndex, BusyState, PlotIndex, ViewRect, FIT_PADDING};
use crate::transform::{AffineTransformEngine, TransformEngine, TransformMode, TransformParams};

/// A completed rebuild; the display should be redrawn
#[derive(Clone, Debug, PartialEq)]
pub struct RenderReady {
    pub view: ViewRect,
    pub stats: FrameStats,
}

pub struct Viewer {
    manager: PlotManager,
    events: Receiver<PlotEvent>,
    renderer: PlotRenderer,
    scene: RetainedScene,
    engine: Box<dyn TransformEngine>,
    arrays: ArrayRegistry,
    config: ViewerConfig,
    busy: BusyIndicator,
    view: ViewRect,
    /// View fitted to the first plot
    base_view: Option<ViewRect>,
    /// Limits the UI should adopt on its next frame
    view_override: Option<ViewRect>,
    deferred: Option<ViewRect>,
    /// Limits moved by a tick; the scene still holds the old cull
    needs_cull: bool,
    custom_bounds: bool,
    scale: [f64; 2],
    applied_scale: [f64; 2],
    secondary_axis_active: bool,
    last_stats: Option<FrameStats>,
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl std::fmt::Debug for Viewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewer")
            .field("plots", &self.manager.plot_count())
            .field("groups", &self.manager.group_count())
            .field("view", &self.view)
            .field("busy", &self.busy.state())
            .finish()
    }
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Self {
        Self::with_engine(config, Box::new(AffineTransformEngine))
    }

    /// Use a custom coordinate transform engine
    pub fn with_engine(config: ViewerConfig, engine: Box<dyn TransformEngine>) -> Self {
        let mut manager = PlotManager::new();
        let events = manager.subscribe();
        Self {
            manager,
            events,
            renderer: PlotRenderer::new(config.render_options()),
            scene: RetainedScene::new(),
            engine,
            arrays: ArrayRegistry::new(),
            config,
            busy: BusyIndicator::new(),
            view: ViewRect::default(),
            base_view: None,
            view_override: None,
            deferred: None,
            needs_cull: false,
            custom_bounds: false,
            scale: [1.0, 1.0],
            applied_scale: [1.0, 1.0],
            secondary_axis_active: false,
            last_stats: None,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn manager(&self) -> &PlotManager {
        &self.manager
    }

    /// Mutate the plot model; changes are picked up by the next [`Viewer::pump`]
    pub fn manager_mut(&mut self) -> &mut PlotManager {
        &mut self.manager
    }

    /// Subscribe to plot model and render notifications
    pub fn subscribe(&mut self) -> Receiver<PlotEvent> {
        self.manager.subscribe()
    }

    pub fn scene(&self) -> &RetainedScene {
        &self.scene
    }

    pub fn renderer(&self) -> &PlotRenderer {
        &self.renderer
    }

    pub fn arrays(&self) -> &ArrayRegistry {
        &self.arrays
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Replace the configuration; takes effect on the next rebuild
    pub fn set_config(&mut self, config: ViewerConfig) {
        self.renderer.set_options(config.render_options());
        self.config = config;
    }

    pub fn view(&self) -> ViewRect {
        self.view
    }

    pub fn base_view(&self) -> Option<ViewRect> {
        self.base_view
    }

    pub fn busy(&self) -> &BusyIndicator {
        &self.busy
    }

    pub fn busy_state(&self) -> BusyState {
        self.busy.state()
    }

    /// Hold a busy scope; rebuilds requested meanwhile are deferred
    pub fn enter_busy(&self, label: impl Into<String>) -> BusyGuard {
        self.busy.enter(label)
    }

    pub fn last_stats(&self) -> Option<&FrameStats> {
        self.last_stats.as_ref()
    }

    /// Whether the limits changed since the scene was last culled
    pub fn needs_cull(&self) -> bool {
        self.needs_cull
    }

    pub fn has_deferred(&self) -> bool {
        self.deferred.is_some()
    }

    // ------------------------------------------------------------------
    // Adding plots
    // ------------------------------------------------------------------

    /// A plot request styled with the configured defaults
    pub fn request(&self, x_field: impl Into<String>, y_field: impl Into<String>) -> PlotRequest {
        PlotRequest::new(x_field, y_field).style(self.config.default_style())
    }

    /// Add one plot from a structured array field.
    ///
    /// With a colour field, the plot becomes the only member of a new group
    /// whose range is the field's own extrema. Returns the transform params
    /// so they can be replayed for other data.
    pub fn add_plot(
        &mut self,
        array: StructuredArray,
        request: PlotRequest,
    ) -> Result<TransformParams> {
        let processed = self.process(&array, &request)?;
        let params = processed.transform_params;
        let range = processed.color_range;
        let name = request.display_name().to_string();
        let color_field = request.color_field.clone();

        let (_, index) = self.commit_plot(array, request, processed, range)?;
        tracing::info!(
            "Added plot {}: {} ({} points)",
            index,
            name,
            self.manager.get(index).map_or(0, |p| p.point_count())
        );

        if let (Some(field), Some(range)) = (color_field, range) {
            self.manager.register_group(name, &[index], field, range);
        }

        self.refresh();
        Ok(params)
    }

    /// Add a plot from raw points without a source array
    pub fn add_points(&mut self, new: NewPlot) -> Result<PlotIndex> {
        let index = self.manager.add_plot(new)?;
        self.fit_view_if_first(TransformMode::Raw);
        self.refresh();
        Ok(index)
    }

    /// Start a group of plots sharing one colour range.
    ///
    /// Nothing is added until [`PlotGroupBuilder::finish`].
    pub fn plot_group(
        &mut self,
        color_field: impl Into<String>,
        name: Option<String>,
    ) -> PlotGroupBuilder<'_> {
        PlotGroupBuilder::new(self, color_field.into(), name)
    }

    /// Show or hide the plot of one field of a registered array.
    ///
    /// Enabling replays the array's saved transform and inherits its style
    /// and colour range. Returns the plot index that was added or removed.
    pub fn toggle_field(
        &mut self,
        array: ArrayIndex,
        field: &str,
        enabled: bool,
    ) -> Result<Option<PlotIndex>> {
        if !enabled {
            let removed = self.arrays.unregister_field_plot(array, field);
            if let Some(index) = removed {
                self.manager.remove_plot(index);
                tracing::info!("Removed field '{}' (plot {}) from array {}", field, index, array);
                self.refresh();
            }
            return Ok(removed);
        }

        if let Some(existing) = self.arrays.field_plot(array, field) {
            return Ok(Some(existing));
        }
        let Some(entry) = self.arrays.get(array) else {
            tracing::debug!("Ignoring field toggle for unknown array {}", array);
            return Ok(None);
        };
        if !entry.data.has_field(field) {
            return Err(ViewerError::field_not_found(
                "Y",
                field,
                entry.data.field_names(),
            ));
        }

        let mut request = entry.template.clone();
        request.y_field = field.to_string();
        request.name = None;
        request.transform_params = Some(TransformParams::from_map(&entry.transform)?);
        let range = entry.color_range;

        let mut processed = process_request(&entry.data, &request, self.engine.as_ref())?;
        processed.plot.global_range = range;
        processed.plot.is_array_parent = false;
        let index = self.manager.add_plot(processed.plot)?;
        self.arrays.register_field_plot(array, field, index);
        tracing::info!("Added field '{}' of array {} as plot {}", field, array, index);

        self.refresh();
        Ok(Some(index))
    }

    pub(crate) fn process(
        &self,
        array: &StructuredArray,
        request: &PlotRequest,
    ) -> Result<ProcessedPlot> {
        process_request(array, request, self.engine.as_ref())
    }

    /// Store a processed plot and register its source array
    pub(crate) fn commit_plot(
        &mut self,
        array: StructuredArray,
        request: PlotRequest,
        mut processed: ProcessedPlot,
        global_range: Option<ColorRange>,
    ) -> Result<(ArrayIndex, PlotIndex)> {
        processed.plot.global_range = global_range;
        let params = processed.transform_params;
        let index = self.manager.add_plot(processed.plot)?;
        let y_field = request.y_field.clone();
        let array_index = self.arrays.register(array, request, &params, global_range);
        self.arrays.register_field_plot(array_index, &y_field, index);
        self.fit_view_if_first(params.mode);
        Ok((array_index, index))
    }

    fn fit_view_if_first(&mut self, mode: TransformMode) {
        if self.manager.plot_count() != 1 || self.custom_bounds {
            return;
        }
        let pad = match mode {
            TransformMode::Raw => FIT_PADDING,
            TransformMode::Normalize | TransformMode::Center => 0.0,
        };
        let fitted = self
            .manager
            .get(0)
            .and_then(|p| ViewRect::bounds_of(p.points(), pad));
        if let Some(view) = fitted {
            tracing::debug!("Fitting view to first plot: {:?}", view);
            self.view = view;
            self.base_view = Some(view);
            self.view_override = Some(view);
        }
    }

    // ------------------------------------------------------------------
    // View
    // ------------------------------------------------------------------

    /// Fix the initial view; the first plot will not refit it
    pub fn set_initial_bounds(&mut self, view: ViewRect) {
        self.custom_bounds = true;
        self.view = view;
        self.base_view = Some(view);
        self.view_override = Some(view);
    }

    /// Report the current view from the UI. Rebuilds when it changed or
    /// when a tick moved the limits since the last cull.
    pub fn set_view(&mut self, view: ViewRect) -> Option<RenderReady> {
        if view == self.view && self.last_stats.is_some() && !self.needs_cull {
            return None;
        }
        self.rebuild(view)
    }

    /// Limits the UI should apply, set by fitting and axis scaling
    pub fn take_view_override(&mut self) -> Option<ViewRect> {
        self.view_override.take()
    }

    /// Return to the fitted view and reset axis scaling
    pub fn reset_view(&mut self) -> Option<RenderReady> {
        let view = self.base_view?;
        self.scale = [1.0, 1.0];
        self.applied_scale = [1.0, 1.0];
        self.view_override = Some(view);
        self.rebuild(view)
    }

    /// Cumulative axis scale factors, applied by [`Viewer::tick`]
    pub fn set_axis_scale(&mut self, scale_x: f64, scale_y: f64) {
        let clamp = |s: f64| {
            if s.is_finite() {
                s.clamp(1e-6, 1e6)
            } else {
                1.0
            }
        };
        self.scale = [clamp(scale_x), clamp(scale_y)];
    }

    pub fn axis_scale(&self) -> [f64; 2] {
        self.scale
    }

    /// Whether a scale change is waiting for the next tick
    pub fn scale_pending(&self) -> bool {
        self.scale != self.applied_scale
    }

    /// Timer-driven axis rescale around the view centre.
    ///
    /// Applies the scale change since the last tick to the limits without
    /// culling. Skipped while busy. Returns whether the limits changed.
    pub fn tick(&mut self) -> bool {
        if self.base_view.is_none() || self.busy.is_busy() {
            return false;
        }
        let ratio_x = self.scale[0] / self.applied_scale[0];
        let ratio_y = self.scale[1] / self.applied_scale[1];
        if (ratio_x - 1.0).abs() < 1e-9 && (ratio_y - 1.0).abs() < 1e-9 {
            return false;
        }
        let _scope = self.busy.enter("Scaling");
        self.view = self.view.scaled(ratio_x, ratio_y);
        self.applied_scale = self.scale;
        self.view_override = Some(self.view);
        self.needs_cull = true;
        self.scene.set_limits(self.view);
        true
    }

    /// Drawn point nearest to `cursor` at the current view.
    ///
    /// `px_per_unit` is the screen scale of one data unit per axis; the
    /// caller decides how close counts as a hit.
    pub fn nearest_point(&self, cursor: [f64; 2], px_per_unit: [f64; 2]) -> Option<NearestPoint> {
        nearest_point(
            self.manager.all(),
            &self.view,
            self.config.cull_margin,
            cursor,
            px_per_unit,
        )
    }

    pub fn secondary_axis_active(&self) -> bool {
        self.secondary_axis_active
    }

    /// A secondary axis forces auto aspect
    pub fn set_secondary_axis_active(&mut self, active: bool) {
        if self.secondary_axis_active != active {
            self.secondary_axis_active = active;
            self.refresh();
        }
    }

    pub fn aspect_mode(&self) -> AspectMode {
        resolve_aspect(self.config.prefer_equal_aspect, self.secondary_axis_active)
    }

    // ------------------------------------------------------------------
    // Pipeline
    // ------------------------------------------------------------------

    /// Cull and render every plot against `view`.
    ///
    /// Returns `None` when a busy scope is open; the view is remembered and
    /// rebuilt by [`Viewer::flush_deferred`].
    pub fn rebuild(&mut self, view: ViewRect) -> Option<RenderReady> {
        if self.busy.is_busy() {
            tracing::debug!("Rebuild requested while busy, deferring");
            self.deferred = Some(view);
            return None;
        }
        let _scope = self.busy.enter("Updating plot");
        self.view = view;
        self.deferred = None;
        self.needs_cull = false;

        let frame = cull_frame(self.manager.all(), &view, &self.config.cull_options());
        let aspect = self.aspect_mode();
        let stats = self
            .renderer
            .render(&mut self.scene, &frame, &view, aspect);

        tracing::debug!(
            "Rebuilt {} plots: {} points, {} draw calls",
            stats.plots,
            stats.points_drawn,
            stats.draw_calls
        );
        self.manager.notify(PlotEvent::RenderReady(stats.clone()));
        self.drain_events();
        self.last_stats = Some(stats.clone());
        Some(RenderReady { view, stats })
    }

    /// Run a rebuild that was deferred while busy
    pub fn flush_deferred(&mut self) -> Option<RenderReady> {
        if self.busy.is_busy() {
            return None;
        }
        let view = self.deferred.take()?;
        self.rebuild(view)
    }

    /// Coalesce pending notifications into at most one rebuild
    pub fn pump(&mut self) -> Option<RenderReady> {
        if self.drain_events() || self.deferred.is_some() {
            let view = self.deferred.unwrap_or(self.view);
            return self.rebuild(view);
        }
        None
    }

    /// Rebuild at the current view, dropping notifications this covers
    pub(crate) fn refresh(&mut self) {
        self.drain_events();
        let view = self.deferred.unwrap_or(self.view);
        self.rebuild(view);
    }

    /// Whether any drained event asks for a rebuild
    fn drain_events(&mut self) -> bool {
        self.events
            .try_iter()
            .fold(false, |dirty, event| dirty | event.needs_rebuild())
    }
}
