//! Main application state and eframe::App implementation.
//!
//! The app owns a [`Viewer`] and drives it once per frame: pending model
//! notifications are pumped into a rebuild, deferred rebuilds are flushed and
//! the axis-scale timer is ticked. Drawing the retained scene happens in
//! `ui::plot_canvas`.

use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use eframe::egui;

use crate::events::PlotEvent;
use crate::settings::ViewerConfig;
use crate::ui::toast::ToastType;
use crate::viewer::Viewer;

/// Main application state
pub struct CloudViewApp {
    pub(crate) viewer: Viewer,
    /// Pipeline notifications, used to schedule repaints
    events: Receiver<PlotEvent>,
    /// Toast message for user feedback (message, time, type)
    pub(crate) toast_message: Option<(String, Instant, ToastType)>,
    last_tick: Instant,
    /// Completed rebuilds since launch
    pub(crate) redraws: u64,
}

impl Default for CloudViewApp {
    fn default() -> Self {
        Self::with_viewer(Viewer::new(ViewerConfig::load()))
    }
}

impl CloudViewApp {
    /// Create the app around an already populated viewer
    pub fn new(cc: &eframe::CreationContext<'_>, viewer: Viewer) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());
        Self::with_viewer(viewer)
    }

    pub fn with_viewer(mut viewer: Viewer) -> Self {
        let events = viewer.subscribe();
        Self {
            viewer,
            events,
            toast_message: None,
            last_tick: Instant::now(),
            redraws: 0,
        }
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut Viewer {
        &mut self.viewer
    }

    /// Show a toast message
    pub fn show_toast(&mut self, message: &str, toast_type: ToastType) {
        self.toast_message = Some((message.to_string(), Instant::now(), toast_type));
    }

    /// Report an error from a UI action
    pub(crate) fn show_error(&mut self, context: &str, error: impl std::fmt::Display) {
        tracing::warn!("{}: {}", context, error);
        self.show_toast(&format!("{}: {}", context, error), ToastType::Error);
    }

    /// Rebuild for anything the model changed since the last frame
    fn sync_pipeline(&mut self, ctx: &egui::Context) {
        self.viewer.pump();
        self.viewer.flush_deferred();

        let ready = self
            .events
            .try_iter()
            .filter(|event| matches!(event, PlotEvent::RenderReady(_)))
            .count();
        if ready > 0 {
            self.redraws += ready as u64;
            ctx.request_repaint();
        }
    }

    /// Fire the axis-scale timer when its period has elapsed
    fn update_axis_timer(&mut self, ctx: &egui::Context) {
        if !self.viewer.scale_pending() {
            return;
        }
        let interval = Duration::from_millis(self.viewer.config().tick_interval_ms.max(1));
        if self.last_tick.elapsed() >= interval {
            self.last_tick = Instant::now();
            if self.viewer.tick() {
                ctx.request_repaint();
            }
        }
        // Keep ticking until the scale has been applied
        ctx.request_repaint_after(interval);
    }
}

impl eframe::App for CloudViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.sync_pipeline(ctx);
        self.update_axis_timer(ctx);

        // Apply dark theme
        ctx.set_visuals(egui::Visuals::dark());

        // Request repaint while a rebuild is pending (for spinner animation)
        if self.viewer.busy().is_busy() || self.viewer.has_deferred() {
            ctx.request_repaint();
        }

        // Toast notifications
        self.render_toast(ctx);

        // Left panel: plots, groups and selection properties
        egui::SidePanel::left("plots_panel")
            .default_width(260.0)
            .min_width(200.0)
            .resizable(true)
            .show(ctx, |ui| {
                self.render_plot_panel(ui);
            });

        // Status bar (render before central to claim space)
        egui::TopBottomPanel::bottom("status_bar")
            .resizable(false)
            .min_height(24.0)
            .show(ctx, |ui| {
                self.render_status_bar(ui);
            });

        // Plot canvas takes remaining space
        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_color_legend(ui);
            self.render_plot_canvas(ui);
        });
    }
}
