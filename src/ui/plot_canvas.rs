//! Plot canvas: the egui_plot area and the retained scene painted over it.
//!
//! egui_plot owns navigation (drag, scroll zoom, box zoom). Each frame the
//! current bounds are reported to the viewer, which re-culls and re-renders
//! only when they changed. The scene is then painted in screen space with the
//! plot's transform.

use eframe::egui;
use egui_plot::{Plot, PlotBounds, PlotPoint, PlotTransform};

use crate::app::CloudViewApp;
use crate::color::Rgba;
use crate::cull::NearestPoint;
use crate::group::Selection;
use crate::render::{AspectMode, LineFill, RetainedScene, ScatterFill};
use crate::state::{ViewRect, HOVER_SNAP_PX};
use crate::ui::toast::ToastType;

const HOVER_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 220, 0);

fn to_color32(c: Rgba) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}

/// Screen radius of a marker; sizes are areas, like scatter markers
fn marker_radius(size: f32) -> f32 {
    size.max(0.0).sqrt().max(0.5)
}

/// Coordinates as copied to the clipboard
fn coordinate_text([x, y]: [f64; 2]) -> String {
    format!("{:.6}, {:.6}", x, y)
}

fn hover_text(label: &str, hit: &NearestPoint) -> String {
    let [x, y] = hit.position;
    let mut text = format!("{}\nX: {:.6}\nY: {:.6}", label, x, y);
    if let Some(value) = hit.value {
        text.push_str(&format!("\nValue: {:.6}", value));
    }
    text
}

impl CloudViewApp {
    /// Render the main plot area
    pub fn render_plot_canvas(&mut self, ui: &mut egui::Ui) {
        let override_view = self.viewer.take_view_override();

        let mut plot = Plot::new("cloudview_plot")
            .show_grid(false)
            .allow_boxed_zoom(true)
            .x_axis_label("x")
            .y_axis_label("y");
        if self.viewer.aspect_mode() == AspectMode::Equal {
            plot = plot.data_aspect(1.0);
        }

        let response = plot.show(ui, |plot_ui| {
            if let Some(view) = override_view {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                    [view.x_min, view.y_min],
                    [view.x_max, view.y_max],
                ));
            }
            let bounds = plot_ui.plot_bounds();
            ViewRect::new(
                bounds.min()[0],
                bounds.max()[0],
                bounds.min()[1],
                bounds.max()[1],
            )
        });

        // A view override wins this frame; egui reports it back next frame
        if override_view.is_none() {
            self.viewer.set_view(response.inner);
        }

        let painter = ui.painter_at(response.response.rect);
        paint_scene(&painter, &response.transform, self.viewer.scene());

        // Snap to the nearest drawn point under the cursor
        let Some(pos) = response.response.hover_pos() else {
            return;
        };
        let transform = &response.transform;
        let frame = transform.frame();
        let bounds = transform.bounds();
        let px_per_unit = [
            frame.width() as f64 / bounds.width(),
            frame.height() as f64 / bounds.height(),
        ];
        let cursor = transform.value_from_position(pos);
        let hit = self
            .viewer
            .nearest_point([cursor.x, cursor.y], px_per_unit)
            .filter(|hit| hit.distance_px <= HOVER_SNAP_PX);
        let Some(hit) = hit else {
            return;
        };

        let [x, y] = hit.position;
        let screen = transform.position_from_point(&PlotPoint::new(x, y));
        painter.circle_stroke(screen, 6.0, egui::Stroke::new(2.0, HOVER_COLOR));
        let label = self
            .viewer
            .manager()
            .get(hit.index)
            .map(|p| p.label())
            .unwrap_or_default();
        painter.text(
            screen + egui::vec2(10.0, -10.0),
            egui::Align2::LEFT_BOTTOM,
            hover_text(&label, &hit),
            egui::FontId::proportional(11.0),
            egui::Color32::WHITE,
        );

        if response.response.secondary_clicked() {
            let text = coordinate_text(hit.position);
            ui.ctx().copy_text(text.clone());
            self.show_toast(&format!("Copied {}", text), ToastType::Info);
        }
    }

    /// Colour scale of the selected group
    pub fn render_color_legend(&mut self, ui: &mut egui::Ui) {
        let manager = self.viewer.manager();
        let group = match manager.selection() {
            Selection::Group(id) => manager.group(id),
            Selection::Plot(index) => manager.group_of(index).and_then(|id| manager.group(id)),
        };
        let Some(group) = group else {
            return;
        };
        let colormap = manager
            .get(group.members.first().copied().unwrap_or_default())
            .map(|p| p.style().colormap)
            .unwrap_or_default();
        let range = group.color_range;

        ui.horizontal(|ui| {
            egui::Frame::NONE
                .fill(egui::Color32::from_rgba_unmultiplied(30, 30, 30, 220))
                .corner_radius(4)
                .inner_margin(6.0)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(
                            egui::RichText::new(format!("{}:", group.color_field))
                                .size(11.0)
                                .color(egui::Color32::WHITE),
                        );
                        ui.label(egui::RichText::new(format!("{:.3}", range.min)).size(10.0));

                        // Gradient bar
                        let (rect, _) =
                            ui.allocate_exact_size(egui::vec2(120.0, 14.0), egui::Sense::hover());
                        let painter = ui.painter();
                        let steps = 32;
                        let step_width = rect.width() / steps as f32;
                        for i in 0..steps {
                            let t = i as f32 / (steps - 1) as f32;
                            let x = rect.left() + i as f32 * step_width;
                            painter.rect_filled(
                                egui::Rect::from_min_size(
                                    egui::pos2(x, rect.top()),
                                    egui::vec2(step_width + 1.0, rect.height()),
                                ),
                                0.0,
                                to_color32(colormap.sample(t)),
                            );
                        }

                        ui.label(egui::RichText::new(format!("{:.3}", range.max)).size(10.0));
                    });
                });
        });
        ui.add_space(4.0);
    }
}

/// Paint grid lines, line batches and scatters, in that order
fn paint_scene(painter: &egui::Painter, transform: &PlotTransform, scene: &RetainedScene) {
    let to_screen = |[x, y]: [f64; 2]| transform.position_from_point(&PlotPoint::new(x, y));
    let limits = scene.limits();

    let (grid, grid_color) = scene.grid_lines();
    let grid_stroke = egui::Stroke::new(0.5, to_color32(grid_color.with_alpha(0.3)));
    for &y in grid {
        painter.line_segment(
            [to_screen([limits.x_min, y]), to_screen([limits.x_max, y])],
            grid_stroke,
        );
    }

    for batch in scene.line_batches() {
        for (i, &[a, b]) in batch.segments.iter().enumerate() {
            let color = match &batch.fill {
                LineFill::Solid(colors) => colors.get(i).copied().unwrap_or(Rgba::GRAY),
                LineFill::Scalar { values, colormap } => {
                    colormap.sample(values.get(i).copied().unwrap_or(0.5))
                }
            };
            let width = batch.widths.get(i).copied().unwrap_or(1.0);
            painter.line_segment(
                [to_screen(a), to_screen(b)],
                egui::Stroke::new(width, to_color32(color.with_alpha(batch.alpha))),
            );
        }
    }

    for scatter in scene.visible_scatters() {
        let data = &scatter.data;
        let radius = marker_radius(data.size);
        match &data.fill {
            ScatterFill::Mapped { values, colormap } => {
                for (&point, &value) in data.points.iter().zip(values) {
                    let color = colormap.sample(value).with_alpha(data.alpha);
                    painter.circle_filled(to_screen(point), radius, to_color32(color));
                }
            }
            ScatterFill::Flat(color) => {
                let color = to_color32(color.with_alpha(data.alpha));
                for &point in &data.points {
                    painter.circle_filled(to_screen(point), radius, color);
                }
            }
        }
    }
}
