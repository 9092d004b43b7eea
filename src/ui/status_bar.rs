//! Status bar: busy indicator, model counts and the last frame's statistics.

use eframe::egui;

use crate::app::CloudViewApp;
use crate::plot::format_count;
use crate::state::BusyState;

impl CloudViewApp {
    pub fn render_status_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            match self.viewer.busy_state() {
                BusyState::Busy(label) => {
                    ui.spinner();
                    ui.label(label);
                }
                BusyState::Idle => {
                    ui.label(egui::RichText::new("Ready").weak());
                }
            }
            ui.separator();

            let manager = self.viewer.manager();
            ui.label(format!(
                "{} plots, {} groups",
                manager.all().iter().filter(|p| !p.is_removed()).count(),
                manager.group_count()
            ));

            if let Some(stats) = self.viewer.last_stats() {
                ui.separator();
                ui.label(format!("{} points drawn", format_count(stats.points_drawn)));
                ui.separator();
                ui.label(format!("{} draw calls", stats.draw_calls))
                    .on_hover_text(format!(
                        "{} solid and {} scalar line segments, {} rebuilds",
                        stats.solid_segments, stats.scalar_segments, self.redraws
                    ));
                if stats.mixed_line_colormaps {
                    ui.separator();
                    ui.label(
                        egui::RichText::new("Lines drawn with the first colormap")
                            .color(egui::Color32::from_rgb(253, 193, 73)),
                    );
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let view = self.viewer.view();
                ui.label(
                    egui::RichText::new(format!(
                        "x [{:.3}, {:.3}]  y [{:.3}, {:.3}]",
                        view.x_min, view.x_max, view.y_min, view.y_max
                    ))
                    .monospace()
                    .size(11.0),
                );
            });
        });
    }
}
