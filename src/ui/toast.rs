//! Toast notification system for user feedback.

use eframe::egui;

use crate::app::CloudViewApp;

/// Toast notification types with associated colors
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToastType {
    /// Informational message (blue)
    #[default]
    Info,
    /// Success message (green)
    Success,
    /// Warning message (amber)
    Warning,
    /// Error message (red)
    Error,
}

impl ToastType {
    /// Get the background color for this toast type
    pub fn color(&self) -> [u8; 3] {
        match self {
            ToastType::Info => [71, 108, 155],
            ToastType::Success => [113, 120, 78],
            ToastType::Warning => [253, 193, 73],
            ToastType::Error => [135, 30, 28],
        }
    }

    /// Get the text color for this toast type
    pub fn text_color(&self) -> [u8; 3] {
        match self {
            ToastType::Warning => [30, 30, 30],
            _ => [255, 255, 255],
        }
    }
}

impl CloudViewApp {
    /// Render toast notifications in the bottom right corner
    pub fn render_toast(&mut self, ctx: &egui::Context) {
        let Some((message, time, toast_type)) = &self.toast_message else {
            return;
        };
        if time.elapsed().as_secs() >= 3 {
            self.toast_message = None;
            return;
        }

        let [br, bg, bb] = toast_type.color();
        let [tr, tg, tb] = toast_type.text_color();
        egui::Area::new(egui::Id::new("toast"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-20.0, -40.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::from_rgb(br, bg, bb))
                    .corner_radius(8)
                    .inner_margin(egui::Margin::symmetric(16, 12))
                    .show(ui, |ui| {
                        ui.set_max_width(400.0);
                        ui.label(
                            egui::RichText::new(message.as_str())
                                .color(egui::Color32::from_rgb(tr, tg, tb)),
                        );
                    });
            });
        // Fade-out check needs another frame
        ctx.request_repaint_after(std::time::Duration::from_millis(250));
    }
}
