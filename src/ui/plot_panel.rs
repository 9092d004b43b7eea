//! Left panel: groups, plots, array fields and the selection's properties.

use eframe::egui;
use strum::IntoEnumIterator;

use crate::app::CloudViewApp;
use crate::color::{Colormap, Rgba};
use crate::group::Selection;
use crate::property::{PlotProperty, PropertyValue};
use crate::state::{ArrayIndex, GroupId, PlotIndex, DEFAULT_LINE_WIDTH, DEFAULT_POINT_SIZE};
use crate::ui::toast::ToastType;

fn mixed_hint(ui: &mut egui::Ui, mixed: bool) {
    if mixed {
        ui.label(egui::RichText::new("mixed").weak().italics());
    }
}

fn uniform_or<T: Copy>(value: &PropertyValue<T>, fallback: T) -> T {
    value.uniform().copied().unwrap_or(fallback)
}

impl CloudViewApp {
    /// Render the plots panel
    pub fn render_plot_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Plots");
        ui.separator();

        egui::ScrollArea::vertical()
            .id_salt("plot_list")
            .max_height(ui.available_height() * 0.5)
            .show(ui, |ui| {
                self.render_group_list(ui);
                self.render_plot_list(ui);
                self.render_array_fields(ui);
            });

        ui.separator();
        self.render_selection_properties(ui);

        ui.separator();
        self.render_view_controls(ui);
    }

    fn render_group_list(&mut self, ui: &mut egui::Ui) {
        let selection = self.viewer.manager().selection();
        let groups: Vec<(GroupId, String, usize)> = self
            .viewer
            .manager()
            .groups()
            .map(|g| (g.id, g.name.clone(), g.members.len()))
            .collect();
        if groups.is_empty() {
            return;
        }

        ui.label(egui::RichText::new("Groups").strong());
        for (id, name, count) in groups {
            let selected = selection == Selection::Group(id);
            let text = format!("{} ({} plots)", name, count);
            if ui.selectable_label(selected, text).clicked() {
                self.viewer.manager_mut().select_group(id);
            }
        }
        ui.add_space(6.0);
    }

    fn render_plot_list(&mut self, ui: &mut egui::Ui) {
        let selection = self.viewer.manager().selection();
        let plots: Vec<(PlotIndex, String, bool)> = self
            .viewer
            .manager()
            .all()
            .iter()
            .filter(|p| !p.is_removed())
            .map(|p| (p.index(), p.label(), p.is_visible()))
            .collect();

        if plots.is_empty() {
            ui.label(egui::RichText::new("No plots loaded").weak());
            return;
        }

        for (index, label, visible) in plots {
            ui.horizontal(|ui| {
                let mut shown = visible;
                if ui.checkbox(&mut shown, "").changed() {
                    self.viewer.manager_mut().set_visibility(index, shown);
                }
                let selected = selection == Selection::Plot(index);
                if ui.selectable_label(selected, label).clicked() {
                    self.viewer.manager_mut().select_plot(index);
                }
            });
        }
        ui.add_space(6.0);
    }

    /// One checkbox per non-x field of every registered array
    fn render_array_fields(&mut self, ui: &mut egui::Ui) {
        let arrays: Vec<ArrayIndex> = self.viewer.arrays().indices().collect();
        if arrays.is_empty() {
            return;
        }

        ui.label(egui::RichText::new("Array fields").strong());
        for array in arrays {
            let name = self
                .viewer
                .arrays()
                .name(array)
                .unwrap_or_default()
                .to_string();
            let fields = self.viewer.arrays().fields(array);
            egui::CollapsingHeader::new(name)
                .id_salt(("array_fields", array))
                .show(ui, |ui| {
                    for field in fields {
                        let mut active = self.viewer.arrays().is_field_active(array, &field);
                        if ui.checkbox(&mut active, field.as_str()).changed() {
                            if let Err(e) = self.viewer.toggle_field(array, &field, active) {
                                self.show_error("Failed to toggle field", e);
                            }
                        }
                    }
                });
        }
    }

    /// Controls for whatever is selected. Group edits apply to every member.
    fn render_selection_properties(&mut self, ui: &mut egui::Ui) {
        let Some(props) = self.viewer.manager().selected_properties() else {
            ui.label(egui::RichText::new("Nothing selected").weak());
            return;
        };
        let group_selected = self.viewer.manager().is_group_selected();

        ui.label(egui::RichText::new("Selection").strong());
        if group_selected {
            ui.label(
                egui::RichText::new("Changes apply to every plot in the group")
                    .weak()
                    .size(11.0),
            );
        }

        let mut changes: Vec<PlotProperty> = Vec::new();
        let mut visibility: Option<bool> = None;

        ui.horizontal(|ui| {
            let mut visible = uniform_or(&props.visible, true);
            if ui.checkbox(&mut visible, "Visible").changed() {
                visibility = Some(visible);
            }
            mixed_hint(ui, props.visible.is_mixed());
        });

        egui::Grid::new("selection_properties")
            .num_columns(2)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                ui.label("Size");
                ui.horizontal(|ui| {
                    let mut size = uniform_or(&props.size, DEFAULT_POINT_SIZE);
                    let drag = egui::DragValue::new(&mut size).speed(0.1).range(0.0..=100.0);
                    if ui.add(drag).changed() {
                        changes.push(PlotProperty::Size(size));
                    }
                    mixed_hint(ui, props.size.is_mixed());
                });
                ui.end_row();

                ui.label("Colormap");
                let has_colors = props.has_color_data.uniform().copied().unwrap_or(true);
                ui.add_enabled_ui(has_colors, |ui| {
                    let selected_text = props
                        .colormap
                        .uniform()
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| "mixed".to_string());
                    egui::ComboBox::from_id_salt("selection_colormap")
                        .selected_text(selected_text)
                        .show_ui(ui, |ui| {
                            for cmap in Colormap::iter() {
                                let current = props.colormap.uniform() == Some(&cmap);
                                if ui.selectable_label(current, cmap.to_string()).clicked() {
                                    changes.push(PlotProperty::Colormap(cmap));
                                }
                            }
                        });
                });
                ui.end_row();

                ui.label("Lines");
                ui.horizontal(|ui| {
                    let mut draw_lines = uniform_or(&props.draw_lines, false);
                    if ui.checkbox(&mut draw_lines, "Connect points").changed() {
                        changes.push(PlotProperty::DrawLines(draw_lines));
                    }
                    mixed_hint(ui, props.draw_lines.is_mixed());
                });
                ui.end_row();

                ui.label("Line width");
                ui.horizontal(|ui| {
                    let mut width = uniform_or(&props.line_width, DEFAULT_LINE_WIDTH);
                    let drag = egui::DragValue::new(&mut width).speed(0.1).range(0.0..=20.0);
                    if ui.add(drag).changed() {
                        changes.push(PlotProperty::LineWidth(width));
                    }
                    mixed_hint(ui, props.line_width.is_mixed());
                });
                ui.end_row();

                ui.label("Line color");
                ui.horizontal(|ui| {
                    let current = props.line_color.uniform().copied().flatten();
                    let base = current.unwrap_or(Rgba::GRAY);
                    let mut color = egui::Color32::from_rgba_unmultiplied(
                        base.r, base.g, base.b, base.a,
                    );
                    if ui.color_edit_button_srgba(&mut color).changed() {
                        let [r, g, b, a] = color.to_srgba_unmultiplied();
                        changes.push(PlotProperty::LineColor(Some(Rgba { r, g, b, a })));
                    }
                    if current.is_some() && ui.small_button("Auto").clicked() {
                        changes.push(PlotProperty::LineColor(None));
                    }
                    mixed_hint(ui, props.line_color.is_mixed());
                });
                ui.end_row();

                ui.label("Offset");
                ui.horizontal(|ui| {
                    let mut offset_x = uniform_or(&props.offset_x, 0.0);
                    let mut offset_y = uniform_or(&props.offset_y, 0.0);
                    if ui
                        .add(egui::DragValue::new(&mut offset_x).speed(0.05).prefix("x: "))
                        .changed()
                    {
                        changes.push(PlotProperty::OffsetX(offset_x));
                    }
                    if ui
                        .add(egui::DragValue::new(&mut offset_y).speed(0.05).prefix("y: "))
                        .changed()
                    {
                        changes.push(PlotProperty::OffsetY(offset_y));
                    }
                    mixed_hint(ui, props.offset_x.is_mixed() || props.offset_y.is_mixed());
                });
                ui.end_row();
            });

        let manager = self.viewer.manager_mut();
        for property in changes {
            manager.set_selected_property(property);
        }
        if let Some(visible) = visibility {
            manager.set_selected_visibility(visible);
        }
    }

    fn render_view_controls(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("View").strong());

        ui.horizontal(|ui| {
            let [mut scale_x, mut scale_y] = self.viewer.axis_scale();
            ui.label("Scale");
            let x_changed = ui
                .add(egui::DragValue::new(&mut scale_x).speed(0.01).range(0.01..=100.0).prefix("x: "))
                .changed();
            let y_changed = ui
                .add(egui::DragValue::new(&mut scale_y).speed(0.01).range(0.01..=100.0).prefix("y: "))
                .changed();
            if x_changed || y_changed {
                self.viewer.set_axis_scale(scale_x, scale_y);
            }
        });

        let mut secondary = self.viewer.secondary_axis_active();
        if ui
            .checkbox(&mut secondary, "Secondary axis (free aspect)")
            .changed()
        {
            self.viewer.set_secondary_axis_active(secondary);
        }

        ui.horizontal(|ui| {
            if ui.button("Reset view").clicked() {
                // A busy viewer defers the rebuild, so None here is not a failure
                if self.viewer.base_view().is_none() {
                    self.show_toast("Nothing to reset yet", ToastType::Info);
                } else {
                    self.viewer.reset_view();
                }
            }
            if ui.button("Save settings").clicked() {
                match self.viewer.config().save() {
                    Ok(()) => self.show_toast("Settings saved", ToastType::Success),
                    Err(e) => self.show_error("Failed to save settings", e),
                }
            }
        });
    }
}
