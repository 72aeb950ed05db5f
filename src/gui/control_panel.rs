//! Control Panel Widget
//! Left side panel: column mapping, data summary and filters.

use crate::data::{CanonicalField, CategoricalField, DeliveryRecord};
use crate::gui::DashboardState;
use crate::stats::format_metric;
use egui::{Color32, RichText};

/// Actions the side panel asks the app to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    Toggle(CategoricalField, String),
    SelectAll(CategoricalField),
    SelectNone(CategoricalField),
}

/// Left side panel.
pub struct ControlPanel;

impl ControlPanel {
    /// Draw the control panel
    pub fn show(ui: &mut egui::Ui, state: &DashboardState) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;
        let Some(dataset) = &state.dataset else {
            ui.label("No dataset loaded.");
            return action;
        };

        // ===== Column Mapping Section =====
        ui.label(RichText::new("🧩 Column Mapping").size(14.0).strong());
        ui.add_space(5.0);
        for (field, source) in dataset.mapping.entries() {
            let text = format!("• {field} → {}", source.unwrap_or("None"));
            let color = if source.is_some() {
                ui.visuals().text_color()
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(text).size(12.0).color(color));
        }

        ui.add_space(10.0);
        ui.separator();

        // ===== Data Summary Section =====
        ui.label(RichText::new("📊 Data Summary").size(14.0).strong());
        ui.add_space(5.0);
        ui.label(format!("Rows before cleaning: {}", dataset.cleaned.rows_before));
        ui.label(format!("Rows after cleaning: {}", dataset.cleaned.rows_after));
        ui.add_space(5.0);
        Self::draw_preview(ui, dataset.cleaned.preview());

        ui.add_space(10.0);
        ui.separator();

        // ===== Filters Section =====
        ui.label(RichText::new("🔍 Filters").size(14.0).strong());
        ui.add_space(5.0);

        for field in CategoricalField::ALL {
            let options = dataset.options.get(field);
            let selected = state.selection.get(&field);
            let n_selected = selected.map(|s| s.len()).unwrap_or(0);

            if dataset.options.is_unavailable(field) {
                ui.label(RichText::new(field.label()).strong());
                ui.label(
                    RichText::new("No values available. No record can pass this filter.")
                        .size(11.0)
                        .color(Color32::from_rgb(220, 53, 69)),
                );
                ui.add_space(4.0);
                continue;
            }

            let header = format!("{}  ({n_selected}/{})", field.label(), options.len());
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt(field.name())
                .default_open(true)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        if ui.small_button("All").clicked() {
                            action = ControlPanelAction::SelectAll(field);
                        }
                        if ui.small_button("None").clicked() {
                            action = ControlPanelAction::SelectNone(field);
                        }
                    });

                    for value in options {
                        let mut checked = selected.is_some_and(|s| s.contains(value));
                        if ui.checkbox(&mut checked, value.as_str()).changed() {
                            action = ControlPanelAction::Toggle(field, value.clone());
                        }
                    }
                });
        }

        action
    }

    /// First cleaned rows, as the pipeline sees them.
    fn draw_preview(ui: &mut egui::Ui, rows: &[DeliveryRecord]) {
        if rows.is_empty() {
            ui.label(RichText::new("No rows survived cleaning.").color(Color32::GRAY));
            return;
        }

        egui::ScrollArea::horizontal()
            .id_salt("preview_scroll")
            .show(ui, |ui| {
                egui::Grid::new("preview_grid")
                    .striped(true)
                    .spacing([8.0, 2.0])
                    .show(ui, |ui| {
                        for field in CanonicalField::ALL {
                            ui.label(RichText::new(field.name()).strong().size(11.0));
                        }
                        ui.end_row();

                        let text = |v: &Option<String>| v.clone().unwrap_or_else(|| "n/a".into());
                        for row in rows {
                            ui.label(RichText::new(format!("{}", row.delivery_time)).size(11.0));
                            ui.label(RichText::new(text(&row.weather)).size(11.0));
                            ui.label(RichText::new(text(&row.traffic)).size(11.0));
                            ui.label(RichText::new(text(&row.vehicle)).size(11.0));
                            ui.label(RichText::new(format_metric(row.agent_age, 0, "")).size(11.0));
                            ui.label(
                                RichText::new(format_metric(row.agent_rating, 1, "")).size(11.0),
                            );
                            ui.label(RichText::new(text(&row.area)).size(11.0));
                            ui.label(RichText::new(text(&row.category)).size(11.0));
                            ui.end_row();
                        }
                    });
            });
    }
}
