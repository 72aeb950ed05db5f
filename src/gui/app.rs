//! Delivery Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::gui::DashboardState;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::{Color32, RichText, SidePanel};
use std::path::Path;

/// Main application window.
pub struct DashboardApp {
    state: DashboardState,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, data_path: &Path) -> Self {
        Self {
            state: DashboardState::load(data_path),
        }
    }

    fn handle_action(&mut self, action: ControlPanelAction) {
        match action {
            ControlPanelAction::Toggle(field, value) => self.state.toggle_value(field, &value),
            ControlPanelAction::SelectAll(field) => self.state.select_all(field),
            ControlPanelAction::SelectNone(field) => self.state.select_none(field),
            ControlPanelAction::None => {}
        }
    }

    fn draw_title(ui: &mut egui::Ui) {
        ui.label(RichText::new("🚚 Last-Mile Delivery Analytics Dashboard").size(24.0).strong());
        ui.label(
            RichText::new("Delivery time, agent and category analysis")
                .size(12.0)
                .color(Color32::GRAY),
        );
        ui.add_space(10.0);
    }

    fn draw_error_banner(ui: &mut egui::Ui, message: &str) {
        egui::Frame::none()
            .fill(Color32::from_rgb(248, 215, 218))
            .rounding(5.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(
                    RichText::new(format!("❌ {message}"))
                        .size(14.0)
                        .color(Color32::from_rgb(114, 28, 36)),
                );
            });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // A fatal error halts everything else
        if let Some(message) = self.state.fatal_error.clone() {
            egui::CentralPanel::default().show(ctx, |ui| {
                Self::draw_title(ui);
                Self::draw_error_banner(ui, &message);
                ui.label(
                    RichText::new(format!("Data file: {}", self.state.data_path.display()))
                        .size(11.0)
                        .color(Color32::GRAY),
                );
            });
            return;
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(420.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = ControlPanel::show(ui, &self.state);
                    self.handle_action(action);
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            Self::draw_title(ui);
            if let Some(view) = &self.state.view {
                ChartViewer::show(ui, view);
            }
        });
    }
}
