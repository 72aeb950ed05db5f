//! Chart Viewer Widget
//! Central scrollable panel with the headline metrics and every chart.

use crate::charts::ChartPlotter;
use crate::data::CategoricalField;
use crate::pipeline::DashboardView;
use crate::stats::{format_metric, SummaryMetrics};
use egui::{Color32, RichText, ScrollArea};

const SECTION_SPACING: f32 = 15.0;

/// Scrollable metrics and chart display area.
pub struct ChartViewer;

impl ChartViewer {
    pub fn show(ui: &mut egui::Ui, view: &DashboardView) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(format!(
                    "Filtered records: {} / {}",
                    view.summary.filtered_count, view.summary.total_count
                ));
                if view.is_empty() {
                    ChartPlotter::draw_placeholder(ui, "No records match the current filters.");
                }
                ui.add_space(8.0);
                Self::draw_metrics(ui, &view.summary);

                ui.add_space(SECTION_SPACING);
                ui.separator();

                let sections: [(&str, CategoricalField); 3] = [
                    ("🌦️ Average Delivery Time by Weather", CategoricalField::Weather),
                    ("🚦 Average Delivery Time by Traffic", CategoricalField::Traffic),
                    ("🚗 Vehicle Performance", CategoricalField::Vehicle),
                ];
                for (heading, field) in sections {
                    Self::draw_bar_section(ui, view, heading, field);
                }

                Self::subheader(ui, "👤 Agent Performance – Rating vs Delivery Time");
                ChartPlotter::draw_scatter(ui, &view.scatter);

                Self::draw_bar_section(
                    ui,
                    view,
                    "📍 Area-Wise Average Delivery Time",
                    CategoricalField::Area,
                );

                Self::subheader(ui, "📦 Category Distribution – Delivery Time");
                ChartPlotter::draw_box_plot(ui, &view.boxes);

                ui.add_space(SECTION_SPACING);
                ui.separator();
                ui.label(
                    RichText::new(
                        "💡 Tip: Use the sidebar filters to explore how traffic, weather, or vehicle type affect delivery time.",
                    )
                    .size(11.0)
                    .color(Color32::GRAY),
                );
            });
    }

    fn subheader(ui: &mut egui::Ui, text: &str) {
        ui.add_space(SECTION_SPACING);
        ui.label(RichText::new(text).size(16.0).strong());
        ui.add_space(5.0);
    }

    fn draw_bar_section(
        ui: &mut egui::Ui,
        view: &DashboardView,
        heading: &str,
        field: CategoricalField,
    ) {
        Self::subheader(ui, heading);
        if let Some(series) = view.bars.iter().find(|s| s.field == field) {
            ChartPlotter::draw_bar_chart(ui, series);
        }
    }

    /// Three metric cards side by side.
    fn draw_metrics(ui: &mut egui::Ui, summary: &SummaryMetrics) {
        let cards = [
            (
                "Avg Delivery Time (min)",
                format_metric(summary.avg_delivery_time, 2, ""),
            ),
            (
                "Avg Agent Rating",
                format_metric(summary.avg_agent_rating, 2, ""),
            ),
            ("Late Deliveries (%)", format_metric(summary.late_pct, 1, "%")),
        ];

        ui.columns(cards.len(), |columns| {
            for (col, (label, value)) in columns.iter_mut().zip(cards.iter()) {
                egui::Frame::none()
                    .fill(col.visuals().widgets.noninteractive.bg_fill)
                    .rounding(5.0)
                    .inner_margin(8.0)
                    .show(col, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(RichText::new(*label).size(12.0).color(Color32::GRAY));
                        ui.label(RichText::new(value).size(24.0).strong());
                    });
            }
        });
    }
}
