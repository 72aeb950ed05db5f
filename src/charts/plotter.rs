//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot.

use crate::data::AgeGroup;
use crate::stats::{BarSeries, BoxStats, ScatterPoint};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot, PlotPoints, Points};

pub const BAR_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue
pub const UNGROUPED_COLOR: Color32 = Color32::GRAY;

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(255, 87, 34),  // Deep Orange
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

const CHART_HEIGHT: f32 = 280.0;

/// Creates dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn age_group_color(group: Option<AgeGroup>) -> Color32 {
        match group {
            Some(g) => {
                let idx = AgeGroup::ALL.iter().position(|&a| a == g).unwrap_or(0);
                PALETTE[idx % PALETTE.len()]
            }
            None => UNGROUPED_COLOR,
        }
    }

    /// Informational box shown instead of an empty chart.
    pub fn draw_placeholder(ui: &mut egui::Ui, message: &str) {
        egui::Frame::none()
            .fill(Color32::from_rgb(217, 237, 247))
            .rounding(5.0)
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(
                    RichText::new(format!("ℹ {message}"))
                        .size(13.0)
                        .color(Color32::from_rgb(49, 112, 143)),
                );
            });
    }

    /// Category axis formatter: ticks at integer positions show their label.
    fn category_formatter(
        labels: Vec<String>,
    ) -> impl Fn(egui_plot::GridMark, &std::ops::RangeInclusive<f64>) -> String {
        move |mark, _range| {
            let rounded = mark.value.round();
            if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
                return String::new();
            }
            labels.get(rounded as usize).cloned().unwrap_or_default()
        }
    }

    /// Mean delivery time per group of one field.
    pub fn draw_bar_chart(ui: &mut egui::Ui, series: &BarSeries) {
        let title = series.title();
        if series.is_empty() {
            Self::draw_placeholder(ui, &format!("No data available for {title}."));
            return;
        }

        let labels: Vec<String> = series.groups.iter().map(|g| g.group.clone()).collect();
        let bars: Vec<Bar> = series
            .groups
            .iter()
            .enumerate()
            .map(|(i, g)| {
                Bar::new(i as f64, g.mean)
                    .name(format!("{}: {:.2}", g.group, g.mean))
                    .width(0.6)
                    .fill(BAR_COLOR)
            })
            .collect();

        ui.label(RichText::new(&title).strong());
        Plot::new(format!("bar_{}", series.field))
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(series.field.name())
            .y_axis_label("delivery_time")
            .x_axis_formatter(Self::category_formatter(labels))
            .include_y(0.0)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name("delivery_time").color(BAR_COLOR));
            });
    }

    /// Agent rating vs delivery time, one series per age group.
    pub fn draw_scatter(ui: &mut egui::Ui, points: &[ScatterPoint]) {
        let title = "Agent Rating vs Delivery Time";
        if points.is_empty() {
            Self::draw_placeholder(ui, &format!("No data for {title}."));
            return;
        }

        let mut groups: Vec<Option<AgeGroup>> = AgeGroup::ALL.iter().copied().map(Some).collect();
        groups.push(None);

        ui.label(RichText::new(title).strong());
        Plot::new("scatter_rating_time")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .legend(Legend::default())
            .x_axis_label("agent_rating")
            .y_axis_label("delivery_time")
            .show(ui, |plot_ui| {
                for group in groups {
                    let series: PlotPoints = points
                        .iter()
                        .filter(|p| p.age_group == group)
                        .map(|p| [p.agent_rating, p.delivery_time])
                        .collect();
                    if series.points().is_empty() {
                        continue;
                    }
                    let name = group.map(AgeGroup::label).unwrap_or("n/a");
                    plot_ui.points(
                        Points::new(series)
                            .radius(3.0)
                            .color(Self::age_group_color(group))
                            .name(name),
                    );
                }
            });
    }

    /// Delivery time distribution per category.
    pub fn draw_box_plot(ui: &mut egui::Ui, boxes: &[BoxStats]) {
        let title = "Delivery Time Distribution by Category";
        if boxes.is_empty() {
            Self::draw_placeholder(ui, "No data for selected filters.");
            return;
        }

        let labels: Vec<String> = boxes.iter().map(|b| b.group.clone()).collect();

        ui.label(RichText::new(title).strong());
        Plot::new("box_category")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("category")
            .y_axis_label("delivery_time")
            .x_axis_formatter(Self::category_formatter(labels))
            .show(ui, |plot_ui| {
                for (i, stats) in boxes.iter().enumerate() {
                    let color = PALETTE[i % PALETTE.len()];
                    let elem = BoxElem::new(
                        i as f64,
                        BoxSpread::new(
                            stats.lower_whisker,
                            stats.q1,
                            stats.median,
                            stats.q3,
                            stats.upper_whisker,
                        ),
                    )
                    .box_width(0.5)
                    .fill(color.gamma_multiply(0.3))
                    .stroke(egui::Stroke::new(1.5, color));

                    plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&stats.group));

                    // Outliers beyond the whiskers
                    let outliers: PlotPoints = stats
                        .values
                        .iter()
                        .filter(|&&v| v < stats.lower_whisker || v > stats.upper_whisker)
                        .map(|&v| [i as f64, v])
                        .collect();
                    plot_ui.points(Points::new(outliers).radius(2.5).color(color));
                }
            });
    }
}
