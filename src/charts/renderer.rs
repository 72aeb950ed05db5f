//! Static Chart Renderer
//! Writes the dashboard charts to PNG files with plotters, for headless use.

use crate::data::AgeGroup;
use crate::pipeline::DashboardView;
use crate::stats::{BarSeries, BoxStats, ScatterPoint};
use anyhow::{Context, Result};
use plotters::prelude::*;
use std::path::{Path, PathBuf};

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 600;
const FONT: &str = "sans-serif";
const BAR: RGBColor = RGBColor(52, 152, 219);

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render every non-empty chart of `view` into `dir`, returning the
    /// files written.
    pub fn export_view(view: &DashboardView, dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating export directory {}", dir.display()))?;

        let mut written = Vec::new();

        for series in &view.bars {
            if series.is_empty() {
                log::warn!("No data available for {}; skipped", series.title());
                continue;
            }
            let path = dir.join(format!("{}.png", series.field.name()));
            Self::render_bar_chart(series, &path)
                .with_context(|| format!("rendering {}", path.display()))?;
            written.push(path);
        }

        if view.scatter.is_empty() {
            log::warn!("No data for Agent Rating vs Delivery Time; skipped");
        } else {
            let path = dir.join("rating_vs_time.png");
            Self::render_scatter(&view.scatter, &path)
                .with_context(|| format!("rendering {}", path.display()))?;
            written.push(path);
        }

        if view.boxes.is_empty() {
            log::warn!("No data for Delivery Time Distribution by Category; skipped");
        } else {
            let path = dir.join("category_box.png");
            Self::render_box_plot(&view.boxes, &path)
                .with_context(|| format!("rendering {}", path.display()))?;
            written.push(path);
        }

        Ok(written)
    }

    fn category_label(labels: &[String], x: f64) -> String {
        let rounded = x.round();
        if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
            return String::new();
        }
        labels.get(rounded as usize).cloned().unwrap_or_default()
    }

    /// Value range padded by 15% on each side, always containing `floor`.
    fn padded_range(values: impl Iterator<Item = f64>, floor: Option<f64>) -> (f64, f64) {
        let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
        for v in values.filter(|v| v.is_finite()) {
            min = min.min(v);
            max = max.max(v);
        }
        if let Some(f) = floor {
            min = min.min(f);
            max = max.max(f);
        }
        if min.is_infinite() {
            return (0.0, 1.0);
        }
        let pad = ((max - min) * 0.15).max(1.0);
        let low = match floor {
            Some(f) if min >= f => f,
            _ => min - pad,
        };
        (low, max + pad)
    }

    pub fn render_bar_chart(series: &BarSeries, path: &Path) -> Result<()> {
        let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let n = series.groups.len();
        let labels: Vec<String> = series.groups.iter().map(|g| g.group.clone()).collect();
        let (y_min, y_max) = Self::padded_range(series.groups.iter().map(|g| g.mean), Some(0.0));

        let mut chart = ChartBuilder::on(&root)
            .caption(series.title(), (FONT, 26))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), y_min..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n + 1)
            .x_label_formatter(&|x: &f64| Self::category_label(&labels, *x))
            .x_desc(series.field.name())
            .y_desc("delivery_time")
            .draw()?;

        chart.draw_series(series.groups.iter().enumerate().map(|(i, g)| {
            let x = i as f64;
            Rectangle::new([(x - 0.3, 0.0), (x + 0.3, g.mean)], BAR.filled())
        }))?;

        chart.draw_series(series.groups.iter().enumerate().map(|(i, g)| {
            Text::new(
                format!("{:.2}", g.mean),
                (i as f64 - 0.1, g.mean),
                (FONT, 14).into_font(),
            )
        }))?;

        root.present()?;
        Ok(())
    }

    pub fn render_scatter(points: &[ScatterPoint], path: &Path) -> Result<()> {
        let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let (x_min, x_max) = Self::padded_range(points.iter().map(|p| p.agent_rating), None);
        let (y_min, y_max) = Self::padded_range(points.iter().map(|p| p.delivery_time), None);

        let mut chart = ChartBuilder::on(&root)
            .caption("Agent Rating vs Delivery Time", (FONT, 26))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        chart
            .configure_mesh()
            .x_desc("agent_rating")
            .y_desc("delivery_time")
            .draw()?;

        let mut groups: Vec<Option<AgeGroup>> = AgeGroup::ALL.iter().copied().map(Some).collect();
        groups.push(None);

        for (idx, group) in groups.into_iter().enumerate() {
            let members: Vec<(f64, f64)> = points
                .iter()
                .filter(|p| p.age_group == group)
                .map(|p| (p.agent_rating, p.delivery_time))
                .collect();
            if members.is_empty() {
                continue;
            }

            let color = match group {
                Some(_) => Palette99::pick(idx).to_rgba(),
                None => RGBAColor(150, 150, 150, 1.0),
            };
            chart
                .draw_series(
                    members
                        .into_iter()
                        .map(move |xy| Circle::new(xy, 3, color.filled())),
                )?
                .label(group.map(AgeGroup::label).unwrap_or("n/a"))
                .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }

    pub fn render_box_plot(boxes: &[BoxStats], path: &Path) -> Result<()> {
        let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let n = boxes.len();
        let labels: Vec<String> = boxes.iter().map(|b| b.group.clone()).collect();
        let (y_min, y_max) =
            Self::padded_range(boxes.iter().flat_map(|b| b.values.iter().copied()), None);

        let mut chart = ChartBuilder::on(&root)
            .caption("Delivery Time Distribution by Category", (FONT, 26))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), y_min..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n + 1)
            .x_label_formatter(&|x: &f64| Self::category_label(&labels, *x))
            .x_desc("category")
            .y_desc("delivery_time")
            .draw()?;

        for (i, stats) in boxes.iter().enumerate() {
            let x = i as f64;
            let color = Palette99::pick(i).to_rgba();

            chart.draw_series(std::iter::once(Rectangle::new(
                [(x - 0.25, stats.q1), (x + 0.25, stats.q3)],
                color.mix(0.3).filled(),
            )))?;
            chart.draw_series(std::iter::once(Rectangle::new(
                [(x - 0.25, stats.q1), (x + 0.25, stats.q3)],
                color.stroke_width(2),
            )))?;

            let segments = [
                vec![(x - 0.25, stats.median), (x + 0.25, stats.median)],
                vec![(x, stats.q3), (x, stats.upper_whisker)],
                vec![(x, stats.q1), (x, stats.lower_whisker)],
                vec![(x - 0.1, stats.upper_whisker), (x + 0.1, stats.upper_whisker)],
                vec![(x - 0.1, stats.lower_whisker), (x + 0.1, stats.lower_whisker)],
            ];
            chart.draw_series(
                segments
                    .into_iter()
                    .map(|seg| PathElement::new(seg, color.stroke_width(2))),
            )?;

            chart.draw_series(
                stats
                    .values
                    .iter()
                    .filter(|&&v| v < stats.lower_whisker || v > stats.upper_whisker)
                    .map(|&v| Circle::new((x, v), 3, color.filled())),
            )?;
        }

        root.present()?;
        Ok(())
    }
}
