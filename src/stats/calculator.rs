//! Statistics Calculator Module
//! Feature derivation and the aggregations behind every metric and chart.

use crate::data::{AgeGroup, CategoricalField, DeliveryRecord};
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Headline numbers for the filtered view. `None` means undefined (no rows,
/// or no values for that column) and is shown as "n/a".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub filtered_count: usize,
    pub total_count: usize,
    pub avg_delivery_time: Option<f64>,
    pub avg_agent_rating: Option<f64>,
    pub late_pct: Option<f64>,
}

/// Mean delivery time for one category value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean {
    pub group: String,
    pub mean: f64,
}

/// Bar chart input: one field, groups sorted by value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub field: CategoricalField,
    pub groups: Vec<GroupMean>,
}

impl BarSeries {
    pub fn title(&self) -> String {
        format!("Avg Delivery Time by {}", self.field.label())
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Agent rating vs delivery time, coloured by age group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub agent_rating: f64,
    pub delivery_time: f64,
    pub age_group: Option<AgeGroup>,
}

/// Five-number summary for one box of the category box plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub group: String,
    pub count: usize,
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub mean: f64,
    #[serde(skip)]
    pub values: Vec<f64>,
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Arithmetic mean, `None` for an empty slice.
    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            None
        } else {
            Some(values.iter().mean())
        }
    }

    /// Lateness cut-off: mean plus one population standard deviation.
    ///
    /// With fewer than two deliveries the spread is undefined and no
    /// threshold exists.
    pub fn late_threshold(times: &[f64]) -> Option<f64> {
        if times.len() < 2 {
            return None;
        }
        let mean = times.iter().mean();
        let std = times.iter().population_std_dev();
        let threshold = mean + std;
        threshold.is_finite().then_some(threshold)
    }

    /// Fill in `late` and `age_group` for every record, using statistics of
    /// the whole slice. Returns the threshold that was applied.
    pub fn derive_features(records: &mut [DeliveryRecord]) -> Option<f64> {
        let times: Vec<f64> = records.iter().map(|r| r.delivery_time).collect();
        let threshold = Self::late_threshold(&times);

        for record in records.iter_mut() {
            record.late = threshold.is_some_and(|t| record.delivery_time > t);
            record.age_group = AgeGroup::from_age(record.agent_age);
        }

        match threshold {
            Some(t) => log::info!("Late threshold: {t:.2} min"),
            None => log::warn!("Too few records for a late threshold; no delivery is late"),
        }
        threshold
    }

    /// Mean delivery time, mean rating and late percentage over `filtered`.
    pub fn summary(filtered: &[&DeliveryRecord], total_count: usize) -> SummaryMetrics {
        let times: Vec<f64> = filtered.iter().map(|r| r.delivery_time).collect();
        let ratings: Vec<f64> = filtered.iter().filter_map(|r| r.agent_rating).collect();
        let late_pct = if filtered.is_empty() {
            None
        } else {
            let late = filtered.iter().filter(|r| r.late).count();
            Some(late as f64 / filtered.len() as f64 * 100.0)
        };

        SummaryMetrics {
            filtered_count: filtered.len(),
            total_count,
            avg_delivery_time: Self::mean(&times),
            avg_agent_rating: Self::mean(&ratings),
            late_pct,
        }
    }

    /// Group by `field` and take the mean delivery time of each group.
    pub fn group_means(
        filtered: &[&DeliveryRecord],
        field: CategoricalField,
    ) -> Result<BarSeries, AggregateError> {
        let mut keys: Vec<String> = Vec::with_capacity(filtered.len());
        let mut times: Vec<f64> = Vec::with_capacity(filtered.len());
        for record in filtered {
            if let Some(key) = record.categorical(field) {
                keys.push(key.to_string());
                times.push(record.delivery_time);
            }
        }

        if keys.is_empty() {
            return Ok(BarSeries {
                field,
                groups: Vec::new(),
            });
        }

        let df = DataFrame::new(vec![
            Column::new("group".into(), keys),
            Column::new("delivery_time".into(), times),
        ])?;

        let grouped = df
            .lazy()
            .group_by([col("group")])
            .agg([col("delivery_time").mean()])
            .collect()?;

        let group_ca = grouped.column("group")?.str()?;
        let mean_ca = grouped.column("delivery_time")?.f64()?;

        let mut groups: Vec<GroupMean> = group_ca
            .into_iter()
            .zip(mean_ca.into_iter())
            .filter_map(|(g, m)| {
                Some(GroupMean {
                    group: g?.to_string(),
                    mean: m?,
                })
            })
            .collect();
        groups.sort_by(|a, b| a.group.cmp(&b.group));

        Ok(BarSeries { field, groups })
    }

    /// Bar series for every bar-chart field, aggregated in parallel.
    pub fn compute_bar_series_parallel(
        filtered: &[&DeliveryRecord],
    ) -> Result<Vec<BarSeries>, AggregateError> {
        CategoricalField::BAR_FIELDS
            .par_iter()
            .map(|&field| Self::group_means(filtered, field))
            .collect()
    }

    /// Scatter points for records that have a rating.
    pub fn scatter_points(filtered: &[&DeliveryRecord]) -> Vec<ScatterPoint> {
        filtered
            .iter()
            .filter_map(|r| {
                Some(ScatterPoint {
                    agent_rating: r.agent_rating?,
                    delivery_time: r.delivery_time,
                    age_group: r.age_group,
                })
            })
            .collect()
    }

    /// Delivery time distribution per category, sorted by category.
    pub fn category_boxes(filtered: &[&DeliveryRecord]) -> Vec<BoxStats> {
        let mut by_category: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for record in filtered {
            if let Some(category) = record.categorical(CategoricalField::Category) {
                by_category
                    .entry(category)
                    .or_default()
                    .push(record.delivery_time);
            }
        }

        by_category
            .into_iter()
            .filter_map(|(group, values)| Self::box_stats(group, values))
            .collect()
    }

    /// Quartiles by linear interpolation, whiskers at the furthest points
    /// within 1.5 IQR of the box.
    pub fn box_stats(group: &str, values: Vec<f64>) -> Option<BoxStats> {
        let mean = Self::mean(&values)?;

        let mut sorted = values.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let q1 = Self::percentile(&sorted, 25.0);
        let median = Self::percentile(&sorted, 50.0);
        let q3 = Self::percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&v| v >= q1 - 1.5 * iqr)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= q3 + 1.5 * iqr)
            .unwrap_or(q3);

        Some(BoxStats {
            group: group.to_string(),
            count: sorted.len(),
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            mean,
            values,
        })
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }
}

/// Render an optional metric, `n/a` when undefined.
pub fn format_metric(value: Option<f64>, decimals: usize, suffix: &str) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.decimals$}{suffix}"),
        _ => "n/a".to_string(),
    }
}
