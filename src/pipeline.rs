//! Dashboard pipeline
//! Load → resolve → clean → derive once per file, then filter → aggregate on
//! every selection change.

use crate::data::{
    filtered_indices, init_filter_state, CanonicalField, CleanedData, ColumnMapping, DataLoader,
    DataProcessor, DeliveryRecord, FilterOptions, FilterState, LoaderError,
};
use crate::stats::{AggregateError, BarSeries, BoxStats, ScatterPoint, StatsCalculator, SummaryMetrics};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// Conditions that stop the dashboard from rendering anything.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error("Could not find 'Delivery_Time' column. Please check your CSV header.")]
    MissingDeliveryTime,
}

/// Everything that does not depend on the user's filter selection.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub mapping: ColumnMapping,
    pub cleaned: CleanedData,
    pub options: FilterOptions,
    pub late_threshold: Option<f64>,
}

/// Everything the Presentation Surface draws for one selection.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub summary: SummaryMetrics,
    pub bars: Vec<BarSeries>,
    pub scatter: Vec<ScatterPoint>,
    pub boxes: Vec<BoxStats>,
}

impl DashboardView {
    pub fn is_empty(&self) -> bool {
        self.summary.filtered_count == 0
    }
}

/// Contents of `summary.json` in export mode.
#[derive(Debug, Serialize)]
pub struct ExportSummary<'a> {
    pub data_path: &'a Path,
    pub column_mapping: &'a ColumnMapping,
    pub rows_before_cleaning: usize,
    pub rows_after_cleaning: usize,
    pub late_threshold: Option<f64>,
    pub preview: &'a [DeliveryRecord],
    pub metrics: &'a SummaryMetrics,
    pub charts: ExportCharts<'a>,
}

/// Aggregated chart data behind the exported PNGs.
#[derive(Debug, Serialize)]
pub struct ExportCharts<'a> {
    pub bars: &'a [BarSeries],
    pub scatter: &'a [ScatterPoint],
    pub boxes: &'a [BoxStats],
}

impl<'a> ExportSummary<'a> {
    pub fn new(data_path: &'a Path, dataset: &'a Dataset, view: &'a DashboardView) -> Self {
        Self {
            data_path,
            column_mapping: &dataset.mapping,
            rows_before_cleaning: dataset.cleaned.rows_before,
            rows_after_cleaning: dataset.cleaned.rows_after,
            late_threshold: dataset.late_threshold,
            preview: dataset.cleaned.preview(),
            metrics: &view.summary,
            charts: ExportCharts {
                bars: &view.bars,
                scatter: &view.scatter,
                boxes: &view.boxes,
            },
        }
    }
}

impl Dataset {
    /// Read and prepare the CSV at `path`.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let raw = DataLoader::load_csv(path)?;
        let mapping = ColumnMapping::resolve(raw.headers.as_slice());
        for (field, source) in mapping.entries() {
            log::info!("{field} → {}", source.unwrap_or("None"));
        }

        if mapping.source(CanonicalField::DeliveryTime).is_none() {
            log::error!("No delivery time column among {:?}", raw.headers);
            return Err(PipelineError::MissingDeliveryTime);
        }

        let mut cleaned = DataProcessor::clean(&raw, &mapping);
        let late_threshold = StatsCalculator::derive_features(&mut cleaned.records);
        let options = FilterOptions::from_records(&cleaned.records);

        Ok(Self {
            mapping,
            cleaned,
            options,
            late_threshold,
        })
    }

    pub fn records(&self) -> &[DeliveryRecord] {
        &self.cleaned.records
    }

    /// Selection with every available value chosen.
    pub fn default_selection(&self) -> FilterState {
        init_filter_state(&self.options)
    }

    /// Filter and aggregate for one selection.
    pub fn view(&self, selection: &FilterState) -> Result<DashboardView, AggregateError> {
        let records = self.records();
        let filtered: Vec<&DeliveryRecord> = filtered_indices(records, selection)
            .into_iter()
            .map(|i| &records[i])
            .collect();
        log::debug!("Filtered records: {} / {}", filtered.len(), records.len());

        Ok(DashboardView {
            summary: StatsCalculator::summary(&filtered, records.len()),
            bars: StatsCalculator::compute_bar_series_parallel(&filtered)?,
            scatter: StatsCalculator::scatter_points(&filtered),
            boxes: StatsCalculator::category_boxes(&filtered),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CategoricalField;
    use std::collections::BTreeSet;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("create temp csv");
        file.write_all(contents.as_bytes()).expect("write temp csv");
        file.flush().expect("flush temp csv");
        file
    }

    const FIVE_ROWS: &str = "\
Delivery_Time,Weather,Traffic,Vehicle,Agent_Age,Agent_Rating,Area,Category
10,Sunny,Low,Bike,22,4.5,Urban,Food
30,Sunny,High,Bike,35,4.0,Urban,Food
20,Rainy,Low,Van,45,3.5,Urban,Grocery
40,Rainy,High,Van,28,4.8,Urban,Grocery
,Rainy,Low,Van,30,4.1,Urban,Food
";

    #[test]
    fn missing_file_is_fatal() {
        let err = Dataset::load(Path::new("no/such/deliveries.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::Load(LoaderError::NotFound(_))));
    }

    #[test]
    fn missing_delivery_time_column_is_fatal() {
        let file = write_csv("Weather,Traffic\nSunny,Low\n");
        let err = Dataset::load(file.path()).unwrap_err();
        assert!(matches!(err, PipelineError::MissingDeliveryTime));
    }

    #[test]
    fn deselecting_rainy_halves_the_view() {
        let file = write_csv(FIVE_ROWS);
        let dataset = Dataset::load(file.path()).unwrap();
        assert_eq!(dataset.cleaned.rows_before, 5);
        assert_eq!(dataset.cleaned.rows_after, 4);

        let mut selection = dataset.default_selection();
        let full = dataset.view(&selection).unwrap();
        assert_eq!(full.summary.filtered_count, 4);

        selection.insert(
            CategoricalField::Weather,
            BTreeSet::from(["Sunny".to_string()]),
        );
        let sunny = dataset.view(&selection).unwrap();
        assert_eq!(sunny.summary.filtered_count, 2);
        assert_eq!(sunny.summary.avg_delivery_time, Some(20.0));

        let weather = sunny
            .bars
            .iter()
            .find(|s| s.field == CategoricalField::Weather)
            .unwrap();
        assert_eq!(weather.groups.len(), 1);
        assert_eq!(weather.groups[0].group, "Sunny");
        assert_eq!(weather.groups[0].mean, 20.0);
    }

    #[test]
    fn features_are_computed_on_the_full_dataset() {
        let file = write_csv(FIVE_ROWS);
        let dataset = Dataset::load(file.path()).unwrap();
        let before: Vec<bool> = dataset.records().iter().map(|r| r.late).collect();

        let mut selection = dataset.default_selection();
        selection.insert(CategoricalField::Traffic, BTreeSet::from(["High".to_string()]));
        dataset.view(&selection).unwrap();

        let after: Vec<bool> = dataset.records().iter().map(|r| r.late).collect();
        assert_eq!(before, after);
        assert!(dataset.late_threshold.is_some());
    }

    #[test]
    fn empty_view_degrades_to_no_data() {
        let file = write_csv(FIVE_ROWS);
        let dataset = Dataset::load(file.path()).unwrap();

        let mut selection = dataset.default_selection();
        selection.insert(CategoricalField::Vehicle, BTreeSet::new());
        let view = dataset.view(&selection).unwrap();

        assert!(view.is_empty());
        assert_eq!(view.summary.avg_delivery_time, None);
        assert_eq!(view.summary.avg_agent_rating, None);
        assert_eq!(view.summary.late_pct, None);
        assert!(view.bars.iter().all(BarSeries::is_empty));
        assert!(view.scatter.is_empty());
        assert!(view.boxes.is_empty());
    }

    #[test]
    fn header_only_file_loads_with_no_rows() {
        let file = write_csv("Delivery Time,Weather\n");
        let dataset = Dataset::load(file.path()).unwrap();
        assert_eq!(dataset.cleaned.rows_after, 0);
        assert!(dataset.options.is_unavailable(CategoricalField::Weather));

        let view = dataset.view(&dataset.default_selection()).unwrap();
        assert!(view.is_empty());
    }

    #[test]
    fn export_summary_carries_mapping_and_chart_data() {
        let file = write_csv(FIVE_ROWS);
        let dataset = Dataset::load(file.path()).unwrap();
        let view = dataset.view(&dataset.default_selection()).unwrap();
        let summary = ExportSummary::new(file.path(), &dataset, &view);
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["column_mapping"]["delivery_time"], "Delivery_Time");
        assert_eq!(json["rows_after_cleaning"], 4);
        assert_eq!(json["preview"].as_array().unwrap().len(), 4);
        assert_eq!(json["metrics"]["filtered_count"], 4);

        let bars = json["charts"]["bars"].as_array().unwrap();
        assert_eq!(bars.len(), CategoricalField::BAR_FIELDS.len());
        assert_eq!(bars[0]["field"], "weather");
        assert_eq!(json["charts"]["scatter"].as_array().unwrap().len(), 4);

        let boxes = json["charts"]["boxes"].as_array().unwrap();
        assert_eq!(boxes[0]["group"], "Food");
        assert_eq!(boxes[0]["count"], 2);
        assert_eq!(boxes[0]["mean"], 20.0);
        assert!(boxes[0].get("values").is_none());
    }
}
