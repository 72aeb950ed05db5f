//! Data Processor Module
//! Cleans the raw text table into typed delivery records.

use super::columns::ColumnMapping;
use super::model::{CanonicalField, DeliveryRecord, RawTable};

/// Cell texts that count as "no value".
const MISSING_SENTINELS: [&str; 3] = ["", "nan", "None"];

/// Number of cleaned rows shown in the data summary.
pub const PREVIEW_ROWS: usize = 5;

/// Output of the cleaning stage.
#[derive(Debug, Clone, Default)]
pub struct CleanedData {
    pub records: Vec<DeliveryRecord>,
    pub rows_before: usize,
    pub rows_after: usize,
}

impl CleanedData {
    pub fn preview(&self) -> &[DeliveryRecord] {
        &self.records[..self.records.len().min(PREVIEW_ROWS)]
    }
}

/// Handles data cleaning and type coercion.
pub struct DataProcessor;

impl DataProcessor {
    /// Project the raw table onto the canonical fields, coerce the numeric
    /// ones and drop rows without a delivery time.
    ///
    /// Derived features (`late`, `age_group`) are left at their defaults;
    /// they are filled in over the whole cleaned set afterwards.
    pub fn clean(table: &RawTable, mapping: &ColumnMapping) -> CleanedData {
        let rows_before = table.row_count();
        let column = |field: CanonicalField| {
            mapping
                .source(field)
                .and_then(|header| table.column(header))
        };

        let delivery_time = column(CanonicalField::DeliveryTime);
        let weather = column(CanonicalField::Weather);
        let traffic = column(CanonicalField::Traffic);
        let vehicle = column(CanonicalField::Vehicle);
        let agent_age = column(CanonicalField::AgentAge);
        let agent_rating = column(CanonicalField::AgentRating);
        let area = column(CanonicalField::Area);
        let category = column(CanonicalField::Category);

        let records: Vec<DeliveryRecord> = (0..rows_before)
            .filter_map(|row| {
                let delivery_time = Self::numeric_cell(delivery_time, row)?;
                Some(DeliveryRecord {
                    delivery_time,
                    weather: Self::text_cell(weather, row),
                    traffic: Self::text_cell(traffic, row),
                    vehicle: Self::text_cell(vehicle, row),
                    agent_age: Self::numeric_cell(agent_age, row),
                    agent_rating: Self::numeric_cell(agent_rating, row),
                    area: Self::text_cell(area, row),
                    category: Self::text_cell(category, row),
                    late: false,
                    age_group: None,
                })
            })
            .collect();

        let rows_after = records.len();
        log::info!("Rows before cleaning: {rows_before}, after cleaning: {rows_after}");

        CleanedData {
            records,
            rows_before,
            rows_after,
        }
    }

    /// Text of a cell, or `None` if the column is unmapped or the cell holds
    /// a missing-value sentinel.
    fn text_cell(column: Option<&[Option<String>]>, row: usize) -> Option<String> {
        let cell = column?.get(row)?.as_deref()?;
        if MISSING_SENTINELS.contains(&cell) {
            None
        } else {
            Some(cell.to_string())
        }
    }

    /// Numeric value of a cell. Unparsable text is treated as missing.
    fn numeric_cell(column: Option<&[Option<String>]>, row: usize) -> Option<f64> {
        let text = Self::text_cell(column, row)?;
        text.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[Option<&str>]]) -> RawTable {
        let columns: Vec<Vec<Option<String>>> = (0..headers.len())
            .map(|c| {
                rows.iter()
                    .map(|row| row[c].map(str::to_string))
                    .collect::<Vec<_>>()
            })
            .collect();
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            columns,
        }
    }

    #[test]
    fn keeps_present_delivery_times_unchanged() {
        let raw = table(
            &["Delivery_Time", "Weather"],
            &[&[Some("120"), Some("Sunny")], &[Some("87.5"), Some("Fog")]],
        );
        let mapping = ColumnMapping::resolve(raw.headers.as_slice());
        let cleaned = DataProcessor::clean(&raw, &mapping);

        let times: Vec<f64> = cleaned.records.iter().map(|r| r.delivery_time).collect();
        assert_eq!(times, vec![120.0, 87.5]);
        assert_eq!(cleaned.records[1].weather.as_deref(), Some("Fog"));
    }

    #[test]
    fn drops_rows_without_delivery_time() {
        let raw = table(
            &["Delivery Time", "Agent Rating"],
            &[
                &[Some("100"), Some("4.5")],
                &[None, Some("4.0")],
                &[Some("nan"), Some("3.9")],
                &[Some("None"), None],
                &[Some("fast"), Some("5")],
                &[Some(""), Some("5")],
                &[Some(" 42 "), Some("oops")],
            ],
        );
        let mapping = ColumnMapping::resolve(raw.headers.as_slice());
        let cleaned = DataProcessor::clean(&raw, &mapping);

        assert_eq!(cleaned.rows_before, 7);
        assert_eq!(cleaned.rows_after, 2);
        assert!(cleaned.rows_after <= cleaned.rows_before);
        assert!(cleaned.records.iter().all(|r| !r.delivery_time.is_nan()));
        assert_eq!(cleaned.records[1].delivery_time, 42.0);
        assert_eq!(cleaned.records[1].agent_rating, None);
    }

    #[test]
    fn sentinels_become_missing_in_text_columns() {
        let raw = table(
            &["Delivery_Time", "Traffic", "Area", "Category"],
            &[&[Some("10"), Some("nan"), Some("None"), Some("")]],
        );
        let mapping = ColumnMapping::resolve(raw.headers.as_slice());
        let record = &DataProcessor::clean(&raw, &mapping).records[0];

        assert_eq!(record.traffic, None);
        assert_eq!(record.area, None);
        assert_eq!(record.category, None);
    }

    #[test]
    fn unmapped_fields_are_missing_for_every_record() {
        let raw = table(&["Delivery_Time"], &[&[Some("10")], &[Some("20")]]);
        let mapping = ColumnMapping::resolve(raw.headers.as_slice());
        let cleaned = DataProcessor::clean(&raw, &mapping);

        assert!(cleaned
            .records
            .iter()
            .all(|r| r.weather.is_none() && r.agent_age.is_none() && r.vehicle.is_none()));
    }

    #[test]
    fn all_rows_dropped_is_not_an_error() {
        let raw = table(&["Delivery_Time"], &[&[Some("n/a")]]);
        let mapping = ColumnMapping::resolve(raw.headers.as_slice());
        let cleaned = DataProcessor::clean(&raw, &mapping);

        assert_eq!(cleaned.rows_before, 1);
        assert_eq!(cleaned.rows_after, 0);
        assert!(cleaned.preview().is_empty());
    }

    #[test]
    fn preview_is_capped() {
        let rows: Vec<[Option<&str>; 1]> = (0..8).map(|_| [Some("1")]).collect();
        let row_refs: Vec<&[Option<&str>]> = rows.iter().map(|r| &r[..]).collect();
        let raw = table(&["Delivery_Time"], &row_refs);
        let cleaned = DataProcessor::clean(&raw, &ColumnMapping::resolve(raw.headers.as_slice()));

        assert_eq!(cleaned.preview().len(), PREVIEW_ROWS);
    }
}
