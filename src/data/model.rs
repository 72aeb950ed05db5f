//! Core record types shared by every pipeline stage.

use serde::Serialize;
use std::fmt;

// ---------------------------------------------------------------------------
// Canonical fields
// ---------------------------------------------------------------------------

/// The eight semantic columns the pipeline works with, whatever the CSV
/// header spelling was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    DeliveryTime,
    Weather,
    Traffic,
    Vehicle,
    AgentAge,
    AgentRating,
    Area,
    Category,
}

impl CanonicalField {
    /// Resolution order.
    pub const ALL: [CanonicalField; 8] = [
        CanonicalField::DeliveryTime,
        CanonicalField::Weather,
        CanonicalField::Traffic,
        CanonicalField::Vehicle,
        CanonicalField::AgentAge,
        CanonicalField::AgentRating,
        CanonicalField::Area,
        CanonicalField::Category,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CanonicalField::DeliveryTime => "delivery_time",
            CanonicalField::Weather => "weather",
            CanonicalField::Traffic => "traffic",
            CanonicalField::Vehicle => "vehicle",
            CanonicalField::AgentAge => "agent_age",
            CanonicalField::AgentRating => "agent_rating",
            CanonicalField::Area => "area",
            CanonicalField::Category => "category",
        }
    }

    /// Accepted header spellings, in priority order.
    pub fn variants(self) -> &'static [&'static str] {
        match self {
            CanonicalField::DeliveryTime => {
                &["Delivery_Time", "Delivery Time", "Time Taken", "delivery_time"]
            }
            CanonicalField::Weather => &["Weather", "weather"],
            CanonicalField::Traffic => &["Traffic", "traffic"],
            CanonicalField::Vehicle => &["Vehicle", "vehicle", "Vehicle Type"],
            CanonicalField::AgentAge => &["Agent_Age", "Agent Age", "Age"],
            CanonicalField::AgentRating => &["Agent_Rating", "Agent Rating", "Rating"],
            CanonicalField::Area => &["Area", "area", "Region"],
            CanonicalField::Category => &["Category", "category", "Product Category"],
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Categorical (filterable) fields
// ---------------------------------------------------------------------------

/// The five text fields a user can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalField {
    Weather,
    Traffic,
    Vehicle,
    Area,
    Category,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 5] = [
        CategoricalField::Weather,
        CategoricalField::Traffic,
        CategoricalField::Vehicle,
        CategoricalField::Area,
        CategoricalField::Category,
    ];

    /// Fields that get a mean-delivery-time bar chart.
    pub const BAR_FIELDS: [CategoricalField; 4] = [
        CategoricalField::Weather,
        CategoricalField::Traffic,
        CategoricalField::Vehicle,
        CategoricalField::Area,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CategoricalField::Weather => "weather",
            CategoricalField::Traffic => "traffic",
            CategoricalField::Vehicle => "vehicle",
            CategoricalField::Area => "area",
            CategoricalField::Category => "category",
        }
    }

    /// Capitalised label for filter widgets.
    pub fn label(self) -> &'static str {
        match self {
            CategoricalField::Weather => "Weather",
            CategoricalField::Traffic => "Traffic",
            CategoricalField::Vehicle => "Vehicle",
            CategoricalField::Area => "Area",
            CategoricalField::Category => "Category",
        }
    }
}

impl fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Age groups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AgeGroup {
    #[serde(rename = "<25")]
    Under25,
    #[serde(rename = "25–40")]
    From25To40,
    #[serde(rename = "40+")]
    Over40,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 3] = [AgeGroup::Under25, AgeGroup::From25To40, AgeGroup::Over40];

    /// Bucket an agent age. Bins are `[0, 24]`, `(24, 40]`, `(40, 100]`;
    /// anything else is unbucketed.
    pub fn from_age(age: Option<f64>) -> Option<AgeGroup> {
        let age = age?;
        if age.is_nan() || !(0.0..=100.0).contains(&age) {
            None
        } else if age <= 24.0 {
            Some(AgeGroup::Under25)
        } else if age <= 40.0 {
            Some(AgeGroup::From25To40)
        } else {
            Some(AgeGroup::Over40)
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::Under25 => "<25",
            AgeGroup::From25To40 => "25–40",
            AgeGroup::Over40 => "40+",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Tables and records
// ---------------------------------------------------------------------------

/// A CSV file as read from disk: every cell is still text.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// Header names, trimmed.
    pub headers: Vec<String>,
    /// One entry per header, each holding `row_count` cells.
    pub columns: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn row_count(&self) -> usize {
        self.columns.first().map(Vec::len).unwrap_or(0)
    }

    /// Cells of the column with exactly this header.
    pub fn column(&self, header: &str) -> Option<&[Option<String>]> {
        self.headers
            .iter()
            .position(|h| h == header)
            .map(|idx| self.columns[idx].as_slice())
    }
}

/// One cleaned delivery: canonical fields plus derived features.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryRecord {
    pub delivery_time: f64,
    pub weather: Option<String>,
    pub traffic: Option<String>,
    pub vehicle: Option<String>,
    pub agent_age: Option<f64>,
    pub agent_rating: Option<f64>,
    pub area: Option<String>,
    pub category: Option<String>,
    /// Delivery time above the dataset-wide mean + 1 std.
    pub late: bool,
    pub age_group: Option<AgeGroup>,
}

impl DeliveryRecord {
    /// Value of a categorical field, if present.
    pub fn categorical(&self, field: CategoricalField) -> Option<&str> {
        match field {
            CategoricalField::Weather => self.weather.as_deref(),
            CategoricalField::Traffic => self.traffic.as_deref(),
            CategoricalField::Vehicle => self.vehicle.as_deref(),
            CategoricalField::Area => self.area.as_deref(),
            CategoricalField::Category => self.category.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_bucket_boundaries() {
        assert_eq!(AgeGroup::from_age(Some(0.0)), Some(AgeGroup::Under25));
        assert_eq!(AgeGroup::from_age(Some(24.0)), Some(AgeGroup::Under25));
        assert_eq!(AgeGroup::from_age(Some(25.0)), Some(AgeGroup::From25To40));
        assert_eq!(AgeGroup::from_age(Some(40.0)), Some(AgeGroup::From25To40));
        assert_eq!(AgeGroup::from_age(Some(41.0)), Some(AgeGroup::Over40));
        assert_eq!(AgeGroup::from_age(Some(100.0)), Some(AgeGroup::Over40));
        assert_eq!(AgeGroup::from_age(Some(150.0)), None);
        assert_eq!(AgeGroup::from_age(Some(-1.0)), None);
        assert_eq!(AgeGroup::from_age(None), None);
    }

    #[test]
    fn fractional_ages_fall_in_half_open_bins() {
        assert_eq!(AgeGroup::from_age(Some(24.5)), Some(AgeGroup::From25To40));
        assert_eq!(AgeGroup::from_age(Some(40.1)), Some(AgeGroup::Over40));
    }

    #[test]
    fn raw_table_column_lookup() {
        let table = RawTable {
            headers: vec!["A".into(), "B".into()],
            columns: vec![vec![Some("1".into())], vec![None]],
        };
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.column("B"), Some(&[None][..]));
        assert!(table.column("C").is_none());
    }
}
