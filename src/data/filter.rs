use std::collections::{BTreeMap, BTreeSet};

use super::model::{CategoricalField, DeliveryRecord};

// ---------------------------------------------------------------------------
// Available values per categorical field
// ---------------------------------------------------------------------------

/// For each categorical field the sorted set of distinct non-missing values
/// seen in the cleaned data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    values: BTreeMap<CategoricalField, BTreeSet<String>>,
}

impl FilterOptions {
    pub fn from_records(records: &[DeliveryRecord]) -> Self {
        let mut values: BTreeMap<CategoricalField, BTreeSet<String>> = CategoricalField::ALL
            .iter()
            .map(|&field| (field, BTreeSet::new()))
            .collect();

        for record in records {
            for field in CategoricalField::ALL {
                if let Some(v) = record.categorical(field) {
                    values.entry(field).or_default().insert(v.to_string());
                }
            }
        }
        Self { values }
    }

    /// Options for one field; empty when the field has no values at all.
    pub fn get(&self, field: CategoricalField) -> &BTreeSet<String> {
        static EMPTY: BTreeSet<String> = BTreeSet::new();
        self.values.get(&field).unwrap_or(&EMPTY)
    }

    /// A field with nothing to choose from can never match any record.
    pub fn is_unavailable(&self, field: CategoricalField) -> bool {
        self.get(field).is_empty()
    }
}

// ---------------------------------------------------------------------------
// Filter predicate: which values are selected per field
// ---------------------------------------------------------------------------

/// Per-field selection state: field → set of allowed values.
pub type FilterState = BTreeMap<CategoricalField, BTreeSet<String>>;

/// Initialise a [`FilterState`] with every available value selected.
pub fn init_filter_state(options: &FilterOptions) -> FilterState {
    CategoricalField::ALL
        .iter()
        .map(|&field| (field, options.get(field).clone()))
        .collect()
}

/// Whether a record passes every field's selection.
///
/// A record passes a field when its value for that field is present and in
/// the selected set. A field that is absent from `state` or has an empty
/// selection lets nothing through, so an unavailable field empties the view.
pub fn record_passes(record: &DeliveryRecord, state: &FilterState) -> bool {
    CategoricalField::ALL.iter().all(|&field| {
        match (record.categorical(field), state.get(&field)) {
            (Some(value), Some(selected)) => selected.contains(value),
            _ => false,
        }
    })
}

/// Return indices of records that pass all filters.
pub fn filtered_indices(records: &[DeliveryRecord], state: &FilterState) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| record_passes(record, state))
        .map(|(i, _)| i)
        .collect()
}
