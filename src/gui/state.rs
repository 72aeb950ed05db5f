use std::path::{Path, PathBuf};

use crate::data::{CategoricalField, FilterState};
use crate::pipeline::{DashboardView, Dataset};

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct DashboardState {
    /// CSV the dashboard was built from.
    pub data_path: PathBuf,

    /// Prepared dataset (None when loading failed).
    pub dataset: Option<Dataset>,

    /// Per-field filter selections.
    pub selection: FilterState,

    /// Metrics and chart inputs for the current selection (cached).
    pub view: Option<DashboardView>,

    /// Error that stops everything else from rendering.
    pub fatal_error: Option<String>,
}

impl DashboardState {
    /// Run the selection-independent stages once and build the initial view.
    pub fn load(path: &Path) -> Self {
        let mut state = Self {
            data_path: path.to_path_buf(),
            dataset: None,
            selection: FilterState::default(),
            view: None,
            fatal_error: None,
        };

        match Dataset::load(path) {
            Ok(dataset) => {
                state.selection = dataset.default_selection();
                state.dataset = Some(dataset);
                state.refilter();
            }
            Err(e) => {
                log::error!("{e}");
                state.fatal_error = Some(e.to_string());
            }
        }
        state
    }

    /// Recompute the view after a selection change.
    pub fn refilter(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        match dataset.view(&self.selection) {
            Ok(view) => self.view = Some(view),
            Err(e) => {
                log::error!("Aggregation failed: {e}");
                self.fatal_error = Some(e.to_string());
                self.view = None;
            }
        }
    }

    /// Toggle a single value in a field's selection.
    pub fn toggle_value(&mut self, field: CategoricalField, value: &str) {
        let selected = self.selection.entry(field).or_default();
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.refilter();
    }

    /// Select every available value of a field.
    pub fn select_all(&mut self, field: CategoricalField) {
        if let Some(ds) = &self.dataset {
            self.selection.insert(field, ds.options.get(field).clone());
            self.refilter();
        }
    }

    /// Deselect every value of a field.
    pub fn select_none(&mut self, field: CategoricalField) {
        self.selection.entry(field).or_default().clear();
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn load(contents: &str) -> (tempfile::NamedTempFile, DashboardState) {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("create temp csv");
        file.write_all(contents.as_bytes()).expect("write temp csv");
        file.flush().expect("flush temp csv");
        let state = DashboardState::load(file.path());
        (file, state)
    }

    const CSV: &str = "\
Delivery_Time,Weather,Traffic,Vehicle,Area,Category
10,Sunny,Low,Bike,Urban,Food
20,Rainy,Low,Bike,Urban,Food
30,Rainy,High,Bike,Urban,Food
";

    fn filtered(state: &DashboardState) -> usize {
        state.view.as_ref().map(|v| v.summary.filtered_count).unwrap_or(0)
    }

    #[test]
    fn missing_file_sets_fatal_error() {
        let state = DashboardState::load(Path::new("nope/missing.csv"));
        assert!(state.dataset.is_none());
        assert!(state.view.is_none());
        assert!(state.fatal_error.unwrap().contains("Dataset not found"));
    }

    #[test]
    fn toggling_updates_the_view() {
        let (_file, mut state) = load(CSV);
        assert_eq!(filtered(&state), 3);

        state.toggle_value(CategoricalField::Weather, "Rainy");
        assert_eq!(filtered(&state), 1);

        state.toggle_value(CategoricalField::Weather, "Rainy");
        assert_eq!(filtered(&state), 3);
    }

    #[test]
    fn select_none_then_all() {
        let (_file, mut state) = load(CSV);
        state.select_none(CategoricalField::Traffic);
        assert_eq!(filtered(&state), 0);

        state.select_all(CategoricalField::Traffic);
        assert_eq!(filtered(&state), 3);
    }
}
