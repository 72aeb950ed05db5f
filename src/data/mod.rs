//! Data module - CSV loading, column resolution, cleaning and filtering
//!
//! ```text
//!  delivery CSV
//!        │
//!        ▼
//!   loader     all-text RawTable
//!        │
//!        ▼
//!   columns    header spellings → canonical fields
//!        │
//!        ▼
//!   processor  sentinels, numeric coercion, row drop → DeliveryRecord
//!        │
//!        ▼
//!   filter     per-field selections → filtered indices
//! ```

mod columns;
mod filter;
mod loader;
mod model;
mod processor;

pub use columns::ColumnMapping;
pub use filter::{filtered_indices, init_filter_state, FilterOptions, FilterState};
pub use loader::{DataLoader, LoaderError, DEFAULT_DATA_PATH};
pub use model::{AgeGroup, CanonicalField, CategoricalField, DeliveryRecord};
pub use processor::{CleanedData, DataProcessor};
