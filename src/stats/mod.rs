//! Statistics module - feature derivation and aggregation

mod calculator;

pub use calculator::{
    format_metric, AggregateError, BarSeries, BoxStats, ScatterPoint, StatsCalculator,
    SummaryMetrics,
};
