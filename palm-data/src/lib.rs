//! Data processing for palm oil yield and climate records.
//!
//! This crate turns raw monthly records into the forms consumed by the
//! charting layer, the prediction tool and the insight summarizer: yearly
//! aggregates, harvest categories, derived climate features and the
//! dashboard snapshot built from them.

pub mod aggregation;
pub mod category;
pub mod chart;
pub mod climate;
pub mod dashboard;
pub mod metric;
pub mod snapshot;

pub use aggregation::{aggregate_yearly, filter_up_to, percent_change, YearlyAggregate};
pub use category::{classify, HarvestCategory, MonthlyCategory};
pub use chart::{dashboard_charts, MetricCharts};
pub use climate::{derive_features, merge_sources, ClimateFeatures};
pub use dashboard::{build_dashboard, DashboardMetrics};
pub use metric::YieldMetric;
pub use snapshot::{snapshot, InsightSnapshot};
