//! Chart payload structs for the yield dashboard.
//!
//! All structs derive `Serialize` so a charting frontend can consume them
//! as JSON without knowing about the record types.

use crate::category::HarvestCategory;
use crate::dashboard::DashboardMetrics;
use crate::metric::YieldMetric;
use palm_core::month::month_abbr;
use palm_core::Result;
use serde::Serialize;

/// A single (year, value) point for the yearly trend line.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct YearValue {
    pub year: i32,
    /// Yearly total in the metric's unit.
    pub value: f64,
}

/// One bar of the current-year monthly chart.
///
/// The bar colour is driven by `category`, so the frontend never
/// recomputes the mean or peak.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthBar {
    pub month: u32,
    /// Three-letter month label ("Jan".."Dec").
    pub month_name: &'static str,
    pub value: f64,
    pub category: HarvestCategory,
}

/// A (year, month, value) point for the previous/current year overlay.
///
/// Each point carries its year so the chart can draw one line per year on
/// a shared month axis.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthPoint {
    pub year: i32,
    pub month: u32,
    pub month_name: &'static str,
    pub value: f64,
}

/// Every series the dashboard draws for one metric.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetricCharts {
    pub metric: YieldMetric,
    pub unit: &'static str,
    pub trend: Vec<YearValue>,
    pub monthly: Vec<MonthBar>,
    pub comparison: Vec<MonthPoint>,
}

/// Yearly totals of `metric` across the trailing window.
pub fn trend_series(dashboard: &DashboardMetrics, metric: YieldMetric) -> Vec<YearValue> {
    dashboard
        .yearly
        .iter()
        .map(|aggregate| YearValue {
            year: aggregate.year,
            value: metric.total(aggregate),
        })
        .collect()
}

pub fn monthly_bars(dashboard: &DashboardMetrics, metric: YieldMetric) -> Vec<MonthBar> {
    dashboard
        .categories(metric)
        .map(|month| MonthBar {
            month: month.month,
            month_name: month.month_name,
            value: month.value,
            category: month.category,
        })
        .collect()
}

pub fn comparison_lines(dashboard: &DashboardMetrics, metric: YieldMetric) -> Result<Vec<MonthPoint>> {
    dashboard
        .comparison
        .iter()
        .map(|record| {
            Ok(MonthPoint {
                year: record.year,
                month: record.month,
                month_name: month_abbr(record.month)?,
                value: metric.value(record),
            })
        })
        .collect()
}

/// Chart payloads for all three metrics, in [`YieldMetric::ALL`] order.
pub fn dashboard_charts(dashboard: &DashboardMetrics) -> Result<Vec<MetricCharts>> {
    YieldMetric::ALL
        .iter()
        .map(|&metric| {
            Ok(MetricCharts {
                metric,
                unit: metric.unit(),
                trend: trend_series(dashboard, metric),
                monthly: monthly_bars(dashboard, metric),
                comparison: comparison_lines(dashboard, metric)?,
            })
        })
        .collect()
}
