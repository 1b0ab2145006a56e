//! Serialized dashboard snapshot handed to the insight summarizer.
//!
//! The summarizer takes one row of four text columns. Each column holds a
//! JSON document so the summarizer sees labelled numbers rather than a
//! debug dump.

use crate::dashboard::DashboardMetrics;
use crate::metric::YieldMetric;
use palm_core::Result;
use serde::Serialize;
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsightSnapshot {
    pub key_metrics: String,
    pub trends: String,
    pub monthly: String,
    pub climate: String,
}

/// Capture the computed dashboard metrics as the four snapshot columns.
pub fn snapshot(dashboard: &DashboardMetrics) -> Result<InsightSnapshot> {
    let mut key_metrics = Map::new();
    for change in &dashboard.key_metrics {
        key_metrics.insert(
            change.metric.label().to_string(),
            json!({
                "Latest Year": change.latest,
                "Previous Year": change.previous,
                "Change (%)": change.change_pct,
            }),
        );
    }

    let mut trends = Map::new();
    let mut monthly = Map::new();
    for metric in YieldMetric::ALL {
        let yearly: Vec<Value> = dashboard
            .yearly
            .iter()
            .map(|aggregate| json!({ "Year": aggregate.year, metric.column(): metric.total(aggregate) }))
            .collect();
        trends.insert(metric.label().to_string(), Value::Array(yearly));

        let months: Vec<Value> = dashboard
            .categories(metric)
            .map(|month| {
                json!({
                    "Month": month.month_name,
                    metric.column(): month.value,
                    "Category": month.category,
                })
            })
            .collect();
        monthly.insert(metric.label().to_string(), Value::Array(months));
    }

    let climate: Vec<Value> = dashboard
        .climate
        .iter()
        .map(|row| {
            json!({
                "Year": row.year,
                "Month": row.month_name,
                "pr": row.pr,
                "tas": row.tas,
                "tasmin": row.tasmin,
                "tasmax": row.tasmax,
                "hurs": row.hurs,
            })
        })
        .collect();

    Ok(InsightSnapshot {
        key_metrics: serde_json::to_string(&key_metrics)?,
        trends: serde_json::to_string(&trends)?,
        monthly: serde_json::to_string(&monthly)?,
        climate: serde_json::to_string(&climate)?,
    })
}
