//! `dashboard` subcommand: yearly metrics, categories and chart payloads.

use crate::config::{DataArgs, ExtensionArgs};
use crate::data::{dashboard_climate, load_database};
use palm_data::{build_dashboard, dashboard_charts, DashboardMetrics, MetricCharts, YieldMetric};
use palm_db::Database;
use serde::Serialize;
use std::fmt::Write;

#[derive(Serialize)]
struct DashboardReport<'a> {
    metrics: &'a DashboardMetrics,
    charts: Vec<MetricCharts>,
}

/// Selected year, or the latest year with yield data.
pub fn resolve_year(db: &Database, year: Option<i32>) -> anyhow::Result<i32> {
    match year {
        Some(year) => Ok(year),
        None => db
            .query_yield_years()?
            .last()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("No yield records loaded")),
    }
}

pub fn compute(db: &Database, extension: ExtensionArgs, year: Option<i32>) -> anyhow::Result<DashboardMetrics> {
    let year = resolve_year(db, year)?;
    let yields = db.query_yield_records()?;
    let climate = dashboard_climate(db, extension.extend_with)?;
    Ok(build_dashboard(&yields, &climate, year)?)
}

pub fn run_dashboard(
    data: &DataArgs,
    extension: ExtensionArgs,
    year: Option<i32>,
    json: bool,
) -> anyhow::Result<()> {
    let db = load_database(data)?;
    let metrics = compute(&db, extension, year)?;
    if json {
        let report = DashboardReport {
            metrics: &metrics,
            charts: dashboard_charts(&metrics)?,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_summary(&metrics));
    }
    Ok(())
}

/// Plain-text summary of key metrics and the current year's categories.
pub fn render_summary(metrics: &DashboardMetrics) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Palm oil yield {} (trend from {})",
        metrics.latest_year, metrics.first_year
    );
    if metrics.selected_year != metrics.latest_year {
        let _ = writeln!(out, "  no records for {}, showing {}", metrics.selected_year, metrics.latest_year);
    }
    for change in &metrics.key_metrics {
        let _ = writeln!(
            out,
            "  {:<15} {:>14.2} {:<9} {:>+8.2}% vs {}",
            change.metric.label(),
            change.latest,
            change.metric.unit(),
            change.change_pct,
            change.previous_year
        );
    }
    for metric in YieldMetric::ALL {
        let _ = writeln!(out, "{} by month:", metric);
        if let Some(summary) = metrics.summary(metric) {
            let _ = writeln!(out, "  average {:.3}, peak {:.3}", summary.mean, summary.max);
        }
        for month in metrics.categories(metric) {
            let _ = writeln!(
                out,
                "  {} {:>14.3}  {}",
                month.month_name, month.value, month.category
            );
        }
    }
    out
}
