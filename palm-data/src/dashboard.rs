//! Dashboard metrics for a selected year.
//!
//! Everything the dashboard shows is computed here from the loaded
//! records: the trailing yearly trend, the year-over-year key metrics, the
//! current year's classified months, the two-year month comparison and
//! the climate features for the same window.

use crate::aggregation::{
    aggregate_yearly, filter_up_to, previous_year, trailing_window, year_over_year, YearChange,
    YearlyAggregate,
};
use crate::category::{classify_year, summarize_year, MonthlyCategory, MonthlySummary};
use crate::climate::{derive_features, ClimateFeatures};
use crate::metric::YieldMetric;
use palm_core::{ClimateRecord, PalmError, Result, YieldRecord};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardMetrics {
    /// The year the dashboard was asked for.
    pub selected_year: i32,
    /// Most recent year with records at or before `selected_year`.
    pub latest_year: i32,
    pub previous_year: i32,
    /// First year of the trailing trend window.
    pub first_year: i32,
    /// Yearly totals for `first_year..=latest_year`.
    pub yearly: Vec<YearlyAggregate>,
    /// One entry per metric, latest vs previous year.
    pub key_metrics: Vec<YearChange>,
    /// Mean and max of the latest year's months, per metric.
    pub monthly_summary: Vec<MonthlySummary>,
    /// Latest year's months, classified for every metric.
    pub current_year: Vec<MonthlyCategory>,
    /// Monthly records for the previous and latest year.
    pub comparison: Vec<YieldRecord>,
    /// Climate features for the trailing window.
    pub climate: Vec<ClimateFeatures>,
}

impl DashboardMetrics {
    pub fn key_metric(&self, metric: YieldMetric) -> Option<&YearChange> {
        self.key_metrics.iter().find(|change| change.metric == metric)
    }

    pub fn summary(&self, metric: YieldMetric) -> Option<&MonthlySummary> {
        self.monthly_summary
            .iter()
            .find(|summary| summary.metric == metric)
    }

    /// Classified months of the latest year for one metric.
    pub fn categories(&self, metric: YieldMetric) -> impl Iterator<Item = &MonthlyCategory> {
        self.current_year
            .iter()
            .filter(move |month| month.metric == metric)
    }
}

/// Compute the dashboard for `selected_year`.
///
/// Records after `selected_year` are ignored and the latest remaining year
/// becomes the current year, so a selected year inside a data gap shows the
/// year before the gap. No records at or before `selected_year` is
/// [`PalmError::MissingYear`] for the selected year; a missing year before
/// the latest one is [`PalmError::MissingYear`] for that previous year.
pub fn build_dashboard(
    yields: &[YieldRecord],
    climate: &[ClimateRecord],
    selected_year: i32,
) -> Result<DashboardMetrics> {
    let filtered = filter_up_to(yields, selected_year);
    if filtered.is_empty() {
        return Err(PalmError::MissingYear(selected_year));
    }
    let totals = aggregate_yearly(&filtered)?;

    let (first_available, latest_year) = match (totals.keys().next(), totals.keys().next_back()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return Err(PalmError::MissingYear(selected_year)),
    };
    let window = trailing_window(latest_year, first_available);
    let prev_year = previous_year(latest_year);

    let key_metrics = YieldMetric::ALL
        .iter()
        .map(|&metric| year_over_year(&totals, metric, latest_year))
        .collect::<Result<Vec<_>>>()?;

    let yearly: Vec<YearlyAggregate> = totals
        .range(window.clone())
        .map(|(_, aggregate)| *aggregate)
        .collect();

    let mut monthly_summary = Vec::with_capacity(YieldMetric::ALL.len());
    let mut current_year = Vec::new();
    for metric in YieldMetric::ALL {
        monthly_summary.push(summarize_year(&filtered, latest_year, metric)?);
        current_year.extend(classify_year(&filtered, latest_year, metric)?);
    }

    let mut comparison: Vec<YieldRecord> = filtered
        .iter()
        .filter(|record| record.year >= prev_year)
        .copied()
        .collect();
    comparison.sort_by_key(|record| (record.year, record.month));

    // Derive over the full series so rolling sums see the months before
    // the window starts.
    let climate: Vec<ClimateFeatures> = derive_features(climate)?
        .into_iter()
        .filter(|features| window.contains(&features.year))
        .collect();

    log::info!(
        "[Palm Debug] dashboard: selected {} latest {} window {}..={} ({} yearly, {} climate rows)",
        selected_year,
        latest_year,
        window.start(),
        window.end(),
        yearly.len(),
        climate.len()
    );

    Ok(DashboardMetrics {
        selected_year,
        latest_year,
        previous_year: prev_year,
        first_year: *window.start(),
        yearly,
        key_metrics,
        monthly_summary,
        current_year,
        comparison,
        climate,
    })
}
