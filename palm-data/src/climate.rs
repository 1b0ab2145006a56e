//! Month-labelled climate features for charts and summaries.
//!
//! Drought and dryness indices pass through unchanged. Temperature range
//! and rolling precipitation sums are derived only when the source row does
//! not already carry them.

use palm_core::month::month_abbr;
use palm_core::{ClimateRecord, Result, YearMonth};
use serde::Serialize;
use std::collections::BTreeMap;

/// Rolling precipitation windows, in months: 1, 2 and 3 years.
pub const ROLLING_WINDOWS: [usize; 3] = [12, 24, 36];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimateFeatures {
    pub year: i32,
    pub month: u32,
    pub month_name: &'static str,
    pub pr: f64,
    pub tas: f64,
    pub tasmin: f64,
    pub tasmax: f64,
    pub tas_range: f64,
    pub hurs: f64,
    pub spei12: Option<f64>,
    pub cdd: Option<f64>,
    pub cwd: Option<f64>,
    pub prpercnt: Option<f64>,
    pub rolling_pr_1y: Option<f64>,
    pub rolling_pr_2y: Option<f64>,
    pub rolling_pr_3y: Option<f64>,
}

/// Concatenate two climate series keyed by `(year, month)`.
///
/// Rows from `primary` win where both series cover the same month. The
/// result is in chronological order.
pub fn merge_sources(primary: &[ClimateRecord], extension: &[ClimateRecord]) -> Vec<ClimateRecord> {
    let mut merged: BTreeMap<(i32, u32), ClimateRecord> = BTreeMap::new();
    for record in extension.iter().chain(primary.iter()) {
        merged.insert(record.key(), record.clone());
    }
    merged.into_values().collect()
}

fn month_index(year: i32, month: u32) -> i64 {
    i64::from(year) * 12 + i64::from(month) - 1
}

/// Trailing precipitation sum over `window` months ending at `end`.
///
/// `series` must be sorted by key without duplicates. Returns `None` unless
/// all `window` consecutive months are present.
pub fn rolling_precipitation(series: &[ClimateRecord], end: usize, window: usize) -> Option<f64> {
    if window == 0 || end >= series.len() || end + 1 < window {
        return None;
    }
    let start = end + 1 - window;
    let first = &series[start];
    let last = &series[end];
    let span = month_index(last.year, last.month) - month_index(first.year, first.month);
    if span != window as i64 - 1 {
        return None;
    }
    Some(series[start..=end].iter().map(|record| record.pr).sum())
}

/// Derive month-labelled features for every row, in chronological order.
pub fn derive_features(records: &[ClimateRecord]) -> Result<Vec<ClimateFeatures>> {
    let series: Vec<ClimateRecord> = merge_sources(records, &[]);
    series
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let [one, two, three] =
                ROLLING_WINDOWS.map(|window| rolling_precipitation(&series, index, window));
            Ok(ClimateFeatures {
                year: record.year,
                month: record.month,
                month_name: month_abbr(record.month)?,
                pr: record.pr,
                tas: record.tas,
                tasmin: record.tasmin,
                tasmax: record.tasmax,
                tas_range: record.temperature_range(),
                hurs: record.hurs,
                spei12: record.spei12,
                cdd: record.cdd,
                cwd: record.cwd,
                prpercnt: record.prpercnt,
                rolling_pr_1y: record.rolling_pr_1y.or(one),
                rolling_pr_2y: record.rolling_pr_2y.or(two),
                rolling_pr_3y: record.rolling_pr_3y.or(three),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn climate(year: i32, month: u32, pr: f64) -> ClimateRecord {
        ClimateRecord {
            year,
            month,
            pr,
            tas: 27.0,
            tasmin: 23.0,
            tasmax: 31.0,
            hurs: 80.0,
            tas_range: None,
            spei12: Some(0.2),
            cdd: None,
            cwd: None,
            prpercnt: None,
            rolling_pr_1y: None,
            rolling_pr_2y: None,
            rolling_pr_3y: None,
        }
    }

    fn monthly_series(first_year: i32, months: usize, pr: f64) -> Vec<ClimateRecord> {
        (0..months)
            .map(|i| climate(first_year + (i / 12) as i32, (i % 12) as u32 + 1, pr))
            .collect()
    }

    #[test]
    fn merge_prefers_primary_rows() {
        let historical = vec![climate(2024, 12, 100.0), climate(2025, 1, 110.0)];
        let projection = vec![climate(2025, 1, 999.0), climate(2025, 2, 120.0)];
        let merged = merge_sources(&historical, &projection);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[1].key(), (2025, 1));
        assert_eq!(merged[1].pr, 110.0);
        assert_eq!(merged[2].pr, 120.0);
    }

    #[test]
    fn rolling_sum_needs_a_full_window() {
        let series = monthly_series(2020, 24, 10.0);
        assert_eq!(rolling_precipitation(&series, 10, 12), None);
        assert_eq!(rolling_precipitation(&series, 11, 12), Some(120.0));
        assert_eq!(rolling_precipitation(&series, 23, 24), Some(240.0));
        assert_eq!(rolling_precipitation(&series, 23, 36), None);
    }

    #[test]
    fn rolling_sum_does_not_bridge_gaps() {
        let mut series = monthly_series(2020, 13, 10.0);
        // drop June 2020
        series.remove(5);
        series.push(climate(2021, 2, 10.0));
        assert_eq!(rolling_precipitation(&series, series.len() - 1, 12), None);
    }

    #[test]
    fn derive_features_fills_only_missing_columns() {
        let mut series = monthly_series(2018, 36, 5.0);
        series[35].rolling_pr_1y = Some(1.0);
        series[35].tas_range = Some(6.5);
        let features = derive_features(&series).unwrap();
        let last = features.last().unwrap();
        assert_eq!(last.month_name, "Dec");
        assert_eq!(last.rolling_pr_1y, Some(1.0));
        assert_eq!(last.rolling_pr_2y, Some(120.0));
        assert_eq!(last.rolling_pr_3y, Some(180.0));
        assert_eq!(last.tas_range, 6.5);
        assert_eq!(features[0].tas_range, 8.0);
        assert_eq!(features[0].spei12, Some(0.2));
        assert_eq!(features[0].rolling_pr_1y, None);
    }
}
