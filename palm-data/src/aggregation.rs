//! Yearly aggregation, year filtering and year-over-year change.
//!
//! Yearly totals are plain sums of the monthly records present for a year.
//! Years with partial coverage are summed as-is; missing months are never
//! interpolated and missing years are never defaulted to zero.

use crate::metric::YieldMetric;
use palm_core::{PalmError, Result, YearMonth, YieldRecord};
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// Maximum number of years shown in the trailing trend window.
pub const TRAILING_WINDOW_YEARS: i32 = 10;

/// Sum of monthly yield and production for one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearlyAggregate {
    pub year: i32,
    /// Number of monthly records that contributed to the sums.
    pub months: usize,
    pub ffb_yield: f64,
    pub cpo_yield: f64,
    pub ffb_production: f64,
}

impl YearlyAggregate {
    fn empty(year: i32) -> Self {
        Self {
            year,
            months: 0,
            ffb_yield: 0.0,
            cpo_yield: 0.0,
            ffb_production: 0.0,
        }
    }
}

/// Group monthly records by exact year and sum each field.
///
/// Fails with [`PalmError::EmptyInput`] when `records` is empty.
pub fn aggregate_yearly(records: &[YieldRecord]) -> Result<BTreeMap<i32, YearlyAggregate>> {
    if records.is_empty() {
        return Err(PalmError::EmptyInput("aggregate"));
    }
    let mut totals: BTreeMap<i32, YearlyAggregate> = BTreeMap::new();
    for record in records {
        let entry = totals
            .entry(record.year)
            .or_insert_with(|| YearlyAggregate::empty(record.year));
        entry.months += 1;
        entry.ffb_yield += record.ffb_yield;
        entry.cpo_yield += record.cpo_yield;
        entry.ffb_production += record.ffb_production;
    }
    log::debug!(
        "[Palm Debug] aggregation: {} records into {} years",
        records.len(),
        totals.len()
    );
    Ok(totals)
}

/// Keep records with `year <= max_year`.
pub fn filter_up_to<R: YearMonth + Clone>(records: &[R], max_year: i32) -> Vec<R> {
    records
        .iter()
        .filter(|record| record.year() <= max_year)
        .cloned()
        .collect()
}

/// Keep records whose year falls inside `years`.
pub fn filter_years<R: YearMonth + Clone>(records: &[R], years: &RangeInclusive<i32>) -> Vec<R> {
    records
        .iter()
        .filter(|record| years.contains(&record.year()))
        .cloned()
        .collect()
}

/// Earliest year present, if any.
pub fn min_year<R: YearMonth>(records: &[R]) -> Option<i32> {
    records.iter().map(YearMonth::year).min()
}

/// Latest year present, if any.
pub fn max_year<R: YearMonth>(records: &[R]) -> Option<i32> {
    records.iter().map(YearMonth::year).max()
}

/// At most [`TRAILING_WINDOW_YEARS`] years ending at `selected_year`,
/// clipped to the first year available.
pub fn trailing_window(selected_year: i32, min_year_in_data: i32) -> RangeInclusive<i32> {
    let start = (selected_year - (TRAILING_WINDOW_YEARS - 1)).max(min_year_in_data);
    start..=selected_year
}

/// The comparison year for change percentages.
pub fn previous_year(selected_year: i32) -> i32 {
    selected_year - 1
}

/// Look up a year's aggregate, failing when the year is absent.
pub fn year_total(
    totals: &BTreeMap<i32, YearlyAggregate>,
    year: i32,
) -> Result<&YearlyAggregate> {
    totals.get(&year).ok_or(PalmError::MissingYear(year))
}

/// `(latest - previous) / previous * 100`.
///
/// A zero base is an error rather than an infinite or NaN change.
pub fn percent_change(label: &str, latest: f64, previous: f64) -> Result<f64> {
    if previous == 0.0 {
        return Err(PalmError::DivisionByZero {
            metric: label.to_string(),
        });
    }
    Ok((latest - previous) / previous * 100.0)
}

/// Latest vs previous yearly total for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearChange {
    pub metric: YieldMetric,
    pub latest_year: i32,
    pub previous_year: i32,
    pub latest: f64,
    pub previous: f64,
    pub delta: f64,
    pub change_pct: f64,
}

/// Compare `selected_year` with `selected_year - 1` for one metric.
pub fn year_over_year(
    totals: &BTreeMap<i32, YearlyAggregate>,
    metric: YieldMetric,
    selected_year: i32,
) -> Result<YearChange> {
    let prev_year = previous_year(selected_year);
    let latest = metric.total(year_total(totals, selected_year)?);
    let previous = metric.total(year_total(totals, prev_year)?);
    Ok(YearChange {
        metric,
        latest_year: selected_year,
        previous_year: prev_year,
        latest,
        previous,
        delta: latest - previous,
        change_pct: percent_change(metric.label(), latest, previous)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: i32, month: u32, ffb: f64) -> YieldRecord {
        YieldRecord {
            year,
            month,
            ffb_yield: ffb,
            cpo_yield: ffb / 5.0,
            ffb_production: ffb * 1000.0,
        }
    }

    fn yearly_ffb(values: &[(i32, f64)]) -> Vec<YieldRecord> {
        values
            .iter()
            .map(|&(year, ffb)| record(year, 1, ffb))
            .collect()
    }

    #[test]
    fn aggregate_sums_only_matching_year() {
        let records = vec![
            record(2020, 1, 1.0),
            record(2020, 2, 2.5),
            record(2021, 1, 4.0),
            record(2020, 3, 0.5),
        ];
        let totals = aggregate_yearly(&records).unwrap();
        assert_eq!(totals.len(), 2);

        let manual: f64 = records
            .iter()
            .filter(|r| r.year == 2020)
            .map(|r| r.ffb_yield)
            .sum();
        assert_eq!(totals[&2020].ffb_yield, manual);
        assert_eq!(totals[&2020].months, 3);
        assert_eq!(totals[&2021].ffb_yield, 4.0);
        assert_eq!(totals[&2021].months, 1);
    }

    #[test]
    fn aggregate_keeps_gaps() {
        let records = vec![record(2018, 1, 1.0), record(2020, 1, 1.0)];
        let totals = aggregate_yearly(&records).unwrap();
        assert_eq!(totals.keys().copied().collect::<Vec<_>>(), vec![2018, 2020]);
        assert!(matches!(
            year_total(&totals, 2019),
            Err(PalmError::MissingYear(2019))
        ));
    }

    #[test]
    fn aggregate_rejects_empty_input() {
        assert!(matches!(
            aggregate_yearly(&[]),
            Err(PalmError::EmptyInput(_))
        ));
    }

    #[test]
    fn filter_up_to_is_inclusive() {
        let records = vec![record(2021, 12, 1.0), record(2022, 1, 1.0), record(2023, 1, 1.0)];
        let filtered = filter_up_to(&records, 2022);
        assert_eq!(filtered.len(), 2);
        assert_eq!(max_year(&filtered), Some(2022));
    }

    #[test]
    fn filter_up_to_is_idempotent() {
        let records: Vec<YieldRecord> = (2015..=2024)
            .flat_map(|year| (1..=12).map(move |month| record(year, month, 1.0)))
            .collect();
        let once = filter_up_to(&records, 2019);
        let twice = filter_up_to(&once, 2019);
        assert_eq!(once, twice);
    }

    #[test]
    fn trailing_window_is_clipped_to_data() {
        assert_eq!(trailing_window(2023, 2000), 2014..=2023);
        assert_eq!(trailing_window(2005, 2000), 2000..=2005);
        assert_eq!(trailing_window(2000, 2000), 2000..=2000);
    }

    #[test]
    fn percent_change_zero_base_is_an_error() {
        let err = percent_change("FFB Yield", 3.0, 0.0).unwrap_err();
        assert!(matches!(err, PalmError::DivisionByZero { ref metric } if metric == "FFB Yield"));
    }

    #[test]
    fn year_over_year_example() {
        let records = yearly_ffb(&[(2020, 10.0), (2021, 12.0), (2022, 9.0)]);
        let totals = aggregate_yearly(&records).unwrap();
        let change = year_over_year(&totals, YieldMetric::FfbYield, 2022).unwrap();
        assert_eq!(change.previous_year, 2021);
        assert_eq!(change.latest, 9.0);
        assert_eq!(change.previous, 12.0);
        assert_eq!(change.delta, -3.0);
        assert!((change.change_pct - (-25.0)).abs() < 1e-9);
    }

    #[test]
    fn year_over_year_missing_previous_year() {
        let records = yearly_ffb(&[(2019, 10.0), (2021, 12.0)]);
        let totals = aggregate_yearly(&records).unwrap();
        assert!(matches!(
            year_over_year(&totals, YieldMetric::FfbYield, 2021),
            Err(PalmError::MissingYear(2020))
        ));
    }
}
