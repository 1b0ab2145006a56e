//! Harvest category classification.
//!
//! Each month of a year is labelled against that year's mean and maximum
//! for one metric. The maximum and the per-month values are read from the
//! same raw record field, so the peak comparison can use exact equality and
//! every year with finite values gets at least one `PeakHarvest`.

use crate::metric::YieldMetric;
use palm_core::month::month_abbr;
use palm_core::{PalmError, Result, YieldRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HarvestCategory {
    #[serde(rename = "Below Average")]
    BelowAverage,
    #[serde(rename = "Above Average")]
    AboveAverage,
    #[serde(rename = "Peak Harvest")]
    PeakHarvest,
}

impl HarvestCategory {
    pub fn label(&self) -> &'static str {
        match self {
            HarvestCategory::BelowAverage => "Below Average",
            HarvestCategory::AboveAverage => "Above Average",
            HarvestCategory::PeakHarvest => "Peak Harvest",
        }
    }
}

impl fmt::Display for HarvestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Label one value against its year's mean and maximum.
///
/// Peak uses exact float equality on purpose: `max_of_year` must come from
/// the same untransformed values being classified.
pub fn classify(value: f64, mean_of_year: f64, max_of_year: f64) -> HarvestCategory {
    if value == max_of_year {
        HarvestCategory::PeakHarvest
    } else if value < mean_of_year {
        HarvestCategory::BelowAverage
    } else {
        HarvestCategory::AboveAverage
    }
}

/// A classified month for one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyCategory {
    pub year: i32,
    pub month: u32,
    pub month_name: &'static str,
    pub metric: YieldMetric,
    pub value: f64,
    pub category: HarvestCategory,
}

/// Mean and maximum of one metric over a year's monthly records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub metric: YieldMetric,
    pub mean: f64,
    pub max: f64,
}

/// Mean and max for `metric` across the records of `year`.
pub fn summarize_year(
    records: &[YieldRecord],
    year: i32,
    metric: YieldMetric,
) -> Result<MonthlySummary> {
    let values: Vec<f64> = records
        .iter()
        .filter(|record| record.year == year)
        .map(|record| metric.value(record))
        .collect();
    if values.is_empty() {
        return Err(PalmError::MissingYear(year));
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Ok(MonthlySummary { metric, mean, max })
}

/// Classify every month of `year` for one metric, in month order.
pub fn classify_year(
    records: &[YieldRecord],
    year: i32,
    metric: YieldMetric,
) -> Result<Vec<MonthlyCategory>> {
    let summary = summarize_year(records, year, metric)?;
    let mut months: Vec<&YieldRecord> = records.iter().filter(|r| r.year == year).collect();
    months.sort_by_key(|record| record.month);
    months
        .into_iter()
        .map(|record| {
            let value = metric.value(record);
            Ok(MonthlyCategory {
                year,
                month: record.month,
                month_name: month_abbr(record.month)?,
                metric,
                value,
                category: classify(value, summary.mean, summary.max),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(year: i32, month: u32, ffb: f64) -> YieldRecord {
        YieldRecord {
            year,
            month,
            ffb_yield: ffb,
            cpo_yield: ffb * 0.2,
            ffb_production: ffb * 1_000_000.0,
        }
    }

    #[test]
    fn test_classify_rules() {
        assert_eq!(classify(5.0, 3.0, 5.0), HarvestCategory::PeakHarvest);
        assert_eq!(classify(2.0, 3.0, 5.0), HarvestCategory::BelowAverage);
        assert_eq!(classify(3.0, 3.0, 5.0), HarvestCategory::AboveAverage);
        assert_eq!(classify(4.0, 3.0, 5.0), HarvestCategory::AboveAverage);
    }

    #[test]
    fn test_classify_year_has_a_peak() {
        let records: Vec<YieldRecord> = [1.1, 1.3, 0.9, 1.7, 1.25, 1.0]
            .iter()
            .enumerate()
            .map(|(i, &v)| month(2023, i as u32 + 1, v))
            .collect();
        let months = classify_year(&records, 2023, YieldMetric::FfbYield).unwrap();
        assert_eq!(months.len(), 6);
        let peaks: Vec<u32> = months
            .iter()
            .filter(|m| m.category == HarvestCategory::PeakHarvest)
            .map(|m| m.month)
            .collect();
        assert_eq!(peaks, vec![4]);
        // mean is ~1.21: Jan (1.1), Mar (0.9), Jun (1.0) sit below it
        assert_eq!(months[0].category, HarvestCategory::BelowAverage);
        assert_eq!(months[4].category, HarvestCategory::AboveAverage);
        assert_eq!(months[3].month_name, "Apr");
    }

    #[test]
    fn test_classify_year_ties_at_max_are_all_peak() {
        let records = vec![
            month(2022, 1, 2.0),
            month(2022, 2, 1.0),
            month(2022, 3, 2.0),
        ];
        let months = classify_year(&records, 2022, YieldMetric::FfbYield).unwrap();
        assert_eq!(months[0].category, HarvestCategory::PeakHarvest);
        assert_eq!(months[1].category, HarvestCategory::BelowAverage);
        assert_eq!(months[2].category, HarvestCategory::PeakHarvest);
    }

    #[test]
    fn test_classify_year_constant_series_is_all_peak() {
        let records: Vec<YieldRecord> = (1..=12).map(|m| month(2021, m, 0.1)).collect();
        for metric in YieldMetric::ALL {
            let months = classify_year(&records, 2021, metric).unwrap();
            assert!(months
                .iter()
                .all(|m| m.category == HarvestCategory::PeakHarvest));
        }
    }

    #[test]
    fn test_classify_year_ignores_other_years() {
        let records = vec![month(2021, 1, 9.0), month(2022, 1, 1.0), month(2022, 2, 2.0)];
        let months = classify_year(&records, 2022, YieldMetric::FfbYield).unwrap();
        assert_eq!(months.len(), 2);
        assert_eq!(months[1].category, HarvestCategory::PeakHarvest);
    }

    #[test]
    fn test_classify_year_missing_year() {
        let records = vec![month(2021, 1, 9.0)];
        assert!(matches!(
            classify_year(&records, 2020, YieldMetric::CpoYield),
            Err(PalmError::MissingYear(2020))
        ));
    }

    #[test]
    fn test_category_serializes_as_label() {
        let json = serde_json::to_string(&HarvestCategory::PeakHarvest).unwrap();
        assert_eq!(json, "\"Peak Harvest\"");
    }
}
