use crate::error::{PalmError, Result};
use crate::month::validate_month;
use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Anything keyed by a calendar `(year, month)` pair.
pub trait YearMonth {
    fn year(&self) -> i32;
    fn month(&self) -> u32;

    fn key(&self) -> (i32, u32) {
        (self.year(), self.month())
    }
}

/// Monthly palm oil yield and production for one `(year, month)`.
///
/// Column names follow the source CSV header (`Year,Month,FFB_Yield,...`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YieldRecord {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Month")]
    pub month: u32,
    /// Fresh fruit bunch yield, tonnes per hectare
    #[serde(rename = "FFB_Yield")]
    pub ffb_yield: f64,
    /// Crude palm oil yield, tonnes per hectare
    #[serde(rename = "CPO_Yield")]
    pub cpo_yield: f64,
    /// Fresh fruit bunch production, tonnes
    #[serde(rename = "FFB_production")]
    pub ffb_production: f64,
}

/// Monthly climate observation or projection for one `(year, month)`.
///
/// Only the core variables are required. Derived columns differ between
/// file versions, so they are optional and stay `None` when the column is
/// absent or empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateRecord {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Month")]
    pub month: u32,
    /// Precipitation (mm)
    pub pr: f64,
    /// Mean near-surface air temperature (°C)
    pub tas: f64,
    pub tasmin: f64,
    pub tasmax: f64,
    /// Relative humidity (%)
    pub hurs: f64,
    #[serde(default)]
    pub tas_range: Option<f64>,
    /// 12-month standardized precipitation-evapotranspiration index
    #[serde(default)]
    pub spei12: Option<f64>,
    /// Consecutive dry days
    #[serde(default)]
    pub cdd: Option<f64>,
    /// Consecutive wet days
    #[serde(default)]
    pub cwd: Option<f64>,
    /// Precipitation percent change
    #[serde(default)]
    pub prpercnt: Option<f64>,
    #[serde(default)]
    pub rolling_pr_1y: Option<f64>,
    #[serde(default)]
    pub rolling_pr_2y: Option<f64>,
    #[serde(default)]
    pub rolling_pr_3y: Option<f64>,
}

impl YearMonth for YieldRecord {
    fn year(&self) -> i32 {
        self.year
    }
    fn month(&self) -> u32 {
        self.month
    }
}

impl YearMonth for ClimateRecord {
    fn year(&self) -> i32 {
        self.year
    }
    fn month(&self) -> u32 {
        self.month
    }
}

impl YieldRecord {
    /// Parse a yield CSV (with headers) into records.
    ///
    /// Expected columns: `Year,Month,FFB_Yield,CPO_Yield,FFB_production`.
    /// Extra columns are ignored.
    pub fn parse_csv(csv_object: &str) -> Result<Vec<YieldRecord>> {
        parse_keyed_csv(csv_object)
    }
}

impl ClimateRecord {
    /// Parse a climate CSV (with headers) into records.
    ///
    /// Required columns: `Year,Month,pr,tas,tasmin,tasmax,hurs`. Any of
    /// `tas_range,spei12,cdd,cwd,prpercnt,rolling_pr_1y,rolling_pr_2y,rolling_pr_3y`
    /// may be missing.
    pub fn parse_csv(csv_object: &str) -> Result<Vec<ClimateRecord>> {
        parse_keyed_csv(csv_object)
    }

    /// Daily temperature spread, preferring the source column when present.
    pub fn temperature_range(&self) -> f64 {
        self.tas_range.unwrap_or(self.tasmax - self.tasmin)
    }
}

fn parse_keyed_csv<T>(csv_object: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned + YearMonth,
{
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(csv_object.as_bytes());
    let mut records = Vec::new();
    let mut seen = HashSet::new();
    for row in rdr.deserialize::<T>() {
        let record = row?;
        validate_month(record.month()).map_err(|_| {
            PalmError::InvalidFormat(format!(
                "month {} in row for year {}",
                record.month(),
                record.year()
            ))
        })?;
        if !seen.insert(record.key()) {
            return Err(PalmError::InvalidFormat(format!(
                "duplicate row for {}-{:02}",
                record.year(),
                record.month()
            )));
        }
        records.push(record);
    }
    log::debug!("[Palm Debug] parser: Parsed {} keyed rows", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yield_csv() {
        let csv_data = "\
Year,Month,FFB_Yield,CPO_Yield,FFB_production
2020,1,1.25,0.26,1520000
2020,2,1.10,0.23,1340000
";
        let records = YieldRecord::parse_csv(csv_data).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key(), (2020, 1));
        assert!((records[1].ffb_yield - 1.10).abs() < f64::EPSILON);
        assert!((records[0].ffb_production - 1_520_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_yield_csv_ignores_extra_columns() {
        let csv_data = "\
Year,Month,Month_Name,FFB_Yield,CPO_Yield,FFB_production
2021,3,Mar,1.3,0.27,1600000
";
        let records = YieldRecord::parse_csv(csv_data).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].month, 3);
    }

    #[test]
    fn test_parse_yield_csv_rejects_bad_month() {
        let csv_data = "\
Year,Month,FFB_Yield,CPO_Yield,FFB_production
2021,13,1.3,0.27,1600000
";
        assert!(matches!(
            YieldRecord::parse_csv(csv_data),
            Err(PalmError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_yield_csv_rejects_duplicate_month() {
        let csv_data = "\
Year,Month,FFB_Yield,CPO_Yield,FFB_production
2021,4,1.3,0.27,1600000
2021,5,1.4,0.28,1700000
2021,4,9.9,0.99,9900000
";
        match YieldRecord::parse_csv(csv_data) {
            Err(PalmError::InvalidFormat(msg)) => assert_eq!(msg, "duplicate row for 2021-04"),
            other => panic!("expected duplicate row error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_climate_csv_with_all_columns() {
        let csv_data = "\
Year,Month,pr,tas,tasmin,tasmax,hurs,spei12,cdd,cwd,prpercnt,rolling_pr_1y,rolling_pr_2y,rolling_pr_3y
2019,6,180.5,27.1,23.4,31.2,82.0,-0.4,6,9,3.5,2410.0,4890.0,7200.0
";
        let records = ClimateRecord::parse_csv(csv_data).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.spei12, Some(-0.4));
        assert_eq!(record.rolling_pr_3y, Some(7200.0));
        assert_eq!(record.tas_range, None);
        assert!((record.temperature_range() - 7.8).abs() < 1e-9);
    }

    #[test]
    fn test_parse_climate_csv_projection_subset() {
        // Projection files only carry the compact column set.
        let csv_data = "\
Year,Month,pr,rolling_pr_3y,tas,tasmin,tasmax,tas_range,hurs
2030,1,210.0,7105.5,26.4,24.8,28.0,3.2,84.1
";
        let records = ClimateRecord::parse_csv(csv_data).unwrap();
        let record = &records[0];
        assert_eq!(record.rolling_pr_1y, None);
        assert_eq!(record.spei12, None);
        assert_eq!(record.temperature_range(), 3.2);
    }

    #[test]
    fn test_parse_climate_csv_empty_optional_value() {
        let csv_data = "\
Year,Month,pr,tas,tasmin,tasmax,hurs,spei12
2019,7,90.0,27.5,24.0,31.0,80.0,
";
        let records = ClimateRecord::parse_csv(csv_data).unwrap();
        assert_eq!(records[0].spei12, None);
    }

    #[test]
    fn test_parse_climate_csv_missing_required_column() {
        let csv_data = "\
Year,Month,pr,tas
2019,7,90.0,27.5
";
        assert!(matches!(
            ClimateRecord::parse_csv(csv_data),
            Err(PalmError::CsvParse(_))
        ));
    }
}
