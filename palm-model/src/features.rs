//! Feature-vector assembly for the yield models.
//!
//! Two column layouts are in use. Schema A is the full climate row; schema B
//! is the compact layout the shipped models were trained on. Column order is
//! defined once per schema below and every caller goes through it.

use palm_core::month::validate_month;
use palm_core::{ClimateRecord, PalmError, ProjectionLookup, Result, Scenario};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SCHEMA_A_COLUMNS: [&str; 14] = [
    "Month",
    "pr",
    "tas",
    "tasmin",
    "tasmax",
    "tas_range",
    "hurs",
    "spei12",
    "cdd",
    "cwd",
    "prpercnt",
    "rolling_pr_1y",
    "rolling_pr_2y",
    "rolling_pr_3y",
];

pub const SCHEMA_B_COLUMNS: [&str; 8] = [
    "Month",
    "pr",
    "rolling_pr_3y",
    "tas",
    "tasmin",
    "tasmax",
    "tas_range",
    "hurs",
];

/// Months of precipitation in each manual-mode rolling proxy.
const MANUAL_ROLLING_FACTORS: [f64; 3] = [12.0, 24.0, 36.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSchema {
    SchemaA,
    SchemaB,
}

impl FeatureSchema {
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            FeatureSchema::SchemaA => &SCHEMA_A_COLUMNS,
            FeatureSchema::SchemaB => &SCHEMA_B_COLUMNS,
        }
    }

    pub fn width(&self) -> usize {
        self.columns().len()
    }
}

impl fmt::Display for FeatureSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureSchema::SchemaA => write!(f, "schema_a ({} columns)", self.width()),
            FeatureSchema::SchemaB => write!(f, "schema_b ({} columns)", self.width()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SchemaAFeatures {
    pub month: f64,
    pub pr: f64,
    pub tas: f64,
    pub tasmin: f64,
    pub tasmax: f64,
    pub tas_range: f64,
    pub hurs: f64,
    pub spei12: f64,
    pub cdd: f64,
    pub cwd: f64,
    pub prpercnt: f64,
    pub rolling_pr_1y: f64,
    pub rolling_pr_2y: f64,
    pub rolling_pr_3y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SchemaBFeatures {
    pub month: f64,
    pub pr: f64,
    pub rolling_pr_3y: f64,
    pub tas: f64,
    pub tasmin: f64,
    pub tasmax: f64,
    pub tas_range: f64,
    pub hurs: f64,
}

/// One model input row, tagged with the schema it was assembled for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "schema", rename_all = "snake_case")]
pub enum FeatureVector {
    SchemaA(SchemaAFeatures),
    SchemaB(SchemaBFeatures),
}

impl FeatureVector {
    pub fn schema(&self) -> FeatureSchema {
        match self {
            FeatureVector::SchemaA(_) => FeatureSchema::SchemaA,
            FeatureVector::SchemaB(_) => FeatureSchema::SchemaB,
        }
    }

    /// Field behind a schema column, by column name.
    pub fn value_of(&self, column: &str) -> Option<f64> {
        let value = match (self, column) {
            (_, "Month") => self.month(),
            (FeatureVector::SchemaA(f), name) => match name {
                "pr" => f.pr,
                "tas" => f.tas,
                "tasmin" => f.tasmin,
                "tasmax" => f.tasmax,
                "tas_range" => f.tas_range,
                "hurs" => f.hurs,
                "spei12" => f.spei12,
                "cdd" => f.cdd,
                "cwd" => f.cwd,
                "prpercnt" => f.prpercnt,
                "rolling_pr_1y" => f.rolling_pr_1y,
                "rolling_pr_2y" => f.rolling_pr_2y,
                "rolling_pr_3y" => f.rolling_pr_3y,
                _ => return None,
            },
            (FeatureVector::SchemaB(f), name) => match name {
                "pr" => f.pr,
                "rolling_pr_3y" => f.rolling_pr_3y,
                "tas" => f.tas,
                "tasmin" => f.tasmin,
                "tasmax" => f.tasmax,
                "tas_range" => f.tas_range,
                "hurs" => f.hurs,
                _ => return None,
            },
        };
        Some(value)
    }

    fn month(&self) -> f64 {
        match self {
            FeatureVector::SchemaA(f) => f.month,
            FeatureVector::SchemaB(f) => f.month,
        }
    }

    /// `(column, value)` pairs in the schema's column order.
    pub fn named(&self) -> Vec<(&'static str, f64)> {
        self.schema()
            .columns()
            .iter()
            .filter_map(|&column| self.value_of(column).map(|value| (column, value)))
            .collect()
    }

    /// Values in the schema's column order.
    pub fn values(&self) -> Vec<f64> {
        self.named().into_iter().map(|(_, value)| value).collect()
    }
}

/// Slider-style inputs for one hypothetical month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManualInputs {
    pub month: u32,
    /// mm
    pub precipitation: f64,
    /// °C
    pub temperature: f64,
    pub min_temp: f64,
    pub max_temp: f64,
    /// %
    pub humidity: f64,
    pub drought_index: f64,
    pub dry_days: f64,
    pub wet_days: f64,
    pub precip_percent_change: f64,
}

/// Selects one projection row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioKey {
    pub scenario: Scenario,
    pub year: i32,
    pub month: u32,
}

impl ScenarioKey {
    pub fn validate(&self) -> Result<()> {
        Scenario::validate_year(self.year)?;
        validate_month(self.month)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClimateInputs {
    Manual(ManualInputs),
    Scenario(ScenarioKey),
}

impl ClimateInputs {
    pub fn month(&self) -> u32 {
        match self {
            ClimateInputs::Manual(inputs) => inputs.month,
            ClimateInputs::Scenario(key) => key.month,
        }
    }
}

/// Every field either schema can draw from. Optional fields are those a
/// projection file may not carry.
#[derive(Debug, Clone)]
struct FeatureRow {
    source: String,
    month: u32,
    pr: f64,
    tas: f64,
    tasmin: f64,
    tasmax: f64,
    tas_range: f64,
    hurs: f64,
    spei12: Option<f64>,
    cdd: Option<f64>,
    cwd: Option<f64>,
    prpercnt: Option<f64>,
    rolling_pr: [Option<f64>; 3],
}

impl FeatureRow {
    fn from_manual(inputs: &ManualInputs) -> Result<Self> {
        validate_month(inputs.month)?;
        // Linear proxy: one month's precipitation scaled up to 1/2/3 years.
        let rolling_pr = MANUAL_ROLLING_FACTORS.map(|factor| Some(inputs.precipitation * factor));
        Ok(Self {
            source: "manual".to_string(),
            month: inputs.month,
            pr: inputs.precipitation,
            tas: inputs.temperature,
            tasmin: inputs.min_temp,
            tasmax: inputs.max_temp,
            tas_range: inputs.max_temp - inputs.min_temp,
            hurs: inputs.humidity,
            spei12: Some(inputs.drought_index),
            cdd: Some(inputs.dry_days),
            cwd: Some(inputs.wet_days),
            prpercnt: Some(inputs.precip_percent_change),
            rolling_pr,
        })
    }

    fn from_projection(scenario: Scenario, record: &ClimateRecord) -> Self {
        Self {
            source: scenario.id().to_string(),
            month: record.month,
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
            rolling_pr: [
                record.rolling_pr_1y,
                record.rolling_pr_2y,
                record.rolling_pr_3y,
            ],
        }
    }

    fn require(&self, column: &'static str, value: Option<f64>) -> Result<f64> {
        value.ok_or_else(|| PalmError::MissingColumn {
            column,
            source_name: self.source.clone(),
        })
    }

    fn schema_a(&self) -> Result<SchemaAFeatures> {
        Ok(SchemaAFeatures {
            month: f64::from(self.month),
            pr: self.pr,
            tas: self.tas,
            tasmin: self.tasmin,
            tasmax: self.tasmax,
            tas_range: self.tas_range,
            hurs: self.hurs,
            spei12: self.require("spei12", self.spei12)?,
            cdd: self.require("cdd", self.cdd)?,
            cwd: self.require("cwd", self.cwd)?,
            prpercnt: self.require("prpercnt", self.prpercnt)?,
            rolling_pr_1y: self.require("rolling_pr_1y", self.rolling_pr[0])?,
            rolling_pr_2y: self.require("rolling_pr_2y", self.rolling_pr[1])?,
            rolling_pr_3y: self.require("rolling_pr_3y", self.rolling_pr[2])?,
        })
    }

    fn schema_b(&self) -> Result<SchemaBFeatures> {
        Ok(SchemaBFeatures {
            month: f64::from(self.month),
            pr: self.pr,
            rolling_pr_3y: self.require("rolling_pr_3y", self.rolling_pr[2])?,
            tas: self.tas,
            tasmin: self.tasmin,
            tasmax: self.tasmax,
            tas_range: self.tas_range,
            hurs: self.hurs,
        })
    }
}

/// Build the input row for `schema` from manual inputs or a scenario lookup.
///
/// Scenario selectors are range-checked before the lookup runs. Nothing is
/// defaulted: a projection row without a column the schema needs fails with
/// [`PalmError::MissingColumn`].
pub fn assemble(
    schema: FeatureSchema,
    inputs: &ClimateInputs,
    lookup: &dyn ProjectionLookup,
) -> Result<FeatureVector> {
    let row = match inputs {
        ClimateInputs::Manual(manual) => FeatureRow::from_manual(manual)?,
        ClimateInputs::Scenario(key) => {
            key.validate()?;
            let record = lookup.projection(key.scenario, key.year, key.month)?;
            FeatureRow::from_projection(key.scenario, &record)
        }
    };
    let vector = match schema {
        FeatureSchema::SchemaA => FeatureVector::SchemaA(row.schema_a()?),
        FeatureSchema::SchemaB => FeatureVector::SchemaB(row.schema_b()?),
    };
    log::debug!(
        "[Palm Debug] features: {} from {} -> {:?}",
        schema,
        row.source,
        vector.named()
    );
    Ok(vector)
}
