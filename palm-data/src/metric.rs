use crate::aggregation::YearlyAggregate;
use palm_core::YieldRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three tracked yield measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum YieldMetric {
    #[serde(rename = "FFB Yield")]
    FfbYield,
    #[serde(rename = "CPO Yield")]
    CpoYield,
    #[serde(rename = "FFB Production")]
    FfbProduction,
}

impl YieldMetric {
    pub const ALL: [YieldMetric; 3] = [
        YieldMetric::FfbYield,
        YieldMetric::CpoYield,
        YieldMetric::FfbProduction,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            YieldMetric::FfbYield => "FFB Yield",
            YieldMetric::CpoYield => "CPO Yield",
            YieldMetric::FfbProduction => "FFB Production",
        }
    }

    /// Source CSV column name.
    pub fn column(&self) -> &'static str {
        match self {
            YieldMetric::FfbYield => "FFB_Yield",
            YieldMetric::CpoYield => "CPO_Yield",
            YieldMetric::FfbProduction => "FFB_production",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            YieldMetric::FfbYield | YieldMetric::CpoYield => "tonnes/ha",
            YieldMetric::FfbProduction => "tonnes",
        }
    }

    /// Raw monthly value, read straight from the record field.
    pub fn value(&self, record: &YieldRecord) -> f64 {
        match self {
            YieldMetric::FfbYield => record.ffb_yield,
            YieldMetric::CpoYield => record.cpo_yield,
            YieldMetric::FfbProduction => record.ffb_production,
        }
    }

    /// Yearly total for this metric.
    pub fn total(&self, aggregate: &YearlyAggregate) -> f64 {
        match self {
            YieldMetric::FfbYield => aggregate.ffb_yield,
            YieldMetric::CpoYield => aggregate.cpo_yield,
            YieldMetric::FfbProduction => aggregate.ffb_production,
        }
    }
}

impl fmt::Display for YieldMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
