use crate::error::{PalmError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// First year covered by the scenario projections.
pub const PROJECTION_FIRST_YEAR: i32 = 2025;
/// Last year covered by the scenario projections.
pub const PROJECTION_LAST_YEAR: i32 = 2100;

/// One of the four fixed Shared Socioeconomic Pathway projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Scenario {
    #[serde(rename = "SSP126")]
    Ssp126,
    #[serde(rename = "SSP245")]
    Ssp245,
    #[serde(rename = "SSP370")]
    Ssp370,
    #[serde(rename = "SSP585")]
    Ssp585,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::Ssp126,
        Scenario::Ssp245,
        Scenario::Ssp370,
        Scenario::Ssp585,
    ];

    /// Display identifier, e.g. "SSP126".
    pub fn id(&self) -> &'static str {
        match self {
            Scenario::Ssp126 => "SSP126",
            Scenario::Ssp245 => "SSP245",
            Scenario::Ssp370 => "SSP370",
            Scenario::Ssp585 => "SSP585",
        }
    }

    /// Lowercase tag used for file names and storage keys, e.g. "ssp126".
    pub fn tag(&self) -> &'static str {
        match self {
            Scenario::Ssp126 => "ssp126",
            Scenario::Ssp245 => "ssp245",
            Scenario::Ssp370 => "ssp370",
            Scenario::Ssp585 => "ssp585",
        }
    }

    /// Reject years outside the projection horizon.
    pub fn validate_year(year: i32) -> Result<()> {
        PalmError::check_range(
            "year",
            i64::from(year),
            i64::from(PROJECTION_FIRST_YEAR),
            i64::from(PROJECTION_LAST_YEAR),
        )
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Scenario {
    type Err = PalmError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| PalmError::InvalidScenario(s.to_string()))
    }
}

/// Where a climate row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClimateSource {
    Historical,
    Projection(Scenario),
}

impl ClimateSource {
    /// Storage key: "historical" or the scenario tag.
    pub fn tag(&self) -> &'static str {
        match self {
            ClimateSource::Historical => "historical",
            ClimateSource::Projection(scenario) => scenario.tag(),
        }
    }

    pub fn from_tag(tag: &str) -> Result<Self> {
        if tag == "historical" {
            Ok(ClimateSource::Historical)
        } else {
            tag.parse().map(ClimateSource::Projection)
        }
    }
}

impl fmt::Display for ClimateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClimateSource::Historical => f.write_str("historical"),
            ClimateSource::Projection(scenario) => write!(f, "{scenario}"),
        }
    }
}
