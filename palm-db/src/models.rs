//! Query result model structs that are not plain source records.

use serde::Serialize;

/// Row count and year span of one loaded climate source.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SourceCoverage {
    /// `historical` or a lowercase scenario tag (e.g. `ssp370`).
    pub source: String,
    pub rows: usize,
    pub first_year: i32,
    pub last_year: i32,
}
