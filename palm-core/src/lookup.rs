use crate::error::{PalmError, Result};
use crate::record::ClimateRecord;
use crate::scenario::Scenario;
use std::collections::HashMap;

/// Read-only access to the scenario projection tables.
///
/// Implementations return exactly one row per `(scenario, year, month)` or
/// fail with [`PalmError::RecordNotFound`].
pub trait ProjectionLookup {
    fn projection(&self, scenario: Scenario, year: i32, month: u32) -> Result<ClimateRecord>;
}

/// Projection rows held in memory, keyed by scenario and `(year, month)`.
#[derive(Debug, Clone, Default)]
pub struct ProjectionTable {
    rows: HashMap<(Scenario, i32, u32), ClimateRecord>,
}

impl ProjectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scenario's rows. A repeated key keeps the last row seen.
    pub fn insert(&mut self, scenario: Scenario, records: impl IntoIterator<Item = ClimateRecord>) {
        for record in records {
            self.rows
                .insert((scenario, record.year, record.month), record);
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl ProjectionLookup for ProjectionTable {
    fn projection(&self, scenario: Scenario, year: i32, month: u32) -> Result<ClimateRecord> {
        self.rows
            .get(&(scenario, year, month))
            .cloned()
            .ok_or_else(|| PalmError::RecordNotFound {
                scenario: scenario.id().to_string(),
                year,
                month,
            })
    }
}
