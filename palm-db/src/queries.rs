//! Typed query methods for retrieving yield and climate data.
//!
//! Queries return `palm_core` records ordered by `(year, month)`, so callers
//! can hand them straight to aggregation and feature derivation.

use crate::models::SourceCoverage;
use crate::Database;
use palm_core::{ClimateRecord, ClimateSource, PalmError, ProjectionLookup, Scenario, YieldRecord};
use rusqlite::{params, OptionalExtension, Row};

const CLIMATE_COLUMNS: &str = "year, month, pr, tas, tasmin, tasmax, hurs, tas_range, \
     spei12, cdd, cwd, prpercnt, rolling_pr_1y, rolling_pr_2y, rolling_pr_3y";

fn climate_from_row(row: &Row<'_>) -> rusqlite::Result<ClimateRecord> {
    Ok(ClimateRecord {
        year: row.get(0)?,
        month: row.get(1)?,
        pr: row.get(2)?,
        tas: row.get(3)?,
        tasmin: row.get(4)?,
        tasmax: row.get(5)?,
        hurs: row.get(6)?,
        tas_range: row.get(7)?,
        spei12: row.get(8)?,
        cdd: row.get(9)?,
        cwd: row.get(10)?,
        prpercnt: row.get(11)?,
        rolling_pr_1y: row.get(12)?,
        rolling_pr_2y: row.get(13)?,
        rolling_pr_3y: row.get(14)?,
    })
}

impl Database {
    /// Get every monthly yield record, ordered chronologically.
    pub fn query_yield_records(&self) -> anyhow::Result<Vec<YieldRecord>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT year, month, ffb_yield, cpo_yield, ffb_production
             FROM yield_records
             ORDER BY year, month",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(YieldRecord {
                    year: row.get(0)?,
                    month: row.get(1)?,
                    ffb_yield: row.get(2)?,
                    cpo_yield: row.get(3)?,
                    ffb_production: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "[Palm Debug] query: query_yield_records returned {} records",
            rows.len()
        );
        Ok(rows)
    }

    /// Distinct years with at least one yield record, ascending.
    pub fn query_yield_years(&self) -> anyhow::Result<Vec<i32>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare("SELECT DISTINCT year FROM yield_records ORDER BY year")?;
        let years = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<i32>, _>>()?;
        Ok(years)
    }

    /// Get all climate rows of one source, ordered chronologically.
    pub fn query_climate_records(&self, source: ClimateSource) -> anyhow::Result<Vec<ClimateRecord>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(&format!(
            "SELECT {CLIMATE_COLUMNS} FROM climate_records
             WHERE source = ?1
             ORDER BY year, month"
        ))?;
        let rows = stmt
            .query_map(params![source.tag()], climate_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "[Palm Debug] query: query_climate_records({}) returned {} records",
            source,
            rows.len()
        );
        Ok(rows)
    }

    /// Get the single projection row for `(scenario, year, month)`, if loaded.
    pub fn query_projection(
        &self,
        scenario: Scenario,
        year: i32,
        month: u32,
    ) -> anyhow::Result<Option<ClimateRecord>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(&format!(
            "SELECT {CLIMATE_COLUMNS} FROM climate_records
             WHERE source = ?1 AND year = ?2 AND month = ?3"
        ))?;
        let row = stmt
            .query_row(params![scenario.tag(), year, month], climate_from_row)
            .optional()?;
        log::debug!(
            "[Palm Debug] query: query_projection({}, {}, {}) found={}",
            scenario,
            year,
            month,
            row.is_some()
        );
        Ok(row)
    }

    /// Per-source row count and year span, ordered by source tag.
    pub fn query_coverage(&self) -> anyhow::Result<Vec<SourceCoverage>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT source, COUNT(*), MIN(year), MAX(year)
             FROM climate_records
             GROUP BY source
             ORDER BY source",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(SourceCoverage {
                    source: row.get(0)?,
                    rows: row.get::<_, i64>(1)? as usize,
                    first_year: row.get(2)?,
                    last_year: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "[Palm Debug] query: query_coverage returned {} sources",
            rows.len()
        );
        Ok(rows)
    }
}

impl ProjectionLookup for Database {
    fn projection(&self, scenario: Scenario, year: i32, month: u32) -> palm_core::Result<ClimateRecord> {
        self.query_projection(scenario, year, month)
            .map_err(|e| PalmError::Storage(e.to_string()))?
            .ok_or_else(|| PalmError::RecordNotFound {
                scenario: scenario.id().to_string(),
                year,
                month,
            })
    }
}
