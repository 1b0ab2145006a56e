//! CSV data loading functions for populating the in-memory SQLite database.
//!
//! Each loader parses CSV text into typed records first and then inserts
//! them. A file with two rows for the same `(year, month)` is rejected
//! before anything is inserted. Loading a second file replaces rows with
//! the same key.
//!
//! # CSV Formats
//!
//! - **Yield** (has headers): `Year,Month,FFB_Yield,CPO_Yield,FFB_production`
//! - **Climate** (has headers): `Year,Month,pr,tas,tasmin,tasmax,hurs` plus any of
//!   `tas_range,spei12,cdd,cwd,prpercnt,rolling_pr_1y,rolling_pr_2y,rolling_pr_3y`

use crate::Database;
use anyhow::Context;
use flate2::read::GzDecoder;
use palm_core::{ClimateRecord, ClimateSource, YieldRecord};
use rusqlite::params;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read a CSV file into memory, gunzipping it when the name ends in `.gz`.
pub fn read_table(path: &Path) -> anyhow::Result<String> {
    let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let mut text = String::new();
    if path.extension().is_some_and(|ext| ext == "gz") {
        GzDecoder::new(file)
            .read_to_string(&mut text)
            .with_context(|| format!("Cannot decompress {}", path.display()))?;
    } else {
        let mut file = file;
        file.read_to_string(&mut text)
            .with_context(|| format!("Cannot read {}", path.display()))?;
    }
    Ok(text)
}

impl Database {
    /// Load monthly yield records from a CSV string.
    ///
    /// # Example CSV
    /// ```text
    /// Year,Month,FFB_Yield,CPO_Yield,FFB_production
    /// 2023,1,1.2,0.25,1200000
    /// ```
    ///
    /// Returns the number of rows inserted.
    pub fn load_yield(&self, csv_data: &str) -> anyhow::Result<usize> {
        let records = YieldRecord::parse_csv(csv_data)?;
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "INSERT OR REPLACE INTO yield_records (year, month, ffb_yield, cpo_yield, ffb_production)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for r in &records {
            stmt.execute(params![r.year, r.month, r.ffb_yield, r.cpo_yield, r.ffb_production])?;
        }
        log::info!("[Palm Debug] loader: Loaded {} yield records", records.len());
        Ok(records.len())
    }

    /// Load climate rows for one source from a CSV string.
    ///
    /// Optional columns that are absent or empty are stored as NULL.
    pub fn load_climate(&self, source: ClimateSource, csv_data: &str) -> anyhow::Result<usize> {
        let records = ClimateRecord::parse_csv(csv_data)?;
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "INSERT OR REPLACE INTO climate_records
             (source, year, month, pr, tas, tasmin, tasmax, hurs, tas_range,
              spei12, cdd, cwd, prpercnt, rolling_pr_1y, rolling_pr_2y, rolling_pr_3y)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        )?;
        let tag = source.tag();
        for r in &records {
            stmt.execute(params![
                tag,
                r.year,
                r.month,
                r.pr,
                r.tas,
                r.tasmin,
                r.tasmax,
                r.hurs,
                r.tas_range,
                r.spei12,
                r.cdd,
                r.cwd,
                r.prpercnt,
                r.rolling_pr_1y,
                r.rolling_pr_2y,
                r.rolling_pr_3y,
            ])?;
        }
        log::info!(
            "[Palm Debug] loader: Loaded {} {} climate records",
            records.len(),
            tag
        );
        Ok(records.len())
    }

    pub fn load_yield_file(&self, path: &Path) -> anyhow::Result<usize> {
        let text = read_table(path)?;
        self.load_yield(&text)
            .with_context(|| format!("Invalid yield data in {}", path.display()))
    }

    pub fn load_climate_file(&self, source: ClimateSource, path: &Path) -> anyhow::Result<usize> {
        let text = read_table(path)?;
        self.load_climate(source, &text)
            .with_context(|| format!("Invalid {} climate data in {}", source, path.display()))
    }
}
