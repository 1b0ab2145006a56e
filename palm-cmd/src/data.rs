//! Load-once access to the source tables.

use crate::config::{DataArgs, YIELD_TABLE};
use anyhow::Context;
use log::{info, warn};
use palm_core::{ClimateRecord, ClimateSource, Scenario};
use palm_data::merge_sources;
use palm_db::Database;

/// Load every table found under the data directory.
///
/// The yield table is required. Missing climate tables are skipped with a
/// warning; commands that need them fail later with a precise error.
pub fn load_database(args: &DataArgs) -> anyhow::Result<Database> {
    let db = Database::new()?;

    let yield_path = args.table_path(YIELD_TABLE).with_context(|| {
        format!(
            "{YIELD_TABLE}.csv not found in {}",
            args.data_dir.display()
        )
    })?;
    db.load_yield_file(&yield_path)?;

    let sources = std::iter::once(ClimateSource::Historical)
        .chain(Scenario::ALL.into_iter().map(ClimateSource::Projection));
    for source in sources {
        match args.table_path(&DataArgs::climate_stem(source)) {
            Some(path) => {
                db.load_climate_file(source, &path)?;
            }
            None => warn!(
                "No {} climate table in {}",
                source,
                args.data_dir.display()
            ),
        }
    }
    info!("Loaded tables from {}", args.data_dir.display());
    Ok(db)
}

/// Historical climate extended by one projection pathway; historical rows
/// win where both cover the same month.
pub fn dashboard_climate(db: &Database, extend_with: Scenario) -> anyhow::Result<Vec<ClimateRecord>> {
    let historical = db.query_climate_records(ClimateSource::Historical)?;
    let projection = db.query_climate_records(ClimateSource::Projection(extend_with))?;
    Ok(merge_sources(&historical, &projection))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::PathBuf;

    pub(crate) const YIELD_CSV: &str = "\
Year,Month,FFB_Yield,CPO_Yield,FFB_production
2022,1,1.30,0.27,1300000
2022,2,1.45,0.30,1450000
2023,1,1.20,0.25,1200000
2023,2,1.50,0.31,1500000
";

    pub(crate) const HISTORICAL_CSV: &str = "\
Year,Month,pr,tas,tasmin,tasmax,hurs
2023,1,310.2,26.4,23.0,30.1,86.5
2023,2,280.0,26.9,23.3,30.8,85.0
";

    pub(crate) const SSP126_CSV: &str = "\
Year,Month,pr,rolling_pr_3y,tas,tasmin,tasmax,tas_range,hurs
2023,2,999.0,8000.0,27.0,23.5,31.0,7.5,80.0
2025,1,250.0,8400.0,27.1,23.4,31.0,7.6,83.2
";

    /// A data directory with the yield table, historical climate and SSP126.
    pub(crate) fn data_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("palm-cmd-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("palm_oil.csv"), YIELD_CSV).unwrap();
        std::fs::write(dir.join("historical_climate.csv"), HISTORICAL_CSV).unwrap();
        std::fs::write(dir.join("ssp126_climate.csv"), SSP126_CSV).unwrap();
        dir
    }

    #[test]
    fn load_database_skips_missing_climate_tables() {
        let dir = data_dir("load");
        let db = load_database(&DataArgs {
            data_dir: dir.clone(),
        })
        .unwrap();
        assert_eq!(db.query_yield_records().unwrap().len(), 4);
        let coverage = db.query_coverage().unwrap();
        let sources: Vec<&str> = coverage.iter().map(|c| c.source.as_str()).collect();
        assert_eq!(sources, vec!["historical", "ssp126"]);
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn load_database_requires_yield_table() {
        let dir = std::env::temp_dir().join(format!("palm-cmd-empty-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let err = load_database(&DataArgs {
            data_dir: dir.clone(),
        })
        .unwrap_err();
        assert!(err.to_string().contains("palm_oil.csv not found"));
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn dashboard_climate_prefers_historical() {
        let dir = data_dir("merge");
        let db = load_database(&DataArgs {
            data_dir: dir.clone(),
        })
        .unwrap();
        let climate = dashboard_climate(&db, Scenario::Ssp126).unwrap();
        assert_eq!(climate.len(), 3);
        assert_eq!(climate[1].pr, 280.0);
        assert_eq!(climate[2].year, 2025);
        std::fs::remove_dir_all(dir).ok();
    }
}
