//! SQL schema definitions for the in-memory SQLite database.
//!
//! The schema is applied as a single batch when the database is initialized.

/// Returns the full SQL schema as a single batch string.
///
/// This creates the following tables:
///
/// - `yield_records` - Monthly FFB/CPO yield and FFB production, one row per (year, month)
/// - `climate_records` - Monthly climate rows, one row per (source, year, month), where
///   `source` is `historical` or a lowercase scenario tag such as `ssp245`
///
/// Derived climate columns are nullable because not every file version carries them.
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS yield_records (
        year INTEGER NOT NULL,
        month INTEGER NOT NULL,
        ffb_yield REAL NOT NULL,
        cpo_yield REAL NOT NULL,
        ffb_production REAL NOT NULL,
        PRIMARY KEY (year, month)
    );

    CREATE TABLE IF NOT EXISTS climate_records (
        source TEXT NOT NULL,
        year INTEGER NOT NULL,
        month INTEGER NOT NULL,
        pr REAL NOT NULL,
        tas REAL NOT NULL,
        tasmin REAL NOT NULL,
        tasmax REAL NOT NULL,
        hurs REAL NOT NULL,
        tas_range REAL,
        spei12 REAL,
        cdd REAL,
        cwd REAL,
        prpercnt REAL,
        rolling_pr_1y REAL,
        rolling_pr_2y REAL,
        rolling_pr_3y REAL,
        PRIMARY KEY (source, year, month)
    );
    CREATE INDEX IF NOT EXISTS idx_climate_source ON climate_records(source);
    "#
}
