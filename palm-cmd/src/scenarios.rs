//! `scenarios` subcommand: list loaded climate sources and their coverage.

use crate::config::DataArgs;
use crate::data::load_database;
use palm_db::models::SourceCoverage;
use std::fmt::Write;

pub fn run_scenarios(data: &DataArgs) -> anyhow::Result<()> {
    let db = load_database(data)?;
    print!("{}", render_coverage(&db.query_coverage()?));
    Ok(())
}

pub fn render_coverage(coverage: &[SourceCoverage]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<12} {:>6} {:>6} {:>6}", "source", "rows", "first", "last");
    for source in coverage {
        let _ = writeln!(
            out,
            "{:<12} {:>6} {:>6} {:>6}",
            source.source, source.rows, source.first_year, source.last_year
        );
    }
    out
}
