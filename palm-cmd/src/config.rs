//! Shared command-line arguments. Every path and credential can also be
//! supplied through the environment.

use clap::Args;
use palm_core::{ClimateSource, Scenario};
use std::path::PathBuf;

pub const YIELD_TABLE: &str = "palm_oil";

#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// Directory holding palm_oil.csv, historical_climate.csv and <scenario>_climate.csv (plain or .gz)
    #[arg(long, env = "PALM_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,
}

impl DataArgs {
    /// Path of a table, preferring `<stem>.csv` over `<stem>.csv.gz`.
    pub fn table_path(&self, stem: &str) -> Option<PathBuf> {
        [format!("{stem}.csv"), format!("{stem}.csv.gz")]
            .into_iter()
            .map(|name| self.data_dir.join(name))
            .find(|path| path.is_file())
    }

    pub fn climate_stem(source: ClimateSource) -> String {
        format!("{}_climate", source.tag())
    }
}

#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// FFB yield model file (JSON)
    #[arg(long, env = "PALM_FFB_MODEL", default_value = "models/ffb_yield.json")]
    pub ffb_model: PathBuf,

    /// CPO yield model file (JSON)
    #[arg(long, env = "PALM_CPO_MODEL", default_value = "models/cpo_yield.json")]
    pub cpo_model: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct InsightArgs {
    /// Base URL of the summarization service
    #[arg(long, env = "PALM_INSIGHT_ENDPOINT", default_value = "https://api.jamaibase.com")]
    pub endpoint: String,

    #[arg(long, env = "PALM_INSIGHT_PROJECT_ID")]
    pub project_id: Option<String>,

    #[arg(long, env = "PALM_INSIGHT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Action table that turns a snapshot row into insight text
    #[arg(long, default_value = "AI_insights1")]
    pub table_id: String,

    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

/// Projection pathway appended to the historical climate series.
#[derive(Args, Debug, Clone, Copy)]
pub struct ExtensionArgs {
    #[arg(long, default_value = "SSP126")]
    pub extend_with: Scenario,
}
