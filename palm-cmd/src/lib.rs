//! Command implementations for the palm yield CLI.
//!
//! Provides subcommands for the yearly dashboard, FFB/CPO yield prediction,
//! AI insight generation and listing the loaded climate scenarios.

use clap::Subcommand;

pub mod config;
pub mod dashboard;
pub mod data;
pub mod insight;
pub mod predict;
pub mod scenarios;

use config::{DataArgs, ExtensionArgs, InsightArgs};
use predict::PredictCommand;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Yearly metrics, harvest categories and chart data for one year
    Dashboard {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        extension: ExtensionArgs,

        /// Selected year (defaults to the latest year with yield data)
        #[arg(short, long)]
        year: Option<i32>,

        /// Print metrics and chart payloads as JSON
        #[arg(long)]
        json: bool,
    },

    /// Predict FFB and CPO yield
    #[command(subcommand)]
    Predict(PredictCommand),

    /// Generate a natural-language summary of the dashboard
    Insight {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        extension: ExtensionArgs,

        #[command(flatten)]
        insight: InsightArgs,

        #[arg(short, long)]
        year: Option<i32>,
    },

    /// List loaded climate sources with their year coverage
    Scenarios {
        #[command(flatten)]
        data: DataArgs,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Dashboard {
            data,
            extension,
            year,
            json,
        } => dashboard::run_dashboard(&data, extension, year, json),
        Command::Predict(predict) => predict::run_predict(predict),
        Command::Insight {
            data,
            extension,
            insight,
            year,
        } => insight::run_insight(&data, extension, &insight, year).await,
        Command::Scenarios { data } => scenarios::run_scenarios(&data),
    }
}
