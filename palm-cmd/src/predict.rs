//! `predict` subcommands: FFB and CPO yield from manual or projected climate.

use crate::config::{DataArgs, ModelArgs};
use anyhow::Context;
use clap::{Args, Subcommand};
use palm_core::{ClimateSource, ProjectionTable, Scenario};
use palm_db::Database;
use palm_model::{ClimateInputs, ManualInputs, Prediction, ScenarioKey, YieldPredictor};

/// Spread applied around the mean temperature when min/max are not given (°C).
pub const DEFAULT_TEMPERATURE_SPREAD: f64 = 1.6;

#[derive(Subcommand, Debug)]
pub enum PredictCommand {
    /// Predict from manually entered climate values
    Manual {
        #[command(flatten)]
        models: ModelArgs,

        #[command(flatten)]
        inputs: ManualArgs,

        /// Print predictions and feature rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// Predict from one month of a climate projection
    Scenario {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        models: ModelArgs,

        /// SSP126, SSP245, SSP370 or SSP585
        #[arg(short, long, default_value = "SSP126")]
        scenario: Scenario,

        /// Projection year (2025-2100)
        #[arg(short, long)]
        year: i32,

        #[arg(short, long)]
        month: u32,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ManualArgs {
    /// Month of harvest (1-12)
    #[arg(long, default_value_t = 1)]
    pub month: u32,

    /// Monthly precipitation (mm)
    #[arg(long, default_value_t = 100.0)]
    pub precipitation: f64,

    /// Mean temperature (°C)
    #[arg(long, default_value_t = 25.0)]
    pub temperature: f64,

    /// Minimum temperature (°C), defaults to temperature - 1.6
    #[arg(long)]
    pub min_temp: Option<f64>,

    /// Maximum temperature (°C), defaults to temperature + 1.6
    #[arg(long)]
    pub max_temp: Option<f64>,

    /// Relative humidity (%)
    #[arg(long, default_value_t = 80.0)]
    pub humidity: f64,

    /// SPEI-12 drought index
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub drought_index: f64,

    #[arg(long, default_value_t = 0.0)]
    pub dry_days: f64,

    #[arg(long, default_value_t = 0.0)]
    pub wet_days: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub precip_percent_change: f64,
}

impl ManualArgs {
    pub fn to_inputs(&self) -> ManualInputs {
        ManualInputs {
            month: self.month,
            precipitation: self.precipitation,
            temperature: self.temperature,
            min_temp: self
                .min_temp
                .unwrap_or(self.temperature - DEFAULT_TEMPERATURE_SPREAD),
            max_temp: self
                .max_temp
                .unwrap_or(self.temperature + DEFAULT_TEMPERATURE_SPREAD),
            humidity: self.humidity,
            drought_index: self.drought_index,
            dry_days: self.dry_days,
            wet_days: self.wet_days,
            precip_percent_change: self.precip_percent_change,
        }
    }
}

pub fn run_predict(command: PredictCommand) -> anyhow::Result<()> {
    match command {
        PredictCommand::Manual {
            models,
            inputs,
            json,
        } => {
            let predictor = load_predictor(&models)?;
            let predictions = predictor.predict(
                &ClimateInputs::Manual(inputs.to_inputs()),
                &ProjectionTable::new(),
            )?;
            print_predictions(&predictions, json)
        }
        PredictCommand::Scenario {
            data,
            models,
            scenario,
            year,
            month,
            json,
        } => {
            let predictor = load_predictor(&models)?;
            let db = load_projection(&data, scenario)?;
            let key = ScenarioKey {
                scenario,
                year,
                month,
            };
            let predictions = predictor.predict(&ClimateInputs::Scenario(key), &db)?;
            print_predictions(&predictions, json)
        }
    }
}

fn load_predictor(models: &ModelArgs) -> anyhow::Result<YieldPredictor> {
    YieldPredictor::load(&models.ffb_model, &models.cpo_model).with_context(|| {
        format!(
            "Cannot load models {} and {}",
            models.ffb_model.display(),
            models.cpo_model.display()
        )
    })
}

/// Database holding only the selected pathway's projection table.
pub fn load_projection(data: &DataArgs, scenario: Scenario) -> anyhow::Result<Database> {
    let source = ClimateSource::Projection(scenario);
    let stem = DataArgs::climate_stem(source);
    let path = data
        .table_path(&stem)
        .with_context(|| format!("{stem}.csv not found in {}", data.data_dir.display()))?;
    let db = Database::new()?;
    db.load_climate_file(source, &path)?;
    Ok(db)
}

fn print_predictions(predictions: &[Prediction], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(predictions)?);
        return Ok(());
    }
    for prediction in predictions {
        println!(
            "{}: {:.3} tonnes/ha ({:?})",
            prediction.target, prediction.value, prediction.outlook
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::data_dir;
    use palm_core::{PalmError, ProjectionLookup};

    fn manual_args() -> ManualArgs {
        ManualArgs {
            month: 3,
            precipitation: 120.0,
            temperature: 26.0,
            min_temp: None,
            max_temp: None,
            humidity: 85.0,
            drought_index: 0.0,
            dry_days: 0.0,
            wet_days: 0.0,
            precip_percent_change: 0.0,
        }
    }

    #[test]
    fn manual_temperatures_default_around_mean() {
        let inputs = manual_args().to_inputs();
        assert!((inputs.min_temp - 24.4).abs() < 1e-9);
        assert!((inputs.max_temp - 27.6).abs() < 1e-9);
    }

    #[test]
    fn manual_temperatures_can_be_overridden() {
        let mut args = manual_args();
        args.min_temp = Some(22.0);
        let inputs = args.to_inputs();
        assert_eq!(inputs.min_temp, 22.0);
        assert!((inputs.max_temp - 27.6).abs() < 1e-9);
    }

    #[test]
    fn load_projection_reads_only_that_pathway() {
        let dir = data_dir("projection");
        let data = DataArgs {
            data_dir: dir.clone(),
        };
        let db = load_projection(&data, Scenario::Ssp126).unwrap();
        assert_eq!(db.projection(Scenario::Ssp126, 2025, 1).unwrap().pr, 250.0);
        assert!(matches!(
            db.projection(Scenario::Ssp126, 2025, 2),
            Err(PalmError::RecordNotFound { .. })
        ));
        assert!(load_projection(&data, Scenario::Ssp585).is_err());
        std::fs::remove_dir_all(dir).ok();
    }
}
