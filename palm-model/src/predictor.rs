use crate::features::{assemble, ClimateInputs, FeatureVector};
use crate::model::{Outlook, Regressor, YieldModel, YieldTarget};
use palm_core::{PalmError, ProjectionLookup, Result};
use serde::Serialize;
use std::path::Path;

/// One target's prediction together with the row it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub target: YieldTarget,
    pub value: f64,
    pub outlook: Outlook,
    pub features: FeatureVector,
}

/// The FFB and CPO yield models used by the prediction tool.
///
/// The two models may be trained on different schemas; each gets a row
/// assembled for its own schema from the same inputs.
#[derive(Debug, Clone)]
pub struct YieldPredictor {
    ffb: YieldModel,
    cpo: YieldModel,
}

impl YieldPredictor {
    pub fn new(ffb: YieldModel, cpo: YieldModel) -> Result<Self> {
        for (model, expected) in [(&ffb, YieldTarget::FfbYield), (&cpo, YieldTarget::CpoYield)] {
            if model.target != expected {
                return Err(PalmError::InvalidFormat(format!(
                    "expected a {} model, got {}",
                    expected, model.target
                )));
            }
        }
        Ok(Self { ffb, cpo })
    }

    pub fn load(ffb_path: &Path, cpo_path: &Path) -> Result<Self> {
        Self::new(YieldModel::load(ffb_path)?, YieldModel::load(cpo_path)?)
    }

    /// Predict both targets. Fails without predicting anything if either row
    /// cannot be assembled.
    pub fn predict(
        &self,
        inputs: &ClimateInputs,
        lookup: &dyn ProjectionLookup,
    ) -> Result<Vec<Prediction>> {
        let rows = [&self.ffb, &self.cpo]
            .into_iter()
            .map(|model| Ok((model, assemble(model.schema(), inputs, lookup)?)))
            .collect::<Result<Vec<_>>>()?;
        rows.into_iter()
            .map(|(model, features)| {
                let value = model.predict(&features)?;
                Ok(Prediction {
                    target: model.target,
                    value,
                    outlook: Outlook::for_prediction(model.target, value),
                    features,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::tests::{manual, projections};
    use crate::features::{FeatureSchema, ScenarioKey};
    use crate::model::tests::linear_json;
    use palm_core::Scenario;

    fn predictor() -> YieldPredictor {
        let mut ffb = vec![0.0; 14];
        ffb[0] = 0.2;
        let mut cpo = vec![0.0; 8];
        cpo[6] = -0.01;
        YieldPredictor::new(
            YieldModel::from_json(&linear_json("ffb_yield", "schema_a", &ffb)).unwrap(),
            YieldModel::from_json(&linear_json("cpo_yield", "schema_b", &cpo)).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn predicts_both_targets_from_their_own_schema() {
        let predictions = predictor()
            .predict(&ClimateInputs::Manual(manual()), &projections())
            .unwrap();
        assert_eq!(predictions.len(), 2);

        let ffb = &predictions[0];
        assert_eq!(ffb.features.schema(), FeatureSchema::SchemaA);
        // 0.5 + 0.2 * 6
        assert!((ffb.value - 1.7).abs() < 1e-9);
        assert_eq!(ffb.outlook, Outlook::Favourable);

        let cpo = &predictions[1];
        assert_eq!(cpo.features.schema(), FeatureSchema::SchemaB);
        assert!(cpo.value > 0.3);
        assert_eq!(cpo.outlook, Outlook::Favourable);
    }

    #[test]
    fn scenario_row_missing_for_one_schema_fails_whole_request() {
        let inputs = ClimateInputs::Scenario(ScenarioKey {
            scenario: Scenario::Ssp370,
            year: 2030,
            month: 7,
        });
        // the fixture row has no spei12, which schema A needs
        assert!(matches!(
            predictor().predict(&inputs, &projections()),
            Err(PalmError::MissingColumn { .. })
        ));
    }

    #[test]
    fn rejects_swapped_models() {
        let ffb = YieldModel::from_json(&linear_json("ffb_yield", "schema_b", &[0.0; 8])).unwrap();
        let cpo = YieldModel::from_json(&linear_json("cpo_yield", "schema_b", &[0.0; 8])).unwrap();
        assert!(YieldPredictor::new(cpo, ffb).is_err());
    }
}
