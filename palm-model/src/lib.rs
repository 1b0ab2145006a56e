//! Feature assembly and inference for the palm oil yield models.
//!
//! Inputs come either from manual values or from one scenario projection
//! row. They are assembled into the fixed-order row a model was trained on
//! and evaluated by the model loaded from its JSON model file.

pub mod features;
pub mod model;
pub mod predictor;

pub use features::{
    assemble, ClimateInputs, FeatureSchema, FeatureVector, ManualInputs, ScenarioKey,
};
pub use model::{Outlook, Regressor, YieldModel, YieldTarget};
pub use predictor::{Prediction, YieldPredictor};
