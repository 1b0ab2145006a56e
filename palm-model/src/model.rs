//! Pre-trained yield models loaded from JSON model files.
//!
//! A model file names its target, the feature schema it was trained on and
//! the fitted estimator. Training happens elsewhere; this module only
//! validates the file against its schema and evaluates it.
//!
//! # Model file format
//!
//! ```json
//! {
//!   "target": "ffb_yield",
//!   "schema": "schema_b",
//!   "estimator": { "kind": "linear", "intercept": 0.41, "coefficients": [0.01, 0.002, ...] }
//! }
//! ```
//!
//! Tree ensembles use `"kind": "tree_ensemble"` with an `aggregation` of
//! `mean` (random forest) or `sum` (boosting, offset by `base_score`) and a
//! list of trees. Each tree is a flat node list rooted at index 0; a split
//! sends a row left when `value <= threshold`.

use crate::features::{FeatureSchema, FeatureVector};
use palm_core::{PalmError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Anything that turns one feature vector into one prediction.
pub trait Regressor {
    /// Schema the regressor was trained on.
    fn schema(&self) -> FeatureSchema;

    fn predict(&self, features: &FeatureVector) -> Result<f64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YieldTarget {
    FfbYield,
    CpoYield,
}

impl YieldTarget {
    pub fn label(&self) -> &'static str {
        match self {
            YieldTarget::FfbYield => "FFB Yield",
            YieldTarget::CpoYield => "CPO Yield",
        }
    }

    /// Predictions strictly above this value (tonnes/ha) are favourable.
    pub fn favourable_threshold(&self) -> f64 {
        match self {
            YieldTarget::FfbYield => 1.40,
            YieldTarget::CpoYield => 0.30,
        }
    }
}

impl fmt::Display for YieldTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outlook {
    Favourable,
    Unfavourable,
}

impl Outlook {
    pub fn for_prediction(target: YieldTarget, value: f64) -> Self {
        if value > target.favourable_threshold() {
            Outlook::Favourable
        } else {
            Outlook::Unfavourable
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    Mean,
    Sum,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    /// Children must come after their parent, so evaluation always ends.
    fn validate(&self, width: usize) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("empty tree".to_string());
        }
        for (index, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                left,
                right,
                ..
            } = *node
            {
                if feature >= width {
                    return Err(format!("node {index} splits on feature {feature}"));
                }
                for child in [left, right] {
                    if child <= index || child >= self.nodes.len() {
                        return Err(format!("node {index} has invalid child {child}"));
                    }
                }
            }
        }
        Ok(())
    }

    fn evaluate(&self, row: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes[index] {
                TreeNode::Leaf { value } => return value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[feature] <= threshold { left } else { right };
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    Linear {
        intercept: f64,
        coefficients: Vec<f64>,
    },
    TreeEnsemble {
        aggregation: Aggregation,
        #[serde(default)]
        base_score: f64,
        trees: Vec<Tree>,
    },
}

impl Estimator {
    fn validate(&self, width: usize) -> std::result::Result<(), String> {
        match self {
            Estimator::Linear { coefficients, .. } => {
                if coefficients.len() != width {
                    return Err(format!("{} coefficients", coefficients.len()));
                }
            }
            Estimator::TreeEnsemble { trees, .. } => {
                if trees.is_empty() {
                    return Err("no trees".to_string());
                }
                for (i, tree) in trees.iter().enumerate() {
                    tree.validate(width).map_err(|e| format!("tree {i}: {e}"))?;
                }
            }
        }
        Ok(())
    }

    fn evaluate(&self, row: &[f64]) -> f64 {
        match self {
            Estimator::Linear {
                intercept,
                coefficients,
            } => {
                intercept
                    + coefficients
                        .iter()
                        .zip(row)
                        .map(|(c, x)| c * x)
                        .sum::<f64>()
            }
            Estimator::TreeEnsemble {
                aggregation,
                base_score,
                trees,
            } => {
                let total: f64 = trees.iter().map(|tree| tree.evaluate(row)).sum();
                match aggregation {
                    Aggregation::Mean => total / trees.len() as f64,
                    Aggregation::Sum => base_score + total,
                }
            }
        }
    }
}

/// A validated model for one target, bound to one feature schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldModel {
    pub target: YieldTarget,
    pub schema: FeatureSchema,
    pub estimator: Estimator,
}

impl YieldModel {
    /// Parse and validate a model document.
    ///
    /// The estimator's shape must fit the declared schema, otherwise
    /// [`PalmError::SchemaMismatch`] is returned.
    pub fn from_json(json: &str) -> Result<Self> {
        let model: YieldModel = serde_json::from_str(json)?;
        model
            .estimator
            .validate(model.schema.width())
            .map_err(|found| PalmError::SchemaMismatch {
                expected: model.schema.to_string(),
                found,
            })?;
        Ok(model)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let model = Self::from_json(&text)?;
        log::info!(
            "[Palm Debug] model: loaded {} model ({}) from {}",
            model.target,
            model.schema,
            path.display()
        );
        Ok(model)
    }
}

impl Regressor for YieldModel {
    fn schema(&self) -> FeatureSchema {
        self.schema
    }

    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        let values = features.values();
        if features.schema() != self.schema || values.len() != self.schema.width() {
            return Err(PalmError::SchemaMismatch {
                expected: self.schema.to_string(),
                found: format!("{} with {} values", features.schema(), values.len()),
            });
        }
        Ok(self.estimator.evaluate(&values))
    }
}
