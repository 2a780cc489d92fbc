//! On-disk model formats.
//!
//! Artifacts are JSON documents tagged by `kind`:
//!
//! ```json
//! {"kind": "linear", "feature_names": ["Year", "Week", "Weekday"],
//!  "intercept": 1200.0, "coefficients": [0.5, 3.0, -1.0]}
//! ```
//!
//! Tree ensembles store each tree as a flat node array rooted at index 0;
//! a split sends `x[feature] <= threshold` to `left`, everything else to
//! `right`.

use consumption_client::domain::FeatureRow;
use serde::Deserialize;

use super::{ModelError, Regressor};

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid model artifact: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
}

impl ModelArtifact {
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ArtifactError> {
        let artifact: ModelArtifact = serde_json::from_slice(bytes)?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn feature_names(&self) -> &[String] {
        match self {
            ModelArtifact::Linear(m) => &m.feature_names,
            ModelArtifact::TreeEnsemble(m) => &m.feature_names,
        }
    }

    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.feature_names().is_empty() {
            return Err(ArtifactError::Invalid("feature_names must not be empty".to_string()));
        }
        match self {
            ModelArtifact::Linear(m) => m.validate(),
            ModelArtifact::TreeEnsemble(m) => m.validate(),
        }
    }

    pub fn into_regressor(self) -> Box<dyn Regressor> {
        match self {
            ModelArtifact::Linear(m) => Box::new(m),
            ModelArtifact::TreeEnsemble(m) => Box::new(m),
        }
    }
}

/// Ordinary least squares fit, optionally trained on standardized inputs and
/// target.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    pub feature_names: Vec<String>,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    #[serde(default)]
    pub feature_means: Option<Vec<f64>>,
    #[serde(default)]
    pub feature_stds: Option<Vec<f64>>,
    #[serde(default)]
    pub target_mean: Option<f64>,
    #[serde(default)]
    pub target_std: Option<f64>,
}

impl LinearModel {
    fn validate(&self) -> Result<(), ArtifactError> {
        let n = self.feature_names.len();
        if self.coefficients.len() != n {
            return Err(ArtifactError::Invalid(format!(
                "linear model has {} coefficients for {n} features",
                self.coefficients.len()
            )));
        }
        for (name, v) in [("feature_means", &self.feature_means), ("feature_stds", &self.feature_stds)] {
            if let Some(v) = v {
                if v.len() != n {
                    return Err(ArtifactError::Invalid(format!("{name} has {} entries for {n} features", v.len())));
                }
            }
        }
        if self.feature_means.is_some() != self.feature_stds.is_some() {
            return Err(ArtifactError::Invalid(
                "feature_means and feature_stds must be given together".to_string(),
            ));
        }
        Ok(())
    }

    pub fn predict_row(&self, x_raw: &[f64]) -> f64 {
        let mut y = self.intercept;
        for (j, v_raw) in x_raw.iter().enumerate() {
            let x = match (&self.feature_means, &self.feature_stds) {
                (Some(means), Some(stds)) if stds[j] > 0.0 => (v_raw - means[j]) / stds[j],
                (Some(_), Some(_)) => 0.0,
                _ => *v_raw,
            };
            y += self.coefficients[j] * x;
        }
        self.target_mean.unwrap_or(0.0) + self.target_std.unwrap_or(1.0) * y
    }
}

impl Regressor for LinearModel {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, ModelError> {
        rows.iter()
            .map(|r| {
                if r.len() != self.coefficients.len() {
                    return Err(ModelError::Evaluation(format!(
                        "expected {} features, got {}",
                        self.coefficients.len(),
                        r.len()
                    )));
                }
                Ok(self.predict_row(r.values()))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Combine {
    /// Average of tree outputs (random forest).
    Mean,
    /// `base_score + learning_rate * sum` (gradient boosting).
    Sum,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
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

#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    fn validate(&self, n_features: usize) -> Result<(), ArtifactError> {
        if self.nodes.is_empty() {
            return Err(ArtifactError::Invalid("tree has no nodes".to_string()));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature, left, right, ..
            } = *node
            {
                if feature >= n_features {
                    return Err(ArtifactError::Invalid(format!(
                        "node {i} splits on feature {feature}, model has {n_features}"
                    )));
                }
                // Children after parents means every descent terminates.
                for child in [left, right] {
                    if child <= i || child >= self.nodes.len() {
                        return Err(ArtifactError::Invalid(format!("node {i} has invalid child {child}")));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn evaluate(&self, x: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                TreeNode::Leaf { value } => return value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[feature] <= threshold { left } else { right };
                }
            }
        }
    }
}

fn default_learning_rate() -> f64 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeEnsemble {
    pub feature_names: Vec<String>,
    pub combine: Combine,
    #[serde(default)]
    pub base_score: f64,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    pub trees: Vec<Tree>,
}

impl TreeEnsemble {
    fn validate(&self) -> Result<(), ArtifactError> {
        if self.trees.is_empty() {
            return Err(ArtifactError::Invalid("tree ensemble has no trees".to_string()));
        }
        self.trees
            .iter()
            .try_for_each(|t| t.validate(self.feature_names.len()))
    }

    pub fn predict_row(&self, x: &[f64]) -> f64 {
        let sum: f64 = self.trees.iter().map(|t| t.evaluate(x)).sum();
        match self.combine {
            Combine::Mean => sum / self.trees.len() as f64,
            Combine::Sum => self.base_score + self.learning_rate * sum,
        }
    }
}

impl Regressor for TreeEnsemble {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, ModelError> {
        rows.iter()
            .map(|r| {
                if r.len() != self.feature_names.len() {
                    return Err(ModelError::Evaluation(format!(
                        "expected {} features, got {}",
                        self.feature_names.len(),
                        r.len()
                    )));
                }
                Ok(self.predict_row(r.values()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consumption_client::domain::WeeklyFeatureVector;

    fn weekly_row(week: u8) -> FeatureRow {
        WeeklyFeatureVector {
            year: 2024,
            week_number: week,
            weekday: 6,
        }
        .into()
    }

    #[test]
    fn linear_artifact_predicts_dot_product() {
        let json = br#"{
            "kind": "linear",
            "feature_names": ["Year", "Week", "Weekday"],
            "intercept": 100.0,
            "coefficients": [0.0, 10.0, 1.0]
        }"#;
        let artifact = ModelArtifact::from_json_slice(json).unwrap();
        let model = artifact.into_regressor();
        assert_eq!(model.predict(&[weekly_row(45)]).unwrap(), vec![556.0]);
    }

    #[test]
    fn linear_artifact_applies_standardization() {
        let model = LinearModel {
            feature_names: vec!["x".to_string()],
            intercept: 0.5,
            coefficients: vec![2.0],
            feature_means: Some(vec![10.0]),
            feature_stds: Some(vec![5.0]),
            target_mean: Some(1000.0),
            target_std: Some(100.0),
        };
        // x_std = (20 - 10) / 5 = 2, y_std = 0.5 + 2 * 2 = 4.5.
        assert_eq!(model.predict_row(&[20.0]), 1450.0);
    }

    #[test]
    fn linear_artifact_rejects_coefficient_mismatch() {
        let json = br#"{"kind": "linear", "feature_names": ["a", "b"], "intercept": 0.0, "coefficients": [1.0]}"#;
        assert!(matches!(
            ModelArtifact::from_json_slice(json),
            Err(ArtifactError::Invalid(_))
        ));
    }

    #[test]
    fn unknown_kind_is_a_parse_error() {
        let json = br#"{"kind": "pickle", "feature_names": ["a"]}"#;
        assert!(matches!(
            ModelArtifact::from_json_slice(json),
            Err(ArtifactError::Parse(_))
        ));
    }

    fn stump(threshold: f64, low: f64, high: f64) -> serde_json::Value {
        serde_json::json!({
            "nodes": [
                {"type": "split", "feature": 1, "threshold": threshold, "left": 1, "right": 2},
                {"type": "leaf", "value": low},
                {"type": "leaf", "value": high}
            ]
        })
    }

    #[test]
    fn forest_averages_trees() {
        let json = serde_json::json!({
            "kind": "tree_ensemble",
            "feature_names": ["Year", "Week", "Weekday"],
            "combine": "mean",
            "trees": [stump(26.0, 100.0, 200.0), stump(40.0, 300.0, 500.0)]
        });
        let artifact = ModelArtifact::from_json_slice(json.to_string().as_bytes()).unwrap();
        let model = artifact.into_regressor();
        assert_eq!(model.predict(&[weekly_row(45)]).unwrap(), vec![350.0]);
        assert_eq!(model.predict(&[weekly_row(10)]).unwrap(), vec![200.0]);
    }

    #[test]
    fn boosted_trees_sum_with_base_score() {
        let json = serde_json::json!({
            "kind": "tree_ensemble",
            "feature_names": ["Year", "Week", "Weekday"],
            "combine": "sum",
            "base_score": 1000.0,
            "learning_rate": 0.5,
            "trees": [stump(26.0, 100.0, 200.0), stump(40.0, 300.0, 500.0)]
        });
        let artifact = ModelArtifact::from_json_slice(json.to_string().as_bytes()).unwrap();
        assert_eq!(artifact.into_regressor().predict(&[weekly_row(45)]).unwrap(), vec![1350.0]);
    }

    #[test]
    fn cyclic_tree_is_rejected() {
        let json = serde_json::json!({
            "kind": "tree_ensemble",
            "feature_names": ["x"],
            "combine": "mean",
            "trees": [{"nodes": [
                {"type": "split", "feature": 0, "threshold": 1.0, "left": 0, "right": 1},
                {"type": "leaf", "value": 1.0}
            ]}]
        });
        assert!(matches!(
            ModelArtifact::from_json_slice(json.to_string().as_bytes()),
            Err(ArtifactError::Invalid(_))
        ));
    }

    #[test]
    fn split_on_missing_feature_is_rejected() {
        let json = serde_json::json!({
            "kind": "tree_ensemble",
            "feature_names": ["x"],
            "combine": "mean",
            "trees": [stump(1.0, 0.0, 1.0)]
        });
        assert!(matches!(
            ModelArtifact::from_json_slice(json.to_string().as_bytes()),
            Err(ArtifactError::Invalid(_))
        ));
    }
}
