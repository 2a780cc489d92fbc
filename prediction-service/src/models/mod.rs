//! Pre-trained regression models and the store that loads them.

pub mod artifact;
pub mod store;

use consumption_client::domain::FeatureRow;

pub use artifact::{ArtifactError, ModelArtifact};
pub use store::ModelStore;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("feature schema mismatch for {model} model: expected {expected:?}, got {actual:?}")]
    SchemaMismatch {
        model: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },
    #[error("{0} model returned no output")]
    EmptyOutput(String),
    #[error("model evaluation failed: {0}")]
    Evaluation(String),
}

/// The only capability a model exposes: one output per input row.
pub trait Regressor: Send + Sync {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, ModelError>;
}

/// A regressor together with the feature columns it was trained on.
///
/// Rows are checked against the schema before they reach the regressor, so a
/// column order drift is reported instead of producing a wrong number.
pub struct LoadedModel {
    name: String,
    feature_names: Vec<String>,
    fingerprint: Option<String>,
    regressor: Box<dyn Regressor>,
}

impl LoadedModel {
    pub fn new(name: impl Into<String>, feature_names: Vec<String>, regressor: Box<dyn Regressor>) -> Self {
        Self {
            name: name.into(),
            feature_names,
            fingerprint: None,
            regressor,
        }
    }

    pub fn with_fingerprint(mut self, fingerprint: String) -> Self {
        self.fingerprint = Some(fingerprint);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// blake3 hex digest of the artifact file, when loaded from disk.
    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    pub fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, ModelError> {
        if let Some(bad) = rows.iter().find(|r| r.names() != self.feature_names.as_slice()) {
            return Err(ModelError::SchemaMismatch {
                model: self.name.clone(),
                expected: self.feature_names.clone(),
                actual: bad.names().to_vec(),
            });
        }
        self.regressor.predict(rows)
    }
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
            .field("name", &self.name)
            .field("feature_names", &self.feature_names)
            .field("fingerprint", &self.fingerprint)
            .finish_non_exhaustive()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use consumption_client::domain::{DailyFeatureVector, WeeklyFeatureVector};

    #[test]
    fn matching_schema_reaches_regressor() {
        let model = LoadedModel::new(
            "daily",
            names(&["Day", "Month", "Year", "Weekday"]),
            Box::new(ConstantRegressor(500.0)),
        );
        let row: FeatureRow = DailyFeatureVector {
            day: 13,
            month: 11,
            year: 2024,
            weekday: 2,
        }
        .into();
        assert_eq!(model.predict(&[row]).unwrap(), vec![500.0]);
    }

    #[test]
    fn mismatched_schema_is_reported() {
        let model = LoadedModel::new(
            "daily",
            names(&["Day", "Month", "Year", "Weekday"]),
            Box::new(ConstantRegressor(500.0)),
        );
        let row: FeatureRow = WeeklyFeatureVector {
            year: 2024,
            week_number: 45,
            weekday: 6,
        }
        .into();
        match model.predict(&[row]) {
            Err(ModelError::SchemaMismatch { model, actual, .. }) => {
                assert_eq!(model, "daily");
                assert_eq!(actual, names(&["Year", "Week", "Weekday"]));
            }
            other => panic!("expected schema mismatch, got {other:?}"),
        }
    }
}
