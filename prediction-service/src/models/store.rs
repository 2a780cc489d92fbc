use std::path::Path;

use consumption_client::domain::Mode;

use super::{ArtifactError, LoadedModel, ModelArtifact};

/// The daily and weekly models, loaded once and read-only afterwards.
#[derive(Debug)]
pub struct ModelStore {
    daily: LoadedModel,
    weekly: LoadedModel,
}

impl ModelStore {
    pub fn new(daily: LoadedModel, weekly: LoadedModel) -> Self {
        Self { daily, weekly }
    }

    /// Load both artifacts from disk. Either one failing is fatal.
    pub fn load(daily_path: &Path, weekly_path: &Path) -> Result<Self, ArtifactError> {
        let daily = load_model(Mode::Daily, daily_path)?;
        let weekly = load_model(Mode::Weekly, weekly_path)?;
        Ok(Self::new(daily, weekly))
    }

    pub fn get(&self, mode: Mode) -> &LoadedModel {
        match mode {
            Mode::Daily => &self.daily,
            Mode::Weekly => &self.weekly,
        }
    }
}

fn load_model(mode: Mode, path: &Path) -> Result<LoadedModel, ArtifactError> {
    let bytes = std::fs::read(path).map_err(|e| {
        ArtifactError::Io(std::io::Error::new(
            e.kind(),
            format!("{} model at {}: {e}", mode, path.display()),
        ))
    })?;
    let fingerprint = blake3::hash(&bytes).to_hex().to_string();
    let artifact = ModelArtifact::from_json_slice(&bytes)?;
    let feature_names = artifact.feature_names().to_vec();

    tracing::info!(
        mode = %mode,
        path = %path.display(),
        features = ?feature_names,
        blake3 = %fingerprint,
        "model loaded"
    );

    Ok(LoadedModel::new(mode.as_str(), feature_names, artifact.into_regressor()).with_fingerprint(fingerprint))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::testing::*;
    use std::path::PathBuf;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}-{name}", env!("CARGO_PKG_NAME"), std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn get_returns_model_for_mode() {
        let store = ModelStore::new(
            LoadedModel::new("daily", names(&["Day", "Month", "Year", "Weekday"]), Box::new(ConstantRegressor(1.0))),
            LoadedModel::new("weekly", names(&["Year", "Week", "Weekday"]), Box::new(ConstantRegressor(2.0))),
        );
        assert_eq!(store.get(Mode::Daily).name(), "daily");
        assert_eq!(store.get(Mode::Weekly).feature_names().len(), 3);
    }

    #[test]
    fn load_reads_both_artifacts_and_fingerprints_them() {
        let daily = write_temp(
            "daily.json",
            r#"{"kind": "linear", "feature_names": ["Day", "Month", "Year", "Weekday"],
                "intercept": 250000.0, "coefficients": [0.0, 0.0, 0.0, -1000.0]}"#,
        );
        let weekly = write_temp(
            "weekly.json",
            r#"{"kind": "linear", "feature_names": ["Year", "Week", "Weekday"],
                "intercept": 1750000.0, "coefficients": [0.0, 0.0, 0.0]}"#,
        );
        let store = ModelStore::load(&daily, &weekly).unwrap();
        std::fs::remove_file(&daily).ok();
        std::fs::remove_file(&weekly).ok();

        let fp = store.get(Mode::Daily).fingerprint().unwrap();
        assert_eq!(fp.len(), 64);
        assert_ne!(Some(fp), store.get(Mode::Weekly).fingerprint());
    }

    #[test]
    fn missing_artifact_is_an_io_error() {
        let res = ModelStore::load(Path::new("/nonexistent/daily.json"), Path::new("/nonexistent/weekly.json"));
        assert!(matches!(res, Err(ArtifactError::Io(_))));
    }
}
