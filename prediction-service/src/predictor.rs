use consumption_client::{
    domain::{FeatureRow, Mode, Prediction},
    features::{self, CalendarError},
};

use crate::models::{ModelError, ModelStore};

/// Calendar fields entered for one prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionRequest {
    Daily { year: i32, month: u8, day: u8 },
    Weekly { year: i32, week: u8, weekday: u8 },
}

impl PredictionRequest {
    pub fn mode(&self) -> Mode {
        match self {
            PredictionRequest::Daily { .. } => Mode::Daily,
            PredictionRequest::Weekly { .. } => Mode::Weekly,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error(transparent)]
    Calendar(#[from] CalendarError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Run the model for `mode` on a single row and take its only output.
pub fn predict_row(models: &ModelStore, mode: Mode, row: FeatureRow) -> Result<f64, ModelError> {
    let model = models.get(mode);
    let outputs = model.predict(std::slice::from_ref(&row))?;
    outputs
        .first()
        .copied()
        .ok_or_else(|| ModelError::EmptyOutput(model.name().to_string()))
}

/// Build the feature row for `request`, run the matching model and attach the
/// date the value is plotted at.
pub fn predict(models: &ModelStore, request: PredictionRequest) -> Result<Prediction, PredictError> {
    let mode = request.mode();
    let result = run(models, request);

    match &result {
        Ok(p) => {
            metrics::counter!("predictions_total", "mode" => mode.as_str()).increment(1);
            tracing::info!(mode = %mode, value_mw = p.value_mw, anchor_date = %p.anchor_date, "prediction computed");
        }
        Err(e) => {
            metrics::counter!("prediction_errors_total", "mode" => mode.as_str()).increment(1);
            tracing::warn!(mode = %mode, error = %e, "prediction failed");
        }
    }
    result
}

fn run(models: &ModelStore, request: PredictionRequest) -> Result<Prediction, PredictError> {
    match request {
        PredictionRequest::Daily { year, month, day } => {
            let (vector, date) = features::build_daily_features(year, month, day)?;
            let value_mw = predict_row(models, Mode::Daily, vector.into())?;
            Ok(Prediction {
                mode: Mode::Daily,
                value_mw,
                anchor_date: date,
            })
        }
        PredictionRequest::Weekly { year, week, weekday } => {
            let vector = features::build_weekly_features(year, week, weekday);
            let value_mw = predict_row(models, Mode::Weekly, vector.into())?;
            Ok(Prediction {
                mode: Mode::Weekly,
                value_mw,
                anchor_date: features::week_anchor_date(year, week)?,
            })
        }
    }
}
