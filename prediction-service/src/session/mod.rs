//! Per-user interaction state.
//!
//! A session is in one mode at a time and is either waiting for input or
//! showing the last prediction. `transition` is a pure function of the current
//! session, the action and the loaded models; rendering happens elsewhere.

pub mod command;

use consumption_client::domain::{Mode, Prediction};

use crate::{
    models::ModelStore,
    predictor::{self, PredictError, PredictionRequest},
};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("{mode} mode has no field '{field}'")]
    UnknownField { mode: Mode, field: String },
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },
    #[error(transparent)]
    Predict(#[from] PredictError),
}

/// A bounded integer input with a default value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberField {
    pub name: &'static str,
    pub label: &'static str,
    pub min: i64,
    pub max: i64,
    pub value: i64,
}

impl NumberField {
    const fn new(name: &'static str, label: &'static str, min: i64, max: i64, value: i64) -> Self {
        Self {
            name,
            label,
            min,
            max,
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputForm {
    fields: Vec<NumberField>,
}

impl InputForm {
    pub fn for_mode(mode: Mode) -> Self {
        let fields = match mode {
            Mode::Daily => vec![
                NumberField::new("year", "Enter Year", 2010, 2030, 2024),
                NumberField::new("month", "Enter Month (1-12)", 1, 12, 11),
                NumberField::new("day", "Enter Day (1-31)", 1, 31, 13),
            ],
            Mode::Weekly => vec![
                NumberField::new("year", "Enter Year", 2010, 2030, 2024),
                NumberField::new("week", "Enter Week Number (1-52)", 1, 52, 45),
                NumberField::new("weekday", "Enter Last Weekday (0=Mon, 6=Sun)", 0, 6, 6),
            ],
        };
        Self { fields }
    }

    pub fn fields(&self) -> &[NumberField] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.value)
    }

    /// Returns `false` when the form has no field called `name`.
    fn set(&mut self, name: &str, value: i64) -> Result<bool, SessionError> {
        let Some(field) = self.fields.iter_mut().find(|f| f.name == name) else {
            return Ok(false);
        };
        if value < field.min || value > field.max {
            return Err(SessionError::OutOfRange {
                field: field.name,
                min: field.min,
                max: field.max,
                value,
            });
        }
        field.value = value;
        Ok(true)
    }

    // Every field is bounded well inside the target integer types.
    fn value(&self, name: &str) -> i64 {
        self.get(name).unwrap_or_default()
    }

    fn request(&self, mode: Mode) -> PredictionRequest {
        let year = self.value("year") as i32;
        match mode {
            Mode::Daily => PredictionRequest::Daily {
                year,
                month: self.value("month") as u8,
                day: self.value("day") as u8,
            },
            Mode::Weekly => PredictionRequest::Weekly {
                year,
                week: self.value("week") as u8,
                weekday: self.value("weekday") as u8,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    AwaitingInput,
    Predicted(Prediction),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectMode(Mode),
    SetField { name: String, value: i64 },
    Predict,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub mode: Mode,
    pub form: InputForm,
    pub state: SessionState,
}

impl Session {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            form: InputForm::for_mode(mode),
            state: SessionState::AwaitingInput,
        }
    }

    pub fn prediction(&self) -> Option<&Prediction> {
        match &self.state {
            SessionState::Predicted(p) => Some(p),
            SessionState::AwaitingInput => None,
        }
    }

    /// Human-readable listing of the mode, fields and state.
    pub fn describe(&self) -> String {
        let mut out = format!("mode: {}\n", self.mode);
        for f in self.form.fields() {
            out.push_str(&format!(
                "  {:<8} = {:<5} [{}..={}]  {}\n",
                f.name, f.value, f.min, f.max, f.label
            ));
        }
        match &self.state {
            SessionState::AwaitingInput => out.push_str("state: awaiting input"),
            SessionState::Predicted(p) => out.push_str(&format!(
                "state: predicted {} at {}",
                crate::presenter::format_mw(p.value_mw),
                p.anchor_date
            )),
        }
        out
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Mode::Daily)
    }
}

/// Result of applying an action: the next session and, for a predict action,
/// the freshly computed prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub session: Session,
    pub prediction: Option<Prediction>,
}

/// Apply `action` to `current`. On error the caller keeps `current`.
///
/// - Switching to another mode restores that mode's default fields and drops
///   any prediction.
/// - Editing a field never changes the state; only predicting again replaces a
///   shown prediction.
pub fn transition(current: &Session, action: &Action, models: &ModelStore) -> Result<Step, SessionError> {
    match action {
        Action::SelectMode(mode) if *mode == current.mode => Ok(Step {
            session: current.clone(),
            prediction: None,
        }),
        Action::SelectMode(mode) => Ok(Step {
            session: Session::new(*mode),
            prediction: None,
        }),
        Action::SetField { name, value } => {
            let mut session = current.clone();
            if !session.form.set(name, *value)? {
                return Err(SessionError::UnknownField {
                    mode: current.mode,
                    field: name.clone(),
                });
            }
            Ok(Step {
                session,
                prediction: None,
            })
        }
        Action::Predict => {
            let prediction = predictor::predict(models, current.form.request(current.mode))?;
            let session = Session {
                state: SessionState::Predicted(prediction),
                ..current.clone()
            };
            Ok(Step {
                session,
                prediction: Some(prediction),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{testing::*, LoadedModel},
        presenter::{self, ChartData},
    };
    use consumption_client::{domain::HistoricalSeries, features::CalendarError};
    use time::macros::date;

    fn stub_store() -> ModelStore {
        ModelStore::new(
            LoadedModel::new("daily", names(&["Day", "Month", "Year", "Weekday"]), Box::new(ConstantRegressor(500.0))),
            LoadedModel::new("weekly", names(&["Year", "Week", "Weekday"]), Box::new(ConstantRegressor(3500.0))),
        )
    }

    fn set(name: &str, value: i64) -> Action {
        Action::SetField {
            name: name.to_string(),
            value,
        }
    }

    fn apply(session: Session, actions: &[Action], models: &ModelStore) -> Step {
        let mut step = Step {
            session,
            prediction: None,
        };
        for a in actions {
            step = transition(&step.session, a, models).unwrap();
        }
        step
    }

    #[test]
    fn daily_end_to_end() {
        let models = stub_store();
        let step = apply(
            Session::new(Mode::Daily),
            &[set("year", 2024), set("month", 11), set("day", 13), Action::Predict],
            &models,
        );
        let p = step.prediction.unwrap();
        assert_eq!(presenter::format_mw(p.value_mw), "500.00 MW");
        assert_eq!(step.session.state, SessionState::Predicted(p));

        let chart = ChartData::for_prediction(&HistoricalSeries::default(), &p);
        assert_eq!(chart.markers.len(), 1);
        assert_eq!(chart.markers[0].date, date!(2024-11-13));
    }

    #[test]
    fn weekly_end_to_end() {
        let models = stub_store();
        let step = apply(
            Session::default(),
            &[
                Action::SelectMode(Mode::Weekly),
                set("year", 2024),
                set("week", 45),
                set("weekday", 6),
                Action::Predict,
            ],
            &models,
        );
        let p = step.prediction.unwrap();
        assert_eq!(p.mode, Mode::Weekly);
        assert_eq!(presenter::prediction_message(&p), "Predicted Weekly Consumption: 3500.00 MW");
    }

    #[test]
    fn defaults_match_the_input_widgets() {
        let daily = Session::new(Mode::Daily);
        assert_eq!(daily.form.get("year"), Some(2024));
        assert_eq!(daily.form.get("month"), Some(11));
        assert_eq!(daily.form.get("day"), Some(13));
        assert_eq!(daily.state, SessionState::AwaitingInput);

        let weekly = Session::new(Mode::Weekly);
        assert_eq!(weekly.form.get("week"), Some(45));
        assert_eq!(weekly.form.get("weekday"), Some(6));
    }

    #[test]
    fn switching_mode_discards_prediction_and_resets_fields() {
        let models = stub_store();
        let step = apply(Session::new(Mode::Daily), &[set("day", 1), Action::Predict], &models);
        assert!(step.session.prediction().is_some());

        let step = apply(
            step.session,
            &[Action::SelectMode(Mode::Weekly), Action::SelectMode(Mode::Daily)],
            &models,
        );
        assert_eq!(step.session, Session::new(Mode::Daily));
    }

    #[test]
    fn reselecting_current_mode_keeps_state() {
        let models = stub_store();
        let step = apply(Session::new(Mode::Daily), &[Action::Predict], &models);
        let again = transition(&step.session, &Action::SelectMode(Mode::Daily), &models).unwrap();
        assert_eq!(again.session, step.session);
    }

    #[test]
    fn editing_fields_keeps_shown_prediction_until_predict() {
        let models = stub_store();
        let step = apply(Session::new(Mode::Daily), &[Action::Predict, set("day", 20)], &models);
        let shown = step.session.prediction().unwrap();
        assert_eq!(shown.anchor_date, date!(2024-11-13));

        let step = transition(&step.session, &Action::Predict, &models).unwrap();
        assert_eq!(step.prediction.unwrap().anchor_date, date!(2024-11-20));
    }

    #[test]
    fn out_of_range_value_is_rejected() {
        let models = stub_store();
        let res = transition(&Session::new(Mode::Daily), &set("month", 13), &models);
        assert!(matches!(
            res,
            Err(SessionError::OutOfRange {
                field: "month",
                max: 12,
                ..
            })
        ));
        let res = transition(&Session::new(Mode::Daily), &set("year", 2009), &models);
        assert!(matches!(res, Err(SessionError::OutOfRange { field: "year", .. })));
    }

    #[test]
    fn field_of_other_mode_is_unknown() {
        let models = stub_store();
        let res = transition(&Session::new(Mode::Daily), &set("week", 3), &models);
        assert!(matches!(res, Err(SessionError::UnknownField { .. })));
    }

    #[test]
    fn impossible_date_is_reported_not_predicted() {
        let models = stub_store();
        let session = apply(Session::new(Mode::Daily), &[set("month", 2), set("day", 30)], &models).session;
        let res = transition(&session, &Action::Predict, &models);
        assert!(matches!(
            res,
            Err(SessionError::Predict(PredictError::Calendar(CalendarError::InvalidDate { .. })))
        ));
        assert_eq!(session.state, SessionState::AwaitingInput);
    }
}
