/// Column names of the daily model, in training order.
pub const DAILY_FEATURE_NAMES: [&str; 4] = ["Day", "Month", "Year", "Weekday"];

/// Column names of the weekly model, in training order.
pub const WEEKLY_FEATURE_NAMES: [&str; 3] = ["Year", "Week", "Weekday"];

/// Inputs of the daily model. `weekday` is derived from the date (Monday = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyFeatureVector {
    pub day: u8,
    pub month: u8,
    pub year: i32,
    pub weekday: u8,
}

/// Inputs of the weekly model. `weekday` is taken from the user as-is and is
/// not checked against `year`/`week_number`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyFeatureVector {
    pub year: i32,
    pub week_number: u8,
    pub weekday: u8,
}

/// One named, ordered row of numeric model inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    names: Vec<String>,
    values: Vec<f64>,
}

impl FeatureRow {
    /// Returns `None` when names and values differ in length.
    pub fn new(names: Vec<String>, values: Vec<f64>) -> Option<Self> {
        (names.len() == values.len()).then_some(Self { names, values })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn from_static(names: &[&str], values: Vec<f64>) -> Self {
        Self {
            names: names.iter().map(|n| n.to_string()).collect(),
            values,
        }
    }
}

impl From<DailyFeatureVector> for FeatureRow {
    fn from(v: DailyFeatureVector) -> Self {
        FeatureRow::from_static(
            &DAILY_FEATURE_NAMES,
            vec![
                f64::from(v.day),
                f64::from(v.month),
                f64::from(v.year),
                f64::from(v.weekday),
            ],
        )
    }
}

impl From<WeeklyFeatureVector> for FeatureRow {
    fn from(v: WeeklyFeatureVector) -> Self {
        FeatureRow::from_static(
            &WEEKLY_FEATURE_NAMES,
            vec![f64::from(v.year), f64::from(v.week_number), f64::from(v.weekday)],
        )
    }
}
