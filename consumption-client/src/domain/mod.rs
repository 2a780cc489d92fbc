pub mod feature_vector;
pub mod prediction;
pub mod reading;
pub mod series;

pub use feature_vector::{DailyFeatureVector, FeatureRow, WeeklyFeatureVector};
pub use prediction::{Mode, Prediction, UnknownMode};
pub use reading::RawReading;
pub use series::{DailyPoint, DailySeries, HistoricalSeries, SeriesError, WeeklyPoint, WeeklySeries};
