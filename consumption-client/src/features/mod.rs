//! Calendar inputs to model feature vectors.
//!
//! Daily mode derives the weekday from the full date; weekly mode takes the
//! weekday verbatim from the user. The two models were trained that way, so
//! the asymmetry is kept.

use time::{Date, Duration, Month};

use crate::domain::{DailyFeatureVector, WeeklyFeatureVector};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CalendarError {
    #[error("invalid calendar date {year}-{month:02}-{day:02}: {reason}")]
    InvalidDate {
        year: i32,
        month: u8,
        day: u8,
        reason: String,
    },
    #[error("week {week} of {year} falls outside the supported calendar range")]
    WeekOutOfRange { year: i32, week: u8 },
}

/// Build a calendar date, failing on combinations such as February 30th.
pub fn calendar_date(year: i32, month: u8, day: u8) -> Result<Date, CalendarError> {
    let invalid = |reason: String| CalendarError::InvalidDate {
        year,
        month,
        day,
        reason,
    };
    let m = Month::try_from(month).map_err(|e| invalid(e.to_string()))?;
    Date::from_calendar_date(year, m, day).map_err(|e| invalid(e.to_string()))
}

/// Weekday number with Monday = 0 through Sunday = 6.
pub fn weekday_index(date: Date) -> u8 {
    date.weekday().number_days_from_monday()
}

pub fn build_daily_features(
    year: i32,
    month: u8,
    day: u8,
) -> Result<(DailyFeatureVector, Date), CalendarError> {
    let date = calendar_date(year, month, day)?;
    let features = DailyFeatureVector {
        day,
        month,
        year,
        weekday: weekday_index(date),
    };
    Ok((features, date))
}

pub fn build_weekly_features(year: i32, week_number: u8, weekday: u8) -> WeeklyFeatureVector {
    WeeklyFeatureVector {
        year,
        week_number,
        weekday,
    }
}

/// Approximate plot position for a weekly prediction: the Monday of
/// Monday-based week `week` of `year`, where week 1 starts on the first
/// Monday of the year (week 0 covers any days before it).
///
/// Display only; never used as a model input.
pub fn week_anchor_date(year: i32, week: u8) -> Result<Date, CalendarError> {
    let out_of_range = || CalendarError::WeekOutOfRange { year, week };
    let jan1 = Date::from_calendar_date(year, Month::January, 1).map_err(|_| out_of_range())?;
    let to_first_monday = (7 - i64::from(weekday_index(jan1))) % 7;
    let offset = to_first_monday + (i64::from(week) - 1) * 7;
    jan1.checked_add(Duration::days(offset)).ok_or_else(out_of_range)
}
