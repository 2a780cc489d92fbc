//! Calendar resampling of hourly readings.
//!
//! Both folds are pure: input order does not matter and re-running them on the
//! same readings yields identical series. Empty buckets inside the covered
//! span are emitted with a zero total, so the output has no calendar gaps.

use std::collections::BTreeMap;

use time::{Date, Duration, Weekday};

use crate::domain::{DailyPoint, DailySeries, RawReading, WeeklyPoint, WeeklySeries};

/// Last day of the week bucket that `date` falls in.
pub fn week_end_for(date: Date, week_ending: Weekday) -> Date {
    let offset = (7 + i64::from(week_ending.number_days_from_monday())
        - i64::from(date.weekday().number_days_from_monday()))
        % 7;
    date.saturating_add(Duration::days(offset))
}

/// Sum hourly readings per calendar day.
pub fn daily(readings: &[RawReading]) -> DailySeries {
    let mut totals: BTreeMap<Date, f64> = BTreeMap::new();
    for r in readings {
        *totals.entry(r.ts.date()).or_insert(0.0) += r.consumption_mw;
    }

    let points = fill_span(&totals, Duration::days(1))
        .into_iter()
        .map(|(date, total_mw)| DailyPoint { date, total_mw })
        .collect();

    DailySeries::from_sorted(points)
}

/// Sum daily totals per week, labelling each bucket by its `week_ending` day.
pub fn weekly(daily: &DailySeries, week_ending: Weekday) -> WeeklySeries {
    let mut totals: BTreeMap<Date, f64> = BTreeMap::new();
    for p in daily.points() {
        *totals.entry(week_end_for(p.date, week_ending)).or_insert(0.0) += p.total_mw;
    }

    let points = fill_span(&totals, Duration::weeks(1))
        .into_iter()
        .map(|(week_end, total_mw)| WeeklyPoint { week_end, total_mw })
        .collect();

    WeeklySeries::from_sorted(points)
}

/// Walk from the first to the last key in `step` increments, yielding zero for
/// keys without a total.
fn fill_span(totals: &BTreeMap<Date, f64>, step: Duration) -> Vec<(Date, f64)> {
    let (Some((&first, _)), Some((&last, _))) = (totals.first_key_value(), totals.last_key_value())
    else {
        return Vec::new();
    };

    let mut out = Vec::with_capacity(totals.len());
    let mut cursor = first;
    while cursor <= last {
        out.push((cursor, totals.get(&cursor).copied().unwrap_or(0.0)));
        match cursor.checked_add(step) {
            Some(next) => cursor = next,
            None => break,
        }
    }
    out
}
