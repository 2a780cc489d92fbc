use time::Date;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SeriesError {
    #[error("series dates must be strictly increasing: {next} follows {previous}")]
    OutOfOrder { previous: Date, next: Date },
}

/// Total consumption for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyPoint {
    pub date: Date,
    pub total_mw: f64,
}

/// Total consumption for one week, labelled by the last day of the week.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeeklyPoint {
    pub week_end: Date,
    pub total_mw: f64,
}

fn check_increasing(dates: impl Iterator<Item = Date>) -> Result<(), SeriesError> {
    let mut previous: Option<Date> = None;
    for next in dates {
        if let Some(previous) = previous {
            if next <= previous {
                return Err(SeriesError::OutOfOrder { previous, next });
            }
        }
        previous = Some(next);
    }
    Ok(())
}

/// Daily totals ordered by date. Dates are distinct and strictly increasing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailySeries {
    points: Vec<DailyPoint>,
}

impl DailySeries {
    pub fn new(points: Vec<DailyPoint>) -> Result<Self, SeriesError> {
        check_increasing(points.iter().map(|p| p.date))?;
        Ok(Self { points })
    }

    /// For points already produced in date order by the resampler.
    pub(crate) fn from_sorted(points: Vec<DailyPoint>) -> Self {
        debug_assert!(check_increasing(points.iter().map(|p| p.date)).is_ok());
        Self { points }
    }

    pub fn points(&self) -> &[DailyPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, date: Date) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|idx| self.points[idx].total_mw)
    }
}

/// Weekly totals ordered by week-end date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeeklySeries {
    points: Vec<WeeklyPoint>,
}

impl WeeklySeries {
    pub fn new(points: Vec<WeeklyPoint>) -> Result<Self, SeriesError> {
        check_increasing(points.iter().map(|p| p.week_end))?;
        Ok(Self { points })
    }

    /// For points already produced in date order by the resampler.
    pub(crate) fn from_sorted(points: Vec<WeeklyPoint>) -> Self {
        debug_assert!(check_increasing(points.iter().map(|p| p.week_end)).is_ok());
        Self { points }
    }

    pub fn points(&self) -> &[WeeklyPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, week_end: Date) -> Option<f64> {
        self.points
            .binary_search_by_key(&week_end, |p| p.week_end)
            .ok()
            .map(|idx| self.points[idx].total_mw)
    }
}

/// Both resampled views of a loaded dataset. Built once at startup and only
/// read afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoricalSeries {
    pub daily: DailySeries,
    pub weekly: WeeklySeries,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn daily_series_rejects_duplicate_dates() {
        let res = DailySeries::new(vec![
            DailyPoint { date: date!(2024-01-01), total_mw: 1.0 },
            DailyPoint { date: date!(2024-01-01), total_mw: 2.0 },
        ]);
        assert!(matches!(res, Err(SeriesError::OutOfOrder { .. })));
    }

    #[test]
    fn weekly_series_lookup_by_week_end() {
        let series = WeeklySeries::new(vec![
            WeeklyPoint { week_end: date!(2024-01-07), total_mw: 70.0 },
            WeeklyPoint { week_end: date!(2024-01-14), total_mw: 140.0 },
        ])
        .unwrap();
        assert_eq!(series.get(date!(2024-01-14)), Some(140.0));
        assert_eq!(series.get(date!(2024-01-08)), None);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn unsorted_resampler_output_panics_in_debug() {
        DailySeries::from_sorted(vec![
            DailyPoint { date: date!(2024-01-02), total_mw: 1.0 },
            DailyPoint { date: date!(2024-01-01), total_mw: 2.0 },
        ]);
    }
}
