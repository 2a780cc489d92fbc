//! Text and chart output for a prediction.
//!
//! `ChartData` is the full description of what gets drawn; `chart` turns it
//! into an SVG file. Keeping them apart lets the chart contents be checked
//! without touching the filesystem.

pub mod chart;

use consumption_client::domain::{HistoricalSeries, Mode, Prediction};
use time::Date;

pub use chart::render_svg;

#[derive(Debug, thiserror::Error)]
pub enum PresenterError {
    #[error("failed to create chart directory {path}: {source}")]
    OutputDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to draw chart: {0}")]
    Draw(String),
}

/// Value with two decimals and its unit, e.g. `500.00 MW`.
pub fn format_mw(value: f64) -> String {
    format!("{value:.2} MW")
}

/// Message shown after a successful prediction.
pub fn prediction_message(prediction: &Prediction) -> String {
    format!(
        "Predicted {} Consumption: {}",
        prediction.mode.title(),
        format_mw(prediction.value_mw)
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesColor {
    Blue,
    Green,
    Red,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub label: &'static str,
    pub color: SeriesColor,
    pub date: Date,
    pub value_mw: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub line_label: &'static str,
    pub line_color: SeriesColor,
    pub history: Vec<(Date, f64)>,
    pub markers: Vec<Marker>,
}

impl ChartData {
    /// Historical trend for the prediction's mode with the predicted point
    /// overlaid.
    pub fn for_prediction(series: &HistoricalSeries, prediction: &Prediction) -> Self {
        let (title, x_label, line_color, history) = match prediction.mode {
            Mode::Daily => (
                "Daily Electricity Consumption Trend",
                "Date",
                SeriesColor::Blue,
                series.daily.points().iter().map(|p| (p.date, p.total_mw)).collect(),
            ),
            Mode::Weekly => (
                "Weekly Electricity Consumption Trend",
                "Week",
                SeriesColor::Green,
                series.weekly.points().iter().map(|p| (p.week_end, p.total_mw)).collect(),
            ),
        };

        Self {
            title,
            x_label,
            y_label: "Electricity Consumption (MW)",
            line_label: "Historical Data",
            line_color,
            history,
            markers: vec![Marker {
                label: "Predicted",
                color: SeriesColor::Red,
                date: prediction.anchor_date,
                value_mw: prediction.value_mw,
            }],
        }
    }

    /// Inclusive date span covering history and markers.
    pub fn x_bounds(&self) -> Option<(Date, Date)> {
        let dates = self
            .history
            .iter()
            .map(|(d, _)| *d)
            .chain(self.markers.iter().map(|m| m.date));
        bounds(dates)
    }

    /// Value span covering history and markers, padded by 5% on each side.
    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        let values = self
            .history
            .iter()
            .map(|(_, v)| *v)
            .chain(self.markers.iter().map(|m| m.value_mw))
            .filter(|v| v.is_finite());
        let (lo, hi) = bounds(values)?;
        let pad = if hi > lo { (hi - lo) * 0.05 } else { lo.abs().max(1.0) * 0.05 };
        Some((lo - pad, hi + pad))
    }
}

fn bounds<T: PartialOrd + Copy>(items: impl Iterator<Item = T>) -> Option<(T, T)> {
    items.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((if v < lo { v } else { lo }, if v > hi { v } else { hi })),
    })
}
