use serde::Deserialize;
use std::{fs, path::PathBuf};

use crate::sources::CsvColumns;

/// Day that closes a weekly bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekEnding {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    #[default]
    Sunday,
}

impl From<WeekEnding> for time::Weekday {
    fn from(w: WeekEnding) -> Self {
        match w {
            WeekEnding::Monday => time::Weekday::Monday,
            WeekEnding::Tuesday => time::Weekday::Tuesday,
            WeekEnding::Wednesday => time::Weekday::Wednesday,
            WeekEnding::Thursday => time::Weekday::Thursday,
            WeekEnding::Friday => time::Weekday::Friday,
            WeekEnding::Saturday => time::Weekday::Saturday,
            WeekEnding::Sunday => time::Weekday::Sunday,
        }
    }
}

fn default_timestamp_column() -> String {
    CsvColumns::default().timestamp
}

fn default_consumption_column() -> String {
    CsvColumns::default().consumption
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    pub path: PathBuf,
    #[serde(default = "default_timestamp_column")]
    pub timestamp_column: String,
    #[serde(default = "default_consumption_column")]
    pub consumption_column: String,
    #[serde(default)]
    pub week_ending: WeekEnding,
}

impl DatasetConfig {
    pub fn columns(&self) -> CsvColumns {
        CsvColumns {
            timestamp: self.timestamp_column.clone(),
            consumption: self.consumption_column.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    pub daily: PathBuf,
    pub weekly: PathBuf,
}

fn default_true() -> bool {
    true
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("charts")
}

fn default_width() -> u32 {
    1000
}

fn default_height() -> u32 {
    400
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            output_dir: default_output_dir(),
            width: default_width(),
            height: default_height(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub dataset: DatasetConfig,
    pub models: ModelsConfig,
    #[serde(default)]
    pub chart: ChartConfig,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let path = env::var("FORECAST_CONFIG").unwrap_or_else(|_| "forecast-config.toml".to_string());
        let contents = fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("failed to read config {path}: {e}"))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let cfg: AppConfig = toml::from_str(contents)?;
        Ok(cfg)
    }
}
