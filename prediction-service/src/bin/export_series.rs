use anyhow::{bail, Context, Result};
use prediction_service::{app, config::AppConfig, observability};
use std::{env, fs, path::PathBuf};

/// Write the aggregated daily and weekly series as CSV.
///
/// Usage:
///   export_series <out_dir>
#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        bail!("usage: export_series <out_dir>");
    }
    let out_dir = PathBuf::from(&args[1]);

    // Only the [dataset] section is used; FORECAST_CONFIG selects the file.
    let cfg = AppConfig::load()?;
    let series = app::load_history(&cfg.dataset)
        .await
        .with_context(|| format!("failed to load dataset {}", cfg.dataset.path.display()))?;

    fs::create_dir_all(&out_dir)?;

    let daily_path = out_dir.join("daily.csv");
    let mut wtr = csv::Writer::from_path(&daily_path)?;
    wtr.write_record(["date", "total_consumption_mw"])?;
    for p in series.daily.points() {
        wtr.write_record([p.date.to_string(), p.total_mw.to_string()])?;
    }
    wtr.flush()?;

    let weekly_path = out_dir.join("weekly.csv");
    let mut wtr = csv::Writer::from_path(&weekly_path)?;
    wtr.write_record(["week_end_date", "total_consumption_mw"])?;
    for p in series.weekly.points() {
        wtr.write_record([p.week_end.to_string(), p.total_mw.to_string()])?;
    }
    wtr.flush()?;

    tracing::info!(
        days = series.daily.len(),
        weeks = series.weekly.len(),
        out_dir = %out_dir.display(),
        "series exported"
    );

    Ok(())
}
