use anyhow::Result;
use prediction_service::{
    app::{self, AppContext},
    config::AppConfig,
    metrics_server,
    observability,
};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration
    let cfg = AppConfig::load()?;

    // Start metrics server if configured
    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    // Dataset and both models are loaded once; any failure here is fatal.
    let ctx = AppContext::initialize(&cfg).await?;
    tracing::info!(
        days = ctx.series.daily.len(),
        weeks = ctx.series.weekly.len(),
        "ready for predictions"
    );

    app::run_session(&ctx, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
}
