//! Startup and the interactive terminal session.

use std::path::PathBuf;

use anyhow::Context;
use consumption_client::domain::{HistoricalSeries, Prediction, RawReading};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::{
    config::{AppConfig, ChartConfig, DatasetConfig},
    models::ModelStore,
    pipeline::{Pipeline, PipelineError},
    presenter::{self, ChartData},
    session::{
        self,
        command::{self, Command, CommandError, HELP},
        Session,
    },
    sinks::SeriesCollectorSink,
    sources::HourlyCsvFileSource,
};

/// Read the hourly dataset and aggregate it into the daily and weekly series.
pub async fn load_history(cfg: &DatasetConfig) -> Result<HistoricalSeries, PipelineError> {
    let source = HourlyCsvFileSource::new(&cfg.path, cfg.columns());
    let sink = SeriesCollectorSink::new(cfg.week_ending.into());
    let pipeline: Pipeline<_, RawReading, _> = Pipeline::new(source, sink);
    pipeline.run().await
}

/// Everything loaded at startup. Read-only for the rest of the process.
pub struct AppContext {
    pub series: HistoricalSeries,
    pub models: ModelStore,
    pub chart: ChartConfig,
}

impl AppContext {
    pub async fn initialize(cfg: &AppConfig) -> anyhow::Result<Self> {
        let series = load_history(&cfg.dataset)
            .await
            .with_context(|| format!("failed to load dataset {}", cfg.dataset.path.display()))?;
        let models = ModelStore::load(&cfg.models.daily, &cfg.models.weekly).context("failed to load models")?;
        Ok(Self {
            series,
            models,
            chart: cfg.chart.clone(),
        })
    }

    fn chart_path(&self, prediction: &Prediction) -> PathBuf {
        self.chart
            .output_dir
            .join(format!("{}_prediction.svg", prediction.mode))
    }
}

/// Drive one session from `input` lines until EOF or `quit`, writing all
/// user-facing output to `output`. Request errors are reported and the
/// session continues.
pub async fn run_session<R, W>(ctx: &AppContext, input: R, mut output: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut session = Session::default();
    let mut lines = input.lines();

    write_line(&mut output, "Electricity Consumption Prediction (type 'help' for commands)").await?;
    write_line(&mut output, &session.describe()).await?;

    while let Some(line) = lines.next_line().await? {
        let cmd = match command::parse(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                write_line(&mut output, &format!("error: {e}")).await?;
                if matches!(e, CommandError::Unknown(_)) {
                    write_line(&mut output, HELP).await?;
                }
                continue;
            }
        };

        match cmd {
            Command::Quit => break,
            Command::Help => write_line(&mut output, HELP).await?,
            Command::Show => write_line(&mut output, &session.describe()).await?,
            Command::Action(action) => match session::transition(&session, &action, &ctx.models) {
                Ok(step) => {
                    let mode_changed = step.session.mode != session.mode;
                    session = step.session;
                    if mode_changed {
                        write_line(&mut output, &session.describe()).await?;
                    }
                    if let Some(prediction) = step.prediction {
                        present(ctx, &prediction, &mut output).await?;
                    }
                }
                Err(e) => write_line(&mut output, &format!("error: {e}")).await?,
            },
        }
    }

    output.flush().await?;
    Ok(())
}

async fn present<W: AsyncWrite + Unpin>(ctx: &AppContext, prediction: &Prediction, output: &mut W) -> anyhow::Result<()> {
    write_line(output, &presenter::prediction_message(prediction)).await?;

    if !ctx.chart.enabled {
        return Ok(());
    }

    let chart = ChartData::for_prediction(&ctx.series, prediction);
    let path = ctx.chart_path(prediction);
    match presenter::render_svg(&chart, &path, (ctx.chart.width, ctx.chart.height)) {
        Ok(()) => write_line(output, &format!("chart written to {}", path.display())).await?,
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "chart rendering failed");
            write_line(output, &format!("error: {e}")).await?;
        }
    }
    Ok(())
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> std::io::Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await
}
