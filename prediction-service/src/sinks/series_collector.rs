use consumption_client::{
    domain::{HistoricalSeries, RawReading},
    resample,
};
use futures::StreamExt;
use time::Weekday;

use crate::pipeline::{Envelope, PipelineError, Sink};

/// Collects every reading from the stream and resamples them into the daily
/// and weekly series once the stream ends.
///
/// Upstream errors abort the load: a partially read dataset would silently
/// skew both series.
pub struct SeriesCollectorSink {
    week_ending: Weekday,
}

impl SeriesCollectorSink {
    pub fn new(week_ending: Weekday) -> Self {
        Self { week_ending }
    }
}

#[async_trait::async_trait]
impl Sink<RawReading> for SeriesCollectorSink {
    type Output = HistoricalSeries;

    async fn run<S>(&self, mut input: S) -> Result<HistoricalSeries, PipelineError>
    where
        S: futures::Stream<Item = Result<Envelope<RawReading>, PipelineError>> + Send + Unpin + 'static,
    {
        let mut readings: Vec<RawReading> = Vec::new();
        let mut last_line: u64 = 0;

        while let Some(item) = input.next().await {
            match item {
                Ok(env) => {
                    last_line = env.line;
                    readings.push(env.payload);
                }
                Err(e) => {
                    tracing::error!(error = %e, "error in upstream pipeline for SeriesCollectorSink");
                    return Err(e);
                }
            }
        }

        if readings.is_empty() {
            return Err(PipelineError::Sink("dataset contains no usable readings".to_string()));
        }

        let daily = resample::daily(&readings);
        let weekly = resample::weekly(&daily, self.week_ending);

        tracing::info!(
            readings = readings.len(),
            last_line,
            days = daily.len(),
            weeks = weekly.len(),
            "historical series aggregated"
        );

        Ok(HistoricalSeries { daily, weekly })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn env(ts: time::PrimitiveDateTime, mw: f64, line: u64) -> Result<Envelope<RawReading>, PipelineError> {
        Ok(Envelope {
            payload: RawReading {
                ts,
                consumption_mw: mw,
            },
            line,
        })
    }

    #[tokio::test]
    async fn aggregates_stream_into_both_series() {
        let items = vec![
            env(datetime!(2024-11-16 01:00:00), 10.0, 2),
            env(datetime!(2024-11-16 02:00:00), 20.0, 3),
            env(datetime!(2024-11-17 01:00:00), 30.0, 4),
            env(datetime!(2024-11-18 01:00:00), 40.0, 5),
        ];
        let sink = SeriesCollectorSink::new(Weekday::Sunday);
        let series = sink.run(futures::stream::iter(items)).await.unwrap();

        assert_eq!(series.daily.get(date!(2024-11-16)), Some(30.0));
        assert_eq!(series.weekly.get(date!(2024-11-17)), Some(60.0));
        assert_eq!(series.weekly.get(date!(2024-11-24)), Some(40.0));
    }

    #[tokio::test]
    async fn upstream_error_aborts() {
        let items = vec![
            env(datetime!(2024-11-16 01:00:00), 10.0, 2),
            Err(PipelineError::Source("bad row".to_string())),
        ];
        let sink = SeriesCollectorSink::new(Weekday::Sunday);
        let res = sink.run(futures::stream::iter(items)).await;
        assert!(matches!(res, Err(PipelineError::Source(_))));
    }

    #[tokio::test]
    async fn empty_stream_is_an_error() {
        let items: Vec<Result<Envelope<RawReading>, PipelineError>> = Vec::new();
        let sink = SeriesCollectorSink::new(Weekday::Sunday);
        let res = sink.run(futures::stream::iter(items)).await;
        assert!(matches!(res, Err(PipelineError::Sink(_))));
    }
}
