use std::{fs::File, path::PathBuf};

use consumption_client::domain::RawReading;
use csv::StringRecord;
use time::{
    format_description::well_known::Rfc3339, macros::format_description, OffsetDateTime,
    PrimitiveDateTime,
};

use crate::pipeline::{Envelope, EnvelopeStream, PipelineError, Source};

/// Names of the two columns read from the hourly dataset.
#[derive(Debug, Clone)]
pub struct CsvColumns {
    pub timestamp: String,
    pub consumption: String,
}

impl Default for CsvColumns {
    fn default() -> Self {
        Self {
            timestamp: "Datetime".to_string(),
            consumption: "COMED_MW".to_string(),
        }
    }
}

/// CSV source of hourly `RawReading`s.
///
/// Any other columns in the file are ignored. Rows with an empty timestamp, or
/// whose consumption is empty, unparseable or non-finite, are skipped. A
/// timestamp that is present but unparseable aborts the load.
pub struct HourlyCsvFileSource {
    path: PathBuf,
    columns: CsvColumns,
}

impl HourlyCsvFileSource {
    pub fn new<P: Into<PathBuf>>(path: P, columns: CsvColumns) -> Self {
        Self {
            path: path.into(),
            columns,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ColumnIndices {
    timestamp: usize,
    consumption: usize,
}

fn resolve_columns(headers: &StringRecord, columns: &CsvColumns) -> Result<ColumnIndices, PipelineError> {
    let find = |name: &str| -> Result<usize, PipelineError> {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| PipelineError::Source(format!("missing column '{name}' in CSV header")))
    };
    Ok(ColumnIndices {
        timestamp: find(&columns.timestamp)?,
        consumption: find(&columns.consumption)?,
    })
}

/// Accepts `YYYY-MM-DD HH:MM:SS`, the same with a `T` separator, and RFC 3339.
/// Offset timestamps keep their local wall-clock time.
pub fn parse_timestamp(s: &str) -> Option<PrimitiveDateTime> {
    let s = s.trim();
    let space = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let t_sep = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

    PrimitiveDateTime::parse(s, &space)
        .or_else(|_| PrimitiveDateTime::parse(s, &t_sep))
        .ok()
        .or_else(|| {
            OffsetDateTime::parse(s, &Rfc3339)
                .ok()
                .map(|odt| PrimitiveDateTime::new(odt.date(), odt.time()))
        })
}

/// `None` for values the dataset treats as missing.
pub fn parse_consumption(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn record_to_reading(
    record: &StringRecord,
    idx: ColumnIndices,
    line: u64,
) -> Result<Option<RawReading>, PipelineError> {
    let ts_str = record.get(idx.timestamp).unwrap_or("").trim();
    if ts_str.is_empty() {
        return Ok(None);
    }
    let ts = parse_timestamp(ts_str)
        .ok_or_else(|| PipelineError::Source(format!("invalid timestamp '{ts_str}' on line {line}")))?;

    Ok(record
        .get(idx.consumption)
        .and_then(parse_consumption)
        .map(|consumption_mw| RawReading { ts, consumption_mw }))
}

#[async_trait::async_trait]
impl Source<RawReading> for HourlyCsvFileSource {
    async fn stream(&self) -> EnvelopeStream<RawReading> {
        // Blocking CSV reader inside a single task; the load runs once at startup.
        let path = self.path.clone();
        let columns = self.columns.clone();
        let s = async_stream::try_stream! {
            let file = File::open(&path).map_err(|e| {
                PipelineError::Source(format!("failed to open dataset {}: {e}", path.display()))
            })?;
            let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(file);
            let headers = rdr
                .headers()
                .map_err(|e| PipelineError::Source(format!("failed to read CSV headers: {e}")))?
                .clone();
            let idx = resolve_columns(&headers, &columns)?;

            for result in rdr.records() {
                let record = result.map_err(|e| PipelineError::Source(format!(
                    "failed to read CSV record: {e}"
                )))?;
                let line = record.position().map(|p| p.line()).unwrap_or_default();

                match record_to_reading(&record, idx, line)? {
                    Some(reading) => {
                        metrics::counter!("hourly_csv_rows_loaded_total").increment(1);
                        yield Envelope { payload: reading, line };
                    }
                    None => {
                        metrics::counter!("hourly_csv_rows_dropped_total").increment(1);
                        tracing::debug!(line, "dropping incomplete row");
                    }
                }
            }
        };

        Box::pin(s)
    }
}
