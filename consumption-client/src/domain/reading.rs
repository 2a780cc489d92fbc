use time::PrimitiveDateTime;

/// One hourly consumption sample from the source dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawReading {
    pub ts: PrimitiveDateTime,
    pub consumption_mw: f64,
}
