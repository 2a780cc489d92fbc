pub mod series_collector;

pub use series_collector::SeriesCollectorSink;
