pub mod hourly_csv_file;

pub use hourly_csv_file::{CsvColumns, HourlyCsvFileSource};
