//! Domain types and pure transformations for hourly electricity consumption:
//! resampling into daily/weekly totals and building model feature rows from
//! calendar inputs.

pub mod domain;
pub mod features;
pub mod resample;
