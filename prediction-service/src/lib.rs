pub mod app;
pub mod config;
pub mod metrics_server;
pub mod models;
pub mod observability;
pub mod pipeline;
pub mod predictor;
pub mod presenter;
pub mod session;
pub mod sinks;
pub mod sources;

pub use pipeline::{Envelope, Pipeline};
