use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "prediction_service=info,consumption_client=info";

/// Install the global subscriber. `RUST_LOG` replaces the default directives
/// when set.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    // stdout carries the session, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
