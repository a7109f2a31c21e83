//! Logging initialisation for binaries and tests.
//!
//! By default the `log` facade is served by `env_logger`, filtered
//! through `RUST_LOG`. With the `tracing` feature, spans emitted by
//! the instrumented entry points are routed through `tracing_subscriber`
//! instead, with the same environment filter.
//!
//! ```bash
//! RUST_LOG=horizon=debug horizon graph.csv track.csv
//! ```

/// Initialises the `env_logger` backend.
///
/// Safe to call more than once, subsequent calls are no-ops.
pub fn initialize_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

/// Initialises the tracer, using tracing subscription.
/// This is optional, not calling this function will simply
/// not log traces.
#[cfg(feature = "tracing")]
pub fn initialize_tracer() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let fmt_layer = tracing_subscriber::fmt::layer();

    // Initialise tracing with subscribers and environment filter
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(fmt_layer)
        .try_init();
}
