use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Per-target levels for the server.
///
/// Request spans from `tower_http` only show up in verbose mode; upstream client noise
/// (`reqwest`, `hyper`) stays at WARN either way.
pub fn log_targets(verbose: bool) -> Targets {
    let (app_level, http_level) = if verbose {
        (LevelFilter::DEBUG, LevelFilter::DEBUG)
    } else {
        (LevelFilter::INFO, LevelFilter::WARN)
    };
    Targets::new()
        .with_target("midrate", app_level)
        .with_target("tower_http", http_level)
        .with_default(LevelFilter::WARN)
}

/// Installs the global subscriber. `RUST_LOG`, when set, narrows what `verbose` enables.
pub fn init_logging(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(verbose))
        .with(log_targets(verbose))
        .with(env_filter)
        .init();
}
