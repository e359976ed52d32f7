use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Crates of the HTTP stack behind the Mindicador transport.
const HTTP_TARGETS: [&str; 3] = ["reqwest", "hyper", "hyper_util"];

/// Levels for this crate and for the HTTP stack at a given `-v` count.
fn levels(verbosity: u8) -> (LevelFilter, LevelFilter) {
    match verbosity {
        0 => (LevelFilter::OFF, LevelFilter::OFF),
        1 => (LevelFilter::INFO, LevelFilter::OFF),
        2 => (LevelFilter::DEBUG, LevelFilter::WARN),
        _ => (LevelFilter::TRACE, LevelFilter::DEBUG),
    }
}

fn targets(verbosity: u8) -> Targets {
    let (app, http) = levels(verbosity);
    HTTP_TARGETS
        .iter()
        .fold(Targets::new(), |targets, name| targets.with_target(*name, http))
        .with_target(env!("CARGO_PKG_NAME"), app)
}

/// Installs the global tracing subscriber, writing to stderr so rendered
/// tables on stdout stay clean.
///
/// Nothing is logged without `-v` unless `RUST_LOG` asks for it. A second
/// call is a no-op.
pub fn init_logging(verbosity: u8) {
    let (app_level, _) = levels(verbosity);
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(app_level.to_string()));

    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .without_time()
                .with_target(verbosity > 1)
                .with_writer(std::io::stderr),
        )
        .with(targets(verbosity))
        .with(env_filter)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(verbosity, "Logging initialised");
    }
}
