use gnocco_domain::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Logs go to stderr so stdout carries only answers. `RUST_LOG` wins over
/// the configured level.
pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true)
        .with_ansi(config.logging.ansi)
        .with_writer(std::io::stderr)
        .init();

    info!(level = %config.logging.level, "Logging initialized");
}
