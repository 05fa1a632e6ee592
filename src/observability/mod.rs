use crate::config::ObservabilityConfig;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Map a configured level name to a `tracing` level, defaulting to INFO.
pub fn parse_level(name: &str) -> Level {
    name.trim().parse::<Level>().unwrap_or(Level::INFO)
}

/// Install the global fmt subscriber. Later calls are ignored.
pub fn init_tracing(config: &ObservabilityConfig) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&config.log_level))
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
