//! Logging setup for binaries

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Parse a log level name, falling back to INFO
pub fn parse_level(log_level: Option<&str>) -> Level {
    log_level
        .and_then(|s| s.parse::<Level>().ok())
        .unwrap_or(Level::INFO)
}

/// Install a global fmt subscriber at the given level
///
/// Falls back to INFO if the level is missing or invalid. Does nothing if a
/// subscriber is already installed.
pub fn init_logging(log_level: Option<&str>) {
    let subscriber = FmtSubscriber::builder()
        .with_target(false)
        .with_max_level(parse_level(log_level))
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
