//! Tracing setup
//!
//! The subscriber is installed before the config file is read so config
//! loading can log. The configured `logging.level` is applied afterwards
//! through a reload handle, unless `RUST_LOG` is set.

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

/// Level used until the config file has been read
pub const BOOTSTRAP_LEVEL: &str = "info";

/// Handle for swapping the active filter
pub type FilterHandle = reload::Handle<EnvFilter, Registry>;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter: {0}")]
    Filter(#[from] ParseError),

    #[error("Log filter reload failed: {0}")]
    Reload(#[from] reload::Error),
}

/// Filter from `RUST_LOG`, if it is set and parses
pub fn env_filter() -> Option<EnvFilter> {
    EnvFilter::try_from_default_env().ok()
}

/// Install the global subscriber
pub fn init() -> FilterHandle {
    let filter = env_filter().unwrap_or_else(|| EnvFilter::new(BOOTSTRAP_LEVEL));
    let (filter, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();

    handle
}

/// Apply the configured level
///
/// Returns `Ok(false)` without touching the filter when `RUST_LOG` is set.
pub fn apply_config_level(handle: &FilterHandle, level: &str) -> Result<bool, LoggingError> {
    if env_filter().is_some() {
        return Ok(false);
    }

    let filter = EnvFilter::try_new(level)?;
    handle.reload(filter)?;
    Ok(true)
}
