//! Tracing subscriber setup shared by the service binaries

use crate::{Error, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Crates whose events follow the configured level
const WORKSPACE_TARGETS: &[&str] = &["mfcc_ui", "mfcc_extractor", "mfcc_common", "tower_http"];

/// Filter directives applied when `RUST_LOG` is not set
pub fn default_directives(level: &str) -> String {
    WORKSPACE_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over `level` so a single run can be made
/// more verbose without editing the config file.
pub fn init_tracing(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| Error::Internal(format!("Failed to initialize tracing: {}", e)))
}
