//! Command-line arguments and bootstrap config resolution
//!
//! clap supplies the first two config tiers: an explicit flag, or failing
//! that the `MFCC_UI_*` environment variable. Whatever is left unset falls
//! through to the TOML file and then to compiled defaults.

use clap::Parser;
use mfcc_common::config::{ConfigOverrides, ConfigResolver, TomlConfig};
use std::path::PathBuf;
use tracing::{info, warn};

/// Module name used for the config file (`mfcc-ui.toml`)
pub const MODULE_NAME: &str = "mfcc-ui";

/// Command-line arguments for mfcc-ui
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "mfcc-ui")]
#[command(about = "Web UI for extracting MFCC features from uploaded audio files")]
#[command(version)]
pub struct Args {
    /// Path to TOML config file
    #[arg(short, long, env = "MFCC_UI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Host/interface to bind
    #[arg(long, env = "MFCC_UI_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "MFCC_UI_PORT")]
    pub port: Option<u16>,
}

impl Args {
    /// Values that win over the TOML file
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
        }
    }

    /// Load the TOML file, apply overrides, and validate the result
    pub fn load_config(&self) -> mfcc_common::Result<TomlConfig> {
        let config = ConfigResolver::new(MODULE_NAME)
            .load(self.config.as_deref())?
            .with_overrides(&self.overrides());
        config.validate()?;
        Ok(config)
    }

    /// Where [`Args::load_config`] reads its file values from
    pub fn config_source(&self) -> ConfigSource {
        let path = self
            .config
            .clone()
            .or_else(|| ConfigResolver::new(MODULE_NAME).default_config_path());

        match path {
            Some(path) if path.exists() => ConfigSource::File(path),
            Some(path) => ConfigSource::Missing(path),
            None => ConfigSource::NoConfigDir,
        }
    }
}

/// Origin of the file-tier config values
///
/// Config is loaded before the tracing subscriber exists, so the outcome is
/// reported again through [`ConfigSource::log`] once logging is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// Path resolved but nothing there; compiled defaults used
    Missing(PathBuf),
    /// Platform has no config directory; compiled defaults used
    NoConfigDir,
}

impl ConfigSource {
    pub fn log(&self) {
        match self {
            Self::File(path) => info!("Config file: {}", path.display()),
            Self::Missing(path) => warn!(
                "Config file not found at {}, using compiled defaults",
                path.display()
            ),
            Self::NoConfigDir => {
                warn!("Could not determine config directory, using compiled defaults")
            }
        }
    }

    pub fn uses_defaults(&self) -> bool {
        !matches!(self, Self::File(_))
    }
}
