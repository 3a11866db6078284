//! Bootstrap configuration loading
//!
//! Settings are resolved per field in this priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Tiers 1 and 2 are parsed by the binary (clap handles the env fallback) and
//! arrive here as [`ConfigOverrides`]. A missing TOML file is not an error:
//! the service logs a warning and starts with compiled defaults. A TOML file
//! that exists but cannot be parsed IS an error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Directory name under the platform config dir
pub const APP_DIR_NAME: &str = "mfcc-lab";

/// Default HTTP bind host (loopback only)
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5790;

/// Default upper bound for an uploaded request body (64 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Bootstrap configuration loaded from TOML file
///
/// Read once at startup. The service must restart to pick up changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Host/interface to bind the HTTP listener to
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted request body in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Apply CLI/environment overrides on top of file values
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(host) = &overrides.host {
            self.host = host.clone();
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        self
    }

    /// Reject values the service cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::Config("host must not be empty".to_string()));
        }
        if self.max_upload_bytes == 0 {
            return Err(Error::Config(
                "max_upload_bytes must be greater than zero".to_string(),
            ));
        }
        self.logging
            .level
            .parse::<tracing::Level>()
            .map_err(|_| {
                Error::Config(format!(
                    "Invalid logging.level '{}': expected trace, debug, info, warn or error",
                    self.logging.level
                ))
            })?;
        Ok(())
    }

    /// `host:port` string for binding the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Locates and loads the TOML file for one service module
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    module_name: String,
}

impl ConfigResolver {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
        }
    }

    /// Default config file location for this module
    ///
    /// `<config dir>/mfcc-lab/<module>.toml`, e.g.
    /// `~/.config/mfcc-lab/mfcc-ui.toml` on Linux.
    pub fn default_config_path(&self) -> Option<PathBuf> {
        dirs::config_dir().map(|d| {
            d.join(APP_DIR_NAME)
                .join(format!("{}.toml", self.module_name))
        })
    }

    /// Load configuration from `explicit_path`, or the default location
    ///
    /// Missing files fall back to compiled defaults with a warning.
    pub fn load(&self, explicit_path: Option<&Path>) -> Result<TomlConfig> {
        let path = match explicit_path {
            Some(p) => p.to_path_buf(),
            None => match self.default_config_path() {
                Some(p) => p,
                None => {
                    warn!("Could not determine config directory, using compiled defaults");
                    return Ok(TomlConfig::default());
                }
            },
        };

        load_toml_config(&path)
    }
}

/// Load a TOML config file, degrading to defaults if it does not exist
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!(
            "Config file not found at {}, using compiled defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config = TomlConfig::from_toml_str(&content)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}
