//! Application context that holds resolved configuration
//!
//! The context is built following the precedence order:
//! 1. Default values
//! 2. Config file values
//! 3. Environment variables
//! 4. CLI flags
//!
//! Once built, the context is passed as read-only throughout the application.

use crate::format::OutputFormat;
use libparcel::{Config, Parcel};
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "PARCEL_CONFIG";
/// Environment variable forcing plain-HTTP fetches.
pub const INSECURE_ENV: &str = "PARCEL_INSECURE";

/// How much diagnostic output to emit on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VerbosityLevel {
    /// Warnings and errors only
    Normal,
    /// Informational events, such as a name settling on a new authority
    Verbose,
    /// Every alias hop and fetch
    Debug,
    /// Everything, including dependency internals
    Trace,
}

impl VerbosityLevel {
    /// Map the number of `-v` flags to a level.
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => VerbosityLevel::Normal,
            1 => VerbosityLevel::Verbose,
            2 => VerbosityLevel::Debug,
            _ => VerbosityLevel::Trace,
        }
    }

    /// Filter directive handed to `tracing_subscriber::EnvFilter`.
    pub fn filter_directive(self) -> &'static str {
        match self {
            VerbosityLevel::Normal => "warn",
            VerbosityLevel::Verbose => "info",
            VerbosityLevel::Debug => "debug",
            VerbosityLevel::Trace => "trace",
        }
    }
}

/// Settings given on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub insecure: bool,
    pub timeout: Option<u64>,
}

/// Application context with resolved configuration and runtime state
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Resolved configuration
    pub config: Config,
    /// Output format for command results
    pub format: OutputFormat,
}

impl AppContext {
    /// Build context with precedence: defaults > config file > env vars > CLI flags
    pub fn build(overrides: &CliOverrides, format: OutputFormat) -> libparcel::Result<Self> {
        // 1 + 2. Defaults, merged with the config file if there is one
        let mut config = match config_path(overrides.config_path.as_deref()) {
            ConfigSource::Explicit(path) => Config::load(Some(&path))?,
            ConfigSource::Default(path) if path.exists() => Config::load(Some(&path))?,
            ConfigSource::Default(_) | ConfigSource::None => Config::default(),
        };

        // 3. Environment variable overrides
        if env::var(INSECURE_ENV).is_ok_and(|v| is_truthy(&v)) {
            config.network.insecure = true;
        }

        // 4. CLI flag overrides
        if overrides.insecure {
            config.network.insecure = true;
        }
        if let Some(timeout) = overrides.timeout {
            config.network.timeout = timeout;
        }

        Ok(Self { config, format })
    }

    /// Create a discovery client from the resolved configuration.
    pub fn parcel(&self) -> libparcel::Result<Parcel> {
        Parcel::from_config(&self.config)
    }
}

/// Where the config file comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Named by `--config` or `$PARCEL_CONFIG`; must exist.
    Explicit(PathBuf),
    /// The per-user default; used only if present.
    Default(PathBuf),
    /// No config directory on this platform.
    None,
}

/// Work out which config file to read.
pub fn config_path(flag: Option<&Path>) -> ConfigSource {
    if let Some(path) = flag {
        return ConfigSource::Explicit(path.to_path_buf());
    }
    if let Some(path) = env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return ConfigSource::Explicit(PathBuf::from(path));
    }
    match dirs::config_dir() {
        Some(dir) => ConfigSource::Default(dir.join("parcel").join("config.yaml")),
        None => ConfigSource::None,
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
