//! Library configuration.
//!
//! This module manages discovery settings with sensible defaults, loaded
//! from a YAML file layered over the built-in values.

use crate::error::{ParcelError, Result};
use config::{Config as ConfigRs, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

#[cfg(test)]
mod tests;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub network: Network,
    #[serde(default)]
    pub dns: Dns,
}

impl Config {
    /// Parses a `Config` from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let builder = Self::defaults()?.add_source(File::from_str(s, FileFormat::Yaml));

        Self::from_builder(builder, None)
    }

    /// Loads a `Config` from an optional file path.
    ///
    /// Without a path the defaults are returned. A path that is given must
    /// exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Self::defaults()?;

        if let Some(p) = path {
            builder = builder.add_source(File::from(p).required(true));
        }

        Self::from_builder(builder, path)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let defaults = ConfigRs::try_from(&Config::default()).map_err(|e| {
            ParcelError::config_with_source("Failed to encode default configuration", None, e)
        })?;
        Ok(ConfigRs::builder().add_source(defaults))
    }

    /// Creates a `Config` from a `config::ConfigBuilder`.
    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        path: Option<&Path>,
    ) -> Result<Self> {
        builder
            .build()
            .and_then(|cfg| cfg.try_deserialize())
            .map_err(|e| {
                ParcelError::config_with_source(
                    "Failed to deserialize configuration".to_string(),
                    path.map(|p| p.display().to_string()),
                    e,
                )
            })
    }
}

/// HTTP settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Network {
    /// Per-request timeout in seconds.
    #[serde(default = "default_network_timeout")]
    pub timeout: u64,

    /// Fetch over plain `http://` instead of `https://`.
    #[serde(default)]
    pub insecure: bool,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            timeout: default_network_timeout(),
            insecure: false,
        }
    }
}

fn default_network_timeout() -> u64 {
    30
}

/// Alias resolution settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dns {
    /// Nameservers as `ip:port`. Empty means the system configuration.
    #[serde(default)]
    pub nameservers: Vec<String>,

    /// Longest alias chain that will be followed.
    #[serde(default = "default_max_aliases")]
    pub max_aliases: usize,
}

impl Default for Dns {
    fn default() -> Self {
        Self {
            nameservers: Vec::new(),
            max_aliases: default_max_aliases(),
        }
    }
}

fn default_max_aliases() -> usize {
    16
}

impl Dns {
    /// Parses the configured nameservers.
    pub fn nameserver_addrs(&self) -> Result<Vec<SocketAddr>> {
        self.nameservers
            .iter()
            .map(|ns| {
                ns.parse::<SocketAddr>().map_err(|e| {
                    ParcelError::config_with_source(format!("Invalid nameserver {ns:?}"), None, e)
                })
            })
            .collect()
    }
}
