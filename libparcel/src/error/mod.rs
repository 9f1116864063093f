//! Error types for parcel
//!
//! Every failure a discovery operation can produce is a [`ParcelError`].
//! Errors raised after the input name has been parsed carry the [`Stage`]
//! that produced them, so callers can tell a failed discovery fetch from a
//! failed distribution fetch.

use std::fmt;
use thiserror::Error;

#[cfg(test)]
mod tests;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The pipeline stage an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Alias chasing over DNS.
    Resolve,
    /// Fetching the discovery object.
    FetchDiscovery,
    /// Template expansion and reference resolution.
    Compose,
    /// Fetching the distribution object.
    FetchDistribution,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Resolve => "resolve",
            Stage::FetchDiscovery => "fetch discovery",
            Stage::Compose => "compose",
            Stage::FetchDistribution => "fetch distribution",
        };
        f.write_str(name)
    }
}

/// Main error type for parcel operations
#[derive(Error, Debug)]
pub enum ParcelError {
    /// The name has no `authority/` prefix.
    #[error("{stage}: no authority specified in {name:?}")]
    MissingAuthority { stage: Stage, name: String },

    /// The name (or an alias value) is not a valid `host[:port]/path`.
    #[error("{stage}: invalid discovery name {name:?}: {message}")]
    InvalidName {
        stage: Stage,
        name: String,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The alias chase revisited a host it had already left.
    #[error("{stage}: alias cycle detected: {}", chain.join(" -> "))]
    CycleDetected { stage: Stage, chain: Vec<String> },

    /// The alias chase followed more aliases than allowed.
    #[error("{stage}: alias chain longer than {limit}: {}", chain.join(" -> "))]
    AliasLimitExceeded {
        stage: Stage,
        limit: usize,
        chain: Vec<String>,
    },

    /// A TXT lookup failed. Only produced by lookup backends; the alias
    /// chase treats it as the end of the chain.
    #[error("DNS lookup for {host} failed: {message}")]
    Dns {
        host: String,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The HTTP request could not be completed.
    #[error("{stage}: {message}")]
    Transport {
        stage: Stage,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The server answered with a non-success status.
    #[error("{stage}: HTTP {status_code} from {url}")]
    Status {
        stage: Stage,
        url: String,
        status_code: u16,
    },

    /// The response body is not the expected JSON document.
    #[error("{stage}: {message}")]
    Decode {
        stage: Stage,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The document declares a protocol version other than the supported one.
    #[error("{stage}: unknown version {found:?} (expected {expected:?})")]
    VersionMismatch {
        stage: Stage,
        found: String,
        expected: String,
    },

    /// The URI template is malformed or cannot be expanded.
    #[error("{stage}: invalid URI template {template:?}: {message}")]
    Template {
        stage: Stage,
        template: String,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// A URI reference could not be parsed or resolved.
    #[error("{stage}: invalid URI {uri:?}: {message}")]
    UriParse {
        stage: Stage,
        uri: String,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Configuration errors (invalid config file, bad nameserver, ...)
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<String>,
        #[source]
        source: Option<BoxError>,
    },
}

/// Result type alias for parcel operations
pub type Result<T> = std::result::Result<T, ParcelError>;

impl ParcelError {
    /// Creates a missing authority error for `name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use libparcel::error::{ParcelError, Stage};
    ///
    /// let err = ParcelError::missing_authority("myimage");
    /// assert!(matches!(err, ParcelError::MissingAuthority { stage: Stage::Resolve, .. }));
    /// ```
    pub fn missing_authority<S: Into<String>>(name: S) -> Self {
        Self::MissingAuthority {
            stage: Stage::Resolve,
            name: name.into(),
        }
    }

    /// Creates an invalid name error.
    pub fn invalid_name<S, M>(name: S, message: M) -> Self
    where
        S: Into<String>,
        M: Into<String>,
    {
        Self::InvalidName {
            stage: Stage::Resolve,
            name: name.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a DNS lookup error with a source error.
    pub fn dns_with_source<S, E>(host: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Dns {
            host: host.into(),
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a transport error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libparcel::error::{ParcelError, Stage};
    ///
    /// let err = ParcelError::transport(Stage::FetchDiscovery, "connection refused");
    /// assert_eq!(err.to_string(), "fetch discovery: connection refused");
    /// ```
    pub fn transport<S: Into<String>>(stage: Stage, message: S) -> Self {
        Self::Transport {
            stage,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a transport error with a source error.
    pub fn transport_with_source<S, E>(stage: Stage, message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport {
            stage,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a decode error with a source error.
    pub fn decode_with_source<S, E>(stage: Stage, message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Decode {
            stage,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a version mismatch error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libparcel::error::{ParcelError, Stage};
    ///
    /// let err = ParcelError::version_mismatch(Stage::FetchDistribution, "v1");
    /// assert!(err.to_string().contains("\"v1\""));
    /// ```
    pub fn version_mismatch<S: Into<String>>(stage: Stage, found: S) -> Self {
        Self::VersionMismatch {
            stage,
            found: found.into(),
            expected: crate::spec::v0::VERSION.to_string(),
        }
    }

    /// Creates a configuration error.
    pub fn config<S: Into<String>>(message: S, path: Option<S>) -> Self {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: None,
        }
    }

    /// Creates a configuration error with a source error.
    pub fn config_with_source<S, E>(message: S, path: Option<S>, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: Some(Box::new(source)),
        }
    }

    /// Returns the stage this error was raised in, if it belongs to one.
    ///
    /// DNS and configuration errors happen outside the pipeline proper and
    /// return `None`.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::MissingAuthority { stage, .. }
            | Self::InvalidName { stage, .. }
            | Self::CycleDetected { stage, .. }
            | Self::AliasLimitExceeded { stage, .. }
            | Self::Transport { stage, .. }
            | Self::Status { stage, .. }
            | Self::Decode { stage, .. }
            | Self::VersionMismatch { stage, .. }
            | Self::Template { stage, .. }
            | Self::UriParse { stage, .. } => Some(*stage),
            Self::Dns { .. } | Self::Config { .. } => None,
        }
    }
}
