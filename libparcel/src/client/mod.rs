//! HTTP client for parcel documents.
//!
//! This module provides a thin client built on reqwest that fetches the
//! versioned JSON documents of the protocol: the discovery object from the
//! well-known path of a canonical authority, and the distribution object
//! from whatever URL the discovery template composes to.

use crate::error::{ParcelError, Result, Stage};
use crate::name::Authority;
use crate::spec::v0::{self, Discovery};
use crate::spec::{VersionProbe, Versioned};
use reqwest::{Client as ReqwestClient, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;


/// The path which holds the discovery object JSON.
pub const DISCOVERY_PATH: &str = "/.well-known/cyphar.opencontainers.parcel.v0.json";

/// Configuration for the HTTP client.
///
/// # Examples
///
/// ```
/// use libparcel::client::ClientConfig;
///
/// let config = ClientConfig::new()
///     .with_timeout(60)
///     .with_insecure(true);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout in seconds (default: 30)
    pub timeout_seconds: u64,
    /// Use `http` instead of `https` (default: false)
    pub insecure: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            insecure: false,
        }
    }
}

impl ClientConfig {
    /// Creates a new configuration with default values.
    ///
    /// # Examples
    ///
    /// ```
    /// use libparcel::client::ClientConfig;
    ///
    /// let config = ClientConfig::new();
    /// assert_eq!(config.timeout_seconds, 30);
    /// assert!(!config.insecure);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request timeout in seconds.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Switches every URL the client builds to plain `http`.
    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }
}

impl From<&crate::config::Network> for ClientConfig {
    fn from(network: &crate::config::Network) -> Self {
        Self {
            timeout_seconds: network.timeout,
            insecure: network.insecure,
        }
    }
}

/// HTTP client for parcel documents.
#[derive(Debug, Clone)]
pub struct Client {
    /// The underlying HTTP client
    http_client: ReqwestClient,
    /// Scheme used for discovery URLs and composition bases
    scheme: &'static str,
    /// Request timeout, kept for error messages
    timeout_seconds: u64,
}

impl Client {
    /// Creates a new client with the default configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use libparcel::client::Client;
    ///
    /// let client = Client::new().unwrap();
    /// assert_eq!(client.scheme(), "https");
    /// ```
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a new client with a custom configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                ParcelError::config_with_source("Failed to create HTTP client", None, e)
            })?;

        Ok(Self {
            http_client,
            scheme: if config.insecure { "http" } else { "https" },
            timeout_seconds: config.timeout_seconds,
        })
    }

    /// Returns the scheme used for URLs this client builds.
    pub fn scheme(&self) -> &'static str {
        self.scheme
    }

    /// Returns `<scheme>://<authority>`, the base that composed references
    /// are resolved against.
    ///
    /// # Examples
    ///
    /// ```
    /// use libparcel::client::Client;
    /// use libparcel::name::Authority;
    ///
    /// let client = Client::new().unwrap();
    /// let authority: Authority = "example.com:8443".parse().unwrap();
    /// let base = client.base_url(&authority).unwrap();
    /// assert_eq!(base.as_str(), "https://example.com:8443/");
    /// ```
    pub fn base_url(&self, authority: &Authority) -> Result<Url> {
        self.base_url_for(authority, Stage::Compose)
    }

    /// Returns the URL of the discovery object served by `authority`.
    ///
    /// # Examples
    ///
    /// ```
    /// use libparcel::client::Client;
    /// use libparcel::name::Authority;
    ///
    /// let client = Client::new().unwrap();
    /// let authority: Authority = "example.com".parse().unwrap();
    /// let url = client.discovery_url(&authority).unwrap();
    /// assert_eq!(
    ///     url.as_str(),
    ///     "https://example.com/.well-known/cyphar.opencontainers.parcel.v0.json"
    /// );
    /// ```
    pub fn discovery_url(&self, authority: &Authority) -> Result<Url> {
        let mut url = self.base_url_for(authority, Stage::FetchDiscovery)?;
        url.set_path(DISCOVERY_PATH);
        Ok(url)
    }

    fn base_url_for(&self, authority: &Authority, stage: Stage) -> Result<Url> {
        let raw = format!("{}://{}", self.scheme, authority);
        Url::parse(&raw).map_err(|e| ParcelError::UriParse {
            stage,
            uri: raw,
            message: "invalid base URL".to_string(),
            source: Some(Box::new(e)),
        })
    }

    /// Fetches and version-checks the discovery object of `authority`.
    pub async fn fetch_discovery(&self, authority: &Authority) -> Result<Discovery> {
        let url = self.discovery_url(authority)?;
        self.fetch_versioned(&url, Stage::FetchDiscovery).await
    }

    /// Fetches a versioned document from `url`.
    ///
    /// Exactly one GET is issued and the whole body is read before it is
    /// decoded. The `parcelVersion` header is checked before the rest of the
    /// document is decoded, so a document for another protocol version is
    /// never handed back, whatever its shape.
    ///
    /// # Errors
    ///
    /// - `Transport` if the request cannot be completed
    /// - `Status` if the server does not answer with a success status
    /// - `Decode` if the body is not the expected JSON document
    /// - `VersionMismatch` if the document is not a `v0` document
    pub async fn fetch_versioned<T>(&self, url: &Url, stage: Stage) -> Result<T>
    where
        T: DeserializeOwned + Versioned,
    {
        debug!(%url, %stage, "fetching parcel document");

        let response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.translate_reqwest_error(e, url, stage))?;

        let response = Self::check_response_status(response, stage)?;

        let body = response.bytes().await.map_err(|e| {
            ParcelError::transport_with_source(stage, format!("Failed to read response from {url}"), e)
        })?;

        decode_versioned(&body, stage)
    }

    /// Translates a reqwest error into a ParcelError.
    fn translate_reqwest_error(&self, error: reqwest::Error, url: &Url, stage: Stage) -> ParcelError {
        if error.is_timeout() {
            ParcelError::transport(
                stage,
                format!(
                    "Request to {} timed out after {} seconds",
                    url, self.timeout_seconds
                ),
            )
        } else if error.is_connect() {
            ParcelError::transport_with_source(stage, format!("Failed to connect to {}", url), error)
        } else {
            ParcelError::transport_with_source(
                stage,
                format!("Network error communicating with {}", url),
                error,
            )
        }
    }

    /// Rejects non-success responses.
    fn check_response_status(response: Response, stage: Stage) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        Err(ParcelError::Status {
            stage,
            url: response.url().to_string(),
            status_code: status.as_u16(),
        })
    }
}

/// Decodes a versioned document, checking its version first.
pub(crate) fn decode_versioned<T>(body: &[u8], stage: Stage) -> Result<T>
where
    T: DeserializeOwned + Versioned,
{
    let probe: VersionProbe = serde_json::from_slice(body).map_err(|e| {
        ParcelError::decode_with_source(stage, "Failed to parse parcel document", e)
    })?;
    if probe.parcel_version() != v0::VERSION {
        return Err(ParcelError::version_mismatch(stage, probe.parcel_version));
    }

    serde_json::from_slice(body).map_err(|e| {
        ParcelError::decode_with_source(stage, "Failed to parse parcel document", e)
    })
}
