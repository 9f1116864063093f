//! High-level API for the parcel library.
//!
//! [`Parcel`] strings the pieces together: alias resolution, the discovery
//! fetch, template composition and, for [`Parcel::discover`], the
//! distribution fetch. Every call starts from scratch; nothing is cached
//! between calls.
//!
//! # Examples
//!
//! ```no_run
//! use libparcel::Parcel;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let parcel = Parcel::new()?;
//!
//!     let canonical = parcel.resolve("example.com/myimage").await?;
//!     println!("canonical name: {}", canonical);
//!
//!     let discovered = parcel.discover("example.com/myimage", None).await?;
//!     for index in &discovered.distribution.index_uris {
//!         println!("index template: {}", index.as_str());
//!     }
//!
//!     Ok(())
//! }
//! ```

use crate::client::{Client, ClientConfig};
use crate::compose::{self, Variables};
use crate::config::Config;
use crate::error::{Result, Stage};
use crate::name::Name;
use crate::resolve::{AliasResolver, DnsTxtLookup, TxtLookup};
use crate::spec::v0::{Discovery, Distribution};
use serde::Serialize;
use std::str::FromStr;
use tracing::debug;
use url::Url;

/// Result of a successful [`Parcel::discover`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Discovered {
    /// Where the distribution object was fetched from.
    pub url: Url,
    /// The version-checked distribution object.
    pub distribution: Distribution,
    /// The variables the distribution template was expanded with, reserved
    /// keys included.
    pub variables: Variables,
}

/// High-level interface for parcel discovery.
///
/// `Parcel` holds an HTTP client and an alias resolver. Both are immutable,
/// so a single `Parcel` can serve any number of concurrent calls.
///
/// # Examples
///
/// ## Default settings
///
/// ```no_run
/// use libparcel::Parcel;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let parcel = Parcel::new()?;
///     let url = parcel.explore("example.com/myimage").await?;
///     println!("distribution object lives at {}", url);
///     Ok(())
/// }
/// ```
///
/// ## Custom DNS records
///
/// ```no_run
/// use libparcel::Parcel;
/// use libparcel::resolve::StaticTxtLookup;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let dns = StaticTxtLookup::new()
///         .with_records("example.com", ["cyphar.opencontainers.parcel.v0=mirror.example.org;"]);
///     let parcel = Parcel::builder().build_with_lookup(dns)?;
///     assert_eq!(
///         parcel.resolve("example.com/myimage").await?,
///         "mirror.example.org/myimage"
///     );
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Parcel<L = DnsTxtLookup> {
    client: Client,
    resolver: AliasResolver<L>,
}

impl Parcel<DnsTxtLookup> {
    /// Creates a `Parcel` with default settings and the system resolver.
    pub fn new() -> Result<Self> {
        ParcelBuilder::new().build()
    }

    /// Creates a `Parcel` from a loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        ParcelBuilder::new().with_config(config.clone()).build()
    }

    /// Create a builder for advanced configuration.
    pub fn builder() -> ParcelBuilder {
        ParcelBuilder::new()
    }
}

impl<L: TxtLookup> Parcel<L> {
    /// Returns the HTTP client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Returns the TXT lookup backend.
    pub fn lookup(&self) -> &L {
        self.resolver.lookup()
    }

    /// Resolves `name` to its canonical name by chasing DNS aliases.
    ///
    /// See [`AliasResolver::resolve`].
    pub async fn resolve(&self, name: &str) -> Result<String> {
        self.resolver.resolve(name).await
    }

    /// Fetches the discovery object of an already-resolved name.
    pub async fn fetch(&self, canonical: &str) -> Result<Discovery> {
        let canonical = Name::from_str(canonical)?;
        self.client.fetch_discovery(canonical.authority()).await
    }

    /// Computes where the distribution object of `name` lives, without
    /// fetching it.
    ///
    /// Only the variables that need no caller context are set
    /// (`parcel.version` and `parcel.discovery.name`); anything else in the
    /// template expands to nothing.
    pub async fn explore(&self, name: &str) -> Result<Url> {
        let canonical = Name::from_str(&self.resolve(name).await?)?;
        let discovery = self.client.fetch_discovery(canonical.authority()).await?;

        let variables = compose::exploration_variables(&canonical);
        let base = self.client.base_url(canonical.authority())?;
        let url = compose::compose(discovery.distribution_uri.as_str(), &variables, &base)?;

        debug!(%name, %url, "explored distribution location");
        Ok(url)
    }

    /// Runs the whole discovery: resolve, fetch the discovery object,
    /// compose the distribution URL and fetch the distribution object.
    ///
    /// `variables` are extra template variables. The reserved
    /// `parcel.*` keys are always computed here and replace whatever the
    /// caller passed; the mapping actually used is returned in
    /// [`Discovered::variables`]. The caller's mapping is not modified.
    ///
    /// # Errors
    ///
    /// Any error from resolution, either fetch, or composition. Errors carry
    /// the [`Stage`](crate::error::Stage) they came from.
    pub async fn discover(&self, name: &str, variables: Option<&Variables>) -> Result<Discovered> {
        let user = Name::from_str(name)?;
        let canonical = Name::from_str(&self.resolve(name).await?)?;
        let discovery = self.client.fetch_discovery(canonical.authority()).await?;

        let variables = compose::augment(variables, &user, &canonical);
        let base = self.client.base_url(canonical.authority())?;
        let url = compose::compose(discovery.distribution_uri.as_str(), &variables, &base)?;
        debug!(%name, %url, "composed distribution location");

        let distribution = self
            .client
            .fetch_versioned(&url, Stage::FetchDistribution)
            .await?;

        Ok(Discovered {
            url,
            distribution,
            variables,
        })
    }
}

/// Builder for creating a [`Parcel`] instance with custom configuration.
///
/// # Examples
///
/// ```no_run
/// use libparcel::Parcel;
///
/// # fn main() -> libparcel::Result<()> {
/// let parcel = Parcel::builder()
///     .insecure(true)
///     .timeout(10)
///     .max_aliases(4)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParcelBuilder {
    config: Config,
}

impl ParcelBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces all settings with `config`.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Fetch over `http://` instead of `https://`.
    pub fn insecure(mut self, insecure: bool) -> Self {
        self.config.network.insecure = insecure;
        self
    }

    /// Sets the per-request timeout in seconds.
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.config.network.timeout = seconds;
        self
    }

    /// Sets the longest alias chain that will be followed.
    pub fn max_aliases(mut self, max_aliases: usize) -> Self {
        self.config.dns.max_aliases = max_aliases;
        self
    }

    /// Builds a `Parcel` that looks TXT records up through DNS.
    pub fn build(self) -> Result<Parcel<DnsTxtLookup>> {
        let lookup = DnsTxtLookup::from_config(&self.config.dns)?;
        self.build_with_lookup(lookup)
    }

    /// Builds a `Parcel` on top of a custom TXT lookup backend.
    pub fn build_with_lookup<L: TxtLookup>(self, lookup: L) -> Result<Parcel<L>> {
        let client = Client::with_config(ClientConfig::from(&self.config.network))?;
        let resolver = AliasResolver::new(lookup).with_max_aliases(self.config.dns.max_aliases);

        Ok(Parcel { client, resolver })
    }
}

#[cfg(test)]
#[path = "parcel_tests.rs"]
mod tests;
