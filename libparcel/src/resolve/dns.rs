//! TXT lookup backends.

use crate::config::Dns as DnsConfig;
use crate::error::{ParcelError, Result};
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{NameServerConfig, Protocol, ResolverConfig, ResolverOpts};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};

/// Source of DNS TXT records.
///
/// Implementations return every TXT record published for `host`, with the
/// character-strings of each record concatenated. Any failure (including
/// "no such name") is reported as an error; the alias chase treats all
/// errors alike.
pub trait TxtLookup: Send + Sync {
    /// Looks up the TXT records of `host`.
    fn lookup_txt(&self, host: &str) -> impl Future<Output = Result<Vec<String>>> + Send;
}

/// TXT lookups through hickory-resolver.
#[derive(Clone)]
pub struct DnsTxtLookup {
    resolver: TokioAsyncResolver,
}

impl std::fmt::Debug for DnsTxtLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsTxtLookup").finish_non_exhaustive()
    }
}

impl DnsTxtLookup {
    /// Uses the operating system's resolver configuration.
    pub fn from_system_conf() -> Result<Self> {
        let (config, opts) = hickory_resolver::system_conf::read_system_conf().map_err(|e| {
            ParcelError::config_with_source(
                "Failed to read system resolver configuration",
                None,
                e,
            )
        })?;
        Ok(Self {
            resolver: TokioAsyncResolver::tokio(config, uncached(opts)),
        })
    }

    /// Builds a lookup from the `dns` section of the configuration.
    pub fn from_config(config: &DnsConfig) -> Result<Self> {
        let nameservers = config.nameserver_addrs()?;
        if nameservers.is_empty() {
            return Self::from_system_conf();
        }

        let mut resolver_config = ResolverConfig::new();
        for addr in nameservers {
            resolver_config.add_name_server(NameServerConfig::new(addr, Protocol::Udp));
            resolver_config.add_name_server(NameServerConfig::new(addr, Protocol::Tcp));
        }

        Ok(Self {
            resolver: TokioAsyncResolver::tokio(resolver_config, uncached(ResolverOpts::default())),
        })
    }
}

/// Turns off hickory's answer cache; every lookup goes to the network.
pub(super) fn uncached(mut opts: ResolverOpts) -> ResolverOpts {
    opts.cache_size = 0;
    opts
}

impl TxtLookup for DnsTxtLookup {
    async fn lookup_txt(&self, host: &str) -> Result<Vec<String>> {
        // IP literals have no TXT records of their own.
        if host.parse::<IpAddr>().is_ok() {
            return Ok(Vec::new());
        }

        let lookup = self
            .resolver
            .txt_lookup(host)
            .await
            .map_err(|e| ParcelError::dns_with_source(host, e))?;

        Ok(lookup
            .iter()
            .map(|txt| {
                txt.txt_data()
                    .iter()
                    .map(|chunk| String::from_utf8_lossy(chunk))
                    .collect::<String>()
            })
            .collect())
    }
}

/// In-memory TXT records.
///
/// Hosts without records behave like non-existent names and fail the
/// lookup. Every query is recorded and can be inspected with
/// [`StaticTxtLookup::queries`].
///
/// # Examples
///
/// ```
/// use libparcel::resolve::StaticTxtLookup;
///
/// let dns = StaticTxtLookup::new()
///     .with_records("a.test", ["cyphar.opencontainers.parcel.v0=b.test;"])
///     .with_failure("b.test");
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticTxtLookup {
    records: HashMap<String, Vec<String>>,
    failures: HashSet<String>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl StaticTxtLookup {
    /// Creates an empty record set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes `records` for `host`.
    pub fn with_records<I, S>(mut self, host: &str, records: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.records
            .entry(host.to_string())
            .or_default()
            .extend(records.into_iter().map(Into::into));
        self
    }

    /// Makes every lookup of `host` fail.
    pub fn with_failure(mut self, host: &str) -> Self {
        self.failures.insert(host.to_string());
        self
    }

    /// Returns the hosts queried so far, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .map(|queries| queries.clone())
            .unwrap_or_default()
    }
}

impl TxtLookup for StaticTxtLookup {
    fn lookup_txt(&self, host: &str) -> impl Future<Output = Result<Vec<String>>> + Send {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(host.to_string());
        }

        let result = if self.failures.contains(host) {
            Err(ParcelError::Dns {
                host: host.to_string(),
                message: "lookup failed".to_string(),
                source: None,
            })
        } else {
            self.records.get(host).cloned().ok_or_else(|| ParcelError::Dns {
                host: host.to_string(),
                message: "no such name".to_string(),
                source: None,
            })
        };

        async move { result }
    }
}
