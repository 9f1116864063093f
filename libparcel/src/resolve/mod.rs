//! Alias resolution over DNS TXT records.
//!
//! A discovery name can be redirected to another authority by publishing a
//! TXT record of the form `cyphar.opencontainers.parcel.v0=<host[:port]>;`
//! on its host. [`AliasResolver`] follows those records until the host stops
//! changing and returns the "canonical" name, which is where the discovery
//! object is fetched from.
//!
//! The chase ends in one of four ways:
//!
//! - no matching record: the current host is canonical
//! - a record pointing at the current host: fixed point, same as above
//! - a failed lookup: soft degrade, the current host is canonical (a failure
//!   on the very first lookup therefore returns the input unchanged)
//! - a host seen earlier in the chain, or a chain longer than the configured
//!   limit: an error

use crate::error::{ParcelError, Result, Stage};
use crate::name::{Authority, Name};
use regex::Regex;
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

mod dns;
pub use dns::{DnsTxtLookup, StaticTxtLookup, TxtLookup};


/// Format of the TXT records used for parcel aliases.
pub static DISCOVERY_TXT_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^cyphar\.opencontainers\.parcel\.v0=(.+);$").expect("alias pattern is valid")
});

/// Default bound on the number of aliases followed.
pub const DEFAULT_MAX_ALIASES: usize = 16;

/// Extracts the alias values from a set of TXT records.
///
/// Records that do not match [`DISCOVERY_TXT_FORMAT`] are ignored. The
/// result is sorted and deduplicated.
///
/// # Examples
///
/// ```
/// use libparcel::resolve::parse_aliases;
///
/// let records = vec![
///     "v=spf1 -all".to_string(),
///     "cyphar.opencontainers.parcel.v0=mirror.example.org;".to_string(),
/// ];
/// assert_eq!(parse_aliases(&records), vec!["mirror.example.org"]);
/// ```
pub fn parse_aliases(records: &[String]) -> Vec<String> {
    let mut aliases: Vec<String> = records
        .iter()
        .filter_map(|record| DISCOVERY_TXT_FORMAT.captures(record))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect();
    aliases.sort();
    aliases.dedup();
    aliases
}

/// Follows DNS TXT aliases from a discovery name to its canonical name.
#[derive(Debug, Clone)]
pub struct AliasResolver<L> {
    lookup: L,
    max_aliases: usize,
}

impl<L: TxtLookup> AliasResolver<L> {
    /// Creates a resolver on top of a TXT lookup backend.
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            max_aliases: DEFAULT_MAX_ALIASES,
        }
    }

    /// Sets the longest alias chain that will be followed.
    pub fn with_max_aliases(mut self, max_aliases: usize) -> Self {
        self.max_aliases = max_aliases;
        self
    }

    /// Returns the lookup backend.
    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Resolves `name` (`host[:port]/path`) to its canonical name.
    ///
    /// The path and, unless an alias names its own, the port are carried
    /// over unchanged. The result has no scheme.
    ///
    /// # Examples
    ///
    /// ```
    /// use libparcel::resolve::{AliasResolver, StaticTxtLookup};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> libparcel::Result<()> {
    /// let dns = StaticTxtLookup::new()
    ///     .with_records("example.com", ["cyphar.opencontainers.parcel.v0=mirror.example.org;"]);
    /// let resolver = AliasResolver::new(dns);
    ///
    /// let canonical = resolver.resolve("example.com/myimage").await?;
    /// assert_eq!(canonical, "mirror.example.org/myimage");
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// - `MissingAuthority` if `name` has no `authority/` prefix
    /// - `InvalidName` if the authority cannot be parsed
    /// - `CycleDetected` if an alias leads back to a host already visited
    /// - `AliasLimitExceeded` if the chain is longer than the configured limit
    pub async fn resolve(&self, name: &str) -> Result<String> {
        let parsed = Name::from_str(name)?;
        let canonical = self.chase(parsed.authority().clone()).await?;

        if &canonical != parsed.authority() {
            info!(%name, authority = %canonical, "resolved alias");
        }
        Ok(parsed.with_authority(canonical).to_string())
    }

    /// Chases aliases starting at `start` and returns the final authority.
    pub async fn chase(&self, start: Authority) -> Result<Authority> {
        let mut current = start;
        let mut chain = vec![current.to_string()];
        let mut visited: HashSet<Authority> = HashSet::from([current.clone()]);

        loop {
            let records = match self.lookup.lookup_txt(current.host()).await {
                Ok(records) => records,
                Err(err) => {
                    debug!(host = %current.host(), error = %err, "TXT lookup failed, alias chase ends here");
                    return Ok(current);
                }
            };

            let aliases: Vec<Authority> = parse_aliases(&records)
                .into_iter()
                .filter_map(|alias| match Authority::from_str(&alias) {
                    Ok(authority) => Some(authority),
                    Err(err) => {
                        warn!(host = %current.host(), %alias, error = %err, "ignoring malformed parcel alias");
                        None
                    }
                })
                .collect();
            let Some(selected) = aliases.first() else {
                return Ok(current);
            };
            if aliases.len() > 1 {
                warn!(
                    host = %current.host(),
                    candidates = aliases.len(),
                    selected = %selected,
                    "multiple parcel aliases published, using the first in lexical order"
                );
            }

            let next = selected.clone().or_port(current.port());
            if next == current {
                return Ok(current);
            }
            debug!(from = %current, to = %next, "following alias");
            chain.push(next.to_string());

            if !visited.insert(next.clone()) {
                return Err(ParcelError::CycleDetected {
                    stage: Stage::Resolve,
                    chain,
                });
            }
            if chain.len() > self.max_aliases + 1 {
                return Err(ParcelError::AliasLimitExceeded {
                    stage: Stage::Resolve,
                    limit: self.max_aliases,
                    chain,
                });
            }

            current = next;
        }
    }
}
