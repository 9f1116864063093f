//! Discovery name parsing.
//!
//! A discovery name has the form `authority[:port]/path`; there is no
//! scheme. The authority is mandatory: callers that want a default authority
//! have to prepend it themselves.

use crate::error::{ParcelError, Result};
use std::fmt;
use std::str::FromStr;


/// The `host[:port]` part of a discovery name.
///
/// IPv6 hosts are stored without brackets and printed with them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Authority {
    host: String,
    port: Option<u16>,
}

impl Authority {
    /// Returns the host, without brackets for IPv6 literals.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port, if one was given.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Returns a copy of this authority with `port` filled in, unless it
    /// already names a port of its own.
    pub fn or_port(self, port: Option<u16>) -> Self {
        Self {
            port: self.port.or(port),
            ..self
        }
    }
}

fn parse_authority(input: &str) -> std::result::Result<Authority, String> {
    let (host, port) = if let Some(rest) = input.strip_prefix('[') {
        let (host, after) = rest
            .split_once(']')
            .ok_or_else(|| "missing ']' after IPv6 host".to_string())?;
        let port = match after {
            "" => None,
            p => Some(
                p.strip_prefix(':')
                    .ok_or_else(|| format!("unexpected {p:?} after IPv6 host"))?,
            ),
        };
        (host, port)
    } else {
        match input.split_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (input, None),
        }
    };

    if host.is_empty() {
        return Err("empty host".to_string());
    }

    let port = port
        .map(|p| p.parse::<u16>().map_err(|_| format!("invalid port {p:?}")))
        .transpose()?;

    let bracketed;
    let check = if host.contains(':') {
        bracketed = format!("[{host}]");
        bracketed.as_str()
    } else {
        host
    };
    url::Host::parse(check).map_err(|e| format!("invalid host {host:?}: {e}"))?;

    Ok(Authority {
        host: host.to_string(),
        port,
    })
}

impl FromStr for Authority {
    type Err = ParcelError;

    fn from_str(s: &str) -> Result<Self> {
        parse_authority(s).map_err(|message| ParcelError::invalid_name(s, message))
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]", self.host)?;
        } else {
            f.write_str(&self.host)?;
        }
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }
        Ok(())
    }
}

/// A parsed `authority[:port]/path` discovery name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    authority: Authority,
    path: String,
}

impl FromStr for Name {
    type Err = ParcelError;

    fn from_str(s: &str) -> Result<Self> {
        let Some(split) = s.find('/') else {
            return Err(ParcelError::missing_authority(s));
        };
        let (authority, path) = s.split_at(split);
        if authority.is_empty() {
            return Err(ParcelError::missing_authority(s));
        }

        let authority =
            parse_authority(authority).map_err(|message| ParcelError::invalid_name(s, message))?;

        Ok(Name {
            authority,
            path: path.to_string(),
        })
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.authority, self.path)
    }
}

impl Name {
    /// Returns the authority part of the name.
    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Returns the path part of the name, including its leading `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the same path under a different authority.
    pub fn with_authority(&self, authority: Authority) -> Self {
        Self {
            authority,
            path: self.path.clone(),
        }
    }
}
