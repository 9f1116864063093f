//! URI composition.
//!
//! Templates published in parcel documents are RFC 6570 URI templates. The
//! expansion is a URI *reference*, which is resolved against the
//! `scheme://authority` of the canonical name following RFC 3986 section
//! 5.2. A template may therefore expand to an absolute path, a
//! network-path reference or a full URL, and each of those lands where
//! RFC 3986 says it should.

use crate::error::{ParcelError, Result, Stage};
use crate::name::Name;
use crate::spec::v0;
use iri_string::spec::UriSpec;
use iri_string::template::UriTemplateStr;
use iri_string::template::simple_context::{SimpleContext, Value as ContextValue};
use iri_string::types::{UriAbsoluteStr, UriReferenceStr, UriStr};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write;
use url::Url;

#[cfg(test)]
mod tests;

/// Protocol version, always `v0`.
pub const VAR_VERSION: &str = "parcel.version";
/// Canonical (post-alias) `host[:port]`.
pub const VAR_AUTHORITY: &str = "parcel.discovery.authority";
/// `host[:port]` exactly as the caller wrote it.
pub const VAR_USER_AUTHORITY: &str = "parcel.discovery.userAuthority";
/// Path of the name, with its leading `/`.
pub const VAR_NAME: &str = "parcel.discovery.name";

/// Variables the protocol computes itself. Caller values for these keys are
/// always replaced.
pub const RESERVED_VARIABLES: [&str; 4] = [VAR_VERSION, VAR_AUTHORITY, VAR_USER_AUTHORITY, VAR_NAME];

/// A template variable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    List(Vec<String>),
    Assoc(Vec<(String, String)>),
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Self {
        Value::List(value)
    }
}

/// Variables available to a template expansion.
pub type Variables = BTreeMap<String, Value>;

/// Expands an RFC 6570 template. Variables that are not set expand to
/// nothing.
///
/// # Examples
///
/// ```
/// use libparcel::compose::{expand, Variables};
///
/// let mut vars = Variables::new();
/// vars.insert("parcel.version".to_string(), "v0".into());
/// assert_eq!(expand("/{parcel.version}/dist.json", &vars).unwrap(), "/v0/dist.json");
/// ```
pub fn expand(template: &str, variables: &Variables) -> Result<String> {
    let parsed = UriTemplateStr::new(template).map_err(|e| ParcelError::Template {
        stage: Stage::Compose,
        template: template.to_string(),
        message: e.to_string(),
        source: Some(Box::new(e)),
    })?;

    let mut context = SimpleContext::new();
    for (key, value) in variables {
        let value = match value {
            Value::String(s) => ContextValue::String(s.clone()),
            Value::List(items) => ContextValue::List(items.clone()),
            Value::Assoc(pairs) => ContextValue::Assoc(pairs.clone()),
        };
        context.insert(key.as_str(), value);
    }

    let expanded = parsed
        .expand::<UriSpec, _>(&context)
        .map_err(|e| ParcelError::Template {
            stage: Stage::Compose,
            template: template.to_string(),
            message: e.to_string(),
            source: Some(Box::new(e)),
        })?;
    Ok(expanded.to_string())
}

/// Resolves a URI reference against `base` (RFC 3986 section 5.2).
///
/// The target must have an authority, since it is fetched over HTTP.
///
/// # Examples
///
/// ```
/// use libparcel::compose::resolve_reference;
/// use url::Url;
///
/// let base = Url::parse("https://example.com").unwrap();
/// let url = resolve_reference(&base, "//cdn.example.net/dist.json").unwrap();
/// assert_eq!(url.as_str(), "https://cdn.example.net/dist.json");
/// ```
pub fn resolve_reference(base: &Url, reference: &str) -> Result<Url> {
    let resolved = resolve_rfc3986(base, reference)?;
    let uri_parse = |message: String| ParcelError::UriParse {
        stage: Stage::Compose,
        uri: reference.to_string(),
        message,
        source: None,
    };

    // `Url` gives http(s) URLs a host even when the RFC 3986 target has no
    // authority ("http:dist.json"), so reject those before converting.
    let target = UriStr::new(&resolved).map_err(|e| uri_parse(e.to_string()))?;
    if target.authority_str().is_none() {
        return Err(uri_parse(format!("resolved URI {resolved} has no authority")));
    }

    Url::parse(&resolved).map_err(|e| ParcelError::UriParse {
        stage: Stage::Compose,
        uri: reference.to_string(),
        message: e.to_string(),
        source: Some(Box::new(e)),
    })
}

/// RFC 3986 section 5.2 resolution of `reference` against `base`.
fn resolve_rfc3986(base: &Url, reference: &str) -> Result<String> {
    let to_error = |uri: &str, e: iri_string::validate::Error| ParcelError::UriParse {
        stage: Stage::Compose,
        uri: uri.to_string(),
        message: e.to_string(),
        source: Some(Box::new(e)),
    };
    let base_uri = UriAbsoluteStr::new(base.as_str()).map_err(|e| to_error(base.as_str(), e))?;
    let reference_uri = UriReferenceStr::new(reference).map_err(|e| to_error(reference, e))?;

    let mut resolved = String::new();
    write!(resolved, "{}", reference_uri.resolve_against(base_uri)).map_err(|e| {
        ParcelError::UriParse {
            stage: Stage::Compose,
            uri: reference.to_string(),
            message: e.to_string(),
            source: Some(Box::new(e)),
        }
    })?;
    Ok(resolved)
}

/// Expands `template` and resolves the result against `base`.
///
/// # Examples
///
/// ```
/// use libparcel::compose::{compose, Variables};
/// use url::Url;
///
/// let mut vars = Variables::new();
/// vars.insert("parcel.version".to_string(), "v0".into());
/// let base = Url::parse("https://mirror.example.org").unwrap();
///
/// let url = compose("/v0/{parcel.version}/dist.json", &vars, &base).unwrap();
/// assert_eq!(url.as_str(), "https://mirror.example.org/v0/v0/dist.json");
/// ```
pub fn compose(template: &str, variables: &Variables, base: &Url) -> Result<Url> {
    let reference = expand(template, variables)?;
    resolve_reference(base, &reference)
}

/// Variables for composing without caller context: the protocol version
/// and the name's path, which are the same before and after aliasing.
pub fn exploration_variables(name: &Name) -> Variables {
    Variables::from([
        (VAR_VERSION.to_string(), Value::from(v0::VERSION)),
        (VAR_NAME.to_string(), Value::from(name.path())),
    ])
}

/// Returns a copy of `variables` with every reserved key set from the
/// original (`user`) and canonical names. The input is left untouched.
///
/// # Examples
///
/// ```
/// use libparcel::compose::{augment, Value, Variables};
/// use libparcel::name::Name;
///
/// let user: Name = "example.com/myimage".parse().unwrap();
/// let canonical: Name = "mirror.example.org/myimage".parse().unwrap();
///
/// let mut vars = Variables::new();
/// vars.insert("parcel.version".to_string(), "v9".into());
///
/// let augmented = augment(Some(&vars), &user, &canonical);
/// assert_eq!(augmented["parcel.version"], Value::from("v0"));
/// assert_eq!(augmented["parcel.discovery.authority"], Value::from("mirror.example.org"));
/// assert_eq!(vars["parcel.version"], Value::from("v9"));
/// ```
pub fn augment(variables: Option<&Variables>, user: &Name, canonical: &Name) -> Variables {
    let mut augmented = variables.cloned().unwrap_or_default();
    augmented.insert(VAR_VERSION.to_string(), Value::from(v0::VERSION));
    augmented.insert(
        VAR_AUTHORITY.to_string(),
        Value::from(canonical.authority().to_string()),
    );
    augmented.insert(
        VAR_USER_AUTHORITY.to_string(),
        Value::from(user.authority().to_string()),
    );
    augmented.insert(VAR_NAME.to_string(), Value::from(user.path()));
    augmented
}
