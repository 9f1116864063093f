//! Wire formats for parcel documents.
//!
//! Every parcel document carries a `parcelVersion` field. The version is
//! decoded on its own first (see [`VersionProbe`]) so that a document from a
//! different protocol version is rejected before any of its other fields are
//! looked at.

use serde::{Deserialize, Serialize};

pub mod v0;


/// A document that declares the protocol version it was written for.
pub trait Versioned {
    /// Returns the declared `parcelVersion`.
    fn parcel_version(&self) -> &str;
}

/// The version header shared by all parcel documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionProbe {
    #[serde(rename = "parcelVersion")]
    pub parcel_version: String,
}

impl Versioned for VersionProbe {
    fn parcel_version(&self) -> &str {
        &self.parcel_version
    }
}

/// A wrapped RFC 6570 URI template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub template: String,
}

impl Template {
    /// Wraps a template string.
    pub fn new<S: Into<String>>(template: S) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Returns the raw template string.
    pub fn as_str(&self) -> &str {
        &self.template
    }
}
