//! Version `v0` of the parcel documents.

use super::{Template, Versioned};
use serde::{Deserialize, Serialize};

/// The only protocol version this crate speaks.
pub const VERSION: &str = "v0";

/// A "Discovery Object", served from the well-known path of the canonical
/// authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discovery {
    #[serde(rename = "parcelVersion")]
    pub parcel_version: String,

    /// Template that expands to the location of the distribution object.
    #[serde(rename = "disturi")]
    pub distribution_uri: Template,
}

impl Versioned for Discovery {
    fn parcel_version(&self) -> &str {
        &self.parcel_version
    }
}

/// A "Distribution Object", naming where an image's index and blobs live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    #[serde(rename = "parcelVersion")]
    pub parcel_version: String,

    /// Templates for the image's index JSON, in order of preference.
    #[serde(rename = "indexuris", default)]
    pub index_uris: Vec<Template>,

    /// Templates for the image's blobs, in order of preference.
    #[serde(rename = "bloburis", default)]
    pub blob_uris: Vec<Template>,
}

impl Versioned for Distribution {
    fn parcel_version(&self) -> &str {
        &self.parcel_version
    }
}
