//! Parcel - Container Image Discovery Library
//!
//! Parcel turns a user-facing image name such as `example.com/myimage` into
//! the location of its distribution object. Discovery runs in four steps:
//!
//! 1. Chase DNS TXT aliases (`cyphar.opencontainers.parcel.v0=<host>;`)
//!    from the name's host to its canonical host.
//! 2. Fetch the discovery object from
//!    `/.well-known/cyphar.opencontainers.parcel.v0.json` on that host.
//! 3. Expand the discovery object's URI template and resolve the result
//!    against the canonical host.
//! 4. Fetch the distribution object from the composed URL.
//!
//! # Quick Start
//!
//! ```no_run
//! use libparcel::Parcel;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let parcel = Parcel::new()?;
//!
//!     // Where does the distribution object live?
//!     let url = parcel.explore("example.com/myimage").await?;
//!     println!("{}", url);
//!
//!     // Fetch it.
//!     let discovered = parcel.discover("example.com/myimage", None).await?;
//!     println!("{} index templates", discovered.distribution.index_uris.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Main Types
//!
//! - [`Parcel`] - Main entry point for discovery
//! - [`ParcelBuilder`] - Builder for advanced configuration
//! - [`Name`] - A `host[:port]/path` discovery name
//! - [`Discovery`] and [`Distribution`] - The documents served by a host
//! - [`ParcelError`] - Errors, tagged with the [`Stage`] that failed
//!
//! The building blocks ([`resolve`], [`client`], [`compose`]) are public for
//! callers that need one step on its own.

#![warn(clippy::all)]

/// Returns the libparcel crate version.
///
/// # Examples
///
/// ```
/// let version = libparcel::version();
/// assert!(!version.is_empty());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

mod parcel;
pub use parcel::{Discovered, Parcel, ParcelBuilder};

pub use compose::{Value, Variables};
pub use config::Config;
pub use error::{ParcelError, Result, Stage};
pub use name::{Authority, Name};
pub use spec::v0::{Discovery, Distribution};

pub mod client;
pub mod compose;
pub mod config;
pub mod error;
pub mod name;
pub mod resolve;
pub mod spec;
