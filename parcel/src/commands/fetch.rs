use super::{parcel_or_report, run_each};
use crate::context::AppContext;
use crate::format::{self, Formattable};
use libparcel::resolve::TxtLookup;
use libparcel::{Discovery, Parcel};
use serde::Serialize;

/// The discovery object served for a name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fetched {
    pub name: String,
    pub canonical: String,
    pub discovery: Discovery,
}

impl Formattable for Fetched {
    fn format_pretty(&self) -> String {
        let mut output = format!(
            "{} {} {}\n",
            format::heading(&self.name),
            format::arrow(),
            self.canonical
        );
        output.push_str(&format!(
            "  parcelVersion: {}\n",
            self.discovery.parcel_version
        ));
        output.push_str(&format!(
            "  disturi: {}\n",
            self.discovery.distribution_uri.as_str()
        ));
        output
    }
}

/// Resolve a name and fetch its discovery object
pub async fn fetch<L: TxtLookup>(parcel: &Parcel<L>, name: &str) -> libparcel::Result<Fetched> {
    let canonical = parcel.resolve(name).await?;
    let discovery = parcel.fetch(&canonical).await?;
    Ok(Fetched {
        name: name.to_string(),
        canonical,
        discovery,
    })
}

/// Handle the fetch command
pub async fn handle_fetch(ctx: &AppContext, names: &[String]) -> bool {
    let Some(parcel) = parcel_or_report(ctx) else {
        return false;
    };
    let parcel = &parcel;
    run_each(ctx, names, move |name| async move { fetch(parcel, &name).await }).await
}

#[cfg(test)]
#[path = "fetch_tests.rs"]
mod tests;
