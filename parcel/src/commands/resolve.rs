use super::{parcel_or_report, run_each};
use crate::context::AppContext;
use crate::format::{self, Formattable};
use libparcel::Parcel;
use libparcel::resolve::TxtLookup;
use serde::Serialize;

/// A name and the canonical name it resolved to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolved {
    pub name: String,
    pub canonical: String,
}

impl Formattable for Resolved {
    fn format_pretty(&self) -> String {
        format!("{} {} {}", self.name, format::arrow(), self.canonical)
    }
}

/// Resolve a single name
pub async fn resolve<L: TxtLookup>(parcel: &Parcel<L>, name: &str) -> libparcel::Result<Resolved> {
    let canonical = parcel.resolve(name).await?;
    Ok(Resolved {
        name: name.to_string(),
        canonical,
    })
}

/// Handle the resolve command
pub async fn handle_resolve(ctx: &AppContext, names: &[String]) -> bool {
    let Some(parcel) = parcel_or_report(ctx) else {
        return false;
    };
    let parcel = &parcel;
    run_each(ctx, names, move |name| async move { resolve(parcel, &name).await }).await
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
