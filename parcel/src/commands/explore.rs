use super::{parcel_or_report, run_each};
use crate::context::AppContext;
use crate::format::{self, Formattable};
use libparcel::Parcel;
use libparcel::resolve::TxtLookup;
use serde::Serialize;

/// Where the distribution object for a name lives
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explored {
    pub name: String,
    pub url: String,
}

impl Formattable for Explored {
    fn format_pretty(&self) -> String {
        format!("{} {} {}", self.name, format::arrow(), self.url)
    }
}

/// Compute the distribution URL of a single name
pub async fn explore<L: TxtLookup>(parcel: &Parcel<L>, name: &str) -> libparcel::Result<Explored> {
    let url = parcel.explore(name).await?;
    Ok(Explored {
        name: name.to_string(),
        url: url.to_string(),
    })
}

/// Handle the explore command
pub async fn handle_explore(ctx: &AppContext, names: &[String]) -> bool {
    let Some(parcel) = parcel_or_report(ctx) else {
        return false;
    };
    let parcel = &parcel;
    run_each(ctx, names, move |name| async move { explore(parcel, &name).await }).await
}

#[cfg(test)]
#[path = "explore_tests.rs"]
mod tests;
