//! Per-name report of every discovery step.
//!
//! Each step runs on its own, so a failure in one does not hide what the
//! others would have found: the full discovery always runs, even when the
//! standalone resolve or fetch failed.

use super::discover::DiscoverOutput;
use super::{parcel_or_report, print_item};
use crate::context::AppContext;
use crate::format::{self, Formattable};
use libparcel::resolve::TxtLookup;
use libparcel::{Discovery, Parcel};
use serde::Serialize;

/// Outcome of one step
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step<T> {
    Ok(T),
    Failed(String),
    Skipped,
}

impl<T> Step<T> {
    fn from_result(result: libparcel::Result<T>) -> Self {
        match result {
            Ok(value) => Step::Ok(value),
            Err(e) => Step::Failed(e.to_string()),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Step::Failed(_))
    }
}

/// Resolve, fetch and discover results for one name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Inspection {
    pub name: String,
    pub resolve: Step<String>,
    pub fetch: Step<Discovery>,
    pub discover: Step<DiscoverOutput>,
}

impl Inspection {
    /// True if any step failed.
    pub fn failed(&self) -> bool {
        self.resolve.is_failed() || self.fetch.is_failed() || self.discover.is_failed()
    }
}

fn step_line<T>(label: &str, step: &Step<T>, describe: impl Fn(&T) -> String) -> String {
    match step {
        Step::Ok(value) => format!("  {} {} {}\n", label, format::arrow(), describe(value)),
        Step::Failed(e) => format!("  {} {} ✗ {}\n", label, format::arrow(), e),
        Step::Skipped => format!("  {} {} skipped\n", label, format::arrow()),
    }
}

impl Formattable for Inspection {
    fn format_pretty(&self) -> String {
        let mut output = format!("{}\n", format::heading(&self.name));
        output.push_str(&step_line("resolve", &self.resolve, |c| c.clone()));
        output.push_str(&step_line("fetch", &self.fetch, |d| {
            format!("disturi {}", d.distribution_uri.as_str())
        }));
        output.push_str(&step_line("discover", &self.discover, |d| d.url.clone()));

        if let Step::Ok(discovered) = &self.discover {
            for uri in &discovered.index_uris {
                output.push_str(&format!("    index {}\n", uri));
            }
            for uri in &discovered.blob_uris {
                output.push_str(&format!("    blob  {}\n", uri));
            }
        }
        output
    }
}

/// Run every step for a single name
pub async fn inspect<L: TxtLookup>(parcel: &Parcel<L>, name: &str) -> Inspection {
    let resolve = Step::from_result(parcel.resolve(name).await);

    let fetch = match &resolve {
        Step::Ok(canonical) => Step::from_result(parcel.fetch(canonical).await),
        _ => Step::Skipped,
    };

    let discover = Step::from_result(
        parcel
            .discover(name, None)
            .await
            .map(|discovered| DiscoverOutput::new(name, discovered)),
    );

    Inspection {
        name: name.to_string(),
        resolve,
        fetch,
        discover,
    }
}

/// Handle the inspect command
pub async fn handle_inspect(ctx: &AppContext, names: &[String]) -> bool {
    let Some(parcel) = parcel_or_report(ctx) else {
        return false;
    };

    let mut all_ok = true;
    for name in names {
        let inspection = inspect(&parcel, name).await;
        if inspection.failed() {
            format::error(&format!("{}: discovery incomplete", name));
            all_ok = false;
        }
        all_ok &= print_item(&inspection, ctx);
    }
    all_ok
}

#[cfg(test)]
#[path = "inspect_tests.rs"]
mod tests;
