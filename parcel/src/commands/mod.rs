use crate::context::AppContext;
use crate::format::{self, Formattable};
use std::future::Future;

/// Discover command handlers
pub mod discover;

/// Explore command handlers
pub mod explore;

/// Fetch command handlers
pub mod fetch;

/// Inspect command handlers
pub mod inspect;

/// Resolve command handlers
pub mod resolve;

/// Version command handlers
pub mod version;

/// Run `op` on every name in order and print each result.
///
/// A failing name is reported on stderr and does not stop the others.
/// Returns `true` if every name succeeded.
pub async fn run_each<T, F, Fut>(ctx: &AppContext, names: &[String], op: F) -> bool
where
    T: Formattable,
    F: Fn(String) -> Fut,
    Fut: Future<Output = libparcel::Result<T>>,
{
    let mut all_ok = true;
    for name in names {
        match op(name.clone()).await {
            Ok(item) => all_ok &= print_item(&item, ctx),
            Err(e) => {
                format::error(&format!("{}: {}", name, e));
                all_ok = false;
            }
        }
    }
    all_ok
}

/// Print one result in the configured format.
pub fn print_item<T: Formattable>(item: &T, ctx: &AppContext) -> bool {
    match format::format_output(item, ctx.format) {
        Ok(output) => {
            println!("{}", output.trim_end());
            true
        }
        Err(e) => {
            format::error(&format!("Error formatting output: {}", e));
            false
        }
    }
}

/// Build the discovery client, reporting a failure the way commands do.
pub fn parcel_or_report(ctx: &AppContext) -> Option<libparcel::Parcel> {
    match ctx.parcel() {
        Ok(parcel) => Some(parcel),
        Err(e) => {
            format::error(&format!("Failed to set up discovery: {}", e));
            None
        }
    }
}
