use super::{parcel_or_report, run_each};
use crate::context::AppContext;
use crate::format::{self, Formattable};
use libparcel::resolve::TxtLookup;
use libparcel::{Discovered, Parcel, Value, Variables};
use serde::Serialize;

/// Everything learned by a full discovery of one name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoverOutput {
    pub name: String,
    pub url: String,
    pub index_uris: Vec<String>,
    pub blob_uris: Vec<String>,
    pub variables: Variables,
}

impl DiscoverOutput {
    pub fn new(name: &str, discovered: Discovered) -> Self {
        let templates = |list: &[libparcel::spec::Template]| {
            list.iter().map(|t| t.as_str().to_string()).collect()
        };
        Self {
            name: name.to_string(),
            url: discovered.url.to_string(),
            index_uris: templates(&discovered.distribution.index_uris),
            blob_uris: templates(&discovered.distribution.blob_uris),
            variables: discovered.variables,
        }
    }
}

impl Formattable for DiscoverOutput {
    fn format_pretty(&self) -> String {
        let mut output = format!("{}\n", format::heading(&self.name));
        output.push_str(&format!("  url: {}\n", self.url));

        output.push_str("  index templates:\n");
        for uri in &self.index_uris {
            output.push_str(&format!("    {}\n", uri));
        }
        output.push_str("  blob templates:\n");
        for uri in &self.blob_uris {
            output.push_str(&format!("    {}\n", uri));
        }

        output.push_str("  variables:\n");
        for (key, value) in &self.variables {
            output.push_str(&format!("    {} = {}\n", key, format::display_value(value)));
        }
        output
    }
}

/// Parse a `key=value` argument.
pub fn parse_var(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got {:?}", s)),
    }
}

/// Collect `--var` pairs into template variables. A key given more than
/// once becomes a list, in the order given.
pub fn variables_from_pairs(pairs: &[(String, String)]) -> Variables {
    let mut variables = Variables::new();
    for (key, value) in pairs {
        match variables.remove(key) {
            None => {
                variables.insert(key.clone(), Value::from(value.as_str()));
            }
            Some(Value::String(first)) => {
                variables.insert(key.clone(), Value::List(vec![first, value.clone()]));
            }
            Some(Value::List(mut items)) => {
                items.push(value.clone());
                variables.insert(key.clone(), Value::List(items));
            }
            Some(other) => {
                variables.insert(key.clone(), other);
            }
        }
    }
    variables
}

/// Run the full discovery of a single name
pub async fn discover<L: TxtLookup>(
    parcel: &Parcel<L>,
    name: &str,
    variables: &Variables,
) -> libparcel::Result<DiscoverOutput> {
    let extra = (!variables.is_empty()).then_some(variables);
    let discovered = parcel.discover(name, extra).await?;
    Ok(DiscoverOutput::new(name, discovered))
}

/// Handle the discover command
pub async fn handle_discover(ctx: &AppContext, names: &[String], vars: &[(String, String)]) -> bool {
    let Some(parcel) = parcel_or_report(ctx) else {
        return false;
    };
    let variables = variables_from_pairs(vars);
    let (parcel, variables) = (&parcel, &variables);
    run_each(ctx, names, move |name| async move {
        discover(parcel, &name, variables).await
    })
    .await
}

#[cfg(test)]
#[path = "discover_tests.rs"]
mod tests;
