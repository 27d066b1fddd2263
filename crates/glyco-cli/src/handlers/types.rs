//! Record type listing

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::output::{OutputWriter, TypeSummary};
use glyco_data::{Policy, Registry};
use tracing::debug;

/// Handle the types command
pub fn handle_types(output: &mut OutputWriter) -> Result<()> {
    let summaries = summarize(Registry::global());
    debug!(count = summaries.len(), "Listing registered types");

    if output.format() != OutputFormat::Human {
        return output.data(&summaries);
    }

    let rows = summaries
        .iter()
        .map(|summary| {
            let policy = match summary.policy {
                Policy::Strict => "strict",
                Policy::Open => "open",
            };
            vec![summary.name.clone(), policy.to_string()]
        })
        .collect();
    output.section("Record types")?;
    output.table(&["TYPE", "POLICY"], rows)
}

fn summarize(registry: &Registry) -> Vec<TypeSummary> {
    registry
        .registrations()
        .map(|registration| TypeSummary {
            name: registration.name.to_string(),
            policy: registration.policy,
        })
        .collect()
}
