use anyhow::Result;
use clap::Args;
use groupcheck_contracts::{consumer_group, consumer_group_topic};
use std::collections::BTreeMap;

#[derive(Args)]
pub struct AuditArgs {
    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

/// Returns whether every shipped rule resolves to a catalog message.
pub fn execute(args: AuditArgs) -> Result<bool> {
    let mut report: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for contract in [consumer_group(), consumer_group_topic()] {
        report.insert(contract.rules().name(), contract.audit());
    }
    let complete = report.values().all(Vec::is_empty);

    if args.json {
        super::print_json(&report, false)?;
    } else {
        for (contract, unresolved) in &report {
            if unresolved.is_empty() {
                println!("{contract}: complete");
            } else {
                println!("{contract}: unresolved {}", unresolved.join(", "));
            }
        }
    }
    Ok(complete)
}
