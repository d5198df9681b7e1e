use anyhow::Result;
use clap::Args;
use groupcheck_contracts::consumer_group;
use std::path::PathBuf;

use crate::document;

#[derive(Args)]
pub struct ValidateArgs {
    /// Consumer group definition (.json, .yaml, .yml or .toml)
    file: PathBuf,
    /// Policy file with a [policy] table
    #[arg(long)]
    policy: Option<PathBuf>,
    /// Treat '.' and '_' in topic names as the same namespace separator
    #[arg(long)]
    no_strict_namespacing: bool,
    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
    /// Pretty-print JSON output
    #[arg(long, requires = "json")]
    pretty: bool,
}

/// Returns whether the definition passed.
pub fn execute(args: ValidateArgs) -> Result<bool> {
    super::load_policy(args.policy.as_deref())?;
    if args.no_strict_namespacing {
        groupcheck_policy::set_strict_topics_namespacing(false);
    }
    let config = document::load_consumer_group(&args.file)?;
    let outcome = consumer_group().call(&config);

    if args.json {
        super::print_json(&outcome, args.pretty)?;
    } else if outcome.success() {
        println!("ok: {}", args.file.display());
    } else {
        for (path, messages) in outcome.errors() {
            for message in messages {
                println!("{path}: {message}");
            }
        }
    }
    if !outcome.success() {
        tracing::info!(
            file = %args.file.display(),
            failures = outcome.failures().len(),
            "consumer group rejected"
        );
    }
    Ok(outcome.success())
}
