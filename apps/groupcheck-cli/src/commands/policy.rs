use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct PolicyArgs {
    /// Policy file with a [policy] table
    #[arg(long)]
    policy: Option<PathBuf>,
    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

pub fn execute(args: PolicyArgs) -> Result<bool> {
    let policy = super::load_policy(args.policy.as_deref())?;
    super::print_json(&policy, args.pretty)?;
    Ok(true)
}
