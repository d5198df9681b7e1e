use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod document;

#[derive(Parser)]
#[command(name = "groupcheck", version, about = "Consumer group contract validation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a consumer group definition (JSON, YAML or TOML)
    Validate(commands::validate::ValidateArgs),
    /// Check that every shipped rule has a catalog message
    Audit(commands::audit::AuditArgs),
    /// Print the effective validation policy (JSON)
    Policy(commands::policy::PolicyArgs),
}

fn main() {
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Audit(args) => commands::audit::execute(args),
        Commands::Policy(args) => commands::policy::execute(args),
    };
    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(2);
        }
    }
}
