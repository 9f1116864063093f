use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod context;
mod format;

use context::{AppContext, CliOverrides, VerbosityLevel};

/// Parcel - Container Image Discovery
///
/// Resolve image names through DNS aliases and the parcel discovery
/// documents to the location of their distribution metadata.
#[derive(Parser, Debug)]
#[command(name = "parcel")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (default: $PARCEL_CONFIG or <config dir>/parcel/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Fetch over plain HTTP instead of HTTPS
    #[arg(long, global = true)]
    insecure: bool,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Output format: pretty, json, yaml
    #[arg(short, long, global = true, default_value = "pretty")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Display version information
    Version,
    /// Resolve names to their canonical names via DNS aliases
    Resolve {
        /// Names of the form host[:port]/path
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Resolve names and print their discovery objects
    Fetch {
        /// Names of the form host[:port]/path
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Print where each name's distribution object lives, without fetching it
    Explore {
        /// Names of the form host[:port]/path
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Run the full discovery and print each distribution object
    Discover {
        /// Names of the form host[:port]/path
        #[arg(required = true)]
        names: Vec<String>,
        /// Extra template variable (can be repeated; a repeated key becomes a list)
        #[arg(long = "var", value_name = "KEY=VALUE", value_parser = commands::discover::parse_var)]
        vars: Vec<(String, String)>,
    },
    /// Run resolve, fetch and discover for each name and report every step
    Inspect {
        /// Names of the form host[:port]/path
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Send diagnostics to stderr. `RUST_LOG`, when set, wins over `-v`.
fn init_tracing(verbosity: VerbosityLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directive()));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let verbosity = VerbosityLevel::from_count(cli.verbose);
    init_tracing(verbosity);

    // Commands that need no configuration
    match &cli.command {
        Commands::Version => {
            commands::version::print_version();
            return ExitCode::SUCCESS;
        }
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, bin_name, &mut std::io::stdout());
            return ExitCode::SUCCESS;
        }
        _ => {}
    }

    // Build context with precedence: defaults > config file > env vars > CLI flags
    let overrides = CliOverrides {
        config_path: cli.config,
        insecure: cli.insecure,
        timeout: cli.timeout,
    };
    let ctx = match AppContext::build(&overrides, format::OutputFormat::from(cli.format.as_str())) {
        Ok(ctx) => ctx,
        Err(e) => {
            format::error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };
    debug!(config = ?ctx.config, "resolved configuration");
    if ctx.config.network.insecure {
        format::warning("fetching over plain HTTP");
    }

    let all_ok = match cli.command {
        Commands::Resolve { names } => commands::resolve::handle_resolve(&ctx, &names).await,
        Commands::Fetch { names } => commands::fetch::handle_fetch(&ctx, &names).await,
        Commands::Explore { names } => commands::explore::handle_explore(&ctx, &names).await,
        Commands::Discover { names, vars } => {
            commands::discover::handle_discover(&ctx, &names, &vars).await
        }
        Commands::Inspect { names } => commands::inspect::handle_inspect(&ctx, &names).await,
        Commands::Version | Commands::Completion { .. } => true,
    };

    if all_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_discover_with_vars() {
        let cli = Cli::try_parse_from([
            "parcel",
            "-vv",
            "--insecure",
            "discover",
            "example.com/a",
            "example.com/b",
            "--var",
            "os=linux",
            "--var",
            "arch=arm64",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert!(cli.insecure);
        match cli.command {
            Commands::Discover { names, vars } => {
                assert_eq!(names, vec!["example.com/a", "example.com/b"]);
                assert_eq!(
                    vars,
                    vec![
                        ("os".to_string(), "linux".to_string()),
                        ("arch".to_string(), "arm64".to_string())
                    ]
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_malformed_var() {
        let result = Cli::try_parse_from(["parcel", "discover", "example.com/a", "--var", "oops"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_requires_names() {
        assert!(Cli::try_parse_from(["parcel", "resolve"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "parcel",
            "explore",
            "example.com/a",
            "--timeout",
            "5",
            "-f",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.timeout, Some(5));
        assert_eq!(cli.format, "json");
    }
}
