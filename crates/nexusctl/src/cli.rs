//! Command line surface for nexusctl

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

// Version is embedded at build time
pub const VERSION: &str = env!("NEXUSCTL_VERSION");

#[derive(Parser, Debug)]
#[command(name = "nexusctl")]
#[command(about = "Nexus Log Analyzer - collect switch diagnostics and get an AI analysis", long_about = None)]
#[command(version = VERSION)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Flags for the default `run` command
    #[command(flatten)]
    pub run: RunArgs,

    /// Configuration file (overrides the default lookup)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Collect diagnostics from a switch and analyze them (default)
    Run(RunArgs),

    /// Analyze a previously saved diagnostic record
    Analyze(AnalyzeArgs),

    /// Show the commands that will be executed on the switch
    Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Switch hostname or IP address
    #[arg(long)]
    pub host: Option<String>,

    /// SSH username
    #[arg(short, long)]
    pub user: Option<String>,

    /// SSH port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Private key file instead of password authentication
    #[arg(long, value_name = "PATH")]
    pub key_file: Option<PathBuf>,

    /// Problem description (prompted when omitted)
    #[arg(long)]
    pub problem: Option<String>,

    /// Directory for the JSON diagnostic record
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Model name override
    #[arg(long)]
    pub model: Option<String>,

    /// Stop after writing the diagnostic record
    #[arg(long)]
    pub collect_only: bool,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Diagnostic record written by a previous run
    #[arg(value_name = "RECORD")]
    pub record: PathBuf,

    /// Problem description (prompted when omitted)
    #[arg(long)]
    pub problem: Option<String>,

    /// Model name override
    #[arg(long)]
    pub model: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["nexusctl", "--host", "10.0.0.1", "-u", "admin"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.run.host.as_deref(), Some("10.0.0.1"));
        assert_eq!(cli.run.user.as_deref(), Some("admin"));
        assert!(!cli.run.collect_only);
    }

    #[test]
    fn test_explicit_run_subcommand() {
        let cli = Cli::try_parse_from(["nexusctl", "run", "--host", "nx1", "--collect-only"]).unwrap();
        match cli.command {
            Some(Commands::Run(args)) => {
                assert_eq!(args.host.as_deref(), Some("nx1"));
                assert!(args.collect_only);
            }
            other => panic!("expected run, got {:?}", other),
        }
    }

    #[test]
    fn test_analyze_subcommand() {
        let cli = Cli::try_parse_from([
            "nexusctl",
            "analyze",
            "switch_data_20240501_100000.json",
            "--problem",
            "high cpu",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Analyze(args)) => {
                assert_eq!(args.record, PathBuf::from("switch_data_20240501_100000.json"));
                assert_eq!(args.problem.as_deref(), Some("high cpu"));
            }
            other => panic!("expected analyze, got {:?}", other),
        }
    }
}
