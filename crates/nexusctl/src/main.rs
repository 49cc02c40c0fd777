//! Nexus Log Analyzer - collect diagnostics from a Cisco Nexus switch and
//! print an AI analysis of them.

use anyhow::{Context, Result};
use clap::Parser;
use nexus_common::DiagConfig;
use nexusctl::cli::{Cli, Commands};
use nexusctl::input::TerminalPrompt;
use nexusctl::{display, errors, logging, pipeline};
use tracing::{debug, error, info};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = dispatch(cli) {
        error!("{:#}", e);
        display::print_error(&format!("{:#}", e));
        std::process::exit(errors::exit_code_for(&e));
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    let mut config =
        DiagConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    debug!("Effective configuration: {:?}", config);

    let mut prompt = TerminalPrompt;
    match cli.command {
        Some(Commands::Commands) => {
            display::print_commands(&config.commands()?);
        }
        Some(Commands::Analyze(args)) => {
            pipeline::apply_overrides(&mut config, None, args.model.as_deref());
            display::print_banner();
            let report = pipeline::run_analyze(&args, &config, &mut prompt)?;
            display::print_report(&report);
        }
        Some(Commands::Run(args)) => run(args, config, &mut prompt)?,
        None => run(cli.run, config, &mut prompt)?,
    }
    Ok(())
}

fn run(
    args: nexusctl::cli::RunArgs,
    mut config: DiagConfig,
    prompt: &mut TerminalPrompt,
) -> Result<()> {
    pipeline::apply_overrides(&mut config, args.output_dir.as_deref(), args.model.as_deref());
    display::print_banner();

    let outcome = pipeline::run(&args, &config, prompt)?;
    match outcome.report {
        Some(report) => display::print_report(&report),
        None => info!(
            "Collection only; analyze later with: nexusctl analyze {}",
            outcome.record_path.display()
        ),
    }
    Ok(())
}
