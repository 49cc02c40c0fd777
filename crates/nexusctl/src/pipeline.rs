//! The run pipeline: target -> SSH collection -> JSON record -> analysis
//!
//! Each step is a plain function so the steps that do not need a switch or
//! the network can be exercised with fakes.

use crate::cli::{AnalyzeArgs, RunArgs};
use crate::display;
use crate::input::{self, Prompt};
use crate::progress::ProgressIndicator;
use anyhow::{Context, Result};
use nexus_common::{
    analyze, collect, AnalysisOptions, AnalysisReport, CommandRunner, Credential, DiagConfig,
    DiagError, DiagnosticRecord, HttpLlmClient, LlmClient, SessionTarget, SshSession,
};
use std::path::{Path, PathBuf};
use tracing::info;

/// What a finished run produced
#[derive(Debug)]
pub struct RunOutcome {
    pub record_path: PathBuf,
    pub report: Option<AnalysisReport>,
}

/// Apply command line overrides on top of the loaded configuration
pub fn apply_overrides(config: &mut DiagConfig, output_dir: Option<&Path>, model: Option<&str>) {
    if let Some(dir) = output_dir {
        config.collection.output_dir = Some(dir.to_path_buf());
    }
    if let Some(model) = model {
        config.llm.model = model.to_string();
    }
}

/// Build the SSH target from flags and prompts
pub fn resolve_target(
    args: &RunArgs,
    config: &DiagConfig,
    prompt: &mut dyn Prompt,
) -> Result<SessionTarget, DiagError> {
    let host = input::require_value(args.host.clone(), prompt, "Switch IP", false)?;
    let user = input::require_value(args.user.clone(), prompt, "Username", false)?;

    let credential = match &args.key_file {
        Some(path) => {
            if !path.exists() {
                return Err(DiagError::InvalidInput(format!(
                    "key file {} does not exist",
                    path.display()
                )));
            }
            Credential::KeyFile {
                path: path.clone(),
                passphrase: std::env::var("NEXUS_SSH_PASSPHRASE").ok(),
            }
        }
        None => Credential::Password(input::require_value(None, prompt, "Password", true)?),
    };

    let port = args.port.unwrap_or(config.ssh.port);
    Ok(SessionTarget::new(&host, &user, credential).with_port(port))
}

/// Run the command list and persist the result
///
/// The literal session secret is scrubbed before anything is written.
pub fn collect_and_save<R: CommandRunner + ?Sized>(
    runner: &mut R,
    host: &str,
    commands: &[String],
    output_dir: &Path,
    secret: Option<&str>,
) -> Result<(DiagnosticRecord, PathBuf), DiagError> {
    let mut record = collect(runner, host, commands)?;
    if let Some(secret) = secret {
        record.scrub_literal(secret);
    }
    let path = record.write_json(output_dir)?;
    Ok((record, path))
}

/// Ask for the problem description and run the analysis
pub fn analyze_record(
    client: &dyn LlmClient,
    record: &DiagnosticRecord,
    problem: Option<String>,
    config: &DiagConfig,
    secrets: Vec<String>,
    prompt: &mut dyn Prompt,
) -> Result<AnalysisReport, DiagError> {
    let problem = input::require_value(
        problem,
        prompt,
        "Describe the problem you are facing",
        false,
    )?;

    let options = AnalysisOptions {
        max_chars: config.llm.max_prompt_chars,
        secrets,
    };

    let mut progress = ProgressIndicator::new("Analyzing data with AI...");
    match analyze(client, record, &problem, &options) {
        Ok(report) => {
            progress.finish_with_timing("Analysis ready");
            Ok(report)
        }
        Err(e) => {
            progress.abandon();
            Err(e)
        }
    }
}

/// Full interactive run against a live switch
pub fn run(args: &RunArgs, config: &DiagConfig, prompt: &mut dyn Prompt) -> Result<RunOutcome> {
    let commands = config.commands()?;

    // Ask for the key first so a missing key never costs a switch session
    let client = if args.collect_only {
        None
    } else {
        let key = input::api_key(prompt)?;
        Some(HttpLlmClient::new(config.llm_config(Some(key))).map_err(DiagError::from)?)
    };

    let target = resolve_target(args, config, prompt)?;
    let secret = target.credential.secret().map(str::to_string);

    info!("Starting data collection from {}", target.host);
    let (record, path) = {
        let mut progress = ProgressIndicator::new("Collecting data from the switch...");
        let mut session = SshSession::connect(&target, &config.ssh_options())
            .with_context(|| format!("Failed to connect to switch {}", target.host))?;
        let collected = collect_and_save(
            &mut session,
            &target.host,
            &commands,
            &config.output_dir(),
            secret.as_deref(),
        );
        session.close();
        match collected {
            Ok(done) => {
                progress.finish_with_timing("Data collected successfully");
                done
            }
            Err(e) => {
                progress.abandon();
                return Err(e).context("Failed to collect data from the switch");
            }
        }
    };
    display::print_collection_summary(&record, &path);

    let Some(client) = client else {
        return Ok(RunOutcome {
            record_path: path,
            report: None,
        });
    };

    let secrets = secret.into_iter().collect();
    let report = analyze_record(&client, &record, args.problem.clone(), config, secrets, prompt)?;
    Ok(RunOutcome {
        record_path: path,
        report: Some(report),
    })
}

/// Analyze a saved record without contacting the switch
pub fn run_analyze(
    args: &AnalyzeArgs,
    config: &DiagConfig,
    prompt: &mut dyn Prompt,
) -> Result<AnalysisReport> {
    let record = DiagnosticRecord::read_json(&args.record)
        .with_context(|| format!("Failed to load {}", args.record.display()))?;
    info!(
        "Loaded {} commands from {} ({})",
        record.commands.len(),
        record.host,
        args.record.display()
    );

    let key = input::api_key(prompt)?;
    let client = HttpLlmClient::new(config.llm_config(Some(key))).map_err(DiagError::from)?;
    let report = analyze_record(&client, &record, args.problem.clone(), config, Vec::new(), prompt)?;
    Ok(report)
}
