//! Diagnostic record - everything collected from one switch in one run
//!
//! The record is written once as pretty-printed JSON and never rewritten.

use crate::error::DiagError;
use crate::redaction;
use crate::ssh::CommandRunner;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Marker appended when switch data is cut short for the model
pub const TRUNCATION_MARKER: &str = "\n\n[TRUNCATED: too much data for a complete analysis]";

const MAX_NAME_ATTEMPTS: u32 = 100;

/// Output of one executed command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResult {
    pub command: String,
    pub output: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub stderr: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_status: Option<i32>,
    pub executed_at: DateTime<Utc>,
    pub duration_ms: u64,
}

/// All command results of one run, in execution order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticRecord {
    pub host: String,
    pub collected_at: DateTime<Utc>,
    pub commands: Vec<CommandResult>,
}

/// Run every command in order and gather what succeeded
///
/// A command that cannot be executed is skipped with a warning. The run only
/// fails when nothing at all was collected.
pub fn collect<R: CommandRunner + ?Sized>(
    runner: &mut R,
    host: &str,
    commands: &[String],
) -> Result<DiagnosticRecord, DiagError> {
    let collected_at = Utc::now();
    let mut results = Vec::with_capacity(commands.len());

    for command in commands {
        info!("Running command: {}", command);
        let executed_at = Utc::now();
        match runner.run(command) {
            Ok(raw) => {
                if !raw.stderr.trim().is_empty() {
                    warn!("'{}' wrote to stderr: {}", command, raw.stderr.trim());
                }
                results.push(CommandResult {
                    command: command.clone(),
                    output: raw.stdout,
                    stderr: raw.stderr,
                    exit_status: raw.exit_status,
                    executed_at,
                    duration_ms: raw.duration_ms,
                });
            }
            Err(e) => warn!("Command '{}' failed: {}", command, e),
        }
    }

    if results.is_empty() {
        return Err(DiagError::NoData);
    }

    info!("Collected {}/{} commands from {}", results.len(), commands.len(), host);
    Ok(DiagnosticRecord {
        host: host.to_string(),
        collected_at,
        commands: results,
    })
}

impl DiagnosticRecord {
    /// Mask a literal secret in every captured stream
    pub fn scrub_literal(&mut self, secret: &str) {
        for result in &mut self.commands {
            result.output = redaction::redact_literal(&result.output, secret);
            result.stderr = redaction::redact_literal(&result.stderr, secret);
        }
    }

    /// Base file name: switch_data_YYYYmmdd_HHMMSS
    pub fn file_stem(&self) -> String {
        let local: DateTime<Local> = self.collected_at.into();
        format!("switch_data_{}", local.format("%Y%m%d_%H%M%S"))
    }

    /// Write the record into `dir`, never overwriting an existing file
    pub fn write_json(&self, dir: &Path) -> Result<PathBuf, DiagError> {
        fs::create_dir_all(dir)?;
        let json = serde_json::to_string_pretty(self)?;
        let stem = self.file_stem();

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = if attempt == 0 {
                format!("{}.json", stem)
            } else {
                format!("{}_{}.json", stem, attempt)
            };
            let path = dir.join(name);

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(json.as_bytes())?;
                    file.write_all(b"\n")?;
                    info!("Data saved to {}", path.display());
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(DiagError::Io(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("too many records named {} in {}", stem, dir.display()),
        )))
    }

    /// Load a previously written record
    pub fn read_json(path: &Path) -> Result<Self, DiagError> {
        let contents = fs::read_to_string(path)?;
        let record: DiagnosticRecord = serde_json::from_str(&contents)?;
        if record.commands.is_empty() {
            return Err(DiagError::NoData);
        }
        Ok(record)
    }

    /// Commands rendered as "<cmd>:\n<output>\n", one block per command
    pub fn prompt_text(&self) -> String {
        self.commands
            .iter()
            .map(|r| format!("{}:\n{}\n", r.command, r.output))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Cut `text` to `max_chars` characters and mark the cut
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}
