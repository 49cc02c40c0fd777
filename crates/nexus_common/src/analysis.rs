//! Analysis step: diagnostic record + problem description -> report

use crate::error::DiagError;
use crate::llm_client::{LlmClient, LlmError};
use crate::prompts;
use crate::record::{truncate_text, DiagnosticRecord};
use crate::redaction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Free-text report returned by the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub text: String,
    pub model: String,
    pub generated_at: DateTime<Utc>,
}

/// Knobs for one analysis request
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// Character budget for the switch data block
    pub max_chars: usize,
    /// Literal secrets to mask before anything leaves the process
    pub secrets: Vec<String>,
}

/// Switch data exactly as it will be submitted: redacted, then truncated
pub fn switch_data_for_prompt(record: &DiagnosticRecord, options: &AnalysisOptions) -> String {
    let secrets: Vec<&str> = options.secrets.iter().map(String::as_str).collect();
    let redacted = redaction::redact(&record.prompt_text(), &secrets);
    truncate_text(&redacted, options.max_chars)
}

/// Send the record to the model and return its report
pub fn analyze<C: LlmClient + ?Sized>(
    client: &C,
    record: &DiagnosticRecord,
    problem: &str,
    options: &AnalysisOptions,
) -> Result<AnalysisReport, DiagError> {
    let problem = problem.trim();
    if problem.is_empty() {
        return Err(DiagError::InvalidInput(
            "the problem description is required".to_string(),
        ));
    }

    let switch_data = switch_data_for_prompt(record, options);
    let user_prompt = prompts::generate_diagnostic_prompt(problem, &switch_data);

    info!(
        "Requesting analysis of {} commands from {}",
        record.commands.len(),
        client.model()
    );
    let text = client.complete(prompts::DIAGNOSTIC_SYSTEM_PROMPT, &user_prompt)?;
    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse.into());
    }

    info!("Analysis completed ({} chars)", text.len());
    Ok(AnalysisReport {
        text: text.trim().to_string(),
        model: client.model().to_string(),
        generated_at: Utc::now(),
    })
}
