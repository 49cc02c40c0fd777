//! Nexus Common - collection, persistence and analysis of Nexus switch diagnostics
//!
//! The pipeline is strictly sequential: connect over SSH, run a fixed list of
//! `show` commands, write the record as JSON, ask a language model for a report.

pub mod analysis;
pub mod commands;
pub mod config;
pub mod error;
pub mod llm_client;
pub mod prompts;
pub mod record;
pub mod redaction;
pub mod ssh;

pub use analysis::{analyze, AnalysisOptions, AnalysisReport};
pub use config::DiagConfig;
pub use error::DiagError;
pub use llm_client::{FakeLlmClient, HttpLlmClient, LlmClient, LlmConfig, LlmError};
pub use record::{collect, CommandResult, DiagnosticRecord};
pub use ssh::{CommandRunner, Credential, RawOutput, SessionTarget, SshOptions, SshSession};
