//! Error types for the Nexus diagnostic pipeline.

use crate::llm_client::LlmError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiagError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to connect to switch {host}: {reason}")]
    Connect { host: String, reason: String },

    #[error("SSH authentication failed for {user}@{host}")]
    Auth { user: String, host: String },

    #[error("SSH host key mismatch (expected {expected}, got {observed})")]
    HostKeyMismatch { expected: String, observed: String },

    #[error("SSH error: {0}")]
    Ssh(String),

    #[error("No data collected from the switch")]
    NoData,

    #[error("Analysis failed: {0}")]
    Llm(#[from] LlmError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DiagError {
    /// Process exit code for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            DiagError::InvalidInput(_) | DiagError::Config(_) => 2,
            DiagError::Connect { .. }
            | DiagError::Auth { .. }
            | DiagError::HostKeyMismatch { .. }
            | DiagError::Ssh(_)
            | DiagError::NoData => 69,
            DiagError::Llm(_) => 70,
            DiagError::Io(_) | DiagError::Json(_) => 74,
        }
    }
}

impl From<ssh2::Error> for DiagError {
    fn from(e: ssh2::Error) -> Self {
        DiagError::Ssh(e.message().to_string())
    }
}
