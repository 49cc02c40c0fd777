//! Nexus Diag Configuration
//!
//! Config file: ~/.config/nexus-diag/config.toml or /etc/nexus-diag/config.toml
//!
//! Every field has a default, so a missing file or a partial file is fine.

use crate::commands;
use crate::error::DiagError;
use crate::llm_client::LlmConfig;
use crate::ssh::{normalize_fingerprint, SshOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable pointing at an explicit config file
pub const CONFIG_ENV_VAR: &str = "NEXUS_DIAG_CONFIG";

/// SSH connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SshConfig {
    pub port: u16,

    /// TCP connect + handshake timeout
    pub connect_timeout_secs: u64,

    /// Blocking timeout applied to each command
    pub command_timeout_secs: u64,

    /// Pinned host key, "SHA256:<base64>". When unset any key is accepted.
    pub host_key_fingerprint: Option<String>,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            port: 22,
            connect_timeout_secs: 10,
            command_timeout_secs: 30,
            host_key_fingerprint: None,
        }
    }
}

/// Language model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,

    /// Switch data is cut to this many characters before submission
    pub max_prompt_chars: usize,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            timeout_secs: 120,
            max_prompt_chars: 3000,
        }
    }
}

/// What to collect and where to store it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Overrides the built-in command list when non-empty
    pub commands: Vec<String>,

    /// Directory for diagnostic records (current directory when unset)
    pub output_dir: Option<PathBuf>,
}

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagConfig {
    #[serde(default)]
    pub ssh: SshConfig,

    #[serde(default)]
    pub llm: LlmSection,

    #[serde(default)]
    pub collection: CollectionConfig,
}

impl DiagConfig {
    /// Get default user config path: ~/.config/nexus-diag/config.toml
    pub fn user_config_path() -> Option<PathBuf> {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg).join("nexus-diag").join("config.toml"));
        }
        std::env::var("HOME")
            .ok()
            .map(|home| Path::new(&home).join(".config/nexus-diag/config.toml"))
    }

    /// Get system config path: /etc/nexus-diag/config.toml
    pub fn system_config_path() -> PathBuf {
        PathBuf::from("/etc/nexus-diag/config.toml")
    }

    /// Load configuration
    ///
    /// Priority:
    /// 1. Explicit path (--config)
    /// 2. $NEXUS_DIAG_CONFIG
    /// 3. User config (~/.config/nexus-diag/config.toml)
    /// 4. System config (/etc/nexus-diag/config.toml)
    /// 5. Defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self, DiagError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::load_from(Path::new(&path));
        }

        if let Some(user_path) = Self::user_config_path() {
            if user_path.exists() {
                return Self::load_from(&user_path);
            }
        }

        let system_path = Self::system_config_path();
        if system_path.exists() {
            return Self::load_from(&system_path);
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load and validate a specific file
    pub fn load_from(path: &Path) -> Result<Self, DiagError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            DiagError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: DiagConfig = toml::from_str(&contents).map_err(|e| {
            DiagError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject values that would make a run pointless or unsafe
    pub fn validate(&self) -> Result<(), DiagError> {
        if self.ssh.port == 0 {
            return Err(DiagError::Config("ssh.port must be non-zero".to_string()));
        }
        if self.ssh.connect_timeout_secs == 0 || self.ssh.command_timeout_secs == 0 {
            return Err(DiagError::Config("ssh timeouts must be at least 1 second".to_string()));
        }
        if self.llm.endpoint.trim().is_empty() || self.llm.model.trim().is_empty() {
            return Err(DiagError::Config("llm.endpoint and llm.model are required".to_string()));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(DiagError::Config(format!(
                "llm.temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }
        if self.llm.max_prompt_chars == 0 {
            return Err(DiagError::Config("llm.max_prompt_chars must be non-zero".to_string()));
        }
        commands::resolve_commands(&self.collection.commands)?;
        Ok(())
    }

    /// Effective command list for this configuration
    pub fn commands(&self) -> Result<Vec<String>, DiagError> {
        commands::resolve_commands(&self.collection.commands)
    }

    /// Directory diagnostic records are written to
    pub fn output_dir(&self) -> PathBuf {
        self.collection
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// SSH session options
    pub fn ssh_options(&self) -> SshOptions {
        SshOptions {
            connect_timeout: Duration::from_secs(self.ssh.connect_timeout_secs),
            command_timeout: Duration::from_secs(self.ssh.command_timeout_secs),
            host_key_fingerprint: self
                .ssh
                .host_key_fingerprint
                .as_deref()
                .and_then(normalize_fingerprint),
        }
    }

    /// Client settings for the model, with the key supplied at runtime
    pub fn llm_config(&self, api_key: Option<String>) -> LlmConfig {
        LlmConfig {
            endpoint: self.llm.endpoint.clone(),
            model: self.llm.model.clone(),
            api_key,
            temperature: self.llm.temperature,
            timeout_secs: self.llm.timeout_secs,
        }
    }
}
