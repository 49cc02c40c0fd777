//! Diagnostic command set for Nexus switches
//!
//! Read-only `show` commands only. The tool must never change switch state,
//! so anything that is not a `show` command is refused.

use crate::error::DiagError;

/// Commands executed on every run, in order
pub const DEFAULT_COMMANDS: &[&str] = &[
    "show version",
    "show system resources",
    "show environment",
    // Last 100 lines keeps the prompt small
    "show logging log | last 100",
    "show interface status",
    "show ip interface brief",
    "show processes cpu history",
];

/// Default command list as owned strings
pub fn default_commands() -> Vec<String> {
    DEFAULT_COMMANDS.iter().map(|c| c.to_string()).collect()
}

/// Check that a command is a read-only `show` command
pub fn validate_command(command: &str) -> Result<(), DiagError> {
    let trimmed = command.trim();
    if trimmed.is_empty() {
        return Err(DiagError::Config("empty command in command list".to_string()));
    }

    let mut words = trimmed.split_whitespace();
    let first = words.next().unwrap_or_default();
    if !first.eq_ignore_ascii_case("show") || words.next().is_none() {
        return Err(DiagError::Config(format!(
            "only 'show' commands are allowed, got '{}'",
            trimmed
        )));
    }

    Ok(())
}

/// Resolve the effective command list: configured override or defaults
pub fn resolve_commands(configured: &[String]) -> Result<Vec<String>, DiagError> {
    if configured.is_empty() {
        return Ok(default_commands());
    }

    configured
        .iter()
        .map(|c| validate_command(c).map(|_| c.trim().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_commands_are_valid() {
        assert_eq!(DEFAULT_COMMANDS.len(), 7);
        for cmd in DEFAULT_COMMANDS {
            assert!(validate_command(cmd).is_ok(), "{} should be valid", cmd);
        }
    }

    #[test]
    fn test_rejects_config_commands() {
        assert!(validate_command("configure terminal").is_err());
        assert!(validate_command("reload").is_err());
        assert!(validate_command("show").is_err());
        assert!(validate_command("   ").is_err());
    }

    #[test]
    fn test_resolve_empty_uses_defaults() {
        let cmds = resolve_commands(&[]).unwrap();
        assert_eq!(cmds[0], "show version");
        assert_eq!(cmds.len(), DEFAULT_COMMANDS.len());
    }

    #[test]
    fn test_resolve_override_trims() {
        let cmds = resolve_commands(&["  show clock ".to_string()]).unwrap();
        assert_eq!(cmds, vec!["show clock".to_string()]);

        let bad = resolve_commands(&["show clock".to_string(), "write erase".to_string()]);
        assert!(bad.is_err());
    }
}
