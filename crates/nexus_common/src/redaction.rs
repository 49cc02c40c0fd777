//! Secret redaction for switch output
//!
//! Applied to command output before it is sent to the language model:
//! - the literal session password
//! - typed NX-OS secrets (`password 5 ...`, `secret 5 ...`, `key 7 ...`,
//!   `message-digest-key 1 md5 3 ...`)
//! - SNMP communities and SNMPv3 auth/priv keys
//!
//! The key word stays in place so the model still sees what was configured.

use regex::Regex;
use std::sync::LazyLock;

/// Replacement text for every masked value
pub const REDACTED: &str = "[REDACTED]";

/// Passwords this short would mask half the output
const MIN_LITERAL_LEN: usize = 4;

static SECRET_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // username admin password 5 $5$abc..., tacacs-server key 7 "0832...",
        // ip ospf message-digest-key 1 md5 3 9125d59c...
        r#"(?i)\b(?P<key>(?:password|secret|key)\s+\d{1,2}(?:\s+md5(?:\s+\d)?)?)\s+(?P<value>"[^"]*"|\S+)"#,
        // snmp-server community public group network-operator
        r#"(?i)\b(?P<key>snmp-server\s+community)\s+(?P<value>\S+)"#,
        // snmp-server user ops network-admin auth md5 0x1234 priv 0x5678
        r#"(?i)\b(?P<key>(?:auth\s+(?:md5|sha\S*)|priv(?:\s+aes-128)?))\s+(?P<value>0x[0-9a-f]+|\S+)"#,
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

/// Mask typed configuration secrets
pub fn redact_config_secrets(text: &str) -> String {
    let replacement = format!("$key {}", REDACTED);
    SECRET_PATTERNS
        .iter()
        .fold(text.to_string(), |acc, re| {
            re.replace_all(&acc, replacement.as_str()).into_owned()
        })
}

/// Mask every occurrence of a literal secret
pub fn redact_literal(text: &str, secret: &str) -> String {
    if secret.chars().count() < MIN_LITERAL_LEN {
        return text.to_string();
    }
    text.replace(secret, REDACTED)
}

/// Full pass: literal secrets first, then configuration patterns
pub fn redact(text: &str, literals: &[&str]) -> String {
    let masked = literals
        .iter()
        .fold(text.to_string(), |acc, secret| redact_literal(&acc, secret));
    redact_config_secrets(&masked)
}
