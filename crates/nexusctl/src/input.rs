//! Interactive input: host, credentials, API key, problem description
//!
//! Values given on the command line or in the environment are used as-is;
//! anything missing is asked for. Every field is mandatory.

use crate::display;
use nexus_common::DiagError;
use owo_colors::Style;
use std::io::{self, BufRead, Write};

/// Source of answers to interactive questions
pub trait Prompt {
    /// Read one visible line
    fn line(&mut self, label: &str) -> io::Result<String>;

    /// Read one line without echo
    fn secret(&mut self, label: &str) -> io::Result<String>;
}

/// Prompts on the controlling terminal
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn line(&mut self, label: &str) -> io::Result<String> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        read_line_from(&mut stdin.lock(), &mut stdout.lock(), label)
    }

    fn secret(&mut self, label: &str) -> io::Result<String> {
        let color = display::should_use_color();
        let label = display::paint(label, Style::new().bright_white(), color);
        rpassword::prompt_password(format!("{}: ", label))
    }
}

/// Print `label` and read one trimmed line from `reader`
pub fn read_line_from<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    label: &str,
) -> io::Result<String> {
    write!(writer, "{}: ", label)?;
    writer.flush()?;

    let mut input = String::new();
    if reader.read_line(&mut input)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("no input for '{}'", label),
        ));
    }
    Ok(input.trim().to_string())
}

/// Use `given` when present, otherwise ask; empty answers are rejected
pub fn require_value(
    given: Option<String>,
    prompt: &mut dyn Prompt,
    label: &str,
    hidden: bool,
) -> Result<String, DiagError> {
    let value = match given {
        Some(v) => v,
        None if hidden => prompt.secret(label)?,
        None => prompt.line(label)?,
    };

    let value = if hidden { value } else { value.trim().to_string() };
    if value.trim().is_empty() {
        return Err(DiagError::InvalidInput(format!(
            "all fields are required ({} is empty)",
            label.to_lowercase()
        )));
    }
    Ok(value)
}

/// Environment variable holding the API key
pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

/// API key from the environment or the terminal
pub fn api_key(prompt: &mut dyn Prompt) -> Result<String, DiagError> {
    let from_env = std::env::var(API_KEY_ENV_VAR)
        .ok()
        .filter(|k| !k.trim().is_empty());
    if from_env.is_some() {
        tracing::debug!("Using API key from {}", API_KEY_ENV_VAR);
    }
    require_value(from_env, prompt, "OpenAI API key", true).map(|k| k.trim().to_string())
}

/// Scripted answers, for tests and non-interactive callers
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: Vec<String>,
    pub asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().rev().map(|a| a.to_string()).collect(),
            asked: Vec::new(),
        }
    }

    fn next(&mut self, label: &str) -> io::Result<String> {
        self.asked.push(label.to_string());
        self.answers.pop().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, format!("no answer for '{}'", label))
        })
    }
}

impl Prompt for ScriptedPrompt {
    fn line(&mut self, label: &str) -> io::Result<String> {
        self.next(label)
    }

    fn secret(&mut self, label: &str) -> io::Result<String> {
        self.next(label)
    }
}
