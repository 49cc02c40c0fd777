//! Terminal output for nexusctl
//!
//! Color only when the stream is a terminal, NO_COLOR is unset and TERM is
//! not "dumb". Everything styled goes through `paint`.

use nexus_common::{AnalysisReport, DiagnosticRecord};
use owo_colors::{OwoColorize, Style};
use std::io::IsTerminal;
use std::path::Path;

pub const BANNER: &str = "=== Nexus Log Analyzer ===";
pub const REPORT_HEADER: &str = "=== AI Analysis ===";

/// Decide whether styling is allowed for a stream
pub fn color_allowed(is_terminal: bool, no_color: bool, term: Option<&str>) -> bool {
    is_terminal && !no_color && term != Some("dumb")
}

fn env_allows_color(is_terminal: bool) -> bool {
    let term = std::env::var("TERM").ok();
    color_allowed(
        is_terminal,
        std::env::var_os("NO_COLOR").is_some(),
        term.as_deref(),
    )
}

/// Color for stdout
pub fn should_use_color() -> bool {
    env_allows_color(std::io::stdout().is_terminal())
}

/// Color for stderr
pub fn should_use_color_stderr() -> bool {
    env_allows_color(std::io::stderr().is_terminal())
}

/// Apply `style` only when `color` is set
pub fn paint(text: &str, style: Style, color: bool) -> String {
    if color {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

pub fn print_banner() {
    let color = should_use_color();
    println!("{}", paint(BANNER, Style::new().bright_cyan().bold(), color));
}

/// Short summary after the record is on disk
pub fn format_collection_summary(record: &DiagnosticRecord, path: &Path, color: bool) -> String {
    let dim = Style::new().dimmed();
    let mut lines = vec![format!(
        "{}  Collected {} commands from {}",
        paint("✓", Style::new().bright_green(), color),
        record.commands.len(),
        paint(&record.host, Style::new().bright_white(), color)
    )];
    for result in &record.commands {
        lines.push(format!(
            "   {} {}",
            paint("-", dim, color),
            paint(
                &format!("{} ({} ms)", result.command, result.duration_ms),
                dim,
                color
            )
        ));
    }
    lines.push(format!(
        "   Saved to {}",
        paint(&path.display().to_string(), Style::new().cyan(), color)
    ));
    lines.join("\n")
}

pub fn print_collection_summary(record: &DiagnosticRecord, path: &Path) {
    println!();
    println!(
        "{}",
        format_collection_summary(record, path, should_use_color())
    );
}

/// One-line provenance shown under the report header
pub fn report_meta(report: &AnalysisReport) -> String {
    format!(
        "model: {}  generated: {}",
        report.model,
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

pub fn format_report(report: &AnalysisReport, color: bool) -> String {
    format!(
        "{}\n{}\n\n{}",
        paint(REPORT_HEADER, Style::new().bright_cyan().bold(), color),
        paint(&report_meta(report), Style::new().dimmed(), color),
        report.text
    )
}

pub fn print_report(report: &AnalysisReport) {
    println!();
    println!("{}", format_report(report, should_use_color()));
}

/// Command list, numbered
pub fn format_commands(commands: &[String], color: bool) -> String {
    commands
        .iter()
        .enumerate()
        .map(|(i, cmd)| {
            format!(
                "{}  {}",
                paint(&format!("[{}]", i + 1), Style::new().cyan(), color),
                cmd
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn print_commands(commands: &[String]) {
    println!("{}", format_commands(commands, should_use_color()));
}

pub fn print_error(message: &str) {
    let color = should_use_color_stderr();
    eprintln!();
    eprintln!(
        "{} {}",
        paint("Error:", Style::new().bright_red().bold(), color),
        message
    );
    eprintln!(
        "{}",
        paint(
            "Please check the logs for more details.",
            Style::new().dimmed(),
            color
        )
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use nexus_common::CommandResult;

    fn sample_report() -> AnalysisReport {
        AnalysisReport {
            text: "1. Detailed analysis".to_string(),
            model: "gpt-4o-mini".to_string(),
            generated_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_report_meta() {
        assert_eq!(
            report_meta(&sample_report()),
            "model: gpt-4o-mini  generated: 2024-05-01 10:00:00 UTC"
        );
    }

    #[test]
    fn test_color_allowed() {
        assert!(color_allowed(true, false, Some("xterm-256color")));
        assert!(color_allowed(true, false, None));
        assert!(!color_allowed(false, false, Some("xterm")));
        assert!(!color_allowed(true, true, Some("xterm")));
        assert!(!color_allowed(true, false, Some("dumb")));
    }

    #[test]
    fn test_paint() {
        assert_eq!(paint("[1]", Style::new().cyan(), false), "[1]");
        let styled = paint("[1]", Style::new().cyan(), true);
        assert!(styled.contains("\u{1b}["));
        assert!(styled.contains("[1]"));
    }

    #[test]
    fn test_plain_output_has_no_escape_codes() {
        let commands = vec!["show version".to_string(), "show clock".to_string()];
        assert_eq!(
            format_commands(&commands, false),
            "[1]  show version\n[2]  show clock"
        );

        let report = format_report(&sample_report(), false);
        assert!(report.starts_with("=== AI Analysis ===\nmodel: gpt-4o-mini"));
        assert!(!report.contains('\u{1b}'));

        let record = DiagnosticRecord {
            host: "nx1".to_string(),
            collected_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
            commands: vec![CommandResult {
                command: "show version".to_string(),
                output: "NXOS".to_string(),
                stderr: String::new(),
                exit_status: Some(0),
                executed_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
                duration_ms: 12,
            }],
        };
        let summary = format_collection_summary(&record, Path::new("out.json"), false);
        assert!(!summary.contains('\u{1b}'));
        assert!(summary.contains("show version (12 ms)"));
        assert!(summary.ends_with("Saved to out.json"));
    }
}
