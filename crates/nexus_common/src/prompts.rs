//! Prompts for the switch diagnostic analysis

pub const DIAGNOSTIC_SYSTEM_PROMPT: &str = r#"You are a network engineer specialised in Cisco Nexus switches.
You analyse raw NX-OS command output together with a problem reported by an operator.

RULES:
1. Base every finding on the switch data you are given. Quote the relevant lines.
2. If the data does not show the cause, say so and name the command that would.
3. Some data may be marked [REDACTED] or [TRUNCATED]. Do not guess hidden values.
4. Plain text with numbered section headers. No tables wider than 80 columns."#;

/// Sections the report must contain, in order
pub const REPORT_SECTIONS: &[&str] = &[
    "Detailed analysis of the problem",
    "Possible causes",
    "Recommendations for resolution",
    "Preventive actions to avoid similar problems",
    "Monitoring suggestions",
];

/// Build the user prompt for one analysis request
pub fn generate_diagnostic_prompt(problem: &str, switch_data: &str) -> String {
    let sections = REPORT_SECTIONS
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {}", i + 1, s))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Analyse the following data collected from the switch and the reported problem.\n\n\
         Reported problem: {}\n\n\
         Switch data:\n{}\n\n\
         Please provide:\n{}",
        problem.trim(),
        switch_data,
        sections
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_problem_data_and_sections() {
        let prompt = generate_diagnostic_prompt("  Eth1/1 flapping ", "show version:\nNXOS\n");
        assert!(prompt.contains("Reported problem: Eth1/1 flapping\n"));
        assert!(prompt.contains("show version:\nNXOS"));
        assert!(prompt.contains("1. Detailed analysis of the problem"));
        assert!(prompt.ends_with("5. Monitoring suggestions"));
    }

    #[test]
    fn test_system_prompt_names_platform() {
        assert!(DIAGNOSTIC_SYSTEM_PROMPT.contains("Cisco Nexus"));
    }
}
